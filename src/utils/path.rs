//! # 路径工具函数
//!
//! - 获取 Ollama Studio 自身配置目录（`<系统配置目录>/ollama-studio/`）
//! - 取路径的文件名部分，用于状态栏展示

use std::path::{Path, PathBuf};

/// 配置目录名
const APP_DIR_NAME: &str = "ollama-studio";

/// 获取应用配置目录的绝对路径
///
/// 使用 `dirs` crate 获取跨平台的配置目录：
/// - Windows: `C:\Users\username\AppData\Roaming\ollama-studio`
/// - macOS: `/Users/username/Library/Application Support/ollama-studio`
/// - Linux: `/home/username/.config/ollama-studio`
///
/// # 错误
/// 无法确定系统配置目录时返回错误信息
pub fn get_config_dir() -> Result<PathBuf, String> {
    let base = dirs::config_dir().ok_or_else(|| "无法获取系统配置目录".to_string())?;
    Ok(base.join(APP_DIR_NAME))
}

/// 获取配置文件 `config.json` 的绝对路径
pub fn get_config_file() -> Result<PathBuf, String> {
    Ok(get_config_dir()?.join("config.json"))
}

/// 取路径的最后一段；没有文件名部分时原样返回
pub fn display_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string())
}
