//! # 配置存储服务
//!
//! 启动时从 `<系统配置目录>/ollama-studio/config.json` 加载一次配置，
//! 作为 Tauri managed state 供所有 command 读取；保存时同时更新内存与文件。
//!
//! 配置文件不存在时使用默认值；文件存在但无法读取或解析时
//! 记录警告并回退到默认值，不阻止应用启动。

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::models::settings::StudioConfig;

/// 内存中的配置及其持久化位置
pub struct ConfigStore {
    /// 当前生效的配置
    current: RwLock<StudioConfig>,
    /// 配置文件路径；无法确定配置目录时为 None，此时保存会失败
    file: Option<PathBuf>,
}

impl ConfigStore {
    /// 从默认位置加载
    pub fn load_default() -> Self {
        match crate::utils::path::get_config_file() {
            Ok(file) => Self::load_from(file),
            Err(e) => {
                log::warn!("{}，使用默认配置", e);
                Self {
                    current: RwLock::new(StudioConfig::default()),
                    file: None,
                }
            }
        }
    }

    /// 从指定文件加载
    pub fn load_from(file: impl Into<PathBuf>) -> Self {
        let file = file.into();
        let config = read_config_file(&file);
        Self {
            current: RwLock::new(config),
            file: Some(file),
        }
    }

    /// 当前配置的快照
    pub fn get(&self) -> StudioConfig {
        self.current
            .read()
            .map(|config| config.clone())
            .unwrap_or_default()
    }

    /// 持久化并替换当前配置
    ///
    /// # 错误
    /// 配置目录无法确定、目录创建失败或文件写入失败时返回错误，内存中的配置保持不变
    pub async fn save(&self, config: StudioConfig) -> Result<(), String> {
        let file = self
            .file
            .as_ref()
            .ok_or_else(|| "无法确定配置文件位置".to_string())?;

        if let Some(parent) = file.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| format!("创建配置目录失败: {}", e))?;
        }

        let content = serde_json::to_string_pretty(&config)
            .map_err(|e| format!("序列化配置失败: {}", e))?;

        tokio::fs::write(file, content)
            .await
            .map_err(|e| format!("写入配置文件失败: {}", e))?;

        let mut current = self
            .current
            .write()
            .map_err(|e| format!("更新内存配置失败: {}", e))?;
        *current = config;
        Ok(())
    }
}

/// 读取配置文件，任何失败都回退到默认配置
fn read_config_file(file: &Path) -> StudioConfig {
    if !file.exists() {
        return StudioConfig::default();
    }

    let content = match std::fs::read_to_string(file) {
        Ok(content) => content,
        Err(e) => {
            log::warn!("读取配置文件失败 {}: {}，使用默认配置", file.display(), e);
            return StudioConfig::default();
        }
    };

    serde_json::from_str(&content).unwrap_or_else(|e| {
        log::warn!("解析配置文件失败 {}: {}，使用默认配置", file.display(), e);
        StudioConfig::default()
    })
}
