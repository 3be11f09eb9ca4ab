//! # 文件系统 Tauri Commands
//!
//! 工作区文件原语的命令边界：`read_file`、`write_file`、`readdir`、`stat`、`mkdir`、`exists`。
//! 全部直接转交 `services::workspace`，不做路径校验，也不限制在项目目录内。

use crate::models::fs::{DirListing, Existence, FileContent, FileStat};
use crate::models::reply::{CommandReply, Empty};
use crate::services::workspace;

/// 读取文本文件
#[tauri::command]
pub async fn read_file(path: String) -> CommandReply<FileContent> {
    workspace::read_text(&path)
        .await
        .map(|content| FileContent { content })
        .into()
}

/// 写入文本文件（整体覆盖，非原子）
#[tauri::command]
pub async fn write_file(path: String, content: String) -> CommandReply<Empty> {
    workspace::write_text(&path, &content)
        .await
        .map(|()| Empty {})
        .into()
}

/// 列出目录的一层条目
#[tauri::command]
pub async fn readdir(path: String) -> CommandReply<DirListing> {
    workspace::list_dir(&path)
        .await
        .map(|entries| DirListing { entries })
        .into()
}

/// 获取文件或目录的元数据
#[tauri::command]
pub async fn stat(path: String) -> CommandReply<FileStat> {
    workspace::stat(&path).await.into()
}

/// 递归创建目录
#[tauri::command]
pub async fn mkdir(path: String) -> CommandReply<Empty> {
    workspace::create_dir(&path)
        .await
        .map(|()| Empty {})
        .into()
}

/// 检查路径是否存在
#[tauri::command]
pub async fn exists(path: String) -> CommandReply<Existence> {
    CommandReply::ok(Existence {
        exists: workspace::exists(&path).await,
    })
}
