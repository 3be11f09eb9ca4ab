//! # Tauri Command 处理模块
//!
//! 命令边界：特权进程向 UI 暴露的全部操作。每个子模块对应一个功能域：
//! - `chat` - 推理请求（非流式/流式）、连通性检查、模型列表
//! - `files` - 文件/目录原语
//! - `dialogs` - 原生文件对话框
//! - `terminal` - shell 命令执行（需宿主授权）
//! - `settings` - 配置读写
//! - `studio` - 由 UI 控制器驱动的窗口级操作

pub mod chat;
pub mod dialogs;
pub mod files;
pub mod settings;
pub mod studio;
pub mod terminal;
