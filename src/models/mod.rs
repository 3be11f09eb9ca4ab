//! # 数据模型模块
//!
//! 定义与前端 TypeScript 类型一一对应的 Rust 数据结构，
//! 用于 Tauri IPC 传输、Ollama HTTP 交互和配置文件读写。
//! - `reply` - 命令边界的统一应答信封
//! - `chat` - 推理请求/响应、流式帧、流事件和聊天轮次
//! - `fs` - 目录条目、文件元数据、命令输出
//! - `dialog` - 原生文件对话框的选项与结果
//! - `settings` - 应用配置

pub mod chat;
pub mod dialog;
pub mod fs;
pub mod reply;
pub mod settings;
