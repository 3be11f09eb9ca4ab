//! # 业务逻辑服务模块
//!
//! 命令边界背后的实际实现，与 Tauri command 层解耦：
//! - `ollama` - HTTP 中继：非流式/流式生成、连通性检查、模型列表
//! - `ndjson` - 跨分块的 NDJSON 帧解码
//! - `streams` - 流式会话登记表：每个窗口最多一个进行中的会话
//! - `workspace` - 文件/目录原语
//! - `shell` - 需要显式授权的终端命令执行
//! - `config` - 配置加载与保存

pub mod config;
pub mod ndjson;
pub mod ollama;
pub mod shell;
pub mod streams;
pub mod workspace;
