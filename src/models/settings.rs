//! # 应用配置数据模型
//!
//! 定义 Ollama Studio 的配置结构 `StudioConfig`，
//! 存储在 `<系统配置目录>/ollama-studio/config.json`。
//!
//! 所有字段都有默认值：配置文件不存在或缺少某些字段时，
//! 行为与内置默认值（本地 Ollama、`gpt-oss` 模型、120 秒超时）一致。

use serde::{Deserialize, Serialize};

/// 默认推理服务地址
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

/// 默认模型名称
pub const DEFAULT_MODEL: &str = "gpt-oss";

/// 非流式请求的默认超时（秒）
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

/// 应用配置
///
/// 对应前端 TypeScript 接口：
/// ```typescript
/// interface StudioConfig {
///   ollamaUrl: string;
///   model: string;
///   requestTimeoutSecs: number;
///   streamResponses: boolean;
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StudioConfig {
    /// 推理服务根地址，不带末尾斜杠也可以
    pub ollama_url: String,

    /// `/api/generate` 请求中使用的模型
    pub model: String,

    /// 非流式请求的超时（秒）；流式请求不设超时
    pub request_timeout_secs: u64,

    /// 新窗口中聊天面板默认是否使用流式发送
    pub stream_responses: bool,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            ollama_url: DEFAULT_OLLAMA_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            stream_responses: false,
        }
    }
}
