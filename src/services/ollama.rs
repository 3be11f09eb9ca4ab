//! # Ollama HTTP 中继
//!
//! 每条用户消息对应一次对本地推理服务的请求，两种模式：
//! - **非流式**：`generate()` 等待完整 JSON 响应体，带超时（默认 120 秒）
//! - **流式**：`generate_stream()` 逐块读取响应体，经 `FrameDecoder` 切分为帧，
//!   每个带 `response` 的帧发出一个增量事件，遇到完成标记发出完成事件
//!
//! 另外提供 `check_live()`（GET `/api/tags`，仅表示服务有响应）和
//! `list_models()`（同一端点返回的模型列表）。
//!
//! 没有重试、退避或熔断；流式请求不设超时，连接停滞时会一直等待。

use std::time::Duration;

use futures_util::StreamExt;

use crate::models::chat::{
    GenerateRequest, GenerateResponse, StreamEvent, StreamFrame, TagsResponse,
};
use crate::models::settings::StudioConfig;
use crate::services::ndjson::FrameDecoder;

/// 指向某个 Ollama 服务和模型的客户端
///
/// 内部的 `reqwest::Client` 可廉价克隆，连接池在克隆之间共享。
#[derive(Debug, Clone)]
pub struct OllamaClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    timeout: Duration,
}

impl OllamaClient {
    /// 创建客户端
    ///
    /// # 参数
    /// - `http` - 共享的 HTTP 客户端
    /// - `base_url` - 服务根地址（如 `http://localhost:11434`）
    /// - `model` - 生成请求使用的模型
    /// - `timeout` - 非流式请求的超时
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http,
            base_url,
            model: model.into(),
            timeout,
        }
    }

    /// 按应用配置创建客户端
    pub fn from_config(http: reqwest::Client, config: &StudioConfig) -> Self {
        Self::new(
            http,
            config.ollama_url.as_str(),
            config.model.as_str(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// 非流式生成：返回完整的响应文本
    ///
    /// # 错误
    /// 超时、连接失败、非 2xx 状态或响应体无法解析时返回错误消息，不重试
    pub async fn generate(&self, prompt: &str) -> Result<String, String> {
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
        };

        let response = self
            .http
            .post(self.endpoint("/api/generate"))
            .json(&request)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| self.describe_error(&e))?;

        let response = check_status(response).await?;

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| self.describe_error(&e))?;

        Ok(body.response)
    }

    /// 流式生成：按到达顺序通过 `on_event` 发出事件
    ///
    /// 事件序列保证以且仅以一个终止事件（`Done` 或 `Error`）结束，
    /// 终止事件之后不再发出任何事件。
    /// 响应体在完成标记之前结束视为错误，避免调用方永远等不到终止事件。
    ///
    /// # 参数
    /// - `prompt` - 用户输入
    /// - `on_event` - 事件回调，在当前任务中同步调用
    pub async fn generate_stream<F>(&self, prompt: &str, mut on_event: F)
    where
        F: FnMut(StreamEvent) + Send,
    {
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: true,
        };

        let response = match self
            .http
            .post(self.endpoint("/api/generate"))
            .json(&request)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                on_event(StreamEvent::Error(self.describe_error(&e)));
                return;
            }
        };

        let response = match check_status(response).await {
            Ok(response) => response,
            Err(e) => {
                on_event(StreamEvent::Error(e));
                return;
            }
        };

        let mut body = response.bytes_stream();
        let mut decoder = FrameDecoder::new();

        while let Some(chunk) = body.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(e) => {
                    on_event(StreamEvent::Error(format!("读取流式响应失败: {}", e)));
                    return;
                }
            };

            for frame in decoder.push(&chunk) {
                if relay_frame(frame, &mut on_event) {
                    return;
                }
            }
        }

        // 响应体结束：冲刷没有换行符结尾的最后一行
        if let Some(frame) = decoder.finish() {
            if relay_frame(frame, &mut on_event) {
                return;
            }
        }

        on_event(StreamEvent::Error(
            "流式响应在完成标记之前结束".to_string(),
        ));
    }

    /// 连通性检查：GET `/api/tags`
    ///
    /// 成功只表示服务有响应，不代表任何模型已加载；响应体不做解析，任何 2xx 都算在线。
    pub async fn check_live(&self) -> Result<(), String> {
        self.get_tags().await.map(|_| ())
    }

    /// 列出服务端已安装的模型名称
    pub async fn list_models(&self) -> Result<Vec<String>, String> {
        let tags: TagsResponse = self
            .get_tags()
            .await?
            .json()
            .await
            .map_err(|e| self.describe_error(&e))?;
        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    async fn get_tags(&self) -> Result<reqwest::Response, String> {
        let response = self
            .http
            .get(self.endpoint("/api/tags"))
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| self.describe_error(&e))?;

        check_status(response).await
    }

    /// 将传输层错误转换为可读消息
    fn describe_error(&self, e: &reqwest::Error) -> String {
        if e.is_timeout() {
            format!("请求超时（{} 秒）: {}", self.timeout.as_secs(), e)
        } else if e.is_connect() {
            format!("无法连接到 Ollama 服务 {}: {}", self.base_url, e)
        } else if e.is_decode() {
            format!("解析 Ollama 响应失败: {}", e)
        } else {
            format!("请求 Ollama 失败: {}", e)
        }
    }
}

/// 将一个帧转换为事件；返回 true 表示会话已终止
fn relay_frame<F>(frame: StreamFrame, on_event: &mut F) -> bool
where
    F: FnMut(StreamEvent),
{
    if let Some(error) = frame.error {
        on_event(StreamEvent::Error(error));
        return true;
    }

    if let Some(text) = frame.response {
        if !text.is_empty() {
            on_event(StreamEvent::Delta(text));
        }
    }

    if frame.done {
        on_event(StreamEvent::Done);
        return true;
    }

    false
}

/// 非 2xx 状态转换为错误，优先使用服务端返回的 `{"error": "..."}` 消息
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, String> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<StreamFrame>(&body)
        .ok()
        .and_then(|frame| frame.error)
        .unwrap_or(body);

    if detail.trim().is_empty() {
        Err(format!("Ollama 返回错误状态 {}", status))
    } else {
        Err(format!("Ollama 返回错误状态 {}: {}", status, detail.trim()))
    }
}
