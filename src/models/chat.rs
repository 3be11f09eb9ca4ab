//! # 聊天与推理数据模型
//!
//! 定义与 Ollama `/api/generate`、`/api/tags` 交互的请求/响应结构，
//! 流式响应中的单个帧（frame），中继向上层发出的流事件，
//! 以及通过 Tauri 事件推送给前端的载荷。

use serde::{Deserialize, Serialize};

/// 发往 `/api/generate` 的请求体
#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest<'a> {
    /// 模型名称（如 "gpt-oss"）
    pub model: &'a str,
    /// 用户输入的提示词
    pub prompt: &'a str,
    /// 是否使用流式响应
    pub stream: bool,
}

/// 非流式响应体
///
/// Ollama 还会返回 `context`、`total_duration` 等字段，这里只关心 `response`。
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub response: String,
}

/// 流式响应中的一帧（一行 NDJSON）
///
/// 所有字段都可缺省：普通帧携带 `response` 增量文本，
/// 最后一帧 `done: true`，模型出错时服务端会发送 `{"error": "..."}`。
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StreamFrame {
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub error: Option<String>,
}

/// HTTP 中继在一次流式生成中发出的事件
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// 增量文本
    Delta(String),
    /// 收到完成标记
    Done,
    /// 传输失败或服务端错误帧
    Error(String),
}

impl StreamEvent {
    /// 是否为会话的终止事件
    pub fn is_terminal(&self) -> bool {
        !matches!(self, StreamEvent::Delta(_))
    }
}

/// 流式会话标识
///
/// 每次开始流式发送时由 `StreamRegistry` 分配，随每个推送事件一起发送，
/// 接收方据此丢弃过期会话的事件。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub u64);

/// `message-stream-chunk` 事件载荷
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamChunkPayload {
    pub session_id: SessionId,
    pub chunk: String,
}

/// `message-stream-done` 事件载荷
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamDonePayload {
    pub session_id: SessionId,
}

/// `message-stream-error` 事件载荷
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamErrorPayload {
    pub session_id: SessionId,
    pub error: String,
}

/// `send_message` 的成功载荷
#[derive(Debug, Clone, Serialize)]
pub struct MessageReply {
    pub response: String,
}

/// `send_message_stream` 的成功载荷：本次会话的标识
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamStarted {
    pub session_id: SessionId,
}

/// `/api/tags` 响应体
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TagsResponse {
    #[serde(default)]
    pub models: Vec<ModelTag>,
}

/// `/api/tags` 中的单个模型条目
#[derive(Debug, Clone, Deserialize)]
pub struct ModelTag {
    pub name: String,
}

/// `list_models` 的成功载荷
#[derive(Debug, Clone, Serialize)]
pub struct ModelList {
    pub models: Vec<String>,
}

/// 聊天角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// 聊天记录中的一轮
///
/// 没有独立标识，仅以在列表中的位置区分。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub text: String,
}

impl ChatTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            text: text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_fields_are_optional() {
        let frame: StreamFrame = serde_json::from_str(r#"{"done":true}"#).unwrap();
        assert_eq!(frame.response, None);
        assert!(frame.done);

        // 未知字段（如 Ollama 的 context、eval_count）被忽略
        let frame: StreamFrame =
            serde_json::from_str(r#"{"model":"gpt-oss","response":"Hel","done":false}"#).unwrap();
        assert_eq!(frame.response.as_deref(), Some("Hel"));
        assert!(!frame.done);
    }

    #[test]
    fn test_push_payload_uses_camel_case() {
        let payload = StreamChunkPayload {
            session_id: SessionId(7),
            chunk: "lo".to_string(),
        };
        let value = serde_json::to_value(payload).unwrap();
        assert_eq!(value, serde_json::json!({ "sessionId": 7, "chunk": "lo" }));
    }
}
