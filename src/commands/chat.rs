//! # 聊天 Tauri Commands
//!
//! 命令边界上与推理服务相关的操作，每个都是对 HTTP 中继的薄封装：
//! - `send_message` - 非流式发送，返回完整回复
//! - `send_message_stream` - 触发流式发送，结果通过事件推送
//! - `check_ollama` - 连通性检查
//! - `list_models` - 已安装模型列表
//!
//! 流式推送事件（只发给发起请求的窗口，均携带 `sessionId`）：
//! - `message-stream-chunk` - `{ sessionId, chunk }`
//! - `message-stream-done` - `{ sessionId }`
//! - `message-stream-error` - `{ sessionId, error }`

use tauri::{AppHandle, Emitter, Manager, Window};

use crate::controller::actions;
use crate::models::chat::{
    MessageReply, ModelList, SessionId, StreamChunkPayload, StreamDonePayload,
    StreamErrorPayload, StreamEvent, StreamStarted,
};
use crate::models::reply::{CommandReply, Empty};
use crate::services::config::ConfigStore;
use crate::services::ollama::OllamaClient;
use crate::services::streams::StreamRegistry;

pub const EVENT_STREAM_CHUNK: &str = "message-stream-chunk";
pub const EVENT_STREAM_DONE: &str = "message-stream-done";
pub const EVENT_STREAM_ERROR: &str = "message-stream-error";

/// 按当前配置构造中继客户端，复用共享的 HTTP 连接池
pub(crate) fn relay_client(app: &AppHandle) -> OllamaClient {
    let config = app.state::<ConfigStore>().get();
    let http = app.state::<reqwest::Client>().inner().clone();
    OllamaClient::from_config(http, &config)
}

/// 把一个流事件推送给发起请求的窗口
pub(crate) fn emit_stream_event(window: &Window, session: SessionId, event: &StreamEvent) {
    let label = window.label();
    let result = match event {
        StreamEvent::Delta(chunk) => window.emit_to(
            label,
            EVENT_STREAM_CHUNK,
            StreamChunkPayload {
                session_id: session,
                chunk: chunk.clone(),
            },
        ),
        StreamEvent::Done => window.emit_to(
            label,
            EVENT_STREAM_DONE,
            StreamDonePayload {
                session_id: session,
            },
        ),
        StreamEvent::Error(error) => window.emit_to(
            label,
            EVENT_STREAM_ERROR,
            StreamErrorPayload {
                session_id: session,
                error: error.clone(),
            },
        ),
    };

    if let Err(e) = result {
        log::warn!("推送流事件到窗口 {} 失败: {}", label, e);
    }
}

/// 非流式发送一条消息
///
/// # 参数
/// - `message` - 用户输入的提示词
///
/// # 返回值
/// `{ success: true, response }` 或 `{ success: false, error }`；失败不重试
#[tauri::command]
pub async fn send_message(app: AppHandle, message: String) -> CommandReply<MessageReply> {
    let client = relay_client(&app);
    client
        .generate(&message)
        .await
        .map(|response| MessageReply { response })
        .into()
}

/// 触发一次流式发送
///
/// 立即返回本次会话的标识，增量文本、完成和错误通过事件推送。
/// 同一窗口已有进行中的会话时拒绝，返回 `{ success: false, error }`。
#[tauri::command]
pub async fn send_message_stream(
    app: AppHandle,
    window: Window,
    message: String,
) -> CommandReply<StreamStarted> {
    let label = window.label().to_string();
    let session = match app.state::<StreamRegistry>().begin(&label) {
        Ok(session) => session,
        Err(e) => return CommandReply::fail(e),
    };
    let client = relay_client(&app);
    log::info!("窗口 {} 开始流式生成（会话 {:?}）", label, session);

    tauri::async_runtime::spawn(async move {
        let streams = app.state::<StreamRegistry>();
        actions::relay_session(&streams, &client, &label, session, &message, |event| {
            emit_stream_event(&window, session, event);
        })
        .await;
    });

    CommandReply::ok(StreamStarted {
        session_id: session,
    })
}

/// 检查推理服务是否可达
///
/// 成功只表示服务有响应，不代表模型已加载。
#[tauri::command]
pub async fn check_ollama(app: AppHandle) -> CommandReply<Empty> {
    relay_client(&app)
        .check_live()
        .await
        .map(|()| Empty {})
        .into()
}

/// 列出推理服务上已安装的模型
#[tauri::command]
pub async fn list_models(app: AppHandle) -> CommandReply<ModelList> {
    relay_client(&app)
        .list_models()
        .await
        .map(|models| ModelList { models })
        .into()
}
