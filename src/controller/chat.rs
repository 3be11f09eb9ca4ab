//! # 聊天面板
//!
//! 维护有序、只追加的聊天记录，以及发送控制的状态：
//! - 发送时追加用户轮次，进入等待状态，期间拒绝新的发送
//! - 非流式：收到完整结果后追加助手轮次（失败时追加错误文本）
//! - 流式：会话开始时追加一个空的助手轮次，每个增量追加到累加器后
//!   用累加器整体重写该轮次的文本；完成或出错后回到空闲
//!
//! 流事件带会话标识，不属于当前会话的事件一律丢弃。

use serde::Serialize;

use crate::models::chat::{ChatTurn, SessionId, StreamEvent};
use crate::services::streams::STREAM_BUSY_MESSAGE;

/// 空消息的拒绝提示
pub const EMPTY_MESSAGE: &str = "消息不能为空";

/// 发送方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SendMode {
    Buffered,
    Streaming,
}

/// 一次已接受的发送：提示词和发送方式
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outgoing {
    pub prompt: String,
    pub mode: SendMode,
}

/// 进行中的流式会话
#[derive(Debug, Clone)]
struct StreamSession {
    id: SessionId,
    /// 增量文本的累加器
    accumulator: String,
    /// 正在渲染的助手轮次位置；聊天被清空后为 None，下一个增量时重新追加
    turn_index: Option<usize>,
}

#[derive(Debug, Clone)]
enum Pending {
    Idle,
    /// 已接受发送，等待结果（非流式）或等待会话分配（流式）
    Awaiting(SendMode),
    Streaming(StreamSession),
}

/// 聊天面板状态
#[derive(Debug, Clone)]
pub struct ChatPanel {
    turns: Vec<ChatTurn>,
    streaming: bool,
    pending: Pending,
}

impl ChatPanel {
    /// 创建空面板
    ///
    /// # 参数
    /// - `streaming` - 流式开关的初始值
    pub fn new(streaming: bool) -> Self {
        Self {
            turns: Vec::new(),
            streaming,
            pending: Pending::Idle,
        }
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn is_streaming_enabled(&self) -> bool {
        self.streaming
    }

    /// 切换流式开关，只影响之后的发送
    pub fn set_streaming(&mut self, enabled: bool) {
        self.streaming = enabled;
    }

    /// 发送控件是否可用
    pub fn can_send(&self) -> bool {
        matches!(self.pending, Pending::Idle)
    }

    /// 当前流式会话的标识
    pub fn active_session(&self) -> Option<SessionId> {
        match &self.pending {
            Pending::Streaming(session) => Some(session.id),
            _ => None,
        }
    }

    /// 接受一次发送：校验输入、追加用户轮次、进入等待状态
    ///
    /// # 错误
    /// - 消息去除空白后为空
    /// - 已有请求或流式会话进行中（拒绝，不排队）
    pub fn begin_send(&mut self, text: &str) -> Result<Outgoing, String> {
        let prompt = text.trim();
        if prompt.is_empty() {
            return Err(EMPTY_MESSAGE.to_string());
        }
        if !self.can_send() {
            return Err(STREAM_BUSY_MESSAGE.to_string());
        }

        let mode = if self.streaming {
            SendMode::Streaming
        } else {
            SendMode::Buffered
        };

        self.turns.push(ChatTurn::user(prompt));
        self.pending = Pending::Awaiting(mode);

        Ok(Outgoing {
            prompt: prompt.to_string(),
            mode,
        })
    }

    /// 非流式结果到达：追加助手轮次并回到空闲
    pub fn complete_buffered(&mut self, result: Result<String, String>) {
        if !matches!(self.pending, Pending::Awaiting(SendMode::Buffered)) {
            log::warn!("收到非流式结果时面板不在等待状态，结果被丢弃");
            return;
        }

        let text = match result {
            Ok(response) => response,
            Err(e) => error_text(&e),
        };
        self.turns.push(ChatTurn::assistant(text));
        self.pending = Pending::Idle;
    }

    /// 流式会话已分配：追加空的助手轮次，开始接收增量
    pub fn attach_stream(&mut self, id: SessionId) {
        self.turns.push(ChatTurn::assistant(String::new()));
        self.pending = Pending::Streaming(StreamSession {
            id,
            accumulator: String::new(),
            turn_index: Some(self.turns.len() - 1),
        });
    }

    /// 发送在真正发出之前失败（如会话分配被拒绝）：显示错误并回到空闲
    pub fn abort_send(&mut self, error: &str) {
        self.turns.push(ChatTurn::assistant(error_text(error)));
        self.pending = Pending::Idle;
    }

    /// 应用一个流事件
    ///
    /// # 返回值
    /// 事件属于当前会话并被应用时返回 true；过期会话的事件返回 false
    pub fn apply_stream_event(&mut self, id: SessionId, event: &StreamEvent) -> bool {
        let Pending::Streaming(session) = &mut self.pending else {
            return false;
        };
        if session.id != id {
            return false;
        }

        match event {
            StreamEvent::Delta(text) => {
                session.accumulator.push_str(text);
                let index = match session.turn_index {
                    Some(index) if index < self.turns.len() => index,
                    _ => {
                        self.turns.push(ChatTurn::assistant(String::new()));
                        let index = self.turns.len() - 1;
                        session.turn_index = Some(index);
                        index
                    }
                };
                // 每次都用累加器整体重写，而非只追加新片段
                self.turns[index].text = session.accumulator.clone();
            }
            StreamEvent::Done => {
                self.pending = Pending::Idle;
            }
            StreamEvent::Error(e) => {
                self.turns.push(ChatTurn::assistant(error_text(e)));
                self.pending = Pending::Idle;
            }
        }
        true
    }

    /// 清空聊天记录；进行中的请求不受影响，其结果会显示在清空后的面板中
    pub fn clear(&mut self) {
        self.turns.clear();
        if let Pending::Streaming(session) = &mut self.pending {
            session.turn_index = None;
        }
    }

    /// 追加一条助手提示（如连接失败说明）
    pub fn push_notice(&mut self, text: impl Into<String>) {
        self.turns.push(ChatTurn::assistant(text));
    }
}

/// 错误在聊天记录中的呈现
fn error_text(error: &str) -> String {
    format!("错误: {}", error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::chat::ChatRole;

    #[test]
    fn test_buffered_round_trip() {
        let mut chat = ChatPanel::new(false);
        let outgoing = chat.begin_send("  2+2?  ").unwrap();
        assert_eq!(
            outgoing,
            Outgoing {
                prompt: "2+2?".to_string(),
                mode: SendMode::Buffered
            }
        );
        assert!(!chat.can_send());

        chat.complete_buffered(Ok("4".to_string()));
        assert!(chat.can_send());
        assert_eq!(
            chat.turns(),
            &[ChatTurn::user("2+2?"), ChatTurn::assistant("4")]
        );
    }

    #[test]
    fn test_buffered_error_is_shown_as_assistant_turn() {
        let mut chat = ChatPanel::new(false);
        chat.begin_send("hi").unwrap();
        chat.complete_buffered(Err("请求超时（120 秒）".to_string()));

        let last = chat.turns().last().unwrap();
        assert_eq!(last.role, ChatRole::Assistant);
        assert!(last.text.contains("请求超时"));
        assert!(chat.can_send());
    }

    #[test]
    fn test_empty_and_concurrent_sends_are_rejected() {
        let mut chat = ChatPanel::new(true);
        assert_eq!(chat.begin_send("   ").unwrap_err(), EMPTY_MESSAGE);
        assert!(chat.turns().is_empty());

        chat.begin_send("first").unwrap();
        assert_eq!(chat.begin_send("second").unwrap_err(), STREAM_BUSY_MESSAGE);
        assert_eq!(chat.turns().len(), 1);
    }

    #[test]
    fn test_streaming_hello_scenario() {
        let mut chat = ChatPanel::new(true);
        let outgoing = chat.begin_send("greet me").unwrap();
        assert_eq!(outgoing.mode, SendMode::Streaming);

        let id = SessionId(1);
        chat.attach_stream(id);
        assert!(chat.apply_stream_event(id, &StreamEvent::Delta("Hel".to_string())));
        assert_eq!(chat.turns().last().unwrap().text, "Hel");
        assert!(chat.apply_stream_event(id, &StreamEvent::Delta("lo".to_string())));
        assert!(!chat.can_send());
        assert!(chat.apply_stream_event(id, &StreamEvent::Done));

        assert!(chat.can_send());
        assert_eq!(
            chat.turns(),
            &[ChatTurn::user("greet me"), ChatTurn::assistant("Hello")]
        );
    }

    #[test]
    fn test_stale_session_events_are_discarded() {
        let mut chat = ChatPanel::new(true);
        chat.begin_send("q").unwrap();
        chat.attach_stream(SessionId(2));

        assert!(!chat.apply_stream_event(SessionId(1), &StreamEvent::Delta("old".to_string())));
        assert!(!chat.apply_stream_event(SessionId(1), &StreamEvent::Done));
        assert_eq!(chat.active_session(), Some(SessionId(2)));
        assert_eq!(chat.turns().last().unwrap().text, "");

        // 会话结束后，同一会话的迟到事件也被丢弃
        chat.apply_stream_event(SessionId(2), &StreamEvent::Done);
        assert!(!chat.apply_stream_event(SessionId(2), &StreamEvent::Delta("late".to_string())));
    }

    #[test]
    fn test_stream_error_reenables_send() {
        let mut chat = ChatPanel::new(true);
        chat.begin_send("q").unwrap();
        chat.attach_stream(SessionId(3));
        chat.apply_stream_event(SessionId(3), &StreamEvent::Delta("par".to_string()));
        chat.apply_stream_event(SessionId(3), &StreamEvent::Error("连接中断".to_string()));

        assert!(chat.can_send());
        let texts: Vec<&str> = chat.turns().iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["q", "par", "错误: 连接中断"]);
    }

    #[test]
    fn test_clear_during_stream_keeps_rendering() {
        let mut chat = ChatPanel::new(true);
        chat.begin_send("q").unwrap();
        chat.attach_stream(SessionId(4));
        chat.apply_stream_event(SessionId(4), &StreamEvent::Delta("ab".to_string()));

        chat.clear();
        assert!(chat.turns().is_empty());

        chat.apply_stream_event(SessionId(4), &StreamEvent::Delta("c".to_string()));
        assert_eq!(chat.turns(), &[ChatTurn::assistant("abc")]);
    }

    #[test]
    fn test_abort_send_before_stream_starts() {
        let mut chat = ChatPanel::new(true);
        chat.begin_send("q").unwrap();
        chat.abort_send(STREAM_BUSY_MESSAGE);
        assert!(chat.can_send());
        assert_eq!(chat.turns().len(), 2);
    }
}
