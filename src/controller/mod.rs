//! # UI 控制器
//!
//! 窗口的全部视图状态集中在显式的 `StudioState` 结构中，由控制器持有，
//! 不依赖任何模块级全局变量，因此无需真实窗口即可测试：
//! - `chat` - 聊天记录与发送控制
//! - `tree` - 项目文件树（懒加载）
//! - `editor` - 单文档编辑器
//! - `terminal` - 终端日志
//! - `actions` - 把用户意图转为命令边界调用的异步流程
//!
//! 每个窗口一份状态，保存在 `StudioStates` 中，以窗口标签区分。
//! 前端只负责渲染 `StudioView` 快照。

pub mod actions;
pub mod chat;
pub mod editor;
pub mod terminal;
pub mod tree;

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;

use crate::models::chat::{ChatTurn, SessionId};
use crate::models::fs::DirEntry;
use crate::utils::path::display_name;

use chat::ChatPanel;
use editor::EditorDocument;
use terminal::TerminalLog;
use tree::{FileTree, TreeRow};

/// 没有打开项目时的提示
pub const NO_PROJECT_MESSAGE: &str = "请先打开或新建一个项目";

/// 推理服务连接状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Unknown,
    Connected,
    Disconnected,
}

/// 单个窗口的完整视图状态
#[derive(Debug, Clone)]
pub struct StudioState {
    pub chat: ChatPanel,
    pub tree: Option<FileTree>,
    pub editor: Option<EditorDocument>,
    pub terminal: TerminalLog,
    pub connection: ConnectionStatus,
    pub status: String,
}

impl StudioState {
    pub fn new(streaming: bool) -> Self {
        Self {
            chat: ChatPanel::new(streaming),
            tree: None,
            editor: None,
            terminal: TerminalLog::new(),
            connection: ConnectionStatus::Unknown,
            status: "就绪".to_string(),
        }
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    /// 记录连通性检查结果；失败时在聊天中追加说明
    ///
    /// # 参数
    /// - `result` - `check_live` 的结果
    /// - `endpoint` - 推理服务地址，用于提示文本
    pub fn apply_connection(&mut self, result: &Result<(), String>, endpoint: &str) {
        match result {
            Ok(()) => {
                self.connection = ConnectionStatus::Connected;
                self.set_status("已连接到 Ollama");
            }
            Err(e) => {
                self.connection = ConnectionStatus::Disconnected;
                self.set_status("未连接到 Ollama");
                self.chat.push_notice(format!(
                    "无法连接到 Ollama（{}）。请确认已运行 `ollama serve`。\n{}",
                    endpoint, e
                ));
            }
        }
    }

    /// 打开项目：用根目录的条目重建文件树
    pub fn open_project(&mut self, root: &str, entries: Vec<DirEntry>) {
        self.tree = Some(FileTree::new(root, entries));
        self.set_status(format!("已打开项目 {}", display_name(root)));
    }

    /// 当前项目根目录
    ///
    /// # 错误
    /// 没有打开项目时返回 `NO_PROJECT_MESSAGE`
    pub fn project_root(&self) -> Result<String, String> {
        self.tree
            .as_ref()
            .map(|tree| tree.root().to_string())
            .ok_or_else(|| NO_PROJECT_MESSAGE.to_string())
    }

    /// 文件读取完成：成功则替换当前文档
    pub fn open_document(&mut self, path: &str, result: Result<String, String>) {
        match result {
            Ok(text) => {
                self.editor = Some(EditorDocument::open(path, text));
                self.set_status(format!("已打开 {}", display_name(path)));
            }
            Err(e) => self.set_status(format!("打开文件失败: {}", e)),
        }
    }

    /// 编辑器内容变化
    pub fn edit_document(&mut self, text: String) {
        if let Some(doc) = self.editor.as_mut() {
            doc.edit(text);
            if doc.dirty {
                self.status = "有未保存的更改".to_string();
            }
        }
    }

    /// 生成对外快照
    pub fn view(&self) -> StudioView {
        StudioView {
            turns: self.chat.turns().to_vec(),
            can_send: self.chat.can_send(),
            streaming: self.chat.is_streaming_enabled(),
            active_session: self.chat.active_session(),
            connection: self.connection,
            status: self.status.clone(),
            project_root: self.tree.as_ref().map(|t| t.root().to_string()),
            tree: self
                .tree
                .as_ref()
                .map(|t| t.visible_rows())
                .unwrap_or_default(),
            document: self.editor.clone(),
            terminal: self.terminal.text().to_string(),
        }
    }
}

/// 推送给前端的视图快照
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudioView {
    pub turns: Vec<ChatTurn>,
    pub can_send: bool,
    pub streaming: bool,
    pub active_session: Option<SessionId>,
    pub connection: ConnectionStatus,
    pub status: String,
    pub project_root: Option<String>,
    pub tree: Vec<TreeRow>,
    pub document: Option<EditorDocument>,
    pub terminal: String,
}

/// 所有窗口的视图状态
///
/// 作为 Tauri managed state 注册。锁只在同步的状态变更期间持有，
/// 不会跨越 `.await`。
pub struct StudioStates {
    windows: Mutex<HashMap<String, StudioState>>,
    /// 新窗口聊天面板的流式开关初始值
    default_streaming: AtomicBool,
}

impl StudioStates {
    pub fn new(default_streaming: bool) -> Self {
        Self {
            windows: Mutex::new(HashMap::new()),
            default_streaming: AtomicBool::new(default_streaming),
        }
    }

    pub fn set_default_streaming(&self, enabled: bool) {
        self.default_streaming.store(enabled, Ordering::Relaxed);
    }

    /// 在窗口状态上执行一次同步变更；窗口首次出现时创建状态
    pub fn with<R>(&self, owner: &str, f: impl FnOnce(&mut StudioState) -> R) -> R {
        // 持锁期间 panic 后状态仍可继续使用
        let mut windows = self
            .windows
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let streaming = self.default_streaming.load(Ordering::Relaxed);
        let state = windows
            .entry(owner.to_string())
            .or_insert_with(|| StudioState::new(streaming));
        f(state)
    }

    /// 确保窗口状态存在；每个动作在第一次等待之前调用
    pub fn ensure(&self, owner: &str) {
        self.with(owner, |_| ());
    }

    /// 只在窗口状态仍存在时执行变更，不会重建已被移除的状态
    pub fn with_existing<R>(
        &self,
        owner: &str,
        f: impl FnOnce(&mut StudioState) -> R,
    ) -> Option<R> {
        let mut windows = self
            .windows
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        windows.get_mut(owner).map(f)
    }

    /// 把异步操作的结果写回窗口并返回新快照
    ///
    /// 等待期间窗口可能已经关闭：此时结果被丢弃，返回一份不入表的空白快照。
    pub fn settle(&self, owner: &str, f: impl FnOnce(&mut StudioState)) -> StudioView {
        self.with_existing(owner, |state| {
            f(state);
            state.view()
        })
        .unwrap_or_else(|| {
            log::debug!("窗口 {} 已关闭，丢弃异步结果", owner);
            StudioState::new(self.default_streaming.load(Ordering::Relaxed)).view()
        })
    }

    /// 当前快照
    pub fn view(&self, owner: &str) -> StudioView {
        self.with(owner, |state| state.view())
    }

    /// 窗口销毁时丢弃其状态
    pub fn remove(&self, owner: &str) {
        let mut windows = self
            .windows
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        windows.remove(owner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::chat::ChatRole;

    #[test]
    fn test_disconnected_shows_status_and_notice() {
        let mut state = StudioState::new(false);
        state.apply_connection(
            &Err("connection refused".to_string()),
            "http://localhost:11434",
        );

        let view = state.view();
        assert_eq!(view.connection, ConnectionStatus::Disconnected);
        assert_eq!(view.turns.len(), 1);
        assert_eq!(view.turns[0].role, ChatRole::Assistant);
        assert!(view.turns[0].text.contains("connection refused"));
    }

    #[test]
    fn test_project_required() {
        let mut state = StudioState::new(false);
        assert_eq!(state.project_root().unwrap_err(), NO_PROJECT_MESSAGE);

        state.open_project("/work/demo", vec![]);
        assert_eq!(state.project_root().unwrap(), "/work/demo");
        assert_eq!(state.view().project_root.as_deref(), Some("/work/demo"));
    }

    #[test]
    fn test_open_and_edit_document() {
        let mut state = StudioState::new(false);
        state.open_document("/p/main.py", Ok("print(1)".to_string()));
        assert_eq!(state.status, "已打开 main.py");

        state.edit_document("print(2)".to_string());
        assert_eq!(state.status, "有未保存的更改");
        assert!(state.view().document.unwrap().dirty);

        state.open_document("/p/missing.py", Err("not found".to_string()));
        assert!(state.status.contains("not found"));
        // 打开失败不替换当前文档
        assert_eq!(state.editor.as_ref().unwrap().path, "/p/main.py");
    }

    #[test]
    fn test_windows_are_isolated() {
        let states = StudioStates::new(true);
        states.with("main", |s| s.chat.push_notice("hello"));

        assert_eq!(states.view("main").turns.len(), 1);
        assert!(states.view("other").turns.is_empty());
        assert!(states.view("other").streaming);

        states.remove("main");
        assert!(states.view("main").turns.is_empty());
    }

    #[test]
    fn test_settle_skips_closed_window() {
        let states = StudioStates::new(false);
        states.ensure("main");
        states.remove("main");

        let view = states.settle("main", |s| s.set_status("late result"));
        assert_eq!(view.status, "就绪");
        assert!(states.with_existing("main", |_| ()).is_none());

        states.ensure("main");
        let view = states.settle("main", |s| s.set_status("fresh"));
        assert_eq!(view.status, "fresh");
    }
}
