//! # 控制器 Tauri Commands
//!
//! 前端的每个用户动作对应一个 `studio_*` command，由 `controller::actions`
//! 更新该窗口的 `StudioState` 并返回新的 `StudioView` 快照。
//! 流式回复在后台任务中推进，每个事件之后通过 `studio-state` 事件推送快照，
//! 同时发出与 `send_message_stream` 相同的流事件。

use tauri::{AppHandle, Emitter, Manager, Window};

use crate::commands::chat::{emit_stream_event, relay_client};
use crate::controller::actions::{self, Dispatch};
use crate::controller::{StudioStates, StudioView};
use crate::services::config::ConfigStore;
use crate::services::shell::ShellAccess;
use crate::services::streams::StreamRegistry;

pub const EVENT_STUDIO_STATE: &str = "studio-state";

fn emit_view(window: &Window, view: &StudioView) {
    if let Err(e) = window.emit_to(window.label(), EVENT_STUDIO_STATE, view.clone()) {
        log::warn!("推送视图快照到窗口 {} 失败: {}", window.label(), e);
    }
}

/// 获取窗口当前的视图快照
#[tauri::command]
pub async fn studio_snapshot(app: AppHandle, window: Window) -> StudioView {
    app.state::<StudioStates>().view(window.label())
}

/// 检查推理服务连通性并更新状态栏
#[tauri::command]
pub async fn studio_check_connection(app: AppHandle, window: Window) -> StudioView {
    let endpoint = app.state::<ConfigStore>().get().ollama_url;
    let client = relay_client(&app);
    let states = app.state::<StudioStates>();
    actions::check_connection(&states, window.label(), &client, &endpoint).await
}

/// 切换流式发送开关
#[tauri::command]
pub async fn studio_set_streaming(app: AppHandle, window: Window, enabled: bool) -> StudioView {
    app.state::<StudioStates>().with(window.label(), |state| {
        state.chat.set_streaming(enabled);
        state.view()
    })
}

/// 发送一条消息
///
/// 非流式时等待回复后返回；流式时立即返回，后续通过事件推送快照。
#[tauri::command]
pub async fn studio_send(app: AppHandle, window: Window, text: String) -> StudioView {
    let client = relay_client(&app);
    let label = window.label().to_string();

    let dispatch = {
        let states = app.state::<StudioStates>();
        let streams = app.state::<StreamRegistry>();
        actions::send(&states, &streams, &client, &label, &text).await
    };

    match dispatch {
        Dispatch::Settled(view) => view,
        Dispatch::Streaming {
            session,
            prompt,
            view,
        } => {
            tauri::async_runtime::spawn(async move {
                let states = app.state::<StudioStates>();
                let streams = app.state::<StreamRegistry>();
                actions::run_stream(
                    &states,
                    &streams,
                    &client,
                    &label,
                    session,
                    &prompt,
                    |event, view| {
                        emit_stream_event(&window, session, event);
                        emit_view(&window, &view);
                    },
                )
                .await;
            });
            view
        }
    }
}

/// 清空聊天记录
#[tauri::command]
pub async fn studio_clear_chat(app: AppHandle, window: Window) -> StudioView {
    app.state::<StudioStates>().with(window.label(), |state| {
        state.chat.clear();
        state.view()
    })
}

/// 打开项目目录
#[tauri::command]
pub async fn studio_open_project(app: AppHandle, window: Window, path: String) -> StudioView {
    let states = app.state::<StudioStates>();
    actions::open_project(&states, window.label(), &path).await
}

/// 新建项目目录并打开
#[tauri::command]
pub async fn studio_create_project(app: AppHandle, window: Window, path: String) -> StudioView {
    let states = app.state::<StudioStates>();
    actions::create_project(&states, window.label(), &path).await
}

/// 点击文件树中的目录
#[tauri::command]
pub async fn studio_toggle_dir(app: AppHandle, window: Window, path: String) -> StudioView {
    let states = app.state::<StudioStates>();
    actions::toggle_dir(&states, window.label(), &path).await
}

/// 打开文件到编辑器
#[tauri::command]
pub async fn studio_open_file(app: AppHandle, window: Window, path: String) -> StudioView {
    let states = app.state::<StudioStates>();
    actions::open_file(&states, window.label(), &path).await
}

/// 同步编辑器内容
#[tauri::command]
pub async fn studio_edit(app: AppHandle, window: Window, text: String) -> StudioView {
    app.state::<StudioStates>().with(window.label(), |state| {
        state.edit_document(text);
        state.view()
    })
}

/// 保存当前文档
#[tauri::command]
pub async fn studio_save_file(
    app: AppHandle,
    window: Window,
    text: Option<String>,
) -> StudioView {
    let states = app.state::<StudioStates>();
    actions::save_file(&states, window.label(), text).await
}

/// 在终端执行一条命令
#[tauri::command]
pub async fn studio_run_command(app: AppHandle, window: Window, command: String) -> StudioView {
    let access = *app.state::<ShellAccess>();
    let states = app.state::<StudioStates>();
    actions::run_command(&states, window.label(), access, &command).await
}

/// 清空终端日志
#[tauri::command]
pub async fn studio_clear_terminal(app: AppHandle, window: Window) -> StudioView {
    app.state::<StudioStates>().with(window.label(), |state| {
        state.terminal.clear();
        state.view()
    })
}

/// 把外部文件导入当前项目
#[tauri::command]
pub async fn studio_import_files(
    app: AppHandle,
    window: Window,
    paths: Vec<String>,
) -> StudioView {
    let states = app.state::<StudioStates>();
    actions::import_files(&states, window.label(), &paths).await
}
