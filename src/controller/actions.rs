//! # 控制器流程
//!
//! 把用户意图转换为命令边界背后的服务调用，并把结果写回窗口状态。
//! 这里不依赖 Tauri：窗口以标签字符串表示，推送通过回调完成，
//! 命令层只负责注入依赖、派生流式任务和发出事件。
//!
//! 所有失败都渲染进视图（状态栏、聊天记录或终端日志），流程本身不返回错误。

use crate::controller::chat::SendMode;
use crate::controller::tree::Toggle;
use crate::controller::{StudioStates, StudioView};
use crate::models::chat::{SessionId, StreamEvent};
use crate::services::ollama::OllamaClient;
use crate::services::shell::{self, ShellAccess};
use crate::services::streams::StreamRegistry;
use crate::services::workspace;
use crate::utils::path::display_name;

/// 发送后的去向
#[derive(Debug, Clone)]
pub enum Dispatch {
    /// 已有最终结果（非流式完成、或发送被拒绝）
    Settled(StudioView),
    /// 流式会话已分配，调用方需要通过 `run_stream` 驱动它
    Streaming {
        session: SessionId,
        prompt: String,
        view: StudioView,
    },
}

/// 检查推理服务连通性
pub async fn check_connection(
    states: &StudioStates,
    owner: &str,
    client: &OllamaClient,
    endpoint: &str,
) -> StudioView {
    states.ensure(owner);
    let result = client.check_live().await;
    if let Err(e) = &result {
        log::warn!("Ollama 连通性检查失败: {}", e);
    }
    states.settle(owner, |state| state.apply_connection(&result, endpoint))
}

/// 发送一条消息
///
/// 按面板的流式开关选择方式：非流式直接等待结果；
/// 流式只负责分配会话并返回 `Dispatch::Streaming`，由调用方派生任务执行 `run_stream`。
pub async fn send(
    states: &StudioStates,
    streams: &StreamRegistry,
    client: &OllamaClient,
    owner: &str,
    text: &str,
) -> Dispatch {
    let outgoing = states.with(owner, |state| match state.chat.begin_send(text) {
        Ok(outgoing) => Ok(outgoing),
        Err(e) => {
            state.set_status(e);
            Err(state.view())
        }
    });
    let outgoing = match outgoing {
        Ok(outgoing) => outgoing,
        Err(view) => return Dispatch::Settled(view),
    };

    match outgoing.mode {
        SendMode::Buffered => {
            let result = client.generate(&outgoing.prompt).await;
            if let Err(e) = &result {
                log::warn!("非流式生成失败: {}", e);
            }
            Dispatch::Settled(states.settle(owner, |state| {
                state.chat.complete_buffered(result);
            }))
        }
        SendMode::Streaming => match streams.begin(owner) {
            Ok(session) => {
                let view = states.with(owner, |state| {
                    state.chat.attach_stream(session);
                    state.view()
                });
                Dispatch::Streaming {
                    session,
                    prompt: outgoing.prompt,
                    view,
                }
            }
            Err(e) => Dispatch::Settled(states.with(owner, |state| {
                state.chat.abort_send(&e);
                state.view()
            })),
        },
    }
}

/// 中继一个已登记的流式会话，只把仍属于该窗口当前会话的事件交给 `on_event`
///
/// 会话被替换或窗口关闭后到达的事件被丢弃；终止事件到达时会话从登记表中结束。
/// 命令层的 `send_message_stream` 与控制器的 `run_stream` 共用这一过滤。
pub async fn relay_session<F>(
    streams: &StreamRegistry,
    client: &OllamaClient,
    owner: &str,
    session: SessionId,
    prompt: &str,
    mut on_event: F,
) where
    F: FnMut(&StreamEvent) + Send,
{
    client
        .generate_stream(prompt, |event| {
            if !streams.is_current(owner, session) {
                return;
            }
            if event.is_terminal() {
                streams.finish(owner, session);
                if let StreamEvent::Error(e) = &event {
                    log::warn!("流式会话 {:?} 出错: {}", session, e);
                }
            }
            on_event(&event);
        })
        .await;
}

/// 驱动一个流式会话直到终止
///
/// 每个属于当前会话的事件都会先写入窗口状态，再连同新快照交给 `notify`。
pub async fn run_stream<F>(
    states: &StudioStates,
    streams: &StreamRegistry,
    client: &OllamaClient,
    owner: &str,
    session: SessionId,
    prompt: &str,
    mut notify: F,
) where
    F: FnMut(&StreamEvent, StudioView) + Send,
{
    relay_session(streams, client, owner, session, prompt, |event| {
        let view = states.settle(owner, |state| {
            state.chat.apply_stream_event(session, event);
        });
        notify(event, view);
    })
    .await;
}

/// 打开项目目录
pub async fn open_project(states: &StudioStates, owner: &str, root: &str) -> StudioView {
    states.ensure(owner);
    let listing = workspace::list_dir(root).await;
    states.settle(owner, |state| match listing {
        Ok(entries) => state.open_project(root, entries),
        Err(e) => state.set_status(e),
    })
}

/// 新建项目目录并打开
pub async fn create_project(states: &StudioStates, owner: &str, root: &str) -> StudioView {
    states.ensure(owner);
    if let Err(e) = workspace::create_dir(root).await {
        return states.settle(owner, |state| state.set_status(e));
    }
    let view = open_project(states, owner, root).await;
    states.settle(owner, |state| {
        if view.project_root.as_deref() == Some(root) {
            state.set_status(format!("已新建项目 {}", display_name(root)));
        }
    })
}

/// 点击文件树中的目录
pub async fn toggle_dir(states: &StudioStates, owner: &str, path: &str) -> StudioView {
    let toggle = states.with(owner, |state| match state.tree.as_mut() {
        Some(tree) => tree.toggle(path),
        None => Err(super::NO_PROJECT_MESSAGE.to_string()),
    });

    match toggle {
        Ok(Toggle::NeedsListing) => {
            let listing = workspace::list_dir(path).await;
            states.settle(owner, |state| {
                let populated = listing.and_then(|entries| match state.tree.as_mut() {
                    Some(tree) => tree.populate(path, entries),
                    None => Err(super::NO_PROJECT_MESSAGE.to_string()),
                });
                if let Err(e) = populated {
                    state.set_status(e);
                }
            })
        }
        Ok(_) => states.view(owner),
        Err(e) => states.with(owner, |state| {
            state.set_status(e);
            state.view()
        }),
    }
}

/// 打开文件到编辑器
pub async fn open_file(states: &StudioStates, owner: &str, path: &str) -> StudioView {
    states.ensure(owner);
    let result = workspace::read_text(path).await;
    states.settle(owner, |state| state.open_document(path, result))
}

/// 保存当前文档（整体覆盖写回）
///
/// # 参数
/// - `text` - 编辑器的最新内容；为 None 时保存控制器中已同步的内容
pub async fn save_file(states: &StudioStates, owner: &str, text: Option<String>) -> StudioView {
    let target = states.with(owner, |state| {
        if let Some(text) = text {
            state.edit_document(text);
        }
        if let Some(doc) = &state.editor {
            return Ok((doc.path.clone(), doc.text.clone()));
        }
        state.set_status("没有打开的文件");
        Err(state.view())
    });
    let (path, content) = match target {
        Ok(target) => target,
        Err(view) => return view,
    };

    let result = workspace::write_text(&path, &content).await;
    states.settle(owner, |state| match result {
        Ok(()) => {
            // 写入期间文档可能已被替换或再次修改，只在内容一致时清除标记
            if let Some(doc) = state.editor.as_mut() {
                if doc.path == path && doc.text == content {
                    doc.mark_saved();
                }
            }
            state.set_status(format!("已保存 {}", display_name(&path)));
        }
        Err(e) => state.set_status(e),
    })
}

/// 在终端中执行一条命令
pub async fn run_command(
    states: &StudioStates,
    owner: &str,
    access: ShellAccess,
    command: &str,
) -> StudioView {
    states.with(owner, |state| state.terminal.echo_command(command));
    let result = shell::run(access, command).await;
    states.settle(owner, |state| state.terminal.append_result(&result))
}

/// 把外部文件导入项目根目录，然后刷新文件树
pub async fn import_files(states: &StudioStates, owner: &str, paths: &[String]) -> StudioView {
    let root = states.with(owner, |state| state.project_root());
    let root = match root {
        Ok(root) => root,
        Err(e) => {
            return states.with(owner, |state| {
                state.set_status(e);
                state.view()
            });
        }
    };

    let imported = workspace::import_files(paths, &root).await;
    let listing = workspace::list_dir(&root).await;
    states.settle(owner, |state| {
        match imported {
            Ok(copied) => state.set_status(format!("已导入 {} 个文件", copied.len())),
            Err(e) => state.set_status(e),
        }
        if let (Ok(entries), Some(tree)) = (listing, state.tree.as_mut()) {
            tree.reload_root(entries);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::controller::ConnectionStatus;
    use crate::models::chat::{ChatRole, ChatTurn};

    const OWNER: &str = "main";

    fn client_for(uri: String) -> OllamaClient {
        OllamaClient::new(reqwest::Client::new(), uri, "gpt-oss", Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_buffered_send_scenario() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "response": "4", "done": true })),
            )
            .mount(&server)
            .await;

        let states = StudioStates::new(false);
        let streams = StreamRegistry::new();
        let client = client_for(server.uri());

        let Dispatch::Settled(view) = send(&states, &streams, &client, OWNER, "2+2?").await else {
            panic!("buffered send should settle");
        };
        assert!(view.can_send);
        assert_eq!(
            view.turns,
            vec![ChatTurn::user("2+2?"), ChatTurn::assistant("4")]
        );
    }

    #[tokio::test]
    async fn test_streaming_send_scenario() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                "{\"response\":\"Hel\"}\n{\"response\":\"lo\"}\n{\"done\":true}\n",
            ))
            .mount(&server)
            .await;

        let states = StudioStates::new(true);
        let streams = StreamRegistry::new();
        let client = client_for(server.uri());

        let Dispatch::Streaming {
            session,
            prompt,
            view,
        } = send(&states, &streams, &client, OWNER, "say hello").await
        else {
            panic!("streaming send should hand back a session");
        };
        assert!(!view.can_send);
        assert_eq!(view.active_session, Some(session));

        // 会话进行中再次发送被拒绝
        let Dispatch::Settled(rejected) = send(&states, &streams, &client, OWNER, "again").await
        else {
            panic!("second send should be rejected");
        };
        assert_eq!(rejected.turns.len(), 2);

        let mut pushed = Vec::new();
        run_stream(&states, &streams, &client, OWNER, session, &prompt, |event, view| {
            pushed.push((event.clone(), view.turns.last().map(|t| t.text.clone())));
        })
        .await;

        assert_eq!(pushed.len(), 3);
        assert_eq!(pushed[0].1.as_deref(), Some("Hel"));
        assert_eq!(pushed[2].0, StreamEvent::Done);

        let view = states.view(OWNER);
        assert!(view.can_send);
        assert_eq!(view.turns.last().unwrap().text, "Hello");
        assert!(!streams.is_current(OWNER, session));
    }

    #[tokio::test]
    async fn test_relay_session_drops_forgotten_session() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                "{\"response\":\"Hel\"}\n{\"response\":\"lo\"}\n{\"done\":true}\n",
            ))
            .mount(&server)
            .await;

        let streams = StreamRegistry::new();
        let client = client_for(server.uri());

        let stale = streams.begin(OWNER).unwrap();
        streams.forget(OWNER);
        let mut events = Vec::new();
        relay_session(&streams, &client, OWNER, stale, "hi", |event| {
            events.push(event.clone())
        })
        .await;
        assert!(events.is_empty());

        let session = streams.begin(OWNER).unwrap();
        relay_session(&streams, &client, OWNER, session, "hi", |event| {
            events.push(event.clone())
        })
        .await;
        assert_eq!(
            events,
            vec![
                StreamEvent::Delta("Hel".to_string()),
                StreamEvent::Delta("lo".to_string()),
                StreamEvent::Done,
            ]
        );
        // 终止事件之后会话已结束，可以开始下一个
        assert!(!streams.is_current(OWNER, session));
        assert!(streams.begin(OWNER).is_ok());
    }

    #[tokio::test]
    async fn test_closed_window_is_not_recreated_by_late_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "response": "4", "done": true }))
                    .set_delay(Duration::from_millis(300)),
            )
            .mount(&server)
            .await;

        let states = StudioStates::new(false);
        let streams = StreamRegistry::new();
        let client = client_for(server.uri());

        let close_window = async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            states.remove(OWNER);
        };
        let (dispatch, ()) = tokio::join!(
            send(&states, &streams, &client, OWNER, "2+2?"),
            close_window
        );

        assert!(matches!(dispatch, Dispatch::Settled(_)));
        assert!(states.with_existing(OWNER, |_| ()).is_none());
    }

    #[tokio::test]
    async fn test_unreachable_server_marks_disconnected() {
        let uri = {
            let server = MockServer::start().await;
            server.uri()
        };
        let states = StudioStates::new(false);
        let client = client_for(uri.clone());

        let view = check_connection(&states, OWNER, &client, &uri).await;
        assert_eq!(view.connection, ConnectionStatus::Disconnected);
        assert_eq!(view.turns.len(), 1);
        assert_eq!(view.turns[0].role, ChatRole::Assistant);
    }

    #[tokio::test]
    async fn test_project_tree_open_and_save() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("src")).unwrap();
        std::fs::write(dir.path().join("src").join("app.js"), "let a = 1;").unwrap();
        let root = dir.path().to_string_lossy().to_string();
        let src = dir.path().join("src").to_string_lossy().to_string();
        let app = dir
            .path()
            .join("src")
            .join("app.js")
            .to_string_lossy()
            .to_string();

        let states = StudioStates::new(false);
        let view = open_project(&states, OWNER, &root).await;
        assert_eq!(view.tree.len(), 1);

        let view = toggle_dir(&states, OWNER, &src).await;
        assert_eq!(view.tree.len(), 2);
        assert_eq!(view.tree[1].path, app);

        let view = open_file(&states, OWNER, &app).await;
        let doc = view.document.unwrap();
        assert_eq!(doc.text, "let a = 1;");
        assert_eq!(doc.language.tag(), "javascript");

        let view = save_file(&states, OWNER, Some("let a = 2;".to_string())).await;
        assert!(!view.document.unwrap().dirty);
        assert_eq!(std::fs::read_to_string(&app).unwrap(), "let a = 2;");

        // 折叠不重新读取：删除磁盘上的目录后再次切换仍然成功
        std::fs::remove_dir_all(dir.path().join("src")).unwrap();
        let view = toggle_dir(&states, OWNER, &src).await;
        assert_eq!(view.tree.len(), 1);
    }

    #[tokio::test]
    async fn test_import_requires_project() {
        let states = StudioStates::new(false);
        let view = import_files(&states, OWNER, &["/tmp/x".to_string()]).await;
        assert_eq!(view.status, crate::controller::NO_PROJECT_MESSAGE);
    }

    #[tokio::test]
    async fn test_create_project_and_import() {
        let base = tempfile::tempdir().unwrap();
        let outside = tempfile::tempdir().unwrap();
        let source = outside.path().join("data.csv");
        std::fs::write(&source, "a,b\n").unwrap();
        let root = base
            .path()
            .join("new-project")
            .to_string_lossy()
            .to_string();

        let states = StudioStates::new(false);
        let view = create_project(&states, OWNER, &root).await;
        assert_eq!(view.project_root.as_deref(), Some(root.as_str()));
        assert!(view.tree.is_empty());

        let view = import_files(
            &states,
            OWNER,
            &[source.to_string_lossy().to_string()],
        )
        .await;
        assert_eq!(view.tree.len(), 1);
        assert_eq!(view.tree[0].name, "data.csv");
    }

    #[cfg(not(target_os = "windows"))]
    #[tokio::test]
    async fn test_terminal_command_appends_output() {
        let states = StudioStates::new(false);
        let view = run_command(&states, OWNER, ShellAccess::opt_in(), "echo hi").await;
        assert_eq!(view.terminal, "> echo hi\nhi\n");

        let view = run_command(&states, OWNER, ShellAccess::denied(), "echo hi").await;
        assert!(view.terminal.ends_with(&format!(
            "Error: {}\n",
            crate::services::shell::SHELL_DENIED_MESSAGE
        )));
    }
}
