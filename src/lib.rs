//! # Ollama Studio - 应用核心初始化模块
//!
//! 本地 LLM 聊天客户端与轻量 IDE 外壳（文件树、编辑器、终端直通）的特权进程部分：
//! - 注册 Tauri 插件（对话框、日志）
//! - 初始化应用全局状态（配置、HTTP 连接池、流式会话登记表、窗口视图状态、shell 能力）
//! - 注册命令边界上的全部 Tauri commands
//!
//! ## 模块结构
//! - `commands/` - Tauri command 处理函数（IPC 接口层，仅 `desktop` feature）
//! - `controller/` - UI 控制器：每个窗口的显式状态与用户动作流程
//! - `models/` - 数据模型（对应前端 TypeScript 类型）
//! - `services/` - HTTP 中继、文件原语、shell 执行、配置
//! - `utils/` - 通用工具函数
//!
//! 关闭 `desktop` feature 时只编译无窗口部分，控制器与服务可以独立测试。

#[cfg(feature = "desktop")]
mod commands;
pub mod controller;
pub mod models;
pub mod services;
pub mod utils;

#[cfg(feature = "desktop")]
use tauri::{Manager, WindowEvent};

#[cfg(feature = "desktop")]
use controller::StudioStates;
#[cfg(feature = "desktop")]
use services::config::ConfigStore;
#[cfg(feature = "desktop")]
use services::shell::ShellAccess;
#[cfg(feature = "desktop")]
use services::streams::StreamRegistry;

/// Tauri 应用启动函数
///
/// 1. 加载配置（不存在或损坏时使用默认值）
/// 2. 注册插件与 managed state
/// 3. 注册全部 commands
/// 4. 在 `setup` 钩子中安装日志插件
/// 5. 窗口销毁时清理该窗口的视图状态与流式会话
///
/// # Panics
/// Tauri 应用启动失败（配置缺失、窗口创建失败）时 panic。
#[cfg(feature = "desktop")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    let config = ConfigStore::load_default();
    let default_streaming = config.get().stream_responses;

    tauri::Builder::default()
        // 原生文件选择器：打开项目、新建项目、导入文件
        .plugin(tauri_plugin_dialog::init())
        .manage(config)
        // 共享连接池，所有中继请求复用
        .manage(reqwest::Client::new())
        .manage(StreamRegistry::new())
        .manage(StudioStates::new(default_streaming))
        // 终端面板需要执行任意命令，宿主在此显式授权
        .manage(ShellAccess::opt_in())
        .invoke_handler(tauri::generate_handler![
            // 推理
            commands::chat::send_message,
            commands::chat::send_message_stream,
            commands::chat::check_ollama,
            commands::chat::list_models,
            // 文件对话框
            commands::dialogs::show_open_dialog,
            commands::dialogs::show_save_dialog,
            // 终端
            commands::terminal::exec_command,
            // 文件原语
            commands::files::read_file,
            commands::files::write_file,
            commands::files::readdir,
            commands::files::stat,
            commands::files::mkdir,
            commands::files::exists,
            // 配置
            commands::settings::read_config,
            commands::settings::save_config,
            // UI 控制器
            commands::studio::studio_snapshot,
            commands::studio::studio_check_connection,
            commands::studio::studio_set_streaming,
            commands::studio::studio_send,
            commands::studio::studio_clear_chat,
            commands::studio::studio_open_project,
            commands::studio::studio_create_project,
            commands::studio::studio_toggle_dir,
            commands::studio::studio_open_file,
            commands::studio::studio_edit,
            commands::studio::studio_save_file,
            commands::studio::studio_run_command,
            commands::studio::studio_clear_terminal,
            commands::studio::studio_import_files,
        ])
        .setup(|app| {
            let level = if cfg!(debug_assertions) {
                log::LevelFilter::Info
            } else {
                log::LevelFilter::Warn
            };
            app.handle()
                .plugin(tauri_plugin_log::Builder::default().level(level).build())?;
            Ok(())
        })
        .on_window_event(|window, event| {
            if let WindowEvent::Destroyed = event {
                let label = window.label();
                // 关闭窗口即放弃其流式会话，后续到达的事件都会被丢弃
                window.state::<StreamRegistry>().forget(label);
                window.state::<StudioStates>().remove(label);
            }
        })
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
