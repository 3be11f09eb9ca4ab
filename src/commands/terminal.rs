//! # 终端 Tauri Command
//!
//! `exec_command` 执行任意 shell 命令字符串：不沙箱、不过滤、不转义。
//! 只有宿主在启动时通过 `ShellAccess::opt_in()` 授权后才可用。

use tauri::{AppHandle, Manager};

use crate::models::fs::ExecOutput;
use crate::models::reply::CommandReply;
use crate::services::shell::{self, ShellAccess};

/// 执行一条 shell 命令
///
/// # 返回值
/// `{ success: true, stdout, stderr }` 或 `{ success: false, error }`
#[tauri::command]
pub async fn exec_command(app: AppHandle, command: String) -> CommandReply<ExecOutput> {
    let access = *app.state::<ShellAccess>();
    shell::run(access, &command).await.into()
}
