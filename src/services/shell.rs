//! # 终端命令执行
//!
//! 把前端提交的一行文本作为一条 shell 命令执行，返回 stdout/stderr。
//!
//! **这是一项本质上不安全的能力**：没有沙箱、没有白名单、不做转义，
//! 命令边界完全信任 UI。因此它被隔离在 `ShellAccess` 之后，
//! 宿主应用必须在启动时显式调用 `ShellAccess::opt_in()` 才能使用；
//! 未授权时所有执行请求都返回错误。
//!
//! 每条命令都在进程默认工作目录下独立执行，命令内部的 `cd` 不会延续到下一条。

use tokio::process::Command;

use crate::models::fs::ExecOutput;

/// 未授权时的错误消息
pub const SHELL_DENIED_MESSAGE: &str = "终端命令执行未启用：宿主应用没有授予 shell 能力";

/// 执行任意 shell 命令的能力开关
#[derive(Debug, Clone, Copy)]
pub struct ShellAccess {
    enabled: bool,
}

impl ShellAccess {
    /// 授予执行任意命令的能力
    pub fn opt_in() -> Self {
        Self { enabled: true }
    }

    /// 不授予（默认）
    pub fn denied() -> Self {
        Self { enabled: false }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Default for ShellAccess {
    fn default() -> Self {
        Self::denied()
    }
}

/// 通过系统 shell 执行一条命令并等待结束
///
/// # 平台行为
/// - **Windows**: `cmd /C <command>`
/// - **其他平台**: `sh -c <command>`
///
/// # 错误
/// - 未授权、进程无法启动时返回错误
/// - 退出码非零时返回错误，消息中包含退出码和 stderr
pub async fn run(access: ShellAccess, command: &str) -> Result<ExecOutput, String> {
    if !access.is_enabled() {
        return Err(SHELL_DENIED_MESSAGE.to_string());
    }

    log::info!("执行终端命令: {}", command);

    #[cfg(target_os = "windows")]
    let mut cmd = {
        let mut cmd = Command::new("cmd");
        cmd.arg("/C").arg(command);
        cmd
    };

    #[cfg(not(target_os = "windows"))]
    let mut cmd = {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(command);
        cmd
    };

    let output = cmd
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|e| format!("启动命令失败: {}", e))?;

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    if !output.status.success() {
        let code = output
            .status
            .code()
            .map(|c| c.to_string())
            .unwrap_or_else(|| "信号终止".to_string());
        return Err(format!(
            "命令执行失败（退出码 {}）: {}\n{}",
            code,
            command,
            stderr.trim_end()
        ));
    }

    Ok(ExecOutput { stdout, stderr })
}
