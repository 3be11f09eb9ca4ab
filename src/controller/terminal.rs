//! # 终端日志
//!
//! 每行输入作为一条独立命令执行，命令回显与 stdout/stderr 原样追加到滚动日志。

use crate::models::fs::ExecOutput;

/// 终端输出日志
#[derive(Debug, Clone, Default)]
pub struct TerminalLog {
    text: String,
}

impl TerminalLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// 回显提交的命令
    pub fn echo_command(&mut self, command: &str) {
        self.text.push_str("> ");
        self.text.push_str(command);
        self.text.push('\n');
    }

    /// 追加命令结果：成功时依次追加 stdout、stderr，失败时追加错误
    pub fn append_result(&mut self, result: &Result<ExecOutput, String>) {
        match result {
            Ok(output) => {
                self.text.push_str(&output.stdout);
                self.text.push_str(&output.stderr);
            }
            Err(e) => {
                self.text.push_str("Error: ");
                self.text.push_str(e);
                self.text.push('\n');
            }
        }
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }
}
