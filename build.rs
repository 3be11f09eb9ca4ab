//! # Ollama Studio - Tauri Cargo 构建脚本
//!
//! 在编译主项目之前执行，由 `tauri-build` 生成运行时所需的资源绑定、
//! 权限清单以及 Windows 平台的应用程序清单。
//!
//! 仅在启用 `desktop` feature 时调用 Tauri 构建步骤；
//! 无窗口的核心库构建不需要 `tauri.conf.json`。

fn main() {
    #[cfg(feature = "desktop")]
    tauri_build::build();
}
