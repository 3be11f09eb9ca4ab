//! # Ollama Studio - Tauri 桌面应用原生入口点
//!
//! `main.rs` 仅负责启动应用，插件注册、状态初始化和命令注册都在 `lib.rs` 中完成。

// Prevents additional console window on Windows in release, DO NOT REMOVE!!
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

fn main() {
    app_lib::run();
}
