//! # 原生文件对话框 Tauri Commands
//!
//! `show_open_dialog` / `show_save_dialog` 把前端传入的选项原样交给
//! `tauri-plugin-dialog` 的原生文件选择器，并把回调结果转换为
//! `{ canceled, filePaths }` / `{ canceled, filePath }`。

use std::path::Path;

use tauri::AppHandle;
use tauri_plugin_dialog::{DialogExt, FileDialogBuilder, FilePath};
use tokio::sync::oneshot;

use crate::models::dialog::{DialogOptions, OpenDialogResult, SaveDialogResult};
use crate::models::reply::CommandReply;

/// 按选项配置文件对话框
fn configure(app: &AppHandle, options: &DialogOptions) -> FileDialogBuilder<tauri::Wry> {
    let mut builder = app.dialog().file();

    if let Some(title) = &options.title {
        builder = builder.set_title(title.as_str());
    }
    if options.can_create_directories() {
        builder = builder.set_can_create_directories(true);
    }
    for filter in &options.filters {
        let extensions: Vec<&str> = filter.extensions.iter().map(String::as_str).collect();
        builder = builder.add_filter(filter.name.as_str(), &extensions);
    }
    builder
}

fn path_string(path: FilePath) -> String {
    path.to_string()
}

/// 显示打开文件/目录对话框
///
/// `properties` 中含 `openDirectory` 时选择目录，含 `multiSelections` 时允许多选。
#[tauri::command]
pub async fn show_open_dialog(
    app: AppHandle,
    options: DialogOptions,
) -> CommandReply<OpenDialogResult> {
    let mut builder = configure(&app, &options);
    if let Some(default_path) = &options.default_path {
        builder = builder.set_directory(default_path);
    }

    let (tx, rx) = oneshot::channel::<Option<Vec<FilePath>>>();
    if options.wants_directory() {
        builder.pick_folder(move |folder| {
            let _ = tx.send(folder.map(|f| vec![f]));
        });
    } else if options.wants_multiple() {
        builder.pick_files(move |files| {
            let _ = tx.send(files);
        });
    } else {
        builder.pick_file(move |file| {
            let _ = tx.send(file.map(|f| vec![f]));
        });
    }

    match rx.await {
        Ok(picked) => {
            let file_paths: Vec<String> = picked
                .unwrap_or_default()
                .into_iter()
                .map(path_string)
                .collect();
            CommandReply::ok(OpenDialogResult {
                canceled: file_paths.is_empty(),
                file_paths,
            })
        }
        Err(e) => CommandReply::fail(format!("文件对话框异常关闭: {}", e)),
    }
}

/// 显示保存文件对话框
///
/// `defaultPath` 为文件路径时，其目录作为初始目录、文件名作为默认文件名。
#[tauri::command]
pub async fn show_save_dialog(
    app: AppHandle,
    options: DialogOptions,
) -> CommandReply<SaveDialogResult> {
    let mut builder = configure(&app, &options);
    if let Some(default_path) = &options.default_path {
        let path = Path::new(default_path);
        if path.is_dir() {
            builder = builder.set_directory(path);
        } else {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                builder = builder.set_directory(parent);
            }
            if let Some(name) = path.file_name() {
                builder = builder.set_file_name(name.to_string_lossy());
            }
        }
    }

    let (tx, rx) = oneshot::channel::<Option<FilePath>>();
    builder.save_file(move |file| {
        let _ = tx.send(file);
    });

    match rx.await {
        Ok(picked) => {
            let file_path = picked.map(path_string);
            CommandReply::ok(SaveDialogResult {
                canceled: file_path.is_none(),
                file_path,
            })
        }
        Err(e) => CommandReply::fail(format!("文件对话框异常关闭: {}", e)),
    }
}
