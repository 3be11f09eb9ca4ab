//! # 工作区文件原语
//!
//! 命令边界上的文件/目录操作，全部直接转交给操作系统：
//! - `read_text` / `write_text` - 读写文本文件（整体覆盖写入）
//! - `list_dir` - 列出一层目录，条目标记为文件或目录
//! - `create_dir` - 递归创建目录
//! - `stat` / `exists` - 元数据与存在性检查
//! - `import_files` - 把外部文件逐字节复制到项目目录
//!
//! 不做路径校验，不限制在项目根目录之内，写入也不是原子的：
//! 写到一半崩溃会留下不完整的文件。

use std::path::Path;
use std::time::UNIX_EPOCH;

use crate::models::fs::{DirEntry, EntryKind, FileStat};

/// 读取 UTF-8 文本文件
pub async fn read_text(file_path: &str) -> Result<String, String> {
    tokio::fs::read_to_string(file_path)
        .await
        .map_err(|e| format!("读取文件失败 {}: {}", file_path, e))
}

/// 写入文本文件（整体覆盖）
pub async fn write_text(file_path: &str, content: &str) -> Result<(), String> {
    tokio::fs::write(file_path, content)
        .await
        .map_err(|e| format!("写入文件失败 {}: {}", file_path, e))
}

/// 列出目录的直接子条目
///
/// 结果按“目录在前、再按名称”排序，同一个未变化的目录多次列出结果完全一致。
/// 符号链接按其指向的目标判断类型，目标不可访问时按链接本身判断。
pub async fn list_dir(dir_path: &str) -> Result<Vec<DirEntry>, String> {
    let mut dir = tokio::fs::read_dir(dir_path)
        .await
        .map_err(|e| format!("读取目录失败 {}: {}", dir_path, e))?;

    let mut entries = Vec::new();
    while let Some(entry) = dir
        .next_entry()
        .await
        .map_err(|e| format!("遍历目录条目失败 {}: {}", dir_path, e))?
    {
        let path = entry.path();
        let is_dir = match tokio::fs::metadata(&path).await {
            Ok(metadata) => metadata.is_dir(),
            Err(_) => entry
                .file_type()
                .await
                .map(|t| t.is_dir())
                .unwrap_or(false),
        };

        entries.push(DirEntry {
            name: entry.file_name().to_string_lossy().to_string(),
            path: path.to_string_lossy().to_string(),
            kind: if is_dir {
                EntryKind::Directory
            } else {
                EntryKind::File
            },
        });
    }

    entries.sort_by(|a, b| a.kind.cmp(&b.kind).then_with(|| a.name.cmp(&b.name)));
    Ok(entries)
}

/// 递归创建目录（已存在时视为成功）
pub async fn create_dir(dir_path: &str) -> Result<(), String> {
    tokio::fs::create_dir_all(dir_path)
        .await
        .map_err(|e| format!("创建目录失败 {}: {}", dir_path, e))
}

/// 获取文件或目录的元数据
pub async fn stat(target: &str) -> Result<FileStat, String> {
    let metadata = tokio::fs::metadata(target)
        .await
        .map_err(|e| format!("获取元数据失败 {}: {}", target, e))?;

    let modified_ms = metadata
        .modified()
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_millis() as u64);

    Ok(FileStat {
        kind: if metadata.is_dir() {
            EntryKind::Directory
        } else {
            EntryKind::File
        },
        size: metadata.len(),
        modified_ms,
        readonly: metadata.permissions().readonly(),
    })
}

/// 路径是否存在；无法判断（如权限不足）时视为不存在
pub async fn exists(target: &str) -> bool {
    tokio::fs::try_exists(target).await.unwrap_or(false)
}

/// 把若干外部文件复制到目标目录，保留原文件名，同名文件被覆盖
///
/// # 返回值
/// 按输入顺序返回复制后的目标路径
///
/// # 错误
/// 任意一个文件复制失败即返回错误，已复制的文件保留
pub async fn import_files(sources: &[String], dest_dir: &str) -> Result<Vec<String>, String> {
    let mut copied = Vec::with_capacity(sources.len());

    for source in sources {
        let file_name = Path::new(source)
            .file_name()
            .ok_or_else(|| format!("无法确定文件名: {}", source))?;
        let dest = Path::new(dest_dir).join(file_name);

        tokio::fs::copy(source, &dest)
            .await
            .map_err(|e| format!("导入文件失败 {}: {}", source, e))?;

        copied.push(dest.to_string_lossy().to_string());
    }

    Ok(copied)
}
