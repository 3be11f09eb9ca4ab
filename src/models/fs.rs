//! # 文件系统数据模型
//!
//! 工作区文件原语在 IPC 上传输的结构：目录条目、文件元数据、文本内容等。

use serde::Serialize;

/// 条目类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    // 声明顺序决定排序：目录在前
    Directory,
    File,
}

/// 目录中的一个条目（仅一层，不递归）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirEntry {
    /// 文件名
    pub name: String,
    /// 完整路径（父目录与文件名拼接）
    pub path: String,
    /// 文件还是目录
    pub kind: EntryKind,
}

/// `readdir` 的成功载荷
#[derive(Debug, Clone, Serialize)]
pub struct DirListing {
    pub entries: Vec<DirEntry>,
}

/// `read_file` 的成功载荷
#[derive(Debug, Clone, Serialize)]
pub struct FileContent {
    pub content: String,
}

/// `exists` 的成功载荷
#[derive(Debug, Clone, Serialize)]
pub struct Existence {
    pub exists: bool,
}

/// `stat` 的成功载荷
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileStat {
    pub kind: EntryKind,
    /// 字节数
    pub size: u64,
    /// 最后修改时间（Unix 毫秒），平台不支持时为 None
    pub modified_ms: Option<u64>,
    pub readonly: bool,
}

/// `exec_command` 的成功载荷
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExecOutput {
    pub stdout: String,
    pub stderr: String,
}
