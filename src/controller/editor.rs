//! # 编辑器文档
//!
//! 同一时刻只有一个活动文档；打开其他文件时整体替换，保存时整体覆盖写回。

use serde::Serialize;

use crate::utils::language::Language;

/// 当前打开的文档
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorDocument {
    pub path: String,
    pub language: Language,
    pub text: String,
    /// 自上次打开或保存以来是否被修改
    pub dirty: bool,
}

impl EditorDocument {
    /// 用读取到的文件内容创建文档，语言由扩展名推导
    pub fn open(path: impl Into<String>, text: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            language: Language::from_path(&path),
            path,
            text: text.into(),
            dirty: false,
        }
    }

    /// 编辑器内容变化；内容相同时不标记为已修改
    pub fn edit(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text != self.text {
            self.text = text;
            self.dirty = true;
        }
    }

    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }
}
