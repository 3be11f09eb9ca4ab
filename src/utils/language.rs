//! # 编辑器语言识别
//!
//! 由文件扩展名推导编辑器的语言标签。扩展名到语言的映射是一张静态表，
//! 语言到标签字符串的转换是对枚举的穷尽 `match`，新增语言时编译器会提示遗漏。
//! 未知扩展名一律归为纯文本。

use std::path::Path;

use serde::Serialize;

/// 编辑器语言
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    JavaScript,
    TypeScript,
    Python,
    Html,
    Css,
    Json,
    Markdown,
    Rust,
    PlainText,
}

/// 扩展名（小写，不含点）→ 语言
const EXTENSION_TABLE: &[(&str, Language)] = &[
    ("js", Language::JavaScript),
    ("ts", Language::TypeScript),
    ("py", Language::Python),
    ("html", Language::Html),
    ("css", Language::Css),
    ("json", Language::Json),
    ("md", Language::Markdown),
    ("rs", Language::Rust),
];

impl Language {
    /// 根据文件路径的扩展名推导语言（大小写不敏感）
    pub fn from_path(path: &str) -> Self {
        let Some(ext) = Path::new(path).extension() else {
            return Language::PlainText;
        };
        let ext = ext.to_string_lossy().to_ascii_lowercase();

        EXTENSION_TABLE
            .iter()
            .find(|(candidate, _)| *candidate == ext)
            .map(|(_, language)| *language)
            .unwrap_or(Language::PlainText)
    }

    /// 编辑器组件使用的语言标签
    pub fn tag(self) -> &'static str {
        match self {
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::Python => "python",
            Language::Html => "html",
            Language::Css => "css",
            Language::Json => "json",
            Language::Markdown => "markdown",
            Language::Rust => "rust",
            Language::PlainText => "plaintext",
        }
    }
}
