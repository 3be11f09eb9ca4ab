//! # 原生文件对话框数据模型
//!
//! 前端以 `{ title, defaultPath, properties, filters }` 描述对话框，
//! 原样转交给原生文件选择器，不做额外校验。

use serde::{Deserialize, Serialize};

/// 文件类型过滤器
#[derive(Debug, Clone, Deserialize)]
pub struct DialogFilter {
    pub name: String,
    pub extensions: Vec<String>,
}

/// 对话框选项
///
/// `properties` 支持 `openFile`、`openDirectory`、`multiSelections`、`createDirectory`，
/// 未识别的取值被忽略。
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DialogOptions {
    pub title: Option<String>,
    pub default_path: Option<String>,
    pub properties: Vec<String>,
    pub filters: Vec<DialogFilter>,
}

impl DialogOptions {
    fn has(&self, property: &str) -> bool {
        self.properties.iter().any(|p| p == property)
    }

    /// 是否选择目录而非文件
    pub fn wants_directory(&self) -> bool {
        self.has("openDirectory")
    }

    /// 是否允许多选
    pub fn wants_multiple(&self) -> bool {
        self.has("multiSelections")
    }

    /// 是否允许在对话框中新建目录
    pub fn can_create_directories(&self) -> bool {
        self.has("createDirectory")
    }
}

/// 打开对话框的结果
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenDialogResult {
    pub canceled: bool,
    pub file_paths: Vec<String>,
}

/// 保存对话框的结果
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveDialogResult {
    pub canceled: bool,
    pub file_path: Option<String>,
}
