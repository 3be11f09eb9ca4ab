//! # 通用工具函数
//!
//! - `path` - 配置目录定位、路径展示
//! - `language` - 文件扩展名到编辑器语言的映射

pub mod language;
pub mod path;
