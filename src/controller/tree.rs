//! # 项目文件树
//!
//! 自顶向下构建，只有展开过的目录才会物化子节点：
//! - 首次展开目录：返回 `NeedsListing`，调用方列出目录后通过 `populate()` 填充
//! - 已加载的目录再次点击：只切换展开/折叠，不重新读取磁盘
//!
//! 没有缓存失效机制；重新打开项目会从磁盘重建整棵树。

use serde::Serialize;

use crate::models::fs::{DirEntry, EntryKind};

/// 树中的一个节点
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub name: String,
    pub path: String,
    pub kind: EntryKind,
    pub expanded: bool,
    /// None 表示尚未加载（仅目录）
    pub children: Option<Vec<TreeNode>>,
}

impl From<DirEntry> for TreeNode {
    fn from(entry: DirEntry) -> Self {
        Self {
            name: entry.name,
            path: entry.path,
            kind: entry.kind,
            expanded: false,
            children: None,
        }
    }
}

/// 点击目录节点的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    /// 目录尚未加载，需要先列出其内容
    NeedsListing,
    Expanded,
    Collapsed,
}

/// 渲染用的扁平行
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeRow {
    pub depth: usize,
    pub name: String,
    pub path: String,
    pub kind: EntryKind,
    pub expanded: bool,
}

/// 项目文件树
#[derive(Debug, Clone)]
pub struct FileTree {
    root: String,
    nodes: Vec<TreeNode>,
}

impl FileTree {
    /// 用根目录的一层条目创建树
    pub fn new(root: impl Into<String>, entries: Vec<DirEntry>) -> Self {
        Self {
            root: root.into(),
            nodes: entries.into_iter().map(TreeNode::from).collect(),
        }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    /// 替换根目录的条目（如导入文件后刷新）
    pub fn reload_root(&mut self, entries: Vec<DirEntry>) {
        self.nodes = entries.into_iter().map(TreeNode::from).collect();
    }

    /// 点击目录节点
    ///
    /// # 错误
    /// 路径不在树中或不是目录时返回错误
    pub fn toggle(&mut self, path: &str) -> Result<Toggle, String> {
        let node = find_mut(&mut self.nodes, path)
            .ok_or_else(|| format!("文件树中没有该路径: {}", path))?;

        if node.kind != EntryKind::Directory {
            return Err(format!("不是目录: {}", path));
        }

        if node.children.is_none() {
            return Ok(Toggle::NeedsListing);
        }

        node.expanded = !node.expanded;
        Ok(if node.expanded {
            Toggle::Expanded
        } else {
            Toggle::Collapsed
        })
    }

    /// 填充目录的子节点并展开
    pub fn populate(&mut self, path: &str, entries: Vec<DirEntry>) -> Result<(), String> {
        let node = find_mut(&mut self.nodes, path)
            .ok_or_else(|| format!("文件树中没有该路径: {}", path))?;

        node.children = Some(entries.into_iter().map(TreeNode::from).collect());
        node.expanded = true;
        Ok(())
    }

    /// 按深度优先展开为可见行，折叠目录的子节点不输出
    pub fn visible_rows(&self) -> Vec<TreeRow> {
        let mut rows = Vec::new();
        collect_rows(&self.nodes, 0, &mut rows);
        rows
    }
}

fn find_mut<'a>(nodes: &'a mut [TreeNode], path: &str) -> Option<&'a mut TreeNode> {
    for node in nodes.iter_mut() {
        if node.path == path {
            return Some(node);
        }
        // 只有以该目录为前缀的路径才可能在其子树中
        if path.starts_with(node.path.as_str()) {
            if let Some(children) = node.children.as_mut() {
                if let Some(found) = find_mut(children, path) {
                    return Some(found);
                }
            }
        }
    }
    None
}

fn collect_rows(nodes: &[TreeNode], depth: usize, rows: &mut Vec<TreeRow>) {
    for node in nodes {
        rows.push(TreeRow {
            depth,
            name: node.name.clone(),
            path: node.path.clone(),
            kind: node.kind,
            expanded: node.expanded,
        });
        if node.expanded {
            if let Some(children) = &node.children {
                collect_rows(children, depth + 1, rows);
            }
        }
    }
}
