//! # 流式会话登记表
//!
//! 约束：每个窗口同一时刻最多一个进行中的流式会话。
//!
//! - 开始流式发送时调用 `begin()` 分配新的 `SessionId`；
//!   该窗口已有进行中的会话时直接拒绝（不排队、不取消旧会话）
//! - 每个推送事件都附带会话标识，发送前用 `is_current()` 核对，
//!   过期会话的事件被丢弃，避免两个会话的增量交错
//! - 会话收到终止事件后调用 `finish()` 释放窗口
//!
//! ## 线程安全
//! 与 Tauri managed state 一起使用，command 可能在不同线程上并发执行，
//! 内部使用 `std::sync::RwLock`，锁不会跨越 `.await` 持有。

use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::models::chat::SessionId;

/// 已有流式会话进行中时的拒绝消息
pub const STREAM_BUSY_MESSAGE: &str = "上一条回复仍在生成中，请等待完成后再发送";

/// 流式会话登记表
pub struct StreamRegistry {
    /// 单调递增的会话编号
    next_id: AtomicU64,
    /// 窗口标签 → 进行中的会话
    active: RwLock<HashMap<String, SessionId>>,
}

impl StreamRegistry {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            active: RwLock::new(HashMap::new()),
        }
    }

    /// 为窗口开始一个新会话
    ///
    /// # 错误
    /// 窗口已有进行中的会话时返回 `STREAM_BUSY_MESSAGE`
    pub fn begin(&self, owner: &str) -> Result<SessionId, String> {
        let mut active = self
            .active
            .write()
            .map_err(|e| format!("流式会话登记表不可用: {}", e))?;

        if active.contains_key(owner) {
            return Err(STREAM_BUSY_MESSAGE.to_string());
        }

        let id = SessionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        active.insert(owner.to_string(), id);
        log::debug!("窗口 {} 开始流式会话 {:?}", owner, id);
        Ok(id)
    }

    /// 会话是否仍是该窗口当前的会话
    pub fn is_current(&self, owner: &str, id: SessionId) -> bool {
        self.active
            .read()
            .map(|active| active.get(owner) == Some(&id))
            .unwrap_or(false)
    }

    /// 结束会话；只有当前会话才会被移除，返回是否移除
    pub fn finish(&self, owner: &str, id: SessionId) -> bool {
        let Ok(mut active) = self.active.write() else {
            return false;
        };
        if active.get(owner) == Some(&id) {
            active.remove(owner);
            log::debug!("窗口 {} 结束流式会话 {:?}", owner, id);
            true
        } else {
            false
        }
    }

    /// 窗口关闭时丢弃其会话，后续事件都将被视为过期
    pub fn forget(&self, owner: &str) {
        if let Ok(mut active) = self.active.write() {
            active.remove(owner);
        }
    }
}

impl Default for StreamRegistry {
    fn default() -> Self {
        Self::new()
    }
}
