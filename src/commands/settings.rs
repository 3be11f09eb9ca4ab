//! # 配置 Tauri Commands
//!
//! - `read_config` - 读取当前生效的配置
//! - `save_config` - 持久化配置并立即生效
//!
//! 配置存储在 `<系统配置目录>/ollama-studio/config.json`，
//! 目录不存在时自动递归创建。

use tauri::{AppHandle, Manager};

use crate::controller::StudioStates;
use crate::models::reply::{CommandReply, Empty};
use crate::models::settings::StudioConfig;
use crate::services::config::ConfigStore;

/// 读取当前配置
#[tauri::command]
pub async fn read_config(app: AppHandle) -> CommandReply<StudioConfig> {
    CommandReply::ok(app.state::<ConfigStore>().get())
}

/// 保存配置
///
/// 新的推理服务地址、模型和超时对之后的请求生效；
/// 流式开关的默认值只影响之后新建的窗口。
#[tauri::command]
pub async fn save_config(app: AppHandle, config: StudioConfig) -> CommandReply<Empty> {
    let stream_responses = config.stream_responses;
    let result = app.state::<ConfigStore>().save(config).await;
    if result.is_ok() {
        app.state::<StudioStates>()
            .set_default_streaming(stream_responses);
        log::info!("配置已保存");
    }
    result.map(|()| Empty {}).into()
}
