//! # 命令边界应答封装
//!
//! 命令边界上的每个请求/应答操作都返回统一的信封：
//! - 成功：`{ "success": true, ...payload }`（payload 的字段被展开到顶层）
//! - 失败：`{ "success": false, "error": "<message>" }`
//!
//! 错误只携带可读的消息文本，没有结构化错误码，前端只负责展示。

use serde::Serialize;

/// 命令边界的统一应答
///
/// 通过 `From<Result<T, String>>` 从服务层结果转换而来，
/// 保证任何失败都以 `success: false` 的值离开边界，而不是以 IPC 异常的形式。
///
/// `T` 必须序列化为 JSON 对象，其字段会被 `flatten` 到应答顶层。
#[derive(Debug, Clone, Serialize)]
pub struct CommandReply<T> {
    /// 操作是否成功
    pub success: bool,

    /// 成功时的载荷，字段展开到顶层
    #[serde(flatten)]
    pub data: Option<T>,

    /// 失败时的错误消息
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> CommandReply<T> {
    /// 构造成功应答
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// 构造失败应答
    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

impl<T> From<Result<T, String>> for CommandReply<T> {
    fn from(result: Result<T, String>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => Self::fail(e),
        }
    }
}

/// 没有载荷的成功应答（如写文件、创建目录、连通性检查）
#[derive(Debug, Clone, Default, Serialize)]
pub struct Empty {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    struct Payload {
        response: String,
    }

    #[test]
    fn test_success_flattens_payload() {
        let reply = CommandReply::ok(Payload {
            response: "4".to_string(),
        });
        let value = serde_json::to_value(&reply).unwrap();
        assert_eq!(value, json!({ "success": true, "response": "4" }));
    }

    #[test]
    fn test_failure_carries_only_message() {
        let reply: CommandReply<Payload> = Err("连接被拒绝".to_string()).into();
        let value = serde_json::to_value(&reply).unwrap();
        assert_eq!(value, json!({ "success": false, "error": "连接被拒绝" }));
    }

    #[test]
    fn test_empty_payload() {
        let value = serde_json::to_value(CommandReply::ok(Empty {})).unwrap();
        assert_eq!(value, json!({ "success": true }));
    }
}
