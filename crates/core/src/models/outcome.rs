use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 单个服务器上执行一次脚本的结果
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionOutcome {
    pub server_name: String,
    pub success: bool,
    /// 文本响应为 `Value::String`，JSON模式下为解析后的结构
    pub payload: Value,
}

impl ExecutionOutcome {
    pub fn success(server_name: impl Into<String>, payload: Value) -> Self {
        Self {
            server_name: server_name.into(),
            success: true,
            payload,
        }
    }

    pub fn failure(server_name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            server_name: server_name.into(),
            success: false,
            payload: Value::String(description.into()),
        }
    }
}

/// 响应体 `results` 数组中的一项
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultEntry {
    pub server: String,
    pub response: Value,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub error: bool,
}

impl From<ExecutionOutcome> for ResultEntry {
    fn from(outcome: ExecutionOutcome) -> Self {
        Self {
            server: outcome.server_name,
            response: outcome.payload,
            error: !outcome.success,
        }
    }
}

/// 一次请求的完整响应体
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultEnvelope {
    pub results: Vec<ResultEntry>,
}
