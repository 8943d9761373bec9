use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use jenxt_core::JenxtError;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("未找到脚本: {0}")]
    NotFound(String),

    #[error("不支持的请求方法: {0}")]
    MethodNotAllowed(String),

    #[error("内部服务器错误: {0}")]
    Internal(String),
}

/// 分发只会返回 `RouteNotFound`，远端失败已记录在结果中；
/// 其余错误类型目前不会到达这里，统一映射为500。
impl From<JenxtError> for ApiError {
    fn from(err: JenxtError) -> Self {
        match err {
            JenxtError::RouteNotFound { path } => ApiError::NotFound(path),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            // 未匹配的路由只返回字面量 "404"
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "404").into_response(),
            ApiError::MethodNotAllowed(_) => (
                StatusCode::METHOD_NOT_ALLOWED,
                [(header::ALLOW, "GET, POST")],
            )
                .into_response(),
            ApiError::Internal(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": {
                        "type": "INTERNAL_ERROR",
                        "message": message,
                    }
                })),
            )
                .into_response(),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
