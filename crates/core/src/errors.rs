use thiserror::Error;

/// 网关错误类型定义
#[derive(Debug, Error)]
pub enum JenxtError {
    #[error("Invalid script - Meta is missing")]
    MetaMissing,

    #[error("Meta is malformed: {0}")]
    MetaMalformed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Authentication failed: HTTP {status}")]
    Authentication { status: u16 },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("No script registered for path: {path}")]
    RouteNotFound { path: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type JenxtResult<T> = Result<T, JenxtError>;

impl JenxtError {
    pub fn malformed<S: Into<String>>(msg: S) -> Self {
        Self::MetaMalformed(msg.into())
    }
    pub fn transport<S: Into<String>>(msg: S) -> Self {
        Self::Transport(msg.into())
    }
    pub fn route_not_found<S: Into<String>>(path: S) -> Self {
        Self::RouteNotFound { path: path.into() }
    }

    /// 单个远端服务器上的失败，只记录到结果中，不向上传播
    pub fn is_remote_failure(&self) -> bool {
        matches!(
            self,
            JenxtError::Authentication { .. } | JenxtError::Transport(_)
        )
    }
}

impl From<serde_json::Error> for JenxtError {
    fn from(err: serde_json::Error) -> Self {
        JenxtError::MetaMalformed(err.to_string())
    }
}
