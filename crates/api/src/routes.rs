use axum::{routing::get, Router};
use jenxt_dispatcher::RequestDispatcher;

use crate::handlers::{health::health_check, scripts::handle_script};

/// API应用状态
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: RequestDispatcher,
}

/// 创建API路由
///
/// `/_` 前缀保留给网关自身，其余路径全部交给脚本处理器。
pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .route("/_health", get(health_check))
        .fallback(handle_script)
        .with_state(state)
}
