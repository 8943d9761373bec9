//! # Jenxt API
//!
//! 网关的HTTP入口：注册表中的每个脚本对应一个路由，请求交给 `RequestDispatcher`
//! 分发到远端服务器，结果以JSON返回。
//!
//! 路由表随脚本目录热加载变化，因此脚本路由不在axum中静态注册，
//! 而是由fallback处理器在每次请求时查询当前注册表快照。

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;

use axum::Router;
use jenxt_dispatcher::RequestDispatcher;
use tower::ServiceBuilder;

use middleware::{request_logging, trace_layer};
use routes::{create_routes, AppState};

pub use error::ApiError;

pub fn create_app(dispatcher: RequestDispatcher) -> Router {
    let state = AppState { dispatcher };

    create_routes(state).layer(
        ServiceBuilder::new()
            .layer(trace_layer())
            .layer(axum::middleware::from_fn(request_logging)),
    )
}
