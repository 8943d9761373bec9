use axum::{
    extract::{Query, State},
    http::{Method, Uri},
    Json,
};
use jenxt_core::{JenxtError, ResultEnvelope};
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::routes::AppState;

/// 查询字符串按出现顺序保留，重复的参数不会导致解析失败
pub type QueryPairs = Vec<(String, String)>;

/// 取第一个 `label` 参数
fn first_label(pairs: &QueryPairs) -> Option<&str> {
    pairs
        .iter()
        .find(|(key, _)| key == "label")
        .map(|(_, value)| value.as_str())
}

/// 执行路径对应的脚本
///
/// 未注册的路径对任何方法都返回404；已注册的路径只接受 GET 和 POST。
pub async fn handle_script(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    Query(pairs): Query<QueryPairs>,
) -> ApiResult<Json<ResultEnvelope>> {
    let path = uri.path();

    if method != Method::GET && method != Method::POST {
        if state.dispatcher.registry().snapshot().resolve(path).is_none() {
            info!(path = %path, "请求未匹配到脚本");
            return Err(JenxtError::route_not_found(path).into());
        }
        return Err(ApiError::MethodNotAllowed(method.to_string()));
    }

    let envelope = state
        .dispatcher
        .dispatch(path, first_label(&pairs))
        .await
        .inspect_err(|e| info!(path = %path, error = %e, "请求未匹配到脚本"))?;

    Ok(Json(envelope))
}
