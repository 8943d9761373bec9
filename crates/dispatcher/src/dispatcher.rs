use std::sync::Arc;

use futures::future::join_all;
use jenxt_config::ServerDirectory;
use jenxt_core::{
    ExecutionOutcome, JenxtError, JenxtResult, RegistryHandle, ResultEnvelope, ScriptDescriptor,
    ServerRecord,
};
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::aggregator::aggregate;
use crate::client::ScriptExecutor;

/// 未指定 `label` 参数时使用的标签
pub const DEFAULT_LABEL: &str = "default";

/// 请求分发器
///
/// 每个请求只读取一次注册表快照，解析出脚本后并发地在所有匹配标签的服务器上执行。
#[derive(Clone)]
pub struct RequestDispatcher {
    registry: RegistryHandle,
    servers: Arc<ServerDirectory>,
    executor: Arc<dyn ScriptExecutor>,
}

impl RequestDispatcher {
    pub fn new(
        registry: RegistryHandle,
        servers: Arc<ServerDirectory>,
        executor: Arc<dyn ScriptExecutor>,
    ) -> Self {
        Self {
            registry,
            servers,
            executor,
        }
    }

    pub fn registry(&self) -> &RegistryHandle {
        &self.registry
    }

    pub fn servers(&self) -> &ServerDirectory {
        &self.servers
    }

    /// 处理一次请求
    ///
    /// 路径没有对应脚本时返回 `RouteNotFound`；单个服务器的失败不会让整个请求失败。
    pub async fn dispatch(&self, path: &str, label: Option<&str>) -> JenxtResult<ResultEnvelope> {
        let snapshot = self.registry.snapshot();
        let script = snapshot
            .resolve(path)
            .ok_or_else(|| JenxtError::route_not_found(path))?;

        let label = effective_label(label);
        let targets = self.servers.servers_for_label(label);
        if targets.is_empty() {
            debug!(path = %path, label = %label, "没有匹配标签的服务器");
            return Ok(ResultEnvelope::default());
        }

        info!(
            path = %path,
            label = %label,
            script = %script.source_file,
            targets = targets.len(),
            "分发脚本到远端服务器"
        );

        // join_all 按输入顺序返回结果，与完成先后无关
        let outcomes = join_all(
            targets
                .iter()
                .map(|server| self.execute_on(server, &script)),
        )
        .await;

        Ok(aggregate(outcomes))
    }

    async fn execute_on(&self, server: &ServerRecord, script: &ScriptDescriptor) -> ExecutionOutcome {
        match self.executor.execute(server, &script.script_body).await {
            Ok(body) => {
                debug!(server = %server.name, script = %script.source_file, "脚本执行成功");
                ExecutionOutcome::success(
                    server.name.clone(),
                    render_response(script.json_response, body),
                )
            }
            Err(e) => {
                if e.is_remote_failure() {
                    warn!(
                        server = %server.name,
                        script = %script.source_file,
                        error = %e,
                        "远端脚本执行失败"
                    );
                } else {
                    error!(
                        server = %server.name,
                        script = %script.source_file,
                        error = %e,
                        "远端脚本执行出现内部错误"
                    );
                }
                ExecutionOutcome::failure(server.name.clone(), e.to_string())
            }
        }
    }
}

fn effective_label(label: Option<&str>) -> &str {
    match label {
        Some(label) if !label.is_empty() => label,
        _ => DEFAULT_LABEL,
    }
}

/// 将远端响应文本转换为结果中的 `response` 值
///
/// JSON模式下按JSON解析，解析失败时为 `null`；否则原样作为字符串。
pub fn render_response(json_mode: bool, body: String) -> Value {
    if json_mode {
        serde_json::from_str(&body).unwrap_or(Value::Null)
    } else {
        Value::String(body)
    }
}
