//! 模拟实现，用于在不启动真实远端服务器的情况下测试分发逻辑

use async_trait::async_trait;
use jenxt_core::{JenxtError, JenxtResult, ServerRecord};
use jenxt_dispatcher::ScriptExecutor;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// 单个服务器上预设的执行结果
#[derive(Debug, Clone)]
pub enum MockReply {
    Body(String),
    AuthenticationFailed(u16),
    Unreachable(String),
}

impl MockReply {
    fn to_result(&self) -> JenxtResult<String> {
        match self {
            MockReply::Body(body) => Ok(body.clone()),
            MockReply::AuthenticationFailed(status) => {
                Err(JenxtError::Authentication { status: *status })
            }
            MockReply::Unreachable(msg) => Err(JenxtError::transport(msg.clone())),
        }
    }
}

/// 一次被记录的调用
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub server: String,
    pub script: String,
}

/// 按服务器名称返回预设结果的执行器
///
/// 未预设的服务器返回 `Body("OK")`，可以为每个服务器设置延迟以打乱完成顺序。
#[derive(Debug, Clone, Default)]
pub struct MockExecutor {
    replies: Arc<Mutex<HashMap<String, MockReply>>>,
    delays: Arc<Mutex<HashMap<String, Duration>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reply(self, server: &str, reply: MockReply) -> Self {
        self.replies
            .lock()
            .unwrap()
            .insert(server.to_string(), reply);
        self
    }

    pub fn with_body(self, server: &str, body: &str) -> Self {
        self.with_reply(server, MockReply::Body(body.to_string()))
    }

    pub fn with_delay(self, server: &str, delay: Duration) -> Self {
        self.delays
            .lock()
            .unwrap()
            .insert(server.to_string(), delay);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl ScriptExecutor for MockExecutor {
    async fn execute(&self, server: &ServerRecord, script: &str) -> JenxtResult<String> {
        self.calls.lock().unwrap().push(RecordedCall {
            server: server.name.clone(),
            script: script.to_string(),
        });

        let delay = self.delays.lock().unwrap().get(&server.name).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let reply = self
            .replies
            .lock()
            .unwrap()
            .get(&server.name)
            .cloned()
            .unwrap_or_else(|| MockReply::Body("OK".to_string()));
        reply.to_result()
    }
}
