//! 测试数据构建器

use jenxt_core::ServerRecord;
use serde_json::{json, Value};

/// 构建测试用的 `ServerRecord`
pub struct ServerRecordBuilder {
    server: ServerRecord,
}

impl ServerRecordBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            server: ServerRecord {
                name: name.to_string(),
                base_url: format!("http://{name}.jenkins.test"),
                username: "admin".to_string(),
                secret: "token".to_string(),
                labels: vec!["default".to_string()],
            },
        }
    }

    pub fn with_url(mut self, url: &str) -> Self {
        self.server.base_url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_labels(mut self, labels: &[&str]) -> Self {
        self.server.labels = labels.iter().map(|l| l.to_string()).collect();
        self
    }

    pub fn build(self) -> ServerRecord {
        self.server
    }
}

/// 构建带 `<jenxt>` 元数据块的脚本内容
pub struct ScriptBuilder {
    meta: Value,
    body: String,
}

impl ScriptBuilder {
    pub fn new(expose: &str) -> Self {
        Self {
            meta: json!({ "expose": expose }),
            body: "println 'OK'".to_string(),
        }
    }

    pub fn json_response(mut self) -> Self {
        self.meta["jsonResponse"] = Value::Bool(true);
        self
    }

    pub fn with_body(mut self, body: &str) -> Self {
        self.body = body.to_string();
        self
    }

    pub fn build(self) -> String {
        format!("/*<jenxt>\n{}\n</jenxt>*/\n{}\n", self.meta, self.body)
    }
}
