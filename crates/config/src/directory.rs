use std::collections::HashMap;
use std::sync::Arc;

use jenxt_core::ServerRecord;

/// 按标签查找远端服务器
///
/// 构建时预先计算 `label → servers`，保持配置中的顺序，查找为O(1)。
#[derive(Debug, Default)]
pub struct ServerDirectory {
    servers: Vec<Arc<ServerRecord>>,
    by_label: HashMap<String, Vec<Arc<ServerRecord>>>,
}

impl ServerDirectory {
    pub fn new(servers: Vec<ServerRecord>) -> Self {
        let servers: Vec<Arc<ServerRecord>> = servers.into_iter().map(Arc::new).collect();
        let mut by_label: HashMap<String, Vec<Arc<ServerRecord>>> = HashMap::new();

        for server in &servers {
            // 同一服务器重复声明同一标签时只计一次
            let mut seen = Vec::new();
            for label in &server.labels {
                if seen.contains(&label) {
                    continue;
                }
                seen.push(label);
                by_label
                    .entry(label.clone())
                    .or_default()
                    .push(Arc::clone(server));
            }
        }

        Self { servers, by_label }
    }

    /// 带有该标签的服务器，未知标签返回空切片
    pub fn servers_for_label(&self, label: &str) -> &[Arc<ServerRecord>] {
        self.by_label
            .get(label)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn servers(&self) -> &[Arc<ServerRecord>] {
        &self.servers
    }

    pub fn labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = self.by_label.keys().map(String::as_str).collect();
        labels.sort_unstable();
        labels
    }

    pub fn len(&self) -> usize {
        self.servers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }
}
