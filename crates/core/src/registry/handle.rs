use std::sync::Arc;

use arc_swap::ArcSwap;

use super::table::ScriptRegistry;

/// 当前生效注册表的共享引用
///
/// 写入方构建完整的新注册表后一次性替换；读取方每个请求取一次快照，
/// 因此只会看到替换前或替换后的完整注册表。
#[derive(Debug, Clone)]
pub struct RegistryHandle {
    current: Arc<ArcSwap<ScriptRegistry>>,
}

impl RegistryHandle {
    pub fn new(registry: ScriptRegistry) -> Self {
        Self {
            current: Arc::new(ArcSwap::from_pointee(registry)),
        }
    }

    pub fn snapshot(&self) -> Arc<ScriptRegistry> {
        self.current.load_full()
    }

    pub fn publish(&self, registry: ScriptRegistry) {
        self.current.store(Arc::new(registry));
    }
}

impl Default for RegistryHandle {
    fn default() -> Self {
        Self::new(ScriptRegistry::default())
    }
}
