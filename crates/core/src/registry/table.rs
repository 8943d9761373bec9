use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::models::ScriptDescriptor;

/// 同一路由被多个文件声明时的记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateRoute {
    pub route: String,
    /// 被覆盖的文件
    pub shadowed: String,
    /// 最终生效的文件
    pub winner: String,
}

/// 某一时刻的脚本注册表快照，构建完成后不可变
///
/// `scripts` 以源文件名为键；路由表按文件名字典序构建，
/// 多个文件声明同一路由时字典序最后的文件生效。
#[derive(Debug, Default)]
pub struct ScriptRegistry {
    scripts: BTreeMap<String, Arc<ScriptDescriptor>>,
    routes: HashMap<String, Arc<ScriptDescriptor>>,
    duplicates: Vec<DuplicateRoute>,
    rejected: BTreeMap<String, String>,
}

impl ScriptRegistry {
    pub fn new(
        scripts: BTreeMap<String, Arc<ScriptDescriptor>>,
        rejected: BTreeMap<String, String>,
    ) -> Self {
        let mut routes: HashMap<String, Arc<ScriptDescriptor>> = HashMap::new();
        let mut duplicates = Vec::new();

        for descriptor in scripts.values() {
            let route = descriptor.route();
            if let Some(previous) = routes.insert(route.clone(), Arc::clone(descriptor)) {
                duplicates.push(DuplicateRoute {
                    route,
                    shadowed: previous.source_file.clone(),
                    winner: descriptor.source_file.clone(),
                });
            }
        }

        Self {
            scripts,
            routes,
            duplicates,
            rejected,
        }
    }

    /// 按请求路径查找脚本
    pub fn resolve(&self, path: &str) -> Option<Arc<ScriptDescriptor>> {
        self.routes.get(path).cloned()
    }

    /// 按源文件名查找脚本
    pub fn get(&self, source_file: &str) -> Option<&Arc<ScriptDescriptor>> {
        self.scripts.get(source_file)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Arc<ScriptDescriptor>)> {
        self.scripts.iter()
    }

    /// 当前生效的路由，按字典序排列
    pub fn routes(&self) -> Vec<String> {
        let mut routes: Vec<String> = self.routes.keys().cloned().collect();
        routes.sort();
        routes
    }

    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    pub fn duplicates(&self) -> &[DuplicateRoute] {
        &self.duplicates
    }

    pub(crate) fn rejected_fingerprint(&self, source_file: &str) -> Option<&str> {
        self.rejected.get(source_file).map(String::as_str)
    }

    pub(crate) fn same_rejections(&self, other: &ScriptRegistry) -> bool {
        self.rejected == other.rejected
    }

    pub fn len(&self) -> usize {
        self.scripts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty()
    }
}
