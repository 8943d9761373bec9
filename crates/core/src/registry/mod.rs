//! 脚本注册表：脚本文件到HTTP路由的映射，以及基于内容指纹的热加载

pub mod handle;
pub mod loader;
pub mod table;
pub mod watcher;

pub use handle::RegistryHandle;
pub use loader::{extract_meta, load_content, parse_meta, ReloadOutcome, ReloadSummary, ScriptLoader};
pub use table::{DuplicateRoute, ScriptRegistry};
pub use watcher::{log_registrations, ScriptWatcher, DEFAULT_RELOAD_INTERVAL_SECONDS};

/// 网关自身保留的路由前缀
pub const RESERVED_ROUTE_PREFIX: &str = "/_";
