//! # Jenxt Core
//!
//! 网关的核心数据模型、错误类型、内容指纹以及脚本注册表。

pub mod errors;
pub mod fingerprint;
pub mod models;
pub mod registry;

pub use errors::*;
pub use fingerprint::fingerprint;
pub use models::{
    ExecutionOutcome, ParamSpec, ResultEntry, ResultEnvelope, ScriptDescriptor, ScriptMeta,
    ServerRecord,
};
pub use registry::{RegistryHandle, ScriptLoader, ScriptRegistry, ScriptWatcher};
