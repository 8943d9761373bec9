pub mod outcome;
pub mod script;
pub mod server;

pub use outcome::{ExecutionOutcome, ResultEntry, ResultEnvelope};
pub use script::{ParamSpec, ScriptDescriptor, ScriptMeta};
pub use server::ServerRecord;
