//! # Jenxt Dispatcher
//!
//! 将一次HTTP请求分发到标签匹配的所有远端服务器，并发执行脚本后按顺序汇总结果。

pub mod aggregator;
pub mod client;
pub mod dispatcher;

pub use aggregator::aggregate;
pub use client::{JenkinsClient, ScriptExecutor, CRUMB_HEADER, RESULT_PREFIX};
pub use dispatcher::{render_response, RequestDispatcher, DEFAULT_LABEL};
