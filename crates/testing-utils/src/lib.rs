//! # Jenxt Testing Utils
//!
//! 各crate共享的测试工具：模拟执行器、测试数据构建器以及脚本目录辅助函数。
//!
//! ```toml
//! [dev-dependencies]
//! jenxt-testing-utils = { path = "../testing-utils" }
//! ```

pub mod builders;
pub mod helpers;
pub mod mocks;

pub use builders::*;
pub use helpers::*;
pub use mocks::*;
