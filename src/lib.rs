//! # Jenxt
//!
//! 将脚本目录中的每个脚本暴露为HTTP端点，并按标签将请求分发到多个Jenkins服务器执行。

pub mod app;
pub mod shutdown;

pub use app::Application;
pub use shutdown::ShutdownManager;
