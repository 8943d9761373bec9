pub mod app_config;
pub mod gateway;

pub use app_config::*;
pub use gateway::*;
