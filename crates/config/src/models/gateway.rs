use crate::validation::{ConfigValidator, ValidationUtils};
use serde::{Deserialize, Serialize};

/// 入站HTTP服务配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl ConfigValidator for ServerConfig {
    fn validate(&self) -> crate::ConfigResult<()> {
        ValidationUtils::validate_not_empty(&self.host, "server.host")?;
        ValidationUtils::validate_port(self.port)?;
        Ok(())
    }
}

/// 脚本目录及热加载配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptsConfig {
    pub directory: String,
    pub reload_interval_seconds: u64,
}

impl Default for ScriptsConfig {
    fn default() -> Self {
        Self {
            directory: "./scripts".to_string(),
            reload_interval_seconds: 10,
        }
    }
}

impl ConfigValidator for ScriptsConfig {
    fn validate(&self) -> crate::ConfigResult<()> {
        ValidationUtils::validate_not_empty(&self.directory, "scripts.directory")?;
        ValidationUtils::validate_timeout_seconds(
            self.reload_interval_seconds,
            "scripts.reload_interval_seconds",
        )?;
        Ok(())
    }
}

/// 访问远端服务器的HTTP客户端配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// 单次远端调用的超时时间
    pub request_timeout_seconds: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            request_timeout_seconds: 30,
        }
    }
}

impl ConfigValidator for RemoteConfig {
    fn validate(&self) -> crate::ConfigResult<()> {
        ValidationUtils::validate_timeout_seconds(
            self.request_timeout_seconds,
            "remote.request_timeout_seconds",
        )
    }
}
