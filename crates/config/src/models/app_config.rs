use anyhow::{Context, Result};
use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use jenxt_core::ServerRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

use super::gateway::{RemoteConfig, ScriptsConfig, ServerConfig};
use crate::validation::{ConfigValidator, ValidationUtils};

const DEFAULT_CONFIG_PATHS: [&str; 3] = ["jenxt.json", "config/jenxt.json", "config/jenxt.toml"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub scripts: ScriptsConfig,
    pub remote: RemoteConfig,
    pub remotes: Vec<ServerRecord>,
}

impl AppConfig {
    /// 从配置文件和 `JENXT__` 前缀的环境变量加载配置
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut builder = ConfigBuilder::builder();

        if let Some(path) = config_path {
            if Path::new(path).exists() {
                debug!("加载配置文件: {}", path);
                builder = builder.add_source(File::new(path, file_format(path)));
            } else {
                return Err(anyhow::anyhow!("配置文件不存在: {}", path));
            }
        } else if let Some(path) = DEFAULT_CONFIG_PATHS
            .iter()
            .find(|path| Path::new(path).exists())
        {
            debug!("加载默认配置文件: {}", path);
            builder = builder.add_source(File::new(path, file_format(path)));
        } else {
            info!("未找到配置文件，使用默认配置和环境变量");
        }

        builder = builder.add_source(
            Environment::with_prefix("JENXT")
                .separator("__")
                .try_parsing(true),
        );

        let mut config: AppConfig = builder
            .build()
            .context("构建配置失败")?
            .try_deserialize()
            .context("反序列化配置失败")?;

        config.normalize();
        config.validate()?;

        Ok(config)
    }

    pub fn from_json(json_str: &str) -> Result<Self> {
        let mut config: AppConfig = serde_json::from_str(json_str).context("解析JSON配置失败")?;
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    /// 去掉远端URL末尾的 `/`，保证 `{url}/scriptText` 格式正确
    fn normalize(&mut self) {
        for remote in &mut self.remotes {
            let trimmed = remote.base_url.trim().trim_end_matches('/').to_string();
            remote.base_url = trimmed;
        }
    }
}

impl ConfigValidator for AppConfig {
    fn validate(&self) -> crate::ConfigResult<()> {
        self.server.validate()?;
        self.scripts.validate()?;
        self.remote.validate()?;

        let mut names = HashSet::new();
        for remote in &self.remotes {
            ValidationUtils::validate_not_empty(&remote.name, "remotes.name")?;
            ValidationUtils::validate_http_url(&remote.base_url, "remotes.url")?;
            if !names.insert(remote.name.as_str()) {
                return Err(crate::ConfigError::Validation(format!(
                    "duplicate remote name: {}",
                    remote.name
                )));
            }
        }

        Ok(())
    }
}

fn file_format(path: &str) -> FileFormat {
    match Path::new(path).extension().and_then(|ext| ext.to_str()) {
        Some("toml") => FileFormat::Toml,
        _ => FileFormat::Json,
    }
}
