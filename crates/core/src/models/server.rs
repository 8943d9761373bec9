use std::fmt;

use serde::{Deserialize, Serialize};

/// 可执行脚本的远端Jenkins服务器
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerRecord {
    pub name: String,
    #[serde(rename = "url")]
    pub base_url: String,
    #[serde(default)]
    pub username: String,
    #[serde(rename = "password", default)]
    pub secret: String,
    #[serde(default)]
    pub labels: Vec<String>,
}

impl ServerRecord {
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    pub fn crumb_url(&self) -> String {
        format!("{}/crumbIssuer/api/xml?xpath=//crumb", self.base_url)
    }

    pub fn script_url(&self) -> String {
        format!("{}/scriptText", self.base_url)
    }
}

impl fmt::Debug for ServerRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerRecord")
            .field("name", &self.name)
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("secret", &"***")
            .field("labels", &self.labels)
            .finish()
    }
}
