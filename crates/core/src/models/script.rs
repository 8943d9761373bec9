use serde::{Deserialize, Serialize};

/// 脚本声明的请求参数，仅作描述，网关本身不做校验
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,
}

/// 嵌入在脚本文件 `<jenxt> ... </jenxt>` 块中的元数据
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptMeta {
    /// 对外暴露的路径（不含前导 `/`）
    pub expose: String,
    #[serde(default)]
    pub authentication: String,
    #[serde(default)]
    pub params: Vec<ParamSpec>,
    /// 是否将远端响应解析为JSON
    #[serde(default)]
    pub json_response: bool,
}

/// 从单个脚本文件加载得到的可路由单元
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptDescriptor {
    pub exposed_path: String,
    pub authentication_mode: String,
    pub expected_parameters: Vec<ParamSpec>,
    pub json_response: bool,
    /// 原始文件内容，原样发送给远端
    pub script_body: String,
    pub content_fingerprint: String,
    pub source_file: String,
}

impl ScriptDescriptor {
    pub fn from_meta(
        meta: ScriptMeta,
        source_file: impl Into<String>,
        script_body: impl Into<String>,
        content_fingerprint: impl Into<String>,
    ) -> Self {
        Self {
            exposed_path: meta.expose,
            authentication_mode: meta.authentication,
            expected_parameters: meta.params,
            json_response: meta.json_response,
            script_body: script_body.into(),
            content_fingerprint: content_fingerprint.into(),
            source_file: source_file.into(),
        }
    }

    /// 该脚本响应的HTTP路由
    pub fn route(&self) -> String {
        format!("/{}", self.exposed_path)
    }
}
