use std::time::Duration;

use async_trait::async_trait;
use jenxt_core::{JenxtError, JenxtResult, ServerRecord};
use reqwest::StatusCode;
use tracing::debug;

/// 携带crumb令牌的请求头
pub const CRUMB_HEADER: &str = "Jenkins-Crumb";
/// scriptText 响应中需要去掉的前缀
pub const RESULT_PREFIX: &str = "Result: ";

/// 在单个远端服务器上执行脚本
#[async_trait]
pub trait ScriptExecutor: Send + Sync {
    async fn execute(&self, server: &ServerRecord, script: &str) -> JenxtResult<String>;
}

/// 基于Jenkins crumbIssuer + scriptText 协议的执行客户端
#[derive(Debug, Clone)]
pub struct JenkinsClient {
    http_client: reqwest::Client,
}

impl JenkinsClient {
    /// 创建客户端，`timeout` 作用于每一次远端调用
    pub fn new(timeout: Duration) -> JenxtResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| JenxtError::Internal(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { http_client })
    }

    async fn fetch_crumb(&self, server: &ServerRecord) -> JenxtResult<String> {
        let response = self
            .http_client
            .get(server.crumb_url())
            .basic_auth(&server.username, Some(&server.secret))
            .send()
            .await
            .map_err(|e| JenxtError::transport(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(JenxtError::Authentication {
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| JenxtError::transport(e.to_string()))?;
        Ok(parse_crumb(&body))
    }

    async fn run_script(
        &self,
        server: &ServerRecord,
        script: &str,
        crumb: &str,
    ) -> JenxtResult<String> {
        let response = self
            .http_client
            .post(server.script_url())
            .basic_auth(&server.username, Some(&server.secret))
            .header(CRUMB_HEADER, crumb)
            .form(&[("script", script)])
            .send()
            .await
            .map_err(|e| JenxtError::transport(e.to_string()))?;

        // 脚本阶段不检查状态码，远端返回的正文即执行结果
        let status = response.status();
        if !status.is_success() {
            debug!(server = %server.name, status = %status, "scriptText返回非成功状态");
        }

        let body = response
            .text()
            .await
            .map_err(|e| JenxtError::transport(e.to_string()))?;
        Ok(strip_result_prefix(&body))
    }
}

#[async_trait]
impl ScriptExecutor for JenkinsClient {
    async fn execute(&self, server: &ServerRecord, script: &str) -> JenxtResult<String> {
        let crumb = self.fetch_crumb(server).await?;
        debug!(server = %server.name, "已获取crumb令牌");
        self.run_script(server, script, &crumb).await
    }
}

/// 从 `<crumb>...</crumb>` 响应中取出令牌
pub fn parse_crumb(body: &str) -> String {
    body.trim()
        .replacen("<crumb>", "", 1)
        .replacen("</crumb>", "", 1)
        .trim()
        .to_string()
}

/// 去掉 `Result: ` 前缀及首尾空白
pub fn strip_result_prefix(body: &str) -> String {
    body.strip_prefix(RESULT_PREFIX)
        .unwrap_or(body)
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn server(url: &str) -> ServerRecord {
        ServerRecord {
            name: "S".to_string(),
            base_url: url.to_string(),
            username: "admin".to_string(),
            secret: "token".to_string(),
            labels: vec!["default".to_string()],
        }
    }

    fn client() -> JenkinsClient {
        JenkinsClient::new(Duration::from_secs(5)).unwrap()
    }

    // "admin:token" 的base64编码
    const BASIC_AUTH: &str = "Basic YWRtaW46dG9rZW4=";

    #[test]
    fn test_parse_crumb() {
        assert_eq!(parse_crumb("<crumb>abc123</crumb>"), "abc123");
        assert_eq!(parse_crumb("  <crumb> abc123 </crumb>\n"), "abc123");
        assert_eq!(parse_crumb("plain"), "plain");
    }

    #[test]
    fn test_strip_result_prefix() {
        assert_eq!(strip_result_prefix("Result: OK\n"), "OK");
        assert_eq!(strip_result_prefix("Result: {\"x\":1}"), "{\"x\":1}");
        assert_eq!(strip_result_prefix("  no prefix  "), "no prefix");
        assert_eq!(strip_result_prefix("Result:OK"), "Result:OK");
    }

    #[tokio::test]
    async fn test_execute_success() {
        let mut remote = mockito::Server::new_async().await;
        let crumb_mock = remote
            .mock("GET", "/crumbIssuer/api/xml")
            .match_query(Matcher::UrlEncoded("xpath".into(), "//crumb".into()))
            .match_header("authorization", BASIC_AUTH)
            .with_status(200)
            .with_body("<crumb>c0ffee</crumb>")
            .create_async()
            .await;
        let script_mock = remote
            .mock("POST", "/scriptText")
            .match_header("authorization", BASIC_AUTH)
            .match_header(CRUMB_HEADER, "c0ffee")
            .match_header("content-type", "application/x-www-form-urlencoded")
            .match_body(Matcher::UrlEncoded("script".into(), "println 'OK'".into()))
            .with_status(200)
            .with_body("Result: OK\n")
            .create_async()
            .await;

        let response = client()
            .execute(&server(&remote.url()), "println 'OK'")
            .await
            .unwrap();

        assert_eq!(response, "OK");
        crumb_mock.assert_async().await;
        script_mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_execute_crumb_rejected() {
        let mut remote = mockito::Server::new_async().await;
        let _crumb_mock = remote
            .mock("GET", "/crumbIssuer/api/xml")
            .match_query(Matcher::Any)
            .with_status(401)
            .create_async()
            .await;
        let script_mock = remote
            .mock("POST", "/scriptText")
            .expect(0)
            .create_async()
            .await;

        let result = client().execute(&server(&remote.url()), "println 1").await;

        assert!(matches!(
            result,
            Err(JenxtError::Authentication { status: 401 })
        ));
        script_mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_execute_returns_body_on_error_status() {
        let mut remote = mockito::Server::new_async().await;
        let _crumb_mock = remote
            .mock("GET", "/crumbIssuer/api/xml")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<crumb>x</crumb>")
            .create_async()
            .await;
        let _script_mock = remote
            .mock("POST", "/scriptText")
            .with_status(500)
            .with_body("Result: stack trace\n")
            .create_async()
            .await;

        let response = client()
            .execute(&server(&remote.url()), "boom()")
            .await
            .unwrap();
        assert_eq!(response, "stack trace");
    }

    #[tokio::test]
    async fn test_execute_times_out_on_silent_remote() {
        // 接受连接但从不响应
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hold = tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((stream, _)) = listener.accept().await {
                held.push(stream);
            }
        });

        let client = JenkinsClient::new(Duration::from_millis(200)).unwrap();
        let started = std::time::Instant::now();
        let result = client
            .execute(&server(&format!("http://{addr}")), "println 1")
            .await;

        assert!(matches!(result, Err(JenxtError::Transport(_))));
        assert!(started.elapsed() < Duration::from_secs(5));
        hold.abort();
    }

    #[tokio::test]
    async fn test_execute_connection_refused() {
        // 端口1上没有服务监听
        let result = client()
            .execute(&server("http://127.0.0.1:1"), "println 1")
            .await;
        assert!(matches!(result, Err(JenxtError::Transport(_))));
    }
}
