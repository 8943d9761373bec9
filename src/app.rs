use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::Router;
use jenxt_api::create_app;
use jenxt_config::{AppConfig, ServerDirectory};
use jenxt_core::registry::log_registrations;
use jenxt_core::{RegistryHandle, ScriptLoader, ScriptRegistry, ScriptWatcher};
use jenxt_dispatcher::{JenkinsClient, RequestDispatcher};
use tokio::{net::TcpListener, sync::broadcast};
use tracing::{error, info, warn};

/// 网关应用
///
/// 持有配置和当前注册表；`run` 启动脚本监视循环和HTTP服务，直到收到关闭信号。
pub struct Application {
    config: AppConfig,
    registry: RegistryHandle,
    servers: Arc<ServerDirectory>,
}

impl Application {
    /// 创建应用并完成脚本的初始加载
    pub fn new(config: AppConfig) -> Result<Self> {
        let loader = ScriptLoader::new(&config.scripts.directory);
        let registry = initial_registry(&loader);
        log_registrations(&ScriptRegistry::default(), &registry);

        info!(
            scripts = registry.len(),
            routes = registry.route_count(),
            "脚本初始加载完成"
        );

        let servers = Arc::new(ServerDirectory::new(config.remotes.clone()));
        if servers.is_empty() {
            warn!("未配置任何远端服务器，所有请求将返回空结果");
        } else {
            info!(
                servers = servers.len(),
                labels = ?servers.labels(),
                "远端服务器已加载"
            );
        }

        Ok(Self {
            config,
            registry: RegistryHandle::new(registry),
            servers,
        })
    }

    pub fn registry(&self) -> &RegistryHandle {
        &self.registry
    }

    /// 构建HTTP路由，远端调用使用配置中的超时时间
    pub fn router(&self) -> Result<Router> {
        let timeout = Duration::from_secs(self.config.remote.request_timeout_seconds);
        let client = JenkinsClient::new(timeout).context("创建远端HTTP客户端失败")?;
        let dispatcher = RequestDispatcher::new(
            self.registry.clone(),
            Arc::clone(&self.servers),
            Arc::new(client),
        );
        Ok(create_app(dispatcher))
    }

    /// 绑定配置中的地址并运行
    pub async fn run(&self, shutdown_rx: broadcast::Receiver<()>) -> Result<()> {
        let bind_address = self.config.server.bind_address();
        let listener = TcpListener::bind(&bind_address)
            .await
            .with_context(|| format!("绑定地址失败: {bind_address}"))?;

        self.serve(listener, shutdown_rx).await
    }

    /// 在给定的监听器上运行HTTP服务和脚本监视循环
    ///
    /// HTTP服务结束后（无论是否出错）都会先停止监视循环再返回。
    pub async fn serve(
        &self,
        listener: TcpListener,
        mut shutdown_rx: broadcast::Receiver<()>,
    ) -> Result<()> {
        let app = self.router()?;
        let local_addr = listener.local_addr().context("获取监听地址失败")?;

        let (watcher_stop, watcher_rx) = broadcast::channel(1);
        let watcher_handle = self.spawn_watcher(watcher_rx);

        info!("Jenxt网关启动在 http://{}", local_addr);

        let served = axum::serve(listener, app.into_make_service())
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
                info!("HTTP服务收到关闭信号");
            })
            .await;

        let _ = watcher_stop.send(());
        if let Err(e) = watcher_handle.await {
            error!("脚本监视任务异常退出: {}", e);
        }

        served.context("HTTP服务运行失败")?;
        info!("Jenxt网关已停止");
        Ok(())
    }

    fn spawn_watcher(&self, shutdown_rx: broadcast::Receiver<()>) -> tokio::task::JoinHandle<()> {
        let loader = ScriptLoader::new(&self.config.scripts.directory);
        let interval = Duration::from_secs(self.config.scripts.reload_interval_seconds);
        let watcher = ScriptWatcher::new(loader, self.registry.clone()).with_interval(interval);

        tokio::spawn(watcher.run(shutdown_rx))
    }
}

/// 目录不存在或无法读取时以空注册表启动，之后由监视循环继续尝试
fn initial_registry(loader: &ScriptLoader) -> ScriptRegistry {
    match loader.load() {
        Ok(registry) => registry,
        Err(e) => {
            warn!(
                directory = %loader.directory().display(),
                error = %e,
                "无法读取脚本目录，以空注册表启动"
            );
            ScriptRegistry::default()
        }
    }
}
