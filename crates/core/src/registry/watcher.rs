use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

use super::handle::RegistryHandle;
use super::loader::{ReloadSummary, ScriptLoader};
use super::table::ScriptRegistry;
use super::RESERVED_ROUTE_PREFIX;
use crate::errors::JenxtResult;

/// 默认扫描间隔（秒）
pub const DEFAULT_RELOAD_INTERVAL_SECONDS: u64 = 10;

/// 周期性扫描脚本目录并发布新的注册表
///
/// 只有一个写入方：`run` 消费自身，`reload_once` 需要独占引用。
pub struct ScriptWatcher {
    loader: ScriptLoader,
    handle: RegistryHandle,
    interval: Duration,
}

impl ScriptWatcher {
    pub fn new(loader: ScriptLoader, handle: RegistryHandle) -> Self {
        Self {
            loader,
            handle,
            interval: Duration::from_secs(DEFAULT_RELOAD_INTERVAL_SECONDS),
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// 执行一次重新加载；有变化时发布新快照
    pub fn reload_once(&mut self) -> JenxtResult<ReloadSummary> {
        reload_and_publish(&self.loader, &self.handle)
    }

    /// 运行扫描循环，直到收到关闭信号
    ///
    /// 目录读取是同步IO，每次扫描放到阻塞线程池中执行。
    pub async fn run(self, mut shutdown_rx: broadcast::Receiver<()>) {
        info!(
            directory = %self.loader.directory().display(),
            interval = ?self.interval,
            "脚本监视循环已启动"
        );

        let mut interval = tokio::time::interval(self.interval);
        // 第一次tick立即返回，初始加载已由启动流程完成
        interval.tick().await;

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let loader = self.loader.clone();
                    let handle = self.handle.clone();
                    match tokio::task::spawn_blocking(move || reload_and_publish(&loader, &handle)).await {
                        Ok(Ok(_)) => {}
                        Ok(Err(e)) => {
                            error!(error = %e, "重新加载脚本失败，继续使用当前注册表");
                        }
                        Err(e) => {
                            error!(error = %e, "重新加载任务异常退出");
                        }
                    }
                }
                _ = shutdown_rx.recv() => {
                    info!("脚本监视循环收到关闭信号");
                    break;
                }
            }
        }
    }
}

fn reload_and_publish(loader: &ScriptLoader, handle: &RegistryHandle) -> JenxtResult<ReloadSummary> {
    let previous = handle.snapshot();
    let outcome = loader.reload(&previous)?;

    if outcome.summary.has_changes() {
        log_registrations(&previous, &outcome.registry);
        handle.publish(outcome.registry);
        info!(
            reloaded = outcome.summary.reloaded,
            added = outcome.summary.added,
            removed = outcome.summary.removed,
            "脚本注册表已更新"
        );
    } else if !outcome.registry.same_rejections(&previous) {
        // 路由未变，只记录新的无效文件指纹，避免下次重复告警
        handle.publish(outcome.registry);
    } else {
        debug!(unchanged = outcome.summary.unchanged, "脚本未发生变化");
    }

    Ok(outcome.summary)
}

/// 输出新注册或重新注册的路由，以及重复路由、保留路由的告警
pub fn log_registrations(previous: &ScriptRegistry, current: &ScriptRegistry) {
    for route in current.routes() {
        let Some(descriptor) = current.resolve(&route) else {
            continue;
        };
        let unchanged = previous
            .resolve(&route)
            .is_some_and(|old| Arc::ptr_eq(&old, &descriptor));
        if unchanged {
            continue;
        }

        if route.starts_with(RESERVED_ROUTE_PREFIX) {
            warn!(route = %route, file = %descriptor.source_file, "路由与网关保留路径冲突，可能被内置端点覆盖");
        }
        info!(route = %route, file = %descriptor.source_file, "Registered endpoint {}", route);
    }

    for duplicate in current.duplicates() {
        warn!(
            route = %duplicate.route,
            shadowed = %duplicate.shadowed,
            winner = %duplicate.winner,
            "多个脚本声明了相同的路由，按文件名字典序最后的文件生效"
        );
    }
}
