use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, info};

/// 网关关闭信号
///
/// 主循环在收到系统信号后触发一次，HTTP服务和脚本监视循环各自订阅。
#[derive(Clone)]
pub struct ShutdownManager {
    shutdown_tx: broadcast::Sender<()>,
    triggered: Arc<AtomicBool>,
}

impl ShutdownManager {
    pub fn new() -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        Self {
            shutdown_tx,
            triggered: Arc::new(AtomicBool::new(false)),
        }
    }

    /// 订阅关闭信号；已触发后订阅得到的接收器会立即收到信号
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        let rx = self.shutdown_tx.subscribe();
        if self.triggered.load(Ordering::SeqCst) {
            let (tx, rx) = broadcast::channel(1);
            let _ = tx.send(());
            return rx;
        }
        rx
    }

    /// 触发关闭，只发送一次
    pub fn shutdown(&self) {
        if self.triggered.swap(true, Ordering::SeqCst) {
            debug!("关闭信号已经发送过");
            return;
        }

        info!(
            subscribers = self.shutdown_tx.receiver_count(),
            "触发网关关闭"
        );
        // 没有订阅者时发送失败，可以忽略
        let _ = self.shutdown_tx.send(());
    }
}

impl Default for ShutdownManager {
    fn default() -> Self {
        Self::new()
    }
}
