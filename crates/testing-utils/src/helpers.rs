//! 脚本目录相关的测试辅助函数

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;
use tokio::time::sleep;

/// 临时脚本目录，离开作用域时自动删除
pub struct ScriptDir {
    dir: TempDir,
}

impl ScriptDir {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("failed to create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write(&self, file: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(file);
        fs::write(&path, content).expect("failed to write script");
        path
    }

    pub fn remove(&self, file: &str) {
        fs::remove_file(self.dir.path().join(file)).expect("failed to remove script");
    }
}

impl Default for ScriptDir {
    fn default() -> Self {
        Self::new()
    }
}

/// 轮询等待条件成立，超时返回 `false`
pub async fn wait_for<F>(mut condition: F, timeout: Duration) -> bool
where
    F: FnMut() -> bool,
{
    let start = std::time::Instant::now();
    while start.elapsed() < timeout {
        if condition() {
            return true;
        }
        sleep(Duration::from_millis(20)).await;
    }
    false
}
