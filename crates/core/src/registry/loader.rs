use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info, warn};

use super::table::ScriptRegistry;
use crate::errors::{JenxtError, JenxtResult};
use crate::fingerprint::fingerprint;
use crate::models::{ScriptDescriptor, ScriptMeta};

static META_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<jenxt>(?P<meta>[\S\s]*)</jenxt>").expect("元数据正则表达式无效"));

/// 一次重新加载的统计
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReloadSummary {
    pub unchanged: usize,
    pub reloaded: usize,
    pub added: usize,
    pub removed: usize,
    /// 无法加载的文件（新文件被跳过，或变化后解析失败而保留旧版本）
    pub rejected: usize,
}

impl ReloadSummary {
    /// 与上一次快照相比路由表是否有变化
    pub fn has_changes(&self) -> bool {
        self.reloaded > 0 || self.added > 0 || self.removed > 0
    }
}

/// 重新加载的结果：新的完整注册表及统计
#[derive(Debug)]
pub struct ReloadOutcome {
    pub registry: ScriptRegistry,
    pub summary: ReloadSummary,
}

/// 提取 `<jenxt> ... </jenxt>` 之间的元数据文本
pub fn extract_meta(content: &str) -> JenxtResult<&str> {
    META_PATTERN
        .captures(content)
        .and_then(|caps| caps.name("meta"))
        .map(|m| m.as_str().trim())
        .ok_or(JenxtError::MetaMissing)
}

/// 将元数据文本解析为 [`ScriptMeta`]
pub fn parse_meta(raw: &str) -> JenxtResult<ScriptMeta> {
    let meta: ScriptMeta = serde_json::from_str(raw)?;
    if meta.expose.trim().is_empty() {
        return Err(JenxtError::malformed("expose must not be empty"));
    }
    Ok(meta)
}

/// 由文件原始字节构建脚本描述
pub fn load_content(source_file: &str, raw: &[u8]) -> JenxtResult<ScriptDescriptor> {
    let content = std::str::from_utf8(raw)
        .map_err(|e| JenxtError::malformed(format!("script is not valid UTF-8: {e}")))?;
    let meta = parse_meta(extract_meta(content)?)?;

    Ok(ScriptDescriptor::from_meta(
        meta,
        source_file,
        content,
        fingerprint(raw),
    ))
}

/// 从脚本目录加载并增量刷新脚本
#[derive(Debug, Clone)]
pub struct ScriptLoader {
    directory: PathBuf,
}

impl ScriptLoader {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// 加载目录中的所有脚本，无效文件被跳过
    pub fn load(&self) -> JenxtResult<ScriptRegistry> {
        let mut scripts = BTreeMap::new();
        let mut rejected = BTreeMap::new();

        for file in self.list_files()? {
            let raw = match self.read(&file) {
                Ok(raw) => raw,
                Err(e) => {
                    warn!(file = %file, error = %e, "读取脚本文件失败，已跳过");
                    continue;
                }
            };

            match load_content(&file, &raw) {
                Ok(descriptor) => {
                    scripts.insert(file, Arc::new(descriptor));
                }
                Err(e) => {
                    warn!(file = %file, error = %e, "脚本元数据无效，已跳过");
                    rejected.insert(file, fingerprint(&raw));
                }
            }
        }

        Ok(ScriptRegistry::new(scripts, rejected))
    }

    /// 基于上一次的注册表重新扫描目录，返回新的完整注册表
    ///
    /// 指纹未变的文件直接复用旧的描述（不重新解析），变化的文件重新解析，
    /// 新文件按首次加载处理，磁盘上已消失的文件被移除。
    pub fn reload(&self, previous: &ScriptRegistry) -> JenxtResult<ReloadOutcome> {
        let files = self.list_files()?;
        let mut scripts = BTreeMap::new();
        let mut rejected = BTreeMap::new();
        let mut summary = ReloadSummary::default();

        for file in &files {
            let prior = previous.get(file);

            let raw = match self.read(file) {
                Ok(raw) => raw,
                Err(e) => {
                    warn!(file = %file, error = %e, "无法读取脚本文件");
                    if let Some(prior) = prior {
                        scripts.insert(file.clone(), Arc::clone(prior));
                        summary.unchanged += 1;
                    }
                    continue;
                }
            };
            let hash = fingerprint(&raw);

            if let Some(prior) = prior {
                if prior.content_fingerprint == hash {
                    scripts.insert(file.clone(), Arc::clone(prior));
                    summary.unchanged += 1;
                    continue;
                }
            }

            // 上次已拒绝且内容未变，不再重复解析和告警
            if previous.rejected_fingerprint(file) == Some(hash.as_str()) {
                debug!(file = %file, "脚本仍然无效，内容未变化");
                if let Some(prior) = prior {
                    scripts.insert(file.clone(), Arc::clone(prior));
                }
                rejected.insert(file.clone(), hash);
                summary.rejected += 1;
                continue;
            }

            match (load_content(file, &raw), prior) {
                (Ok(descriptor), Some(_)) => {
                    info!(file = %file, route = %descriptor.route(), "脚本文件变化，已重新加载");
                    scripts.insert(file.clone(), Arc::new(descriptor));
                    summary.reloaded += 1;
                }
                (Ok(descriptor), None) => {
                    info!(file = %file, route = %descriptor.route(), "发现新脚本文件");
                    scripts.insert(file.clone(), Arc::new(descriptor));
                    summary.added += 1;
                }
                (Err(e), Some(prior)) => {
                    warn!(file = %file, error = %e, "检测到脚本变化但重新加载失败，保留旧版本");
                    scripts.insert(file.clone(), Arc::clone(prior));
                    rejected.insert(file.clone(), hash);
                    summary.rejected += 1;
                }
                (Err(e), None) => {
                    warn!(file = %file, error = %e, "脚本元数据无效，已跳过");
                    rejected.insert(file.clone(), hash);
                    summary.rejected += 1;
                }
            }
        }

        for (file, descriptor) in previous.iter() {
            if !scripts.contains_key(file) {
                info!(file = %file, route = %descriptor.route(), "脚本文件已删除，移除路由");
                summary.removed += 1;
            }
        }

        Ok(ReloadOutcome {
            registry: ScriptRegistry::new(scripts, rejected),
            summary,
        })
    }

    fn list_files(&self) -> JenxtResult<Vec<String>> {
        let mut files = Vec::new();

        for entry in std::fs::read_dir(&self.directory)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => files.push(name),
                Err(name) => warn!(file = ?name, "文件名不是有效的UTF-8，已跳过"),
            }
        }

        files.sort();
        Ok(files)
    }

    fn read(&self, file: &str) -> JenxtResult<Vec<u8>> {
        Ok(std::fs::read(self.directory.join(file))?)
    }
}
