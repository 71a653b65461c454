use crate::config::Properties;
use crate::env::Environment;
use crate::segments::SegmentWriter;
use crate::utils::{debug_with_context, Cache};
use anyhow::Result;
use gix::Repository;
use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize)]
pub struct GitInfo {
    pub branch: Option<String>,
    pub sha: Option<String>,
    pub repo: Option<String>,
    pub detached: bool,
}

/// Repository state for the working directory, read through gix.
///
/// Lookups are cached per directory for a few seconds so a burst of prompt
/// redraws does not re-discover the repository every time.
#[derive(Serialize)]
pub struct GitWriter {
    #[serde(skip)]
    env: Arc<dyn Environment>,
    #[serde(flatten)]
    info: GitInfo,
    #[serde(skip)]
    cache: Cache<String, GitInfo>,
}

impl GitWriter {
    pub fn new(env: Arc<dyn Environment>) -> Self {
        Self {
            env,
            info: GitInfo::default(),
            cache: Cache::new(Duration::from_secs(5)),
        }
    }

    fn load_git_info(&self, path: &Path) -> GitInfo {
        match gix::discover(path) {
            Ok(repo) => self.extract_git_info(repo),
            Err(_) => {
                debug_with_context("git", "not inside a git repository");
                GitInfo::default()
            }
        }
    }

    fn extract_git_info(&self, repo: Repository) -> GitInfo {
        let mut info = GitInfo::default();

        if let Ok(Some(reference)) = repo.head_ref() {
            let name = reference.name().shorten();
            info.branch = Some(name.to_string());
        }

        if let Ok(head) = repo.head_commit() {
            info.sha = Some(head.id().to_hex_with_len(7).to_string());
        }

        // No named branch but a resolvable commit means a detached HEAD.
        info.detached = info.branch.is_none() && info.sha.is_some();

        if let Some(name) = repo
            .work_dir()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
        {
            info.repo = Some(name.to_string());
        }

        debug_with_context(
            "git",
            &format!(
                "branch={:?}, sha={:?}, detached={}",
                info.branch, info.sha, info.detached
            ),
        );

        info
    }
}

impl SegmentWriter for GitWriter {
    fn name(&self) -> &'static str {
        "git"
    }

    fn default_template(&self) -> &'static str {
        "\u{e0a0} {{#if branch}}{{ branch }}{{else}}{{ sha }}{{/if}}"
    }

    fn populate(&mut self, _properties: &Properties) -> Result<bool> {
        let cwd = self.env.working_directory();
        let cache_key = cwd.to_string_lossy().to_string();

        if let Some(cached) = self.cache.get(&cache_key) {
            debug_with_context("git", "using cached git info");
            self.info = cached;
        } else {
            let info = self.load_git_info(&cwd);
            self.cache.insert(cache_key, info.clone());
            self.info = info;
        }

        Ok(self.info.branch.is_some() || self.info.sha.is_some())
    }

    fn template_data(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}
