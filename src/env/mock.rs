use crate::env::{Environment, OsKind};
use std::collections::HashMap;
use std::path::PathBuf;

/// Scripted environment for tests: every answer is configured up front through
/// the builder methods, including the result of each directory-pattern check.
pub struct MockEnv {
    os: OsKind,
    home: Option<PathBuf>,
    cwd: PathBuf,
    vars: HashMap<String, String>,
    status: i64,
    dir_matches: HashMap<String, bool>,
}

impl MockEnv {
    pub fn new() -> Self {
        Self {
            os: OsKind::Linux,
            home: None,
            cwd: PathBuf::from("."),
            vars: HashMap::new(),
            status: 0,
            dir_matches: HashMap::new(),
        }
    }

    pub fn with_os(mut self, os: OsKind) -> Self {
        self.os = os;
        self
    }

    pub fn with_home(mut self, home: &str) -> Self {
        self.home = Some(PathBuf::from(home));
        self
    }

    pub fn with_cwd(mut self, cwd: &str) -> Self {
        self.cwd = PathBuf::from(cwd);
        self
    }

    pub fn with_var(mut self, name: &str, value: &str) -> Self {
        self.vars.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_status(mut self, status: i64) -> Self {
        self.status = status;
        self
    }

    /// Script the answer for a specific pattern list. Unscripted lists never
    /// match, mirroring a strict mock.
    pub fn with_dir_match(mut self, patterns: &[&str], result: bool) -> Self {
        self.dir_matches.insert(patterns.join("|"), result);
        self
    }
}

impl Default for MockEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment for MockEnv {
    fn current_os(&self) -> OsKind {
        self.os
    }

    fn home_directory(&self) -> Option<PathBuf> {
        self.home.clone()
    }

    fn working_directory(&self) -> PathBuf {
        self.cwd.clone()
    }

    fn dir_matches_any(&self, _dir: &str, patterns: &[String]) -> bool {
        let key = patterns.join("|");
        self.dir_matches.get(&key).copied().unwrap_or(false)
    }

    fn env_var(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }

    fn status_code(&self) -> i64 {
        self.status
    }
}
