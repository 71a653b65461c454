pub mod host;
pub mod mock;

pub use host::*;
pub use mock::*;

use std::fmt;
use std::path::PathBuf;

/// Operating system family as seen by segment writers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsKind {
    Linux,
    Macos,
    Windows,
    Unknown,
}

impl OsKind {
    pub fn name(&self) -> &'static str {
        match self {
            OsKind::Linux => "linux",
            OsKind::Macos => "macos",
            OsKind::Windows => "windows",
            OsKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for OsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything a segment is allowed to know about the process it runs in.
///
/// Shared read-only across all segments during a render pass; writers hold an
/// `Arc` handed out at bind time. Directory pattern semantics (globs, home
/// expansion, case rules) live behind `dir_matches_any` so callers only ever
/// combine boolean results.
pub trait Environment: Send + Sync {
    fn current_os(&self) -> OsKind;

    fn home_directory(&self) -> Option<PathBuf>;

    fn working_directory(&self) -> PathBuf;

    /// True when `dir` matches at least one of `patterns`.
    fn dir_matches_any(&self, dir: &str, patterns: &[String]) -> bool;

    fn env_var(&self, name: &str) -> Option<String>;

    /// Exit code of the last command, as reported by the shell integration.
    fn status_code(&self) -> i64;
}
