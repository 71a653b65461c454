use crate::env::{Environment, OsKind};
use crate::utils::debug_with_context;
use glob::{MatchOptions, Pattern};
use std::env;
use std::path::PathBuf;

/// Process-backed environment. The working directory is snapshotted at
/// construction so every segment sees the same directory for the whole pass.
pub struct HostEnv {
    cwd: PathBuf,
    status: i64,
}

impl HostEnv {
    pub fn new(status: i64) -> Self {
        let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self { cwd, status }
    }
}

impl Environment for HostEnv {
    fn current_os(&self) -> OsKind {
        if cfg!(target_os = "linux") {
            OsKind::Linux
        } else if cfg!(target_os = "macos") {
            OsKind::Macos
        } else if cfg!(windows) {
            OsKind::Windows
        } else {
            OsKind::Unknown
        }
    }

    fn home_directory(&self) -> Option<PathBuf> {
        dirs::home_dir()
    }

    fn working_directory(&self) -> PathBuf {
        self.cwd.clone()
    }

    fn dir_matches_any(&self, dir: &str, patterns: &[String]) -> bool {
        let home = self.home_directory();
        let home = home.as_ref().map(|p| p.to_string_lossy().to_string());
        let case_sensitive = !matches!(self.current_os(), OsKind::Windows | OsKind::Macos);
        matches_any_pattern(dir, patterns, home.as_deref(), case_sensitive)
    }

    fn env_var(&self, name: &str) -> Option<String> {
        env::var(name).ok()
    }

    fn status_code(&self) -> i64 {
        self.status
    }
}

/// Match a directory against glob patterns, with `~` expansion and separator
/// normalization. Invalid patterns never match.
pub fn matches_any_pattern(
    dir: &str,
    patterns: &[String],
    home: Option<&str>,
    case_sensitive: bool,
) -> bool {
    let dir = normalize_path(dir);
    let options = MatchOptions {
        case_sensitive,
        require_literal_separator: false,
        require_literal_leading_dot: false,
    };

    for pattern in patterns {
        let expanded = expand_home(pattern, home);
        let expanded = normalize_path(&expanded);

        match Pattern::new(&expanded) {
            Ok(glob) => {
                if glob.matches_with(&dir, options) {
                    return true;
                }
            }
            Err(e) => {
                debug_with_context("env", &format!("invalid folder pattern '{}': {}", pattern, e));
            }
        }
    }

    false
}

fn expand_home(pattern: &str, home: Option<&str>) -> String {
    let Some(home) = home else {
        return pattern.to_string();
    };

    if pattern == "~" {
        return home.to_string();
    }

    if let Some(rest) = pattern.strip_prefix("~/") {
        return format!("{}/{}", home.trim_end_matches('/'), rest);
    }

    pattern.to_string()
}

fn normalize_path(path: &str) -> String {
    let normalized = path.replace('\\', "/");
    if normalized.len() > 1 {
        normalized.trim_end_matches('/').to_string()
    } else {
        normalized
    }
}
