use crate::config::Properties;
use crate::env::Environment;
use crate::segments::SegmentWriter;
use anyhow::Result;
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;

/// Working directory display. `path` follows the configured style
/// (`"full"` or `"folder"`); `full` and `folder` are always exposed so
/// templates can pick their own rendition.
#[derive(Serialize)]
pub struct PathWriter {
    #[serde(skip)]
    env: Arc<dyn Environment>,
    pub path: String,
    pub full: String,
    pub folder: String,
}

impl PathWriter {
    pub fn new(env: Arc<dyn Environment>) -> Self {
        Self {
            env,
            path: String::new(),
            full: String::new(),
            folder: String::new(),
        }
    }
}

fn contract_home(path: &str, home: Option<PathBuf>) -> String {
    if let Some(home) = home {
        let home = home.to_string_lossy().replace('\\', "/");
        if path == home {
            return "~".to_string();
        }
        if let Some(rest) = path.strip_prefix(&format!("{}/", home)) {
            return format!("~/{}", rest);
        }
    }
    path.to_string()
}

impl SegmentWriter for PathWriter {
    fn name(&self) -> &'static str {
        "path"
    }

    fn default_template(&self) -> &'static str {
        "{{ path }}"
    }

    fn populate(&mut self, properties: &Properties) -> Result<bool> {
        let cwd = self.env.working_directory();
        let display = cwd.to_string_lossy().replace('\\', "/");

        self.full = contract_home(&display, self.env.home_directory());
        self.folder = cwd
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.to_string())
            .unwrap_or_else(|| self.full.clone());

        self.path = match properties.get_str("style") {
            Some("folder") => self.folder.clone(),
            _ => self.full.clone(),
        };

        Ok(true)
    }

    fn template_data(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}
