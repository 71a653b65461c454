use crate::config::Properties;
use crate::env::{Environment, OsKind};
use crate::segments::SegmentWriter;
use anyhow::Result;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// Platform icon and name. Properties keyed by the platform name override
/// the built-in icons, e.g. `{"linux": "\u{1f427}"}`.
#[derive(Serialize)]
pub struct OsWriter {
    #[serde(skip)]
    env: Arc<dyn Environment>,
    pub icon: String,
    pub name: String,
}

impl OsWriter {
    pub fn new(env: Arc<dyn Environment>) -> Self {
        Self {
            env,
            icon: String::new(),
            name: String::new(),
        }
    }
}

impl SegmentWriter for OsWriter {
    fn name(&self) -> &'static str {
        "os"
    }

    fn default_template(&self) -> &'static str {
        "{{ icon }}"
    }

    fn populate(&mut self, properties: &Properties) -> Result<bool> {
        let os = self.env.current_os();
        self.name = os.name().to_string();

        let default_icon = match os {
            OsKind::Linux => "\u{e712}",
            OsKind::Macos => "\u{e711}",
            OsKind::Windows => "\u{e70f}",
            OsKind::Unknown => "?",
        };
        self.icon = properties
            .get_str(os.name())
            .unwrap_or(default_icon)
            .to_string();

        Ok(true)
    }

    fn template_data(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}
