use crate::config::Properties;
use crate::env::Environment;
use crate::segments::SegmentWriter;
use anyhow::Result;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// Exit status of the last command, as handed over by the shell hook.
#[derive(Serialize)]
pub struct ExitWriter {
    #[serde(skip)]
    env: Arc<dyn Environment>,
    pub code: i64,
}

impl ExitWriter {
    pub fn new(env: Arc<dyn Environment>) -> Self {
        Self { env, code: 0 }
    }
}

impl SegmentWriter for ExitWriter {
    fn name(&self) -> &'static str {
        "exit"
    }

    // Zero is falsy in templates, so a clean exit renders empty and the
    // segment drops out of the line.
    fn default_template(&self) -> &'static str {
        "{{#if code}}\u{2718} {{ code }}{{/if}}"
    }

    fn populate(&mut self, _properties: &Properties) -> Result<bool> {
        self.code = self.env.status_code();
        Ok(true)
    }

    fn template_data(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}
