use crate::config::Properties;
use crate::env::Environment;
use crate::segments::SegmentWriter;
use anyhow::Result;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// Static text from properties. Inert on its own, but handy as a host for
/// templates that only read other segments' data.
#[derive(Serialize)]
pub struct TextWriter {
    pub text: String,
}

impl TextWriter {
    pub fn new(_env: Arc<dyn Environment>) -> Self {
        Self {
            text: String::new(),
        }
    }
}

impl SegmentWriter for TextWriter {
    fn name(&self) -> &'static str {
        "text"
    }

    fn default_template(&self) -> &'static str {
        "{{ text }}"
    }

    fn populate(&mut self, properties: &Properties) -> Result<bool> {
        self.text = properties.get_str("text").unwrap_or_default().to_string();
        Ok(true)
    }

    fn template_data(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}
