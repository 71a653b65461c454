use crate::config::Properties;
use crate::env::Environment;
use crate::segments::SegmentWriter;
use crate::utils::debug_with_context;
use anyhow::Result;
use chrono::Local;
use serde::Serialize;
use serde_json::Value;
use std::fmt::Write as _;
use std::sync::Arc;

const DEFAULT_FORMAT: &str = "%H:%M:%S";

/// Wall-clock time, formatted with a chrono strftime string from the
/// `time_format` property.
#[derive(Serialize)]
pub struct TimeWriter {
    pub current: String,
}

impl TimeWriter {
    pub fn new(_env: Arc<dyn Environment>) -> Self {
        Self {
            current: String::new(),
        }
    }
}

impl SegmentWriter for TimeWriter {
    fn name(&self) -> &'static str {
        "time"
    }

    fn default_template(&self) -> &'static str {
        "{{ current }}"
    }

    fn populate(&mut self, properties: &Properties) -> Result<bool> {
        let format = properties.get_str("time_format").unwrap_or(DEFAULT_FORMAT);
        let now = Local::now();

        // chrono surfaces bad format specifiers as a fmt error at write
        // time, so format into a buffer instead of calling to_string().
        let mut formatted = String::new();
        if write!(formatted, "{}", now.format(format)).is_err() {
            debug_with_context("time", &format!("invalid time_format '{}'", format));
            formatted = now.format(DEFAULT_FORMAT).to_string();
        }
        self.current = formatted;

        Ok(true)
    }

    fn template_data(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}
