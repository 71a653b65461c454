use crate::config::Properties;
use crate::env::Environment;
use crate::segments::SegmentWriter;
use anyhow::Result;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// Who and where: the login name and host of the current shell session.
#[derive(Serialize)]
pub struct SessionWriter {
    #[serde(skip)]
    env: Arc<dyn Environment>,
    pub user: String,
    pub host: String,
    pub ssh: bool,
}

impl SessionWriter {
    pub fn new(env: Arc<dyn Environment>) -> Self {
        Self {
            env,
            user: String::new(),
            host: String::new(),
            ssh: false,
        }
    }
}

impl SegmentWriter for SessionWriter {
    fn name(&self) -> &'static str {
        "session"
    }

    fn default_template(&self) -> &'static str {
        "{{ user }}{{#if host}}@{{ host }}{{/if}}"
    }

    fn populate(&mut self, _properties: &Properties) -> Result<bool> {
        self.user = self
            .env
            .env_var("USER")
            .or_else(|| self.env.env_var("USERNAME"))
            .unwrap_or_default();

        // HOSTNAME is a shell variable more often than an exported one, so
        // COMPUTERNAME covers Windows and the lookup stays best-effort.
        self.host = self
            .env
            .env_var("HOSTNAME")
            .or_else(|| self.env.env_var("COMPUTERNAME"))
            .map(|h| h.split('.').next().unwrap_or(&h).to_string())
            .unwrap_or_default();

        self.ssh = self.env.env_var("SSH_CONNECTION").is_some()
            || self.env.env_var("SSH_TTY").is_some();

        Ok(!self.user.is_empty() || !self.host.is_empty())
    }

    fn template_data(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}
