use crate::config::Properties;
use crate::env::Environment;
use crate::segments::SegmentWriter;
use anyhow::Result;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// Active AWS profile and region from the standard CLI environment
/// variables. The `*_DEFAULT_*` spellings act as fallbacks, matching how
/// the AWS CLI itself resolves them.
#[derive(Serialize)]
pub struct AwsWriter {
    #[serde(skip)]
    env: Arc<dyn Environment>,
    pub profile: String,
    pub region: String,
}

impl AwsWriter {
    pub fn new(env: Arc<dyn Environment>) -> Self {
        Self {
            env,
            profile: String::new(),
            region: String::new(),
        }
    }
}

impl SegmentWriter for AwsWriter {
    fn name(&self) -> &'static str {
        "aws"
    }

    fn default_template(&self) -> &'static str {
        "{{ profile }}{{#if region}}@{{ region }}{{/if}}"
    }

    fn populate(&mut self, _properties: &Properties) -> Result<bool> {
        self.profile = self
            .env
            .env_var("AWS_PROFILE")
            .or_else(|| self.env.env_var("AWS_DEFAULT_PROFILE"))
            .unwrap_or_default();

        self.region = self
            .env
            .env_var("AWS_REGION")
            .or_else(|| self.env.env_var("AWS_DEFAULT_REGION"))
            .unwrap_or_default();

        Ok(!self.profile.is_empty() || !self.region.is_empty())
    }

    fn template_data(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}
