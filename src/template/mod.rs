pub mod needs;

pub use needs::*;

use handlebars::{handlebars_helper, Handlebars};
use serde_json::{Map, Value};
use thiserror::Error;

/// A template failed to parse or execute. Kept distinct from "rendered
/// empty", which is a normal outcome, so callers can tell a broken
/// configuration apart from a non-matching override.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template '{template}' failed to render: {source}")]
    Render {
        template: String,
        #[source]
        source: handlebars::RenderError,
    },
}

handlebars_helper!(contains: |needle: Json, haystack: Json| {
    let needle = needle.as_str().unwrap_or_default();
    let haystack = haystack.as_str().unwrap_or_default();
    haystack.contains(needle)
});

handlebars_helper!(upper: |value: Json| {
    value.as_str().unwrap_or_default().to_uppercase()
});

handlebars_helper!(lower: |value: Json| {
    value.as_str().unwrap_or_default().to_lowercase()
});

/// Thin wrapper around handlebars configured for prompt rendering: raw output
/// (no HTML escaping), missing fields render empty, and a small helper
/// library for the conditionals segment templates lean on.
pub struct TemplateEngine {
    registry: Handlebars<'static>,
}

impl TemplateEngine {
    pub fn new() -> Self {
        let mut registry = Handlebars::new();
        registry.register_escape_fn(handlebars::no_escape);
        registry.register_helper("contains", Box::new(contains));
        registry.register_helper("upper", Box::new(upper));
        registry.register_helper("lower", Box::new(lower));
        Self { registry }
    }

    pub fn render(&self, template: &str, data: &Value) -> Result<String, TemplateError> {
        self.registry
            .render_template(template, data)
            .map_err(|source| TemplateError::Render {
                template: template.to_string(),
                source,
            })
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Writer data accumulated over a render pass, keyed by segment-type tag.
///
/// Builds the per-segment template context: the segment's own writer fields
/// sit at the root, everything populated so far is reachable under
/// `segments.<tag>`.
#[derive(Debug, Clone, Default)]
pub struct RenderState {
    segments: Map<String, Value>,
}

impl RenderState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a populated segment's data. First write wins when two segments
    /// share a type tag.
    pub fn insert(&mut self, tag: &str, data: Value) {
        if !self.segments.contains_key(tag) {
            self.segments.insert(tag.to_string(), data);
        }
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.segments.contains_key(tag)
    }

    pub fn context(&self, own: Value) -> Value {
        let mut root = match own {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        root.insert("segments".to_string(), Value::Object(self.segments.clone()));
        Value::Object(root)
    }
}
