use crate::color::{self, Color};
use crate::config::Properties;
use crate::env::Environment;
use crate::segments::{RegistryError, SegmentType, SegmentWriter, WriterRegistry};
use crate::template::{collect_needs, RenderState, TemplateEngine, TemplateError};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// One configurable unit of prompt content: a data source, its templates
/// and color rules, and the directory scope it is active in.
///
/// Deserialized straight from the configuration file; the writer binding,
/// environment handle, and dependency list are derived after parse and
/// never round-trip.
#[derive(Serialize, Deserialize)]
pub struct Segment {
    #[serde(rename = "type")]
    pub segment_type: SegmentType,
    #[serde(default)]
    pub style: String,
    #[serde(default)]
    pub powerline_symbol: String,
    #[serde(default)]
    pub foreground: Color,
    #[serde(default)]
    pub background: Color,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreground_templates: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_templates: Option<Vec<String>>,
    #[serde(default)]
    pub template: String,
    #[serde(default)]
    pub include_folders: Vec<String>,
    #[serde(default)]
    pub exclude_folders: Vec<String>,
    #[serde(default)]
    pub properties: Properties,
    #[serde(skip)]
    pub needs: Vec<SegmentType>,
    #[serde(skip)]
    writer: Option<Box<dyn SegmentWriter>>,
    #[serde(skip)]
    env: Option<Arc<dyn Environment>>,
}

impl Segment {
    pub fn new(segment_type: SegmentType) -> Self {
        Self {
            segment_type,
            style: String::new(),
            powerline_symbol: String::new(),
            foreground: Color::default(),
            background: Color::default(),
            foreground_templates: None,
            background_templates: None,
            template: String::new(),
            include_folders: Vec::new(),
            exclude_folders: Vec::new(),
            properties: Properties::new(),
            needs: Vec::new(),
            writer: None,
            env: None,
        }
    }

    /// Bind this segment's writer through the registry and keep the
    /// environment handle for folder scoping. The writer is constructed but
    /// not populated.
    pub fn map_with_writer(
        &mut self,
        registry: &WriterRegistry,
        env: Arc<dyn Environment>,
    ) -> Result<(), RegistryError> {
        let writer = registry.bind(&self.segment_type, env.clone())?;
        self.writer = Some(writer);
        self.env = Some(env);
        Ok(())
    }

    pub fn writer(&self) -> Option<&dyn SegmentWriter> {
        self.writer.as_deref()
    }

    /// Decide whether this segment is active in the current working
    /// directory.
    ///
    /// No lists at all means no restriction. Otherwise the segment is
    /// active only when an include pattern matches and no exclude pattern
    /// does; exclusion wins over inclusion.
    pub fn should_include_folder(&self) -> bool {
        if self.include_folders.is_empty() && self.exclude_folders.is_empty() {
            return true;
        }

        let Some(env) = self.env.as_ref() else {
            return true;
        };

        let cwd = env.working_directory();
        let cwd = cwd.to_string_lossy();

        let included =
            !self.include_folders.is_empty() && env.dir_matches_any(&cwd, &self.include_folders);
        let excluded =
            !self.exclude_folders.is_empty() && env.dir_matches_any(&cwd, &self.exclude_folders);

        included && !excluded
    }

    /// Resolve the effective foreground for the current render state: first
    /// override template that renders non-empty wins, otherwise the static
    /// color.
    pub fn resolve_foreground(
        &self,
        engine: &TemplateEngine,
        state: &RenderState,
    ) -> Result<Color, TemplateError> {
        let templates = self.foreground_templates.as_deref().unwrap_or_default();
        color::resolve(engine, &self.foreground, templates, &self.context(state))
    }

    pub fn resolve_background(
        &self,
        engine: &TemplateEngine,
        state: &RenderState,
    ) -> Result<Color, TemplateError> {
        let templates = self.background_templates.as_deref().unwrap_or_default();
        color::resolve(engine, &self.background, templates, &self.context(state))
    }

    /// Run the bound writer against this segment's properties. Returns
    /// whether the segment produced content worth showing.
    pub fn populate(&mut self) -> Result<bool> {
        match self.writer.as_mut() {
            Some(writer) => writer.populate(&self.properties),
            None => Ok(false),
        }
    }

    /// Render the segment's text through the main template, falling back to
    /// the writer's default when the configuration does not carry one.
    pub fn render_text(
        &self,
        engine: &TemplateEngine,
        state: &RenderState,
    ) -> Result<String, TemplateError> {
        let template = if self.template.trim().is_empty() {
            self.writer
                .as_ref()
                .map(|w| w.default_template())
                .unwrap_or("")
        } else {
            self.template.as_str()
        };

        if template.is_empty() {
            return Ok(String::new());
        }

        let rendered = engine.render(template, &self.context(state))?;
        Ok(rendered.trim().to_string())
    }

    /// Recompute the ordered cross-segment dependency list from the main
    /// template and both color override lists.
    pub fn evaluate_needs(&mut self) {
        let foreground = self.foreground_templates.as_deref().unwrap_or_default();
        let background = self.background_templates.as_deref().unwrap_or_default();
        self.needs = collect_needs(&self.template, foreground, background);
    }

    /// The fields the bound writer exposes to templates; an empty object
    /// before binding.
    pub fn template_data(&self) -> Value {
        self.writer
            .as_ref()
            .map(|w| w.template_data())
            .unwrap_or_else(|| Value::Object(serde_json::Map::new()))
    }

    fn context(&self, state: &RenderState) -> Value {
        state.context(self.template_data())
    }
}

impl fmt::Debug for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Segment")
            .field("type", &self.segment_type)
            .field("style", &self.style)
            .field("foreground", &self.foreground)
            .field("background", &self.background)
            .field("template", &self.template)
            .field("needs", &self.needs)
            .field("writer", &self.writer.as_ref().map(|w| w.name()))
            .finish()
    }
}
