use crate::color::{self, Color};
use crate::config::{Config, Segment};
use crate::env::Environment;
use crate::segments::{SegmentType, WriterRegistry};
use crate::template::{RenderState, TemplateEngine};
use crate::utils::debug_with_context;
use anyhow::{Context, Result};
use std::collections::HashSet;
use std::sync::Arc;

/// Walks the configured segments and assembles the final prompt line:
/// bind writers, scope by directory, populate in dependency order, render
/// templates, resolve colors, compose.
pub struct PromptRenderer {
    env: Arc<dyn Environment>,
    registry: WriterRegistry,
    engine: TemplateEngine,
}

struct RenderedSegment {
    text: String,
    foreground: Color,
    background: Color,
    style: String,
    powerline_symbol: String,
}

impl PromptRenderer {
    pub fn new(env: Arc<dyn Environment>) -> Self {
        Self {
            env,
            registry: WriterRegistry::with_defaults(),
            engine: TemplateEngine::new(),
        }
    }

    /// Replace the built-in writer set; for embedders with custom writers.
    pub fn with_registry(mut self, registry: WriterRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Render the whole prompt. Unknown segment types and broken main
    /// templates fail the render; broken color overrides degrade to the
    /// static color.
    pub fn render(&self, config: &mut Config) -> Result<String> {
        for segment in &mut config.segments {
            segment.map_with_writer(&self.registry, self.env.clone())?;
            segment.evaluate_needs();
        }

        let active: Vec<usize> = config
            .segments
            .iter()
            .enumerate()
            .filter(|(_, segment)| segment.should_include_folder())
            .map(|(idx, _)| idx)
            .collect();

        let (state, has_content) = self.populate_in_dependency_order(&mut config.segments, &active);

        let mut parts = Vec::new();
        for &idx in &active {
            if !has_content.contains(&idx) {
                continue;
            }
            let segment = &config.segments[idx];

            let text = segment
                .render_text(&self.engine, &state)
                .with_context(|| format!("rendering segment '{}'", segment.segment_type))?;
            if text.is_empty() {
                debug_with_context(
                    "render",
                    &format!("segment '{}' rendered empty, dropping", segment.segment_type),
                );
                continue;
            }

            let foreground = segment
                .resolve_foreground(&self.engine, &state)
                .unwrap_or_else(|e| {
                    debug_with_context(
                        "render",
                        &format!(
                            "foreground override failed for '{}': {}",
                            segment.segment_type, e
                        ),
                    );
                    segment.foreground.clone()
                });
            let background = segment
                .resolve_background(&self.engine, &state)
                .unwrap_or_else(|e| {
                    debug_with_context(
                        "render",
                        &format!(
                            "background override failed for '{}': {}",
                            segment.segment_type, e
                        ),
                    );
                    segment.background.clone()
                });

            parts.push(RenderedSegment {
                text,
                foreground,
                background,
                style: segment.style.clone(),
                powerline_symbol: segment.powerline_symbol.clone(),
            });
        }

        Ok(compose(&parts, config.final_space))
    }

    /// Populate active segments so that a segment's cross-references are
    /// satisfied before its templates run, while display order stays
    /// configuration order.
    ///
    /// A need is satisfied once data for that tag is recorded, or when no
    /// active segment carries the needed type at all. Self-references never
    /// block. When a sweep makes no progress the remaining segments form a
    /// cycle; they are populated in configuration order as a fallback.
    fn populate_in_dependency_order(
        &self,
        segments: &mut [Segment],
        active: &[usize],
    ) -> (RenderState, HashSet<usize>) {
        let mut state = RenderState::new();
        let mut has_content = HashSet::new();

        let present: HashSet<SegmentType> = active
            .iter()
            .map(|&idx| segments[idx].segment_type.clone())
            .collect();

        let mut pending: Vec<usize> = active.to_vec();
        while !pending.is_empty() {
            let mut progressed = false;
            let mut deferred = Vec::new();

            for &idx in &pending {
                let ready = segments[idx].needs.iter().all(|need| {
                    *need == segments[idx].segment_type
                        || state.contains(need.tag())
                        || !present.contains(need)
                });
                if ready {
                    populate_one(&mut segments[idx], idx, &mut state, &mut has_content);
                    progressed = true;
                } else {
                    deferred.push(idx);
                }
            }

            if !progressed {
                debug_with_context(
                    "render",
                    "segment dependency cycle, populating remainder in config order",
                );
                for &idx in &deferred {
                    populate_one(&mut segments[idx], idx, &mut state, &mut has_content);
                }
                break;
            }

            pending = deferred;
        }

        (state, has_content)
    }
}

fn populate_one(
    segment: &mut Segment,
    idx: usize,
    state: &mut RenderState,
    has_content: &mut HashSet<usize>,
) {
    match segment.populate() {
        Ok(true) => {
            has_content.insert(idx);
        }
        Ok(false) => {
            debug_with_context(
                "render",
                &format!("segment '{}' has no content", segment.segment_type),
            );
        }
        Err(e) => {
            debug_with_context(
                "render",
                &format!("segment '{}' failed to populate: {}", segment.segment_type, e),
            );
        }
    }
    // Record whatever data the writer holds even on failure so dependents
    // see the tag and render its fields as empty instead of stalling.
    state.insert(segment.segment_type.tag(), segment.template_data());
}

fn compose(parts: &[RenderedSegment], final_space: bool) -> String {
    let mut out = String::new();

    for (i, part) in parts.iter().enumerate() {
        let padded = format!(" {} ", part.text);
        out.push_str(&color::paint(&padded, &part.foreground, &part.background));

        if part.style == "powerline" && !part.powerline_symbol.is_empty() {
            let next_background = parts.get(i + 1).map(|next| &next.background);
            out.push_str(&powerline_separator(part, next_background));
        } else if i + 1 < parts.len() {
            out.push(' ');
        }
    }

    if final_space && !out.is_empty() {
        out.push(' ');
    }

    out
}

// The separator glyph carries the finished segment's background as its
// foreground, drawn over the next segment's background.
fn powerline_separator(part: &RenderedSegment, next_background: Option<&Color>) -> String {
    if !color::colors_enabled() {
        return part.powerline_symbol.clone();
    }

    let mut out = String::new();
    if let Some(code) = color::fg_escape(&part.background) {
        out.push_str(&code);
    }
    if let Some(next) = next_background {
        if let Some(code) = color::bg_escape(next) {
            out.push_str(&code);
        }
    }
    out.push_str(&part.powerline_symbol);
    out.push_str(color::RESET);
    out
}
