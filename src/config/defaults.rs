use crate::color::Color;
use crate::config::{Config, Segment};
use crate::segments::SegmentType;

impl Default for Config {
    fn default() -> Self {
        Self {
            final_space: true,
            segments: default_segments(),
        }
    }
}

fn powerline(kind: SegmentType, foreground: &str, background: &str) -> Segment {
    let mut segment = Segment::new(kind);
    segment.style = "powerline".to_string();
    segment.powerline_symbol = "\u{e0b0}".to_string();
    segment.foreground = Color::new(foreground);
    segment.background = Color::new(background);
    segment
}

/// Built-in prompt line used when no configuration file is found.
fn default_segments() -> Vec<Segment> {
    let os = powerline(SegmentType::Os, "#f7fafc", "#805ad5");

    let path = powerline(SegmentType::Path, "#e2e8f0", "#2d3748");

    let mut git = powerline(SegmentType::Git, "#f7fafc", "#38a169");
    git.background_templates = Some(vec!["{{#if detached}}#d69e2e{{/if}}".to_string()]);

    let aws = powerline(SegmentType::Aws, "#1a202c", "#d69e2e");

    let exit = powerline(SegmentType::Exit, "#f7fafc", "#e53e3e");

    vec![os, path, git, aws, exit]
}
