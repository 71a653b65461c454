use crate::segments::SegmentType;
use regex::Regex;
use std::iter;
use std::sync::OnceLock;

static SEGMENT_REF: OnceLock<Regex> = OnceLock::new();

fn segment_ref() -> &'static Regex {
    SEGMENT_REF.get_or_init(|| {
        // `segments.` preceded by a dot is a nested field path, not a
        // cross-segment reference, so the boundary class excludes it.
        Regex::new(r"(?:^|[^\w.])segments\.([A-Za-z][A-Za-z0-9_]*)")
            .expect("segment reference pattern is valid")
    })
}

/// Scan a segment's main template and both color override lists for
/// references to other segments' data.
///
/// The scan is purely textual: commented-out or conditionally dead
/// references still count. Order follows first occurrence (main template,
/// then foreground overrides, then background overrides) and duplicates
/// collapse onto the first sighting.
pub fn collect_needs(
    template: &str,
    foreground: &[String],
    background: &[String],
) -> Vec<SegmentType> {
    let mut needs: Vec<SegmentType> = Vec::new();
    let sources = iter::once(template)
        .chain(foreground.iter().map(String::as_str))
        .chain(background.iter().map(String::as_str));

    for source in sources {
        for capture in segment_ref().captures_iter(source) {
            let kind = SegmentType::from(capture[1].to_string());
            if !needs.contains(&kind) {
                needs.push(kind);
            }
        }
    }

    needs
}
