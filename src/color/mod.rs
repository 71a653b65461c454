use crate::template::{TemplateEngine, TemplateError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::env;
use std::fmt;

pub const RESET: &str = "\x1b[0m";

/// A color token: `#rrggbb` hex or a named ANSI color. Empty means unset and
/// leaves the terminal default in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(String);

impl Color {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn to_rgb(&self) -> Option<(u8, u8, u8)> {
        parse_color(self.0.trim())
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Color {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Color {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Resolve an effective color from an ordered override list.
///
/// Templates are rendered in order against `data`; the first render that is
/// non-empty after trimming wins and short-circuits the rest. When nothing
/// matches (or the list is empty) the default comes back unchanged. A template
/// that fails to parse or execute is an error, distinct from "no override".
pub fn resolve(
    engine: &TemplateEngine,
    default: &Color,
    templates: &[String],
    data: &Value,
) -> Result<Color, TemplateError> {
    for template in templates {
        if template.trim().is_empty() {
            continue;
        }

        let rendered = engine.render(template, data)?;
        let trimmed = rendered.trim();
        if !trimmed.is_empty() {
            return Ok(Color::new(trimmed));
        }
    }

    Ok(default.clone())
}

/// Apply foreground/background colors to `text`, honoring the color gates.
pub fn paint(text: &str, foreground: &Color, background: &Color) -> String {
    if !colors_enabled() {
        return text.to_string();
    }

    let mut prefix = String::new();
    if let Some(code) = bg_escape(background) {
        prefix.push_str(&code);
    }
    if let Some(code) = fg_escape(foreground) {
        prefix.push_str(&code);
    }

    if prefix.is_empty() {
        text.to_string()
    } else {
        format!("{}{}{}", prefix, text, RESET)
    }
}

pub fn fg_escape(color: &Color) -> Option<String> {
    let (r, g, b) = color.to_rgb()?;
    if supports_rgb_colors() {
        Some(format!("\x1b[38;2;{};{};{}m", r, g, b))
    } else {
        Some(format!("\x1b[38;5;{}m", rgb_to_8bit((r, g, b))))
    }
}

pub fn bg_escape(color: &Color) -> Option<String> {
    let (r, g, b) = color.to_rgb()?;
    if supports_rgb_colors() {
        Some(format!("\x1b[48;2;{};{};{}m", r, g, b))
    } else {
        Some(format!("\x1b[48;5;{}m", rgb_to_8bit((r, g, b))))
    }
}

pub fn colors_enabled() -> bool {
    // Always use colors unless explicitly disabled; prompts usually run inside
    // command substitution, so a TTY check would turn colors off exactly when
    // the output is used for real.
    env::var("NO_COLOR").is_err()
        && env::var("TERM").map_or(false, |term| !term.is_empty() && term != "dumb")
}

fn supports_rgb_colors() -> bool {
    env::var("COLORTERM").map_or(false, |ct| ct.contains("truecolor") || ct.contains("24bit"))
        || env::var("TERM").map_or(false, |term| {
            term.contains("256")
                || term.contains("color")
                || term == "xterm-kitty"
                || term == "alacritty"
        })
}

fn rgb_to_8bit((r, g, b): (u8, u8, u8)) -> u8 {
    // Closest 8-bit color: 216-color cube plus grayscale ramp
    if r == g && g == b {
        if r < 8 {
            16
        } else if r >= 248 {
            // 248 and up map onto cube white; the ramp itself tops out at
            // gray level 238 (color 255).
            231
        } else {
            ((r - 8) / 10) + 232
        }
    } else {
        let r6 = r as u16 * 5 / 255;
        let g6 = g as u16 * 5 / 255;
        let b6 = b as u16 * 5 / 255;
        (16 + 36 * r6 + 6 * g6 + b6) as u8
    }
}

fn parse_color(color: &str) -> Option<(u8, u8, u8)> {
    if let Some(hex) = color.strip_prefix('#') {
        // Sliced by byte below, so it must be six ASCII digits or nothing.
        if hex.len() == 6 && hex.is_ascii() {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            return Some((r, g, b));
        }
        return None;
    }

    named_color(&color.to_lowercase())
}

fn named_color(name: &str) -> Option<(u8, u8, u8)> {
    let rgb = match name {
        "black" => (0, 0, 0),
        "red" => (205, 49, 49),
        "green" => (13, 188, 121),
        "yellow" => (229, 229, 16),
        "blue" => (36, 114, 200),
        "magenta" => (188, 63, 188),
        "cyan" => (17, 168, 205),
        "white" => (229, 229, 229),
        "brightblack" => (102, 102, 102),
        "brightred" => (241, 76, 76),
        "brightgreen" => (35, 209, 139),
        "brightyellow" => (245, 245, 67),
        "brightblue" => (59, 142, 234),
        "brightmagenta" => (214, 112, 214),
        "brightcyan" => (41, 184, 219),
        "brightwhite" => (255, 255, 255),
        _ => return None,
    };
    Some(rgb)
}
