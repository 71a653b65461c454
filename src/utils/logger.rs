use std::env;

/// Debug output must stay off stdout; the shell captures stdout as the
/// prompt text.
fn enabled() -> bool {
    env::var("PROMPTLINE_DEBUG").map_or(false, |v| v != "0")
}

pub fn debug(message: &str) {
    if enabled() {
        eprintln!("[DEBUG] {}", message);
    }
}

pub fn debug_with_context(context: &str, message: &str) {
    if enabled() {
        eprintln!("[DEBUG] {}: {}", context, message);
    }
}
