//! Text helpers shared by the summary renderers

/// Remove every `\r\n`, `\n` and `\r` so the value fits a single-line output
pub fn strip_line_breaks(input: &str) -> String {
    input.chars().filter(|c| *c != '\n' && *c != '\r').collect()
}

/// Percentage of `hit` over `found`, rounded to one decimal place.
///
/// A file with nothing instrumented counts as fully covered.
pub fn round_percent(hit: u64, found: u64) -> f64 {
    if found == 0 {
        return 100.0;
    }
    ((hit as f64 / found as f64) * 1000.0).round() / 10.0
}

/// Render a one-decimal percentage, dropping a trailing `.0` (`85.0` -> `85`)
pub fn format_percent(value: f64) -> String {
    let rendered = format!("{:.1}", value);
    match rendered.strip_suffix(".0") {
        Some(whole) => whole.to_string(),
        None => rendered,
    }
}
