//! Formatting helpers for presenting metrics.

/// Placeholder shown for missing or non-finite values.
pub const PLACEHOLDER: &str = "—";

/// Round half up (towards positive infinity), the way browsers round.
pub(crate) fn js_round(value: f64) -> f64 {
    (value + 0.5).floor()
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// `0.8` → `80.0%` (with `digits = 1`).
pub fn to_pct(value: Option<f64>, digits: usize) -> String {
    match finite(value) {
        Some(v) => format!("{:.digits$}%", v * 100.0),
        None => PLACEHOLDER.to_string(),
    }
}

/// Percentage rounded to a tenth of a percent: `0.83333` → `83.3%`.
pub fn as_percent(value: Option<f64>) -> String {
    match finite(value) {
        Some(v) => format!("{:.1}%", js_round(v * 1000.0) / 10.0),
        None => PLACEHOLDER.to_string(),
    }
}

/// `42_000` → `42s`, `125_000` → `2m 5s`.
pub fn ms_to_words(ms: Option<f64>) -> String {
    let Some(ms) = finite(ms).filter(|v| *v >= 0.0) else {
        return PLACEHOLDER.to_string();
    };
    let secs = js_round(ms / 1000.0) as u64;
    if secs < 60 {
        return format!("{secs}s");
    }
    let (minutes, rest) = (secs / 60, secs % 60);
    if rest == 0 {
        format!("{minutes}m")
    } else {
        format!("{minutes}m {rest}s")
    }
}

/// Seconds with one decimal: `1234.0` → `1.2`.
pub fn ms_to_sec(ms: Option<f64>) -> String {
    match finite(ms) {
        Some(v) => format!("{:.1}", js_round(v / 100.0) / 10.0),
        None => PLACEHOLDER.to_string(),
    }
}

/// Thousands separators: `1234567` → `1,234,567`.
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
