/// Format seconds as `m:ss`. Invalid input renders as `0:00` rather than
/// propagating NaN into the UI.
pub fn format_clock(secs: f64) -> String {
    if !secs.is_finite() || secs < 0.0 {
        return "0:00".to_string();
    }
    let total = secs.floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

/// Format an optional clock; unknown renders as `--:--`.
pub fn format_clock_opt(secs: Option<f64>) -> String {
    match secs {
        Some(s) => format_clock(s),
        None => "--:--".to_string(),
    }
}
