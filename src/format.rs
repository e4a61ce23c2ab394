//! Compact number formatting with thousand-tier suffixes.

const SUFFIXES: [&str; 9] = ["k", "m", "b", "t", "q", "r", "s", "o", "n"];

/// Format a value as `999`, `1.2k`, `3.4m`, ...
///
/// Values below 1000 in magnitude print as-is. Past the last suffix the
/// value keeps scaling by the last tier.
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return "n/a".to_string();
    }

    let tier = if value == 0.0 {
        0
    } else {
        (value.abs().log10() / 3.0).trunc() as i32
    };
    if tier <= 0 {
        return plain(value);
    }

    let tier = tier.min(SUFFIXES.len() as i32);
    let scaled = value / 10f64.powi(tier * 3);
    format!("{:.1}{}", scaled, SUFFIXES[tier as usize - 1])
}

/// Full-precision display: integral values without a trailing `.0`.
pub fn plain(value: f64) -> String {
    if !value.is_finite() {
        "n/a".to_string()
    } else if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        let s = format!("{:.2}", value);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}
