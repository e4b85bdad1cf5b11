//! Pure conversions between clock-style text and seconds, plus the three
//! derivation formulas (distance = time / pace, pace = time / distance,
//! time = distance * pace), all expressed in seconds-per-kilometer.
//!
//! Nothing in here validates or errors; malformed input maps to a defined
//! default and semantic validation lives in the calculator.

/// Convert `HH:MM:SS` or `MM:SS` text to total seconds. Empty or
/// unparseable text yields 0. No range checking ("00:75" is 75 seconds).
pub fn parse_clock(text: &str) -> i64 {
    try_parse_clock(text).unwrap_or(0)
}

/// Like `parse_clock` but distinguishes unparseable or overflowing text
/// from a genuine zero.
pub fn try_parse_clock(text: &str) -> Option<i64> {
    let parts: Vec<i64> = text
        .split(':')
        .map(|c| c.trim().parse().ok())
        .collect::<Option<_>>()?;

    match parts[..] {
        [hours, minutes, seconds] => total_seconds(hours, minutes, seconds),
        [minutes, seconds] => total_seconds(0, minutes, seconds),
        _ => None,
    }
}

/// Format total seconds as zero-padded `HH:MM:SS`. Negative input clamps
/// to `00:00:00`; hours are unbounded but padded to at least two digits.
pub fn format_clock(total_seconds: i64) -> String {
    if total_seconds < 0 {
        return "00:00:00".to_string();
    }

    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

/// Convert `MM:SS` pace text to seconds per kilometer. Anything other than
/// exactly two integer components yields 0.
pub fn parse_pace(text: &str) -> i64 {
    try_parse_pace(text).unwrap_or(0)
}

/// Like `parse_pace` but distinguishes unparseable or overflowing text
/// from a genuine zero.
pub fn try_parse_pace(text: &str) -> Option<i64> {
    let parts: Vec<i64> = text
        .split(':')
        .map(|c| c.trim().parse().ok())
        .collect::<Option<_>>()?;

    match parts[..] {
        [minutes, seconds] => total_seconds(0, minutes, seconds),
        _ => None,
    }
}

// Components are unbounded, so the sum must not trip overflow checks.
fn total_seconds(hours: i64, minutes: i64, seconds: i64) -> Option<i64> {
    hours
        .checked_mul(3600)?
        .checked_add(minutes.checked_mul(60)?)?
        .checked_add(seconds)
}

/// Format seconds per kilometer as zero-padded `MM:SS`. Negative input
/// clamps to `00:00`; minutes are unbounded.
pub fn format_pace(seconds_per_km: i64) -> String {
    if seconds_per_km < 0 {
        return "00:00".to_string();
    }

    let minutes = seconds_per_km / 60;
    let seconds = seconds_per_km % 60;

    format!("{minutes:02}:{seconds:02}")
}

/// distance = time / pace, rendered with two decimals.
///
/// Returns the literal `"0"` (unpadded, unlike the 2-decimal success form)
/// when either input is non-positive, so callers can tell "not computable"
/// from a genuine zero-length result.
pub fn derive_distance(total_seconds: i64, pace_seconds: i64) -> String {
    if total_seconds <= 0 || pace_seconds <= 0 {
        return "0".to_string();
    }

    let distance = total_seconds as f64 / pace_seconds as f64;
    format!("{distance:.2}")
}

/// pace = time / distance, fractional seconds truncated by the formatter.
pub fn derive_pace(total_seconds: i64, distance_km: f64) -> String {
    if total_seconds <= 0 || distance_km <= 0.0 {
        return "00:00".to_string();
    }

    format_pace((total_seconds as f64 / distance_km) as i64)
}

/// time = distance * pace, fractional seconds truncated by the formatter.
pub fn derive_time(distance_km: f64, pace_seconds: i64) -> String {
    if distance_km <= 0.0 || pace_seconds <= 0 {
        return "00:00:00".to_string();
    }

    format_clock((distance_km * pace_seconds as f64) as i64)
}

/// Longest-decimal-prefix float parse: leading whitespace is skipped,
/// trailing garbage (including exponent suffixes, so `"1e3"` is 1) is
/// ignored, `None` when there are no digits at all.
pub fn parse_float_prefix(text: &str) -> Option<f64> {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let mut i = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        i += 1;
    }

    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let int_digits = i - int_start;

    let mut frac_digits = 0;
    if bytes.get(i) == Some(&b'.') {
        let dot = i;
        i += 1;
        let frac_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        frac_digits = i - frac_start;
        // a bare "." with no digits on either side is not a number
        if int_digits == 0 && frac_digits == 0 {
            i = dot;
        }
    }

    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    s[..i].parse::<f64>().ok()
}
