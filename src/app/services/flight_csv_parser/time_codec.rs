//! Clock time normalisation into the HHMM integer encoding
//!
//! Source extracts mix `1305`, `1305.0`, `13:05` and bare minute values such
//! as `45`. All of them are reduced to a single integer where the hour sits
//! in the hundreds and the minute in the last two digits; 0 means "absent".

/// Normalise a raw time field into HHMM, or 0 when absent or unparseable
///
/// Rules, in order:
/// - blank is absent
/// - anything from the first `.` onwards is dropped
/// - an integer below 100 is returned unchanged, so `45` stays `45` (00:45)
///   and `99` stays `99` even though it is not a valid clock time
/// - an integer from 100 to 2399 is returned unchanged
/// - an integer of 2400 or more is reduced modulo 2400
/// - otherwise `HH:MM` is tried with hours clamped to 0..=23 and minutes to 0..=59
///
/// Bare values below 100 are taken literally rather than checked against the
/// surrounding file's convention; callers rely on that.
pub fn normalize_time(raw: &str) -> u16 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0;
    }

    let whole = match trimmed.find('.') {
        Some(dot) => &trimmed[..dot],
        None => trimmed,
    }
    .trim();

    match whole.parse::<i32>() {
        Ok(value) => normalize_integer_time(value),
        Err(_) => parse_clock_time(whole).unwrap_or(0),
    }
}

fn normalize_integer_time(value: i32) -> u16 {
    match value {
        // Below 100 is taken literally, 100..=2399 is already HHMM
        0..=2399 => value as u16,
        2400.. => (value % 2400) as u16,
        // Negative values are not times
        _ => 0,
    }
}

/// Parse `HH:MM`, clamping both parts into range; extra `:SS` parts are ignored
fn parse_clock_time(value: &str) -> Option<u16> {
    let mut parts = value.split(':');
    let hours: i32 = parts.next()?.trim().parse().ok()?;
    let minutes: i32 = parts.next()?.trim().parse().ok()?;

    let hours = hours.clamp(0, 23);
    let minutes = minutes.clamp(0, 59);
    Some((hours * 100 + minutes) as u16)
}
