//! Progress-reporting helpers. No state, no allocation.

/// Splits a nonnegative duration in milliseconds into `(hours, minutes, seconds, millis_remaining)`.
///
/// Integer parts are floors, not rounded; `millis_remaining` is `(t_ms mod 1000) / 1000`.
pub fn millis_to_time(t_ms: f64) -> (i64, i64, i64, f64) {
    let total_seconds = (t_ms / 1000.0).floor();
    let hours = (total_seconds / 3600.0).floor();
    let minutes = ((total_seconds - hours * 3600.0) / 60.0).floor();
    let seconds = total_seconds - hours * 3600.0 - minutes * 60.0;
    let millis_remaining = (t_ms % 1000.0) / 1000.0;
    (hours as i64, minutes as i64, seconds as i64, millis_remaining)
}
