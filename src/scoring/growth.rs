use crate::UsageEvent;

/// Period-over-period growth as a percentage, rounded to 2 decimals.
/// A zero previous period yields 100.0 when any current usage exists,
/// otherwise 0.0; a brand-new tag is never a division error.
pub fn growth_rate(current: u64, previous: u64) -> f64 {
    if previous == 0 {
        return if current > 0 { 100.0 } else { 0.0 };
    }
    let change = (current as f64 - previous as f64) / previous as f64 * 100.0;
    round2(change)
}

/// Count events whose timestamp falls in the half-open window `[start, end)`.
pub fn count_in_window(events: &[UsageEvent], start: i64, end: i64) -> u64 {
    events
        .iter()
        .filter(|event| event.occurred_at >= start && event.occurred_at < end)
        .count() as u64
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
