/// Confidence (0-100) from how much of the registry is selected.
///
/// Measures indicator coverage chosen by the caller, not data completeness.
pub fn confidence(active_count: usize, total_indicator_count: usize) -> f64 {
    if total_indicator_count == 0 {
        return 0.0;
    }
    (active_count as f64 / total_indicator_count as f64 * 100.0).min(100.0)
}
