//! Column statistics over present values.

/// Arithmetic mean, or `None` when there are no values.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Median, averaging the two middle values for even counts.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Linear interpolation between `(x0, y0)` and `(x1, y1)` at `x`.
pub fn lerp(x0: usize, y0: f64, x1: usize, y1: f64, x: usize) -> f64 {
    let span = (x1 - x0) as f64;
    y0 + (y1 - y0) * ((x - x0) as f64 / span)
}
