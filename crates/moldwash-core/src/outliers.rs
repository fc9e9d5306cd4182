//! Quartile-based outlier exclusion.
//!
//! The acceptance range for a column is [Q1 - m*IQR, Q3 + m*IQR], computed
//! over the column's known values within one (plant, status, date) group.
//! Degenerate groups get no special casing: a single value gives Q1 = Q3, so
//! only exact matches survive, and two values give a range wide enough to
//! keep both.

/// Linear-interpolation quantile over a sorted, non-empty slice (the common
/// "type 7" definition: h = (n - 1) * p).
pub fn quantile(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let h = (n - 1) as f64 * p;
    let lo = h.floor() as usize;
    let hi = (lo + 1).min(n - 1);
    let frac = h - lo as f64;
    sorted[lo] + frac * (sorted[hi] - sorted[lo])
}

/// Acceptance bounds over the known values, or `None` when there is nothing
/// to bound.
pub fn iqr_bounds(values: &[f64], multiplier: f64) -> Option<(f64, f64)> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let q1 = quantile(&sorted, 0.25);
    let q3 = quantile(&sorted, 0.75);
    let iqr = q3 - q1;
    Some((q1 - multiplier * iqr, q3 + multiplier * iqr))
}

/// Narrows a survivor set by one duration column.
///
/// `column` is row-aligned with the group; `survivors` indexes into it. An
/// unknown value cannot satisfy a numeric bound and is dropped, and a column
/// with no known values among the survivors empties the set entirely.
pub fn retain_within_iqr(
    column: &[Option<f64>],
    survivors: &[usize],
    multiplier: f64,
) -> Vec<usize> {
    let known: Vec<f64> = survivors.iter().filter_map(|&idx| column[idx]).collect();
    let Some((lower, upper)) = iqr_bounds(&known, multiplier) else {
        return Vec::new();
    };
    survivors
        .iter()
        .copied()
        .filter(|&idx| column[idx].is_some_and(|value| value >= lower && value <= upper))
        .collect()
}
