//! Summary statistics over trial outcomes

/// Arithmetic mean; 0 for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (divides by N)
pub fn population_std_dev(values: &[f64], mean: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let variance = values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Percentile `q` (0..=100) of ascending-sorted values.
///
/// Linear interpolation between closest ranks: the value at fractional
/// rank `q / 100 * (n - 1)`.
pub fn percentile(sorted: &[f64], q: f64) -> f64 {
    match sorted.len() {
        0 => 0.0,
        1 => sorted[0],
        n => {
            let rank = (q.clamp(0.0, 100.0) / 100.0) * (n - 1) as f64;
            let lower = rank.floor() as usize;
            let upper = rank.ceil() as usize;
            let weight = rank - lower as f64;
            sorted[lower] + (sorted[upper] - sorted[lower]) * weight
        }
    }
}

/// Sprint points for a mean duration, rounding half away from zero
/// (7.5 hours at 3 hours per point is 3 points, not 2).
pub fn sprint_points(mean_hours: f64, sprint_hours: f64) -> u64 {
    (mean_hours / sprint_hours).round().max(0.0) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_and_population_std_dev() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let m = mean(&values);
        assert_eq!(m, 5.0);
        assert_eq!(population_std_dev(&values, m), 2.0);
    }

    #[test]
    fn test_percentile_interpolates() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(percentile(&sorted, 50.0), 2.5);
        assert_eq!(percentile(&sorted, 0.0), 1.0);
        assert_eq!(percentile(&sorted, 100.0), 4.0);
        // rank = 0.025 * 3 = 0.075
        assert!((percentile(&sorted, 2.5) - 1.075).abs() < 1e-12);
        // rank = 0.975 * 3 = 2.925
        assert!((percentile(&sorted, 97.5) - 3.925).abs() < 1e-12);
    }

    #[test]
    fn test_percentile_small_inputs() {
        assert_eq!(percentile(&[], 50.0), 0.0);
        assert_eq!(percentile(&[7.0], 97.5), 7.0);
    }

    #[test]
    fn test_median_odd_count() {
        assert_eq!(percentile(&[1.0, 3.0, 10.0], 50.0), 3.0);
    }

    #[test]
    fn test_sprint_points_round_half_away_from_zero() {
        assert_eq!(sprint_points(5.0, 3.0), 2);
        assert_eq!(sprint_points(7.5, 3.0), 3);
        assert_eq!(sprint_points(4.5, 3.0), 2);
        assert_eq!(sprint_points(4.4, 3.0), 1);
        assert_eq!(sprint_points(0.0, 3.0), 0);
    }
}
