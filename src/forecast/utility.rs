/// Computes the arithmetic mean of a slice of values. Returns 0.0 for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Computes the population standard deviation given a pre-computed mean.
/// Returns 0.0 for empty input.
pub fn stddev(values: &[f64], mean: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;

    variance.sqrt()
}

/// Least-squares line through `(i, values[i])`, returned as `(intercept, slope)`.
///
/// Fewer than two points, or a degenerate design, yield a flat line at the mean.
pub fn linear_fit(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    if values.len() < 2 {
        return (mean(values), 0.0);
    }

    let (mut sum_x, mut sum_y, mut sum_xy, mut sum_x2) = (0.0, 0.0, 0.0, 0.0);
    for (i, y) in values.iter().enumerate() {
        let x = i as f64;
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_x2 += x * x;
    }

    let denominator = n * sum_x2 - sum_x * sum_x;
    if denominator == 0.0 {
        return (mean(values), 0.0);
    }

    let slope = (n * sum_xy - sum_x * sum_y) / denominator;
    let intercept = (sum_y - slope * sum_x) / n;

    (intercept, slope)
}

/// Centered moving average of length `period`, one value per index in
/// `period / 2 .. len - period / 2`. Even periods use the 2×`period` average
/// so the window stays centered.
pub fn centered_moving_average(values: &[f64], period: usize) -> Vec<f64> {
    let half = period / 2;
    if period == 0 || values.len() < 2 * half + 1 {
        return Vec::new();
    }

    (half..values.len() - half)
        .map(|i| {
            let window = &values[i - half..=i + half];
            if period % 2 == 1 {
                mean(window)
            } else {
                let inner: f64 = window[1..period].iter().sum();
                (0.5 * window[0] + inner + 0.5 * window[period]) / period as f64
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_empty() {
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn test_stddev_constant_is_zero() {
        let values = [4.0, 4.0, 4.0];
        assert_eq!(stddev(&values, mean(&values)), 0.0);
    }

    #[test]
    fn test_stddev_population() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((stddev(&values, mean(&values)) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_linear_fit_exact_line() {
        let values = [3.0, 5.0, 7.0, 9.0];
        let (intercept, slope) = linear_fit(&values);
        assert!((intercept - 3.0).abs() < 1e-12);
        assert!((slope - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_linear_fit_single_point_is_flat() {
        assert_eq!(linear_fit(&[42.0]), (42.0, 0.0));
    }

    #[test]
    fn test_centered_moving_average_odd_period() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(centered_moving_average(&values, 3), vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_centered_moving_average_even_period_cancels_cycle() {
        // period-4 cycle on top of a line: the 2x4 average recovers the line
        let cycle = [3.0, -1.0, -3.0, 1.0];
        let values: Vec<f64> = (0..12).map(|i| 10.0 + 2.0 * i as f64 + cycle[i % 4]).collect();

        let trend = centered_moving_average(&values, 4);
        assert_eq!(trend.len(), 8);
        for (j, t) in trend.iter().enumerate() {
            assert!((t - (10.0 + 2.0 * (j + 2) as f64)).abs() < 1e-12);
        }
    }

    #[test]
    fn test_centered_moving_average_too_short() {
        assert!(centered_moving_average(&[1.0, 2.0], 3).is_empty());
    }
}
