/// Arithmetic mean; `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Sample standard deviation (n - 1 denominator). Zero with fewer than two values.
pub fn sample_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let avg = values.iter().sum::<f64>() / values.len() as f64;
    let variance = values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

/// Least-squares slope of `y` over `x`. `None` when x has no spread.
pub fn linear_slope(points: &[(f64, f64)]) -> Option<f64> {
    if points.len() < 2 {
        return None;
    }
    let n = points.len() as f64;
    let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / n;

    let mut num = 0.0;
    let mut den = 0.0;
    for (x, y) in points {
        num += (x - mean_x) * (y - mean_y);
        den += (x - mean_x).powi(2);
    }

    if den.abs() < f64::EPSILON {
        None
    } else {
        Some(num / den)
    }
}

/// `total / divisor`, undefined unless the divisor is a positive finite number.
pub fn per_unit(total: f64, divisor: f64) -> Option<f64> {
    if divisor.is_finite() && divisor > 0.0 {
        Some(total / divisor)
    } else {
        None
    }
}

/// Usable physical quantity: finite and non-negative.
pub fn is_valid_quantity(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_empty_is_none() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[2.0, 4.0]), Some(3.0));
    }

    #[test]
    fn sample_std_dev_uses_n_minus_one() {
        assert_eq!(sample_std_dev(&[5.0]), 0.0);
        let sd = sample_std_dev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert!((sd - 2.138_089_935).abs() < 1e-6);
    }

    #[test]
    fn slope_of_straight_line() {
        let points = [(0.0, 1.0), (1.0, 3.0), (2.0, 5.0)];
        assert!((linear_slope(&points).unwrap() - 2.0).abs() < 1e-12);
        assert_eq!(linear_slope(&[(1.0, 1.0), (1.0, 5.0)]), None);
    }

    #[test]
    fn per_unit_guards_degenerate_divisors() {
        assert_eq!(per_unit(10.0, 4.0), Some(2.5));
        assert_eq!(per_unit(10.0, 0.0), None);
        assert_eq!(per_unit(10.0, -1.0), None);
        assert_eq!(per_unit(10.0, f64::NAN), None);
    }
}
