//! Bivariate analysis: Pearson correlation and least-squares line fit.

use serde::{Deserialize, Serialize};

use crate::record::Record;

/// Pairs `(a, b)` from records where both fields are numeric.
pub fn paired_values(records: &[Record], field_a: &str, field_b: &str) -> Vec<(f64, f64)> {
    records
        .iter()
        .filter_map(|r| Some((r.number(field_a)?, r.number(field_b)?)))
        .collect()
}

fn is_constant(mut values: impl Iterator<Item = f64>) -> bool {
    match values.next() {
        Some(first) => values.all(|v| v == first),
        None => true,
    }
}

/// Pearson correlation coefficient of two paired samples.
///
/// Returns 0 with fewer than two pairs or when either side has no variance.
pub fn pearson(pairs: &[(f64, f64)]) -> f64 {
    if pairs.len() < 2
        || is_constant(pairs.iter().map(|p| p.0))
        || is_constant(pairs.iter().map(|p| p.1))
    {
        return 0.0;
    }

    let n = pairs.len() as f64;
    let mean_a = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_b = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let (mut cov, mut var_a, mut var_b) = (0.0, 0.0, 0.0);
    for &(a, b) in pairs {
        let (da, db) = (a - mean_a, b - mean_b);
        cov += da * db;
        var_a += da * da;
        var_b += db * db;
    }

    // the product of two large variances can overflow
    let den = match (var_a * var_b).sqrt() {
        d if d.is_normal() => d,
        _ => var_a.sqrt() * var_b.sqrt(),
    };
    if den == 0.0 || !den.is_finite() {
        return 0.0;
    }
    (cov / den).clamp(-1.0, 1.0)
}

/// Pearson correlation between two fields of `records`.
pub fn correlation(records: &[Record], field_a: &str, field_b: &str) -> f64 {
    pearson(&paired_values(records, field_a, field_b))
}

/// Least-squares line `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionLine {
    pub slope: f64,
    pub intercept: f64,
    /// False when the fit is undefined (fewer than two points, or all x equal)
    pub valid: bool,
}

impl RegressionLine {
    pub const INVALID: RegressionLine = RegressionLine {
        slope: 0.0,
        intercept: 0.0,
        valid: false,
    };

    /// Value of the line at `x`, `None` for an invalid fit.
    pub fn predict(&self, x: f64) -> Option<f64> {
        self.valid.then(|| self.slope * x + self.intercept)
    }
}

/// Ordinary least squares over `(x, y)` points.
///
/// `slope = (nΣxy − ΣxΣy) / (nΣx² − (Σx)²)`, `intercept = (Σy − slope·Σx) / n`.
pub fn linear_regression(points: &[(f64, f64)]) -> RegressionLine {
    if points.len() < 2 || is_constant(points.iter().map(|p| p.0)) {
        return RegressionLine::INVALID;
    }

    let n = points.len() as f64;
    let (mut sx, mut sy, mut sxy, mut sxx) = (0.0, 0.0, 0.0, 0.0);
    for &(x, y) in points {
        sx += x;
        sy += y;
        sxy += x * y;
        sxx += x * x;
    }

    let denominator = n * sxx - sx * sx;
    if denominator == 0.0 || !denominator.is_finite() {
        return RegressionLine::INVALID;
    }

    let slope = (n * sxy - sx * sy) / denominator;
    RegressionLine {
        slope,
        intercept: (sy - slope * sx) / n,
        valid: true,
    }
}

/// Fit `y_field` against `x_field` over records where both are numeric.
pub fn regression(records: &[Record], x_field: &str, y_field: &str) -> RegressionLine {
    let line = linear_regression(&paired_values(records, x_field, y_field));
    if !line.valid {
        tracing::debug!(x = x_field, y = y_field, "regression undefined for input");
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(xs: &[f64], ys: &[f64]) -> Vec<Record> {
        xs.iter()
            .zip(ys)
            .map(|(x, y)| Record::new().with("x", *x).with("y", *y))
            .collect()
    }

    #[test]
    fn test_perfect_positive_and_negative() {
        let x = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(correlation(&pairs(&x, &[1.0, 2.0, 3.0, 4.0]), "x", "y"), 1.0);
        assert_eq!(correlation(&pairs(&x, &[4.0, 3.0, 2.0, 1.0]), "x", "y"), -1.0);
    }

    #[test]
    fn test_constant_side_is_zero() {
        let x = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(correlation(&pairs(&x, &[0.1, 0.1, 0.1, 0.1]), "x", "y"), 0.0);
        assert_eq!(correlation(&pairs(&[2.0, 2.0], &[1.0, 5.0]), "x", "y"), 0.0);
    }

    #[test]
    fn test_large_magnitudes_keep_their_correlation() {
        let large = [(1e100, 1e100), (2e100, 2e100), (3e100, 3e100)];
        assert!((pearson(&large) - 1.0).abs() < 1e-12);

        let inverse = [(1e100, 3e100), (2e100, 2e100), (3e100, 1e100)];
        assert!((pearson(&inverse) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_too_few_pairs() {
        assert_eq!(correlation(&pairs(&[1.0], &[1.0]), "x", "y"), 0.0);
        assert_eq!(correlation(&[], "x", "y"), 0.0);
    }

    #[test]
    fn test_drops_incomplete_pairs() {
        let mut records = pairs(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]);
        records.push(Record::new().with("x", 4.0).with("y", "missing"));
        records.push(Record::new().with("y", 100.0));
        assert_eq!(paired_values(&records, "x", "y").len(), 3);
        assert_eq!(correlation(&records, "x", "y"), 1.0);
    }

    #[test]
    fn test_regression_identity() {
        let line = linear_regression(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)]);
        assert_eq!(
            line,
            RegressionLine {
                slope: 1.0,
                intercept: 0.0,
                valid: true
            }
        );
        assert_eq!(line.predict(5.0), Some(5.0));
    }

    #[test]
    fn test_regression_equal_x_invalid() {
        let line = linear_regression(&[(1.0, 5.0), (1.0, 7.0)]);
        assert!(!line.valid);
        assert_eq!(line, RegressionLine::INVALID);
        assert_eq!(line.predict(1.0), None);
    }

    #[test]
    fn test_regression_too_few_points() {
        assert!(!linear_regression(&[]).valid);
        assert!(!linear_regression(&[(1.0, 1.0)]).valid);
    }

    #[test]
    fn test_regression_from_records() {
        let records = pairs(&[1.0, 2.0, 3.0], &[3.0, 5.0, 7.0]);
        let line = regression(&records, "x", "y");
        assert!(line.valid);
        assert!((line.slope - 2.0).abs() < 1e-12);
        assert!((line.intercept - 1.0).abs() < 1e-12);
    }
}
