use serde::Serialize;

/// True if any entry is NaN or infinite.
pub fn has_non_finite(values: &[f64]) -> bool {
    !values.iter().all(|v| v.is_finite())
}

/// Spread of a score column.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Stats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

/// All zeros for an empty slice.
pub fn vec_stats(values: &[f64]) -> Stats {
    if values.is_empty() {
        return Stats { min: 0.0, max: 0.0, mean: 0.0 };
    }
    let (min, max, sum) = values.iter().fold(
        (f64::INFINITY, f64::NEG_INFINITY, 0.0),
        |(min, max, sum), &v| (min.min(v), max.max(v), sum + v),
    );
    Stats {
        min,
        max,
        mean: sum / values.len() as f64,
    }
}

/// Rounds to `decimals` places.
pub fn round_to(x: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (x * scale).round() / scale
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_of_scores() {
        let s = vec_stats(&[2.0, 1.0, 3.0]);
        assert_eq!(s, Stats { min: 1.0, max: 3.0, mean: 2.0 });
        assert_eq!(vec_stats(&[]).mean, 0.0);
        assert_eq!(vec_stats(&[-4.5]), Stats { min: -4.5, max: -4.5, mean: -4.5 });
    }

    #[test]
    fn non_finite_detection() {
        assert!(!has_non_finite(&[1.0, -2.0]));
        assert!(has_non_finite(&[1.0, f64::NAN]));
    }

    #[test]
    fn rounding() {
        assert_eq!(round_to(0.66666, 3), 0.667);
        assert_eq!(round_to(-0.125, 2), -0.13);
        assert!(round_to(f64::NAN, 2).is_nan());
    }
}
