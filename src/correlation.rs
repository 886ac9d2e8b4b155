use crate::aggregate::ProfileMatrix;
use crate::utils::round_to;

const DECIMALS: i32 = 2;

/// Neuron-by-neuron Pearson correlation of profile rows, rounded to two decimals.
///
/// A row with zero variance yields NaN in its row and column.
pub fn correlation_matrix(profile: &ProfileMatrix) -> Vec<Vec<f64>> {
    let centered: Vec<(Vec<f64>, f64)> = profile
        .rows()
        .iter()
        .map(|row| {
            let mean = row.iter().sum::<f64>() / row.len() as f64;
            let dev: Vec<f64> = row.iter().map(|x| x - mean).collect();
            let norm = dev.iter().map(|d| d * d).sum::<f64>().sqrt();
            (dev, norm)
        })
        .collect();

    centered
        .iter()
        .map(|(a, norm_a)| {
            centered
                .iter()
                .map(|(b, norm_b)| {
                    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
                    round_to((dot / (norm_a * norm_b)).clamp(-1.0, 1.0), DECIMALS)
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(rows: Vec<Vec<f64>>) -> ProfileMatrix {
        ProfileMatrix::new(rows).unwrap()
    }

    #[test]
    fn symmetric_with_unit_diagonal() {
        let corr = correlation_matrix(&profile(vec![
            vec![1.0, 2.0, 3.0, 5.0],
            vec![2.0, 1.0, 0.0, 4.0],
            vec![9.0, 3.0, 1.0, 0.5],
        ]));
        for i in 0..3 {
            assert!((corr[i][i] - 1.0).abs() <= 0.01);
            for j in 0..3 {
                assert_eq!(corr[i][j], corr[j][i]);
            }
        }
    }

    #[test]
    fn perfect_and_inverse_correlation() {
        let corr = correlation_matrix(&profile(vec![
            vec![1.0, 2.0, 3.0],
            vec![2.0, 4.0, 6.0],
            vec![3.0, 2.0, 1.0],
        ]));
        assert_eq!(corr[0][1], 1.0);
        assert_eq!(corr[0][2], -1.0);
    }

    #[test]
    fn rounds_to_two_decimals() {
        let corr = correlation_matrix(&profile(vec![vec![1.0, 2.0, 3.0, 4.0], vec![1.0, 3.0, 2.0, 4.0]]));
        // exact value is 0.8
        assert_eq!(corr[0][1], 0.8);
    }

    #[test]
    fn zero_variance_passes_nan_through() {
        let corr = correlation_matrix(&profile(vec![vec![1.0, 1.0, 1.0], vec![1.0, 2.0, 3.0]]));
        assert!(corr[0][0].is_nan());
        assert!(corr[0][1].is_nan());
        assert_eq!(corr[1][1], 1.0);
    }
}
