//! Turns an activation log into one profile row per hidden neuron.
//!
//! A profile row lives in feature space: entry `f` says what value feature
//! `f` tends to take when the neuron fires.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::recorder::ActivationLog;

/// Neuron-major matrix: `rows[j]` is the profile of neuron `j`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileMatrix {
    rows: Vec<Vec<f64>>,
}

impl ProfileMatrix {
    pub fn new(rows: Vec<Vec<f64>>) -> Result<Self> {
        if let Some(width) = rows.first().map(Vec::len) {
            if let Some(bad) = rows.iter().find(|r| r.len() != width) {
                return Err(Error::DimensionMismatch {
                    context: "profile row",
                    expected: width,
                    actual: bad.len(),
                });
            }
        }
        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Vec<f64>> {
        self.rows
    }

    pub fn neuron_count(&self) -> usize {
        self.rows.len()
    }

    pub fn feature_count(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum AggregationPolicy {
    /// Feature vectors averaged with weights proportional to `activation + 1`.
    #[default]
    WeightedAverage,
    /// The feature vector of the round the neuron peaked in.
    ArgMax,
}

impl AggregationPolicy {
    /// Short tag used in output file names.
    pub fn tag(self) -> &'static str {
        match self {
            AggregationPolicy::WeightedAverage => "wa",
            AggregationPolicy::ArgMax => "max",
        }
    }

    pub fn aggregate(self, log: &ActivationLog) -> Result<ProfileMatrix> {
        match self {
            AggregationPolicy::WeightedAverage => aggregate_weighted_average(log),
            AggregationPolicy::ArgMax => aggregate_arg_max(log),
        }
    }
}

impl fmt::Display for AggregationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AggregationPolicy::WeightedAverage => write!(f, "weighted"),
            AggregationPolicy::ArgMax => write!(f, "max"),
        }
    }
}

impl FromStr for AggregationPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "weighted" | "wa" => Ok(AggregationPolicy::WeightedAverage),
            "max" | "argmax" => Ok(AggregationPolicy::ArgMax),
            other => Err(format!("unknown aggregation policy '{other}' (expected weighted or max)")),
        }
    }
}

fn check_log(log: &ActivationLog) -> Result<()> {
    if log.is_empty() {
        return Err(Error::EmptyLog);
    }
    let neurons = log.neuron_count();
    if let Some(bad) = log.activations().iter().find(|a| a.len() != neurons) {
        return Err(Error::DimensionMismatch {
            context: "activation vector",
            expected: neurons,
            actual: bad.len(),
        });
    }
    let features = log.inputs()[0].len();
    if let Some(bad) = log.inputs().iter().find(|x| x.len() != features) {
        return Err(Error::DimensionMismatch {
            context: "feature vector",
            expected: features,
            actual: bad.len(),
        });
    }
    Ok(())
}

/// Per-neuron round weights `(a[t][j] + 1) / sum_t' (a[t'][j] + 1)`, neuron-major.
pub fn activation_weights(log: &ActivationLog) -> Result<Vec<Vec<f64>>> {
    check_log(log)?;
    let weights = (0..log.neuron_count())
        .map(|j| {
            let shifted: Vec<f64> = log.activations().iter().map(|a| a[j] + 1.0).collect();
            let total: f64 = shifted.iter().sum();
            shifted.into_iter().map(|w| w / total).collect::<Vec<f64>>()
        })
        .collect();
    Ok(weights)
}

pub fn aggregate_weighted_average(log: &ActivationLog) -> Result<ProfileMatrix> {
    let weights = activation_weights(log)?;
    let features = log.inputs()[0].len();

    let rows = weights
        .iter()
        .map(|round_weights| {
            let mut row = vec![0.0; features];
            for (w, input) in round_weights.iter().zip(log.inputs()) {
                for (acc, x) in row.iter_mut().zip(input) {
                    *acc += w * x;
                }
            }
            row
        })
        .collect();

    ProfileMatrix::new(rows)
}

/// Round 0 is skipped unless it is the only round. Ties keep the earliest round.
pub fn aggregate_arg_max(log: &ActivationLog) -> Result<ProfileMatrix> {
    check_log(log)?;
    let first = if log.len() > 1 { 1 } else { 0 };

    let rows = (0..log.neuron_count())
        .map(|j| {
            let mut best = first;
            for t in first + 1..log.len() {
                if log.activations()[t][j] > log.activations()[best][j] {
                    best = t;
                }
            }
            log.inputs()[best].clone()
        })
        .collect();

    ProfileMatrix::new(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log(rounds: Vec<(Vec<f64>, Vec<f64>)>) -> ActivationLog {
        let mut log = ActivationLog::new();
        for (features, hidden) in rounds {
            log.push(features, hidden);
        }
        log
    }

    #[test]
    fn weights_sum_to_one_per_neuron() {
        let log = log(vec![
            (vec![1.0, 0.0], vec![0.0, 3.0, 0.5]),
            (vec![0.0, 1.0], vec![2.0, 0.0, 0.5]),
            (vec![1.0, 1.0], vec![7.0, 1.0, 0.0]),
        ]);
        for row in activation_weights(&log).unwrap() {
            let total: f64 = row.iter().sum();
            assert!((total - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn weighted_average_by_hand() {
        // neuron 0 weights: 1/4, 3/4; neuron 1 weights: 1/2, 1/2
        let log = log(vec![(vec![4.0, 0.0], vec![0.0, 0.0]), (vec![0.0, 8.0], vec![2.0, 0.0])]);
        let profile = aggregate_weighted_average(&log).unwrap();
        assert_eq!(profile.rows(), &[vec![1.0, 6.0], vec![2.0, 4.0]]);
        assert_eq!(profile.neuron_count(), 2);
        assert_eq!(profile.feature_count(), 2);
    }

    #[test]
    fn single_round_weighted_average_is_that_round() {
        let log = log(vec![(vec![0.25, 3.0], vec![0.0, 5.0])]);
        let profile = aggregate_weighted_average(&log).unwrap();
        assert_eq!(profile.rows(), &[vec![0.25, 3.0], vec![0.25, 3.0]]);
    }

    #[test]
    fn arg_max_skips_first_round() {
        let log = log(vec![
            (vec![0.0], vec![9.0, 9.0]),
            (vec![1.0], vec![1.0, 5.0]),
            (vec![2.0], vec![3.0, 5.0]),
        ]);
        let profile = aggregate_arg_max(&log).unwrap();
        // neuron 1 ties between rounds 1 and 2: first wins
        assert_eq!(profile.rows(), &[vec![2.0], vec![1.0]]);
    }

    #[test]
    fn arg_max_single_round() {
        let log = log(vec![(vec![1.0, 2.0, 3.0], vec![0.0, 4.0])]);
        let profile = aggregate_arg_max(&log).unwrap();
        assert_eq!(profile.rows(), &[vec![1.0, 2.0, 3.0], vec![1.0, 2.0, 3.0]]);
    }

    #[test]
    fn empty_log_is_an_error() {
        assert!(matches!(
            AggregationPolicy::WeightedAverage.aggregate(&ActivationLog::new()),
            Err(Error::EmptyLog)
        ));
        assert!(matches!(aggregate_arg_max(&ActivationLog::new()), Err(Error::EmptyLog)));
    }

    #[test]
    fn ragged_activations_rejected() {
        let log = log(vec![(vec![1.0], vec![1.0, 2.0]), (vec![1.0], vec![1.0])]);
        assert!(matches!(
            aggregate_weighted_average(&log),
            Err(Error::DimensionMismatch { expected: 2, actual: 1, .. })
        ));
    }

    #[test]
    fn policy_parsing() {
        assert_eq!("weighted".parse::<AggregationPolicy>().unwrap(), AggregationPolicy::WeightedAverage);
        assert_eq!("max".parse::<AggregationPolicy>().unwrap(), AggregationPolicy::ArgMax);
        assert!("median".parse::<AggregationPolicy>().is_err());
        assert_eq!(AggregationPolicy::ArgMax.tag(), "max");
    }
}
