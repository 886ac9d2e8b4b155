use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

fn relu(x: f64) -> f64 {
    x.max(0.0)
}

/// Flat parameters of a single hidden layer network.
///
/// Layout of `weights`: `hidden_count` rows of `feature_count` input weights,
/// then `hidden_count` output weights, then `hidden_count` biases.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeightSet {
    #[serde(rename = "num_features")]
    pub feature_count: usize,
    #[serde(rename = "num_hidden")]
    pub hidden_count: usize,
    pub weights: Vec<f64>,
}

impl WeightSet {
    pub fn expected_len(feature_count: usize, hidden_count: usize) -> usize {
        feature_count * hidden_count + 2 * hidden_count
    }
}

pub struct Network {
    pub feature_count: usize,
    pub hidden_count: usize,
    pub weights_ih: Vec<Vec<f64>>, //input -> hidden
    pub weights_ho: Vec<f64>,      //hidden -> output
    pub bias: Vec<f64>,
}

impl Network {
    pub fn new(set: &WeightSet) -> Result<Self> {
        let (features, hidden) = (set.feature_count, set.hidden_count);
        let expected = WeightSet::expected_len(features, hidden);
        if set.weights.len() != expected {
            return Err(Error::DimensionMismatch {
                context: "weight set",
                expected,
                actual: set.weights.len(),
            });
        }

        let (ih, rest) = set.weights.split_at(features * hidden);
        let (ho, bias) = rest.split_at(hidden);
        let weights_ih = if features == 0 {
            vec![Vec::new(); hidden]
        } else {
            ih.chunks(features).map(|row| row.to_vec()).collect()
        };

        Ok(Self {
            feature_count: features,
            hidden_count: hidden,
            weights_ih,
            weights_ho: ho.to_vec(),
            bias: bias.to_vec(),
        })
    }

    /// Returns the hidden activations and the scalar output.
    pub fn forward(&self, input: &[f64]) -> Result<(Vec<f64>, f64)> {
        if input.len() != self.feature_count {
            return Err(Error::DimensionMismatch {
                context: "feature vector",
                expected: self.feature_count,
                actual: input.len(),
            });
        }

        let hidden: Vec<f64> = self
            .weights_ih
            .iter()
            .zip(&self.bias)
            .map(|(weights, b)| relu(weights.iter().zip(input).map(|(w, i)| w * i).sum::<f64>() + b))
            .collect();

        let output = self.weights_ho.iter().zip(&hidden).map(|(w, h)| w * h).sum::<f64>();

        Ok((hidden, output))
    }
}
