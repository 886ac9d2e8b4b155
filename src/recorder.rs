use tracing::trace;

use crate::action::{Action, History};
use crate::error::Result;
use crate::features::compute_features;
use crate::game::Strategy;
use crate::network::Network;

/// Feature vectors and the hidden activations they produced, one pair per round.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ActivationLog {
    inputs: Vec<Vec<f64>>,
    activations: Vec<Vec<f64>>,
}

impl ActivationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, features: Vec<f64>, hidden: Vec<f64>) {
        self.inputs.push(features);
        self.activations.push(hidden);
    }

    /// Appends every round of `other`, e.g. to pool several matches.
    pub fn extend(&mut self, other: ActivationLog) {
        self.inputs.extend(other.inputs);
        self.activations.extend(other.activations);
    }

    pub fn clear(&mut self) {
        self.inputs.clear();
        self.activations.clear();
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    pub fn inputs(&self) -> &[Vec<f64>] {
        &self.inputs
    }

    pub fn activations(&self) -> &[Vec<f64>] {
        &self.activations
    }

    /// Number of hidden units, taken from the first round.
    pub fn neuron_count(&self) -> usize {
        self.activations.first().map_or(0, Vec::len)
    }
}

/// Plays like the wrapped network while logging every forward pass.
pub struct ActivationRecorder {
    name: String,
    network: Network,
    log: ActivationLog,
}

impl ActivationRecorder {
    pub fn new(name: impl Into<String>, network: Network) -> Self {
        Self {
            name: name.into(),
            network,
            log: ActivationLog::new(),
        }
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn log(&self) -> &ActivationLog {
        &self.log
    }

    /// Hands over the log, leaving an empty one behind.
    pub fn take_log(&mut self) -> ActivationLog {
        std::mem::take(&mut self.log)
    }
}

impl Strategy for ActivationRecorder {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn decide(&mut self, own: &History, opponent: &History) -> Result<Action> {
        let features = compute_features(own, opponent);
        let (hidden, output) = self.network.forward(&features)?;
        trace!(round = own.len(), output, "forward pass");
        self.log.push(features, hidden);
        Ok(if output > 0.0 {
            Action::Cooperate
        } else {
            Action::Defect
        })
    }

    fn reset(&mut self) {
        self.log.clear();
    }
}
