//! One recording run: play the network against opponents, pool its hidden
//! activations and reduce them to a profile and a correlation map.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::aggregate::{AggregationPolicy, ProfileMatrix};
use crate::correlation::correlation_matrix;
use crate::error::Result;
use crate::game::{DEFAULT_TURNS, Match, MatchResult, Strategy};
use crate::log::scalar;
use crate::manifest::{RunManifest, save_manifest};
use crate::network::{Network, WeightSet};
use crate::recorder::{ActivationLog, ActivationRecorder};
use crate::report::{render_heat_map, save_profile};
use crate::utils::has_non_finite;

pub struct RecordingSession {
    pub label: String,
    pub weights: WeightSet,
    pub turns: usize,
    pub policy: AggregationPolicy,
}

pub struct SessionOutput {
    pub results: Vec<MatchResult>,
    pub log: ActivationLog,
    pub profile: ProfileMatrix,
    pub correlation: Vec<Vec<f64>>,
    pub manifest: RunManifest,
}

impl RecordingSession {
    pub fn new(label: impl Into<String>, weights: WeightSet) -> Self {
        Self {
            label: label.into(),
            weights,
            turns: DEFAULT_TURNS,
            policy: AggregationPolicy::default(),
        }
    }

    /// Plays every opponent in turn with the recorder as second player.
    /// `on_match` sees each result as soon as the match ends.
    pub fn run(
        &self,
        opponents: Vec<Box<dyn Strategy>>,
        mut on_match: impl FnMut(&MatchResult),
    ) -> Result<SessionOutput> {
        let network = Network::new(&self.weights)?;
        let mut recorder = ActivationRecorder::new(self.label.clone(), network);
        let game = Match::new(self.turns);
        let mut manifest = RunManifest::new(
            self.label.clone(),
            self.weights.feature_count,
            self.weights.hidden_count,
            self.policy,
        );
        let mut log = ActivationLog::new();
        let mut results = Vec::with_capacity(opponents.len());

        for (step, mut opponent) in opponents.into_iter().enumerate() {
            let result = game.play(opponent.as_mut(), &mut recorder)?;
            let (_, own_score) = result.final_score();
            scalar(step as u64, "score", own_score as f64);
            on_match(&result);

            manifest.record(&result);
            log.extend(recorder.take_log());
            results.push(result);
        }

        let profile = self.policy.aggregate(&log)?;
        let correlation = correlation_matrix(&profile);
        if correlation.iter().any(|row| has_non_finite(row)) {
            warn!("correlation map has undefined entries (a neuron never varied)");
        }
        info!(
            network = %self.label,
            matches = results.len(),
            rounds = log.len(),
            policy = %self.policy,
            "session complete"
        );

        Ok(SessionOutput {
            results,
            log,
            profile,
            correlation,
            manifest,
        })
    }
}

/// File names of one run's artifacts, keyed by hidden size and opponent tag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputPaths {
    pub heat_map: PathBuf,
    pub profile: PathBuf,
    pub manifest: PathBuf,
}

impl OutputPaths {
    pub fn new(
        visuals_dir: impl AsRef<Path>,
        data_dir: impl AsRef<Path>,
        hidden: usize,
        opponent: &str,
        policy: AggregationPolicy,
    ) -> Self {
        let (visuals, data) = (visuals_dir.as_ref(), data_dir.as_ref());
        Self {
            heat_map: visuals.join(format!("neuron-corrmap-{hidden}-{opponent}.svg")),
            profile: data.join(format!("{}-{hidden}-{opponent}.pkl", policy.tag())),
            manifest: data.join(format!("run-{hidden}-{opponent}.json")),
        }
    }

    pub fn write(&self, output: &SessionOutput) -> Result<()> {
        render_heat_map(&output.correlation, &self.heat_map)?;
        save_profile(&output.profile, &self.profile)?;
        save_manifest(&self.manifest, &output.manifest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::NUM_FEATURES;
    use crate::strategies::{Basic, basic_strategies};

    fn weights(hidden: usize) -> WeightSet {
        let n = WeightSet::expected_len(NUM_FEATURES, hidden);
        WeightSet {
            feature_count: NUM_FEATURES,
            hidden_count: hidden,
            weights: (0..n).map(|i| ((i % 7) as f64 - 3.0) / 10.0).collect(),
        }
    }

    #[test]
    fn single_opponent_run() {
        let session = RecordingSession::new("Evolved ANN", weights(4));
        let mut seen = Vec::new();
        let out = session
            .run(vec![Box::new(Basic::TitForTat)], |r| seen.push(r.players.0.clone()))
            .unwrap();
        assert_eq!(seen, vec!["Tit For Tat"]);
        assert_eq!(out.log.len(), DEFAULT_TURNS);
        assert_eq!(out.profile.neuron_count(), 4);
        assert_eq!(out.profile.feature_count(), NUM_FEATURES);
        assert_eq!(out.correlation.len(), 4);
        assert_eq!(out.manifest.matches.len(), 1);
    }

    #[test]
    fn all_opponents_pool_their_logs() {
        let mut session = RecordingSession::new("Evolved ANN", weights(3));
        session.turns = 5;
        let opponents = basic_strategies();
        let count = opponents.len();
        let out = session.run(opponents, |_| {}).unwrap();
        assert_eq!(out.results.len(), count);
        assert_eq!(out.log.len(), 5 * count);
        assert_eq!(out.manifest.rounds_recorded, 5 * count);
    }

    #[test]
    fn output_names() {
        let paths = OutputPaths::new("visuals", "data", 10, "Tit_For_Tat", AggregationPolicy::WeightedAverage);
        assert_eq!(paths.heat_map, Path::new("visuals/neuron-corrmap-10-Tit_For_Tat.svg"));
        assert_eq!(paths.profile, Path::new("data/wa-10-Tit_For_Tat.pkl"));
        assert_eq!(paths.manifest, Path::new("data/run-10-Tit_For_Tat.json"));
        let max = OutputPaths::new("v", "d", 5, "all", AggregationPolicy::ArgMax);
        assert_eq!(max.profile, Path::new("d/max-5-all.pkl"));
    }

    #[test]
    fn writes_all_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let session = RecordingSession::new("Evolved ANN", weights(3));
        let out = session.run(vec![Box::new(Basic::Alternator)], |_| {}).unwrap();
        let paths = OutputPaths::new(dir.path(), dir.path(), 3, "Alternator", session.policy);
        paths.write(&out).unwrap();
        assert!(paths.heat_map.is_file());
        assert!(paths.profile.is_file());
        assert!(paths.manifest.is_file());
    }
}
