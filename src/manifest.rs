//! JSON summary of a recording run, written next to the profile matrix.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::aggregate::AggregationPolicy;
use crate::error::Result;
use crate::game::MatchResult;
use crate::metrics::{
    DEFAULT_MIN_STREAK, cooperation_rate, forgiveness_rate, niceness, retaliation_rate, streak_action_rate,
};
use crate::report::{read_json, write_json_pretty};

/// One match, seen from the recorded network (the second player).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub opponent: String,
    pub turns: usize,
    pub scores: (u32, u32),
    pub winner: Option<String>,
    pub cooperation_rate: f64,
    pub forgiveness_rate: f64,
    pub retaliation_rate: f64,
    pub niceness: u8,
    pub coop_during_streaks: f64,
}

impl MatchSummary {
    pub fn from_result(result: &MatchResult) -> Self {
        let (opponent, own) = result.actions();
        Self {
            opponent: result.players.0.clone(),
            turns: result.rounds.len(),
            scores: result.final_score(),
            winner: result.winner().map(str::to_string),
            cooperation_rate: cooperation_rate(&own),
            forgiveness_rate: forgiveness_rate(&own, &opponent),
            retaliation_rate: retaliation_rate(&own, &opponent),
            niceness: niceness(&own, &opponent),
            coop_during_streaks: streak_action_rate(&own, &opponent, DEFAULT_MIN_STREAK, Action::Cooperate),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunManifest {
    pub created_at: DateTime<Utc>,
    pub network: String,
    pub feature_count: usize,
    pub hidden_count: usize,
    pub aggregation: String,
    pub rounds_recorded: usize,
    pub matches: Vec<MatchSummary>,
}

impl RunManifest {
    pub fn new(network: impl Into<String>, feature_count: usize, hidden_count: usize, policy: AggregationPolicy) -> Self {
        Self {
            created_at: Utc::now(),
            network: network.into(),
            feature_count,
            hidden_count,
            aggregation: policy.to_string(),
            rounds_recorded: 0,
            matches: Vec::new(),
        }
    }

    pub fn record(&mut self, result: &MatchResult) {
        self.rounds_recorded += result.rounds.len();
        self.matches.push(MatchSummary::from_result(result));
    }
}

pub fn save_manifest(path: impl AsRef<Path>, manifest: &RunManifest) -> Result<()> {
    write_json_pretty(manifest, path)
}

pub fn load_manifest(path: impl AsRef<Path>) -> Result<RunManifest> {
    read_json(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{C, D};

    fn result() -> MatchResult {
        MatchResult {
            players: ("Tit For Tat".into(), "Evolved ANN".into()),
            rounds: vec![(C, C), (C, D), (D, C), (C, C)],
        }
    }

    #[test]
    fn summary_uses_second_player_view() {
        let s = MatchSummary::from_result(&result());
        assert_eq!(s.opponent, "Tit For Tat");
        assert_eq!(s.turns, 4);
        // C/C 3+3, C/D 0+5, D/C 5+0, C/C 3+3
        assert_eq!(s.scores, (11, 11));
        assert_eq!(s.winner, None);
        assert_eq!(s.cooperation_rate, 0.75);
        // opponent defected only in round 2, the network cooperated in round 3
        assert_eq!(s.forgiveness_rate, 1.0);
        assert_eq!(s.retaliation_rate, 0.0);
        // the network defected in round 1, before the opponent's round 2 defection
        assert_eq!(s.niceness, 1);
    }

    #[test]
    fn manifest_survives_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.json");
        let mut manifest = RunManifest::new("Evolved ANN", 17, 10, AggregationPolicy::ArgMax);
        manifest.record(&result());
        manifest.record(&result());
        assert_eq!(manifest.rounds_recorded, 8);

        save_manifest(&path, &manifest).unwrap();
        let loaded = load_manifest(&path).unwrap();
        assert_eq!(loaded, manifest);
        assert_eq!(loaded.aggregation, "max");
    }
}
