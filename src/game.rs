use tracing::debug;

use crate::action::{Action, History};
use crate::error::Result;

pub const DEFAULT_TURNS: usize = 20;

// (row, column) payoffs: R, S, T, P
const REWARD: u32 = 3;
const SUCKER: u32 = 0;
const TEMPTATION: u32 = 5;
const PUNISHMENT: u32 = 1;

/// A player in the iterated game.
pub trait Strategy {
    fn name(&self) -> String;

    /// Chooses the next move from both histories as they stand before this round.
    fn decide(&mut self, own: &History, opponent: &History) -> Result<Action>;

    /// Forgets anything learned during a previous match.
    fn reset(&mut self) {}
}

pub fn payoff(row: Action, column: Action) -> (u32, u32) {
    match (row, column) {
        (Action::Cooperate, Action::Cooperate) => (REWARD, REWARD),
        (Action::Cooperate, Action::Defect) => (SUCKER, TEMPTATION),
        (Action::Defect, Action::Cooperate) => (TEMPTATION, SUCKER),
        (Action::Defect, Action::Defect) => (PUNISHMENT, PUNISHMENT),
    }
}

pub struct Match {
    pub turns: usize,
}

impl Match {
    pub fn new(turns: usize) -> Self {
        Self { turns }
    }

    /// Plays `turns` simultaneous rounds. Both strategies are reset first.
    pub fn play(&self, first: &mut dyn Strategy, second: &mut dyn Strategy) -> Result<MatchResult> {
        first.reset();
        second.reset();

        let mut h1 = History::new();
        let mut h2 = History::new();
        let mut rounds = Vec::with_capacity(self.turns);

        for turn in 0..self.turns {
            let a1 = first.decide(&h1, &h2)?;
            let a2 = second.decide(&h2, &h1)?;
            debug!(turn, first = %a1, second = %a2, "round played");
            h1.push(a1);
            h2.push(a2);
            rounds.push((a1, a2));
        }

        Ok(MatchResult {
            players: (first.name(), second.name()),
            rounds,
        })
    }
}

#[derive(Clone, Debug)]
pub struct MatchResult {
    pub players: (String, String),
    pub rounds: Vec<(Action, Action)>,
}

impl MatchResult {
    pub fn actions(&self) -> (Vec<Action>, Vec<Action>) {
        self.rounds.iter().copied().unzip()
    }

    pub fn scores(&self) -> Vec<(u32, u32)> {
        self.rounds.iter().map(|&(a, b)| payoff(a, b)).collect()
    }

    pub fn final_score(&self) -> (u32, u32) {
        self.scores()
            .into_iter()
            .fold((0, 0), |(s1, s2), (p1, p2)| (s1 + p1, s2 + p2))
    }

    /// Name of the higher scorer, `None` on a tie.
    pub fn winner(&self) -> Option<&str> {
        let (s1, s2) = self.final_score();
        match s1.cmp(&s2) {
            std::cmp::Ordering::Greater => Some(self.players.0.as_str()),
            std::cmp::Ordering::Less => Some(self.players.1.as_str()),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn sparklines(&self) -> String {
        let (first, second) = self.actions();
        format!("{}\n{}", sparkline(&first), sparkline(&second))
    }
}

fn sparkline(actions: &[Action]) -> String {
    actions
        .iter()
        .map(|a| match a {
            Action::Cooperate => '█',
            Action::Defect => ' ',
        })
        .collect()
}
