//! The basic opponents a recorded network is played against.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::action::{Action, C, D, History};
use crate::error::{Error, Result};
use crate::game::Strategy;

const RANDOM_SEED: u64 = 0x5eed;

/// Stateless opponents whose move is a function of the two histories.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Basic {
    Alternator,
    AntiTitForTat,
    Bully,
    Cooperator,
    Defector,
    SoftGoByMajority,
    SuspiciousTitForTat,
    TitForTat,
    WinStayLoseShift,
}

impl Basic {
    fn play(self, own: &History, opponent: &History) -> Action {
        match self {
            Basic::Alternator => own.last().map_or(C, Action::flip),
            Basic::AntiTitForTat => opponent.last().map_or(C, Action::flip),
            Basic::Bully => opponent.last().map_or(D, Action::flip),
            Basic::Cooperator => C,
            Basic::Defector => D,
            Basic::SoftGoByMajority => {
                if opponent.cooperations() >= opponent.defections() {
                    C
                } else {
                    D
                }
            }
            Basic::SuspiciousTitForTat => opponent.last().unwrap_or(D),
            Basic::TitForTat => opponent.last().unwrap_or(C),
            Basic::WinStayLoseShift => match (own.last(), opponent.last()) {
                (Some(mine), Some(theirs)) if mine != theirs => D,
                _ => C,
            },
        }
    }

    fn label(self) -> &'static str {
        match self {
            Basic::Alternator => "Alternator",
            Basic::AntiTitForTat => "Anti Tit For Tat",
            Basic::Bully => "Bully",
            Basic::Cooperator => "Cooperator",
            Basic::Defector => "Defector",
            Basic::SoftGoByMajority => "Soft Go By Majority",
            Basic::SuspiciousTitForTat => "Suspicious Tit For Tat",
            Basic::TitForTat => "Tit For Tat",
            Basic::WinStayLoseShift => "Win-Stay Lose-Shift",
        }
    }
}

impl Strategy for Basic {
    fn name(&self) -> String {
        self.label().to_string()
    }

    fn decide(&mut self, own: &History, opponent: &History) -> Result<Action> {
        Ok(self.play(own, opponent))
    }
}

/// Cooperates with probability `p`. Reseeded on reset so matches replay identically.
pub struct Random {
    p: f64,
    seed: u64,
    rng: StdRng,
}

impl Random {
    pub fn new(p: f64, seed: u64) -> Self {
        Self {
            p,
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Strategy for Random {
    fn name(&self) -> String {
        format!("Random: {}", self.p)
    }

    fn decide(&mut self, _own: &History, _opponent: &History) -> Result<Action> {
        Ok(if self.rng.gen_bool(self.p) { C } else { D })
    }

    fn reset(&mut self) {
        self.rng = StdRng::seed_from_u64(self.seed);
    }
}

pub fn basic_strategies() -> Vec<Box<dyn Strategy>> {
    vec![
        Box::new(Basic::Alternator),
        Box::new(Basic::AntiTitForTat),
        Box::new(Basic::Bully),
        Box::new(Basic::Cooperator),
        Box::new(Basic::Defector),
        Box::new(Basic::SoftGoByMajority),
        Box::new(Random::new(0.5, RANDOM_SEED)),
        Box::new(Basic::SuspiciousTitForTat),
        Box::new(Basic::TitForTat),
        Box::new(Basic::WinStayLoseShift),
    ]
}

/// Looks a strategy up by its exact display name.
pub fn find_strategy(name: &str) -> Result<Box<dyn Strategy>> {
    basic_strategies()
        .into_iter()
        .find(|s| s.name() == name)
        .ok_or_else(|| Error::UnknownOpponent(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Match;

    fn play(a: &mut dyn Strategy, b: &mut dyn Strategy, turns: usize) -> (Vec<Action>, Vec<Action>) {
        Match::new(turns).play(a, b).unwrap().actions()
    }

    #[test]
    fn tit_for_tat_copies() {
        let (tft, alt) = play(&mut Basic::TitForTat, &mut Basic::Alternator, 5);
        assert_eq!(alt, vec![C, D, C, D, C]);
        assert_eq!(tft, vec![C, C, D, C, D]);
    }

    #[test]
    fn suspicious_and_bully_open_with_defection() {
        let (sus, _) = play(&mut Basic::SuspiciousTitForTat, &mut Basic::Cooperator, 3);
        assert_eq!(sus, vec![D, C, C]);
        let (bully, _) = play(&mut Basic::Bully, &mut Basic::Cooperator, 3);
        assert_eq!(bully, vec![D, D, D]);
    }

    #[test]
    fn win_stay_lose_shift_against_defector() {
        let (wsls, _) = play(&mut Basic::WinStayLoseShift, &mut Basic::Defector, 4);
        assert_eq!(wsls, vec![C, D, C, D]);
    }

    #[test]
    fn go_by_majority_follows_counts() {
        let (gbm, _) = play(&mut Basic::SoftGoByMajority, &mut Basic::Defector, 3);
        assert_eq!(gbm, vec![C, D, D]);
    }

    #[test]
    fn random_is_reproducible_across_matches() {
        let mut r = Random::new(0.5, 42);
        let (first, _) = play(&mut r, &mut Basic::Cooperator, 20);
        let (second, _) = play(&mut r, &mut Basic::Cooperator, 20);
        assert_eq!(first, second);
    }

    #[test]
    fn catalog_lookup() {
        assert_eq!(basic_strategies().len(), 10);
        assert_eq!(find_strategy("Tit For Tat").unwrap().name(), "Tit For Tat");
        assert_eq!(find_strategy("Random: 0.5").unwrap().name(), "Random: 0.5");
        assert!(matches!(
            find_strategy("Grudger"),
            Err(Error::UnknownOpponent(name)) if name == "Grudger"
        ));
    }
}
