use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum Action {
    #[serde(rename = "C")]
    Cooperate,
    #[serde(rename = "D")]
    Defect,
}

pub use Action::{Cooperate as C, Defect as D};

impl Action {
    /// The other move.
    pub fn flip(self) -> Action {
        match self {
            Action::Cooperate => Action::Defect,
            Action::Defect => Action::Cooperate,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Action::Cooperate => 'C',
            Action::Defect => 'D',
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "C" => Ok(Action::Cooperate),
            "D" => Ok(Action::Defect),
            other => Err(Error::InvalidAction(other.to_string())),
        }
    }
}

/// Parses a sequence of "C"/"D" symbols.
pub fn parse_actions<S: AsRef<str>>(symbols: &[S]) -> Result<Vec<Action>> {
    symbols.iter().map(|s| s.as_ref().parse()).collect()
}

/// Everything one player has done so far in a match.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct History {
    actions: Vec<Action>,
    cooperations: usize,
    defections: usize,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, action: Action) {
        match action {
            Action::Cooperate => self.cooperations += 1,
            Action::Defect => self.defections += 1,
        }
        self.actions.push(action);
    }

    pub fn clear(&mut self) {
        self.actions.clear();
        self.cooperations = 0;
        self.defections = 0;
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn first(&self) -> Option<Action> {
        self.actions.first().copied()
    }

    pub fn last(&self) -> Option<Action> {
        self.actions.last().copied()
    }

    /// Move made `n` rounds ago, `back(1)` being the most recent.
    pub fn back(&self, n: usize) -> Option<Action> {
        if n == 0 || n > self.actions.len() {
            return None;
        }
        Some(self.actions[self.actions.len() - n])
    }

    pub fn cooperations(&self) -> usize {
        self.cooperations
    }

    pub fn defections(&self) -> usize {
        self.defections
    }
}

impl From<&[Action]> for History {
    fn from(actions: &[Action]) -> Self {
        let mut history = History::new();
        for &a in actions {
            history.push(a);
        }
        history
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_symbols() {
        let actions = parse_actions(&["C", "D", "C"]).unwrap();
        assert_eq!(actions, vec![C, D, C]);
        assert!(matches!(
            "X".parse::<Action>(),
            Err(Error::InvalidAction(s)) if s == "X"
        ));
    }

    #[test]
    fn history_counts_and_lookback() {
        let history = History::from(&[C, C, D][..]);
        assert_eq!(history.cooperations(), 2);
        assert_eq!(history.defections(), 1);
        assert_eq!(history.back(1), Some(D));
        assert_eq!(history.back(3), Some(C));
        assert_eq!(history.back(4), None);
        assert_eq!(history.back(0), None);
    }

    #[test]
    fn flip_and_display() {
        assert_eq!(C.flip(), D);
        assert_eq!(D.to_string(), "D");
    }
}
