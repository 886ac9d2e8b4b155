use crate::action::{Action, History};

pub const NUM_FEATURES: usize = 17;

/// Whether a feature is a 0/1 indicator or a running count.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FeatureKind {
    Boolean,
    Real,
}

impl FeatureKind {
    pub fn code(self) -> &'static str {
        match self {
            FeatureKind::Boolean => "B",
            FeatureKind::Real => "R",
        }
    }
}

/// Human readable names of the feature vector, in order.
pub const FEATURE_CATALOG: [(&str, FeatureKind); NUM_FEATURES] = [
    ("Opponent's first move is C", FeatureKind::Boolean),
    ("Opponent's first move is D", FeatureKind::Boolean),
    ("Opponent's second move is C", FeatureKind::Boolean),
    ("Opponent's second move is D", FeatureKind::Boolean),
    ("Player's previous move is C", FeatureKind::Boolean),
    ("Player's previous move is D", FeatureKind::Boolean),
    ("Player's second previous move is C", FeatureKind::Boolean),
    ("Player's second previous move is D", FeatureKind::Boolean),
    ("Opponent's previous move is C", FeatureKind::Boolean),
    ("Opponent's previous move is D", FeatureKind::Boolean),
    ("Opponent's second previous move is C", FeatureKind::Boolean),
    ("Opponent's second previous move is D", FeatureKind::Boolean),
    ("Total opponent cooperations", FeatureKind::Real),
    ("Total opponent defections", FeatureKind::Real),
    ("Total player cooperations", FeatureKind::Real),
    ("Total player defections", FeatureKind::Real),
    ("Round number", FeatureKind::Real),
];

/// Describes the game state before the player's next move.
pub fn compute_features(own: &History, opponent: &History) -> Vec<f64> {
    let mut input = Vec::with_capacity(NUM_FEATURES);

    //opponent opening
    push_one_hot(&mut input, opponent.actions().first().copied());
    push_one_hot(&mut input, opponent.actions().get(1).copied());

    //recent moves
    push_one_hot(&mut input, own.back(1));
    push_one_hot(&mut input, own.back(2));
    push_one_hot(&mut input, opponent.back(1));
    push_one_hot(&mut input, opponent.back(2));

    //totals
    input.push(opponent.cooperations() as f64);
    input.push(opponent.defections() as f64);
    input.push(own.cooperations() as f64);
    input.push(own.defections() as f64);
    input.push(own.len() as f64);

    input
}

fn push_one_hot(input: &mut Vec<f64>, action: Option<Action>) {
    let (c, d) = match action {
        Some(Action::Cooperate) => (1.0, 0.0),
        Some(Action::Defect) => (0.0, 1.0),
        None => (0.0, 0.0),
    };
    input.push(c);
    input.push(d);
}
