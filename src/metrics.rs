//! Behavioural statistics over the action sequences of a single match.

use crate::action::Action;

pub const DEFAULT_MIN_STREAK: usize = 3;

fn ratio(hits: usize, total: usize) -> f64 {
    if total == 0 { 0.0 } else { hits as f64 / total as f64 }
}

pub fn cooperation_rate(own: &[Action]) -> f64 {
    let hits = own.iter().filter(|&&a| a == Action::Cooperate).count();
    ratio(hits, own.len())
}

/// Own actions in the rounds that directly follow an opponent defection.
fn responses_to_defection<'a>(own: &'a [Action], opponent: &'a [Action]) -> impl Iterator<Item = Action> + 'a {
    own.iter()
        .zip(opponent)
        .skip(1)
        .zip(opponent)
        .filter(|(_, prev)| **prev == Action::Defect)
        .map(|((&mine, _), _)| mine)
}

fn response_rate(own: &[Action], opponent: &[Action], target: Action) -> f64 {
    let (hits, total) = responses_to_defection(own, opponent)
        .fold((0, 0), |(hits, total), a| (hits + usize::from(a == target), total + 1));
    ratio(hits, total)
}

/// Share of post-defection rounds in which the player cooperated.
pub fn forgiveness_rate(own: &[Action], opponent: &[Action]) -> f64 {
    response_rate(own, opponent, Action::Cooperate)
}

/// Share of post-defection rounds in which the player defected back.
pub fn retaliation_rate(own: &[Action], opponent: &[Action]) -> f64 {
    response_rate(own, opponent, Action::Defect)
}

/// 0 if the opponent defects in some round `t` while the player has not
/// defected in any round before `t`, 1 otherwise.
pub fn niceness(own: &[Action], opponent: &[Action]) -> u8 {
    let mut player_defected = false;
    for (&mine, &theirs) in own.iter().zip(opponent) {
        if theirs == Action::Defect && !player_defected {
            return 0;
        }
        player_defected |= mine == Action::Defect;
    }
    1
}

/// Rate of `target` among the player's actions during opponent streaks of at
/// least `min_streak` identical moves.
///
/// At each round `i` where the current streak has length `s >= min_streak`,
/// rounds `i - s .. i` are counted. Windows overlap and are counted again on
/// every qualifying round, and a window starting one before round 0 picks up
/// the final round instead.
pub fn streak_action_rate(own: &[Action], opponent: &[Action], min_streak: usize, target: Action) -> f64 {
    let Some(&first) = opponent.first() else {
        return 0.0;
    };
    let rounds = own.len();
    let mut window = Vec::new();
    let mut streak = 0usize;
    let mut streak_action = first;

    for (i, &action) in opponent.iter().enumerate() {
        if action == streak_action {
            streak += 1;
        } else {
            streak = 1;
            streak_action = action;
        }
        if streak >= min_streak {
            let start = i as isize - streak as isize;
            window.extend((start..i as isize).map(|k| if k < 0 { rounds.wrapping_sub(1) } else { k as usize }));
        }
    }

    let hits = window
        .iter()
        .filter(|&&k| own.get(k) == Some(&target))
        .count();
    ratio(hits, window.len())
}
