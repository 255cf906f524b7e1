use std::fmt;

use crate::Action;

/// What a player sees when asked for its hunt decisions.
///
/// `player_reputations` lists the reputations of every other alive player, in the
/// (shuffled) order the decisions must be returned in. It never contains the deciding
/// player itself and is never empty during a game.
#[derive(Debug, Clone, Copy)]
pub struct HuntRound<'a> {
    /// 1-based round number.
    pub round_number: u32,
    /// Food currently held by the deciding player.
    pub current_food: i64,
    /// Reputation of the deciding player, in `[0, 1]`.
    pub current_reputation: f64,
    /// Number of hunts required this round for the public bonus.
    pub m: u32,
    /// Reputations of the opponents, one decision is expected per entry.
    pub player_reputations: &'a [f64],
}

/// Result of a round, announced to every alive player after outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundEnd {
    /// Bonus food each alive player received (`0` if the hunts fell short of `m`).
    pub award: i64,
    /// The market quantity of the round.
    pub m: u32,
    /// Total hunt decisions made this round.
    pub number_hunters: u32,
}

/// An agent taking part in a tournament.
///
/// The game calls [`Player::hunt_choices`] once per round, then
/// [`Player::hunt_outcomes`] with the food earned by each of those decisions (same
/// order), then [`Player::round_end`].
pub trait Player: fmt::Debug + Send {
    /// Identifier used in the final ranking. Must be unique within a game.
    fn name(&self) -> &str;

    /// Returns one action per entry of `round.player_reputations`, in the same order.
    fn hunt_choices(&mut self, round: &HuntRound<'_>) -> Vec<Action>;

    /// Receives the food earned by each decision of the last `hunt_choices` call.
    fn hunt_outcomes(&mut self, food_earnings: &[i64]) {
        let _ = food_earnings;
    }

    /// Receives the round result.
    fn round_end(&mut self, round_end: &RoundEnd) {
        let _ = round_end;
    }
}

pub type BoxedPlayer = Box<dyn Player>;
