use rand::Rng as _;
use rand_pcg::Pcg32;
use staghunt_stats::descriptive;

use crate::{Action, HuntRound, Player};

/// Always hunts.
#[derive(Debug, Clone)]
pub struct Pushover;

impl Player for Pushover {
    fn name(&self) -> &'static str {
        "Pushover"
    }

    fn hunt_choices(&mut self, round: &HuntRound<'_>) -> Vec<Action> {
        vec![Action::Hunt; round.player_reputations.len()]
    }
}

/// Always slacks.
#[derive(Debug, Clone)]
pub struct Freeloader;

impl Player for Freeloader {
    fn name(&self) -> &'static str {
        "Freeloader"
    }

    fn hunt_choices(&mut self, round: &HuntRound<'_>) -> Vec<Action> {
        vec![Action::Slack; round.player_reputations.len()]
    }
}

/// Alternates between hunting and slacking on every single decision, starting with a hunt.
///
/// The alternation carries over between rounds.
#[derive(Debug, Clone)]
pub struct Alternator {
    next: Action,
}

impl Alternator {
    #[must_use]
    pub const fn new() -> Self {
        Self { next: Action::Hunt }
    }
}

impl Default for Alternator {
    fn default() -> Self {
        Self::new()
    }
}

impl Player for Alternator {
    fn name(&self) -> &'static str {
        "Alternator"
    }

    fn hunt_choices(&mut self, round: &HuntRound<'_>) -> Vec<Action> {
        round
            .player_reputations
            .iter()
            .map(|_| {
                let action = self.next;
                self.next = match action {
                    Action::Hunt => Action::Slack,
                    Action::Slack => Action::Hunt,
                };
                action
            })
            .collect()
    }
}

/// Hunts only with the opponents holding the highest reputation of the round.
#[derive(Debug, Clone)]
pub struct MaxRepHunter;

impl Player for MaxRepHunter {
    fn name(&self) -> &'static str {
        "MaxRepHunter"
    }

    fn hunt_choices(&mut self, round: &HuntRound<'_>) -> Vec<Action> {
        let max = round
            .player_reputations
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);
        round
            .player_reputations
            .iter()
            .map(|&rep| Action::from_hunt(rep >= max))
            .collect()
    }
}

/// Hunts with a fixed probability, independently for every decision.
#[derive(Debug, Clone)]
pub struct RandomHunter {
    name: String,
    probability: f64,
    rng: Pcg32,
}

impl RandomHunter {
    /// # Panics
    ///
    /// Panics if `probability` is outside `[0, 1]` or NaN.
    #[must_use]
    pub fn new(probability: f64, rng: Pcg32) -> Self {
        assert!(
            (0.0..=1.0).contains(&probability),
            "hunt probability must be in [0, 1], got {probability}"
        );
        Self {
            name: format!("Random({probability})"),
            probability,
            rng,
        }
    }
}

impl Player for RandomHunter {
    fn name(&self) -> &str {
        &self.name
    }

    fn hunt_choices(&mut self, round: &HuntRound<'_>) -> Vec<Action> {
        round
            .player_reputations
            .iter()
            .map(|_| Action::from_hunt(self.rng.random_bool(self.probability)))
            .collect()
    }
}

/// Hunts with each opponent with a probability equal to that opponent's reputation.
#[derive(Debug, Clone)]
pub struct FairHunter {
    rng: Pcg32,
}

impl FairHunter {
    #[must_use]
    pub fn new(rng: Pcg32) -> Self {
        Self { rng }
    }
}

impl Player for FairHunter {
    fn name(&self) -> &'static str {
        "FairHunter"
    }

    fn hunt_choices(&mut self, round: &HuntRound<'_>) -> Vec<Action> {
        round
            .player_reputations
            .iter()
            .map(|&rep| Action::from_hunt(self.rng.random::<f64>() < rep))
            .collect()
    }
}

/// Hunts iff the opponent's reputation lies in the closed interval `[lower, upper]`.
#[derive(Debug, Clone)]
pub struct BoundedHunter {
    name: String,
    lower: f64,
    upper: f64,
}

impl BoundedHunter {
    /// # Panics
    ///
    /// Panics unless `lower <= upper`.
    #[must_use]
    pub fn new(lower: f64, upper: f64) -> Self {
        assert!(
            lower <= upper,
            "reputation bounds must be ordered, got [{lower}, {upper}]"
        );
        Self {
            name: format!("BoundedHunter({lower}, {upper})"),
            lower,
            upper,
        }
    }
}

impl Player for BoundedHunter {
    fn name(&self) -> &str {
        &self.name
    }

    fn hunt_choices(&mut self, round: &HuntRound<'_>) -> Vec<Action> {
        round
            .player_reputations
            .iter()
            .map(|rep| Action::from_hunt((self.lower..=self.upper).contains(rep)))
            .collect()
    }
}

/// Hunts with probability equal to the mean reputation of the round, steering its own
/// reputation toward the average.
#[derive(Debug, Clone)]
pub struct AverageHunter {
    rng: Pcg32,
}

impl AverageHunter {
    #[must_use]
    pub fn new(rng: Pcg32) -> Self {
        Self { rng }
    }
}

impl Player for AverageHunter {
    fn name(&self) -> &'static str {
        "AverageHunter"
    }

    fn hunt_choices(&mut self, round: &HuntRound<'_>) -> Vec<Action> {
        let average = descriptive::mean(round.player_reputations).unwrap_or(0.0);
        round
            .player_reputations
            .iter()
            .map(|_| Action::from_hunt(self.rng.random::<f64>() < average))
            .collect()
    }
}
