//! Heuristic votes feeding the decision engine.
//!
//! Every heuristic looks at one opponent in the context of one round and votes hunt or
//! slack. Heuristics only see round-local public information plus the deciding agent's
//! own [`PastPerformance`], never another agent's private state, so each vote can be
//! reproduced and tested in isolation.
//!
//! # Heuristics
//!
//! | Heuristic | Votes hunt iff |
//! |-----------|----------------|
//! | [`RelativeReputation`] | opponent reputation > own reputation |
//! | [`MeanReputation`] | opponent reputation > mean of opponents |
//! | [`MedianReputation`] | opponent reputation > median of opponents |
//! | [`MaintainAverage`] | own reputation < mean of opponents |
//! | [`EvaluateThePast`] | past food from hunting > past food from slacking |
//! | [`MediumReputationBand`] | `0.4 < opponent reputation < 0.7` |
//! | [`PublicGood`] | `m > mean × (opponents − 1)²` |
//!
//! # Heuristic Sets
//!
//! [`HeuristicSet::FiveFunction`] uses the first five, [`HeuristicSet::SevenFunction`]
//! all seven, in the order above. The order fixes which chromosome gene weights which
//! heuristic.

use std::fmt;

use serde::{Deserialize, Serialize};
use staghunt_engine::{Action, HuntRound};
use staghunt_stats::descriptive;

use crate::past_performance::PastPerformance;

/// Round-level view shared by all decisions of one round.
///
/// The mean and median of the opponents' reputations are computed once here instead of
/// once per opponent and heuristic.
#[derive(Debug, Clone, Copy)]
pub struct RoundContext<'a> {
    pub round_number: u32,
    pub current_food: i64,
    pub current_reputation: f64,
    pub m: u32,
    pub opponent_reputations: &'a [f64],
    pub mean_reputation: f64,
    pub median_reputation: f64,
}

impl<'a> RoundContext<'a> {
    /// Builds the round view from what the tournament shows the player.
    ///
    /// # Panics
    ///
    /// Panics if `round.player_reputations` is empty: a decision round always has at least
    /// one opponent.
    #[must_use]
    pub fn new(round: &HuntRound<'a>) -> Self {
        let reputations = round.player_reputations;
        let (Some(mean_reputation), Some(median_reputation)) = (
            descriptive::mean(reputations),
            descriptive::median(reputations),
        ) else {
            panic!("round {} has no opponents to decide on", round.round_number);
        };
        Self {
            round_number: round.round_number,
            current_food: round.current_food,
            current_reputation: round.current_reputation,
            m: round.m,
            opponent_reputations: reputations,
            mean_reputation,
            median_reputation,
        }
    }

    /// Binds one opponent's reputation, producing the context a single decision is made in.
    #[must_use]
    pub fn bind(&self, opponent_reputation: f64) -> DecisionContext<'a> {
        DecisionContext {
            round: *self,
            opponent_reputation,
        }
    }
}

/// Everything a heuristic may look at for one decision.
#[derive(Debug, Clone, Copy)]
pub struct DecisionContext<'a> {
    pub round: RoundContext<'a>,
    pub opponent_reputation: f64,
}

pub trait Heuristic: fmt::Debug + Send + Sync {
    #[must_use]
    fn id(&self) -> &str;
    #[must_use]
    fn name(&self) -> &str;
    #[must_use]
    fn clone_boxed(&self) -> BoxedHeuristic;
    #[must_use]
    fn vote(&self, ctx: &DecisionContext<'_>, past: &PastPerformance) -> Action;
}

pub type BoxedHeuristic = Box<dyn Heuristic>;

impl Clone for BoxedHeuristic {
    fn clone(&self) -> Self {
        self.clone_boxed()
    }
}

/// Which heuristics are active, in chromosome order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::FromStr,
)]
#[serde(rename_all = "snake_case")]
pub enum HeuristicSet {
    /// Relative, mean, median, maintain-average, evaluate-the-past.
    FiveFunction,
    /// The five above plus medium-reputation band and public good.
    SevenFunction,
}

impl HeuristicSet {
    /// Number of heuristics, which is also the required chromosome length.
    #[must_use]
    pub const fn arity(self) -> usize {
        match self {
            Self::FiveFunction => 5,
            Self::SevenFunction => 7,
        }
    }

    #[must_use]
    pub fn heuristics(self) -> Vec<BoxedHeuristic> {
        let mut heuristics: Vec<BoxedHeuristic> = vec![
            Box::new(RelativeReputation),
            Box::new(MeanReputation),
            Box::new(MedianReputation),
            Box::new(MaintainAverage),
            Box::new(EvaluateThePast),
        ];
        if self == Self::SevenFunction {
            heuristics.push(Box::new(MediumReputationBand::default()));
            heuristics.push(Box::new(PublicGood));
        }
        debug_assert_eq!(heuristics.len(), self.arity());
        heuristics
    }
}

/// Hunts with opponents more reputable than ourselves.
#[derive(Debug, Clone)]
pub struct RelativeReputation;

impl Heuristic for RelativeReputation {
    fn id(&self) -> &'static str {
        "relative_reputation"
    }
    fn name(&self) -> &'static str {
        "Relative Reputation"
    }
    fn clone_boxed(&self) -> BoxedHeuristic {
        Box::new(self.clone())
    }
    fn vote(&self, ctx: &DecisionContext<'_>, _past: &PastPerformance) -> Action {
        Action::from_hunt(ctx.opponent_reputation > ctx.round.current_reputation)
    }
}

/// Hunts with opponents above the mean reputation of the round.
#[derive(Debug, Clone)]
pub struct MeanReputation;

impl Heuristic for MeanReputation {
    fn id(&self) -> &'static str {
        "mean_reputation"
    }
    fn name(&self) -> &'static str {
        "Mean Reputation"
    }
    fn clone_boxed(&self) -> BoxedHeuristic {
        Box::new(self.clone())
    }
    fn vote(&self, ctx: &DecisionContext<'_>, _past: &PastPerformance) -> Action {
        Action::from_hunt(ctx.opponent_reputation > ctx.round.mean_reputation)
    }
}

/// Hunts with opponents above the median reputation of the round.
#[derive(Debug, Clone)]
pub struct MedianReputation;

impl Heuristic for MedianReputation {
    fn id(&self) -> &'static str {
        "median_reputation"
    }
    fn name(&self) -> &'static str {
        "Median Reputation"
    }
    fn clone_boxed(&self) -> BoxedHeuristic {
        Box::new(self.clone())
    }
    fn vote(&self, ctx: &DecisionContext<'_>, _past: &PastPerformance) -> Action {
        Action::from_hunt(ctx.opponent_reputation > ctx.round.median_reputation)
    }
}

/// Hunts while our own reputation is below the opponents' mean, whoever the opponent is.
#[derive(Debug, Clone)]
pub struct MaintainAverage;

impl Heuristic for MaintainAverage {
    fn id(&self) -> &'static str {
        "maintain_average"
    }
    fn name(&self) -> &'static str {
        "Maintain Average Reputation"
    }
    fn clone_boxed(&self) -> BoxedHeuristic {
        Box::new(self.clone())
    }
    fn vote(&self, ctx: &DecisionContext<'_>, _past: &PastPerformance) -> Action {
        Action::from_hunt(ctx.round.current_reputation < ctx.round.mean_reputation)
    }
}

/// Hunts if hunting has paid off better than slacking so far. Ties slack.
#[derive(Debug, Clone)]
pub struct EvaluateThePast;

impl Heuristic for EvaluateThePast {
    fn id(&self) -> &'static str {
        "evaluate_the_past"
    }
    fn name(&self) -> &'static str {
        "Evaluate the Past"
    }
    fn clone_boxed(&self) -> BoxedHeuristic {
        Box::new(self.clone())
    }
    fn vote(&self, _ctx: &DecisionContext<'_>, past: &PastPerformance) -> Action {
        Action::from_hunt(past.get(Action::Hunt) > past.get(Action::Slack))
    }
}

/// Hunts with undecided opponents: reputation strictly inside `(lower, upper)`.
///
/// Confirmed slackers are not worth hunting with, and confirmed hunters can be exploited.
#[derive(Debug, Clone)]
pub struct MediumReputationBand {
    pub lower: f64,
    pub upper: f64,
}

impl Default for MediumReputationBand {
    fn default() -> Self {
        Self {
            lower: 0.4,
            upper: 0.7,
        }
    }
}

impl Heuristic for MediumReputationBand {
    fn id(&self) -> &'static str {
        "medium_reputation_band"
    }
    fn name(&self) -> &'static str {
        "Medium Reputation Band"
    }
    fn clone_boxed(&self) -> BoxedHeuristic {
        Box::new(self.clone())
    }
    fn vote(&self, ctx: &DecisionContext<'_>, _past: &PastPerformance) -> Action {
        let rep = ctx.opponent_reputation;
        Action::from_hunt(self.lower < rep && rep < self.upper)
    }
}

/// Hunts when the expected number of hunters falls short of `m`.
///
/// The expected count is estimated as `mean × (n − 1)²` for `n` opponents.
#[derive(Debug, Clone)]
pub struct PublicGood;

impl PublicGood {
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn probable_hunts(round: &RoundContext<'_>) -> f64 {
        let others = round.opponent_reputations.len() as f64 - 1.0;
        round.mean_reputation * others * others
    }
}

impl Heuristic for PublicGood {
    fn id(&self) -> &'static str {
        "public_good"
    }
    fn name(&self) -> &'static str {
        "Public Good"
    }
    fn clone_boxed(&self) -> BoxedHeuristic {
        Box::new(self.clone())
    }
    fn vote(&self, ctx: &DecisionContext<'_>, _past: &PastPerformance) -> Action {
        Action::from_hunt(f64::from(ctx.round.m) > Self::probable_hunts(&ctx.round))
    }
}
