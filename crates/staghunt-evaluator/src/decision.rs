//! Weighted combination of heuristic votes into actions.
//!
//! For each opponent, every heuristic votes (hunt = 1, slack = 0) and the votes are
//! weighted by the corresponding chromosome gene:
//!
//! ```text
//! score = w₁·v₁ + w₂·v₂ + ... + wₙ·vₙ
//! ```
//!
//! The score is then compared against the active [`ThresholdPolicy`]. Genes outside
//! `[0, 100]`, negative ones included, are used numerically as they are.

use std::fmt;

use serde::{Deserialize, Serialize};
use staghunt_engine::Action;

use crate::{
    EvaluatorError,
    chromosome::{Chromosome, GENE_MAX},
    heuristic::{BoxedHeuristic, DecisionContext, HeuristicSet, RoundContext},
    past_performance::PastPerformance,
};

/// When a weighted score turns into a hunt.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::FromStr,
)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdPolicy {
    /// Hunt iff `score ≥ 100`.
    AtLeastHundred,
    /// Hunt iff `score > n × 100 / 2`, strictly above half of the maximum attainable score.
    AboveHalfMaximum,
}

impl ThresholdPolicy {
    /// Whether `score` calls for a hunt with `arity` heuristics.
    #[must_use]
    pub fn hunts(self, score: i64, arity: usize) -> bool {
        match self {
            Self::AtLeastHundred => score >= 100,
            Self::AboveHalfMaximum => {
                let max_score = i64::try_from(arity).unwrap_or(i64::MAX) * i64::from(GENE_MAX);
                score.saturating_mul(2) > max_score
            }
        }
    }
}

/// A named pairing of heuristic set and threshold policy.
///
/// The two historical configurations are [`DecisionProfile::five_function`] and
/// [`DecisionProfile::seven_function`]. Other pairings can be built explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DecisionProfile {
    pub heuristic_set: HeuristicSet,
    pub threshold: ThresholdPolicy,
}

impl DecisionProfile {
    /// Five heuristics, hunting strictly above half of the maximum score.
    #[must_use]
    pub const fn five_function() -> Self {
        Self {
            heuristic_set: HeuristicSet::FiveFunction,
            threshold: ThresholdPolicy::AboveHalfMaximum,
        }
    }

    /// Seven heuristics, hunting at a score of 100 or more.
    #[must_use]
    pub const fn seven_function() -> Self {
        Self {
            heuristic_set: HeuristicSet::SevenFunction,
            threshold: ThresholdPolicy::AtLeastHundred,
        }
    }

    /// Required chromosome length.
    #[must_use]
    pub const fn arity(&self) -> usize {
        self.heuristic_set.arity()
    }
}

impl fmt::Display for DecisionProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} / {:?}", self.heuristic_set, self.threshold)
    }
}

/// Decides hunt or slack per opponent from a chromosome and a profile.
///
/// # Example
///
/// ```
/// use staghunt_engine::{Action, HuntRound};
/// use staghunt_evaluator::{
///     chromosome::Chromosome,
///     decision::{DecisionEngine, DecisionProfile},
///     heuristic::RoundContext,
///     past_performance::PastPerformance,
/// };
///
/// // only the relative-reputation heuristic counts, and it alone reaches 100
/// let chromosome = Chromosome::new(vec![100, 0, 0, 0, 0, 0, 0]);
/// let engine = DecisionEngine::new(DecisionProfile::seven_function(), chromosome).unwrap();
///
/// let reputations = [0.9, 0.1];
/// let round = HuntRound {
///     round_number: 1,
///     current_food: 300,
///     current_reputation: 0.5,
///     m: 1,
///     player_reputations: &reputations,
/// };
/// let actions = engine.decide_all(&RoundContext::new(&round), &PastPerformance::new());
/// assert_eq!(actions, [Action::Hunt, Action::Slack]);
/// ```
#[derive(Debug, Clone)]
pub struct DecisionEngine {
    profile: DecisionProfile,
    heuristics: Vec<BoxedHeuristic>,
    chromosome: Chromosome,
}

impl DecisionEngine {
    /// Creates a decision engine.
    ///
    /// Fails if the chromosome length differs from the profile's heuristic count.
    pub fn new(profile: DecisionProfile, chromosome: Chromosome) -> Result<Self, EvaluatorError> {
        if chromosome.len() != profile.arity() {
            return Err(EvaluatorError::ChromosomeLength {
                expected: profile.arity(),
                actual: chromosome.len(),
            });
        }
        Ok(Self {
            profile,
            heuristics: profile.heuristic_set.heuristics(),
            chromosome,
        })
    }

    #[must_use]
    pub fn profile(&self) -> DecisionProfile {
        self.profile
    }

    #[must_use]
    pub fn chromosome(&self) -> &Chromosome {
        &self.chromosome
    }

    /// Weighted sum of the hunt votes for one opponent.
    #[must_use]
    pub fn score(&self, ctx: &DecisionContext<'_>, past: &PastPerformance) -> i64 {
        self.heuristics
            .iter()
            .zip(self.chromosome.genes())
            .filter(|(h, _)| h.vote(ctx, past).is_hunt())
            .map(|(_, &w)| i64::from(w))
            .sum()
    }

    #[must_use]
    pub fn decide(&self, ctx: &DecisionContext<'_>, past: &PastPerformance) -> Action {
        let score = self.score(ctx, past);
        Action::from_hunt(self.profile.threshold.hunts(score, self.heuristics.len()))
    }

    /// One action per opponent of the round, in order.
    #[must_use]
    pub fn decide_all(&self, round: &RoundContext<'_>, past: &PastPerformance) -> Vec<Action> {
        round
            .opponent_reputations
            .iter()
            .map(|&rep| self.decide(&round.bind(rep), past))
            .collect()
    }
}
