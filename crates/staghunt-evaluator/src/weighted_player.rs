//! The decision engine as a tournament player.

use staghunt_engine::{Action, HuntRound, Player, RoundEnd};

use crate::{
    EvaluatorError,
    chromosome::Chromosome,
    decision::{DecisionEngine, DecisionProfile},
    heuristic::RoundContext,
    past_performance::PastPerformance,
};

/// Name the evolved candidate plays under by default.
pub const CANDIDATE_NAME: &str = "GA Player";

/// A player whose decisions come from a [`DecisionEngine`].
///
/// It remembers its last decisions so that the following outcome report can be credited
/// to the right action in its [`PastPerformance`].
#[derive(Debug, Clone)]
pub struct WeightedPlayer {
    name: String,
    engine: DecisionEngine,
    past_performance: PastPerformance,
    last_decisions: Vec<Action>,
    last_round_end: Option<RoundEnd>,
}

impl WeightedPlayer {
    pub fn new(
        name: impl Into<String>,
        chromosome: Chromosome,
        profile: DecisionProfile,
    ) -> Result<Self, EvaluatorError> {
        Ok(Self {
            name: name.into(),
            engine: DecisionEngine::new(profile, chromosome)?,
            past_performance: PastPerformance::new(),
            last_decisions: vec![],
            last_round_end: None,
        })
    }

    #[must_use]
    pub fn engine(&self) -> &DecisionEngine {
        &self.engine
    }

    #[must_use]
    pub fn past_performance(&self) -> &PastPerformance {
        &self.past_performance
    }

    #[must_use]
    pub fn last_decisions(&self) -> &[Action] {
        &self.last_decisions
    }

    /// Result of the most recent round. Kept for heuristics that may use it; none of
    /// the current ones does.
    #[must_use]
    pub fn last_round_end(&self) -> Option<&RoundEnd> {
        self.last_round_end.as_ref()
    }
}

impl Player for WeightedPlayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn hunt_choices(&mut self, round: &HuntRound<'_>) -> Vec<Action> {
        let ctx = RoundContext::new(round);
        let decisions = self.engine.decide_all(&ctx, &self.past_performance);
        self.last_decisions.clone_from(&decisions);
        decisions
    }

    fn hunt_outcomes(&mut self, food_earnings: &[i64]) {
        self.past_performance
            .record_all(&self.last_decisions, food_earnings);
    }

    fn round_end(&mut self, round_end: &RoundEnd) {
        self.last_round_end = Some(*round_end);
    }
}
