//! Weighted multi-heuristic decision engine and its fitness evaluation.
//!
//! This crate turns a tunable weight vector ([`chromosome::Chromosome`]) into a player
//! for the stag hunt tournament, and scores that player by its final rank:
//!
//! 1. **Heuristics** ([`heuristic`]) - Independent hunt/slack votes computed from
//!    round-local information and the agent's own history.
//! 2. **Decision Engine** ([`decision`]) - Weighted sum of the votes per opponent,
//!    compared against a [`decision::ThresholdPolicy`].
//! 3. **Weighted Player** ([`weighted_player`]) - The decision engine embedded in a
//!    tournament player, carrying [`past_performance::PastPerformance`] across rounds.
//! 4. **Fitness** ([`fitness`]) - Runs one tournament with the candidate and a fixed
//!    roster, and reduces the ranking to `rank²` (lower is better).
//!
//! # Architecture
//!
//! ```text
//! Fitness Evaluator (rank² of one tournament)
//!     ↓ plays
//! Weighted Player (per-round decisions, outcome bookkeeping)
//!     ↓ uses
//! Decision Engine (Σ weightᵢ × voteᵢ against a threshold)
//!     ↓ uses
//! Heuristics (votes)
//! ```
//!
//! # Configurations
//!
//! Two heuristic sets and two threshold policies are supported. They are selected
//! together through a [`decision::DecisionProfile`]; the optimal chromosomes of one
//! profile mean nothing under another, so the profile always travels with the weights.
//!
//! # Example
//!
//! ```
//! use staghunt_engine::{GameRules, GameSeed, bots::Roster};
//! use staghunt_evaluator::{
//!     chromosome::Chromosome,
//!     decision::DecisionProfile,
//!     fitness::{FitnessEvaluator, RankFitnessEvaluator},
//! };
//!
//! let evaluator = RankFitnessEvaluator::new(
//!     GameRules::fixed_length(50),
//!     Roster::standard(),
//!     DecisionProfile::seven_function(),
//! );
//! let chromosome = Chromosome::new(vec![15, 15, 13, 15, 15, 14, 15]);
//! let fitness = evaluator.evaluate(&chromosome, GameSeed::from_bytes([3; 16])).unwrap();
//! assert!(fitness <= 100);
//! ```

use staghunt_engine::GameError;

pub mod chromosome;
pub mod decision;
pub mod fitness;
pub mod heuristic;
pub mod past_performance;
pub mod weighted_player;

/// Configuration errors of the decision engine and its evaluation.
///
/// These indicate wiring bugs rather than bad candidates and are never retried.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum EvaluatorError {
    #[display("chromosome has {actual} genes but the heuristic set has {expected} functions")]
    ChromosomeLength { expected: usize, actual: usize },
    #[display("candidate name {name:?} collides with a roster player")]
    DuplicatePlayerName { name: String },
    #[display("candidate {name:?} is missing from the tournament ranking")]
    CandidateNotRanked { name: String },
    #[display("tournament could not be played: {_0}")]
    Game(GameError),
}
