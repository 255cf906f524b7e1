//! Evolutionary search for decision engine weights.
//!
//! This crate searches the chromosome space of the decision engine with a minimizing
//! genetic algorithm. Fitness comes from a
//! [`FitnessEvaluator`](staghunt_evaluator::fitness::FitnessEvaluator), normally the
//! rank² of one tournament.
//!
//! # How a Search Works
//!
//! 1. **Sample** - Draw a population of random integer chromosomes within the gene bounds
//! 2. **Evaluate** - Score every member that has no cached fitness
//! 3. **Select** - Pick parents, favoring lower fitness (roulette wheel or tournament)
//! 4. **Crossover** - Recombine parent pairs with the configured probability
//! 5. **Mutate** - Perturb single genes with the configured probability
//! 6. **Repeat** - Until the generation limit or the target fitness is reached
//!
//! # Architecture
//!
//! ```text
//! Genetic Search (generation loop, best-so-far, observers)
//!     ↓ evolves with
//! Genetic Operators (sample, select, crossover, mutate)
//!     ↓ built on
//! Gene Operations (integer vectors)
//!
//! Genetic Search
//!     ↓ scores with
//! Fitness Evaluator (staghunt-evaluator)
//! ```
//!
//! # Example
//!
//! ```
//! use staghunt_engine::{GameRules, GameSeed, bots::Roster};
//! use staghunt_evaluator::{
//!     decision::DecisionProfile,
//!     fitness::{FitnessEvaluator as _, RankFitnessEvaluator},
//! };
//! use staghunt_training::search::{GenerationStats, GeneticAlgorithmParams, GeneticSearch};
//!
//! let evaluator = RankFitnessEvaluator::new(
//!     GameRules::fixed_length(20),
//!     Roster::standard(),
//!     DecisionProfile::seven_function(),
//! );
//! let params = GeneticAlgorithmParams {
//!     population_size: 6,
//!     max_generations: 2,
//!     ..Default::default()
//! };
//! let search = GeneticSearch::new(&params, evaluator.chromosome_len());
//! let mut rng = GameSeed::from_bytes([5; 16]).rng();
//! let outcome = search
//!     .run(&evaluator, &mut rng, &mut |_: &GenerationStats| {})
//!     .unwrap();
//! assert_eq!(outcome.generations, 2);
//! assert_eq!(outcome.best.chromosome().len(), 7);
//! ```

pub mod genes;
pub mod genetic;
pub mod search;
