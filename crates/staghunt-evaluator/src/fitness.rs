//! Rank-based fitness of a chromosome.
//!
//! A candidate is scored by playing one tournament against a fixed roster and squaring
//! its 0-based final position: the winner scores `0`, the runner-up `1`, the third `4`
//! and so on. Lower is better. The score is not normalized by roster size, so values
//! are only comparable under the same roster.

use std::{collections::HashSet, fmt};

use rand::Rng as _;
use staghunt_engine::{BoxedPlayer, GameSeed, Ranking, TournamentRunner, bots::Roster};

use crate::{
    EvaluatorError,
    chromosome::Chromosome,
    decision::DecisionProfile,
    weighted_player::{CANDIDATE_NAME, WeightedPlayer},
};

/// Fitness value, lower is better.
pub type Fitness = u32;

/// Scores chromosomes.
///
/// Evaluation consumes all of its randomness from `seed`, so the same chromosome and
/// seed always give the same fitness.
pub trait FitnessEvaluator: fmt::Debug + Send + Sync {
    /// Number of genes an evaluated chromosome must have.
    fn chromosome_len(&self) -> usize;

    fn evaluate(&self, chromosome: &Chromosome, seed: GameSeed) -> Result<Fitness, EvaluatorError>;
}

/// Squared 0-based rank.
#[must_use]
pub fn rank_fitness(position: usize) -> Fitness {
    let position = Fitness::try_from(position).unwrap_or(Fitness::MAX);
    position.saturating_mul(position)
}

/// Fitness as `rank²` of a single tournament against `roster`.
#[derive(Debug, Clone)]
pub struct RankFitnessEvaluator<T> {
    runner: T,
    roster: Roster,
    profile: DecisionProfile,
    candidate_name: String,
}

impl<T> RankFitnessEvaluator<T>
where
    T: TournamentRunner,
{
    #[must_use]
    pub fn new(runner: T, roster: Roster, profile: DecisionProfile) -> Self {
        Self {
            runner,
            roster,
            profile,
            candidate_name: CANDIDATE_NAME.to_owned(),
        }
    }

    /// Plays the candidate under another name, for rosters that already use the default.
    #[must_use]
    pub fn with_candidate_name(mut self, name: impl Into<String>) -> Self {
        self.candidate_name = name.into();
        self
    }

    #[must_use]
    pub fn runner(&self) -> &T {
        &self.runner
    }

    #[must_use]
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    #[must_use]
    pub fn profile(&self) -> DecisionProfile {
        self.profile
    }

    #[must_use]
    pub fn candidate_name(&self) -> &str {
        &self.candidate_name
    }

    /// Builds the players of the tournament that [`FitnessEvaluator::evaluate`] plays for
    /// `seed`: a fresh copy of every roster bot, with the candidate seated among them.
    /// Also returns the seed of the game itself.
    ///
    /// Rankings break ties by seat, so the candidate's seat is drawn from `seed` rather
    /// than fixed at the front.
    pub fn lineup(
        &self,
        chromosome: &Chromosome,
        seed: GameSeed,
    ) -> Result<(Vec<BoxedPlayer>, GameSeed), EvaluatorError> {
        let candidate = WeightedPlayer::new(&*self.candidate_name, chromosome.clone(), self.profile)?;
        self.roster.validate().map_err(EvaluatorError::Game)?;

        let mut rng = seed.rng();
        let mut players = self.roster.build(&mut rng);
        let mut names = HashSet::new();
        names.insert(self.candidate_name.as_str());
        for bot in &players {
            if !names.insert(bot.name()) {
                return Err(EvaluatorError::DuplicatePlayerName {
                    name: bot.name().to_owned(),
                });
            }
        }

        let seat = rng.random_range(0..=players.len());
        players.insert(seat, Box::new(candidate));
        Ok((players, rng.random()))
    }

    /// `rank²` of the candidate in `ranking`.
    pub fn fitness_of(&self, ranking: &Ranking) -> Result<Fitness, EvaluatorError> {
        let position = ranking.position(&self.candidate_name).ok_or_else(|| {
            EvaluatorError::CandidateNotRanked {
                name: self.candidate_name.clone(),
            }
        })?;
        Ok(rank_fitness(position))
    }
}

impl<T> FitnessEvaluator for RankFitnessEvaluator<T>
where
    T: TournamentRunner,
{
    fn chromosome_len(&self) -> usize {
        self.profile.arity()
    }

    fn evaluate(&self, chromosome: &Chromosome, seed: GameSeed) -> Result<Fitness, EvaluatorError> {
        let (players, game_seed) = self.lineup(chromosome, seed)?;
        let ranking = self
            .runner
            .play_game(players, game_seed)
            .map_err(EvaluatorError::Game)?;
        let fitness = self.fitness_of(&ranking)?;
        tracing::debug!(%seed, %chromosome, fitness, "evaluated chromosome");
        Ok(fitness)
    }
}
