//! The generational search loop.
//!
//! Generation `0` is the evaluated initial population. Each following generation
//! evolves the previous one and evaluates the new members. The search stops after
//! `max_generations` generations, or as soon as the best-so-far fitness reaches the
//! optional target.

use rand::Rng;
use serde::{Deserialize, Serialize};
use staghunt_evaluator::{
    EvaluatorError,
    chromosome::{Chromosome, GENE_MAX, GENE_MIN},
    fitness::{Fitness, FitnessEvaluator},
};
use staghunt_stats::descriptive::DescriptiveStats;

use crate::genetic::{
    CrossoverKind, EvaluationMode, GeneticOperators, Individual, MutationKind, Population,
    PopulationEvolver, Selection,
};

/// Search configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneticAlgorithmParams {
    pub population_size: usize,
    pub max_generations: usize,
    pub crossover_rate: f64,
    pub mutation_rate: f64,
    pub selection: Selection,
    pub crossover: CrossoverKind,
    pub mutation: MutationKind,
    /// Best members carried over unchanged into the next generation.
    pub elite_count: usize,
    /// Stop once the best fitness is at or below this value.
    pub target_fitness: Option<Fitness>,
    pub evaluation: EvaluationMode,
    pub gene_min: i32,
    pub gene_max: i32,
}

impl Default for GeneticAlgorithmParams {
    fn default() -> Self {
        Self {
            population_size: 80,
            max_generations: 500,
            crossover_rate: 1.0,
            mutation_rate: 0.08,
            selection: Selection::RouletteWheel,
            crossover: CrossoverKind::SinglePoint,
            mutation: MutationKind::IntegerRange,
            elite_count: 1,
            target_fitness: None,
            evaluation: EvaluationMode::Sequential,
            gene_min: GENE_MIN,
            gene_max: GENE_MAX,
        }
    }
}

impl GeneticAlgorithmParams {
    /// Operators producing chromosomes of `chromosome_len` genes.
    #[must_use]
    pub fn evolver(&self, chromosome_len: usize) -> PopulationEvolver {
        PopulationEvolver {
            chromosome_len,
            gene_min: self.gene_min,
            gene_max: self.gene_max,
            selection: self.selection,
            crossover: self.crossover,
            crossover_rate: self.crossover_rate,
            mutation: self.mutation,
            mutation_rate: self.mutation_rate,
        }
    }
}

/// Fitness summary of one evaluated generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    pub generation: usize,
    /// Lowest fitness of this generation.
    pub best: Fitness,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    /// Highest fitness of this generation.
    pub worst: Fitness,
    /// Lowest fitness seen in any generation so far.
    pub best_so_far: Fitness,
    pub best_chromosome: Chromosome,
}

impl GenerationStats {
    fn new(generation: usize, fitness: &[Fitness], best_so_far: &Individual) -> Option<Self> {
        let values = fitness.iter().copied().map(f64::from);
        let stats = DescriptiveStats::new(values)?;
        Some(Self {
            generation,
            best: *fitness.iter().min()?,
            mean: stats.mean,
            median: stats.median,
            std_dev: stats.std_dev,
            worst: *fitness.iter().max()?,
            best_so_far: best_so_far.fitness()?,
            best_chromosome: best_so_far.chromosome().clone(),
        })
    }
}

/// Receives the statistics of every evaluated generation.
pub trait GenerationObserver {
    fn on_generation(&mut self, stats: &GenerationStats);
}

impl<F> GenerationObserver for F
where
    F: FnMut(&GenerationStats),
{
    fn on_generation(&mut self, stats: &GenerationStats) {
        self(stats);
    }
}

/// Result of a search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    /// Best individual of all generations. Always evaluated.
    pub best: Individual,
    /// Number of generations evolved after the initial one.
    pub generations: usize,
}

impl SearchOutcome {
    #[must_use]
    pub fn best_fitness(&self) -> Fitness {
        self.best.fitness().unwrap_or(Fitness::MAX)
    }
}

/// Minimizing genetic search over chromosomes.
#[derive(Debug, Clone)]
pub struct GeneticSearch<O = PopulationEvolver> {
    operators: O,
    population_size: usize,
    max_generations: usize,
    elite_count: usize,
    target_fitness: Option<Fitness>,
    evaluation: EvaluationMode,
}

impl GeneticSearch {
    /// A search using [`PopulationEvolver`] configured from `params`.
    ///
    /// # Panics
    ///
    /// Panics if the population size is zero or a rate lies outside `[0, 1]`.
    #[must_use]
    pub fn new(params: &GeneticAlgorithmParams, chromosome_len: usize) -> Self {
        assert!(
            (0.0..=1.0).contains(&params.crossover_rate),
            "crossover rate must be in [0, 1], got {}",
            params.crossover_rate
        );
        assert!(
            (0.0..=1.0).contains(&params.mutation_rate),
            "mutation rate must be in [0, 1], got {}",
            params.mutation_rate
        );
        Self::with_operators(params.evolver(chromosome_len), params)
    }
}

impl<O> GeneticSearch<O>
where
    O: GeneticOperators,
{
    /// A search using custom operators. The operator fields of `params` are ignored.
    ///
    /// # Panics
    ///
    /// Panics if the population size is zero.
    #[must_use]
    pub fn with_operators(operators: O, params: &GeneticAlgorithmParams) -> Self {
        assert!(params.population_size > 0, "population size must be positive");
        Self {
            operators,
            population_size: params.population_size,
            max_generations: params.max_generations,
            elite_count: params.elite_count,
            target_fitness: params.target_fitness,
            evaluation: params.evaluation,
        }
    }

    #[must_use]
    pub fn operators(&self) -> &O {
        &self.operators
    }

    fn target_reached(&self, best: &Individual) -> bool {
        self.target_fitness
            .zip(best.fitness())
            .is_some_and(|(target, fitness)| fitness <= target)
    }

    /// Runs the search to completion.
    ///
    /// Every random decision, tournament seeds included, is drawn from `rng`, so the
    /// same generator state yields the same outcome.
    pub fn run<E, R, Obs>(
        &self,
        evaluator: &E,
        rng: &mut R,
        observer: &mut Obs,
    ) -> Result<SearchOutcome, EvaluatorError>
    where
        E: FitnessEvaluator + ?Sized,
        R: Rng + ?Sized,
        Obs: GenerationObserver + ?Sized,
    {
        let mut population = Population::random(&self.operators, self.population_size, rng);
        population.evaluate_fitness(evaluator, self.evaluation, rng)?;
        let mut best = evaluated_best(&population).clone();
        report(0, &population, &best, observer);

        let mut generation = 0;
        while generation < self.max_generations && !self.target_reached(&best) {
            generation += 1;
            population = population.evolve(&self.operators, self.elite_count, rng);
            population.evaluate_fitness(evaluator, self.evaluation, rng)?;

            let candidate = evaluated_best(&population);
            if candidate.fitness() < best.fitness() {
                best = candidate.clone();
            }
            report(generation, &population, &best, observer);
        }

        tracing::info!(
            generations = generation,
            fitness = best.fitness(),
            chromosome = %best.chromosome(),
            "search finished"
        );
        Ok(SearchOutcome {
            best,
            generations: generation,
        })
    }
}

fn report<Obs>(generation: usize, population: &Population, best: &Individual, observer: &mut Obs)
where
    Obs: GenerationObserver + ?Sized,
{
    let fitness = population
        .individuals()
        .iter()
        .filter_map(Individual::fitness)
        .collect::<Vec<_>>();
    let Some(stats) = GenerationStats::new(generation, &fitness, best) else {
        return;
    };
    tracing::info!(
        generation,
        best = stats.best,
        mean = stats.mean,
        worst = stats.worst,
        best_so_far = stats.best_so_far,
        "generation evaluated"
    );
    observer.on_generation(&stats);
}

fn evaluated_best(population: &Population) -> &Individual {
    population
        .best()
        .unwrap_or_else(|| panic!("evaluated population has no best member"))
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;
    use staghunt_engine::{
        BoxedPlayer, GameError, GameSeed, Ranking, TournamentRunner,
        bots::{BotSpec, Roster},
    };
    use staghunt_evaluator::{decision::DecisionProfile, fitness::RankFitnessEvaluator};

    use super::*;

    /// Rotates the roster order by an amount drawn from the game seed.
    #[derive(Debug)]
    struct SeededRotation;

    impl TournamentRunner for SeededRotation {
        fn play_game(
            &self,
            players: Vec<BoxedPlayer>,
            seed: GameSeed,
        ) -> Result<Ranking, GameError> {
            let mut names = players
                .iter()
                .map(|p| p.name().to_owned())
                .collect::<Vec<_>>();
            let shift = seed.rng().random_range(0..names.len());
            names.rotate_left(shift);
            Ok(Ranking::new(names))
        }
    }

    /// Uniformly random fitness, ignoring the chromosome.
    #[derive(Debug)]
    struct Noise;

    impl FitnessEvaluator for Noise {
        fn chromosome_len(&self) -> usize {
            7
        }

        fn evaluate(&self, _chromosome: &Chromosome, seed: GameSeed) -> Result<Fitness, EvaluatorError> {
            Ok(seed.rng().random_range(0..100))
        }
    }

    fn stub_evaluator() -> RankFitnessEvaluator<SeededRotation> {
        RankFitnessEvaluator::new(
            SeededRotation,
            Roster::new(vec![BotSpec::Pushover, BotSpec::Freeloader]),
            DecisionProfile::seven_function(),
        )
    }

    fn small_params() -> GeneticAlgorithmParams {
        GeneticAlgorithmParams {
            population_size: 4,
            max_generations: 1,
            ..Default::default()
        }
    }

    fn run_seeded(params: &GeneticAlgorithmParams) -> (SearchOutcome, Vec<GenerationStats>) {
        let evaluator = stub_evaluator();
        let search = GeneticSearch::new(params, evaluator.chromosome_len());
        let mut history = vec![];
        let outcome = search
            .run(
                &evaluator,
                &mut Pcg32::seed_from_u64(2024),
                &mut |stats: &GenerationStats| history.push(stats.clone()),
            )
            .unwrap();
        (outcome, history)
    }

    #[test]
    fn test_seeded_search_is_reproducible() {
        let (first, first_history) = run_seeded(&small_params());
        let (second, second_history) = run_seeded(&small_params());
        assert_eq!(first, second);
        assert_eq!(first_history, second_history);

        assert!([0, 1, 4].contains(&first.best_fitness()));
        assert_eq!(first.best.chromosome().len(), 7);
        assert!(first.best.chromosome().is_conventional());
        assert_eq!(first.generations, 1);
        assert_eq!(first_history.len(), 2);
    }

    #[test]
    fn test_parallel_search_matches_sequential() {
        let parallel = GeneticAlgorithmParams {
            evaluation: EvaluationMode::Parallel,
            ..small_params()
        };
        assert_eq!(run_seeded(&small_params()).0, run_seeded(&parallel).0);
    }

    #[test]
    fn test_best_so_far_never_regresses() {
        let params = GeneticAlgorithmParams {
            population_size: 6,
            max_generations: 30,
            elite_count: 0,
            ..Default::default()
        };
        let search = GeneticSearch::new(&params, Noise.chromosome_len());
        let mut history = vec![];
        let outcome = search
            .run(
                &Noise,
                &mut Pcg32::seed_from_u64(5),
                &mut |stats: &GenerationStats| history.push(stats.clone()),
            )
            .unwrap();

        assert_eq!(history.len(), 31);
        assert!(history.windows(2).all(|w| w[1].best_so_far <= w[0].best_so_far));
        let overall = history.iter().map(|s| s.best).min().unwrap();
        assert_eq!(outcome.best_fitness(), overall);
        assert_eq!(history.last().unwrap().best_so_far, overall);
        assert!(history.iter().all(|s| s.best <= s.worst));
    }

    #[test]
    fn test_target_fitness_stops_early() {
        let params = GeneticAlgorithmParams {
            population_size: 5,
            max_generations: 1000,
            target_fitness: Some(99),
            ..Default::default()
        };
        let search = GeneticSearch::new(&params, Noise.chromosome_len());
        let outcome = search
            .run(&Noise, &mut Pcg32::seed_from_u64(1), &mut |_: &GenerationStats| {})
            .unwrap();
        // every fitness is at most 99
        assert_eq!(outcome.generations, 0);
    }

    #[test]
    fn test_stats_serialize_as_one_json_object() {
        let (_, history) = run_seeded(&small_params());
        let line = serde_json::to_string(&history[0]).unwrap();
        assert!(!line.contains('\n'));
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["generation"], 0);
        assert!(value["best_chromosome"].is_array());
    }

    #[test]
    #[should_panic(expected = "population size")]
    fn test_empty_population_is_rejected() {
        let params = GeneticAlgorithmParams {
            population_size: 0,
            ..Default::default()
        };
        let _ = GeneticSearch::new(&params, 7);
    }
}
