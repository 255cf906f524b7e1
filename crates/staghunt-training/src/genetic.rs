//! Population and genetic operators.
//!
//! The search minimizes fitness, so every comparison here favors the *lower* value.
//!
//! # Genetic Operators
//!
//! The search loop only relies on the four operations of [`GeneticOperators`]: sampling
//! a random chromosome, selecting a parent, crossing two parents over and mutating a
//! child. [`PopulationEvolver`] implements them from plain configuration values.
//!
//! ## Roulette Wheel Selection
//!
//! Fitness-proportionate selection inverted for minimization: member `i` is drawn with
//! weight `max + min − fitnessᵢ`, where `max` and `min` are the worst and best fitness
//! of the population. The worst member only gets a chance when everyone ties. If every
//! weight is zero the draw is uniform.
//!
//! ## Tournament Selection
//!
//! Draws `size` distinct members and keeps the one with the lowest fitness.
//!
//! # Evaluation
//!
//! Fitness is cached per individual: elites carried into the next generation are not
//! re-evaluated. Tournament seeds for the members to evaluate are drawn from the search
//! generator in population order *before* any tournament runs, so parallel evaluation
//! gives exactly the results of sequential evaluation.

use std::{panic, thread};

use rand::{
    Rng,
    seq::{IndexedRandom as _, SliceRandom as _},
};
use serde::{Deserialize, Serialize};
use staghunt_engine::GameSeed;
use staghunt_evaluator::{
    EvaluatorError,
    chromosome::Chromosome,
    fitness::{Fitness, FitnessEvaluator},
};

use crate::genes;

/// A candidate chromosome and its cached fitness.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Individual {
    chromosome: Chromosome,
    fitness: Option<Fitness>,
}

impl Individual {
    /// An individual that still has to be evaluated.
    #[must_use]
    pub fn new(chromosome: Chromosome) -> Self {
        Self {
            chromosome,
            fitness: None,
        }
    }

    #[must_use]
    pub fn chromosome(&self) -> &Chromosome {
        &self.chromosome
    }

    /// Cached fitness, `None` until evaluated.
    #[must_use]
    pub fn fitness(&self) -> Option<Fitness> {
        self.fitness
    }

    fn evaluated_fitness(&self) -> Fitness {
        self.fitness
            .unwrap_or_else(|| panic!("individual {} was never evaluated", self.chromosome))
    }
}

/// How members of the population are evaluated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationMode {
    /// One tournament after the other on the calling thread.
    #[default]
    Sequential,
    /// One scoped thread per member.
    Parallel,
}

/// A fixed-size set of individuals.
///
/// After [`Population::evaluate_fitness`] the members are sorted by fitness, best
/// (lowest) first.
#[derive(Debug, Clone)]
pub struct Population {
    individuals: Vec<Individual>,
}

impl Population {
    #[must_use]
    pub fn new(individuals: Vec<Individual>) -> Self {
        Self { individuals }
    }

    /// Samples `count` random individuals.
    #[must_use]
    pub fn random<O, R>(operators: &O, count: usize, rng: &mut R) -> Self
    where
        O: GeneticOperators + ?Sized,
        R: Rng + ?Sized,
    {
        let individuals = (0..count)
            .map(|_| Individual::new(operators.sample(rng)))
            .collect();
        Self { individuals }
    }

    #[must_use]
    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// Best evaluated member, if the population has been evaluated.
    #[must_use]
    pub fn best(&self) -> Option<&Individual> {
        self.individuals.iter().filter(|i| i.fitness.is_some()).min_by_key(|i| i.fitness)
    }

    /// Evaluates every member without a cached fitness, then sorts the population best
    /// first. Ties keep their previous order.
    pub fn evaluate_fitness<E, R>(
        &mut self,
        evaluator: &E,
        mode: EvaluationMode,
        rng: &mut R,
    ) -> Result<(), EvaluatorError>
    where
        E: FitnessEvaluator + ?Sized,
        R: Rng + ?Sized,
    {
        let jobs = self
            .individuals
            .iter_mut()
            .filter(|ind| ind.fitness.is_none())
            .map(|ind| {
                let seed: GameSeed = rng.random();
                (ind, seed)
            })
            .collect::<Vec<_>>();

        match mode {
            EvaluationMode::Sequential => {
                for (ind, seed) in jobs {
                    ind.fitness = Some(evaluator.evaluate(&ind.chromosome, seed)?);
                }
            }
            EvaluationMode::Parallel => {
                thread::scope(|s| {
                    let handles = jobs
                        .into_iter()
                        .map(|(ind, seed)| {
                            s.spawn(move || -> Result<(), EvaluatorError> {
                                ind.fitness = Some(evaluator.evaluate(&ind.chromosome, seed)?);
                                Ok(())
                            })
                        })
                        .collect::<Vec<_>>();
                    handles
                        .into_iter()
                        .map(|h| h.join().unwrap_or_else(|e| panic::resume_unwind(e)))
                        .collect::<Result<(), _>>()
                })?;
            }
        }

        // lowest fitness first
        self.individuals.sort_by_key(|ind| ind.fitness);
        Ok(())
    }

    /// Creates the next generation.
    ///
    /// The `elite_count` best members are copied unchanged, fitness included. The rest
    /// is filled with mutated offspring of selected parents. The new population has the
    /// same size as this one.
    ///
    /// # Panics
    ///
    /// Panics if the population is empty or not evaluated.
    #[must_use]
    pub fn evolve<O, R>(&self, operators: &O, elite_count: usize, rng: &mut R) -> Population
    where
        O: GeneticOperators + ?Sized,
        R: Rng + ?Sized,
    {
        assert!(!self.is_empty(), "cannot evolve an empty population");
        assert!(
            self.individuals
                .is_sorted_by_key(|ind| ind.evaluated_fitness()),
            "population must be evaluated before it evolves"
        );

        let size = self.individuals.len();
        let mut next = Vec::with_capacity(size);
        next.extend(self.individuals[..elite_count.min(size)].iter().cloned());

        while next.len() < size {
            let p1 = operators.select(&self.individuals, rng);
            let p2 = operators.select(&self.individuals, rng);
            let (c1, c2) = operators.crossover(&p1.chromosome, &p2.chromosome, rng);
            for child in [c1, c2] {
                if next.len() < size {
                    next.push(Individual::new(operators.mutate(child, rng)));
                }
            }
        }
        Population { individuals: next }
    }
}

/// The randomized operations the search is built from.
pub trait GeneticOperators {
    /// A new random chromosome.
    fn sample<R>(&self, rng: &mut R) -> Chromosome
    where
        R: Rng + ?Sized;

    /// Picks one parent from an evaluated, non-empty population.
    fn select<'a, R>(&self, population: &'a [Individual], rng: &mut R) -> &'a Individual
    where
        R: Rng + ?Sized;

    /// Produces two children from two parents.
    fn crossover<R>(&self, p1: &Chromosome, p2: &Chromosome, rng: &mut R) -> (Chromosome, Chromosome)
    where
        R: Rng + ?Sized;

    fn mutate<R>(&self, chromosome: Chromosome, rng: &mut R) -> Chromosome
    where
        R: Rng + ?Sized;
}

/// Parent selection strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Selection {
    RouletteWheel,
    Tournament { size: usize },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrossoverKind {
    #[default]
    SinglePoint,
    TwoPoint,
    Uniform,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MutationKind {
    /// Replace the gene by a uniform draw within the gene bounds.
    #[default]
    IntegerRange,
    /// Add rounded Gaussian noise and clamp to the gene bounds.
    IntegerGaussian { sigma: f64 },
}

/// [`GeneticOperators`] configured by plain values.
#[derive(Debug, Clone, PartialEq)]
pub struct PopulationEvolver {
    /// Number of genes of sampled chromosomes.
    pub chromosome_len: usize,
    /// Lowest gene value produced by sampling and mutation.
    pub gene_min: i32,
    /// Highest gene value produced by sampling and mutation.
    pub gene_max: i32,
    pub selection: Selection,
    pub crossover: CrossoverKind,
    /// Probability that a parent pair is crossed over rather than copied.
    pub crossover_rate: f64,
    pub mutation: MutationKind,
    /// Per-gene mutation probability.
    pub mutation_rate: f64,
}

impl GeneticOperators for PopulationEvolver {
    fn sample<R>(&self, rng: &mut R) -> Chromosome
    where
        R: Rng + ?Sized,
    {
        genes::random(rng, self.gene_min, self.gene_max, self.chromosome_len).into()
    }

    fn select<'a, R>(&self, population: &'a [Individual], rng: &mut R) -> &'a Individual
    where
        R: Rng + ?Sized,
    {
        match self.selection {
            Selection::RouletteWheel => roulette_select(population, rng),
            Selection::Tournament { size } => tournament_select(population, size, rng),
        }
    }

    fn crossover<R>(&self, p1: &Chromosome, p2: &Chromosome, rng: &mut R) -> (Chromosome, Chromosome)
    where
        R: Rng + ?Sized,
    {
        if !rng.random_bool(self.crossover_rate) {
            return (p1.clone(), p2.clone());
        }
        let (c1, c2) = match self.crossover {
            CrossoverKind::SinglePoint => genes::single_point(p1.genes(), p2.genes(), rng),
            CrossoverKind::TwoPoint => genes::two_point(p1.genes(), p2.genes(), rng),
            CrossoverKind::Uniform => genes::uniform(p1.genes(), p2.genes(), rng),
        };
        (c1.into(), c2.into())
    }

    fn mutate<R>(&self, chromosome: Chromosome, rng: &mut R) -> Chromosome
    where
        R: Rng + ?Sized,
    {
        let mut genes = chromosome.into_genes();
        match self.mutation {
            MutationKind::IntegerRange => {
                genes::mutate_range(&mut genes, self.gene_min, self.gene_max, self.mutation_rate, rng);
            }
            MutationKind::IntegerGaussian { sigma } => genes::mutate_gaussian(
                &mut genes,
                sigma,
                self.gene_min,
                self.gene_max,
                self.mutation_rate,
                rng,
            ),
        }
        genes.into()
    }
}

fn roulette_select<'a, R>(population: &'a [Individual], rng: &mut R) -> &'a Individual
where
    R: Rng + ?Sized,
{
    assert!(!population.is_empty(), "cannot select from an empty population");
    let (min, max) = population
        .iter()
        .map(|ind| u64::from(ind.evaluated_fitness()))
        .fold((u64::MAX, 0), |(lo, hi), f| (lo.min(f), hi.max(f)));
    population
        .choose_weighted(rng, |ind| max + min - u64::from(ind.evaluated_fitness()))
        .unwrap_or_else(|_| &population[rng.random_range(0..population.len())])
}

fn tournament_select<'a, R>(
    population: &'a [Individual],
    tournament_size: usize,
    rng: &mut R,
) -> &'a Individual
where
    R: Rng + ?Sized,
{
    assert!(tournament_size > 0, "tournament size must be positive");
    let mut contestants = population
        .choose_multiple(rng, tournament_size)
        .collect::<Vec<_>>();
    // equal fitness is broken by draw order, not population order
    contestants.shuffle(rng);
    contestants
        .into_iter()
        .min_by_key(|ind| ind.evaluated_fitness())
        .unwrap_or_else(|| panic!("cannot select from an empty population"))
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;
    use staghunt_evaluator::chromosome::{GENE_MAX, GENE_MIN};

    use super::*;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(11)
    }

    fn evaluated(genes: Vec<i32>, fitness: Fitness) -> Individual {
        Individual {
            chromosome: genes.into(),
            fitness: Some(fitness),
        }
    }

    fn evolver(selection: Selection) -> PopulationEvolver {
        PopulationEvolver {
            chromosome_len: 5,
            gene_min: GENE_MIN,
            gene_max: GENE_MAX,
            selection,
            crossover: CrossoverKind::SinglePoint,
            crossover_rate: 1.0,
            mutation: MutationKind::IntegerRange,
            mutation_rate: 0.08,
        }
    }

    /// Fitness is the sum of the genes.
    #[derive(Debug)]
    struct GeneSum;

    impl FitnessEvaluator for GeneSum {
        fn chromosome_len(&self) -> usize {
            5
        }

        fn evaluate(&self, chromosome: &Chromosome, _seed: GameSeed) -> Result<Fitness, EvaluatorError> {
            Ok(chromosome
                .genes()
                .iter()
                .map(|&g| Fitness::try_from(g).unwrap())
                .sum())
        }
    }

    #[test]
    fn test_roulette_favors_low_fitness() {
        let population = [
            evaluated(vec![0], 0),
            evaluated(vec![1], 1),
            evaluated(vec![2], 4),
            evaluated(vec![3], 9),
        ];
        let evolver = evolver(Selection::RouletteWheel);
        let mut rng = rng();
        let mut counts = [0; 4];
        for _ in 0..2000 {
            let picked = evolver.select(&population, &mut rng);
            counts[usize::try_from(picked.chromosome.genes()[0]).unwrap()] += 1;
        }
        // weights 9, 8, 5, 0
        assert_eq!(counts[3], 0);
        assert!(counts[0] > counts[2]);
        assert!(counts[1] > counts[2]);
    }

    #[test]
    fn test_roulette_with_all_zero_fitness_is_uniform() {
        let population = [evaluated(vec![0], 0), evaluated(vec![1], 0)];
        let evolver = evolver(Selection::RouletteWheel);
        let mut rng = rng();
        let mut counts = [0; 2];
        for _ in 0..1000 {
            let picked = evolver.select(&population, &mut rng);
            counts[usize::try_from(picked.chromosome.genes()[0]).unwrap()] += 1;
        }
        assert!(counts.iter().all(|&c| c > 350));
    }

    #[test]
    fn test_full_tournament_picks_best() {
        let population = [
            evaluated(vec![0], 9),
            evaluated(vec![1], 0),
            evaluated(vec![2], 4),
        ];
        let evolver = evolver(Selection::Tournament { size: 3 });
        let mut rng = rng();
        for _ in 0..20 {
            assert_eq!(evolver.select(&population, &mut rng).fitness(), Some(0));
        }
    }

    #[test]
    fn test_no_crossover_copies_parents() {
        let mut evolver = evolver(Selection::RouletteWheel);
        evolver.crossover_rate = 0.0;
        let p1 = Chromosome::new(vec![1, 2, 3, 4, 5]);
        let p2 = Chromosome::new(vec![6, 7, 8, 9, 10]);
        let (c1, c2) = evolver.crossover(&p1, &p2, &mut rng());
        assert_eq!((c1, c2), (p1, p2));
    }

    #[test]
    fn test_evaluation_sorts_and_caches() {
        let mut rng = rng();
        let evolver = evolver(Selection::RouletteWheel);
        let mut population = Population::random(&evolver, 10, &mut rng);
        assert!(population.best().is_none());
        population
            .evaluate_fitness(&GeneSum, EvaluationMode::Sequential, &mut rng)
            .unwrap();
        let fitness = population
            .individuals()
            .iter()
            .map(|ind| ind.fitness().unwrap())
            .collect::<Vec<_>>();
        assert!(fitness.is_sorted());
        assert_eq!(population.best().unwrap().fitness(), Some(fitness[0]));

        let next = population.evolve(&evolver, 2, &mut rng);
        assert_eq!(next.len(), 10);
        assert_eq!(next.individuals()[..2], population.individuals()[..2]);
        assert!(next.individuals()[2..].iter().all(|ind| ind.fitness().is_none()));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let evolver = evolver(Selection::Tournament { size: 2 });
        let population = Population::random(&evolver, 12, &mut rng());

        let mut sequential = population.clone();
        let mut parallel = population;
        let mut rng_a = rng();
        let mut rng_b = rng();
        sequential
            .evaluate_fitness(&GeneSum, EvaluationMode::Sequential, &mut rng_a)
            .unwrap();
        parallel
            .evaluate_fitness(&GeneSum, EvaluationMode::Parallel, &mut rng_b)
            .unwrap();
        assert_eq!(sequential.individuals(), parallel.individuals());
        // both drew the same number of seeds
        assert_eq!(rng_a.random::<u64>(), rng_b.random::<u64>());
    }

    #[test]
    fn test_evaluation_errors_propagate() {
        let evolver = PopulationEvolver {
            chromosome_len: 7,
            ..evolver(Selection::RouletteWheel)
        };

        #[derive(Debug)]
        struct Strict;
        impl FitnessEvaluator for Strict {
            fn chromosome_len(&self) -> usize {
                5
            }
            fn evaluate(&self, chromosome: &Chromosome, _seed: GameSeed) -> Result<Fitness, EvaluatorError> {
                Err(EvaluatorError::ChromosomeLength {
                    expected: 5,
                    actual: chromosome.len(),
                })
            }
        }

        let mut rng = rng();
        for mode in [EvaluationMode::Sequential, EvaluationMode::Parallel] {
            let mut population = Population::random(&evolver, 3, &mut rng);
            let err = population.evaluate_fitness(&Strict, mode, &mut rng).unwrap_err();
            assert!(matches!(err, EvaluatorError::ChromosomeLength { actual: 7, .. }));
        }
    }
}
