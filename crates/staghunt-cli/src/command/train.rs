use std::path::PathBuf;

use chrono::Utc;
use rand::Rng as _;
use staghunt_engine::GameSeed;
use staghunt_evaluator::{
    chromosome::{GENE_MAX, GENE_MIN},
    fitness::{FitnessEvaluator as _, RankFitnessEvaluator},
};
use staghunt_training::{
    genetic::{CrossoverKind, EvaluationMode, MutationKind, Selection},
    search::{GenerationStats, GeneticAlgorithmParams, GeneticSearch},
};

use super::{ProfileKind, TournamentArg};
use crate::{
    schema::trained_model::TrainedModel,
    util::{Output, StatsWriter},
};

const POPULATION_SIZE: usize = 80;
const MAX_GENERATIONS: usize = 500;
const CROSSOVER_RATE: f64 = 1.0;
const MUTATION_RATE: f64 = 0.08;
const ELITE_COUNT: usize = 1;
const TOURNAMENT_SIZE: usize = 3;
const MUTATION_SIGMA: f64 = 10.0;

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr)]
pub(crate) enum SelectionKind {
    #[default]
    Roulette,
    Tournament,
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr)]
pub(crate) enum CrossoverArg {
    #[default]
    Single,
    Two,
    Uniform,
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr)]
pub(crate) enum MutationArg {
    #[default]
    Range,
    Gaussian,
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct TrainArg {
    /// Heuristic set and threshold policy (five or seven)
    #[arg(long, default_value = "seven")]
    pub(super) profile: ProfileKind,
    #[clap(flatten)]
    pub(super) tournament: TournamentArg,
    /// Number of individuals per generation
    #[arg(long, default_value_t = POPULATION_SIZE)]
    population: usize,
    /// Number of generations evolved after the initial population
    #[arg(long, default_value_t = MAX_GENERATIONS)]
    generations: usize,
    /// Probability that a parent pair is crossed over
    #[arg(long, default_value_t = CROSSOVER_RATE)]
    crossover_rate: f64,
    /// Per-gene mutation probability
    #[arg(long, default_value_t = MUTATION_RATE)]
    mutation_rate: f64,
    /// Parent selection (roulette or tournament)
    #[arg(long, default_value = "roulette")]
    selection: SelectionKind,
    /// Contestants per selection tournament
    #[arg(long, default_value_t = TOURNAMENT_SIZE)]
    tournament_size: usize,
    /// Crossover operator (single, two or uniform)
    #[arg(long, default_value = "single")]
    crossover: CrossoverArg,
    /// Mutation operator (range or gaussian)
    #[arg(long, default_value = "range")]
    mutation: MutationArg,
    /// Standard deviation of gaussian mutation
    #[arg(long, default_value_t = MUTATION_SIGMA)]
    mutation_sigma: f64,
    /// Best individuals carried over unchanged
    #[arg(long, default_value_t = ELITE_COUNT)]
    elite: usize,
    /// Smallest gene value of sampled and mutated chromosomes
    #[arg(long, default_value_t = GENE_MIN, allow_negative_numbers = true)]
    gene_min: i32,
    /// Largest gene value of sampled and mutated chromosomes
    #[arg(long, default_value_t = GENE_MAX, allow_negative_numbers = true)]
    gene_max: i32,
    /// Stop as soon as the best fitness reaches this value
    #[arg(long)]
    target_fitness: Option<u32>,
    /// Evaluate the population on multiple threads
    #[arg(long)]
    parallel: bool,
    /// 128-bit hex seed for a reproducible run (random if omitted)
    #[arg(long)]
    seed: Option<GameSeed>,
    /// Per-generation statistics file (JSON Lines)
    #[arg(long)]
    stats_output: Option<PathBuf>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

impl TrainArg {
    fn params(&self) -> anyhow::Result<GeneticAlgorithmParams> {
        for (name, rate) in [
            ("--crossover-rate", self.crossover_rate),
            ("--mutation-rate", self.mutation_rate),
        ] {
            anyhow::ensure!(
                (0.0..=1.0).contains(&rate),
                "{name} must be in [0, 1], got {rate}"
            );
        }
        anyhow::ensure!(self.population > 0, "--population must be positive");
        anyhow::ensure!(self.tournament_size > 0, "--tournament-size must be positive");
        anyhow::ensure!(
            self.mutation_sigma.is_finite() && self.mutation_sigma >= 0.0,
            "--mutation-sigma must be a non-negative number, got {}",
            self.mutation_sigma
        );
        anyhow::ensure!(
            self.gene_min <= self.gene_max,
            "--gene-min ({}) exceeds --gene-max ({})",
            self.gene_min,
            self.gene_max
        );

        Ok(GeneticAlgorithmParams {
            population_size: self.population,
            max_generations: self.generations,
            crossover_rate: self.crossover_rate,
            mutation_rate: self.mutation_rate,
            selection: match self.selection {
                SelectionKind::Roulette => Selection::RouletteWheel,
                SelectionKind::Tournament => Selection::Tournament {
                    size: self.tournament_size,
                },
            },
            crossover: match self.crossover {
                CrossoverArg::Single => CrossoverKind::SinglePoint,
                CrossoverArg::Two => CrossoverKind::TwoPoint,
                CrossoverArg::Uniform => CrossoverKind::Uniform,
            },
            mutation: match self.mutation {
                MutationArg::Range => MutationKind::IntegerRange,
                MutationArg::Gaussian => MutationKind::IntegerGaussian {
                    sigma: self.mutation_sigma,
                },
            },
            elite_count: self.elite,
            target_fitness: self.target_fitness,
            gene_min: self.gene_min,
            gene_max: self.gene_max,
            evaluation: if self.parallel {
                EvaluationMode::Parallel
            } else {
                EvaluationMode::Sequential
            },
        })
    }
}

pub(crate) fn run(arg: &TrainArg) -> anyhow::Result<()> {
    let params = arg.params()?;
    let profile = arg.profile.profile();
    let rules = arg.tournament.rules()?;
    let roster = arg.tournament.roster()?;
    let seed = arg.seed.unwrap_or_else(|| rand::rng().random());

    tracing::info!(
        %profile,
        genes = profile.arity(),
        opponents = roster.len(),
        %seed,
        population = params.population_size,
        generations = params.max_generations,
        "starting training"
    );

    let evaluator = RankFitnessEvaluator::new(rules, roster, profile);
    let search = GeneticSearch::new(&params, evaluator.chromosome_len());
    let mut rng = seed.rng();

    let outcome = match &arg.stats_output {
        Some(path) => {
            let mut writer = StatsWriter::create(path.clone())?;
            let outcome = search.run(&evaluator, &mut rng, &mut writer)?;
            writer.finish()?;
            outcome
        }
        None => search.run(&evaluator, &mut rng, &mut |_: &GenerationStats| {})?,
    };

    eprintln!("{} training completed.", arg.profile.model_name());

    let model = TrainedModel {
        name: arg.profile.model_name().to_owned(),
        trained_at: Utc::now(),
        profile,
        final_fitness: outcome.best_fitness(),
        generations: outcome.generations,
        seed,
        chromosome: outcome.best.chromosome().clone(),
    };
    Output::save_json(&model, arg.output.clone())?;

    eprintln!();
    eprintln!("Model saved successfully");
    if let Some(path) = &arg.output {
        eprintln!("  Path: {}", path.display());
    }
    eprintln!("  Name: {}", model.name);
    eprintln!("  Trained at: {}", model.trained_at);
    eprintln!("  Profile: {}", model.profile);
    eprintln!("  Generations: {}", model.generations);
    eprintln!("  Final fitness: {}", model.final_fitness);
    eprintln!("  Chromosome: {}", model.chromosome);

    Ok(())
}
