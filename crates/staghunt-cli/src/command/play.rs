use std::path::PathBuf;

use rand::Rng as _;
use staghunt_engine::{Game, GameSeed};
use staghunt_evaluator::{
    chromosome::Chromosome,
    decision::DecisionProfile,
    fitness::{Fitness, RankFitnessEvaluator},
};
use staghunt_stats::descriptive::DescriptiveStats;

use super::{ProfileKind, TournamentArg};
use crate::util;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Trained model file (JSON format)
    #[arg(long, conflicts_with = "chromosome", required_unless_present = "chromosome")]
    model: Option<PathBuf>,
    /// Comma-separated genes, e.g. `15,15,13,15,15,14,15`
    #[arg(long)]
    chromosome: Option<Chromosome>,
    /// Profile of an inline chromosome (five or seven)
    #[arg(long, default_value = "seven", conflicts_with = "model")]
    profile: ProfileKind,
    #[clap(flatten)]
    pub(super) tournament: TournamentArg,
    /// Number of tournaments to play
    #[arg(long, default_value_t = 1)]
    games: usize,
    /// 128-bit hex seed of the first tournament (random if omitted)
    #[arg(long)]
    seed: Option<GameSeed>,
}

impl PlayArg {
    fn candidate(&self) -> anyhow::Result<(DecisionProfile, Chromosome)> {
        if let Some(path) = &self.model {
            let model = util::read_model_file(path)?;
            tracing::info!(name = %model.name, profile = %model.profile, "loaded model");
            return Ok((model.profile, model.chromosome));
        }
        let Some(chromosome) = &self.chromosome else {
            anyhow::bail!("either --model or --chromosome is required");
        };
        Ok((self.profile.profile(), chromosome.clone()))
    }
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let (profile, chromosome) = arg.candidate()?;
    let rules = arg.tournament.rules()?;
    let roster = arg.tournament.roster()?;
    if !chromosome.is_conventional() {
        tracing::warn!(%chromosome, "genes outside [0, 100] are used as they are");
    }

    let evaluator = RankFitnessEvaluator::new(rules, roster, profile);
    let mut seed = arg.seed.unwrap_or_else(|| rand::rng().random());
    let mut fitness_values: Vec<Fitness> = Vec::with_capacity(arg.games);

    for game_index in 0..arg.games {
        let (players, game_seed) = evaluator.lineup(&chromosome, seed)?;
        let mut game = Game::new(players, rules, game_seed)?;
        while !game.is_over() {
            game.play_round();
        }

        let ranking = game.ranking();
        let fitness = evaluator.fitness_of(&ranking)?;
        fitness_values.push(fitness);

        eprintln!(
            "Game #{} (seed {seed}, {} rounds): fitness {fitness}",
            game_index + 1,
            game.round()
        );
        let standings = game.standings().collect::<Vec<_>>();
        for (rank, name) in ranking.names().iter().enumerate() {
            let Some(standing) = standings.iter().find(|s| s.name == name.as_str()) else {
                continue;
            };
            let status = match standing.eliminated_in {
                Some(round) => format!("starved in round {round}"),
                None => format!("{} food", standing.food),
            };
            eprintln!(
                "  {:2}. {:<24} {status:<24} reputation {:.3}",
                rank + 1,
                standing.name,
                standing.reputation
            );
        }

        seed = seed.rng().random();
    }

    let wins = fitness_values.iter().filter(|&&f| f == 0).count();
    if let Some(stats) = DescriptiveStats::new(fitness_values.iter().copied().map(f64::from)) {
        eprintln!();
        eprintln!("Summary over {} games:", fitness_values.len());
        eprintln!("  Profile: {profile}");
        eprintln!("  Chromosome: {chromosome}");
        eprintln!("  Wins: {wins}");
        eprintln!(
            "  Fitness min/median/max: {} / {} / {}",
            stats.min, stats.median, stats.max
        );
        eprintln!("  Fitness mean: {:.3}", stats.mean);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser as _;

    use super::*;
    use crate::command::{CommandArgs, Mode};

    fn play_arg(args: &[&str]) -> PlayArg {
        let args = CommandArgs::try_parse_from(
            ["staghunt", "play"].into_iter().chain(args.iter().copied()),
        )
        .unwrap();
        let Mode::Play(arg) = args.mode else {
            panic!("expected play mode");
        };
        arg
    }

    #[test]
    fn test_inline_chromosome_uses_profile_option() {
        let arg = play_arg(&["--chromosome", "1,2,3,4,5", "--profile", "five"]);
        let (profile, chromosome) = arg.candidate().unwrap();
        assert_eq!(profile, DecisionProfile::five_function());
        assert_eq!(chromosome.genes(), [1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_profile_conflicts_with_model() {
        let result = CommandArgs::try_parse_from([
            "staghunt",
            "play",
            "--model",
            "model.json",
            "--profile",
            "five",
        ]);
        assert!(result.is_err());
        let arg = play_arg(&["--model", "model.json"]);
        assert_eq!(arg.model, Some(PathBuf::from("model.json")));
    }

    #[test]
    fn test_short_seeded_games_run() {
        let arg = play_arg(&[
            "--chromosome",
            "[15, 15, 13, 15, 15, 14, 15]",
            "--games",
            "2",
            "--min-rounds",
            "5",
            "--average-rounds",
            "5",
            "--max-rounds",
            "5",
            "--seed",
            "0123456789abcdef0123456789abcdef",
        ]);
        run(&arg).unwrap();
    }

    #[test]
    fn test_profile_mismatch_is_reported() {
        let arg = play_arg(&["--chromosome", "1,2,3", "--min-rounds", "5", "--max-rounds", "5"]);
        let err = run(&arg).unwrap_err();
        assert!(err.to_string().contains("chromosome has 3 genes"));
    }
}
