use std::path::PathBuf;

use clap::{Parser, Subcommand};
use staghunt_engine::{GameRules, bots::Roster};
use staghunt_evaluator::decision::DecisionProfile;

use self::{play::PlayArg, roster::RosterArg, train::TrainArg};
use crate::util;

mod play;
mod roster;
mod train;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Evolve decision engine weights with the genetic algorithm
    Train(#[clap(flatten)] TrainArg),
    /// Play tournaments with a trained or hand-written chromosome
    Play(#[clap(flatten)] PlayArg),
    /// Print the standard opponent roster as JSON
    Roster(#[clap(flatten)] RosterArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Train(arg) => train::run(&arg)?,
        Mode::Play(arg) => play::run(&arg)?,
        Mode::Roster(arg) => roster::run(&arg)?,
    }
    Ok(())
}

/// Heuristic set and threshold policy pairing.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr)]
pub(crate) enum ProfileKind {
    /// Five heuristics, hunt above half of the maximum score.
    Five,
    /// Seven heuristics, hunt at a score of 100.
    #[default]
    Seven,
}

impl ProfileKind {
    pub(crate) const fn profile(self) -> DecisionProfile {
        match self {
            Self::Five => DecisionProfile::five_function(),
            Self::Seven => DecisionProfile::seven_function(),
        }
    }

    pub(crate) const fn model_name(self) -> &'static str {
        match self {
            Self::Five => "five-function",
            Self::Seven => "seven-function",
        }
    }
}

/// Opponents and round limits shared by every command playing tournaments.
#[derive(Debug, Clone, clap::Args)]
pub(crate) struct TournamentArg {
    /// JSON file listing the opponent bots (standard roster if omitted)
    #[arg(long)]
    roster: Option<PathBuf>,
    /// Rounds always played unless at most one player survives
    #[arg(long, default_value_t = GameRules::default().min_rounds)]
    min_rounds: u32,
    /// Expected tournament length
    #[arg(long, default_value_t = GameRules::default().average_rounds)]
    average_rounds: u32,
    /// Hard limit on the tournament length
    #[arg(long, default_value_t = GameRules::default().max_rounds)]
    max_rounds: u32,
}

impl TournamentArg {
    pub(crate) fn rules(&self) -> anyhow::Result<GameRules> {
        anyhow::ensure!(
            self.min_rounds <= self.max_rounds,
            "--min-rounds ({}) exceeds --max-rounds ({})",
            self.min_rounds,
            self.max_rounds
        );
        Ok(GameRules {
            min_rounds: self.min_rounds,
            average_rounds: self.average_rounds,
            max_rounds: self.max_rounds,
        })
    }

    pub(crate) fn roster(&self) -> anyhow::Result<Roster> {
        match &self.roster {
            Some(path) => util::read_roster_file(path),
            None => Ok(Roster::standard()),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory as _;

    use super::*;

    #[test]
    fn test_command_definition_is_valid() {
        CommandArgs::command().debug_assert();
    }

    #[test]
    fn test_train_defaults() {
        let args = CommandArgs::try_parse_from(["staghunt", "train"]).unwrap();
        let Mode::Train(arg) = args.mode else {
            panic!("expected train mode");
        };
        assert_eq!(arg.tournament.rules().unwrap(), GameRules::default());
        assert_eq!(arg.profile, ProfileKind::Seven);
    }

    #[test]
    fn test_profile_names_parse() {
        let args =
            CommandArgs::try_parse_from(["staghunt", "train", "--profile", "five"]).unwrap();
        let Mode::Train(arg) = args.mode else {
            panic!("expected train mode");
        };
        assert_eq!(arg.profile.profile(), DecisionProfile::five_function());
        assert!(CommandArgs::try_parse_from(["staghunt", "train", "--profile", "six"]).is_err());
    }

    #[test]
    fn test_play_requires_a_chromosome_source() {
        assert!(CommandArgs::try_parse_from(["staghunt", "play"]).is_err());
        assert!(
            CommandArgs::try_parse_from([
                "staghunt",
                "play",
                "--model",
                "model.json",
                "--chromosome",
                "1,2,3,4,5,6,7"
            ])
            .is_err()
        );
        assert!(
            CommandArgs::try_parse_from(["staghunt", "play", "--chromosome", "1,2,3,4,5,6,7"])
                .is_ok()
        );
    }

    #[test]
    fn test_inverted_round_limits_are_rejected() {
        let args = CommandArgs::try_parse_from([
            "staghunt",
            "play",
            "--chromosome",
            "1,2,3,4,5,6,7",
            "--min-rounds",
            "50",
            "--max-rounds",
            "10",
        ])
        .unwrap();
        let Mode::Play(arg) = args.mode else {
            panic!("expected play mode");
        };
        assert!(arg.tournament.rules().is_err());
    }
}
