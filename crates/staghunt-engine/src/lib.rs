//! Tournament engine for the repeated multiplayer stag hunt.
//!
//! This crate simulates complete tournaments among a fixed roster of players and
//! reports the final ranking. It is the collaborator the decision engine and the
//! training loop are evaluated against:
//!
//! - [`Action`] and [`payoff`] - the two choices and the pairwise payoff table
//! - [`Player`] - the decision, outcome, and round-end interface every agent implements
//! - [`Game`] - one tournament, played round by round until it ends
//! - [`GameRules`] - round limits; also the default [`TournamentRunner`]
//! - [`GameSeed`] - 128-bit seed making a tournament reproducible
//! - [`bots`] - fixed, non-learning opponent strategies and the standard roster
//!
//! # Round Flow
//!
//! 1. Alive players are shuffled and a market quantity `m` is drawn
//! 2. Every player decides hunt or slack against every other alive player
//! 3. Pairwise payoffs are applied; if the hunts reach `m`, everyone receives a bonus
//! 4. Players are told their earnings and the round result
//! 5. Players out of food are eliminated
//!
//! # Example
//!
//! ```
//! use staghunt_engine::{Game, GameRules, GameSeed, bots::BotSpec};
//! use rand::Rng as _;
//!
//! let mut rng = rand::rng();
//! let players = [BotSpec::Pushover, BotSpec::Freeloader]
//!     .iter()
//!     .map(|spec| spec.build(&mut rng))
//!     .collect();
//! let seed: GameSeed = rng.random();
//! let game = Game::new(players, GameRules::default(), seed).unwrap();
//! let ranking = game.play_game();
//! assert_eq!(ranking.names()[0], "Freeloader");
//! ```

pub use self::{action::*, game::*, player::*, seed::*};

pub mod bots;

mod action;
mod game;
mod player;
mod seed;

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum GameError {
    #[display("a game needs at least two players, got {count}")]
    TooFewPlayers { count: usize },
    #[display("duplicate player name in roster: {name}")]
    DuplicatePlayerName { name: String },
    #[display("invalid bot #{index} ({bot}): {reason}")]
    InvalidBot {
        index: usize,
        bot: String,
        reason: &'static str,
    },
}
