use std::{cmp::Reverse, collections::HashSet, fmt};

use rand::{Rng as _, seq::SliceRandom as _};
use rand_pcg::Pcg32;

use crate::{Action, BoxedPlayer, GameError, GameSeed, HuntRound, RoundEnd, payoff};

/// Starting food per opponent in the roster.
const INITIAL_FOOD_PER_OPPONENT: i64 = 300;
/// Bonus food per alive opponent when the hunts of a round reach `m`.
const AWARD_PER_OPPONENT: i64 = 2;

/// Round limits of a tournament.
///
/// A game always ends once at most one player is alive or `max_rounds` rounds have
/// been played. After `min_rounds`, it also ends after each round with probability
/// `1 / (average_rounds - min_rounds)`, so the expected length is about
/// `average_rounds` when nobody starves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameRules {
    pub min_rounds: u32,
    pub average_rounds: u32,
    pub max_rounds: u32,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            min_rounds: 300,
            average_rounds: 1000,
            max_rounds: 10_000,
        }
    }
}

impl GameRules {
    /// Rules for a game of exactly `rounds` rounds (unless players starve earlier).
    #[must_use]
    pub const fn fixed_length(rounds: u32) -> Self {
        Self {
            min_rounds: rounds,
            average_rounds: rounds,
            max_rounds: rounds,
        }
    }

    fn early_end_probability(&self) -> Option<f64> {
        let span = self.average_rounds.checked_sub(self.min_rounds)?;
        (span > 0).then(|| 1.0 / f64::from(span))
    }
}

/// Final ordering of a tournament, best player first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ranking(Vec<String>);

impl Ranking {
    #[must_use]
    pub fn new(names: Vec<String>) -> Self {
        Self(names)
    }

    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.0
    }

    /// 0-based position of `name`, if it is ranked.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.0.iter().position(|n| n == name)
    }
}

impl fmt::Display for Ranking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, name) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}. {name}", i + 1)?;
        }
        Ok(())
    }
}

/// Runs complete tournaments.
///
/// This is the seam between the fitness evaluation and the tournament simulation:
/// it receives the full roster (candidate included) and returns the ranking only.
pub trait TournamentRunner: fmt::Debug + Send + Sync {
    fn play_game(&self, players: Vec<BoxedPlayer>, seed: GameSeed) -> Result<Ranking, GameError>;
}

impl TournamentRunner for GameRules {
    fn play_game(&self, players: Vec<BoxedPlayer>, seed: GameSeed) -> Result<Ranking, GameError> {
        Ok(Game::new(players, *self, seed)?.play_game())
    }
}

/// Public standing of one player.
#[derive(Debug, Clone, PartialEq)]
pub struct Standing<'a> {
    pub name: &'a str,
    pub food: i64,
    pub reputation: f64,
    /// Round in which the player ran out of food.
    pub eliminated_in: Option<u32>,
}

/// Summary of one played round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundSummary {
    pub round_number: u32,
    pub alive_players: usize,
    pub result: RoundEnd,
}

#[derive(Debug)]
struct Seat {
    player: BoxedPlayer,
    food: i64,
    hunts: u64,
    decisions: u64,
    eliminated_in: Option<u32>,
}

impl Seat {
    #[expect(clippy::cast_precision_loss)]
    fn reputation(&self) -> f64 {
        if self.decisions == 0 {
            0.0
        } else {
            self.hunts as f64 / self.decisions as f64
        }
    }

    fn is_alive(&self) -> bool {
        self.eliminated_in.is_none()
    }
}

/// One tournament among a fixed roster.
///
/// # Example
///
/// ```
/// use staghunt_engine::{Game, GameRules, GameSeed, bots::BotSpec};
///
/// let mut rng = GameSeed::from_bytes([7; 16]).rng();
/// let players = [BotSpec::Pushover, BotSpec::Alternator, BotSpec::Freeloader]
///     .iter()
///     .map(|spec| spec.build(&mut rng))
///     .collect();
/// let mut game = Game::new(players, GameRules::fixed_length(10), GameSeed::from_bytes([1; 16])).unwrap();
/// while !game.is_over() {
///     game.play_round();
/// }
/// assert_eq!(game.round(), 10);
/// assert_eq!(game.ranking().names().len(), 3);
/// ```
#[derive(Debug)]
pub struct Game {
    rules: GameRules,
    seats: Vec<Seat>,
    rng: Pcg32,
    round: u32,
    ended_early: bool,
}

impl Game {
    /// Sets up a tournament.
    ///
    /// Every player starts with `300 × (P − 1)` food, `P` being the roster size.
    pub fn new(
        players: Vec<BoxedPlayer>,
        rules: GameRules,
        seed: GameSeed,
    ) -> Result<Self, GameError> {
        if players.len() < 2 {
            return Err(GameError::TooFewPlayers {
                count: players.len(),
            });
        }
        let mut names = HashSet::new();
        for player in &players {
            if !names.insert(player.name()) {
                return Err(GameError::DuplicatePlayerName {
                    name: player.name().to_owned(),
                });
            }
        }

        let opponents = i64::try_from(players.len() - 1).unwrap_or(i64::MAX);
        let initial_food = INITIAL_FOOD_PER_OPPONENT.saturating_mul(opponents);
        let seats = players
            .into_iter()
            .map(|player| Seat {
                player,
                food: initial_food,
                hunts: 0,
                decisions: 0,
                eliminated_in: None,
            })
            .collect();
        Ok(Self {
            rules,
            seats,
            rng: seed.rng(),
            round: 0,
            ended_early: false,
        })
    }

    /// Number of rounds played so far.
    #[must_use]
    pub fn round(&self) -> u32 {
        self.round
    }

    #[must_use]
    pub fn alive_count(&self) -> usize {
        self.seats.iter().filter(|s| s.is_alive()).count()
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.ended_early || self.alive_count() <= 1 || self.round >= self.rules.max_rounds
    }

    /// Current standings in roster order.
    pub fn standings(&self) -> impl Iterator<Item = Standing<'_>> + '_ {
        self.seats.iter().map(|seat| Standing {
            name: seat.player.name(),
            food: seat.food,
            reputation: seat.reputation(),
            eliminated_in: seat.eliminated_in,
        })
    }

    /// Plays one round.
    ///
    /// # Panics
    ///
    /// Panics if the game is already over, or if a player returns a number of decisions
    /// different from the number of opponents it was shown.
    pub fn play_round(&mut self) -> RoundSummary {
        assert!(!self.is_over(), "round requested after the game ended");

        let mut order = (0..self.seats.len())
            .filter(|&i| self.seats[i].is_alive())
            .collect::<Vec<_>>();
        order.shuffle(&mut self.rng);
        let alive = order.len();
        let reputations = order
            .iter()
            .map(|&i| self.seats[i].reputation())
            .collect::<Vec<_>>();

        let max_m = u32::try_from(alive * (alive - 1)).unwrap_or(u32::MAX);
        let m = if max_m > 1 {
            self.rng.random_range(1..max_m)
        } else {
            1
        };
        let round_number = self.round + 1;

        // decisions[a][j]: choice of the player at position `a` against its j-th opponent,
        // opponents being every other position in order.
        let mut decisions = Vec::with_capacity(alive);
        for (pos, &seat_index) in order.iter().enumerate() {
            let opponents = reputations
                .iter()
                .enumerate()
                .filter(|&(j, _)| j != pos)
                .map(|(_, r)| *r)
                .collect::<Vec<_>>();
            let seat = &mut self.seats[seat_index];
            let round = HuntRound {
                round_number,
                current_food: seat.food,
                current_reputation: reputations[pos],
                m,
                player_reputations: &opponents,
            };
            let choices = seat.player.hunt_choices(&round);
            assert_eq!(
                choices.len(),
                opponents.len(),
                "player {} returned {} decisions for {} opponents",
                seat.player.name(),
                choices.len(),
                opponents.len()
            );
            decisions.push(choices);
        }

        let number_hunters = decisions
            .iter()
            .flatten()
            .filter(|a| a.is_hunt())
            .count();
        let number_hunters = u32::try_from(number_hunters).unwrap_or(u32::MAX);
        let award = if number_hunters >= m {
            AWARD_PER_OPPONENT.saturating_mul(i64::try_from(alive - 1).unwrap_or(i64::MAX))
        } else {
            0
        };
        let result = RoundEnd {
            award,
            m,
            number_hunters,
        };

        for (pos, &seat_index) in order.iter().enumerate() {
            let earnings = (0..alive)
                .filter(|&other| other != pos)
                .enumerate()
                .map(|(j, other)| {
                    let mine = decisions[pos][j];
                    let theirs = decisions[other][opponent_slot(other, pos)];
                    payoff(mine, theirs)
                })
                .collect::<Vec<_>>();

            let seat = &mut self.seats[seat_index];
            seat.food += earnings.iter().sum::<i64>() + award;
            seat.hunts += decisions[pos].iter().filter(|a| a.is_hunt()).count() as u64;
            seat.decisions += decisions[pos].len() as u64;
            seat.player.hunt_outcomes(&earnings);
            seat.player.round_end(&result);
        }

        self.round = round_number;
        for seat in &mut self.seats {
            if seat.is_alive() && seat.food <= 0 {
                tracing::debug!(
                    round = round_number,
                    player = seat.player.name(),
                    "player starved"
                );
                seat.eliminated_in = Some(round_number);
            }
        }

        if round_number >= self.rules.min_rounds
            && let Some(p) = self.rules.early_end_probability()
            && self.rng.random_bool(p)
        {
            self.ended_early = true;
        }

        RoundSummary {
            round_number,
            alive_players: alive,
            result,
        }
    }

    /// Current ranking: alive players by food (descending), then eliminated players by
    /// elimination round (latest first). Ties keep roster order.
    #[must_use]
    pub fn ranking(&self) -> Ranking {
        let mut indices = (0..self.seats.len()).collect::<Vec<_>>();
        indices.sort_by_key(|&i| {
            let seat = &self.seats[i];
            match seat.eliminated_in {
                None => (0, Reverse(seat.food)),
                Some(round) => (1, Reverse(i64::from(round))),
            }
        });
        Ranking::new(
            indices
                .into_iter()
                .map(|i| self.seats[i].player.name().to_owned())
                .collect(),
        )
    }

    /// Plays rounds until the game is over and returns the final ranking.
    #[must_use]
    pub fn play_game(mut self) -> Ranking {
        while !self.is_over() {
            self.play_round();
        }
        let ranking = self.ranking();
        tracing::debug!(
            rounds = self.round,
            survivors = self.alive_count(),
            winner = ranking.names().first().map(String::as_str),
            "tournament finished"
        );
        ranking
    }
}

/// Index of `target` within the opponent list shown to the player at `pos`.
fn opponent_slot(pos: usize, target: usize) -> usize {
    if target < pos { target } else { target - 1 }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::{Player, bots::BotSpec};

    type OutcomeLog = Arc<Mutex<Vec<Vec<i64>>>>;

    #[derive(Debug)]
    struct Recorder {
        name: String,
        action: Action,
        outcomes: OutcomeLog,
    }

    impl Recorder {
        fn boxed(name: &str, action: Action) -> BoxedPlayer {
            Self::with_log(name, action, OutcomeLog::default())
        }

        fn with_log(name: &str, action: Action, outcomes: OutcomeLog) -> BoxedPlayer {
            Box::new(Self {
                name: name.to_owned(),
                action,
                outcomes,
            })
        }
    }

    impl Player for Recorder {
        fn name(&self) -> &str {
            &self.name
        }

        fn hunt_choices(&mut self, round: &HuntRound<'_>) -> Vec<Action> {
            vec![self.action; round.player_reputations.len()]
        }

        fn hunt_outcomes(&mut self, food_earnings: &[i64]) {
            self.outcomes.lock().unwrap().push(food_earnings.to_vec());
        }
    }

    fn seed() -> GameSeed {
        GameSeed::from_bytes([42; 16])
    }

    fn bots(specs: &[BotSpec]) -> Vec<BoxedPlayer> {
        let mut rng = seed().rng();
        specs.iter().map(|s| s.build(&mut rng)).collect()
    }

    #[test]
    fn test_rejects_too_few_players() {
        let err = Game::new(bots(&[BotSpec::Pushover]), GameRules::default(), seed()).unwrap_err();
        assert!(matches!(err, GameError::TooFewPlayers { count: 1 }));
    }

    #[test]
    fn test_rejects_duplicate_names() {
        let err = Game::new(
            bots(&[BotSpec::Pushover, BotSpec::Pushover]),
            GameRules::default(),
            seed(),
        )
        .unwrap_err();
        assert!(matches!(err, GameError::DuplicatePlayerName { .. }));
    }

    #[test]
    fn test_first_round_food_accounting() {
        let players = vec![
            Recorder::boxed("hunter", Action::Hunt),
            Recorder::boxed("slacker", Action::Slack),
        ];
        let mut game = Game::new(players, GameRules::fixed_length(5), seed()).unwrap();
        let summary = game.play_round();

        // two players: m is always 1 and the single hunt reaches it
        assert_eq!(summary.result.m, 1);
        assert_eq!(summary.result.number_hunters, 1);
        assert_eq!(summary.result.award, 2);

        let standings = game.standings().collect::<Vec<_>>();
        assert_eq!(standings[0].food, 300 - 3 + 2);
        assert_eq!(standings[1].food, 300 + 1 + 2);
        assert_eq!(standings[0].reputation, 1.0);
        assert_eq!(standings[1].reputation, 0.0);
    }

    #[test]
    fn test_reputations_exclude_self() {
        let log = OutcomeLog::default();
        let players = vec![
            Recorder::boxed("a", Action::Hunt),
            Recorder::boxed("b", Action::Hunt),
            Recorder::with_log("c", Action::Slack, Arc::clone(&log)),
        ];
        let mut game = Game::new(players, GameRules::fixed_length(3), seed()).unwrap();
        let summary = game.play_round();
        assert_eq!(summary.alive_players, 3);
        assert_eq!(summary.result.number_hunters, 4);
        let standings = game.standings().collect::<Vec<_>>();
        // a: hunt vs hunt (0) + hunt vs slack (-3)
        // c: slack vs hunt (+1) twice
        let award = summary.result.award;
        assert_eq!(standings[0].food, 600 - 3 + award);
        assert_eq!(standings[1].food, 600 - 3 + award);
        assert_eq!(standings[2].food, 600 + 2 + award);
        assert_eq!(*log.lock().unwrap(), [vec![1, 1]]);
    }

    #[test]
    fn test_fixed_length_game_stops_at_limit() {
        let mut game = Game::new(
            bots(&[BotSpec::Pushover, BotSpec::Alternator, BotSpec::Freeloader]),
            GameRules::fixed_length(20),
            seed(),
        )
        .unwrap();
        while !game.is_over() {
            game.play_round();
        }
        assert_eq!(game.round(), 20);
    }

    #[test]
    fn test_starved_player_ranks_last() {
        let ranking = Game::new(
            bots(&[BotSpec::Pushover, BotSpec::Freeloader]),
            GameRules::default(),
            seed(),
        )
        .unwrap()
        .play_game();
        assert_eq!(ranking.names(), ["Freeloader", "Pushover"]);
        assert_eq!(ranking.position("Pushover"), Some(1));
        assert_eq!(ranking.position("nobody"), None);
    }

    #[test]
    fn test_same_seed_same_ranking() {
        let specs = [
            BotSpec::Random { probability: 0.5 },
            BotSpec::FairHunter,
            BotSpec::AverageHunter,
            BotSpec::Alternator,
        ];
        let rules = GameRules::fixed_length(200);
        let a = Game::new(bots(&specs), rules, seed()).unwrap().play_game();
        let b = Game::new(bots(&specs), rules, seed()).unwrap().play_game();
        assert_eq!(a, b);
    }

    #[test]
    fn test_ranking_ties_keep_roster_order() {
        let players = vec![
            Recorder::boxed("first", Action::Slack),
            Recorder::boxed("second", Action::Slack),
        ];
        let ranking = Game::new(players, GameRules::fixed_length(4), seed())
            .unwrap()
            .play_game();
        assert_eq!(ranking.names(), ["first", "second"]);
    }

    #[test]
    fn test_opponent_slot() {
        assert_eq!(opponent_slot(0, 1), 0);
        assert_eq!(opponent_slot(2, 0), 0);
        assert_eq!(opponent_slot(2, 3), 2);
    }

    #[test]
    fn test_ranking_display() {
        let ranking = Ranking::new(vec!["a".to_owned(), "b".to_owned()]);
        assert_eq!(ranking.to_string(), "1. a, 2. b");
    }
}
