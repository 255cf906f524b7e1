//! Fixed-strategy opponents.
//!
//! None of these bots learn; each follows one simple rule for the whole tournament.
//! Bots are described by a serializable [`BotSpec`] and instantiated per tournament with
//! [`BotSpec::build`], so no state can leak from one game into the next.
//!
//! | Bot | Rule |
//! |-----|------|
//! | [`Pushover`] | always hunt |
//! | [`Freeloader`] | always slack |
//! | [`Alternator`] | alternate hunt and slack across decisions |
//! | [`MaxRepHunter`] | hunt only with the most reputable opponents |
//! | [`RandomHunter`] | hunt with a fixed probability |
//! | [`FairHunter`] | hunt with probability equal to the opponent's reputation |
//! | [`BoundedHunter`] | hunt iff the opponent's reputation is within bounds |
//! | [`AverageHunter`] | hunt with probability equal to the mean reputation |

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{BoxedPlayer, GameError, GameSeed};

pub use self::strategies::*;

mod strategies;

/// Description of one opponent bot.
///
/// # Example
///
/// ```
/// use staghunt_engine::bots::BotSpec;
///
/// let spec: BotSpec =
///     serde_json::from_str(r#"{"kind": "bounded_hunter", "lower": 0.4, "upper": 0.6}"#).unwrap();
/// let bot = spec.build(&mut rand::rng());
/// assert_eq!(bot.name(), "BoundedHunter(0.4, 0.6)");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BotSpec {
    Pushover,
    Freeloader,
    Alternator,
    MaxRepHunter,
    Random { probability: f64 },
    FairHunter,
    BoundedHunter { lower: f64, upper: f64 },
    AverageHunter,
}

impl BotSpec {
    /// Why this description cannot be built, if it cannot.
    #[must_use]
    pub fn problem(&self) -> Option<&'static str> {
        match *self {
            Self::Random { probability } if !(0.0..=1.0).contains(&probability) => {
                Some("hunt probability must be in [0, 1]")
            }
            Self::BoundedHunter { lower, upper } if lower.is_nan() || upper.is_nan() => {
                Some("reputation bounds must be numbers")
            }
            Self::BoundedHunter { lower, upper } if lower > upper => {
                Some("lower reputation bound exceeds the upper one")
            }
            _ => None,
        }
    }

    /// Creates a fresh bot. Randomized bots get their own generator seeded from `rng`.
    ///
    /// # Panics
    ///
    /// Panics if [`BotSpec::problem`] reports a problem.
    pub fn build<R>(&self, rng: &mut R) -> BoxedPlayer
    where
        R: Rng + ?Sized,
    {
        match *self {
            Self::Pushover => Box::new(Pushover),
            Self::Freeloader => Box::new(Freeloader),
            Self::Alternator => Box::new(Alternator::new()),
            Self::MaxRepHunter => Box::new(MaxRepHunter),
            Self::Random { probability } => {
                Box::new(RandomHunter::new(probability, rng.random::<GameSeed>().rng()))
            }
            Self::FairHunter => Box::new(FairHunter::new(rng.random::<GameSeed>().rng())),
            Self::BoundedHunter { lower, upper } => Box::new(BoundedHunter::new(lower, upper)),
            Self::AverageHunter => Box::new(AverageHunter::new(rng.random::<GameSeed>().rng())),
        }
    }
}

/// An ordered list of opponent bots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roster(Vec<BotSpec>);

impl Roster {
    #[must_use]
    pub fn new(bots: Vec<BotSpec>) -> Self {
        Self(bots)
    }

    /// The ten opponents the decision engine has historically been trained against.
    #[must_use]
    pub fn standard() -> Self {
        Self(vec![
            BotSpec::Pushover,
            BotSpec::Freeloader,
            BotSpec::Alternator,
            BotSpec::MaxRepHunter,
            BotSpec::Random { probability: 0.2 },
            BotSpec::Random { probability: 0.8 },
            BotSpec::FairHunter,
            BotSpec::BoundedHunter {
                lower: 0.4,
                upper: 0.6,
            },
            BotSpec::BoundedHunter {
                lower: 0.6,
                upper: 1.0,
            },
            BotSpec::AverageHunter,
        ])
    }

    /// Checks that every bot of the roster can be built.
    pub fn validate(&self) -> Result<(), GameError> {
        for (index, spec) in self.0.iter().enumerate() {
            if let Some(reason) = spec.problem() {
                return Err(GameError::InvalidBot {
                    index,
                    bot: format!("{spec:?}"),
                    reason,
                });
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn bots(&self) -> &[BotSpec] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Freshly constructs every bot of the roster, in order.
    pub fn build<R>(&self, rng: &mut R) -> Vec<BoxedPlayer>
    where
        R: Rng + ?Sized,
    {
        self.0.iter().map(|spec| spec.build(rng)).collect()
    }
}

impl Default for Roster {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_standard_roster_names_are_unique() {
        let players = Roster::standard().build(&mut rand::rng());
        let names = players.iter().map(|p| p.name()).collect::<HashSet<_>>();
        assert_eq!(players.len(), 10);
        assert_eq!(names.len(), 10);
        assert!(names.contains("Random(0.2)"));
        assert!(names.contains("BoundedHunter(0.6, 1)"));
    }

    #[test]
    fn test_roster_json_roundtrip_shape() {
        let json = serde_json::to_string(&Roster::new(vec![
            BotSpec::Pushover,
            BotSpec::Random { probability: 0.5 },
        ]))
        .unwrap();
        assert_eq!(
            json,
            r#"[{"kind":"pushover"},{"kind":"random","probability":0.5}]"#
        );
        let roster: Roster = serde_json::from_str(&json).unwrap();
        assert_eq!(roster.len(), 2);
    }

    #[test]
    fn test_standard_roster_is_valid() {
        Roster::standard().validate().unwrap();
    }

    #[test]
    fn test_validate_rejects_unbuildable_bots() {
        for bad in [
            BotSpec::Random { probability: 1.5 },
            BotSpec::Random { probability: -0.1 },
            BotSpec::Random {
                probability: f64::NAN,
            },
            BotSpec::BoundedHunter {
                lower: 0.7,
                upper: 0.3,
            },
            BotSpec::BoundedHunter {
                lower: f64::NAN,
                upper: 0.3,
            },
        ] {
            let roster = Roster::new(vec![BotSpec::Pushover, bad]);
            let err = roster.validate().unwrap_err();
            assert!(matches!(err, GameError::InvalidBot { index: 1, .. }), "{err}");
        }
    }
}
