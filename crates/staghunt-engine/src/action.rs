use std::fmt;

use serde::{Deserialize, Serialize};

/// One player's choice against one opponent in a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::IsVariant)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Hunt,
    Slack,
}

impl Action {
    /// Maps a boolean vote to an action (`true` is hunt).
    #[must_use]
    pub const fn from_hunt(hunt: bool) -> Self {
        if hunt { Self::Hunt } else { Self::Slack }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hunt => f.write_str("h"),
            Self::Slack => f.write_str("s"),
        }
    }
}

/// Food gained (or lost) by a player choosing `mine` against a partner choosing `theirs`.
///
/// | mine \ theirs | hunt | slack |
/// |---------------|------|-------|
/// | hunt          |  0   |  -3   |
/// | slack         |  1   |  -2   |
///
/// # Examples
///
/// ```
/// use staghunt_engine::{Action, payoff};
///
/// assert_eq!(payoff(Action::Slack, Action::Hunt), 1);
/// assert_eq!(payoff(Action::Hunt, Action::Slack), -3);
/// ```
#[must_use]
pub const fn payoff(mine: Action, theirs: Action) -> i64 {
    match (mine, theirs) {
        (Action::Hunt, Action::Hunt) => 0,
        (Action::Hunt, Action::Slack) => -3,
        (Action::Slack, Action::Hunt) => 1,
        (Action::Slack, Action::Slack) => -2,
    }
}
