//! Agent memory carried across rounds.

use serde::{Deserialize, Serialize};
use staghunt_engine::Action;

/// Cumulative food earned while taking each action, over all past rounds.
///
/// Starts at zero, grows after every round through [`PastPerformance::record_all`], and is
/// never reset during a tournament.
///
/// # Example
///
/// ```
/// use staghunt_engine::Action;
/// use staghunt_evaluator::past_performance::PastPerformance;
///
/// let mut past = PastPerformance::new();
/// past.record_all(&[Action::Hunt, Action::Slack], &[3, -2]);
/// assert_eq!(past.get(Action::Hunt), 3);
/// assert_eq!(past.get(Action::Slack), -2);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PastPerformance {
    hunt: i64,
    slack: i64,
}

impl PastPerformance {
    #[must_use]
    pub const fn new() -> Self {
        Self { hunt: 0, slack: 0 }
    }

    #[must_use]
    pub const fn get(&self, action: Action) -> i64 {
        match action {
            Action::Hunt => self.hunt,
            Action::Slack => self.slack,
        }
    }

    pub const fn record(&mut self, action: Action, food: i64) {
        match action {
            Action::Hunt => self.hunt += food,
            Action::Slack => self.slack += food,
        }
    }

    /// Adds `food_earnings[i]` to the total of `decisions[i]`.
    ///
    /// # Panics
    ///
    /// Panics if the two slices differ in length.
    pub fn record_all(&mut self, decisions: &[Action], food_earnings: &[i64]) {
        assert_eq!(
            decisions.len(),
            food_earnings.len(),
            "received {} outcomes for {} decisions",
            food_earnings.len(),
            decisions.len()
        );
        for (&action, &food) in decisions.iter().zip(food_earnings) {
            self.record(action, food);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulates_across_reports() {
        let mut past = PastPerformance::new();
        past.record_all(&[Action::Hunt, Action::Slack], &[3, -2]);
        assert_eq!(past.get(Action::Hunt), 3);
        assert_eq!(past.get(Action::Slack), -2);

        past.record_all(&[Action::Hunt, Action::Hunt], &[1, 1]);
        assert_eq!(past.get(Action::Hunt), 5);
        assert_eq!(past.get(Action::Slack), -2);
    }

    #[test]
    fn test_second_report_adds_to_first() {
        let mut past = PastPerformance::new();
        past.record_all(&[Action::Hunt, Action::Slack], &[3, -2]);
        past.record_all(&[Action::Hunt, Action::Slack], &[1, 1]);
        assert_eq!(past.get(Action::Hunt), 4);
        assert_eq!(past.get(Action::Slack), -1);
    }

    #[test]
    #[should_panic(expected = "received 1 outcomes for 2 decisions")]
    fn test_mismatched_outcomes_panic() {
        PastPerformance::new().record_all(&[Action::Hunt, Action::Slack], &[1]);
    }
}
