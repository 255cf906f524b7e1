use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use staghunt_engine::GameSeed;
use staghunt_evaluator::{chromosome::Chromosome, decision::DecisionProfile, fitness::Fitness};

/// Result of a training run, as written by `staghunt train`.
///
/// The chromosome is only meaningful together with its profile.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TrainedModel {
    pub name: String,
    pub trained_at: DateTime<Utc>,
    pub profile: DecisionProfile,
    pub final_fitness: Fitness,
    pub generations: usize,
    /// Seed the search was started from.
    pub seed: GameSeed,
    pub chromosome: Chromosome,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_json_layout() {
        let model = TrainedModel {
            name: "seven-function".to_owned(),
            trained_at: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
            profile: DecisionProfile::seven_function(),
            final_fitness: 1,
            generations: 500,
            seed: GameSeed::from_bytes([0xab; 16]),
            chromosome: Chromosome::new(vec![15, 15, 13, 15, 15, 14, 15]),
        };
        let value = serde_json::to_value(&model).unwrap();
        assert_eq!(value["profile"]["heuristic_set"], "seven_function");
        assert_eq!(value["profile"]["threshold"], "at_least_hundred");
        assert_eq!(value["chromosome"], serde_json::json!([15, 15, 13, 15, 15, 14, 15]));
        assert_eq!(value["seed"], "ab".repeat(16));

        let back: TrainedModel = serde_json::from_value(value).unwrap();
        assert_eq!(back, model);
    }
}
