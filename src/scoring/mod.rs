pub mod config;
pub mod engine;
pub mod policy;
pub mod validation;

pub use config::*;
pub use engine::{
    calculate_score, score, FactorContribution, PickMatches, ScoreBreakdown, ScoreResult,
    MAX_RAW_SCORE,
};
pub use policy::{MissingBetPolicy, RaceScore};
pub use validation::validate_scoring;
