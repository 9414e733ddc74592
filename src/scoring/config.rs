use serde::{Deserialize, Serialize};

use super::policy::{MissingBetPolicy, DEFAULT_MISSING_BET_PENALTY};

/// Scoring policy configuration.
///
/// The per-race scoring rules are fixed; only the treatment of missing bets
/// is configurable.
///
/// Example YAML:
/// ```yaml
/// scoring:
///   missing_bet_penalty: -1
///   exempt_test_races: true
///   penalize_on_leaderboard: false
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScoringConfig {
    /// Points charged when a scored race has no bet (default: -1)
    #[serde(default)]
    pub missing_bet_penalty: Option<i32>,

    /// Skip the penalty for test races (default: true)
    #[serde(default)]
    pub exempt_test_races: Option<bool>,

    /// Apply the penalty when summing the leaderboard (default: false).
    /// Dashboards and exports always apply it.
    #[serde(default)]
    pub penalize_on_leaderboard: Option<bool>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            missing_bet_penalty: Some(DEFAULT_MISSING_BET_PENALTY),
            exempt_test_races: Some(true),
            penalize_on_leaderboard: Some(false),
        }
    }
}

impl ScoringConfig {
    /// Policy used by per-race views and exports.
    pub fn missing_bet_policy(&self) -> MissingBetPolicy {
        MissingBetPolicy {
            penalty: self
                .missing_bet_penalty
                .unwrap_or(DEFAULT_MISSING_BET_PENALTY),
            exempt_test_races: self.exempt_test_races.unwrap_or(true),
        }
    }

    /// Policy used when summing the leaderboard.
    pub fn leaderboard_policy(&self) -> MissingBetPolicy {
        if self.penalize_on_leaderboard.unwrap_or(false) {
            self.missing_bet_policy()
        } else {
            MissingBetPolicy::lenient()
        }
    }
}
