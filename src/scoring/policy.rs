use super::engine::{calculate_score, ScoreResult};
use crate::season::{Bet, Race, RaceResult};

pub const DEFAULT_MISSING_BET_PENALTY: i32 = -1;

/// What a player earns for one race once the caller has looked up the bet and result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RaceScore {
    /// Bet and result both exist.
    Scored(ScoreResult),
    /// Bet placed, result not entered yet.
    Pending,
    /// Result entered, no bet placed.
    Penalty(i32),
    /// No bet, and nothing to hold against the player.
    Absent,
}

impl RaceScore {
    pub fn points(&self) -> i32 {
        match self {
            RaceScore::Scored(result) => result.score,
            RaceScore::Penalty(points) => *points,
            RaceScore::Pending | RaceScore::Absent => 0,
        }
    }

    pub fn is_scored(&self) -> bool {
        matches!(self, RaceScore::Scored(_))
    }

    pub fn score_result(&self) -> Option<&ScoreResult> {
        match self {
            RaceScore::Scored(result) => Some(result),
            _ => None,
        }
    }
}

/// How a player is charged for skipping a race that has been scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissingBetPolicy {
    /// Points charged for a missing bet. Zero or negative.
    pub penalty: i32,
    /// Test races never charge a penalty.
    pub exempt_test_races: bool,
}

impl Default for MissingBetPolicy {
    fn default() -> Self {
        Self {
            penalty: DEFAULT_MISSING_BET_PENALTY,
            exempt_test_races: true,
        }
    }
}

impl MissingBetPolicy {
    /// A policy that never charges anything.
    pub fn lenient() -> Self {
        Self {
            penalty: 0,
            exempt_test_races: true,
        }
    }

    pub fn resolve(&self, race: &Race, bet: Option<&Bet>, result: Option<&RaceResult>) -> RaceScore {
        match (bet, result) {
            (Some(bet), Some(result)) => RaceScore::Scored(calculate_score(bet, result)),
            (Some(_), None) => RaceScore::Pending,
            (None, Some(_)) if race.is_test_race && self.exempt_test_races => RaceScore::Absent,
            (None, Some(_)) if self.penalty != 0 => RaceScore::Penalty(self.penalty),
            (None, _) => RaceScore::Absent,
        }
    }
}
