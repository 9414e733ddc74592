use crate::schedule::StatusError;
use crate::season::{DriverId, Position, RaceStatus};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BetError {
    #[error("Unknown race: {0}")]
    UnknownRace(u32),

    #[error("Unknown user: {0}")]
    UnknownUser(String),

    #[error("Unknown driver: {0}")]
    UnknownDriver(DriverId),

    #[error("Betting on race {race_id} is {status}, not open")]
    NotOpen { race_id: u32, status: RaceStatus },

    #[error("Double points already used on race {0}")]
    DoublePointsUsed(u32),

    #[error("{driver} is picked at P{picked} in the top 5 but their position is given as {}", stated_or_blank(.stated))]
    PositionMismatch {
        driver: String,
        picked: Position,
        stated: Option<Position>,
    },

    #[error("{driver} is given position {stated} but is not picked at P{stated} in the top 5")]
    PositionNotPicked { driver: String, stated: Position },

    #[error("Driver {0} is picked more than once in the top 5")]
    DuplicateFinisher(DriverId),

    #[error("Invalid picks: {}", join_errors(.0))]
    InvalidPicks(Vec<BetError>),

    #[error(transparent)]
    RaceDate(#[from] StatusError),
}

fn stated_or_blank(stated: &Option<Position>) -> String {
    stated
        .map(|p| p.to_string())
        .unwrap_or_else(|| "blank".to_string())
}

fn join_errors(errors: &[BetError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
