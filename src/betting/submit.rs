use chrono::{DateTime, Utc};

use super::error::BetError;
use super::validation::validate_picks;
use crate::schedule::StatusCalculator;
use crate::season::{Bet, DriverId, Picks, RaceResult, RaceStatus, SeasonData, Upsert};

/// A bet as entered by a user, before it is checked against the season.
#[derive(Debug, Clone)]
pub struct BetSubmission {
    pub user_id: String,
    pub race_id: u32,
    pub picks: Picks,
    pub double_points: bool,
}

/// Race on which `user_id` already played double points, ignoring `excluding_race`.
pub fn has_used_double_points(
    season: &SeasonData,
    user_id: &str,
    excluding_race: Option<u32>,
) -> Option<u32> {
    season
        .bets
        .iter()
        .filter(|b| b.user_id == user_id && b.double_points)
        .map(|b| b.race_id)
        .find(|race_id| Some(*race_id) != excluding_race)
}

/// Create or replace a user's bet on an open race.
pub fn submit_bet(
    season: &mut SeasonData,
    calculator: &StatusCalculator,
    now: DateTime<Utc>,
    submission: BetSubmission,
    special: Option<&DriverId>,
) -> Result<Upsert, BetError> {
    if season.profile(&submission.user_id).is_none() {
        return Err(BetError::UnknownUser(submission.user_id));
    }
    let race = season
        .race(submission.race_id)
        .ok_or(BetError::UnknownRace(submission.race_id))?;

    let status = calculator.race_status(race, now)?;
    if status != RaceStatus::Open {
        return Err(BetError::NotOpen {
            race_id: race.id,
            status,
        });
    }

    check_known_drivers(season, &submission.picks)?;

    let special_driver = special.and_then(|id| season.driver(id));
    let variable_driver = race
        .variable_driver_id
        .as_ref()
        .and_then(|id| season.driver(id));
    validate_picks(&submission.picks, special_driver, variable_driver)
        .map_err(BetError::InvalidPicks)?;

    if submission.double_points {
        if let Some(used_on) =
            has_used_double_points(season, &submission.user_id, Some(submission.race_id))
        {
            return Err(BetError::DoublePointsUsed(used_on));
        }
    }

    tracing::debug!(
        user = %submission.user_id,
        race = submission.race_id,
        double_points = submission.double_points,
        "Accepted bet"
    );

    Ok(season.upsert_bet(Bet {
        user_id: submission.user_id,
        race_id: submission.race_id,
        picks: submission.picks,
        double_points: submission.double_points,
        updated_at: Some(now),
    }))
}

/// Record the official result of a race and mark it finished.
pub fn submit_result(season: &mut SeasonData, result: RaceResult) -> Result<Upsert, BetError> {
    check_known_drivers(season, &result.picks)?;
    let race = season
        .race_mut(result.race_id)
        .ok_or(BetError::UnknownRace(result.race_id))?;
    race.status = RaceStatus::Finished;

    tracing::debug!(race = result.race_id, "Recorded result");
    Ok(season.upsert_result(result))
}

fn check_known_drivers(season: &SeasonData, picks: &Picks) -> Result<(), BetError> {
    let picked = std::iter::once(picks.pole.as_ref()).chain(picks.finishers());
    for id in picked.flatten() {
        if season.driver(id).is_none() {
            return Err(BetError::UnknownDriver(id.clone()));
        }
    }
    Ok(())
}
