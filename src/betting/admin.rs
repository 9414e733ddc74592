use super::error::BetError;
use crate::season::{DriverId, RaceStatus, SeasonData};

/// Override a race's stored status, returning the previous one.
///
/// Setting `Scheduled` hands the race back to the calendar.
pub fn set_race_status(
    season: &mut SeasonData,
    race_id: u32,
    status: RaceStatus,
) -> Result<RaceStatus, BetError> {
    let race = season.race_mut(race_id).ok_or(BetError::UnknownRace(race_id))?;
    let previous = std::mem::replace(&mut race.status, status);
    tracing::debug!(race = race_id, from = %previous, to = %status, "Race status changed");
    Ok(previous)
}

/// Set or clear the variable driver of a race, returning the previous one.
pub fn set_variable_driver(
    season: &mut SeasonData,
    race_id: u32,
    driver: Option<DriverId>,
) -> Result<Option<DriverId>, BetError> {
    if let Some(id) = &driver {
        if season.driver(id).is_none() {
            return Err(BetError::UnknownDriver(id.clone()));
        }
    }
    let race = season.race_mut(race_id).ok_or(BetError::UnknownRace(race_id))?;
    Ok(std::mem::replace(&mut race.variable_driver_id, driver))
}
