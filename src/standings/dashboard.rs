use super::StandingsError;
use crate::scoring::{MissingBetPolicy, RaceScore};
use crate::season::{Bet, Profile, Race, SeasonData};

#[derive(Debug, Clone)]
pub struct DashboardRow<'a> {
    pub profile: &'a Profile,
    pub bet: Option<&'a Bet>,
    pub score: RaceScore,
}

/// Every profile's standing on a single race, highest points first.
///
/// Admins are listed too, and take the missing-bet penalty like anyone else.
pub fn race_dashboard<'a>(
    season: &'a SeasonData,
    race_id: u32,
    policy: &MissingBetPolicy,
) -> Result<(&'a Race, Vec<DashboardRow<'a>>), StandingsError> {
    let race = season
        .race(race_id)
        .ok_or(StandingsError::UnknownRace(race_id))?;
    let result = season.result_for(race_id);

    let mut rows: Vec<DashboardRow<'a>> = season
        .profiles
        .iter()
        .map(|profile| {
            let bet = season.bet_for(&profile.id, race_id);
            DashboardRow {
                profile,
                bet,
                score: policy.resolve(race, bet, result),
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        b.score
            .points()
            .cmp(&a.score.points())
            .then_with(|| a.profile.display_name().cmp(b.profile.display_name()))
    });

    Ok((race, rows))
}
