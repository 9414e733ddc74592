use serde::Serialize;

use crate::scoring::MissingBetPolicy;
use crate::season::SeasonData;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    /// Competition rank: tied players share a rank and the next rank is skipped.
    pub rank: usize,
    pub user_id: String,
    pub username: String,
    pub points: i32,
    /// Races where the player's bet was scored against a result.
    pub races_completed: usize,
    /// Race on which the player spent double points, if any.
    pub double_points_race: Option<u32>,
}

/// Season standings for every non-admin player.
///
/// Only races with a result count, and test races never do.
pub fn leaderboard(season: &SeasonData, policy: &MissingBetPolicy) -> Vec<LeaderboardEntry> {
    let scored_races: Vec<_> = season
        .races
        .iter()
        .filter(|race| !race.is_test_race)
        .filter_map(|race| season.result_for(race.id).map(|result| (race, result)))
        .collect();

    let mut entries: Vec<LeaderboardEntry> = season
        .profiles
        .iter()
        .filter(|profile| !profile.is_admin())
        .map(|profile| {
            let mut points = 0;
            let mut races_completed = 0;
            for (race, result) in &scored_races {
                let score = policy.resolve(race, season.bet_for(&profile.id, race.id), Some(result));
                points += score.points();
                if score.is_scored() {
                    races_completed += 1;
                }
            }
            LeaderboardEntry {
                rank: 0,
                user_id: profile.id.clone(),
                username: profile.display_name().to_string(),
                points,
                races_completed,
                double_points_race: crate::betting::has_used_double_points(season, &profile.id, None),
            }
        })
        .collect();

    entries.sort_by(|a, b| {
        b.points
            .cmp(&a.points)
            .then_with(|| a.username.to_lowercase().cmp(&b.username.to_lowercase()))
    });

    for idx in 0..entries.len() {
        entries[idx].rank = if idx > 0 && entries[idx - 1].points == entries[idx].points {
            entries[idx - 1].rank
        } else {
            idx + 1
        };
    }

    tracing::debug!(players = entries.len(), races = scored_races.len(), "Built leaderboard");
    entries
}
