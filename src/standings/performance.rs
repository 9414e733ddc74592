use super::StandingsError;
use crate::schedule::StatusCalculator;
use crate::scoring::{MissingBetPolicy, RaceScore};
use crate::season::{Bet, Race, SeasonData};

/// One player's outcome on one finished race.
#[derive(Debug, Clone)]
pub struct RacePerformance<'a> {
    pub race: &'a Race,
    pub bet: Option<&'a Bet>,
    pub score: RaceScore,
    /// All five finishers called correctly.
    pub top5_bonus: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PerformanceSummary {
    pub total_points: i32,
    pub races_scored: usize,
    pub top5_bonuses: usize,
    pub best_race: Option<(u32, i32)>,
}

/// Race-by-race history for one player over every race with a result,
/// most recent race first. Races with an unreadable date come last.
pub fn performance<'a>(
    season: &'a SeasonData,
    calculator: &StatusCalculator,
    user_id: &str,
    policy: &MissingBetPolicy,
) -> Result<Vec<RacePerformance<'a>>, StandingsError> {
    if season.profile(user_id).is_none() {
        return Err(StandingsError::UnknownUser(user_id.to_string()));
    }

    Ok(calculator
        .races_newest_first(&season.races)
        .into_iter()
        .filter_map(|race| {
            let result = season.result_for(race.id)?;
            let bet = season.bet_for(user_id, race.id);
            let score = policy.resolve(race, bet, Some(result));
            let top5_bonus = score
                .score_result()
                .is_some_and(|r| r.matches.full_top5());
            Some(RacePerformance {
                race,
                bet,
                score,
                top5_bonus,
            })
        })
        .collect())
}

/// Totals over a performance history. Test races are left out, as on the leaderboard.
pub fn summarize(rows: &[RacePerformance<'_>]) -> PerformanceSummary {
    let mut summary = PerformanceSummary::default();
    for row in rows.iter().filter(|row| !row.race.is_test_race) {
        let points = row.score.points();
        summary.total_points += points;
        if row.score.is_scored() {
            summary.races_scored += 1;
            if summary.best_race.map_or(true, |(_, best)| points > best) {
                summary.best_race = Some((row.race.id, points));
            }
        }
        if row.top5_bonus {
            summary.top5_bonuses += 1;
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::betting::submit::tests::{picks, season};
    use crate::season::{RaceResult, RaceStatus};

    fn calc() -> StatusCalculator {
        StatusCalculator::default()
    }

    fn played_season() -> SeasonData {
        let mut s = season();
        s.races[0].status = RaceStatus::Finished;
        for race_id in [1, 2, 3] {
            s.results.push(RaceResult {
                race_id,
                picks: picks([1, 2, 3, 4, 5]),
                recorded_at: None,
            });
        }
        s.bets.push(Bet {
            user_id: "ana".to_string(),
            race_id: 1,
            picks: picks([1, 2, 3, 4, 5]),
            double_points: false,
            updated_at: None,
        });
        s.bets.push(Bet {
            user_id: "ana".to_string(),
            race_id: 3,
            picks: picks([1, 2, 3, 9, 9]),
            double_points: false,
            updated_at: None,
        });
        s
    }

    #[test]
    fn test_rows_are_newest_first() {
        let s = played_season();
        let rows = performance(&s, &calc(), "ana", &MissingBetPolicy::lenient()).unwrap();
        let ids: Vec<u32> = rows.iter().map(|r| r.race.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_rows_follow_instants_across_date_formats() {
        let mut s = season();
        s.races.truncate(2);
        s.races[0].date = "2025-03-15 20:00".to_string();
        s.races[1].date = "2025-03-15T15:00:00Z".to_string();
        for race_id in [1, 2] {
            s.results.push(RaceResult {
                race_id,
                picks: picks([1, 2, 3, 4, 5]),
                recorded_at: None,
            });
        }
        let rows = performance(&s, &calc(), "ana", &MissingBetPolicy::lenient()).unwrap();
        let ids: Vec<u32> = rows.iter().map(|r| r.race.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_unreadable_race_date_is_listed_last() {
        let mut s = played_season();
        s.races[2].date = "TBC".to_string();
        let rows = performance(&s, &calc(), "ana", &MissingBetPolicy::lenient()).unwrap();
        let ids: Vec<u32> = rows.iter().map(|r| r.race.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_top5_bonus_flag() {
        let s = played_season();
        let rows = performance(&s, &calc(), "ana", &MissingBetPolicy::lenient()).unwrap();
        let australia = rows.iter().find(|r| r.race.id == 1).unwrap();
        assert!(australia.top5_bonus);
        assert_eq!(australia.score.points(), 8);

        let test_race = rows.iter().find(|r| r.race.id == 3).unwrap();
        assert!(!test_race.top5_bonus);
        assert_eq!(test_race.score.points(), 5);
    }

    #[test]
    fn test_missing_bet_follows_policy() {
        let s = played_season();
        let lenient = performance(&s, &calc(), "ana", &MissingBetPolicy::lenient()).unwrap();
        let bahrain = lenient.iter().find(|r| r.race.id == 2).unwrap();
        assert!(bahrain.bet.is_none());
        assert_eq!(bahrain.score, RaceScore::Absent);

        let strict = performance(&s, &calc(), "ana", &MissingBetPolicy::default()).unwrap();
        let bahrain = strict.iter().find(|r| r.race.id == 2).unwrap();
        assert_eq!(bahrain.score, RaceScore::Penalty(-1));
    }

    #[test]
    fn test_summary_skips_test_races() {
        let s = played_season();
        let rows = performance(&s, &calc(), "ana", &MissingBetPolicy::default()).unwrap();
        let summary = summarize(&rows);
        assert_eq!(summary.total_points, 7);
        assert_eq!(summary.races_scored, 1);
        assert_eq!(summary.top5_bonuses, 1);
        assert_eq!(summary.best_race, Some((1, 8)));
    }

    #[test]
    fn test_unknown_user() {
        let s = played_season();
        assert_eq!(
            performance(&s, &calc(), "nobody", &MissingBetPolicy::default()).unwrap_err(),
            StandingsError::UnknownUser("nobody".to_string())
        );
    }
}
