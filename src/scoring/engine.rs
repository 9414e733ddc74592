use crate::season::{Bet, Picks, RaceResult};

pub const POINTS_PER_MATCH: i32 = 1;
pub const PODIUM_BONUS: i32 = 1;
pub const FULL_TOP5_BONUS: i32 = 1;
pub const DOUBLE_POINTS_MULTIPLIER: i32 = 2;

/// Highest score a bet can reach before the double-points multiplier.
pub const MAX_RAW_SCORE: i32 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactorContribution {
    pub label: String,       // e.g. "Pole", "P3", "Podium bonus"
    pub description: String, // e.g. "picked 44", "position 7", "x2"
    pub before: i32,         // Score before this factor
    pub after: i32,          // Score after this factor
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreBreakdown {
    pub factors: Vec<FactorContribution>,
}

/// Which pick fields of a bet agree with the official result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PickMatches {
    pub pole: bool,
    pub finishers: [bool; 5],
    pub special: bool,
    pub variable: bool,
}

impl PickMatches {
    /// Compare every field of `bet` against `official`. A missing pick on either
    /// side never matches.
    pub fn between(bet: &Picks, official: &Picks) -> Self {
        let bet_top5 = bet.finishers();
        let official_top5 = official.finishers();
        let mut finishers = [false; 5];
        for (idx, matched) in finishers.iter_mut().enumerate() {
            *matched = same(bet_top5[idx], official_top5[idx]);
        }

        Self {
            pole: same(bet.pole.as_ref(), official.pole.as_ref()),
            finishers,
            special: same(bet.special_position.as_ref(), official.special_position.as_ref()),
            variable: same(
                bet.variable_position.as_ref(),
                official.variable_position.as_ref(),
            ),
        }
    }

    /// P1, P2 and P3 all correct.
    pub fn podium(&self) -> bool {
        self.finishers[..3].iter().all(|m| *m)
    }

    /// P1 through P5 all correct.
    pub fn full_top5(&self) -> bool {
        self.finishers.iter().all(|m| *m)
    }

    pub fn finisher_count(&self) -> usize {
        self.finishers.iter().filter(|m| **m).count()
    }
}

fn same<T: PartialEq>(pick: Option<&T>, official: Option<&T>) -> bool {
    matches!((pick, official), (Some(p), Some(o)) if p == o)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreResult {
    pub score: i32,
    pub matches: PickMatches,
    pub double_points: bool,
    pub breakdown: ScoreBreakdown,
}

struct Tally {
    score: i32,
    factors: Vec<FactorContribution>,
}

impl Tally {
    fn add(&mut self, label: impl Into<String>, description: String, points: i32) {
        let before = self.score;
        self.score += points;
        self.factors.push(FactorContribution {
            label: label.into(),
            description,
            before,
            after: self.score,
        });
    }
}

/// Score one bet against the official result of its race.
///
/// Rules apply in a fixed order: pole, P1..P5, podium bonus, full top-5 bonus,
/// special driver position, variable driver position. The double-points flag
/// then multiplies the whole total. Missing picks score nothing; the function
/// never fails.
pub fn calculate_score(bet: &Bet, result: &RaceResult) -> ScoreResult {
    let matches = PickMatches::between(&bet.picks, &result.picks);
    let mut tally = Tally {
        score: 0,
        factors: Vec::new(),
    };

    if matches.pole {
        if let Some(ref pole) = bet.picks.pole {
            tally.add("Pole", format!("picked {}", pole), POINTS_PER_MATCH);
        }
    }

    for (idx, driver) in bet.picks.finishers().iter().enumerate() {
        if let (true, Some(driver)) = (matches.finishers[idx], driver) {
            tally.add(
                format!("P{}", idx + 1),
                format!("picked {}", driver),
                POINTS_PER_MATCH,
            );
        }
    }

    if matches.podium() {
        tally.add("Podium bonus", "P1-P3 all correct".to_string(), PODIUM_BONUS);
    }

    if matches.full_top5() {
        tally.add("Top 5 bonus", "P1-P5 all correct".to_string(), FULL_TOP5_BONUS);
    }

    if matches.special {
        if let Some(pos) = bet.picks.special_position {
            tally.add("Special driver", format!("position {}", pos), POINTS_PER_MATCH);
        }
    }

    if matches.variable {
        if let Some(pos) = bet.picks.variable_position {
            tally.add("Variable driver", format!("position {}", pos), POINTS_PER_MATCH);
        }
    }

    if bet.double_points {
        let before = tally.score;
        tally.score *= DOUBLE_POINTS_MULTIPLIER;
        tally.factors.push(FactorContribution {
            label: "Double points".to_string(),
            description: format!("x{}", DOUBLE_POINTS_MULTIPLIER),
            before,
            after: tally.score,
        });
    }

    ScoreResult {
        score: tally.score,
        matches,
        double_points: bet.double_points,
        breakdown: ScoreBreakdown {
            factors: tally.factors,
        },
    }
}

/// Shorthand for `calculate_score(bet, result).score`.
pub fn score(bet: &Bet, result: &RaceResult) -> i32 {
    calculate_score(bet, result).score
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::season::{DriverId, Position};
    use proptest::prelude::*;

    fn d(n: i64) -> Option<DriverId> {
        Some(DriverId::from(n))
    }

    fn pos(n: u8) -> Option<Position> {
        Position::new(n)
    }

    fn official() -> Picks {
        Picks {
            pole: d(1),
            p1: d(1),
            p2: d(4),
            p3: d(16),
            p4: d(81),
            p5: d(63),
            special_position: pos(9),
            variable_position: pos(12),
        }
    }

    fn bet_with(picks: Picks, double_points: bool) -> Bet {
        Bet {
            user_id: "u1".to_string(),
            race_id: 1,
            picks,
            double_points,
            updated_at: None,
        }
    }

    fn result_with(picks: Picks) -> RaceResult {
        RaceResult {
            race_id: 1,
            picks,
            recorded_at: None,
        }
    }

    #[test]
    fn test_all_null_scores_zero() {
        let result = calculate_score(
            &bet_with(Picks::default(), false),
            &result_with(Picks::default()),
        );
        assert_eq!(result.score, 0);
        assert!(result.breakdown.factors.is_empty());
    }

    #[test]
    fn test_null_bet_against_full_result_scores_zero() {
        let result = calculate_score(&bet_with(Picks::default(), true), &result_with(official()));
        assert_eq!(result.score, 0);
    }

    #[test]
    fn test_exact_top5_only_scores_seven() {
        let picks = Picks {
            pole: None,
            special_position: None,
            variable_position: None,
            ..official()
        };
        let result = calculate_score(&bet_with(picks, false), &result_with(official()));
        assert_eq!(result.score, 7); // 5 exact + podium + full top 5
        assert!(result.matches.podium());
        assert!(result.matches.full_top5());
    }

    #[test]
    fn test_perfect_bet_scores_max() {
        let result = calculate_score(&bet_with(official(), false), &result_with(official()));
        assert_eq!(result.score, MAX_RAW_SCORE);

        let doubled = calculate_score(&bet_with(official(), true), &result_with(official()));
        assert_eq!(doubled.score, 2 * MAX_RAW_SCORE);
    }

    #[test]
    fn test_p1_p2_without_p3_has_no_podium_bonus() {
        let picks = Picks {
            p1: d(1),
            p2: d(4),
            p3: d(99),
            ..Picks::default()
        };
        let result = calculate_score(&bet_with(picks, false), &result_with(official()));
        assert_eq!(result.score, 2);
        assert!(!result.matches.podium());
    }

    #[test]
    fn test_podium_without_p4_p5() {
        let picks = Picks {
            p1: d(1),
            p2: d(4),
            p3: d(16),
            p4: d(63),
            p5: d(81),
            ..Picks::default()
        };
        let result = calculate_score(&bet_with(picks, false), &result_with(official()));
        assert_eq!(result.score, 4); // 3 exact + podium
        assert!(result.matches.podium());
        assert!(!result.matches.full_top5());
    }

    #[test]
    fn test_p4_p5_alone_no_bonus() {
        let picks = Picks {
            p4: d(81),
            p5: d(63),
            ..Picks::default()
        };
        let result = calculate_score(&bet_with(picks, false), &result_with(official()));
        assert_eq!(result.score, 2);
    }

    #[test]
    fn test_driver_in_wrong_slot_does_not_match() {
        let picks = Picks {
            p1: d(4),
            p2: d(1),
            ..Picks::default()
        };
        let result = calculate_score(&bet_with(picks, false), &result_with(official()));
        assert_eq!(result.score, 0);
    }

    #[test]
    fn test_numeric_and_string_ids_match() {
        let bet: Bet = serde_json::from_str(
            r#"{"user_id": "u1", "race_id": 1, "picks": {"pole": "12", "special_position": "3"}}"#,
        )
        .unwrap();
        let result: RaceResult = serde_json::from_str(
            r#"{"race_id": 1, "picks": {"pole": 12, "special_position": 3}}"#,
        )
        .unwrap();
        assert_eq!(score(&bet, &result), 2);
    }

    #[test]
    fn test_special_and_variable_positions() {
        let picks = Picks {
            special_position: pos(9),
            variable_position: pos(11),
            ..Picks::default()
        };
        let result = calculate_score(&bet_with(picks, false), &result_with(official()));
        assert_eq!(result.score, 1);
        assert!(result.matches.special);
        assert!(!result.matches.variable);
    }

    #[test]
    fn test_missing_official_pick_never_matches() {
        let picks = Picks {
            pole: d(1),
            ..Picks::default()
        };
        let official = Picks {
            pole: None,
            ..official()
        };
        assert_eq!(score(&bet_with(picks, false), &result_with(official)), 0);
    }

    #[test]
    fn test_breakdown_order_and_running_totals() {
        let picks = Picks {
            pole: d(1),
            p1: d(1),
            p2: d(4),
            p3: d(16),
            variable_position: pos(12),
            ..Picks::default()
        };
        let result = calculate_score(&bet_with(picks, true), &result_with(official()));

        let labels: Vec<&str> = result
            .breakdown
            .factors
            .iter()
            .map(|f| f.label.as_str())
            .collect();
        assert_eq!(
            labels,
            vec!["Pole", "P1", "P2", "P3", "Podium bonus", "Variable driver", "Double points"]
        );

        let last = result.breakdown.factors.last().unwrap();
        assert_eq!(last.before, 6);
        assert_eq!(last.after, 12);
        assert_eq!(result.score, 12);
        assert!(result.double_points);
    }

    fn driver_pick() -> impl Strategy<Value = Option<DriverId>> {
        proptest::option::of((1i64..=4).prop_map(DriverId::from))
    }

    fn position_pick() -> impl Strategy<Value = Option<Position>> {
        proptest::option::of((1u8..=3).prop_map(|n| Position::new(n).unwrap()))
    }

    fn any_picks() -> impl Strategy<Value = Picks> {
        (
            driver_pick(),
            driver_pick(),
            driver_pick(),
            driver_pick(),
            driver_pick(),
            driver_pick(),
            position_pick(),
            position_pick(),
        )
            .prop_map(|(pole, p1, p2, p3, p4, p5, special, variable)| Picks {
                pole,
                p1,
                p2,
                p3,
                p4,
                p5,
                special_position: special,
                variable_position: variable,
            })
    }

    proptest! {
        #[test]
        fn prop_double_points_doubles(bet in any_picks(), official in any_picks()) {
            let result = result_with(official);
            let plain = score(&bet_with(bet.clone(), false), &result);
            let doubled = score(&bet_with(bet, true), &result);
            prop_assert_eq!(doubled, 2 * plain);
        }

        #[test]
        fn prop_score_within_bounds(bet in any_picks(), official in any_picks()) {
            let s = score(&bet_with(bet, false), &result_with(official));
            prop_assert!((0..=MAX_RAW_SCORE).contains(&s));
        }

        #[test]
        fn prop_full_top5_implies_podium(bet in any_picks(), official in any_picks()) {
            let matches = PickMatches::between(&bet, &official);
            if matches.full_top5() {
                prop_assert!(matches.podium());
            }
        }

        #[test]
        fn prop_score_matches_rule_sum(bet in any_picks(), official in any_picks()) {
            let result = calculate_score(&bet_with(bet, false), &result_with(official));
            let m = result.matches;
            let expected = m.pole as i32
                + m.finisher_count() as i32
                + m.podium() as i32
                + m.full_top5() as i32
                + m.special as i32
                + m.variable as i32;
            prop_assert_eq!(result.score, expected);
        }
    }
}
