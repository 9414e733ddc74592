use std::io::IsTerminal;

use chrono::Duration;
use owo_colors::OwoColorize;
use terminal_size::{terminal_size, Width};

use crate::schedule::{BettingInfo, StatusError};
use crate::scoring::{RaceScore, ScoreResult};
use crate::season::{DriverId, Race, RaceStatus, SeasonData};
use crate::standings::{DashboardRow, LeaderboardEntry, PerformanceSummary, RacePerformance};

/// A race with its resolved betting window, or the reason it could not be resolved.
pub struct StatusLine<'a> {
    pub race: &'a Race,
    pub info: Result<BettingInfo, StatusError>,
}

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a name to fit available width, counting chars rather than bytes
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Width left for a free-text column once the fixed columns are laid out.
fn name_width(fixed_width: usize) -> Option<usize> {
    get_terminal_width().map(|width| {
        if width > fixed_width + 10 {
            width - fixed_width
        } else {
            20
        }
    })
}

fn fit(name: &str, width: Option<usize>) -> String {
    match width {
        Some(w) => truncate_name(name, w),
        None => name.to_string(),
    }
}

/// Driver name for an id, falling back to the raw id; `-` for no pick
pub fn driver_label(season: &SeasonData, id: Option<&DriverId>) -> String {
    match id {
        Some(id) => season
            .driver(id)
            .map(|d| d.name.clone())
            .unwrap_or_else(|| id.to_string()),
        None => "-".to_string(),
    }
}

fn paint_status(status: RaceStatus, padded: &str, use_colors: bool) -> String {
    if !use_colors {
        return padded.to_string();
    }
    match status {
        RaceStatus::Open => padded.green().bold().to_string(),
        RaceStatus::Closed => padded.red().to_string(),
        RaceStatus::Finished => padded.dimmed().to_string(),
        RaceStatus::Scheduled => padded.yellow().to_string(),
    }
}

/// Points for one race as shown in tables
pub fn format_race_score(score: &RaceScore) -> String {
    match score {
        RaceScore::Scored(result) if result.double_points => format!("{} (x2)", result.score),
        RaceScore::Scored(result) => result.score.to_string(),
        RaceScore::Pending => "pending".to_string(),
        RaceScore::Penalty(points) => points.to_string(),
        RaceScore::Absent => "-".to_string(),
    }
}

/// Format a duration as a coarse countdown: "2d 3h", "5h 12m", "40m"
pub fn format_remaining(duration: Duration) -> String {
    let minutes = duration.num_minutes().max(0) as u64;
    let rounded = std::time::Duration::from_secs(minutes * 60);
    if minutes == 0 {
        "under a minute".to_string()
    } else if minutes >= 24 * 60 {
        let hours = std::time::Duration::from_secs((minutes / 60) * 3600);
        humantime::format_duration(hours).to_string()
    } else {
        humantime::format_duration(rounded).to_string()
    }
}

/// Races with status and closing time, one per line
/// Columns: id, date, status, closes, name
pub fn format_status_table(lines: &[StatusLine], use_colors: bool) -> String {
    if lines.is_empty() {
        return "No races found.".to_string();
    }

    let id_width = 3;
    let date_width = 16;
    let status_width = 9;
    let separator = "  ";

    lines
        .iter()
        .map(|line| {
            let id_str = format!("{:>width$}", line.race.id, width = id_width);
            let date = line.race.date.chars().take(date_width).collect::<String>();
            let date_padded = format!("{:<width$}", date, width = date_width);

            let (status_str, closes) = match &line.info {
                Ok(info) => {
                    let padded = format!("{:<width$}", info.status.as_str(), width = status_width);
                    (
                        paint_status(info.status, &padded, use_colors),
                        info.closing_formatted.clone(),
                    )
                }
                Err(err) => {
                    let padded = format!("{:<width$}", "invalid", width = status_width);
                    let painted = if use_colors {
                        padded.red().bold().to_string()
                    } else {
                        padded
                    };
                    (painted, err.to_string())
                }
            };

            let mut name = line.race.name.clone();
            if line.race.is_test_race {
                name.push_str(" [test]");
            }

            format!(
                "{}{}{}{}{}{}{}{}{}",
                id_str,
                separator,
                date_padded,
                separator,
                status_str,
                separator,
                name,
                separator,
                if use_colors {
                    closes.dimmed().to_string()
                } else {
                    closes
                }
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Multi-line detail for a single race
pub fn format_race_detail(
    race: &Race,
    info: &BettingInfo,
    remaining: Option<Duration>,
    variable_driver: Option<&str>,
    use_colors: bool,
) -> String {
    let status = paint_status(info.status, info.status.as_str(), use_colors);
    let title = if use_colors {
        race.name.bold().to_string()
    } else {
        race.name.clone()
    };

    let mut out = format!(
        "{}\n  Race: {}\n  Date: {}\n  Status: {}\n  Opens: {}\n  Closes: {}",
        title, race.id, race.date, status, info.opening_formatted, info.closing_formatted
    );
    if let Some(track) = &race.track {
        out.push_str(&format!("\n  Track: {}", track));
    }
    if let Some(name) = variable_driver {
        out.push_str(&format!("\n  Variable driver: {}", name));
    }
    if info.is_open {
        if let Some(left) = remaining {
            out.push_str(&format!("\n  Time left: {}", format_remaining(left)));
        }
    }
    if race.is_test_race {
        out.push_str("\n  Test race (not counted in standings)");
    }
    out
}

/// Leaderboard with columns: rank, points, races, name
pub fn format_leaderboard(entries: &[LeaderboardEntry], use_colors: bool) -> String {
    if entries.is_empty() {
        return "No players found.".to_string();
    }

    let rank_width = 3;
    let points_width = 5;
    let races_width = 8;
    let separator = "  ";
    let width = name_width(rank_width + 1 + points_width + races_width + separator.len() * 2 + 6);

    entries
        .iter()
        .map(|entry| {
            let rank_str = format!("{:>2}.", entry.rank);
            let points_str = format!("{:>width$}", entry.points, width = points_width);
            let races_str = format!("{:>width$}", format!("{} races", entry.races_completed), width = races_width);
            let mut name = fit(&entry.username, width);
            if entry.double_points_race.is_some() {
                name.push_str(" (x2 used)");
            }

            if use_colors {
                let rank_painted = if entry.rank <= 3 {
                    rank_str.yellow().bold().to_string()
                } else {
                    rank_str.dimmed().to_string()
                };
                format!(
                    "{} {}{}{}{}{}",
                    rank_painted,
                    points_str.bold(),
                    separator,
                    races_str.dimmed(),
                    separator,
                    name
                )
            } else {
                format!(
                    "{} {}{}{}{}{}",
                    rank_str, points_str, separator, races_str, separator, name
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Race-by-race history followed by a totals line
pub fn format_performance(
    rows: &[RacePerformance],
    summary: &PerformanceSummary,
    use_colors: bool,
) -> String {
    if rows.is_empty() {
        return "No finished races yet.".to_string();
    }

    let points_width = 8;
    let separator = "  ";
    let width = name_width(points_width + separator.len() * 2 + 12);

    let mut lines: Vec<String> = rows
        .iter()
        .map(|row| {
            let points_str = format!("{:>width$}", format_race_score(&row.score), width = points_width);
            let mut name = fit(&row.race.name, width);
            if row.race.is_test_race {
                name.push_str(" [test]");
            }
            let bonus = if row.top5_bonus { "top 5 bonus" } else { "" };

            if use_colors {
                let painted = match row.score {
                    RaceScore::Penalty(_) => points_str.red().to_string(),
                    RaceScore::Scored(_) => points_str.bold().to_string(),
                    _ => points_str.dimmed().to_string(),
                };
                format!("{}{}{}{}{}", painted, separator, name, separator, bonus.green())
            } else {
                format!("{}{}{}{}{}", points_str, separator, name, separator, bonus)
                    .trim_end()
                    .to_string()
            }
        })
        .collect();

    let best = summary
        .best_race
        .map(|(race_id, points)| format!(", best {} on race {}", points, race_id))
        .unwrap_or_default();
    let total = format!(
        "Total: {} points over {} races, {} top 5 bonus{}{}",
        summary.total_points,
        summary.races_scored,
        summary.top5_bonuses,
        if summary.top5_bonuses == 1 { "" } else { "es" },
        best
    );
    lines.push(String::new());
    lines.push(if use_colors {
        total.bold().to_string()
    } else {
        total
    });
    lines.join("\n")
}

/// How a score was built, one factor per line
pub fn format_breakdown(result: &ScoreResult) -> String {
    if result.breakdown.factors.is_empty() {
        return "    no matching picks".to_string();
    }
    result
        .breakdown
        .factors
        .iter()
        .map(|f| format!("    {:<16} {:<20} {:>3} -> {:>3}", f.label, f.description, f.before, f.after))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Every player's picks and points for one race
pub fn format_dashboard(
    season: &SeasonData,
    race: &Race,
    rows: &[DashboardRow],
    use_colors: bool,
) -> String {
    let header = if use_colors {
        format!("{} ({})", race.name.bold(), race.date)
    } else {
        format!("{} ({})", race.name, race.date)
    };
    if rows.is_empty() {
        return format!("{}\nNo players found.", header);
    }

    let points_width = 8;
    let separator = "  ";

    let mut lines = vec![header];
    lines.extend(rows.iter().map(|row| {
        let points_str = format!("{:>width$}", format_race_score(&row.score), width = points_width);
        let picks = match row.bet {
            Some(bet) => {
                let top5 = bet
                    .picks
                    .finishers()
                    .iter()
                    .map(|id| driver_label(season, *id))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("pole {} | {}", driver_label(season, bet.picks.pole.as_ref()), top5)
            }
            None => "no bet".to_string(),
        };
        let name = row.profile.display_name();

        if use_colors {
            format!(
                "{}{}{}{}{}",
                points_str.bold(),
                separator,
                name.cyan(),
                separator,
                picks.dimmed()
            )
        } else {
            format!("{}{}{}{}{}", points_str, separator, name, separator, picks)
        }
    }));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::betting::submit::tests::{at, picks, season};
    use crate::schedule::StatusCalculator;
    use crate::scoring::{calculate_score, MissingBetPolicy};
    use crate::season::{Bet, RaceResult};
    use crate::standings::{leaderboard, performance, race_dashboard, summarize};

    fn scored_season() -> SeasonData {
        let mut s = season();
        s.results.push(RaceResult {
            race_id: 2,
            picks: picks([1, 2, 3, 4, 5]),
            recorded_at: None,
        });
        s.bets.push(Bet {
            user_id: "ana".to_string(),
            race_id: 2,
            picks: picks([1, 2, 3, 9, 9]),
            double_points: true,
            updated_at: None,
        });
        s
    }

    #[test]
    fn test_truncate_name() {
        assert_eq!(truncate_name("Short", 20), "Short");
        assert_eq!(truncate_name("Exact", 5), "Exact");
        assert_eq!(truncate_name("Gran Premio do Brasil", 10), "Gran Pr...");
        assert_eq!(truncate_name("Interlagos", 3), "Int");
    }

    #[test]
    fn test_driver_label() {
        let s = season();
        assert_eq!(driver_label(&s, Some(&DriverId::from(5))), "Gabriel Bortoleto");
        assert_eq!(driver_label(&s, Some(&DriverId::from(99))), "99");
        assert_eq!(driver_label(&s, None), "-");
    }

    #[test]
    fn test_format_race_score() {
        assert_eq!(format_race_score(&RaceScore::Pending), "pending");
        assert_eq!(format_race_score(&RaceScore::Penalty(-1)), "-1");
        assert_eq!(format_race_score(&RaceScore::Absent), "-");

        let s = scored_season();
        let result = calculate_score(&s.bets[0], &s.results[0]);
        assert_eq!(format_race_score(&RaceScore::Scored(result)), "10 (x2)");
    }

    #[test]
    fn test_format_remaining() {
        assert_eq!(format_remaining(Duration::seconds(20)), "under a minute");
        assert_eq!(format_remaining(Duration::minutes(95)), "1h 35m");
        assert_eq!(format_remaining(Duration::minutes(3 * 24 * 60 + 125)), "3days 2h");
    }

    #[test]
    fn test_format_status_table() {
        let s = season();
        let calc = StatusCalculator::default();
        let now = at("2025-03-11T12:00:00Z");
        let mut broken = s.races[2].clone();
        broken.date = "soon".to_string();

        let lines = vec![
            StatusLine {
                race: &s.races[0],
                info: calc.betting_info(&s.races[0].date, Some(s.races[0].status), now),
            },
            StatusLine {
                race: &broken,
                info: calc.betting_info(&broken.date, Some(broken.status), now),
            },
        ];
        let out = format_status_table(&lines, false);
        let rows: Vec<&str> = out.lines().collect();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].starts_with("  1  2025-03-15T15:00  open"));
        assert!(rows[0].contains("Australia"));
        assert!(rows[0].contains("Friday, 14 March 2025 23:59"));
        assert!(rows[1].contains("invalid"));
        assert!(rows[1].contains("Test [test]"));
        assert!(rows[1].contains("invalid race date 'soon'"));
    }

    #[test]
    fn test_format_status_table_empty() {
        assert_eq!(format_status_table(&[], false), "No races found.");
    }

    #[test]
    fn test_format_race_detail() {
        let s = season();
        let calc = StatusCalculator::default();
        let now = at("2025-03-14T22:00:00Z");
        let race = &s.races[0];
        let info = calc.betting_info(&race.date, Some(race.status), now).unwrap();
        let remaining = calc.window(&race.date).unwrap().remaining(now);

        let out = format_race_detail(race, &info, remaining, Some("Driver 7"), false);
        assert!(out.starts_with("Australia\n"));
        assert!(out.contains("Status: open"));
        assert!(out.contains("Opens: Monday, 10 March 2025 00:00"));
        assert!(out.contains("Variable driver: Driver 7"));
        assert!(out.contains("Time left: 1h 59m"));
    }

    #[test]
    fn test_format_leaderboard() {
        let s = scored_season();
        let entries = leaderboard(&s, &MissingBetPolicy::lenient());
        let out = format_leaderboard(&entries, false);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with(" 1.    10"));
        assert!(lines[0].contains("1 races"));
        assert!(lines[0].contains("ana (x2 used)"));
        assert!(lines[1].starts_with(" 2.     0"));
        assert!(lines[1].ends_with("bia"));
    }

    #[test]
    fn test_format_leaderboard_empty() {
        assert_eq!(format_leaderboard(&[], false), "No players found.");
    }

    #[test]
    fn test_format_performance() {
        let s = scored_season();
        let calc = StatusCalculator::default();
        let rows = performance(&s, &calc, "bia", &MissingBetPolicy::default()).unwrap();
        let summary = summarize(&rows);
        let out = format_performance(&rows, &summary, false);
        assert!(out.contains("      -1  Bahrain"));
        assert!(out.ends_with("Total: -1 points over 0 races, 0 top 5 bonuses"));
    }

    #[test]
    fn test_format_performance_empty() {
        let s = season();
        let calc = StatusCalculator::default();
        let rows = performance(&s, &calc, "ana", &MissingBetPolicy::default()).unwrap();
        let out = format_performance(&rows, &summarize(&rows), false);
        assert_eq!(out, "No finished races yet.");
    }

    #[test]
    fn test_format_breakdown() {
        let s = scored_season();
        let result = calculate_score(&s.bets[0], &s.results[0]);
        let out = format_breakdown(&result);
        assert!(out.contains("Pole"));
        assert!(out.contains("Podium bonus"));
        assert!(out.lines().last().unwrap().contains("Double points"));
    }

    #[test]
    fn test_format_dashboard() {
        let s = scored_season();
        let (race, rows) = race_dashboard(&s, 2, &MissingBetPolicy::default()).unwrap();
        let out = format_dashboard(&s, race, &rows, false);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "Bahrain (2025-03-01T15:00:00Z)");
        assert!(lines[1].contains("10 (x2)  ana  pole Driver 1 | Driver 1, Driver 2, Driver 3, Driver 9, Driver 9"));
        assert!(lines[2].contains("-1  bia  no bet"));
        assert!(lines[3].contains("-1  root  no bet"));
    }
}
