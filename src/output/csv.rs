use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use chrono::NaiveDate;
use std::io::Write;
use std::path::Path;

use super::formatter::driver_label;
use crate::schedule::StatusCalculator;
use crate::scoring::MissingBetPolicy;
use crate::season::{DriverId, Position, SeasonData};

const BOM: &str = "\u{feff}";

pub const EXPORT_HEADER: [&str; 12] = [
    "Race",
    "User",
    "Email",
    "Points",
    "Pole Driver",
    "P1 Driver",
    "P2 Driver",
    "P3 Driver",
    "P4 Driver",
    "P5 Driver",
    "Special Pos",
    "Variable Driver Pos",
];

/// Quote a cell, doubling any quotes inside it
fn quote(cell: &str) -> String {
    format!("\"{}\"", cell.replace('"', "\"\""))
}

fn csv_line<I, S>(cells: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    cells
        .into_iter()
        .map(|c| quote(c.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}

fn position_cell(pos: Option<Position>) -> String {
    pos.map(|p| p.to_string()).unwrap_or_default()
}

/// Driver name for a pick; a missing pick is an empty cell.
fn driver_cell(season: &SeasonData, id: Option<&DriverId>) -> String {
    id.map(|id| driver_label(season, Some(id))).unwrap_or_default()
}

/// Every bet of the season as a spreadsheet-friendly CSV document.
///
/// One row per (race, profile), newest race first. Pairs with neither a bet
/// nor a result are skipped. Admins are listed like any other profile.
pub fn export_csv(
    season: &SeasonData,
    calculator: &StatusCalculator,
    policy: &MissingBetPolicy,
) -> String {
    let mut lines = vec![csv_line(EXPORT_HEADER)];

    for race in calculator.races_newest_first(&season.races) {
        let result = season.result_for(race.id);
        for profile in &season.profiles {
            let bet = season.bet_for(&profile.id, race.id);
            if bet.is_none() && result.is_none() {
                continue;
            }

            let points = policy.resolve(race, bet, result).points();
            let mut row = vec![
                race.name.clone(),
                profile.display_name().to_string(),
                profile.email.clone().unwrap_or_default(),
                points.to_string(),
            ];
            match bet {
                Some(bet) => {
                    row.push(driver_cell(season, bet.picks.pole.as_ref()));
                    row.extend(bet.picks.finishers().iter().map(|id| driver_cell(season, *id)));
                    row.push(position_cell(bet.picks.special_position));
                    row.push(position_cell(bet.picks.variable_position));
                }
                None => row.extend(std::iter::repeat(String::new()).take(8)),
            }
            lines.push(csv_line(row));
        }
    }

    format!("{}{}\n", BOM, lines.join("\n"))
}

/// `bets_export_<YYYY-MM-DD>.csv`
pub fn default_export_filename(date: NaiveDate) -> String {
    format!("bets_export_{}.csv", date.format("%Y-%m-%d"))
}

/// Write an export so a reader never sees a half-written file
pub fn write_export(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open export file: {}", path.display()))?;
    file.write_all(contents.as_bytes())
        .context("Failed to write export")?;
    file.commit()
        .with_context(|| format!("Failed to save export to {}", path.display()))?;
    Ok(())
}
