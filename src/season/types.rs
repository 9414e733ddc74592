use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::{blank_as_none, DriverId, Position};

/// Current season document version.
pub const SEASON_VERSION: u32 = 1;

/// Lifecycle state of a race.
///
/// As a stored value, `Scheduled` means "let the calendar decide"; any other
/// stored value is a manual override.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RaceStatus {
    #[default]
    Scheduled,
    Open,
    Closed,
    Finished,
}

impl RaceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RaceStatus::Scheduled => "scheduled",
            RaceStatus::Open => "open",
            RaceStatus::Closed => "closed",
            RaceStatus::Finished => "finished",
        }
    }
}

impl fmt::Display for RaceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RaceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "scheduled" => Ok(RaceStatus::Scheduled),
            "open" => Ok(RaceStatus::Open),
            "closed" => Ok(RaceStatus::Closed),
            "finished" => Ok(RaceStatus::Finished),
            other => Err(format!(
                "unknown race status '{other}' (expected scheduled, open, closed or finished)"
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Driver {
    pub id: DriverId,
    pub name: String,
    #[serde(default)]
    pub team: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Race {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub track: Option<String>,
    /// Scheduled start, kept as entered and parsed on use.
    pub date: String,
    #[serde(default)]
    pub status: RaceStatus,
    #[serde(default)]
    pub is_test_race: bool,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub variable_driver_id: Option<DriverId>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Role,
}

impl Profile {
    /// Name shown in tables: username, then full name, then id.
    pub fn display_name(&self) -> &str {
        self.username
            .as_deref()
            .or(self.full_name.as_deref())
            .unwrap_or(&self.id)
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// The pick fields shared by a bet and an official result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Picks {
    #[serde(default, alias = "pole_driver_id", deserialize_with = "blank_as_none")]
    pub pole: Option<DriverId>,
    #[serde(default, alias = "p1_driver_id", deserialize_with = "blank_as_none")]
    pub p1: Option<DriverId>,
    #[serde(default, alias = "p2_driver_id", deserialize_with = "blank_as_none")]
    pub p2: Option<DriverId>,
    #[serde(default, alias = "p3_driver_id", deserialize_with = "blank_as_none")]
    pub p3: Option<DriverId>,
    #[serde(default, alias = "p4_driver_id", deserialize_with = "blank_as_none")]
    pub p4: Option<DriverId>,
    #[serde(default, alias = "p5_driver_id", deserialize_with = "blank_as_none")]
    pub p5: Option<DriverId>,
    /// Finishing position of the season-long special driver.
    #[serde(default, alias = "bortoleto_pos", deserialize_with = "blank_as_none")]
    pub special_position: Option<Position>,
    /// Finishing position of this race's variable driver.
    #[serde(default, alias = "variable_driver_pos", deserialize_with = "blank_as_none")]
    pub variable_position: Option<Position>,
}

impl Picks {
    /// P1..P5 in order.
    pub fn finishers(&self) -> [Option<&DriverId>; 5] {
        [
            self.p1.as_ref(),
            self.p2.as_ref(),
            self.p3.as_ref(),
            self.p4.as_ref(),
            self.p5.as_ref(),
        ]
    }

    /// Position (1..=5) at which `driver` was picked in the top 5.
    pub fn top5_position_of(&self, driver: &DriverId) -> Option<Position> {
        self.finishers()
            .iter()
            .position(|pick| *pick == Some(driver))
            .and_then(|idx| Position::new(idx as u8 + 1))
    }
}

/// Picks live under `picks`. A row with the pick columns at the top level is
/// rejected instead of loading as an empty bet.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Bet {
    pub user_id: String,
    pub race_id: u32,
    #[serde(default)]
    pub picks: Picks,
    #[serde(default, alias = "catapulta")]
    pub double_points: bool,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RaceResult {
    pub race_id: u32,
    #[serde(default)]
    pub picks: Picks,
    #[serde(default)]
    pub recorded_at: Option<DateTime<Utc>>,
}

/// Outcome of an insert-or-update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Inserted,
    Updated,
}

impl fmt::Display for Upsert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Upsert::Inserted => f.write_str("created"),
            Upsert::Updated => f.write_str("updated"),
        }
    }
}

/// Everything the game knows about one season.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonData {
    pub version: u32,
    #[serde(default)]
    pub drivers: Vec<Driver>,
    #[serde(default)]
    pub races: Vec<Race>,
    #[serde(default)]
    pub profiles: Vec<Profile>,
    #[serde(default)]
    pub bets: Vec<Bet>,
    #[serde(default)]
    pub results: Vec<RaceResult>,
}

impl Default for SeasonData {
    fn default() -> Self {
        Self::new()
    }
}

impl SeasonData {
    pub fn new() -> Self {
        Self {
            version: SEASON_VERSION,
            drivers: Vec::new(),
            races: Vec::new(),
            profiles: Vec::new(),
            bets: Vec::new(),
            results: Vec::new(),
        }
    }

    pub fn race(&self, race_id: u32) -> Option<&Race> {
        self.races.iter().find(|r| r.id == race_id)
    }

    pub fn race_mut(&mut self, race_id: u32) -> Option<&mut Race> {
        self.races.iter_mut().find(|r| r.id == race_id)
    }

    pub fn driver(&self, id: &DriverId) -> Option<&Driver> {
        self.drivers.iter().find(|d| &d.id == id)
    }

    /// Look up a driver by exact id, falling back to a case-insensitive name fragment.
    pub fn find_driver(&self, id_or_name: &str) -> Option<&Driver> {
        if let Ok(id) = id_or_name.parse::<DriverId>() {
            if let Some(driver) = self.driver(&id) {
                return Some(driver);
            }
        }
        let needle = id_or_name.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        self.drivers
            .iter()
            .find(|d| d.name.to_lowercase().contains(&needle))
    }

    pub fn profile(&self, user_id: &str) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.id == user_id)
    }

    pub fn bet_for(&self, user_id: &str, race_id: u32) -> Option<&Bet> {
        self.bets
            .iter()
            .find(|b| b.user_id == user_id && b.race_id == race_id)
    }

    pub fn result_for(&self, race_id: u32) -> Option<&RaceResult> {
        self.results.iter().find(|r| r.race_id == race_id)
    }

    /// Insert a bet, or replace the existing bet for the same (user, race).
    pub fn upsert_bet(&mut self, bet: Bet) -> Upsert {
        match self
            .bets
            .iter_mut()
            .find(|b| b.user_id == bet.user_id && b.race_id == bet.race_id)
        {
            Some(existing) => {
                *existing = bet;
                Upsert::Updated
            }
            None => {
                self.bets.push(bet);
                Upsert::Inserted
            }
        }
    }

    /// Insert a result, or replace the existing result for the same race.
    pub fn upsert_result(&mut self, result: RaceResult) -> Upsert {
        match self.results.iter_mut().find(|r| r.race_id == result.race_id) {
            Some(existing) => {
                *existing = result;
                Upsert::Updated
            }
            None => {
                self.results.push(result);
                Upsert::Inserted
            }
        }
    }
}
