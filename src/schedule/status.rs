use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt::Write as _;

use super::dates::parse_race_date;
use super::error::StatusError;
use super::window::BettingWindow;
use crate::season::{Race, RaceStatus};

pub const DEFAULT_DATE_FORMAT: &str = "%A, %-d %B %Y %H:%M";

/// Everything a race page needs to know about its betting window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BettingInfo {
    pub status: RaceStatus,
    pub opening: DateTime<FixedOffset>,
    pub closing: DateTime<FixedOffset>,
    pub opening_formatted: String,
    pub closing_formatted: String,
    pub is_open: bool,
    /// Closed or finished.
    pub is_closed: bool,
    pub is_scheduled: bool,
}

/// Resolves race status in one fixed time zone.
///
/// All calendar arithmetic (midnight, Friday 23:59:59.999) happens in
/// `offset`; "now" is always supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusCalculator {
    offset: FixedOffset,
    date_format: String,
}

impl Default for StatusCalculator {
    fn default() -> Self {
        Self {
            offset: Utc.fix(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

impl StatusCalculator {
    pub fn new(offset: FixedOffset, date_format: impl Into<String>) -> Self {
        Self {
            offset,
            date_format: date_format.into(),
        }
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    pub fn parse_date(&self, race_date: &str) -> Result<DateTime<FixedOffset>, StatusError> {
        parse_race_date(race_date, self.offset)
    }

    pub fn window(&self, race_date: &str) -> Result<BettingWindow, StatusError> {
        BettingWindow::for_race(&self.parse_date(race_date)?)
    }

    /// Status the application acts on.
    ///
    /// A stored status other than `scheduled` is a manual override and is
    /// returned as is, without looking at the date. Otherwise the status comes
    /// from the calendar.
    pub fn effective_status(
        &self,
        race_date: &str,
        stored: Option<RaceStatus>,
        now: DateTime<Utc>,
    ) -> Result<RaceStatus, StatusError> {
        match stored {
            Some(status) if status != RaceStatus::Scheduled => Ok(status),
            _ => self.auto_status(race_date, now),
        }
    }

    /// Status the calendar alone would give, ignoring any manual override.
    pub fn auto_status(&self, race_date: &str, now: DateTime<Utc>) -> Result<RaceStatus, StatusError> {
        Ok(self.window(race_date)?.classify(now))
    }

    pub fn race_status(&self, race: &Race, now: DateTime<Utc>) -> Result<RaceStatus, StatusError> {
        self.effective_status(&race.date, Some(race.status), now)
    }

    pub fn betting_info(
        &self,
        race_date: &str,
        stored: Option<RaceStatus>,
        now: DateTime<Utc>,
    ) -> Result<BettingInfo, StatusError> {
        let window = self.window(race_date)?;
        let status = match stored {
            Some(status) if status != RaceStatus::Scheduled => status,
            _ => window.classify(now),
        };

        Ok(BettingInfo {
            status,
            opening: window.opening,
            closing: window.closing,
            opening_formatted: self.format_instant(&window.opening),
            closing_formatted: self.format_instant(&window.closing),
            is_open: status == RaceStatus::Open,
            is_closed: matches!(status, RaceStatus::Closed | RaceStatus::Finished),
            is_scheduled: status == RaceStatus::Scheduled,
        })
    }

    /// Races by parsed date, earliest first. Races whose date does not parse
    /// go last, by id.
    pub fn races_oldest_first<'a>(&self, races: &'a [Race]) -> Vec<&'a Race> {
        self.sort_races(races, false)
    }

    /// Races by parsed date, most recent first. Races whose date does not
    /// parse go last, by id.
    pub fn races_newest_first<'a>(&self, races: &'a [Race]) -> Vec<&'a Race> {
        self.sort_races(races, true)
    }

    fn sort_races<'a>(&self, races: &'a [Race], newest_first: bool) -> Vec<&'a Race> {
        let mut keyed: Vec<(Option<DateTime<Utc>>, &Race)> = races
            .iter()
            .map(|race| {
                let at = self.parse_date(&race.date).ok().map(|d| d.with_timezone(&Utc));
                (at, race)
            })
            .collect();

        keyed.sort_by(|(a_at, a), (b_at, b)| match (a_at, b_at) {
            (Some(x), Some(y)) => {
                let by_date = if newest_first { y.cmp(x) } else { x.cmp(y) };
                by_date.then(a.id.cmp(&b.id))
            }
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => a.id.cmp(&b.id),
        });

        keyed.into_iter().map(|(_, race)| race).collect()
    }

    /// Render an instant with the configured pattern, falling back to RFC 3339
    /// if the pattern cannot be rendered.
    pub fn format_instant(&self, instant: &DateTime<FixedOffset>) -> String {
        let mut out = String::new();
        if write!(out, "{}", instant.format(&self.date_format)).is_err() {
            return instant.to_rfc3339();
        }
        out
    }
}
