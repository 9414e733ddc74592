use chrono::{DateTime, Datelike, Days, FixedOffset, NaiveTime, Utc, Weekday};

use super::dates::at_local;
use super::error::StatusError;
use crate::season::RaceStatus;

/// Betting opens this many calendar days before race day, at midnight.
pub const OPENING_LEAD_DAYS: u64 = 5;

/// Days to step back from race day to land on the Friday that closes betting.
///
/// A Friday race closes on the Friday of the week before.
pub fn closing_offset_days(race_day: Weekday) -> u64 {
    match race_day {
        Weekday::Sun => 2,
        Weekday::Sat => 1,
        Weekday::Fri => 7,
        other => u64::from(other.num_days_from_sunday()) + 2,
    }
}

/// Midnight, `OPENING_LEAD_DAYS` calendar days before race day.
pub fn opening_instant(race: &DateTime<FixedOffset>) -> Result<DateTime<FixedOffset>, StatusError> {
    let day = race
        .date_naive()
        .checked_sub_days(Days::new(OPENING_LEAD_DAYS))
        .ok_or_else(|| StatusError::OutOfRange(race.to_rfc3339()))?;
    at_local(*race.offset(), day.and_time(NaiveTime::MIN))
}

/// 23:59:59.999 on the Friday strictly before race day.
pub fn closing_instant(race: &DateTime<FixedOffset>) -> Result<DateTime<FixedOffset>, StatusError> {
    let day = race
        .date_naive()
        .checked_sub_days(Days::new(closing_offset_days(race.weekday())))
        .ok_or_else(|| StatusError::OutOfRange(race.to_rfc3339()))?;
    let end_of_day = day
        .and_hms_milli_opt(23, 59, 59, 999)
        .ok_or_else(|| StatusError::OutOfRange(race.to_rfc3339()))?;
    at_local(*race.offset(), end_of_day)
}

/// The span during which bets may be placed or edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BettingWindow {
    pub opening: DateTime<FixedOffset>,
    pub closing: DateTime<FixedOffset>,
}

impl BettingWindow {
    pub fn for_race(race: &DateTime<FixedOffset>) -> Result<Self, StatusError> {
        Ok(Self {
            opening: opening_instant(race)?,
            closing: closing_instant(race)?,
        })
    }

    /// Date-based status at `now`: closed after the closing instant, open from
    /// the opening instant on, scheduled before that.
    pub fn classify(&self, now: DateTime<Utc>) -> RaceStatus {
        if now > self.closing.with_timezone(&Utc) {
            RaceStatus::Closed
        } else if now >= self.opening.with_timezone(&Utc) {
            RaceStatus::Open
        } else {
            RaceStatus::Scheduled
        }
    }

    /// Time left before betting closes, if it has not closed yet.
    pub fn remaining(&self, now: DateTime<Utc>) -> Option<chrono::Duration> {
        let closing = self.closing.with_timezone(&Utc);
        (now <= closing).then(|| closing - now)
    }
}
