pub mod dates;
pub mod error;
pub mod status;
pub mod window;

pub use dates::{parse_race_date, parse_utc_offset, validate_date_format};
pub use error::StatusError;
pub use status::{BettingInfo, StatusCalculator, DEFAULT_DATE_FORMAT};
pub use window::{closing_instant, closing_offset_days, opening_instant, BettingWindow};
