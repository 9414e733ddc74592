pub mod admin;
pub mod error;
pub mod submit;
pub mod validation;

pub use admin::{set_race_status, set_variable_driver};
pub use error::BetError;
pub use submit::{has_used_double_points, submit_bet, submit_result, BetSubmission};
pub use validation::validate_picks;
