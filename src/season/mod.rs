pub mod ids;
pub mod store;
pub mod types;

pub use ids::{DriverId, Position, RawValue, MAX_POSITION};
pub use store::{get_season_path, SeasonStore};
pub use types::{
    Bet, Driver, Picks, Profile, Race, RaceResult, RaceStatus, Role, SeasonData, Upsert,
    SEASON_VERSION,
};
