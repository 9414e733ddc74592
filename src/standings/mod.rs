pub mod dashboard;
pub mod leaderboard;
pub mod performance;

pub use dashboard::{race_dashboard, DashboardRow};
pub use leaderboard::{leaderboard, LeaderboardEntry};
pub use performance::{performance, summarize, PerformanceSummary, RacePerformance};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StandingsError {
    #[error("Unknown user: {0}")]
    UnknownUser(String),

    #[error("Unknown race: {0}")]
    UnknownRace(u32),
}
