pub mod betting;
pub mod config;
pub mod logging;
pub mod output;
pub mod schedule;
pub mod scoring;
pub mod season;
pub mod standings;
