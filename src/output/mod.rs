pub mod csv;
pub mod formatter;

pub use csv::{default_export_filename, export_csv, write_export};
pub use formatter::{
    driver_label, format_breakdown, format_dashboard, format_leaderboard, format_performance,
    format_race_detail, format_race_score, format_remaining, format_status_table,
    should_use_colors, StatusLine,
};
