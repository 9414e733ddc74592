use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::schedule::{parse_utc_offset, StatusCalculator, DEFAULT_DATE_FORMAT};
use crate::scoring::ScoringConfig;

/// Example YAML:
/// ```yaml
/// season_file: ~/f1/season-2025.json
/// utc_offset: "-03:00"
/// date_format: "%d/%m/%Y %H:%M"
/// special_driver: Bortoleto
/// scoring:
///   missing_bet_penalty: -1
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Season document (default: ~/.config/podium/season.json)
    #[serde(default)]
    pub season_file: Option<PathBuf>,

    /// Time zone all betting windows are computed in (default: +00:00)
    #[serde(default)]
    pub utc_offset: Option<String>,

    /// strftime pattern for opening and closing times
    #[serde(default)]
    pub date_format: Option<String>,

    /// Season-long special driver, by id or name fragment
    #[serde(default)]
    pub special_driver: Option<String>,

    #[serde(default)]
    pub scoring: Option<ScoringConfig>,
}

impl Config {
    /// Season file path, with a leading `~/` expanded.
    pub fn season_path(&self) -> PathBuf {
        match &self.season_file {
            Some(path) => match (path.strip_prefix("~"), dirs::home_dir()) {
                (Ok(rest), Some(home)) => home.join(rest),
                _ => path.clone(),
            },
            None => crate::season::get_season_path(),
        }
    }

    pub fn offset(&self) -> Result<FixedOffset, String> {
        match &self.utc_offset {
            Some(s) => parse_utc_offset(s),
            None => Ok(Utc.fix()),
        }
    }

    pub fn calculator(&self) -> Result<StatusCalculator, String> {
        let date_format = self.date_format.as_deref().unwrap_or(DEFAULT_DATE_FORMAT);
        Ok(StatusCalculator::new(self.offset()?, date_format))
    }

    /// Effective scoring settings, defaults filled in when the section is absent.
    pub fn scoring(&self) -> ScoringConfig {
        self.scoring.clone().unwrap_or_default()
    }
}
