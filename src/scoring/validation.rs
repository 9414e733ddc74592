use super::config::ScoringConfig;

/// Validate scoring configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_scoring(config: &ScoringConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(penalty) = config.missing_bet_penalty {
        if penalty > 0 {
            errors.push(format!(
                "scoring.missing_bet_penalty: must be zero or negative, got {}",
                penalty
            ));
        }
    }

    if config.penalize_on_leaderboard == Some(true) && config.missing_bet_penalty == Some(0) {
        errors.push(
            "scoring.penalize_on_leaderboard: has no effect while missing_bet_penalty is 0"
                .to_string(),
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
