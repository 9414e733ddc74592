use std::collections::HashSet;

use super::error::BetError;
use crate::season::{Driver, Picks, Position};

/// Check a set of picks against the special and variable drivers.
///
/// Returns every problem found rather than stopping at the first.
pub fn validate_picks(
    picks: &Picks,
    special_driver: Option<&Driver>,
    variable_driver: Option<&Driver>,
) -> Result<(), Vec<BetError>> {
    let mut errors = Vec::new();

    if let Some(driver) = special_driver {
        check_position_prop(picks, driver, picks.special_position, &mut errors);
    }
    if let Some(driver) = variable_driver {
        check_position_prop(picks, driver, picks.variable_position, &mut errors);
    }

    let mut seen = HashSet::new();
    for driver in picks.finishers().into_iter().flatten() {
        if !seen.insert(driver) {
            let dup = BetError::DuplicateFinisher(driver.clone());
            if !errors.contains(&dup) {
                errors.push(dup);
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// A driver picked in the top 5 must carry the same position in its prop,
/// and a top-5 prop must match the driver picked there.
fn check_position_prop(
    picks: &Picks,
    driver: &Driver,
    stated: Option<Position>,
    errors: &mut Vec<BetError>,
) {
    match picks.top5_position_of(&driver.id) {
        Some(picked) if stated != Some(picked) => {
            errors.push(BetError::PositionMismatch {
                driver: driver.name.clone(),
                picked,
                stated,
            });
        }
        Some(_) => {}
        None => {
            if let Some(stated) = stated.filter(|p| p.in_top5()) {
                errors.push(BetError::PositionNotPicked {
                    driver: driver.name.clone(),
                    stated,
                });
            }
        }
    }
}
