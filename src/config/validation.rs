use super::schema::ProfileConfig;
use crate::calculator::Calculator;

/// A profile with every field present and checked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClimbProfile {
    pub mmr_per_division: f64,
    pub current_mmr: f64,
    pub divisions: u32,
    pub win_mmr: f64,
    pub loss_mmr: f64,
}

impl ClimbProfile {
    pub fn calculator(&self) -> Calculator {
        Calculator::new(
            self.mmr_per_division,
            self.current_mmr,
            self.divisions,
            self.win_mmr,
            self.loss_mmr,
        )
    }
}

/// Validate a merged profile at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_profile(config: &ProfileConfig) -> Result<ClimbProfile, Vec<String>> {
    let mut errors = Vec::new();

    let mmr_per_division = required_number(
        config.mmr_per_division,
        "mmr_per_division",
        "--mmr-per-division",
        &mut errors,
    );
    if let Some(mmr) = mmr_per_division {
        if mmr <= 0.0 {
            errors.push(format!(
                "profile.mmr_per_division: must be positive, got {}",
                mmr
            ));
        }
    }

    let current_mmr = required_number(
        config.current_mmr,
        "current_mmr",
        "--current-mmr",
        &mut errors,
    );

    let divisions = match config.divisions {
        Some(0) => {
            errors.push("profile.divisions: must be at least 1".to_string());
            None
        }
        Some(n) => Some(n),
        None => {
            errors.push(missing("divisions", "--divisions"));
            None
        }
    };

    let win_mmr = required_number(config.win_mmr, "win_mmr", "--win-mmr", &mut errors);
    let loss_mmr = required_number(config.loss_mmr, "loss_mmr", "--loss-mmr", &mut errors);

    if let (Some(win), Some(loss)) = (win_mmr, loss_mmr) {
        if win == loss {
            errors.push(format!(
                "profile.win_mmr: must differ from loss_mmr (both are {})",
                win
            ));
        }
    }

    match (mmr_per_division, current_mmr, divisions, win_mmr, loss_mmr) {
        (Some(mmr_per_division), Some(current_mmr), Some(divisions), Some(win_mmr), Some(loss_mmr))
            if errors.is_empty() =>
        {
            Ok(ClimbProfile {
                mmr_per_division,
                current_mmr,
                divisions,
                win_mmr,
                loss_mmr,
            })
        }
        _ => Err(errors),
    }
}

fn required_number(
    value: Option<f64>,
    field: &str,
    flag: &str,
    errors: &mut Vec<String>,
) -> Option<f64> {
    match value {
        Some(v) if v.is_finite() => Some(v),
        Some(v) => {
            errors.push(format!("profile.{}: must be a finite number, got {}", field, v));
            None
        }
        None => {
            errors.push(missing(field, flag));
            None
        }
    }
}

fn missing(field: &str, flag: &str) -> String {
    format!(
        "profile.{}: missing - set it in the config file or pass {}",
        field, flag
    )
}
