use serde::{Deserialize, Serialize};

/// Top-level config file.
///
/// Example YAML:
/// ```yaml
/// profile:
///   mmr_per_division: 100
///   current_mmr: 250
///   divisions: 5
///   win_mmr: 20
///   loss_mmr: -15
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub profile: ProfileConfig,
}

/// Ladder parameters for a climb. Every field is optional here so that the
/// file and the command line can each supply part of the profile.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ProfileConfig {
    /// Rating points per division
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mmr_per_division: Option<f64>,

    /// Current rating of the player
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_mmr: Option<f64>,

    /// Number of divisions to climb
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub divisions: Option<u32>,

    /// Rating gained per win
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub win_mmr: Option<f64>,

    /// Signed rating change per loss (negative when rating is lost, e.g. -15)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loss_mmr: Option<f64>,
}

impl ProfileConfig {
    /// Overlay `overrides` on top of `self`. A value present in `overrides`
    /// wins; missing values fall back to `self`.
    pub fn merge(self, overrides: ProfileConfig) -> ProfileConfig {
        ProfileConfig {
            mmr_per_division: overrides.mmr_per_division.or(self.mmr_per_division),
            current_mmr: overrides.current_mmr.or(self.current_mmr),
            divisions: overrides.divisions.or(self.divisions),
            win_mmr: overrides.win_mmr.or(self.win_mmr),
            loss_mmr: overrides.loss_mmr.or(self.loss_mmr),
        }
    }
}
