//! Configuration for the overlay, loadable from `tyria.toml`.

use serde::{Deserialize, Serialize};

use crate::model::ZoneItemKind;

/// Top-level overlay configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OverlayConfig {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Dungeon tracker settings.
    #[serde(default)]
    pub dungeons: DungeonsConfig,
    /// Zone-completion tracker settings.
    #[serde(default)]
    pub zones: ZonesConfig,
    /// User-data persistence settings.
    #[serde(default)]
    pub persistence: PersistenceConfig,
}

impl OverlayConfig {
    /// Load configuration from a TOML string.
    ///
    /// # Errors
    /// Returns `OverlayError::Config` if the TOML is invalid.
    pub fn from_toml(toml_str: &str) -> crate::error::Result<Self> {
        toml::from_str(toml_str).map_err(|e| crate::OverlayError::Config(e.to_string()))
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// General overlay settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Whether tracking is enabled at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Log level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            log_level: "info".to_string(),
        }
    }
}

/// Dungeon tracker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DungeonsConfig {
    /// Poll interval for the dungeon tracker, milliseconds.
    #[serde(default = "default_250")]
    pub poll_interval_ms: u64,
    /// Start the run timer automatically on dungeon entry.
    #[serde(default = "default_true")]
    pub auto_start_timer: bool,
    /// Mark paths completed automatically on completion detection.
    #[serde(default = "default_true")]
    pub auto_complete: bool,
}

impl Default for DungeonsConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 250,
            auto_start_timer: true,
            auto_complete: true,
        }
    }
}

/// Zone-completion tracker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZonesConfig {
    /// Poll interval for zone/character identity changes, milliseconds.
    #[serde(default = "default_1000")]
    pub zone_poll_interval_ms: u64,
    /// Poll interval for item distance/angle updates, milliseconds.
    #[serde(default = "default_250")]
    pub location_poll_interval_ms: u64,
    /// Whether lingering near an item unlocks it automatically.
    #[serde(default = "default_true")]
    pub auto_unlock: bool,
    /// Per-kind auto-unlock thresholds.
    #[serde(default)]
    pub thresholds: UnlockThresholds,
}

impl Default for ZonesConfig {
    fn default() -> Self {
        Self {
            zone_poll_interval_ms: 1000,
            location_poll_interval_ms: 250,
            auto_unlock: true,
            thresholds: UnlockThresholds::default(),
        }
    }
}

/// Distance + dwell requirement for auto-unlocking one item kind.
///
/// The dwell counter increments once per locations tick (250 ms by
/// default) while the player stays under `distance_ft`; the item
/// unlocks when the counter strictly exceeds `dwell_ticks`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct UnlockThreshold {
    /// Maximum distance in feet.
    pub distance_ft: f64,
    /// Consecutive in-range ticks required (0 = immediate).
    pub dwell_ticks: u32,
}

/// The per-kind threshold table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnlockThresholds {
    /// Waypoints unlock on contact.
    #[serde(default = "default_waypoint_threshold")]
    pub waypoint: UnlockThreshold,
    /// Points of interest unlock on contact.
    #[serde(default = "default_poi_threshold")]
    pub point_of_interest: UnlockThreshold,
    /// Vistas require a short linger at close range (~1.25 s).
    #[serde(default = "default_vista_threshold")]
    pub vista: UnlockThreshold,
    /// Heart quests require a long presence in the area (~22.5 s).
    #[serde(default = "default_heart_threshold")]
    pub heart_quest: UnlockThreshold,
    /// Skill challenges approximate the commune/fight time (~4 s).
    #[serde(default = "default_skill_threshold")]
    pub skill_challenge: UnlockThreshold,
}

impl UnlockThresholds {
    /// Threshold for an item kind, or `None` for kinds that never
    /// auto-unlock (dungeon entrances).
    #[must_use]
    pub fn for_kind(&self, kind: ZoneItemKind) -> Option<UnlockThreshold> {
        match kind {
            ZoneItemKind::Waypoint => Some(self.waypoint),
            ZoneItemKind::PointOfInterest => Some(self.point_of_interest),
            ZoneItemKind::Vista => Some(self.vista),
            ZoneItemKind::HeartQuest => Some(self.heart_quest),
            ZoneItemKind::SkillChallenge => Some(self.skill_challenge),
            ZoneItemKind::Dungeon => None,
        }
    }
}

impl Default for UnlockThresholds {
    fn default() -> Self {
        Self {
            waypoint: default_waypoint_threshold(),
            point_of_interest: default_poi_threshold(),
            vista: default_vista_threshold(),
            heart_quest: default_heart_threshold(),
            skill_challenge: default_skill_threshold(),
        }
    }
}

/// User-data persistence configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistenceConfig {
    /// Directory for per-install user data.
    #[serde(default = "default_user_data_dir")]
    pub user_data_dir: String,
    /// Save records on every mutation (in addition to shutdown).
    #[serde(default = "default_true")]
    pub auto_save: bool,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            user_data_dir: default_user_data_dir(),
            auto_save: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Serde default helpers
// ---------------------------------------------------------------------------

fn default_true() -> bool { true }
fn default_log_level() -> String { "info".to_string() }
fn default_user_data_dir() -> String { "UserData".to_string() }
fn default_250() -> u64 { 250 }
fn default_1000() -> u64 { 1000 }

fn default_waypoint_threshold() -> UnlockThreshold {
    UnlockThreshold { distance_ft: 75.0, dwell_ticks: 0 }
}
fn default_poi_threshold() -> UnlockThreshold {
    UnlockThreshold { distance_ft: 75.0, dwell_ticks: 0 }
}
fn default_vista_threshold() -> UnlockThreshold {
    UnlockThreshold { distance_ft: 8.0, dwell_ticks: 4 }
}
fn default_heart_threshold() -> UnlockThreshold {
    UnlockThreshold { distance_ft: 400.0, dwell_ticks: 90 }
}
fn default_skill_threshold() -> UnlockThreshold {
    UnlockThreshold { distance_ft: 25.0, dwell_ticks: 15 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_cadence() {
        let config = OverlayConfig::default();
        assert_eq!(config.dungeons.poll_interval_ms, 250);
        assert_eq!(config.zones.zone_poll_interval_ms, 1000);
        assert_eq!(config.zones.location_poll_interval_ms, 250);
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let config = OverlayConfig::from_toml(
            r#"
            [dungeons]
            auto_complete = false

            [zones.thresholds.vista]
            distance_ft = 10.0
            dwell_ticks = 8
            "#,
        )
        .expect("parse");

        assert!(!config.dungeons.auto_complete);
        assert_eq!(config.dungeons.poll_interval_ms, 250, "untouched default");
        assert!((config.zones.thresholds.vista.distance_ft - 10.0).abs() < f64::EPSILON);
        assert_eq!(config.zones.thresholds.vista.dwell_ticks, 8);
        assert_eq!(config.zones.thresholds.heart_quest.dwell_ticks, 90);
    }

    #[test]
    fn invalid_toml_is_a_config_error() {
        let err = OverlayConfig::from_toml("[dungeons\n").expect_err("must fail");
        assert!(matches!(err, crate::OverlayError::Config(_)));
    }

    #[test]
    fn dungeon_entrances_never_auto_unlock() {
        let thresholds = UnlockThresholds::default();
        assert!(thresholds.for_kind(ZoneItemKind::Dungeon).is_none());
        assert!(thresholds.for_kind(ZoneItemKind::Vista).is_some());
    }
}
