//! Dungeon and dungeon-path records.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::{DetectionPoint, Point};

/// A dungeon: a world-map entrance plus its explorable/story paths.
///
/// Identity is `id`. Immutable after load except for `display_name`,
/// which a localization lookup populates asynchronously.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dungeon {
    /// Stable identity.
    pub id: Uuid,
    /// Canonical (untranslated) name.
    pub name: String,
    /// Localized display name, if resolved.
    #[serde(skip)]
    pub display_name: Option<String>,
    /// The overworld map the entrance sits in.
    pub world_map_id: u32,
    /// Minimum character level for the story path.
    pub min_level: u8,
    /// Chat link code of the nearest waypoint.
    pub waypoint_code: String,
    /// Paths, in declaration order (order matters for detection).
    pub paths: Vec<DungeonPath>,
}

impl Dungeon {
    /// Name to show: localized if available, canonical otherwise.
    #[must_use]
    pub fn shown_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }
}

/// A single story or explorable path through a dungeon.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DungeonPath {
    /// Stable identity.
    pub id: Uuid,
    /// Ordinal within the dungeon (0 = story).
    pub path_number: u32,
    /// The instanced map this path runs in.
    pub instance_map_id: u32,
    /// Short label, e.g. "P1".
    pub display_text: String,
    /// Gold reward in copper.
    pub gold_reward: u32,
    /// Trigger volume at the end of the path.
    pub end_point: DetectionPoint,
    /// Points that distinguish this path from others sharing the map.
    ///
    /// Empty means map-id equality alone is authoritative.
    pub identifying_points: Vec<Point>,
    /// Points that must all be visited before the end point counts.
    pub completion_prereq_points: Vec<Point>,
    /// Radius used for identifying and prerequisite points.
    pub detection_radius: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shown_name_prefers_localized() {
        let mut d = Dungeon {
            id: Uuid::new_v4(),
            name: "Ascalonian Catacombs".to_string(),
            display_name: None,
            world_map_id: 19,
            min_level: 30,
            waypoint_code: "[&BIYBAAA=]".to_string(),
            paths: vec![],
        };
        assert_eq!(d.shown_name(), "Ascalonian Catacombs");
        d.display_name = Some("Catacombes d'Ascalon".to_string());
        assert_eq!(d.shown_name(), "Catacombes d'Ascalon");
    }
}
