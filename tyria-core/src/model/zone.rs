//! Zone points of interest — the per-map items the zone tracker
//! measures and auto-unlocks.

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// The kind of a zone item. Drives the auto-unlock thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZoneItemKind {
    /// A travel waypoint.
    Waypoint,
    /// A point of interest.
    PointOfInterest,
    /// A renown heart quest area.
    HeartQuest,
    /// A skill challenge (hero point).
    SkillChallenge,
    /// A vista.
    Vista,
    /// A dungeon entrance shown on the zone map.
    Dungeon,
}

/// A single zone point of interest.
///
/// Value equality covers id, name, kind, map, and coordinates — two
/// items from different data loads compare equal when they describe
/// the same content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneItem {
    /// Game API id.
    pub id: u32,
    /// Display name.
    pub name: String,
    /// Item kind.
    pub kind: ZoneItemKind,
    /// Map the item sits in.
    pub map_id: u32,
    /// Location in map coordinates (game inches).
    pub location: Point,
    /// Location in continent coordinates.
    pub continent_location: Point,
    /// Chat link code, if the item has one.
    pub chat_code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item() -> ZoneItem {
        ZoneItem {
            id: 554,
            name: "Phasmatis Corridor".to_string(),
            kind: ZoneItemKind::PointOfInterest,
            map_id: 15,
            location: Point::new_2d(42_000.0, 31_000.0),
            continent_location: Point::new_2d(9_800.0, 14_200.0),
            chat_code: Some("[&BCkCAAA=]".to_string()),
        }
    }

    #[test]
    fn value_equality_over_identity_fields() {
        let a = item();
        let mut b = item();
        assert_eq!(a, b);
        b.location.x += 1.0;
        assert_ne!(a, b);
    }
}
