//! Static reference data: the immutable descriptive records the
//! trackers match live state against.
//!
//! Everything in this module is loaded once at startup and never
//! mutated afterwards, apart from display names resolved from a
//! localization lookup.

pub mod builtin;
pub mod dungeon;
pub mod event;
pub mod zone;

pub use dungeon::{Dungeon, DungeonPath};
pub use event::{EventState, MetaEvent, MetaEventStage, WorldEvent};
pub use zone::{ZoneItem, ZoneItemKind};

use std::collections::HashSet;

use uuid::Uuid;

/// External static-data collaborator surface.
///
/// Implementations load the reference tables and resolve localized
/// names; the core ships [`builtin::builtin_data`] for tests and demos.
pub trait ReferenceDataProvider {
    /// Idempotent load of the dungeon/event/zone tables.
    fn load_table(&self) -> crate::Result<StaticData>;

    /// Localized display name for a dungeon or event id.
    fn localized_name(&self, id: Uuid) -> Option<String>;

    /// Display name of a zone by map id.
    fn zone_name(&self, map_id: u32) -> Option<String>;
}

/// The loaded reference tables, plus the lookups the trackers poll.
#[derive(Debug, Clone, Default)]
pub struct StaticData {
    /// All known dungeons, in declaration order.
    pub dungeons: Vec<Dungeon>,
    /// All known zone items.
    pub zone_items: Vec<ZoneItem>,
    /// All known recurring world events.
    pub events: Vec<WorldEvent>,
    /// All known meta events.
    pub meta_events: Vec<MetaEvent>,
}

impl StaticData {
    /// Set of every map id that is a dungeon path instance.
    #[must_use]
    pub fn path_map_ids(&self) -> HashSet<u32> {
        self.dungeons
            .iter()
            .flat_map(|d| d.paths.iter().map(|p| p.instance_map_id))
            .collect()
    }

    /// The dungeon owning a path with the given instance map id, if any.
    ///
    /// Declaration order decides when two dungeons share a map id
    /// (they do not in practice).
    #[must_use]
    pub fn dungeon_for_map(&self, map_id: u32) -> Option<&Dungeon> {
        self.dungeons
            .iter()
            .find(|d| d.paths.iter().any(|p| p.instance_map_id == map_id))
    }

    /// Look up a dungeon by id.
    #[must_use]
    pub fn dungeon(&self, id: Uuid) -> Option<&Dungeon> {
        self.dungeons.iter().find(|d| d.id == id)
    }

    /// All zone items located in the given map.
    #[must_use]
    pub fn items_for_map(&self, map_id: u32) -> Vec<&ZoneItem> {
        self.zone_items
            .iter()
            .filter(|i| i.map_id == map_id)
            .collect()
    }
}
