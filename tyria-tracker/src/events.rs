//! Events the trackers publish through the dispatch boundary.

use std::time::Duration;
use uuid::Uuid;

use tyria_core::model::ZoneItemKind;

/// A derived state change raised by a tracker.
///
/// Events carry final values only; consumers needing full state pull a
/// snapshot from the tracker instead.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackerEvent {
    /// The player entered a dungeon instance map.
    DungeonEntered {
        /// The dungeon entered.
        dungeon_id: Uuid,
        /// Canonical dungeon name.
        name: String,
    },

    /// The player left dungeon maps entirely.
    DungeonLeft,

    /// The current path was identified inside the dungeon.
    PathIdentified {
        /// The identified path.
        path_id: Uuid,
        /// Short path label, e.g. "P1".
        display_text: String,
    },

    /// A completion prerequisite point was reached (latched).
    PrereqReached {
        /// The path being run.
        path_id: Uuid,
        /// Index of the prerequisite in declaration order.
        index: usize,
    },

    /// A path was completed.
    PathCompleted {
        /// The completed path.
        path_id: Uuid,
        /// Run time at completion.
        duration: Duration,
        /// Whether this run set a new best time.
        is_best: bool,
    },

    /// The daily completion reset fired.
    DailyReset,

    /// The run timer started.
    TimerStarted,

    /// The run timer was paused.
    TimerPaused,

    /// The current zone or character changed.
    ZoneChanged {
        /// New map id.
        map_id: u32,
        /// Localized zone name, when the provider knows it.
        zone_name: Option<String>,
        /// Current character name.
        character: String,
    },

    /// A zone item was auto-unlocked.
    ItemUnlocked {
        /// Character the unlock belongs to.
        character: String,
        /// Item id.
        item_id: u32,
        /// Item display name.
        name: String,
        /// Item kind.
        kind: ZoneItemKind,
    },
}
