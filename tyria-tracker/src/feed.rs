//! The live player feed.
//!
//! The running game exposes position, camera, and map identity through
//! the mumble-link shared memory block. The trackers never read that
//! block directly; they poll a [`PlayerFeed`], which an external reader
//! keeps current. [`SharedFeed`] is the standard in-process
//! implementation, also used by tests and demos to script player
//! movement.

use parking_lot::Mutex;
use std::sync::Arc;

use tyria_core::Point;

/// A read-only sample of live player/camera state.
///
/// `tick` is a monotonically increasing counter from the game client.
/// Two consecutive polls with an unchanged `tick` mean the player is
/// frozen in a loading screen or cutscene — the only liveness signal
/// the feed carries.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlayerSnapshot {
    /// Current map id, 0 when no map is loaded.
    pub map_id: u32,
    /// Player position in mumble meters.
    pub position: Point,
    /// Camera direction vector in mumble meters.
    pub camera_dir: Point,
    /// Name of the current character.
    pub character_name: String,
    /// Game client tick counter.
    pub tick: u64,
    /// False when the game is not running or no character has a map.
    pub is_valid: bool,
}

/// Source of live player samples, polled read-only each tick.
pub trait PlayerFeed: Send + Sync {
    /// The most recent snapshot. Must never block on the game.
    fn sample(&self) -> PlayerSnapshot;
}

/// A shared in-memory feed: one writer (the mumble-link reader, or a
/// test script) publishes snapshots; any number of trackers sample.
#[derive(Debug, Clone, Default)]
pub struct SharedFeed {
    current: Arc<Mutex<PlayerSnapshot>>,
}

impl SharedFeed {
    /// Create a feed that starts invalid (game not running).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a new snapshot, replacing the previous one.
    pub fn publish(&self, snapshot: PlayerSnapshot) {
        *self.current.lock() = snapshot;
    }
}

impl PlayerFeed for SharedFeed {
    fn sample(&self) -> PlayerSnapshot {
        self.current.lock().clone()
    }
}
