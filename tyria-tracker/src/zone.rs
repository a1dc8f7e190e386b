//! Overworld zone tracking and proximity auto-unlock.
//!
//! Two cadences share one piece of state:
//!
//! * the zone poller (default 1 s) watches for map or character
//!   changes and reloads the item set for the new zone;
//! * the location poller (default 250 ms) measures distance and
//!   camera bearing against every loaded item and drives the dwell
//!   counters behind auto-unlock.
//!
//! Skill challenges are shared account-wide in the game but tracked
//! per character here, matching the rest of the unlock model.

use ordered_float::OrderedFloat;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use tyria_core::config::{OverlayConfig, ZonesConfig};
use tyria_core::detect::{ItemMeasurement, measure_item};
use tyria_core::model::{ReferenceDataProvider, StaticData, ZoneItem};
use tyria_core::persistence::{UserDataStore, ZONE_USER_DATA};
use tyria_core::user_state::ZoneUserData;
use tyria_core::Result;

use crate::dispatch::Dispatcher;
use crate::events::TrackerEvent;
use crate::feed::{PlayerFeed, PlayerSnapshot};
use crate::poller::{Poller, PollerStats};

/// One zone item with its live measurement, as shown to display layers.
#[derive(Debug, Clone)]
pub struct ZoneItemView {
    /// The static item record.
    pub item: ZoneItem,
    /// Distance and bearing from the latest location poll, if the
    /// item has been measured since the zone loaded.
    pub measurement: Option<ItemMeasurement>,
    /// Whether the current character has unlocked the item.
    pub unlocked: bool,
}

/// Snapshot of the zone tracker's derived state.
#[derive(Debug, Clone, Default)]
pub struct ZoneState {
    /// Current map id (0 before the first valid sample).
    pub map_id: u32,
    /// Localized zone name, when the provider knows it.
    pub zone_name: Option<String>,
    /// Current character name.
    pub character: String,
    /// Items in the zone, nearest first.
    pub items: Vec<ZoneItemView>,
}

#[derive(Debug, Clone, Copy, Default)]
struct ItemLive {
    measurement: Option<ItemMeasurement>,
    dwell: u32,
}

struct TrackState {
    user: ZoneUserData,
    map_id: u32,
    zone_name: Option<String>,
    character: String,
    items: Vec<ZoneItem>,
    live: HashMap<u32, ItemLive>,
}

struct Inner {
    data: StaticData,
    provider: Arc<dyn ReferenceDataProvider + Send + Sync>,
    config: ZonesConfig,
    auto_save: bool,
    feed: Arc<dyn PlayerFeed>,
    dispatcher: Arc<Dispatcher>,
    store: UserDataStore,
    state: Mutex<TrackState>,
}

/// The zone polling controller.
///
/// Owns two [`Poller`]s; `start`/`stop` arm and disarm both together.
pub struct ZoneTracker {
    inner: Arc<Inner>,
    zone_poller: Poller,
    location_poller: Poller,
}

impl ZoneTracker {
    /// Build a tracker and spawn its (disarmed) pollers.
    #[must_use]
    pub fn new(
        data: StaticData,
        provider: Arc<dyn ReferenceDataProvider + Send + Sync>,
        config: &OverlayConfig,
        feed: Arc<dyn PlayerFeed>,
        dispatcher: Arc<Dispatcher>,
        store: UserDataStore,
    ) -> Self {
        let user: ZoneUserData = store.load(ZONE_USER_DATA);
        info!(
            characters = user.unlocked.len(),
            hidden = user.hidden_items.len(),
            "Zone tracker initialized"
        );

        let inner = Arc::new(Inner {
            data,
            provider,
            config: config.zones.clone(),
            auto_save: config.persistence.auto_save,
            feed,
            dispatcher,
            store,
            state: Mutex::new(TrackState {
                user,
                map_id: 0,
                zone_name: None,
                character: String::new(),
                items: Vec::new(),
                live: HashMap::new(),
            }),
        });

        let zone_inner = Arc::clone(&inner);
        let zone_poller = Poller::spawn(
            "zone-identity",
            Duration::from_millis(config.zones.zone_poll_interval_ms),
            move || {
                let snapshot = zone_inner.feed.sample();
                zone_inner.process_zone(&snapshot);
                Ok(())
            },
        );

        let location_inner = Arc::clone(&inner);
        let location_poller = Poller::spawn(
            "zone-location",
            Duration::from_millis(config.zones.location_poll_interval_ms),
            move || {
                let snapshot = location_inner.feed.sample();
                location_inner.process_location(&snapshot)
            },
        );

        Self {
            inner,
            zone_poller,
            location_poller,
        }
    }

    /// Arm both pollers (refcounted).
    pub fn start(&self) {
        self.zone_poller.start();
        self.location_poller.start();
    }

    /// Release one logical owner of both pollers.
    pub fn stop(&self) {
        self.zone_poller.stop();
        self.location_poller.stop();
    }

    /// Terminal shutdown: stop all polling and flush user state.
    pub fn shutdown(&self) {
        self.zone_poller.shutdown();
        self.location_poller.shutdown();
        let user = self.inner.state.lock().user.clone();
        if let Err(e) = self.inner.store.save(&user, ZONE_USER_DATA) {
            tracing::warn!(error = %e, "Failed to flush zone user data on shutdown");
        }
    }

    /// Evaluate one identity sample synchronously (zone cadence).
    pub fn process_zone_sample(&self, snapshot: &PlayerSnapshot) {
        self.inner.process_zone(snapshot);
    }

    /// Evaluate one location sample synchronously (location cadence).
    ///
    /// # Errors
    ///
    /// Returns an error when persisting an unlock fails; the unlock
    /// itself is already applied in memory at that point.
    pub fn process_location_sample(&self, snapshot: &PlayerSnapshot) -> Result<()> {
        self.inner.process_location(snapshot)
    }

    /// Current derived state, items sorted nearest first.
    #[must_use]
    pub fn state(&self) -> ZoneState {
        let st = self.inner.state.lock();
        let mut items: Vec<ZoneItemView> = st
            .items
            .iter()
            .map(|item| ZoneItemView {
                item: item.clone(),
                measurement: st.live.get(&item.id).and_then(|l| l.measurement),
                unlocked: st.user.is_unlocked(&st.character, item.id),
            })
            .collect();
        items.sort_by_key(|view| {
            view.measurement
                .map_or(OrderedFloat(f64::INFINITY), |m| {
                    OrderedFloat(m.distance.units())
                })
        });

        ZoneState {
            map_id: st.map_id,
            zone_name: st.zone_name.clone(),
            character: st.character.clone(),
            items,
        }
    }

    /// Whether the current character has unlocked an item.
    #[must_use]
    pub fn is_unlocked(&self, item_id: u32) -> bool {
        let st = self.inner.state.lock();
        st.user.is_unlocked(&st.character, item_id)
    }

    /// Hide an item from display layers and drop it from the loaded set.
    ///
    /// # Errors
    ///
    /// Returns an error when persisting the change fails.
    pub fn hide_item(&self, item_id: u32) -> Result<()> {
        let user = {
            let mut st = self.inner.state.lock();
            if !st.user.hide(item_id) {
                return Ok(());
            }
            st.items.retain(|i| i.id != item_id);
            st.live.remove(&item_id);
            st.user.clone()
        };
        self.inner.store.save(&user, ZONE_USER_DATA)
    }

    /// Poller counters, for diagnostics.
    #[must_use]
    pub fn poller_stats(&self) -> (PollerStats, PollerStats) {
        (self.zone_poller.stats(), self.location_poller.stats())
    }
}

impl Inner {
    /// Zone-cadence tick: reload items when the map or character changes.
    fn process_zone(&self, snapshot: &PlayerSnapshot) {
        if !snapshot.is_valid {
            return;
        }

        let event = {
            let mut st = self.state.lock();
            if st.map_id == snapshot.map_id && st.character == snapshot.character_name {
                return;
            }

            st.map_id = snapshot.map_id;
            st.character.clone_from(&snapshot.character_name);
            st.zone_name = self.provider.zone_name(snapshot.map_id);
            st.items = self
                .data
                .items_for_map(snapshot.map_id)
                .into_iter()
                .filter(|i| !st.user.hidden_items.contains(&i.id))
                .cloned()
                .collect();
            // Fresh dwell counters for the new zone.
            st.live.clear();

            info!(
                map_id = snapshot.map_id,
                zone = st.zone_name.as_deref().unwrap_or("?"),
                character = %st.character,
                items = st.items.len(),
                "Zone changed"
            );
            TrackerEvent::ZoneChanged {
                map_id: snapshot.map_id,
                zone_name: st.zone_name.clone(),
                character: st.character.clone(),
            }
        };
        self.dispatcher.publish(&event);
    }

    /// Location-cadence tick: measure every item, advance dwell
    /// counters, unlock past the threshold.
    fn process_location(&self, snapshot: &PlayerSnapshot) -> Result<()> {
        if !snapshot.is_valid {
            return Ok(());
        }

        let mut events: Vec<TrackerEvent> = Vec::new();
        let user_copy = {
            let mut st = self.state.lock();
            // The identity poller has not seen this map yet; measuring
            // stale items against the new position is meaningless.
            if st.map_id != snapshot.map_id || st.items.is_empty() {
                return Ok(());
            }

            let mut dirty = false;
            let TrackState {
                user,
                character,
                items,
                live,
                ..
            } = &mut *st;

            for item in items.iter() {
                let measurement = measure_item(snapshot.position, snapshot.camera_dir, item);
                let entry = live.entry(item.id).or_default();
                entry.measurement = Some(measurement);

                if !self.config.auto_unlock {
                    continue;
                }
                let Some(threshold) = self.config.thresholds.for_kind(item.kind) else {
                    continue;
                };
                if user.is_unlocked(character, item.id) {
                    entry.dwell = 0;
                    continue;
                }

                if measurement.distance.feet() < threshold.distance_ft {
                    entry.dwell += 1;
                    if entry.dwell > threshold.dwell_ticks && user.unlock(character, item.id) {
                        info!(
                            character = %character,
                            item = %item.name,
                            kind = ?item.kind,
                            "Item unlocked"
                        );
                        entry.dwell = 0;
                        dirty = true;
                        events.push(TrackerEvent::ItemUnlocked {
                            character: character.clone(),
                            item_id: item.id,
                            name: item.name.clone(),
                            kind: item.kind,
                        });
                    }
                } else if entry.dwell != 0 {
                    debug!(item = %item.name, "Left unlock range, dwell reset");
                    entry.dwell = 0;
                }
            }

            dirty.then(|| st.user.clone())
        };

        self.dispatcher.publish_all(&events);

        match user_copy {
            Some(user) if self.auto_save => self.store.save(&user, ZONE_USER_DATA),
            _ => Ok(()),
        }
    }
}
