//! Dungeon detection and speedrun tracking.
//!
//! The tracker samples the player feed on a fixed interval and drives a
//! per-instance state machine:
//!
//! ```text
//! OutOfDungeon ──map matches──► DungeonKnown ──identifying point──►
//! PathKnown ──end point + prereqs + frozen tick──► Completed
//! ```
//!
//! Entering any dungeon instance map resets the run timer (and starts
//! it when auto-start is configured). Completion requires the player to
//! stand in the path's end trigger with every prerequisite point
//! latched while the liveness tick is frozen — the exit cinematic is
//! the only time the game stops advancing the tick inside an instance.
//!
//! Completions are persisted per UTC calendar date; best times are
//! persisted indefinitely.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use uuid::Uuid;

use tyria_core::config::{DungeonsConfig, OverlayConfig};
use tyria_core::detect::{is_player_in_path, near_point, reached_end_point};
use tyria_core::model::{DungeonPath, StaticData};
use tyria_core::persistence::{DUNGEON_USER_DATA, UserDataStore};
use tyria_core::units::meters_to_units;
use tyria_core::user_state::DungeonUserData;
use tyria_core::Result;

use crate::dispatch::Dispatcher;
use crate::events::TrackerEvent;
use crate::feed::{PlayerFeed, PlayerSnapshot};
use crate::poller::{Poller, PollerStats};

// ---------------------------------------------------------------------------
// Run timer
// ---------------------------------------------------------------------------

/// Wall-clock run timer with pause support.
#[derive(Debug, Clone, Copy, Default)]
struct RunTimer {
    accumulated: Duration,
    started_at: Option<DateTime<Utc>>,
}

impl RunTimer {
    fn reset(&mut self) {
        *self = Self::default();
    }

    fn start(&mut self, now: DateTime<Utc>) {
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
    }

    fn pause(&mut self, now: DateTime<Utc>) {
        if let Some(started) = self.started_at.take() {
            self.accumulated += (now - started).to_std().unwrap_or_default();
        }
    }

    fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    fn elapsed(&self, now: DateTime<Utc>) -> Duration {
        match self.started_at {
            Some(started) => self.accumulated + (now - started).to_std().unwrap_or_default(),
            None => self.accumulated,
        }
    }
}

// ---------------------------------------------------------------------------
// Progress state machine
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
enum Progress {
    OutOfDungeon,
    DungeonKnown {
        dungeon_id: Uuid,
    },
    PathKnown {
        dungeon_id: Uuid,
        path_id: Uuid,
        /// One latch per prerequisite point, declaration order.
        /// Latches never revert within the same path entry.
        prereqs_met: Vec<bool>,
    },
    Completed {
        dungeon_id: Uuid,
        path_id: Uuid,
    },
}

/// A consistent view of the tracker's derived state, cloned under the
/// tracker's lock — readers never observe a partial update.
#[derive(Debug, Clone, Default)]
pub struct DungeonState {
    /// Current dungeon, if the player is in one.
    pub dungeon_id: Option<Uuid>,
    /// Display name of the current dungeon.
    pub dungeon_name: Option<String>,
    /// Identified path, once known.
    pub path_id: Option<Uuid>,
    /// Short label of the identified path.
    pub path_label: Option<String>,
    /// Prerequisite latches of the identified path.
    pub prereqs_met: Vec<bool>,
    /// Whether the current path finished this instance visit.
    pub path_finished: bool,
    /// Whether the run timer is running.
    pub timer_running: bool,
    /// Elapsed run time.
    pub elapsed: Duration,
}

struct TrackState {
    user: DungeonUserData,
    progress: Progress,
    timer: RunTimer,
    current_map: Option<u32>,
    last_tick: Option<u64>,
}

struct Inner {
    data: StaticData,
    path_maps: HashSet<u32>,
    config: DungeonsConfig,
    auto_save: bool,
    feed: Arc<dyn PlayerFeed>,
    dispatcher: Arc<Dispatcher>,
    store: UserDataStore,
    state: Mutex<TrackState>,
}

// ---------------------------------------------------------------------------
// DungeonTracker
// ---------------------------------------------------------------------------

/// The dungeon polling controller.
///
/// Owns one [`Poller`] (default 250 ms). `start`/`stop` are
/// reference counted; `shutdown` is terminal and flushes user state.
pub struct DungeonTracker {
    inner: Arc<Inner>,
    poller: Poller,
}

impl DungeonTracker {
    /// Build a tracker and spawn its (disarmed) poller.
    ///
    /// User state is loaded from `store` immediately; a missing or
    /// corrupt record starts fresh.
    #[must_use]
    pub fn new(
        data: StaticData,
        config: &OverlayConfig,
        feed: Arc<dyn PlayerFeed>,
        dispatcher: Arc<Dispatcher>,
        store: UserDataStore,
    ) -> Self {
        let user: DungeonUserData = store.load(DUNGEON_USER_DATA);
        info!(
            completed = user.completed_paths.len(),
            best_times = user.best_times.len(),
            "Dungeon tracker initialized"
        );

        let inner = Arc::new(Inner {
            path_maps: data.path_map_ids(),
            data,
            config: config.dungeons.clone(),
            auto_save: config.persistence.auto_save,
            feed,
            dispatcher,
            store,
            state: Mutex::new(TrackState {
                user,
                progress: Progress::OutOfDungeon,
                timer: RunTimer::default(),
                current_map: None,
                last_tick: None,
            }),
        });

        let tick_inner = Arc::clone(&inner);
        let poller = Poller::spawn(
            "dungeons",
            Duration::from_millis(config.dungeons.poll_interval_ms),
            move || {
                let snapshot = tick_inner.feed.sample();
                tick_inner.process(&snapshot, Utc::now())
            },
        );

        Self { inner, poller }
    }

    /// Arm the poller (refcounted).
    pub fn start(&self) {
        self.poller.start();
    }

    /// Release one logical owner of the poller.
    pub fn stop(&self) {
        self.poller.stop();
    }

    /// Terminal shutdown: stop all polling and flush user state.
    pub fn shutdown(&self) {
        self.poller.shutdown();
        let user = self.inner.state.lock().user.clone();
        if let Err(e) = self.inner.store.save(&user, DUNGEON_USER_DATA) {
            tracing::warn!(error = %e, "Failed to flush dungeon user data on shutdown");
        }
    }

    /// Evaluate one sample synchronously.
    ///
    /// The poller calls this on its worker thread; hosts with their own
    /// scheduler can drive the tracker through it directly instead of
    /// arming the poller.
    ///
    /// # Errors
    ///
    /// Returns an error when persisting a mutation fails; the tracking
    /// state itself is already updated at that point.
    pub fn process_sample(&self, snapshot: &PlayerSnapshot, now: DateTime<Utc>) -> Result<()> {
        self.inner.process(snapshot, now)
    }

    /// Current derived state.
    #[must_use]
    pub fn state(&self) -> DungeonState {
        self.inner.view(Utc::now())
    }

    /// Derived state with elapsed time measured at `now`.
    #[must_use]
    pub fn state_at(&self, now: DateTime<Utc>) -> DungeonState {
        self.inner.view(now)
    }

    /// Whether a path is completed since the last daily reset.
    #[must_use]
    pub fn is_path_completed(&self, path_id: Uuid) -> bool {
        self.inner.state.lock().user.is_completed(path_id)
    }

    /// Best recorded time for a path, if any.
    #[must_use]
    pub fn best_time(&self, path_id: Uuid) -> Option<tyria_core::user_state::BestTime> {
        self.inner.state.lock().user.best_times.get(&path_id).copied()
    }

    /// Hide or unhide a dungeon from display layers.
    ///
    /// # Errors
    ///
    /// Returns an error when persisting the change fails.
    pub fn set_dungeon_hidden(&self, dungeon_id: Uuid, hidden: bool) -> Result<()> {
        let user = {
            let mut st = self.inner.state.lock();
            let changed = if hidden {
                st.user.hidden_dungeons.insert(dungeon_id)
            } else {
                st.user.hidden_dungeons.remove(&dungeon_id)
            };
            if !changed {
                return Ok(());
            }
            st.user.clone()
        };
        self.inner.persist(&user)
    }

    /// Pause the run timer manually.
    pub fn pause_timer(&self) {
        let mut st = self.inner.state.lock();
        if st.timer.is_running() {
            st.timer.pause(Utc::now());
            drop(st);
            self.inner.dispatcher.publish(&TrackerEvent::TimerPaused);
        }
    }

    /// Resume the run timer manually.
    pub fn resume_timer(&self) {
        let mut st = self.inner.state.lock();
        if !st.timer.is_running() {
            st.timer.start(Utc::now());
            drop(st);
            self.inner.dispatcher.publish(&TrackerEvent::TimerStarted);
        }
    }

    /// Poller counters, for diagnostics.
    #[must_use]
    pub fn poller_stats(&self) -> PollerStats {
        self.poller.stats()
    }
}

impl Inner {
    fn find_path(&self, dungeon_id: Uuid, path_id: Uuid) -> Option<&DungeonPath> {
        self.data
            .dungeon(dungeon_id)?
            .paths
            .iter()
            .find(|p| p.id == path_id)
    }

    fn view(&self, now: DateTime<Utc>) -> DungeonState {
        let st = self.state.lock();
        let mut view = DungeonState {
            timer_running: st.timer.is_running(),
            elapsed: st.timer.elapsed(now),
            ..DungeonState::default()
        };

        let (dungeon_id, path_id, prereqs, finished) = match &st.progress {
            Progress::OutOfDungeon => (None, None, Vec::new(), false),
            Progress::DungeonKnown { dungeon_id } => (Some(*dungeon_id), None, Vec::new(), false),
            Progress::PathKnown {
                dungeon_id,
                path_id,
                prereqs_met,
            } => (Some(*dungeon_id), Some(*path_id), prereqs_met.clone(), false),
            Progress::Completed {
                dungeon_id,
                path_id,
            } => (Some(*dungeon_id), Some(*path_id), Vec::new(), true),
        };

        view.dungeon_id = dungeon_id;
        view.path_id = path_id;
        view.prereqs_met = prereqs;
        view.path_finished = finished;
        if let Some(id) = dungeon_id {
            if let Some(dungeon) = self.data.dungeon(id) {
                view.dungeon_name = Some(dungeon.shown_name().to_string());
                if let Some(pid) = path_id {
                    view.path_label = dungeon
                        .paths
                        .iter()
                        .find(|p| p.id == pid)
                        .map(|p| p.display_text.clone());
                }
            }
        }
        view
    }

    fn process(&self, snapshot: &PlayerSnapshot, now: DateTime<Utc>) -> Result<()> {
        let mut events: Vec<TrackerEvent> = Vec::new();
        let mut dirty = false;

        let user_copy = {
            let mut st = self.state.lock();

            if st.user.apply_daily_reset(now) {
                info!("Daily reset: cleared path completions");
                events.push(TrackerEvent::DailyReset);
                dirty = true;
            }

            if snapshot.is_valid {
                let tick_frozen = st.last_tick == Some(snapshot.tick);
                st.last_tick = Some(snapshot.tick);
                self.advance(&mut st, snapshot, now, tick_frozen, &mut events, &mut dirty);
            } else {
                // Game gone: the next valid sample starts a fresh
                // liveness window.
                st.last_tick = None;
            }

            dirty.then(|| st.user.clone())
        };

        self.dispatcher.publish_all(&events);

        match user_copy {
            Some(user) if self.auto_save => self.persist(&user),
            _ => Ok(()),
        }
    }

    /// One step of the state machine. Called with the state lock held.
    #[allow(clippy::too_many_lines)]
    fn advance(
        &self,
        st: &mut TrackState,
        snapshot: &PlayerSnapshot,
        now: DateTime<Utc>,
        tick_frozen: bool,
        events: &mut Vec<TrackerEvent>,
        dirty: &mut bool,
    ) {
        let map_id = snapshot.map_id;
        let pos = meters_to_units(snapshot.position);

        if !self.path_maps.contains(&map_id) {
            if !matches!(st.progress, Progress::OutOfDungeon) {
                debug!(map_id, "Left dungeon maps");
                st.progress = Progress::OutOfDungeon;
                st.timer.reset();
                events.push(TrackerEvent::DungeonLeft);
            }
            st.current_map = Some(map_id);
            return;
        }

        let Some(dungeon) = self.data.dungeon_for_map(map_id) else {
            return;
        };

        // A new instance map is a fresh entry, even within the same
        // dungeon: prereq latches and the timer start over.
        if st.current_map != Some(map_id) {
            info!(dungeon = %dungeon.name, map_id, "Entered dungeon instance");
            st.progress = Progress::DungeonKnown {
                dungeon_id: dungeon.id,
            };
            st.timer.reset();
            events.push(TrackerEvent::DungeonEntered {
                dungeon_id: dungeon.id,
                name: dungeon.name.clone(),
            });
            if self.config.auto_start_timer {
                st.timer.start(now);
                events.push(TrackerEvent::TimerStarted);
            }
            st.current_map = Some(map_id);
        }

        match st.progress.clone() {
            Progress::DungeonKnown { dungeon_id } => {
                // First matching path wins, declaration order.
                let matched = dungeon
                    .paths
                    .iter()
                    .find(|p| is_player_in_path(p, map_id, &pos));
                if let Some(path) = matched {
                    debug!(path = %path.display_text, "Path identified");
                    st.progress = Progress::PathKnown {
                        dungeon_id,
                        path_id: path.id,
                        prereqs_met: vec![false; path.completion_prereq_points.len()],
                    };
                    events.push(TrackerEvent::PathIdentified {
                        path_id: path.id,
                        display_text: path.display_text.clone(),
                    });
                }
            }

            Progress::PathKnown {
                dungeon_id,
                path_id,
                mut prereqs_met,
            } => {
                let Some(path) = self.find_path(dungeon_id, path_id) else {
                    return;
                };

                for (index, point) in path.completion_prereq_points.iter().enumerate() {
                    if !prereqs_met[index] && near_point(point, path.detection_radius, &pos) {
                        debug!(path = %path.display_text, index, "Prerequisite reached");
                        prereqs_met[index] = true;
                        events.push(TrackerEvent::PrereqReached { path_id, index });
                    }
                }

                let all_met = prereqs_met.iter().all(|&m| m);
                if all_met && tick_frozen && reached_end_point(path, &pos) {
                    self.complete_path(st, dungeon_id, path_id, now, events, dirty);
                } else {
                    st.progress = Progress::PathKnown {
                        dungeon_id,
                        path_id,
                        prereqs_met,
                    };
                }
            }

            // Completed is terminal until the map changes;
            // DungeonKnown re-entry is handled above.
            Progress::Completed { .. } | Progress::OutOfDungeon => {}
        }
    }

    fn complete_path(
        &self,
        st: &mut TrackState,
        dungeon_id: Uuid,
        path_id: Uuid,
        now: DateTime<Utc>,
        events: &mut Vec<TrackerEvent>,
        dirty: &mut bool,
    ) {
        st.timer.pause(now);
        events.push(TrackerEvent::TimerPaused);
        let elapsed = st.timer.elapsed(now);

        let is_best = st.user.record_best_time(path_id, elapsed, now);
        if is_best {
            *dirty = true;
        }

        if self.config.auto_complete && st.user.mark_completed(path_id) {
            *dirty = true;
        }

        info!(
            path_id = %path_id,
            elapsed_s = elapsed.as_secs(),
            is_best,
            "Path completed"
        );
        events.push(TrackerEvent::PathCompleted {
            path_id,
            duration: elapsed,
            is_best,
        });
        st.progress = Progress::Completed {
            dungeon_id,
            path_id,
        };
    }

    fn persist(&self, user: &DungeonUserData) -> Result<()> {
        self.store.save(user, DUNGEON_USER_DATA)
    }
}
