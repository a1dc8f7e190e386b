//! End-to-end scenarios driving both trackers through the shared feed,
//! the way an overlay host wires them together.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};

use tyria_core::Point;
use tyria_core::config::OverlayConfig;
use tyria_core::model::builtin::{
    AC_EXPLORABLE_MAP_ID, AC_P1_ID, BuiltinProvider, QUEENSDALE_MAP_ID, builtin_data,
};
use tyria_core::persistence::UserDataStore;
use tyria_core::units::INCHES_PER_METER;
use tyria_tracker::{
    Dispatcher, DungeonTracker, PlayerFeed, PlayerSnapshot, SharedFeed, TrackerEvent, ZoneTracker,
};

fn to_meters(p: Point) -> Point {
    p.scaled(1.0 / INCHES_PER_METER)
}

fn at(secs: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, 9, 0, 0).single().expect("valid")
        + chrono::Duration::seconds(i64::from(secs))
}

fn sample(map_id: u32, pos_units: Point, tick: u64) -> PlayerSnapshot {
    PlayerSnapshot {
        map_id,
        position: to_meters(pos_units),
        camera_dir: Point::new_2d(1.0, 0.0),
        character_name: "Logan".to_string(),
        tick,
        is_valid: true,
    }
}

struct Harness {
    feed: Arc<SharedFeed>,
    dungeons: DungeonTracker,
    zones: ZoneTracker,
    rx: std::sync::mpsc::Receiver<TrackerEvent>,
    _dir: tempfile::TempDir,
}

fn harness() -> Harness {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = UserDataStore::open(dir.path()).expect("store");
    let feed = Arc::new(SharedFeed::new());
    let dispatcher = Arc::new(Dispatcher::new());
    let rx = dispatcher.subscribe();
    let config = OverlayConfig::default();

    let dungeons = DungeonTracker::new(
        builtin_data(),
        &config,
        feed.clone(),
        dispatcher.clone(),
        store.clone(),
    );
    let zones = ZoneTracker::new(
        builtin_data(),
        Arc::new(BuiltinProvider),
        &config,
        feed.clone(),
        dispatcher,
        store,
    );

    Harness {
        feed,
        dungeons,
        zones,
        rx,
        _dir: dir,
    }
}

#[test]
fn speedrun_from_overworld_to_completion() {
    let h = harness();
    let data = builtin_data();
    let p1 = &data.dungeons[0].paths[1];
    assert_eq!(p1.id, AC_P1_ID);

    // In Queensdale: the zone tracker loads items, the dungeon
    // tracker stays out of dungeon state.
    h.feed.publish(sample(QUEENSDALE_MAP_ID, Point::ORIGIN, 1));
    h.zones.process_zone_sample(&h.feed.sample());
    h.dungeons
        .process_sample(&h.feed.sample(), at(0))
        .expect("tick");
    assert_eq!(h.zones.state().items.len(), 5);
    assert!(h.dungeons.state_at(at(0)).dungeon_id.is_none());

    // Zone into AC explorable at the P1 identifier: enter + identify
    // in one poll; the timer auto-starts.
    h.feed
        .publish(sample(AC_EXPLORABLE_MAP_ID, p1.identifying_points[0], 2));
    h.dungeons
        .process_sample(&h.feed.sample(), at(10))
        .expect("tick");
    let state = h.dungeons.state_at(at(10));
    assert_eq!(state.path_id, Some(AC_P1_ID));
    assert!(state.timer_running);

    // Five minutes later the party reaches the end boss room while
    // the game is still ticking; nothing completes yet.
    h.feed.publish(sample(AC_EXPLORABLE_MAP_ID, p1.end_point.center, 900));
    h.dungeons
        .process_sample(&h.feed.sample(), at(300))
        .expect("tick");
    assert!(!h.dungeons.state_at(at(300)).path_finished);

    // The end cinematic freezes the tick for one poll: completion.
    h.feed.publish(sample(AC_EXPLORABLE_MAP_ID, p1.end_point.center, 900));
    h.dungeons
        .process_sample(&h.feed.sample(), at(310))
        .expect("tick");

    let state = h.dungeons.state_at(at(310));
    assert!(state.path_finished);
    assert!(!state.timer_running);
    assert_eq!(state.elapsed, Duration::from_secs(300));
    assert!(h.dungeons.is_path_completed(AC_P1_ID));

    let best = h.dungeons.best_time(AC_P1_ID).expect("best recorded");
    assert_eq!(best.duration, Duration::from_secs(300));

    // The event stream tells the same story, in order.
    let kinds: Vec<TrackerEvent> = h.rx.try_iter().collect();
    let position = |probe: fn(&TrackerEvent) -> bool| {
        kinds.iter().position(probe).expect("event present")
    };
    let entered = position(|e| matches!(e, TrackerEvent::DungeonEntered { .. }));
    let identified = position(|e| matches!(e, TrackerEvent::PathIdentified { .. }));
    let completed = position(|e| {
        matches!(
            e,
            TrackerEvent::PathCompleted {
                path_id,
                duration,
                is_best: true,
            } if *path_id == AC_P1_ID && *duration == Duration::from_secs(300)
        )
    });
    assert!(entered < identified && identified < completed);
}

#[test]
fn leaving_and_reentering_is_a_fresh_run() {
    let h = harness();
    let data = builtin_data();
    let p1 = &data.dungeons[0].paths[1];

    h.feed
        .publish(sample(AC_EXPLORABLE_MAP_ID, p1.identifying_points[0], 1));
    h.dungeons
        .process_sample(&h.feed.sample(), at(0))
        .expect("tick");

    // Wipe: back to Queensdale, then in again.
    h.feed.publish(sample(QUEENSDALE_MAP_ID, Point::ORIGIN, 2));
    h.dungeons
        .process_sample(&h.feed.sample(), at(600))
        .expect("tick");
    h.feed
        .publish(sample(AC_EXPLORABLE_MAP_ID, p1.identifying_points[0], 3));
    h.dungeons
        .process_sample(&h.feed.sample(), at(700))
        .expect("tick");

    // The timer restarted at re-entry, not at the first entry.
    let state = h.dungeons.state_at(at(760));
    assert_eq!(state.elapsed, Duration::from_secs(60));
}

#[test]
fn pollers_run_and_shut_down_cleanly() {
    let h = harness();
    h.feed.publish(sample(QUEENSDALE_MAP_ID, Point::ORIGIN, 1));

    h.dungeons.start();
    h.zones.start();
    std::thread::sleep(Duration::from_millis(80));

    let dungeon_stats = h.dungeons.poller_stats();
    assert!(dungeon_stats.ticks > 0, "dungeon poller ticked");

    // stop() disarms; shutdown() afterwards must be a clean no-op join.
    h.dungeons.stop();
    h.zones.stop();
    h.dungeons.shutdown();
    h.zones.shutdown();
    h.dungeons.shutdown();
}

#[test]
fn shutdown_without_start_is_safe() {
    let h = harness();
    h.dungeons.shutdown();
    h.zones.shutdown();
}

#[test]
fn both_trackers_share_one_feed_sample() {
    let h = harness();
    let data = builtin_data();
    let vista = data
        .zone_items
        .iter()
        .find(|i| i.id == 893)
        .expect("vista present");

    h.feed.publish(sample(QUEENSDALE_MAP_ID, vista.location, 1));
    h.zones.process_zone_sample(&h.feed.sample());
    h.dungeons
        .process_sample(&h.feed.sample(), at(0))
        .expect("tick");

    // Same snapshot: zones see the vista underfoot, dungeons see
    // nothing (Queensdale is not an instance map).
    let nearest = &h.zones.state().items[0];
    assert_eq!(nearest.item.id, 893);
    assert!(h.dungeons.state_at(at(0)).dungeon_id.is_none());
}
