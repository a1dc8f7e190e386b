//! Runs both trackers against a scripted feed: a character walks
//! through Queensdale, unlocks the Beetletun waypoint, zones into the
//! Ascalonian Catacombs, and finishes P1.
//!
//! A background thread plays the game's role, republishing the
//! current scene at a frame-ish cadence with an advancing tick; the
//! end cinematic is scripted by halting the tick.
//!
//! ```sh
//! cargo run --example simulated
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::thread;
use std::time::Duration;

use tyria_core::Point;
use tyria_core::config::OverlayConfig;
use tyria_core::model::builtin::{
    AC_EXPLORABLE_MAP_ID, BuiltinProvider, QUEENSDALE_MAP_ID, builtin_data,
};
use tyria_core::persistence::UserDataStore;
use tyria_core::units::INCHES_PER_METER;
use tyria_tracker::{
    Dispatcher, DungeonTracker, PlayerSnapshot, SharedFeed, ZoneTracker,
};

fn to_meters(p: Point) -> Point {
    p.scaled(1.0 / INCHES_PER_METER)
}

struct Scene {
    map_id: u32,
    position: Point,
    tick_frozen: bool,
}

fn main() -> tyria_core::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let dir = tempfile::tempdir()?;
    let store = UserDataStore::open(dir.path())?;
    let feed = Arc::new(SharedFeed::new());
    let dispatcher = Arc::new(Dispatcher::new());
    let events = dispatcher.subscribe();
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
    dungeons.start();
    zones.start();

    let data = builtin_data();
    let waypoint = data
        .zone_items
        .iter()
        .find(|i| i.id == 54)
        .expect("embedded table has the Beetletun waypoint");
    let p1 = &data.dungeons[0].paths[1];

    let scenes = [
        Scene {
            map_id: QUEENSDALE_MAP_ID,
            position: Point::ORIGIN,
            tick_frozen: false,
        },
        Scene {
            map_id: QUEENSDALE_MAP_ID,
            position: waypoint.location,
            tick_frozen: false,
        },
        Scene {
            map_id: AC_EXPLORABLE_MAP_ID,
            position: p1.identifying_points[0],
            tick_frozen: false,
        },
        Scene {
            map_id: AC_EXPLORABLE_MAP_ID,
            position: p1.end_point.center,
            tick_frozen: false,
        },
        // End cinematic.
        Scene {
            map_id: AC_EXPLORABLE_MAP_ID,
            position: p1.end_point.center,
            tick_frozen: true,
        },
    ];

    // The "game": republish the current scene every 30 ms with an
    // advancing tick, so the trackers see a live client.
    let scene_index = Arc::new(AtomicU32::new(0));
    let running = Arc::new(AtomicBool::new(true));
    let game = {
        let feed = feed.clone();
        let scene_index = Arc::clone(&scene_index);
        let running = Arc::clone(&running);
        let scenes: Vec<(u32, Point, bool)> = scenes
            .iter()
            .map(|s| (s.map_id, s.position, s.tick_frozen))
            .collect();
        thread::spawn(move || {
            let mut tick = 0u64;
            while running.load(Ordering::Relaxed) {
                let (map_id, position, frozen) =
                    scenes[scene_index.load(Ordering::Relaxed) as usize];
                if !frozen {
                    tick += 1;
                }
                feed.publish(PlayerSnapshot {
                    map_id,
                    position: to_meters(position),
                    camera_dir: Point::new_2d(0.0, 1.0),
                    character_name: "Eir Stegalkin".to_string(),
                    tick,
                    is_valid: true,
                });
                thread::sleep(Duration::from_millis(30));
            }
        })
    };

    for index in 0..scenes.len() {
        scene_index.store(index as u32, Ordering::Relaxed);
        thread::sleep(Duration::from_millis(1_500));
    }

    running.store(false, Ordering::Relaxed);
    let _ = game.join();
    dungeons.shutdown();
    zones.shutdown();

    println!("-- events --");
    for event in events.try_iter() {
        println!("{event:?}");
    }
    println!("-- final dungeon state: {:?}", dungeons.state());
    println!(
        "-- waypoint unlocked: {}",
        zones.is_unlocked(waypoint.id)
    );
    Ok(())
}
