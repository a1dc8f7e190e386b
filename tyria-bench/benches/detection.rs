//! Detection-layer benchmarks.
//!
//! The dungeon poller evaluates every path of the current map each
//! tick, and the location poller measures every item in the zone.
//! Both passes must stay far below their poll intervals (250 ms);
//! the targets here are single-digit microseconds.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use uuid::Uuid;

use tyria_core::detect::{is_player_in_path, measure_item};
use tyria_core::geometry::DetectionPoint;
use tyria_core::model::{DungeonPath, ZoneItem, ZoneItemKind};
use tyria_core::Point;

const BENCH_MAP_ID: u32 = 36;

fn make_path(rng: &mut StdRng, n: usize) -> DungeonPath {
    let point = |rng: &mut StdRng| {
        Point::new(
            rng.gen_range(-20_000.0..20_000.0),
            rng.gen_range(-20_000.0..20_000.0),
            rng.gen_range(-1_000.0..1_000.0),
        )
    };
    DungeonPath {
        id: Uuid::new_v4(),
        path_number: u32::try_from(n).unwrap_or(0),
        instance_map_id: BENCH_MAP_ID,
        display_text: format!("P{n}"),
        gold_reward: 15_000,
        end_point: DetectionPoint::new(point(rng), 75.0),
        identifying_points: vec![point(rng), point(rng)],
        completion_prereq_points: vec![point(rng)],
        detection_radius: 75.0,
    }
}

fn make_item(rng: &mut StdRng, id: u32) -> ZoneItem {
    ZoneItem {
        id,
        name: format!("Item {id}"),
        kind: ZoneItemKind::PointOfInterest,
        map_id: 15,
        location: Point::new_2d(
            rng.gen_range(-25_000.0..25_000.0),
            rng.gen_range(-25_000.0..25_000.0),
        ),
        continent_location: Point::ORIGIN,
        chat_code: None,
    }
}

/// Path matching over a realistic dungeon table (40 paths).
fn bench_path_matching(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0x7e1a);
    let paths: Vec<DungeonPath> = (0..40).map(|n| make_path(&mut rng, n)).collect();
    let pos = Point::new(1_234.0, -5_678.0, -100.0);

    c.bench_function("path_match_40_paths", |b| {
        b.iter(|| {
            let hit = paths
                .iter()
                .find(|p| is_player_in_path(p, black_box(BENCH_MAP_ID), black_box(&pos)));
            black_box(hit);
        });
    });
}

/// One full location-poll pass over a dense zone (300 items).
fn bench_zone_measurement(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0x7e1b);
    let items: Vec<ZoneItem> = (0..300).map(|id| make_item(&mut rng, id)).collect();
    let player = Point::new(12.0, -34.0, 5.0);
    let camera = Point::new_2d(0.0, 1.0);

    c.bench_function("zone_measure_300_items", |b| {
        b.iter(|| {
            for item in &items {
                black_box(measure_item(black_box(player), black_box(camera), item));
            }
        });
    });
}

/// One whole dungeon-tracker tick, feed sample to published state.
fn bench_tracker_tick(c: &mut Criterion) {
    use std::sync::Arc;
    use tyria_core::config::OverlayConfig;
    use tyria_core::model::builtin::{AC_EXPLORABLE_MAP_ID, builtin_data};
    use tyria_core::persistence::UserDataStore;
    use tyria_core::units::INCHES_PER_METER;
    use tyria_tracker::{Dispatcher, DungeonTracker, PlayerSnapshot, SharedFeed};

    let dir = std::env::temp_dir().join("tyria-bench-user-data");
    let store = UserDataStore::open(&dir).expect("bench store");
    let tracker = DungeonTracker::new(
        builtin_data(),
        &OverlayConfig::default(),
        Arc::new(SharedFeed::new()),
        Arc::new(Dispatcher::new()),
        store,
    );

    // Off every trigger: a steady-state in-dungeon tick.
    let snapshot = PlayerSnapshot {
        map_id: AC_EXPLORABLE_MAP_ID,
        position: Point::new(100.0, 100.0, 0.0).scaled(1.0 / INCHES_PER_METER),
        camera_dir: Point::new_2d(0.0, 1.0),
        character_name: "Bench".to_string(),
        tick: 1,
        is_valid: true,
    };
    let now = chrono::Utc::now();

    c.bench_function("dungeon_tracker_tick", |b| {
        b.iter(|| {
            tracker
                .process_sample(black_box(&snapshot), now)
                .expect("tick");
        });
    });
}

criterion_group!(
    benches,
    bench_path_matching,
    bench_zone_measurement,
    bench_tracker_tick
);
criterion_main!(benches);
