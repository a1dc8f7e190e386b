//! A small embedded reference table.
//!
//! The full overlay loads its tables from data files shipped with the
//! application; this module embeds enough real content (two dungeons,
//! a handful of Queensdale items, two world bosses) for demos and for
//! tests that need realistic geometry.

use chrono::NaiveTime;
use std::time::Duration;
use uuid::Uuid;

use crate::geometry::{DetectionPoint, Point};

use super::{
    Dungeon, DungeonPath, ReferenceDataProvider, StaticData, WorldEvent, ZoneItem, ZoneItemKind,
};

/// Map id of Queensdale, the sample overworld zone.
pub const QUEENSDALE_MAP_ID: u32 = 15;

/// Instance map id shared by the Ascalonian Catacombs explorable paths.
pub const AC_EXPLORABLE_MAP_ID: u32 = 36;

/// Instance map id of the Ascalonian Catacombs story path.
pub const AC_STORY_MAP_ID: u32 = 33;

/// Instance map id shared by the Citadel of Flame paths.
pub const COF_MAP_ID: u32 = 66;

/// Dungeon id: Ascalonian Catacombs.
pub const AC_ID: Uuid = Uuid::from_u128(0x97a8_a1a8_6da4_4a7b_8e1f_2c3d_4e5f_6071);

/// Path id: Ascalonian Catacombs story.
pub const AC_STORY_ID: Uuid = Uuid::from_u128(0x97a8_a1a8_0000_4a7b_8e1f_2c3d_4e5f_6001);
/// Path id: Ascalonian Catacombs P1 (Hodgins).
pub const AC_P1_ID: Uuid = Uuid::from_u128(0x97a8_a1a8_0000_4a7b_8e1f_2c3d_4e5f_6002);
/// Path id: Ascalonian Catacombs P2 (Detha).
pub const AC_P2_ID: Uuid = Uuid::from_u128(0x97a8_a1a8_0000_4a7b_8e1f_2c3d_4e5f_6003);
/// Path id: Ascalonian Catacombs P3 (Tzark).
pub const AC_P3_ID: Uuid = Uuid::from_u128(0x97a8_a1a8_0000_4a7b_8e1f_2c3d_4e5f_6004);

/// Dungeon id: Citadel of Flame.
pub const COF_ID: Uuid = Uuid::from_u128(0xc3f0_50b2_9d12_4f5a_a1b2_c3d4_e5f6_0718);

/// Path id: Citadel of Flame P1 (Ferrah).
pub const COF_P1_ID: Uuid = Uuid::from_u128(0xc3f0_50b2_0000_4f5a_a1b2_c3d4_e5f6_0001);
/// Path id: Citadel of Flame P2 (Magg).
pub const COF_P2_ID: Uuid = Uuid::from_u128(0xc3f0_50b2_0000_4f5a_a1b2_c3d4_e5f6_0002);

/// Event id: Shadow Behemoth.
pub const SHADOW_BEHEMOTH_ID: Uuid = Uuid::from_u128(0x31cf_2e7e_ef3e_48f0_ad77_ba52_bb35_f90d);
/// Event id: Fire Elemental.
pub const FIRE_ELEMENTAL_ID: Uuid = Uuid::from_u128(0x33f7_6e9e_650b_4a42_95e5_966b_eb73_84fe);

/// Build the embedded reference table.
#[must_use]
pub fn builtin_data() -> StaticData {
    StaticData {
        dungeons: vec![ascalonian_catacombs(), citadel_of_flame()],
        zone_items: queensdale_items(),
        events: vec![shadow_behemoth(), fire_elemental()],
        meta_events: vec![],
    }
}

fn ascalonian_catacombs() -> Dungeon {
    Dungeon {
        id: AC_ID,
        name: "Ascalonian Catacombs".to_string(),
        display_name: None,
        world_map_id: 19,
        min_level: 30,
        waypoint_code: "[&BIYBAAA=]".to_string(),
        paths: vec![
            DungeonPath {
                id: AC_STORY_ID,
                path_number: 0,
                instance_map_id: AC_STORY_MAP_ID,
                display_text: "Story".to_string(),
                gold_reward: 5_000,
                end_point: DetectionPoint::new(Point::new(-2_200.0, 2_000.0, -560.0), 75.0),
                // Only one path uses the story map; the map id is enough.
                identifying_points: vec![],
                completion_prereq_points: vec![],
                detection_radius: 75.0,
            },
            DungeonPath {
                id: AC_P1_ID,
                path_number: 1,
                instance_map_id: AC_EXPLORABLE_MAP_ID,
                display_text: "P1".to_string(),
                gold_reward: 15_000,
                end_point: DetectionPoint::new(Point::new(10_580.0, -2_244.0, -532.0), 75.0),
                identifying_points: vec![Point::new(9_160.0, 1_720.0, -532.0)],
                completion_prereq_points: vec![],
                detection_radius: 75.0,
            },
            DungeonPath {
                id: AC_P2_ID,
                path_number: 2,
                instance_map_id: AC_EXPLORABLE_MAP_ID,
                display_text: "P2".to_string(),
                gold_reward: 15_000,
                end_point: DetectionPoint::new(Point::new(12_900.0, 340.0, -580.0), 75.0),
                identifying_points: vec![Point::new(11_340.0, 2_980.0, -556.0)],
                completion_prereq_points: vec![Point::new(12_120.0, 1_660.0, -568.0)],
                detection_radius: 75.0,
            },
            DungeonPath {
                id: AC_P3_ID,
                path_number: 3,
                instance_map_id: AC_EXPLORABLE_MAP_ID,
                display_text: "P3".to_string(),
                gold_reward: 15_000,
                end_point: DetectionPoint::new(Point::new(8_420.0, -4_120.0, -548.0), 75.0),
                identifying_points: vec![Point::new(7_020.0, -1_480.0, -540.0)],
                completion_prereq_points: vec![],
                detection_radius: 75.0,
            },
        ],
    }
}

fn citadel_of_flame() -> Dungeon {
    Dungeon {
        id: COF_ID,
        name: "Citadel of Flame".to_string(),
        display_name: None,
        world_map_id: 22,
        min_level: 70,
        waypoint_code: "[&BO4CAAA=]".to_string(),
        paths: vec![
            DungeonPath {
                id: COF_P1_ID,
                path_number: 1,
                instance_map_id: COF_MAP_ID,
                display_text: "P1".to_string(),
                gold_reward: 15_000,
                end_point: DetectionPoint::new(Point::new(-3_440.0, 9_820.0, 120.0), 75.0),
                identifying_points: vec![Point::new(-1_980.0, 7_640.0, 96.0)],
                completion_prereq_points: vec![],
                detection_radius: 75.0,
            },
            DungeonPath {
                id: COF_P2_ID,
                path_number: 2,
                instance_map_id: COF_MAP_ID,
                display_text: "P2".to_string(),
                gold_reward: 15_000,
                end_point: DetectionPoint::new(Point::new(-5_120.0, 11_300.0, 188.0), 75.0),
                identifying_points: vec![Point::new(-4_020.0, 8_460.0, 140.0)],
                completion_prereq_points: vec![Point::new(-4_660.0, 10_120.0, 160.0)],
                detection_radius: 75.0,
            },
        ],
    }
}

fn queensdale_items() -> Vec<ZoneItem> {
    vec![
        ZoneItem {
            id: 54,
            name: "Beetletun Waypoint".to_string(),
            kind: ZoneItemKind::Waypoint,
            map_id: QUEENSDALE_MAP_ID,
            location: Point::new_2d(-20_000.0, 14_300.0),
            continent_location: Point::new_2d(41_800.0, 29_900.0),
            chat_code: Some("[&BPoAAAA=]".to_string()),
        },
        ZoneItem {
            id: 310,
            name: "The Great Hunt Memorial".to_string(),
            kind: ZoneItemKind::PointOfInterest,
            map_id: QUEENSDALE_MAP_ID,
            location: Point::new_2d(-17_400.0, 12_800.0),
            continent_location: Point::new_2d(42_050.0, 30_120.0),
            chat_code: Some("[&BDYBAAA=]".to_string()),
        },
        ZoneItem {
            id: 893,
            name: "Shaemoor Garrison Vista".to_string(),
            kind: ZoneItemKind::Vista,
            map_id: QUEENSDALE_MAP_ID,
            location: Point::new_2d(-15_950.0, 17_100.0),
            continent_location: Point::new_2d(42_380.0, 29_480.0),
            chat_code: None,
        },
        ZoneItem {
            id: 4,
            name: "Help the farmers of Shaemoor".to_string(),
            kind: ZoneItemKind::HeartQuest,
            map_id: QUEENSDALE_MAP_ID,
            location: Point::new_2d(-15_200.0, 16_200.0),
            continent_location: Point::new_2d(42_440.0, 29_560.0),
            chat_code: None,
        },
        ZoneItem {
            id: 211,
            name: "Krytan Waterfall".to_string(),
            kind: ZoneItemKind::SkillChallenge,
            map_id: QUEENSDALE_MAP_ID,
            location: Point::new_2d(-18_600.0, 18_900.0),
            continent_location: Point::new_2d(41_960.0, 29_210.0),
            chat_code: None,
        },
    ]
}

fn shadow_behemoth() -> WorldEvent {
    WorldEvent {
        id: SHADOW_BEHEMOTH_ID,
        name: "Shadow Behemoth".to_string(),
        map_id: QUEENSDALE_MAP_ID,
        // Every two hours at :45, UTC.
        active_times: (0..12)
            .map(|i| NaiveTime::from_hms_opt(i * 2, 45, 0).expect("valid timetable"))
            .collect(),
        duration: Duration::from_secs(15 * 60),
        warmup_duration: Duration::from_secs(10 * 60),
        completion_locations: vec![Point::new_2d(-23_900.0, 17_300.0)],
        completion_radius: 2_500.0,
    }
}

fn fire_elemental() -> WorldEvent {
    WorldEvent {
        id: FIRE_ELEMENTAL_ID,
        name: "Fire Elemental".to_string(),
        map_id: 35,
        active_times: (0..12)
            .map(|i| NaiveTime::from_hms_opt(i * 2, 45, 0).expect("valid timetable"))
            .collect(),
        duration: Duration::from_secs(15 * 60),
        warmup_duration: Duration::from_secs(10 * 60),
        completion_locations: vec![Point::new_2d(2_100.0, 18_400.0)],
        completion_radius: 2_500.0,
    }
}

/// [`ReferenceDataProvider`] backed by the embedded table.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinProvider;

impl ReferenceDataProvider for BuiltinProvider {
    fn load_table(&self) -> crate::Result<StaticData> {
        Ok(builtin_data())
    }

    fn localized_name(&self, id: Uuid) -> Option<String> {
        let data = builtin_data();
        data.dungeons
            .iter()
            .find(|d| d.id == id)
            .map(|d| d.shown_name().to_string())
            .or_else(|| {
                data.events
                    .iter()
                    .find(|e| e.id == id)
                    .map(|e| e.name.clone())
            })
    }

    fn zone_name(&self, map_id: u32) -> Option<String> {
        let name = match map_id {
            QUEENSDALE_MAP_ID => "Queensdale",
            19 => "Plains of Ashford",
            22 => "Fireheart Rise",
            35 => "Metrica Province",
            AC_STORY_MAP_ID | AC_EXPLORABLE_MAP_ID => "Ascalonian Catacombs",
            COF_MAP_ID => "Citadel of Flame",
            _ => return None,
        };
        Some(name.to_string())
    }
}
