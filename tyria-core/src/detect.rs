//! Detection predicates — the pure geometry checks the polling
//! controllers evaluate every tick.
//!
//! All functions here take a player position already converted to
//! content space ([`crate::units::meters_to_units`]), except
//! [`measure_item`], which accepts the raw mumble sample and converts
//! internally because it also needs the camera direction.

use crate::geometry::{DetectionPoint, Point, camera_angle_deg};
use crate::model::{DungeonPath, ZoneItem};
use crate::units::{Distance, meters_to_units};

/// Whether `pos` lies within `radius` of `center`, boundary inclusive.
#[must_use]
pub fn near_point(center: &Point, radius: f64, pos: &Point) -> bool {
    center.distance(pos) <= radius
}

/// Whether the player is physically inside this path's instance.
///
/// The map id must match; if the path carries identifying points the
/// player must additionally be within `detection_radius` of at least
/// one of them. A path with no identifying points is identified by
/// map id alone.
#[must_use]
pub fn is_player_in_path(path: &DungeonPath, map_id: u32, pos: &Point) -> bool {
    if map_id != path.instance_map_id {
        return false;
    }
    if path.identifying_points.is_empty() {
        return true;
    }
    path.identifying_points
        .iter()
        .any(|p| near_point(p, path.detection_radius, pos))
}

/// Whether the player stands in the path's end trigger volume.
#[must_use]
pub fn reached_end_point(path: &DungeonPath, pos: &Point) -> bool {
    path.end_point.contains(pos)
}

/// Live distance and camera-relative bearing of a zone item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemMeasurement {
    /// Planar distance in raw game units.
    pub distance: Distance,
    /// Signed angle from the camera direction, degrees.
    pub angle_deg: f64,
}

/// Measure a zone item against the live player sample.
///
/// `player_pos` and `camera_dir` are in mumble meters and converted
/// here. Distance is planar; the live feed's z is not trustworthy for
/// overworld content.
#[must_use]
pub fn measure_item(player_pos: Point, camera_dir: Point, item: &ZoneItem) -> ItemMeasurement {
    let player = meters_to_units(player_pos);
    let camera = meters_to_units(camera_dir);
    let to_item = item.location - player;

    ItemMeasurement {
        distance: Distance::from_units(player.distance_2d(&item.location)),
        angle_deg: camera_angle_deg(to_item, camera),
    }
}

/// Convenience for end-trigger style checks against an arbitrary
/// [`DetectionPoint`], e.g. world-event completion locations.
#[must_use]
pub fn in_volume(volume: &DetectionPoint, pos: &Point) -> bool {
    volume.contains(pos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::builtin::{AC_EXPLORABLE_MAP_ID, builtin_data};
    use crate::model::{ZoneItem, ZoneItemKind};
    use crate::units::INCHES_PER_METER;

    fn ac_p1() -> DungeonPath {
        builtin_data().dungeons[0].paths[1].clone()
    }

    #[test]
    fn wrong_map_never_matches() {
        let path = ac_p1();
        let at_identifier = path.identifying_points[0];
        assert!(!is_player_in_path(&path, 9999, &at_identifier));
    }

    #[test]
    fn identifying_point_radius_is_inclusive() {
        let path = ac_p1();
        let center = path.identifying_points[0];
        let on_boundary = Point::new(center.x + path.detection_radius, center.y, center.z);
        let outside = Point::new(center.x + path.detection_radius + 0.001, center.y, center.z);

        assert!(is_player_in_path(&path, AC_EXPLORABLE_MAP_ID, &on_boundary));
        assert!(!is_player_in_path(&path, AC_EXPLORABLE_MAP_ID, &outside));
    }

    #[test]
    fn pathless_identification_by_map_alone() {
        let data = builtin_data();
        let story = &data.dungeons[0].paths[0];
        assert!(story.identifying_points.is_empty());
        // Anywhere in the story map matches.
        assert!(is_player_in_path(
            story,
            story.instance_map_id,
            &Point::new(1e6, -1e6, 0.0)
        ));
    }

    #[test]
    fn measurement_distance_is_planar_and_in_units() {
        let item = ZoneItem {
            id: 1,
            name: "Test".to_string(),
            kind: ZoneItemKind::PointOfInterest,
            map_id: 15,
            location: Point::new(100.0 * INCHES_PER_METER, 0.0, 5_000.0),
            continent_location: Point::ORIGIN,
            chat_code: None,
        };
        // Player at origin (meters); item 100 m away on x with a huge
        // z offset that must not matter.
        let m = measure_item(Point::ORIGIN, Point::new_2d(0.0, 1.0), &item);
        assert!((m.distance.meters() - 100.0).abs() < 1e-6);
    }

    #[test]
    fn measurement_angle_tracks_camera() {
        let item = ZoneItem {
            id: 1,
            name: "Test".to_string(),
            kind: ZoneItemKind::Waypoint,
            map_id: 15,
            location: Point::new_2d(0.0, 100.0 * INCHES_PER_METER),
            continent_location: Point::ORIGIN,
            chat_code: None,
        };
        // Camera facing +y, item due +y: dead ahead.
        let ahead = measure_item(Point::ORIGIN, Point::new_2d(0.0, 1.0), &item);
        assert!(ahead.angle_deg.abs() < 1e-9);
        // Camera facing +x, same item: 90 degrees off.
        let side = measure_item(Point::ORIGIN, Point::new_2d(1.0, 0.0), &item);
        assert!((side.angle_deg + 90.0).abs() < 1e-9);
    }
}
