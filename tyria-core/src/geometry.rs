//! Coordinate primitives and the distance/angle math the detection
//! layer is built on.
//!
//! Two coordinate spaces flow through the overlay:
//!
//! - **Mumble space** — live player position and camera direction in
//!   meters, read from the game's shared-memory link.
//! - **Content space** — static game data (trigger points, item
//!   locations) in game inches.
//!
//! [`Point`] is deliberately space-agnostic; conversion between the two
//! spaces lives in [`crate::units`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Sub;

/// An immutable 3D coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
    /// Z coordinate.
    pub z: f64,
}

impl Point {
    /// Origin point.
    pub const ORIGIN: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    /// Create a new 3D point.
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Create a point in the XY plane (z = 0).
    #[must_use]
    pub const fn new_2d(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0 }
    }

    /// Full 3D euclidean distance to `other`.
    #[must_use]
    pub fn distance(&self, other: &Self) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let dz = other.z - self.z;
        dz.mul_add(dz, dx.mul_add(dx, dy * dy)).sqrt()
    }

    /// Planar distance to `other`, ignoring z.
    ///
    /// The game's reported z is unreliable for overworld content, so
    /// zone-item measurements use this form.
    #[must_use]
    pub fn distance_2d(&self, other: &Self) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx.mul_add(dx, dy * dy).sqrt()
    }

    /// Scale all three components by `factor`.
    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(self.x * factor, self.y * factor, self.z * factor)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.1}, {:.1}, {:.1})", self.x, self.y, self.z)
    }
}

/// A named trigger volume: a point with a containment radius.
///
/// Used for dungeon identifying points, path end points, and
/// completion prerequisite points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectionPoint {
    /// Center of the trigger volume, in content-space inches.
    pub center: Point,
    /// Containment radius, in content-space inches.
    pub radius: f64,
}

impl DetectionPoint {
    /// Create a new trigger volume.
    #[must_use]
    pub const fn new(center: Point, radius: f64) -> Self {
        Self { center, radius }
    }

    /// Whether `pos` lies inside the volume.
    ///
    /// The boundary is inclusive: a position at exactly `radius`
    /// distance counts as inside.
    #[must_use]
    pub fn contains(&self, pos: &Point) -> bool {
        self.center.distance(pos) <= self.radius
    }
}

/// Signed camera-relative angle from the player to a target, in degrees.
///
/// `to_target` is the vector from the player to the target;
/// `camera_dir` is the camera-direction sample from the live feed
/// (a vector from the origin). The result is the raw atan2 difference,
/// not normalized.
#[must_use]
pub fn camera_angle_deg(to_target: Point, camera_dir: Point) -> f64 {
    let angle = to_target.x.atan2(to_target.y) - camera_dir.x.atan2(camera_dir.y);
    angle.to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_symmetric() {
        let a = Point::new(1.0, 2.0, 3.0);
        let b = Point::new(4.0, 6.0, 3.0);
        assert!((a.distance(&b) - 5.0).abs() < 1e-12);
        assert!((b.distance(&a) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn distance_2d_ignores_z() {
        let a = Point::new(0.0, 0.0, 100.0);
        let b = Point::new(3.0, 4.0, -500.0);
        assert!((a.distance_2d(&b) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn containment_boundary_is_inclusive() {
        let dp = DetectionPoint::new(Point::ORIGIN, 10.0);
        assert!(dp.contains(&Point::new(10.0, 0.0, 0.0)));
        assert!(dp.contains(&Point::new(0.0, 6.0, 8.0)));
        assert!(!dp.contains(&Point::new(10.0 + 1e-9, 0.0, 0.0)));
    }

    #[test]
    fn camera_angle_dead_ahead_is_zero() {
        // Target straight along the camera direction.
        let cam = Point::new_2d(0.0, 1.0);
        let to_target = Point::new_2d(0.0, 5.0);
        assert!(camera_angle_deg(to_target, cam).abs() < 1e-12);
    }

    #[test]
    fn camera_angle_right_of_camera_is_positive_ninety() {
        // Camera faces +y; target due +x (to the right).
        let cam = Point::new_2d(0.0, 1.0);
        let to_target = Point::new_2d(5.0, 0.0);
        assert!((camera_angle_deg(to_target, cam) - 90.0).abs() < 1e-9);
    }
}
