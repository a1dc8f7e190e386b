//! The game's unit system and conversions between it and the live feed.
//!
//! Static content data is authored in "raw" game units (inches). The
//! live mumble feed reports positions in meters. All measurements are
//! stored raw and converted on demand.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::geometry::Point;

/// Inches per meter — converts mumble-space meters to content-space
/// game units.
pub const INCHES_PER_METER: f64 = 39.3701;

/// Game units per foot.
pub const UNITS_PER_FOOT: f64 = 12.0;

/// Approximate units covered per second at base run speed.
///
/// A unitless heuristic for "seconds to reach on foot", not physically
/// calibrated against in-game movement.
pub const RUN_UNITS_PER_SECOND: f64 = 300.0;

/// Convert a mumble-space point (meters) to content space (inches).
#[must_use]
pub fn meters_to_units(p: Point) -> Point {
    p.scaled(INCHES_PER_METER)
}

/// A distance in raw game units, convertible on demand.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Distance(f64);

impl Distance {
    /// A distance of zero.
    pub const ZERO: Self = Self(0.0);

    /// Wrap a raw game-unit value.
    #[must_use]
    pub const fn from_units(raw: f64) -> Self {
        Self(raw)
    }

    /// Build from a value in feet.
    #[must_use]
    pub fn from_feet(feet: f64) -> Self {
        Self(feet * UNITS_PER_FOOT)
    }

    /// Build from a value in meters.
    #[must_use]
    pub fn from_meters(meters: f64) -> Self {
        Self(meters * INCHES_PER_METER)
    }

    /// The raw game-unit value.
    #[must_use]
    pub const fn units(self) -> f64 {
        self.0
    }

    /// Value in feet.
    #[must_use]
    pub fn feet(self) -> f64 {
        self.0 / UNITS_PER_FOOT
    }

    /// Value in meters.
    #[must_use]
    pub fn meters(self) -> f64 {
        self.0 / INCHES_PER_METER
    }

    /// Estimated seconds to cover this distance at base run speed.
    #[must_use]
    pub fn run_seconds(self) -> f64 {
        self.0 / RUN_UNITS_PER_SECOND
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.0}u", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-6 * b.abs().max(1.0)
    }

    #[test]
    fn feet_round_trip() {
        let d = Distance::from_units(482.5);
        assert!(close(Distance::from_feet(d.feet()).units(), 482.5));
    }

    #[test]
    fn meters_round_trip() {
        let d = Distance::from_units(482.5);
        assert!(close(Distance::from_meters(d.meters()).units(), 482.5));
    }

    #[test]
    fn meters_to_units_scales_all_axes() {
        let p = meters_to_units(Point::new(1.0, 2.0, -1.0));
        assert!(close(p.x, INCHES_PER_METER));
        assert!(close(p.y, 2.0 * INCHES_PER_METER));
        assert!(close(p.z, -INCHES_PER_METER));
    }

    #[test]
    fn run_seconds_heuristic() {
        // 300 units at 300 u/s is one second of running.
        assert!(close(Distance::from_units(300.0).run_seconds(), 1.0));
    }
}
