//! # Tyria Core Library
//!
//! Presentation-agnostic core of the Tyria overlay companion for
//! Guild Wars 2. The overlay samples live player state from the game's
//! mumble-link shared memory and cross-references static game data to
//! derive tracking state (current dungeon path, run times, zone-item
//! unlocks).
//!
//! This crate holds everything that does not poll:
//!
//! - **Geometry** — 2D/3D points, trigger volumes, distance/angle math
//! - **Units** — the game's raw-inch unit system and conversions
//! - **Static model** — dungeons, paths, zone items, world events
//! - **Detection** — pure predicates over geometry + static data
//! - **User state** — completed/unlocked/hidden records per install
//! - **Persistence** — per-record JSON files under a user-data directory
//!
//! The polling controllers that drive these pieces live in
//! `tyria-tracker`.

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod detect;
pub mod error;
pub mod geometry;
pub mod model;
pub mod persistence;
pub mod units;
pub mod user_state;

pub use config::OverlayConfig;
pub use error::{OverlayError, Result};
pub use geometry::{DetectionPoint, Point};
pub use units::Distance;
