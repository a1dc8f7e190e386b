//! # tyria-tracker — Polling Controllers for the Tyria Overlay
//!
//! This crate turns the pure detection layer of `tyria-core` into live
//! tracking state. Each tracker owns one or two [`poller::Poller`]s —
//! single-worker recurring schedulers that sample the player feed,
//! evaluate detection predicates, mutate derived state under a private
//! lock, and forward final values through the event [`dispatch`]
//! boundary.
//!
//! ```text
//! ┌──────────────┐   sample()   ┌───────────────────┐
//! │  PlayerFeed  │◄─────────────│  DungeonTracker   │──┐
//! │ (mumble link)│              ├───────────────────┤  │ TrackerEvent
//! └──────────────┘◄─────────────│   ZoneTracker     │──┤
//!                               └────────┬──────────┘  ▼
//!                                        │        ┌──────────┐
//!                               tyria-core detect │Dispatcher│→ UI
//!                               + user_state/save └──────────┘
//! ```
//!
//! ## Modules
//!
//! - `feed` — the live player snapshot and feed abstraction
//! - `poller` — refcounted single-worker recurring scheduler
//! - `events` / `dispatch` — the publish boundary toward display layers
//! - `dungeon` — dungeon/path detection, run timer, daily reset
//! - `zone` — zone-item measurement and dwell-based auto-unlock

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod dispatch;
pub mod dungeon;
pub mod events;
pub mod feed;
pub mod poller;
pub mod zone;

pub use dispatch::Dispatcher;
pub use dungeon::DungeonTracker;
pub use events::TrackerEvent;
pub use feed::{PlayerFeed, PlayerSnapshot, SharedFeed};
pub use zone::ZoneTracker;
