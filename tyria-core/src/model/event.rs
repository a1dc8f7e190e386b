//! Recurring world events and map meta events.
//!
//! World bosses run on a fixed daily UTC timetable: each entry in
//! `active_times` is a time-of-day at which the event becomes active
//! for `duration`, preceded by a `warmup_duration` pre-event phase.

use chrono::{DateTime, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

use crate::geometry::Point;

const SECS_PER_DAY: i64 = 86_400;

/// A recurring timetable entry (typically a world boss).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldEvent {
    /// Stable identity.
    pub id: Uuid,
    /// Canonical name.
    pub name: String,
    /// Map the event runs in.
    pub map_id: u32,
    /// Daily start times, UTC.
    pub active_times: Vec<NaiveTime>,
    /// How long the event stays active.
    pub duration: Duration,
    /// Pre-event warmup phase length.
    pub warmup_duration: Duration,
    /// Locations that indicate completion when the player stands there.
    pub completion_locations: Vec<Point>,
    /// Radius for the completion locations.
    pub completion_radius: f64,
}

/// The phase of a [`WorldEvent`] at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventState {
    /// Outside any warmup or active window.
    Inactive,
    /// Inside the pre-event warmup window.
    Warmup,
    /// The event is running.
    Active,
}

impl WorldEvent {
    /// Phase of this event at `now`.
    ///
    /// Windows that cross UTC midnight are handled by also considering
    /// the previous day's occurrence of every start time.
    #[must_use]
    pub fn state_at(&self, now: DateTime<Utc>) -> EventState {
        let now_secs = i64::from(now.time().num_seconds_from_midnight());
        let duration = self.duration.as_secs() as i64;
        let warmup = self.warmup_duration.as_secs() as i64;

        let mut in_warmup = false;
        for t in &self.active_times {
            let start = i64::from(t.num_seconds_from_midnight());
            // Offset of `now` from this start, for today's and
            // yesterday's occurrence.
            for offset in [now_secs - start, now_secs + SECS_PER_DAY - start] {
                if (0..duration).contains(&offset) {
                    return EventState::Active;
                }
                if (-warmup..0).contains(&offset) {
                    in_warmup = true;
                }
            }
        }

        if in_warmup {
            EventState::Warmup
        } else {
            EventState::Inactive
        }
    }

    /// The next instant (>= `now`) at which this event becomes active.
    ///
    /// Returns `None` when the timetable is empty.
    #[must_use]
    pub fn next_active_time(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let now_secs = i64::from(now.time().num_seconds_from_midnight());
        let midnight = now - chrono::Duration::seconds(now_secs);

        self.active_times
            .iter()
            .map(|t| {
                let start = i64::from(t.num_seconds_from_midnight());
                let secs = if start >= now_secs {
                    start
                } else {
                    start + SECS_PER_DAY
                };
                midnight + chrono::Duration::seconds(secs)
            })
            .min()
    }

    /// Time remaining until the next activation.
    #[must_use]
    pub fn time_until_active(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.next_active_time(now)
            .and_then(|t| (t - now).to_std().ok())
    }
}

/// A named stage within a map meta event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaEventStage {
    /// Stage name.
    pub name: String,
    /// How long the stage lasts.
    pub duration: Duration,
}

/// A map-wide meta event cycle. Descriptive only; the overlay shows
/// the stage list but derives no live state from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaEvent {
    /// Stable identity.
    pub id: Uuid,
    /// Canonical name.
    pub name: String,
    /// Map the meta cycle runs in.
    pub map_id: u32,
    /// Stages in cycle order.
    pub stages: Vec<MetaEventStage>,
}
