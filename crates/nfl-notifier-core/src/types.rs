//! Data types for the NFL notifier
//!
//! This module contains the core data structures produced by the broadcast
//! page extraction and consumed by the event scheduler and publisher.

use serde::{Deserialize, Serialize};

/// A single broadcast discovered on the schedule page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    /// Kickoff time as shown on the page, e.g. "20:15"
    pub kickoff: String,
    /// Game title, e.g. "Kansas City Chiefs @ Detroit Lions"
    pub title: String,
    /// Broadcaster name taken from the nested link text
    pub broadcaster: String,
    /// Absolute URL to the broadcast or live stream page
    pub url: String,
}

/// Everything extracted from one pass over the schedule page
///
/// Season, gameday and date are each discovered at most once (first match
/// wins); games accumulate in document order without deduplication.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastSchedule {
    /// Season label, e.g. "2023"
    pub season: Option<String>,
    /// Gameday label, e.g. "1. Spieltag"
    pub gameday: Option<String>,
    /// Date of the gameday without the weekday prefix, e.g. "7. September"
    pub date: Option<String>,
    /// All games discovered on the page
    pub games: Vec<Game>,
}

impl BroadcastSchedule {
    /// Returns true if the page yielded neither labels nor games.
    pub fn is_empty(&self) -> bool {
        self.season.is_none() && self.gameday.is_none() && self.date.is_none() && self.games.is_empty()
    }
}

/// A fully resolved calendar event ready to be published
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRequest {
    /// Event title, e.g. "1. Spieltag: Chiefs @ Lions ProSieben"
    pub summary: String,
    /// Event description, e.g. "ProSieben: https://www.ran.de/..."
    pub description: String,
    /// Event start as an RFC 3339 timestamp with offset
    pub start: String,
    /// Event end as an RFC 3339 timestamp with offset
    pub end: String,
    /// IANA timezone name the timestamps were computed in
    pub timezone: String,
}

/// The calendar service's record of a created event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedEvent {
    /// Title as stored by the calendar service
    pub summary: String,
    /// Stored start timestamp
    pub start_date_time: String,
    /// Stored end timestamp
    pub end_date_time: String,
}
