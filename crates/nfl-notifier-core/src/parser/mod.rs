//! HTML parsers for ran.de pages
//!
//! This module contains the parser for the NFL live broadcast schedule page:
//! - `broadcast`: Extract season, gameday, date and games from the schedule

pub mod broadcast;

// Re-export main parsing function
pub use broadcast::parse_broadcast_page;
