//! NFL Notifier Core Library
//!
//! This crate scrapes the ran.de NFL live broadcast schedule and turns each
//! listed game into a Google Calendar event.
//!
//! # Features
//! - Extract season, gameday, date and games from the schedule page
//! - Compute kickoff/end times in a configurable timezone
//! - Publish events through an injectable calendar publisher
//! - File-backed OAuth token storage with refresh

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod notifier;
pub mod parser;
pub mod publisher;
pub mod schedule;
pub mod types;

// Re-export main types for convenience
pub use auth::{TokenSet, TokenStore};
pub use client::{ClientConfig, RanClient};
pub use config::NotifierConfig;
pub use error::{NotifierError, Result};
pub use notifier::{NflNotifier, RunSummary};
pub use publisher::{CalendarPublisher, GoogleCalendarPublisher};
pub use schedule::EventScheduler;
pub use types::{BroadcastSchedule, CreatedEvent, EventRequest, Game};
