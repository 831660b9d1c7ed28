//! High-level notifier API
//!
//! Combines the HTTP client, the broadcast parser, the event scheduler and
//! an injected calendar publisher into the single batch pass the notifier
//! performs per invocation.

use tracing::{info, warn};

use crate::client::{ClientConfig, RanClient, NFL_LIVE_PATH};
use crate::config::NotifierConfig;
use crate::error::{NotifierError, Result};
use crate::parser::parse_broadcast_page;
use crate::publisher::CalendarPublisher;
use crate::schedule::EventScheduler;
use crate::types::BroadcastSchedule;

/// Outcome of one notifier run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Games discovered on the schedule page
    pub games_found: usize,
    /// Calendar events created
    pub events_created: usize,
    /// Games whose event could not be scheduled or published
    pub publish_failures: usize,
}

impl RunSummary {
    /// Returns true if every discovered game produced an event.
    pub fn is_success(&self) -> bool {
        self.publish_failures == 0
    }
}

/// Main notifier API
///
/// # Example
/// ```no_run
/// use nfl_notifier_core::{NflNotifier, NotifierConfig};
///
/// # async fn example() -> Result<(), nfl_notifier_core::NotifierError> {
/// let config = NotifierConfig::default();
/// let notifier = NflNotifier::new(&config)?;
/// let schedule = notifier.fetch_schedule().await?;
/// println!("found {} games", schedule.games.len());
/// # Ok(())
/// # }
/// ```
pub struct NflNotifier {
    client: RanClient,
    scheduler: EventScheduler,
}

impl NflNotifier {
    /// Create a notifier from a configuration.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created or the
    /// configured timezone is unknown.
    pub fn new(config: &NotifierConfig) -> Result<Self> {
        let client = RanClient::with_config(ClientConfig {
            timeout_secs: config.http.timeout_secs,
        })?;
        let scheduler = EventScheduler::from_timezone_name(&config.timezone)?;
        Ok(Self { client, scheduler })
    }

    /// Create a notifier from pre-built parts.
    pub fn with_parts(client: RanClient, scheduler: EventScheduler) -> Self {
        Self { client, scheduler }
    }

    /// Fetch and parse the broadcast schedule page.
    ///
    /// # Errors
    /// - `NotifierError::Http` / `PageUnavailable` - fetch failed
    /// - `NotifierError::StructureNotFound` - page markup changed
    pub async fn fetch_schedule(&self) -> Result<BroadcastSchedule> {
        let html = self.client.fetch(NFL_LIVE_PATH).await?;
        parse_broadcast_page(&html)
    }

    /// Create one calendar event per game in the schedule.
    ///
    /// Games are processed in document order. A failure to schedule or
    /// publish one game is logged and counted but does not stop the
    /// remaining games.
    ///
    /// # Errors
    /// Returns `NotifierError::IncompleteSchedule` if games were found but
    /// the page-level season, gameday or date is missing.
    pub async fn publish(
        &self,
        schedule: &BroadcastSchedule,
        publisher: &dyn CalendarPublisher,
    ) -> Result<RunSummary> {
        if schedule.games.is_empty() {
            info!("no games found on the schedule page");
            return Ok(RunSummary::default());
        }

        let season = require_label(&schedule.season, "season")?;
        let gameday = require_label(&schedule.gameday, "gameday")?;
        let date = require_label(&schedule.date, "date")?;

        let mut summary = RunSummary {
            games_found: schedule.games.len(),
            ..Default::default()
        };

        for game in &schedule.games {
            let request = match self.scheduler.event_request(season, gameday, date, game) {
                Ok(request) => request,
                Err(e) => {
                    warn!(game = %game.title, error = %e, "failed to schedule game");
                    summary.publish_failures += 1;
                    continue;
                }
            };

            match publisher.create_event(&request).await {
                Ok(created) => {
                    info!(
                        summary = %created.summary,
                        start = %created.start_date_time,
                        end = %created.end_date_time,
                        "event created"
                    );
                    summary.events_created += 1;
                }
                Err(e) => {
                    warn!(game = %game.title, error = %e, "failed to create event");
                    summary.publish_failures += 1;
                }
            }
        }

        Ok(summary)
    }

    /// Perform one full batch pass: fetch, parse, schedule and publish.
    pub async fn run(&self, publisher: &dyn CalendarPublisher) -> Result<RunSummary> {
        let schedule = self.fetch_schedule().await?;
        self.publish(&schedule, publisher).await
    }
}

fn require_label<'a>(label: &'a Option<String>, name: &str) -> Result<&'a str> {
    label.as_deref().ok_or_else(|| {
        NotifierError::IncompleteSchedule(format!("games found but no {} on the page", name))
    })
}
