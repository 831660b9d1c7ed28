//! Event scheduling for extracted broadcasts
//!
//! Turns the page-level date strings and per-game kickoff times into
//! timezone-aware calendar event requests. The page is German, so month
//! names are resolved against an explicit German table instead of chrono's
//! English-only `%B`.

use chrono::{Duration, NaiveDate, NaiveTime, TimeZone};
use chrono_tz::Tz;

use crate::error::{NotifierError, Result};
use crate::types::{EventRequest, Game};

/// Assumed game length; the page carries no end times
const GAME_DURATION_MINUTES: i64 = 210;

/// German month names, index 0 = Januar
const GERMAN_MONTHS: [&str; 12] = [
    "Januar",
    "Februar",
    "März",
    "April",
    "Mai",
    "Juni",
    "Juli",
    "August",
    "September",
    "Oktober",
    "November",
    "Dezember",
];

/// Builds calendar event requests for extracted games
///
/// All timestamps are computed in a single configurable timezone
/// (default "Europe/Berlin", the timezone of the source page).
#[derive(Debug, Clone)]
pub struct EventScheduler {
    timezone: Tz,
}

impl EventScheduler {
    /// Create a scheduler for the given timezone.
    pub fn new(timezone: Tz) -> Self {
        Self { timezone }
    }

    /// Create a scheduler from an IANA timezone name.
    ///
    /// # Errors
    /// Returns `NotifierError::Config` for unknown timezone names.
    pub fn from_timezone_name(name: &str) -> Result<Self> {
        let timezone: Tz = name
            .parse()
            .map_err(|_| NotifierError::Config(format!("unknown timezone: {}", name)))?;
        Ok(Self::new(timezone))
    }

    /// The timezone this scheduler computes timestamps in.
    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Build the event request for one game.
    ///
    /// The kickoff is the page-level date (e.g. "7. September") in the
    /// page-level season year with the game's "HH:MM" time overlaid; the end
    /// is kickoff plus the fixed game duration.
    ///
    /// # Errors
    /// Returns `NotifierError::DateParse` if the date, season or kickoff
    /// time cannot be parsed or the local time does not exist in the
    /// scheduler's timezone.
    pub fn event_request(
        &self,
        season: &str,
        gameday: &str,
        date: &str,
        game: &Game,
    ) -> Result<EventRequest> {
        let day = parse_german_date(date, season)?;
        let time = NaiveTime::parse_from_str(&game.kickoff, "%H:%M")
            .map_err(|_| NotifierError::DateParse(format!("invalid kickoff time: {}", game.kickoff)))?;

        let naive = day.and_time(time);
        let start = self
            .timezone
            .from_local_datetime(&naive)
            .single()
            .ok_or_else(|| {
                NotifierError::DateParse(format!(
                    "local time {} is ambiguous or nonexistent in {}",
                    naive, self.timezone
                ))
            })?;
        let end = start + Duration::minutes(GAME_DURATION_MINUTES);

        Ok(EventRequest {
            summary: format!("{}: {} {}", gameday, game.title, game.broadcaster),
            description: format!("{}: {}", game.broadcaster, game.url),
            start: start.to_rfc3339(),
            end: end.to_rfc3339(),
            timezone: self.timezone.name().to_string(),
        })
    }
}

/// Parse a German date like "7. September" together with a season year.
///
/// # Errors
/// Returns `NotifierError::DateParse` for unknown months, bad day numbers
/// or a season that is not a year.
fn parse_german_date(date: &str, season: &str) -> Result<NaiveDate> {
    let year: i32 = season
        .trim()
        .parse()
        .map_err(|_| NotifierError::DateParse(format!("season is not a year: {}", season)))?;

    let re = regex_lite::Regex::new(r"(\d{1,2})\.\s*([A-Za-zäöüÄÖÜß]+)")
        .map_err(|e| NotifierError::Parse(format!("invalid date pattern: {}", e)))?;
    let caps = re
        .captures(date)
        .ok_or_else(|| NotifierError::DateParse(format!("unrecognized date: {}", date)))?;

    let day: u32 = caps[1]
        .parse()
        .map_err(|_| NotifierError::DateParse(format!("invalid day in: {}", date)))?;
    let month_name = &caps[2];

    let month = GERMAN_MONTHS
        .iter()
        .position(|m| *m == month_name)
        .map(|i| i as u32 + 1)
        .ok_or_else(|| NotifierError::DateParse(format!("unknown month: {}", month_name)))?;

    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| NotifierError::DateParse(format!("invalid date: {} {}", date, season)))
}
