//! Calendar event publishing
//!
//! This module defines the publisher seam the scheduler hands events to and
//! the Google Calendar implementation of it. The publisher owns nothing but
//! the HTTP call; token lifecycle lives in `auth`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{NotifierError, Result};
use crate::types::{CreatedEvent, EventRequest};

/// Base URL for Google Calendar API v3.
const CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// A calendar service that can create events
///
/// Injected into the notifier so runs can be tested (and dry-run) without
/// touching a real calendar.
#[async_trait]
pub trait CalendarPublisher: Send + Sync {
    /// Create one calendar event and return the service's record of it.
    async fn create_event(&self, request: &EventRequest) -> Result<CreatedEvent>;
}

/// Google Calendar API publisher
#[derive(Debug)]
pub struct GoogleCalendarPublisher {
    http_client: reqwest::Client,
    access_token: String,
    calendar_id: String,
    api_base: String,
}

impl GoogleCalendarPublisher {
    /// Creates a publisher for the given calendar with a bearer access token.
    pub fn new(access_token: impl Into<String>, calendar_id: impl Into<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            access_token: access_token.into(),
            calendar_id: calendar_id.into(),
            api_base: CALENDAR_API_BASE.to_string(),
        }
    }

    /// Updates the access token (after refresh).
    pub fn set_access_token(&mut self, token: impl Into<String>) {
        self.access_token = token.into();
    }

    /// Points the publisher at a different API base (for testing).
    #[cfg(test)]
    fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }
}

#[async_trait]
impl CalendarPublisher for GoogleCalendarPublisher {
    async fn create_event(&self, request: &EventRequest) -> Result<CreatedEvent> {
        let url = format!("{}/calendars/{}/events", self.api_base, self.calendar_id);

        let body = ApiEventBody {
            summary: request.summary.clone(),
            description: request.description.clone(),
            start: ApiEventTime {
                date_time: request.start.clone(),
                time_zone: request.timezone.clone(),
            },
            end: ApiEventTime {
                date_time: request.end.clone(),
                time_zone: request.timezone.clone(),
            },
        };

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(NotifierError::Auth(
                "access token expired or invalid".to_string(),
            ));
        }

        if status == reqwest::StatusCode::FORBIDDEN {
            return Err(NotifierError::Auth("access denied to calendar".to_string()));
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(NotifierError::Publish {
                status: status.as_u16(),
                message,
            });
        }

        let created: ApiCreatedEvent = response.json().await.map_err(|e| {
            NotifierError::Parse(format!("failed to parse calendar response: {}", e))
        })?;

        Ok(CreatedEvent {
            summary: created.summary.unwrap_or_default(),
            start_date_time: created.start.and_then(|t| t.date_time).unwrap_or_default(),
            end_date_time: created.end.and_then(|t| t.date_time).unwrap_or_default(),
        })
    }
}

/// Request body for the events.insert endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiEventBody {
    summary: String,
    description: String,
    start: ApiEventTime,
    end: ApiEventTime,
}

/// Event time in the insert request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiEventTime {
    date_time: String,
    time_zone: String,
}

/// Response from the events.insert endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiCreatedEvent {
    summary: Option<String>,
    start: Option<ApiCreatedEventTime>,
    end: Option<ApiCreatedEventTime>,
}

/// Event time in the insert response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiCreatedEventTime {
    date_time: Option<String>,
}
