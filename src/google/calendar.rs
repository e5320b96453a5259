use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use google_calendar::Client;
use google_calendar::types::{OrderBy, SendUpdates};

use super::from_google::FromGoogle;
use super::to_google::ToGoogle;

/// Upper bound on events considered per listing.
pub const MAX_LISTED_EVENTS: usize = 2500;

/// Only events mentioning this are listed.
const FLIGHT_QUERY: &str = "Flight";

/// An instant plus the zone it is displayed in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarTime {
    pub date_time: DateTime<Utc>,
    pub time_zone: String,
}

/// Provider-neutral view of a calendar event.
///
/// `id` is empty for events that don't exist remotely yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    pub id: String,
    pub summary: String,
    pub description: String,
    pub location: String,
    pub start: CalendarTime,
    pub end: CalendarTime,
    pub color_id: String,
}

impl CalendarEvent {
    /// True when writing `other` over this event would change nothing.
    pub fn same_content(&self, other: &CalendarEvent) -> bool {
        self.summary == other.summary
            && self.description == other.description
            && self.location == other.location
            && self.start == other.start
            && self.end == other.end
            && self.color_id == other.color_id
    }
}

/// The calendar operations reconciliation needs.
#[async_trait]
pub trait CalendarService: Send + Sync {
    /// Non-deleted single events mentioning flights, starting at or after `since`.
    async fn list_flight_events(
        &self,
        calendar_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<CalendarEvent>>;

    async fn insert_event(&self, calendar_id: &str, event: &CalendarEvent)
    -> Result<CalendarEvent>;

    async fn update_event(
        &self,
        calendar_id: &str,
        event_id: &str,
        event: &CalendarEvent,
    ) -> Result<CalendarEvent>;
}

/// Google Calendar backed by a service-account access token.
pub struct GoogleCalendar {
    client: Client,
}

impl GoogleCalendar {
    pub fn new(access_token: String) -> Self {
        // A service account has no OAuth client of its own, only the token.
        let client = Client::new(
            String::new(),
            String::new(),
            String::new(),
            access_token,
            String::new(),
        );

        GoogleCalendar { client }
    }
}

#[async_trait]
impl CalendarService for GoogleCalendar {
    async fn list_flight_events(
        &self,
        calendar_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<CalendarEvent>> {
        let response = self
            .client
            .events()
            .list_all(
                calendar_id,
                "",
                0,
                OrderBy::StartTime,
                &[],
                FLIGHT_QUERY,
                &[],
                false, // show_deleted
                false,
                true, // single_events
                "",
                &since.to_rfc3339(),
                "",
                "",
            )
            .await
            .with_context(|| format!("Failed to list events in calendar {}", calendar_id))?;

        let mut events: Vec<CalendarEvent> = response
            .body
            .into_iter()
            .filter(|e| e.status != "cancelled" && !e.id.is_empty())
            .filter_map(|e| {
                let id = e.id.clone();
                CalendarEvent::from_google(e)
                    .map_err(|err| tracing::debug!(event_id = %id, "ignoring event: {err:#}"))
                    .ok()
            })
            .collect();

        events.truncate(MAX_LISTED_EVENTS);

        Ok(events)
    }

    async fn insert_event(
        &self,
        calendar_id: &str,
        event: &CalendarEvent,
    ) -> Result<CalendarEvent> {
        let mut google_event = event.to_google();
        google_event.id = String::new(); // Let Google assign the ID

        let response = self
            .client
            .events()
            .insert(
                calendar_id,
                0,
                0,
                false,
                SendUpdates::None,
                false,
                &google_event,
            )
            .await
            .with_context(|| format!("Failed to create event: {}", event.summary))?;

        CalendarEvent::from_google(response.body)
    }

    async fn update_event(
        &self,
        calendar_id: &str,
        event_id: &str,
        event: &CalendarEvent,
    ) -> Result<CalendarEvent> {
        let mut google_event = event.to_google();
        google_event.id = event_id.to_string();

        let response = self
            .client
            .events()
            .update(
                calendar_id,
                event_id,
                0,
                0,
                false,
                SendUpdates::None,
                false,
                &google_event,
            )
            .await
            .with_context(|| format!("Failed to update event {}: {}", event_id, event.summary))?;

        CalendarEvent::from_google(response.body)
    }
}
