//! Matching itinerary events against the calendar and writing the difference.

use std::collections::HashSet;

use anyhow::{Context, Result};
use chrono::{DateTime, Months, Utc};
use tracing::Instrument;
use tripit::{EventDescriptor, EventKind, EventTime};

use crate::airports;
use crate::google::{CalendarEvent, CalendarService, CalendarTime};

/// How far back existing calendar events are considered.
const LOOKBACK_MONTHS: u32 = 4 * 12;

/// Outcome counts for one reconciliation pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileStats {
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// List the flight events our descriptors may match.
pub async fn list_existing<C>(
    calendar: &C,
    calendar_id: &str,
    now: DateTime<Utc>,
) -> Result<Vec<CalendarEvent>>
where
    C: CalendarService + ?Sized,
{
    let since = now
        .checked_sub_months(Months::new(LOOKBACK_MONTHS))
        .unwrap_or(DateTime::<Utc>::MIN_UTC);

    calendar
        .list_flight_events(calendar_id, since)
        .await
        .with_context(|| format!("Failed to list existing flight events in {}", calendar_id))
}

/// What happened to a single descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Created,
    Updated,
    Unchanged,
    Skipped,
    Failed,
}

impl ReconcileStats {
    fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Created => self.created += 1,
            Outcome::Updated => self.updated += 1,
            Outcome::Unchanged => self.unchanged += 1,
            Outcome::Skipped => self.skipped += 1,
            Outcome::Failed => self.failed += 1,
        }
    }
}

/// Create or update one calendar event per descriptor.
///
/// Per-descriptor failures are logged and counted, never returned.
pub async fn reconcile<C>(
    calendar: &C,
    calendar_id: &str,
    existing: &[CalendarEvent],
    descriptors: &[EventDescriptor],
) -> ReconcileStats
where
    C: CalendarService + ?Sized,
{
    let mut stats = ReconcileStats::default();
    let mut claimed = HashSet::new();

    for descriptor in descriptors {
        let span = tracing::info_span!(
            "event",
            trip_id = %descriptor.trip_id,
            segment_id = %descriptor.segment_id,
            airport = %descriptor.airport_code,
        );

        let matched = if descriptor.confirmation_number.is_empty() {
            None
        } else {
            find_match(existing, &claimed, descriptor)
        };
        if let Some(index) = matched {
            claimed.insert(index);
        }

        let outcome = sync_one(calendar, calendar_id, descriptor, matched.map(|i| &existing[i]))
            .instrument(span)
            .await;
        stats.record(outcome);
    }

    stats
}

async fn sync_one<C>(
    calendar: &C,
    calendar_id: &str,
    descriptor: &EventDescriptor,
    matched: Option<&CalendarEvent>,
) -> Outcome
where
    C: CalendarService + ?Sized,
{
    if descriptor.confirmation_number.is_empty() {
        tracing::warn!("no confirmation number for {:?}, skipping", descriptor.title);
        return Outcome::Skipped;
    }

    let Some(location) = airports::airport_name(&descriptor.airport_code) else {
        tracing::error!(
            "no airport found for code {:?}, skipping {:?}",
            descriptor.airport_code,
            descriptor.title
        );
        return Outcome::Skipped;
    };

    let desired = desired_event(descriptor, location);

    let Some(current) = matched else {
        return match calendar.insert_event(calendar_id, &desired).await {
            Ok(created) => {
                tracing::info!(event_id = %created.id, "created {:?}", desired.summary);
                Outcome::Created
            }
            Err(e) => {
                tracing::error!("creating {:?} failed: {e:#}", desired.summary);
                Outcome::Failed
            }
        };
    };

    if current.same_content(&desired) {
        tracing::debug!(event_id = %current.id, "{:?} is up to date", desired.summary);
        return Outcome::Unchanged;
    }

    match calendar.update_event(calendar_id, &current.id, &desired).await {
        Ok(_) => {
            tracing::info!(event_id = %current.id, "updated {:?}", desired.summary);
            Outcome::Updated
        }
        Err(e) => {
            tracing::error!(event_id = %current.id, "updating {:?} failed: {e:#}", desired.summary);
            Outcome::Failed
        }
    }
}

/// First unclaimed event written for the same segment and kind.
///
/// Kinds come from the existing summary, so buffer descriptors only match
/// events whose summary starts with "Buffer for travel time". A TripIt event
/// with any other summary is never taken over by a buffer; the buffer is
/// created beside it.
fn find_match(
    existing: &[CalendarEvent],
    claimed: &HashSet<usize>,
    descriptor: &EventDescriptor,
) -> Option<usize> {
    if descriptor.segment_id.is_empty() {
        return None;
    }

    existing
        .iter()
        .enumerate()
        .find(|(i, event)| {
            !claimed.contains(i)
                && mentions_tripit_or_flight(event)
                && event.description.contains(&descriptor.segment_id)
                && EventKind::classify(&event.summary) == descriptor.kind
        })
        .map(|(i, _)| i)
}

fn mentions_tripit_or_flight(event: &CalendarEvent) -> bool {
    [&event.description, &event.summary].iter().any(|text| {
        let text = text.to_lowercase();
        text.contains("tripit") || text.contains("flight")
    })
}

fn desired_event(descriptor: &EventDescriptor, location: &str) -> CalendarEvent {
    CalendarEvent {
        id: String::new(),
        summary: descriptor.title.clone(),
        description: descriptor.description.clone(),
        location: location.to_string(),
        start: calendar_time(&descriptor.start),
        end: calendar_time(&descriptor.end),
        color_id: descriptor.color_id.to_string(),
    }
}

fn calendar_time(time: &EventTime) -> CalendarTime {
    CalendarTime {
        date_time: time.date_time.with_timezone(&Utc),
        time_zone: time.time_zone.clone(),
    }
}
