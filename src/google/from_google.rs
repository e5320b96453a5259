use anyhow::{Result, bail};

use super::calendar::{CalendarEvent, CalendarTime};

pub trait FromGoogle {
    fn from_google(event: google_calendar::types::Event) -> Result<Self>
    where
        Self: Sized;
}

impl FromGoogle for CalendarEvent {
    fn from_google(event: google_calendar::types::Event) -> Result<Self> {
        // All-day events never come from us, so they have no timed boundary.
        let Some(start) = event.start.as_ref().and_then(time_from_google) else {
            bail!("Event has no start time");
        };
        let Some(end) = event.end.as_ref().and_then(time_from_google) else {
            bail!("Event has no end time");
        };

        Ok(CalendarEvent {
            id: event.id,
            summary: event.summary,
            description: event.description,
            location: event.location,
            start,
            end,
            color_id: event.color_id,
        })
    }
}

fn time_from_google(time: &google_calendar::types::EventDateTime) -> Option<CalendarTime> {
    time.date_time.map(|date_time| CalendarTime {
        date_time,
        time_zone: time.time_zone.clone(),
    })
}
