use super::calendar::{CalendarEvent, CalendarTime};

pub trait ToGoogle {
    fn to_google(&self) -> google_calendar::types::Event;
}

impl ToGoogle for CalendarEvent {
    fn to_google(&self) -> google_calendar::types::Event {
        google_calendar::types::Event {
            id: self.id.clone(),
            summary: self.summary.clone(),
            description: self.description.clone(),
            location: self.location.clone(),
            start: Some(time_to_google(&self.start)),
            end: Some(time_to_google(&self.end)),
            color_id: self.color_id.clone(),
            ..Default::default()
        }
    }
}

fn time_to_google(time: &CalendarTime) -> google_calendar::types::EventDateTime {
    google_calendar::types::EventDateTime {
        date: None,
        date_time: Some(time.date_time),
        time_zone: time.time_zone.clone(),
    }
}
