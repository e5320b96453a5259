//! Test doubles shared across modules.

use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::google::{CalendarEvent, CalendarService};

/// In-memory calendar recording every write.
#[derive(Default)]
pub struct FakeCalendar {
    pub events: Mutex<Vec<CalendarEvent>>,
    pub inserts: Mutex<Vec<CalendarEvent>>,
    pub updates: Mutex<Vec<(String, CalendarEvent)>>,
    pub fail_writes: bool,
    pub fail_list: bool,
}

impl FakeCalendar {
    pub fn with_events(events: Vec<CalendarEvent>) -> Self {
        FakeCalendar {
            events: Mutex::new(events),
            ..Default::default()
        }
    }

    pub fn snapshot(&self) -> Vec<CalendarEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn insert_count(&self) -> usize {
        self.inserts.lock().unwrap().len()
    }

    pub fn update_count(&self) -> usize {
        self.updates.lock().unwrap().len()
    }
}

#[async_trait]
impl CalendarService for FakeCalendar {
    async fn list_flight_events(
        &self,
        _calendar_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<CalendarEvent>> {
        if self.fail_list {
            anyhow::bail!("listing rejected");
        }

        Ok(self
            .snapshot()
            .into_iter()
            .filter(|e| e.start.date_time >= since)
            .collect())
    }

    async fn insert_event(
        &self,
        _calendar_id: &str,
        event: &CalendarEvent,
    ) -> Result<CalendarEvent> {
        self.inserts.lock().unwrap().push(event.clone());
        if self.fail_writes {
            anyhow::bail!("insert rejected");
        }

        let mut events = self.events.lock().unwrap();
        let mut created = event.clone();
        created.id = format!("evt-{}", events.len());
        events.push(created.clone());
        Ok(created)
    }

    async fn update_event(
        &self,
        _calendar_id: &str,
        event_id: &str,
        event: &CalendarEvent,
    ) -> Result<CalendarEvent> {
        self.updates
            .lock()
            .unwrap()
            .push((event_id.to_string(), event.clone()));
        if self.fail_writes {
            anyhow::bail!("update rejected");
        }

        let mut events = self.events.lock().unwrap();
        let mut updated = event.clone();
        updated.id = event_id.to_string();
        if let Some(slot) = events.iter_mut().find(|e| e.id == event_id) {
            *slot = updated.clone();
        }
        Ok(updated)
    }
}
