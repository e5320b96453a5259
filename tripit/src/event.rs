//! Flight → calendar event expansion.
//!
//! A flight with N segments becomes N flight events plus a buffer before
//! the first departure and a buffer after the last arrival.

use chrono::{FixedOffset, TimeDelta};

use crate::error::{Boundary, ExpandError};
use crate::types::{Flight, FlightSegment};

/// Calendar colour for flight events.
pub const FLIGHT_COLOR_ID: &str = "3";
/// Calendar colour for buffer events.
pub const BUFFER_COLOR_ID: &str = "8";

const BUFFER_BEFORE_PREFIX: &str = "Buffer for travel time to";
const BUFFER_AFTER_PREFIX: &str = "Buffer for travel time from";

const DESCRIPTION_TIME_FORMAT: &str = "%a, %d %b %Y %H:%M:%S %z";

/// What an event represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Flight,
    /// Travel and security time before the first departure.
    BufferBefore,
    /// Travel time after the last arrival.
    BufferAfter,
}

impl EventKind {
    /// Recover the kind of an event we wrote earlier from its summary.
    pub fn classify(summary: &str) -> EventKind {
        if summary.starts_with(BUFFER_BEFORE_PREFIX) {
            EventKind::BufferBefore
        } else if summary.starts_with(BUFFER_AFTER_PREFIX) {
            EventKind::BufferAfter
        } else {
            EventKind::Flight
        }
    }

    pub fn color_id(&self) -> &'static str {
        match self {
            EventKind::Flight => FLIGHT_COLOR_ID,
            EventKind::BufferBefore | EventKind::BufferAfter => BUFFER_COLOR_ID,
        }
    }
}

/// An absolute instant plus the IANA zone it should be shown in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventTime {
    pub date_time: chrono::DateTime<FixedOffset>,
    pub time_zone: String,
}

impl EventTime {
    fn shifted(&self, delta: TimeDelta) -> EventTime {
        EventTime {
            date_time: self.date_time + delta,
            time_zone: self.time_zone.clone(),
        }
    }
}

/// A calendar-ready event derived from one flight segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDescriptor {
    pub kind: EventKind,
    pub title: String,
    /// Always contains `segment_id` verbatim.
    pub description: String,
    /// Airport whose name becomes the event location.
    pub airport_code: String,
    pub start: EventTime,
    pub end: EventTime,
    pub trip_id: String,
    pub segment_id: String,
    pub confirmation_number: String,
    pub color_id: &'static str,
}

/// Airline name, code and flight number shown for a segment.
struct Carrier<'a> {
    name: &'a str,
    code: &'a str,
    flight_number: &'a str,
}

impl FlightSegment {
    fn carrier(&self) -> Carrier<'_> {
        if self.operating_airline.is_empty() {
            Carrier {
                name: &self.marketing_airline,
                code: &self.marketing_airline_code,
                flight_number: &self.marketing_flight_number,
            }
        } else {
            Carrier {
                name: &self.operating_airline,
                code: &self.operating_airline_code,
                flight_number: &self.operating_flight_number,
            }
        }
    }
}

impl Flight {
    /// Supplier confirmation, falling back to the booking site's.
    pub fn confirmation_number(&self) -> &str {
        if !self.supplier_conf_num.is_empty() {
            &self.supplier_conf_num
        } else {
            &self.booking_site_conf_num
        }
    }

    /// Expand every segment into events.
    ///
    /// Fails for the whole flight on the first unparseable timestamp.
    pub fn segments_as_events(&self) -> Result<Vec<EventDescriptor>, ExpandError> {
        let mut events = Vec::with_capacity(self.segments.len() + 2);
        let last = self.segments.len().saturating_sub(1);

        for (i, segment) in self.segments.iter().enumerate() {
            let start = self.parse_boundary(segment, Boundary::Start)?;
            let end = self.parse_boundary(segment, Boundary::End)?;

            let carrier = segment.carrier();
            let description = self.describe(segment, &carrier, &start, &end);

            let event = |kind: EventKind, title: String, airport: &str, start: EventTime, end: EventTime| {
                EventDescriptor {
                    kind,
                    title,
                    description: description.clone(),
                    airport_code: airport.to_string(),
                    start,
                    end,
                    trip_id: self.trip_id.clone(),
                    segment_id: segment.id.clone(),
                    confirmation_number: self.confirmation_number().to_string(),
                    color_id: kind.color_id(),
                }
            };

            events.push(event(
                EventKind::Flight,
                format!(
                    "Flight to {} ({} {})",
                    segment.end_city_name, carrier.code, carrier.flight_number
                ),
                &segment.start_airport_code,
                start.clone(),
                end.clone(),
            ));

            if i == 0 {
                events.push(event(
                    EventKind::BufferBefore,
                    format!("{} {} & security", BUFFER_BEFORE_PREFIX, segment.start_airport_code),
                    &segment.start_airport_code,
                    start.shifted(TimeDelta::hours(-3)),
                    start.clone(),
                ));
            }

            if i == last {
                events.push(event(
                    EventKind::BufferAfter,
                    format!("{} {}", BUFFER_AFTER_PREFIX, segment.end_airport_code),
                    &segment.end_airport_code,
                    end.clone(),
                    end.shifted(TimeDelta::hours(2)),
                ));
            }
        }

        Ok(events)
    }

    fn parse_boundary(
        &self,
        segment: &FlightSegment,
        boundary: Boundary,
    ) -> Result<EventTime, ExpandError> {
        let raw = match boundary {
            Boundary::Start => &segment.start_date_time,
            Boundary::End => &segment.end_date_time,
        };

        let date_time = raw.parse().map_err(|source| ExpandError {
            boundary,
            trip_id: self.trip_id.clone(),
            segment_id: segment.id.clone(),
            start_airport: segment.start_airport_code.clone(),
            end_airport: segment.end_airport_code.clone(),
            source,
        })?;

        Ok(EventTime {
            date_time,
            time_zone: raw.timezone.clone(),
        })
    }

    fn describe(
        &self,
        segment: &FlightSegment,
        carrier: &Carrier<'_>,
        start: &EventTime,
        end: &EventTime,
    ) -> String {
        format!(
            "[Flight] {} to {}
{}

Booking Site ({}) Confirmation # {}
Supplier ({}) Confirmation # {}
Record Locator # {}

Airline: {} {}

Departing Terminal {} Gate {}

Arrive -> {} ({})
{}

Duration: {}

Distance: {}

Check-in URL: {}

View and/or edit details of this flight [{}]: https://www.tripit.com/{}

View and/or edit details of this trip: https://www.tripit.com/trip/show/id/{}",
            segment.start_airport_code,
            segment.end_airport_code,
            start.date_time.format(DESCRIPTION_TIME_FORMAT),
            self.booking_site_name,
            self.booking_site_conf_num,
            self.supplier_name,
            self.supplier_conf_num,
            self.record_locator,
            carrier.name,
            carrier.flight_number,
            segment.start_terminal,
            segment.start_gate,
            segment.end_city_name,
            segment.end_airport_code,
            end.date_time.format(DESCRIPTION_TIME_FORMAT),
            segment.duration,
            segment.distance,
            segment.check_in_url,
            segment.id,
            self.relative_url.trim_start_matches('/'),
            self.trip_id,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DateTime;

    fn dt(date: &str, time: &str, timezone: &str, offset: &str) -> DateTime {
        DateTime {
            date: date.to_string(),
            time: time.to_string(),
            timezone: timezone.to_string(),
            utc_offset: offset.to_string(),
        }
    }

    fn segment(id: &str, from: &str, to: &str, city: &str) -> FlightSegment {
        FlightSegment {
            id: id.to_string(),
            start_date_time: dt("2024-05-01", "08:00:00", "America/Los_Angeles", "-07:00"),
            end_date_time: dt("2024-05-01", "16:30:00", "America/New_York", "-04:00"),
            start_airport_code: from.to_string(),
            end_airport_code: to.to_string(),
            end_city_name: city.to_string(),
            start_terminal: "2".to_string(),
            start_gate: "54A".to_string(),
            marketing_airline: "United".to_string(),
            marketing_airline_code: "UA".to_string(),
            marketing_flight_number: "1234".to_string(),
            duration: "5h, 30m".to_string(),
            distance: "2,586 miles".to_string(),
            ..Default::default()
        }
    }

    fn flight(segments: Vec<FlightSegment>) -> Flight {
        Flight {
            id: "F1".to_string(),
            trip_id: "T100".to_string(),
            relative_url: "/reservation/show/id/F1".to_string(),
            booking_site_name: "Expedia".to_string(),
            booking_site_conf_num: "B1".to_string(),
            supplier_name: "United".to_string(),
            supplier_conf_num: "S1".to_string(),
            record_locator: "ABC123".to_string(),
            segments,
            ..Default::default()
        }
    }

    #[test]
    fn test_no_segments_no_events() {
        let events = flight(vec![]).segments_as_events().unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn test_single_segment_yields_flight_and_both_buffers() {
        let events = flight(vec![segment("SEG1", "SFO", "JFK", "New York")])
            .segments_as_events()
            .unwrap();

        assert_eq!(events.len(), 3);
        assert_eq!(events[0].kind, EventKind::Flight);
        assert_eq!(events[0].title, "Flight to New York (UA 1234)");
        assert_eq!(events[0].color_id, FLIGHT_COLOR_ID);
        assert_eq!(events[0].airport_code, "SFO");

        assert_eq!(events[1].kind, EventKind::BufferBefore);
        assert_eq!(events[1].title, "Buffer for travel time to SFO & security");
        assert_eq!(events[1].color_id, BUFFER_COLOR_ID);
        assert_eq!(events[1].end, events[0].start);
        assert_eq!(
            events[0].start.date_time - events[1].start.date_time,
            TimeDelta::hours(3)
        );
        assert_eq!(events[1].start.time_zone, "America/Los_Angeles");

        assert_eq!(events[2].kind, EventKind::BufferAfter);
        assert_eq!(events[2].title, "Buffer for travel time from JFK");
        assert_eq!(events[2].airport_code, "JFK");
        assert_eq!(events[2].start, events[0].end);
        assert_eq!(
            events[2].end.date_time - events[2].start.date_time,
            TimeDelta::hours(2)
        );
        assert_eq!(events[2].end.time_zone, "America/New_York");
    }

    #[test]
    fn test_two_segments_yield_four_events_in_order() {
        let events = flight(vec![
            segment("SEG1", "SFO", "ORD", "Chicago"),
            segment("SEG2", "ORD", "JFK", "New York"),
        ])
        .segments_as_events()
        .unwrap();

        let kinds: Vec<_> = events.iter().map(|e| (e.kind, e.segment_id.as_str())).collect();
        assert_eq!(
            kinds,
            vec![
                (EventKind::Flight, "SEG1"),
                (EventKind::BufferBefore, "SEG1"),
                (EventKind::Flight, "SEG2"),
                (EventKind::BufferAfter, "SEG2"),
            ]
        );
    }

    #[test]
    fn test_description_contains_segment_id() {
        let events = flight(vec![
            segment("SEG1", "SFO", "ORD", "Chicago"),
            segment("SEG2", "ORD", "JFK", "New York"),
        ])
        .segments_as_events()
        .unwrap();

        for event in &events {
            assert!(event.description.contains(&event.segment_id));
        }
    }

    #[test]
    fn test_description_layout() {
        let mut seg = segment("SEG1", "SFO", "JFK", "New York");
        seg.check_in_url = "https://united.com/checkin".to_string();
        let events = flight(vec![seg]).segments_as_events().unwrap();

        let expected = "[Flight] SFO to JFK
Wed, 01 May 2024 08:00:00 -0700

Booking Site (Expedia) Confirmation # B1
Supplier (United) Confirmation # S1
Record Locator # ABC123

Airline: United 1234

Departing Terminal 2 Gate 54A

Arrive -> New York (JFK)
Wed, 01 May 2024 16:30:00 -0400

Duration: 5h, 30m

Distance: 2,586 miles

Check-in URL: https://united.com/checkin

View and/or edit details of this flight [SEG1]: https://www.tripit.com/reservation/show/id/F1

View and/or edit details of this trip: https://www.tripit.com/trip/show/id/T100";

        assert_eq!(events[0].description, expected);
        assert!(events.iter().all(|e| e.description == expected));
    }

    #[test]
    fn test_operating_airline_takes_precedence() {
        let mut seg = segment("SEG1", "SFO", "JFK", "New York");
        seg.operating_airline = "SkyWest".to_string();
        seg.operating_airline_code = "OO".to_string();
        seg.operating_flight_number = "5678".to_string();

        let events = flight(vec![seg]).segments_as_events().unwrap();

        assert_eq!(events[0].title, "Flight to New York (OO 5678)");
        assert!(events[0].description.contains("Airline: SkyWest 5678\n"));
        assert!(!events[0].description.contains("UA"));
    }

    #[test]
    fn test_confirmation_number_precedence() {
        let mut f = flight(vec![segment("SEG1", "SFO", "JFK", "New York")]);
        for event in f.segments_as_events().unwrap() {
            assert_eq!(event.confirmation_number, "S1");
        }

        f.supplier_conf_num.clear();
        for event in f.segments_as_events().unwrap() {
            assert_eq!(event.confirmation_number, "B1");
        }

        f.booking_site_conf_num.clear();
        for event in f.segments_as_events().unwrap() {
            assert_eq!(event.confirmation_number, "");
        }
    }

    #[test]
    fn test_parse_failure_aborts_whole_flight() {
        let mut bad = segment("SEG2", "ORD", "JFK", "New York");
        bad.end_date_time = dt("not-a-date", "", "", "");

        let err = flight(vec![segment("SEG1", "SFO", "ORD", "Chicago"), bad])
            .segments_as_events()
            .unwrap_err();

        assert_eq!(err.boundary, Boundary::End);
        assert_eq!(err.trip_id, "T100");
        assert_eq!(err.segment_id, "SEG2");
        assert_eq!(err.start_airport, "ORD");
        assert_eq!(err.end_airport, "JFK");
    }

    #[test]
    fn test_classify_summary() {
        assert_eq!(
            EventKind::classify("Buffer for travel time to SFO & security"),
            EventKind::BufferBefore
        );
        assert_eq!(
            EventKind::classify("Buffer for travel time from JFK"),
            EventKind::BufferAfter
        );
        assert_eq!(
            EventKind::classify("Flight to New York (UA 1234)"),
            EventKind::Flight
        );
    }
}
