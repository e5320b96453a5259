//! TripIt API response types.
//!
//! Only the objects this bot reads are modelled. Unknown keys are ignored.
//! TripIt sends a single-element collection as a bare object instead of an
//! array, so every collection goes through `one_or_many`.

use chrono::FixedOffset;
use serde::{Deserialize, Deserializer};

/// Top-level body of every TripIt API response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Response {
    pub timestamp: String,
    pub num_bytes: String,

    #[serde(rename = "Error", deserialize_with = "one_or_many")]
    pub errors: Vec<ApiError>,
    #[serde(rename = "Warning", deserialize_with = "one_or_many")]
    pub warnings: Vec<ApiWarning>,

    #[serde(rename = "Trip", deserialize_with = "one_or_many")]
    pub trips: Vec<Trip>,
    #[serde(rename = "AirObject", deserialize_with = "one_or_many")]
    pub flights: Vec<Flight>,
    #[serde(rename = "Profile", deserialize_with = "one_or_many")]
    pub profiles: Vec<Profile>,

    // Pagination metadata, strings on the wire
    pub page_num: String,
    pub page_size: String,
    pub max_page: String,
}

/// An error entry embedded in a response body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApiError {
    pub code: String,
    pub detailed_error_code: String,
    pub description: String,
    pub entity_type: String,
    pub timestamp: String,
}

/// A warning entry embedded in a response body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApiWarning {
    pub description: String,
    pub entity_type: String,
    pub timestamp: String,
}

/// An itinerary container. Read-only from our side.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Trip {
    pub id: String,
    pub relative_url: String,
    /// xs:date
    pub start_date: String,
    /// xs:date
    pub end_date: String,
    pub description: String,
    pub display_name: String,
    pub image_url: String,
    #[serde(deserialize_with = "bool_from_str")]
    pub is_private: bool,
    pub primary_location: String,
}

/// One booked air itinerary item.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Flight {
    pub id: String,
    pub trip_id: String,
    #[serde(deserialize_with = "bool_from_str")]
    pub is_client_traveler: bool,
    pub relative_url: String,
    pub display_name: String,
    #[serde(rename = "Image", deserialize_with = "one_or_many")]
    pub images: Vec<Image>,

    // Booking details
    pub booking_date: String,
    pub booking_rate: String,
    pub booking_site_conf_num: String,
    pub booking_site_name: String,
    pub booking_site_phone: String,
    pub booking_site_url: String,
    pub record_locator: String,

    // Supplier details
    pub supplier_conf_num: String,
    pub supplier_contact: String,
    pub supplier_email_address: String,
    pub supplier_name: String,
    pub supplier_phone: String,
    pub supplier_url: String,

    #[serde(deserialize_with = "bool_from_str")]
    pub is_purchased: bool,
    pub notes: String,
    pub restrictions: String,
    pub total_cost: String,

    #[serde(rename = "Segment", deserialize_with = "one_or_many")]
    pub segments: Vec<FlightSegment>,
    #[serde(rename = "Traveler", deserialize_with = "one_or_many")]
    pub travelers: Vec<Traveler>,
}

/// One point-to-point leg of a flight.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FlightSegment {
    pub id: String,
    #[serde(rename = "Status")]
    pub status: Option<FlightStatus>,
    #[serde(rename = "StartDateTime")]
    pub start_date_time: DateTime,
    #[serde(rename = "EndDateTime")]
    pub end_date_time: DateTime,

    pub start_airport_code: String,
    pub start_airport_latitude: String,
    pub start_airport_longitude: String,
    pub start_city_name: String,
    pub start_gate: String,
    pub start_terminal: String,

    pub end_airport_code: String,
    pub end_airport_latitude: String,
    pub end_airport_longitude: String,
    pub end_city_name: String,
    pub end_gate: String,
    pub end_terminal: String,

    pub marketing_airline: String,
    pub marketing_airline_code: String,
    pub marketing_flight_number: String,
    pub operating_airline: String,
    pub operating_airline_code: String,
    pub operating_flight_number: String,

    #[serde(rename = "alternate_flights_url")]
    pub alternative_flights_url: String,
    pub aircraft: String,
    pub aircraft_display_name: String,
    pub distance: String,
    pub duration: String,
    pub entertainment: String,
    pub meal: String,
    pub notes: String,
    pub ontime_perc: String,
    pub seats: String,
    pub service_class: String,
    pub stops: String,
    pub baggage_claim: String,
    pub check_in_url: String,
    pub conflict_resolution_url: String,
    #[serde(deserialize_with = "bool_from_str")]
    pub is_hidden: bool,
}

/// Live status, only present for monitored TripIt Pro segments.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FlightStatus {
    #[serde(rename = "ScheduledDepartureDateTime")]
    pub scheduled_departure: DateTime,
    #[serde(rename = "EstimatedDepartureDateTime")]
    pub estimated_departure: DateTime,
    #[serde(rename = "ScheduledArrivalDateTime")]
    pub scheduled_arrival: DateTime,
    #[serde(rename = "EstimatedArrivalDateTime")]
    pub estimated_arrival: DateTime,
    pub flight_status: String,
    #[serde(deserialize_with = "bool_from_str")]
    pub is_connection_at_risk: bool,
    pub departure_terminal: String,
    pub departure_gate: String,
    pub arrival_terminal: String,
    pub arrival_gate: String,
    pub layover_minutes: String,
    pub baggage_claim: String,
    pub diverted_airport_code: String,
    pub last_modified: String,
}

/// TripIt's split date/time representation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DateTime {
    /// xs:date, e.g. "2024-05-01"
    pub date: String,
    /// xs:time, e.g. "14:30:00"
    pub time: String,
    /// IANA zone name, e.g. "America/Los_Angeles"
    pub timezone: String,
    /// e.g. "-07:00"; empty means UTC
    pub utc_offset: String,
}

impl DateTime {
    /// Combine date, time and offset into an absolute timestamp.
    pub fn parse(&self) -> Result<chrono::DateTime<FixedOffset>, chrono::ParseError> {
        let offset = if self.utc_offset.is_empty() {
            "Z"
        } else {
            self.utc_offset.as_str()
        };

        chrono::DateTime::parse_from_rfc3339(&format!("{}T{}{}", self.date, self.time, offset))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Image {
    pub caption: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Traveler {
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub frequent_traveler_num: String,
    pub frequent_traveler_supplier: String,
    pub meal_preference: String,
    pub seat_preference: String,
    pub ticket_num: String,
}

/// The authenticated user's profile.
///
/// TripIt tags profiles with an `@attributes` object, which reaches us as
/// `_attributes` after `client::rewrite_attribute_keys`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Profile {
    #[serde(rename = "_attributes")]
    pub attributes: Option<Attributes>,
    pub screen_name: String,
    pub public_display_name: String,
    pub profile_url: String,
    pub home_city: String,
    pub company: String,
    pub about_me_info: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Attributes {
    #[serde(rename = "ref")]
    pub reference: String,
}

/// Accept `[..]`, a bare object, `null`, or a missing key.
fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany<T> {
        Many(Vec<T>),
        One(T),
    }

    Ok(match Option::<OneOrMany<T>>::deserialize(deserializer)? {
        Some(OneOrMany::Many(items)) => items,
        Some(OneOrMany::One(item)) => vec![item],
        None => Vec::new(),
    })
}

/// TripIt sends booleans as "true"/"false" strings.
fn bool_from_str<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrString {
        Bool(bool),
        String(String),
    }

    Ok(match Option::<BoolOrString>::deserialize(deserializer)? {
        Some(BoolOrString::Bool(b)) => b,
        Some(BoolOrString::String(s)) => s.eq_ignore_ascii_case("true"),
        None => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_flight_object_becomes_vec() {
        let json = r#"{
            "AirObject": {
                "id": "1",
                "trip_id": "100",
                "Segment": {"id": "S1", "start_airport_code": "SFO"}
            },
            "page_num": "1",
            "max_page": "1"
        }"#;

        let resp: Response = serde_json::from_str(json).unwrap();
        assert_eq!(resp.flights.len(), 1);
        assert_eq!(resp.flights[0].segments.len(), 1);
        assert_eq!(resp.flights[0].segments[0].start_airport_code, "SFO");
    }

    #[test]
    fn test_flight_array_and_missing_collections() {
        let json = r#"{
            "AirObject": [{"id": "1"}, {"id": "2", "Segment": null}]
        }"#;

        let resp: Response = serde_json::from_str(json).unwrap();
        assert_eq!(resp.flights.len(), 2);
        assert!(resp.flights[1].segments.is_empty());
        assert!(resp.trips.is_empty());
        assert!(resp.warnings.is_empty());
    }

    #[test]
    fn test_string_booleans() {
        let json = r#"{"id": "1", "is_purchased": "true", "is_client_traveler": "false"}"#;
        let flight: Flight = serde_json::from_str(json).unwrap();
        assert!(flight.is_purchased);
        assert!(!flight.is_client_traveler);
    }

    #[test]
    fn test_date_time_parse_with_offset() {
        let dt = DateTime {
            date: "2024-05-01".to_string(),
            time: "14:30:00".to_string(),
            timezone: "America/Los_Angeles".to_string(),
            utc_offset: "-07:00".to_string(),
        };

        let parsed = dt.parse().unwrap();
        assert_eq!(parsed.to_rfc3339(), "2024-05-01T14:30:00-07:00");
    }

    #[test]
    fn test_date_time_parse_without_offset_is_utc() {
        let dt = DateTime {
            date: "2024-05-01".to_string(),
            time: "14:30:00".to_string(),
            ..Default::default()
        };

        let parsed = dt.parse().unwrap();
        assert_eq!(parsed.offset().local_minus_utc(), 0);
    }

    #[test]
    fn test_date_time_parse_rejects_empty() {
        assert!(DateTime::default().parse().is_err());
    }
}
