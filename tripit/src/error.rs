//! Error types for the TripIt client and event expansion.

use thiserror::Error;

/// Errors that can occur while talking to the TripIt API.
#[derive(Error, Debug)]
pub enum TripItError {
    #[error("performing {method} request to {url} failed: {source}")]
    Request {
        method: String,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{method} request to {url} returned status code {status}: message -> {message}\nbody -> {body}")]
    Status {
        method: String,
        url: String,
        status: u16,
        message: String,
        body: String,
    },

    #[error("decoding response from {method} request to {url} failed: body -> {body}\nerr -> {source}")]
    Decode {
        method: String,
        url: String,
        body: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("get {kind} id {id} returned an empty result")]
    EmptyResult { kind: &'static str, id: String },

    #[error("invalid {field} {value:?} in list response: {source}")]
    InvalidPage {
        field: &'static str,
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    #[error("requested page {requested} but the list response reports page {returned}")]
    PageMismatch { requested: u32, returned: u32 },
}

/// Result type alias for TripIt operations.
pub type TripItResult<T> = Result<T, TripItError>;

/// Which end of a segment failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    Start,
    End,
}

impl std::fmt::Display for Boundary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Boundary::Start => f.write_str("StartDateTime"),
            Boundary::End => f.write_str("EndDateTime"),
        }
    }
}

/// A flight could not be expanded into events.
///
/// Expansion is all-or-nothing per flight, so this always describes the
/// first segment that failed.
#[derive(Error, Debug)]
#[error(
    "parsing {boundary} for tripID -> {trip_id}, segment -> {segment_id}, from {start_airport} -> {end_airport} failed: {source}"
)]
pub struct ExpandError {
    pub boundary: Boundary,
    pub trip_id: String,
    pub segment_id: String,
    pub start_airport: String,
    pub end_airport: String,
    #[source]
    pub source: chrono::ParseError,
}
