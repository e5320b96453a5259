//! TripIt API client and itinerary types.
//!
//! This crate knows how to talk to the TripIt v1 JSON API and how to turn
//! the flights it returns into calendar-ready event descriptors:
//! - `client` for the HTTP side (auth, filters, status diagnostics)
//! - `types` for the response data model
//! - `event` for flight segment → event expansion

pub mod client;
pub mod error;
pub mod event;
pub mod filter;
pub mod types;

pub use client::Client;
pub use error::{ExpandError, TripItError, TripItResult};
pub use event::{EventDescriptor, EventKind, EventTime};
pub use filter::{Filter, FilterType};
pub use types::*;
