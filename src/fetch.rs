//! Paginated retrieval of flights and their expansion into events.

use async_trait::async_trait;
use tripit::{EventDescriptor, Filter, Response, TripItError, TripItResult};

/// Trips requested per page.
pub const PAGE_SIZE: u32 = 25;

/// Anything that can answer a TripIt list-trips call.
#[async_trait]
pub trait TripSource: Send + Sync {
    async fn list_trips(&self, filters: &[Filter]) -> TripItResult<Response>;
}

#[async_trait]
impl TripSource for tripit::Client {
    async fn list_trips(&self, filters: &[Filter]) -> TripItResult<Response> {
        tripit::Client::list_trips(self, filters).await
    }
}

/// Fetch every flight and expand it into event descriptors.
///
/// Walks all pages of past trips (when `include_past`) and then all pages of
/// future trips. A flight that can't be expanded is logged and skipped; any
/// request or paging failure aborts the whole fetch.
pub async fn fetch_events<S>(source: &S, include_past: bool) -> TripItResult<Vec<EventDescriptor>>
where
    S: TripSource + ?Sized,
{
    let passes: &[bool] = if include_past { &[true, false] } else { &[false] };
    let mut events = Vec::new();

    for &past in passes {
        let mut page = 1;

        loop {
            let filters = [
                Filter::past(past),
                Filter::include_objects(true),
                Filter::page_num(page),
                Filter::page_size(PAGE_SIZE),
            ];
            let resp = source.list_trips(&filters).await?;

            tracing::debug!(
                past,
                page,
                flights = resp.flights.len(),
                "fetched trips page"
            );

            for flight in &resp.flights {
                match flight.segments_as_events() {
                    Ok(mut expanded) => events.append(&mut expanded),
                    Err(e) => tracing::warn!(
                        trip_id = %flight.trip_id,
                        flight_id = %flight.id,
                        "skipping flight: {e}"
                    ),
                }
            }

            let page_num = parse_page("page_num", &resp.page_num)?;
            let max_page = parse_page("max_page", &resp.max_page)?;

            if page_num != page {
                return Err(TripItError::PageMismatch {
                    requested: page,
                    returned: page_num,
                });
            }
            if page_num >= max_page {
                break;
            }
            page += 1;
        }
    }

    Ok(events)
}

fn parse_page(field: &'static str, value: &str) -> TripItResult<u32> {
    value
        .trim()
        .parse()
        .map_err(|source| TripItError::InvalidPage {
            field,
            value: value.to_string(),
            source,
        })
}
