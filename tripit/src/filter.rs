//! List filters, rendered as the slash-delimited path TripIt expects.

use std::fmt;

/// Filter keys accepted by the list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterType {
    /// valid on trip, object. Values: true, false, all
    Traveler,
    /// valid on trip, object. Values: true, false
    Past,
    /// valid on trip, object. Values: integer
    ModifiedSince,
    /// valid on trip. Values: true, false
    IncludeObjects,
    /// valid on object. Values: integer trip id
    TripId,
    /// valid on object. Values: all object types
    Type,
    PageNum,
    PageSize,
}

impl FilterType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterType::Traveler => "traveler",
            FilterType::Past => "past",
            FilterType::ModifiedSince => "modified_since",
            FilterType::IncludeObjects => "include_objects",
            FilterType::TripId => "trip_id",
            FilterType::Type => "type",
            FilterType::PageNum => "page_num",
            FilterType::PageSize => "page_size",
        }
    }
}

/// A single key/value filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub kind: FilterType,
    pub value: String,
}

impl Filter {
    pub fn new(kind: FilterType, value: impl Into<String>) -> Self {
        Filter {
            kind,
            value: value.into(),
        }
    }

    /// Boolean filters stay `bool` until they hit the wire.
    pub fn flag(kind: FilterType, value: bool) -> Self {
        Filter::new(kind, if value { "true" } else { "false" })
    }

    pub fn past(value: bool) -> Self {
        Filter::flag(FilterType::Past, value)
    }

    pub fn include_objects(value: bool) -> Self {
        Filter::flag(FilterType::IncludeObjects, value)
    }

    pub fn page_num(page: u32) -> Self {
        Filter::new(FilterType::PageNum, page.to_string())
    }

    pub fn page_size(size: u32) -> Self {
        Filter::new(FilterType::PageSize, size.to_string())
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/", self.kind.as_str(), self.value)
    }
}

/// Join filters in order and trim leading/trailing slashes.
pub fn format_filters(filters: &[Filter]) -> String {
    let joined: String = filters.iter().map(Filter::to_string).collect();
    joined.trim_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_filters_in_order() {
        let filters = [
            Filter::past(true),
            Filter::include_objects(true),
            Filter::page_num(1),
            Filter::page_size(25),
        ];

        assert_eq!(
            format_filters(&filters),
            "past/true/include_objects/true/page_num/1/page_size/25"
        );
    }

    #[test]
    fn test_format_filters_empty() {
        assert_eq!(format_filters(&[]), "");
    }

    #[test]
    fn test_flag_serializes_false() {
        assert_eq!(Filter::past(false).to_string(), "past/false/");
    }
}
