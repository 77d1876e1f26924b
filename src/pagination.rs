//! Pagination metadata extraction.
//!
//! Last.fm reports pagination in two competing envelope shapes. Indexed
//! listings carry an `@attr` block:
//!
//! ```json
//! {"@attr": {"page": "1", "totalPages": "3", "total": "6"}}
//! ```
//!
//! while search results use OpenSearch keys:
//!
//! ```json
//! {"opensearch:itemsPerPage": "30", "opensearch:startIndex": "0",
//!  "opensearch:totalResults": "57"}
//! ```
//!
//! Both reduce to the same three derived values. The caller of a paginated
//! request picks the shape explicitly via [`PaginationStyle`]; no runtime
//! shape sniffing happens.

use crate::{LastFmError, Result};
use serde_json::Value;

/// Integer ceiling division.
pub(crate) fn ceildiv(numerator: u64, denominator: u64) -> u64 {
    numerator.div_ceil(denominator)
}

/// Coerce a numeric-string field to an integer.
///
/// The API renders every count as a string; empty or missing values mean 0.
fn integer(value: Option<&Value>) -> u64 {
    match value {
        Some(Value::String(s)) => s.parse().unwrap_or(0),
        Some(Value::Number(n)) => n.as_u64().unwrap_or(0),
        _ => 0,
    }
}

/// Which pagination shape to parse from a response envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaginationStyle {
    /// Indexed listings: an `@attr` block with `page`/`totalPages`/`total`.
    #[default]
    Indexed,
    /// Search results: `opensearch:itemsPerPage`/`startIndex`/`totalResults`.
    Search,
}

impl PaginationStyle {
    /// Extract pagination attributes from an (already unwrapped) envelope.
    pub fn parse(self, envelope: &Value) -> Result<PageAttributes> {
        match self {
            PaginationStyle::Indexed => PageAttributes::from_indexed(envelope),
            PaginationStyle::Search => PageAttributes::from_search(envelope),
        }
    }
}

/// Derived, read-only pagination view over one response envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageAttributes {
    /// Current page number as reported by the service.
    pub page: u32,
    /// Total number of pages, at least 1.
    pub total_pages: u32,
    /// Total number of items across all pages; may be 0.
    pub total: u64,
}

impl PageAttributes {
    /// Parse the indexed (`@attr`) form.
    pub fn from_indexed(envelope: &Value) -> Result<Self> {
        let attr = envelope
            .get("@attr")
            .ok_or_else(|| LastFmError::MissingKey {
                key: "@attr".to_string(),
            })?;

        Ok(Self {
            page: integer(attr.get("page")) as u32,
            total_pages: (integer(attr.get("totalPages")) as u32).max(1),
            total: integer(attr.get("total")),
        })
    }

    /// Parse the OpenSearch form used by the `*.search` methods.
    pub fn from_search(envelope: &Value) -> Result<Self> {
        if envelope.get("opensearch:totalResults").is_none() {
            return Err(LastFmError::MissingKey {
                key: "opensearch:totalResults".to_string(),
            });
        }

        // A zero itemsPerPage would make both derivations divide by zero.
        let items_per_page = integer(envelope.get("opensearch:itemsPerPage")).max(1);
        let start_index = integer(envelope.get("opensearch:startIndex"));
        let total = integer(envelope.get("opensearch:totalResults"));

        Ok(Self {
            page: (start_index / items_per_page) as u32,
            total_pages: (ceildiv(total, items_per_page) as u32).max(1),
            total,
        })
    }
}
