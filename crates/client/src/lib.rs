//! Ghost Security API client.
//!
//! Retrieves security findings and repositories from the cursor-paginated
//! upstream API and reshapes them for token-limited consumers: bounded
//! cursor walks, lightweight summary projection, and grouped statistics
//! with a self-healing count path.

mod aggregate;
mod client;
mod config;
mod error;
mod fetch;
mod model;
mod project;
mod schema;
#[cfg(test)]
mod test_support;
mod walk;

pub use aggregate::aggregate;
pub use client::{GhostClient, INTERACTIVE_SIZE_CAP};
pub use config::{GhostConfig, DEFAULT_BASE_URL};
pub use error::{ClientError, Result};
pub use fetch::{fetch_page, HttpTransport, Transport};
pub use model::{
    CastFilter, CountResult, EndpointsQuery, FindingsQuery, Page, ReposQuery, ResponseMode,
    SortField, SortOrder, Validation,
};
pub use project::{project_items, summarize};
pub use schema::{ApiVersion, LocationFacet, RecordFacets};
pub use walk::{walk_pages, WalkOutcome, WalkPolicy};
