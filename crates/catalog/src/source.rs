//! Data-source seam for the seismic catalog API.
//!
//! The trait is transport-free; the HTTP implementation lives in the viewer
//! binary and tests use scripted fakes.

use crate::mineplan::MinePlan;
use crate::records::{Event, Ray, ScatterSample, Site, StationPage};

/// Time window + workflow status for an event query. Instants are UTC ISO
/// strings, produced by `foundation::MineClock::query_instant_days_ago`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventQuery {
    pub start_time: String,
    pub end_time: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    Network(String),
    Status(u16),
    Decode(String),
}

impl std::fmt::Display for SourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceError::Network(msg) => write!(f, "catalog request failed: {msg}"),
            SourceError::Status(code) => write!(f, "catalog responded with HTTP {code}"),
            SourceError::Decode(msg) => write!(f, "catalog payload invalid: {msg}"),
        }
    }
}

impl std::error::Error for SourceError {}

#[allow(async_fn_in_trait)]
pub trait CatalogSource {
    async fn fetch_events(&self, query: &EventQuery) -> Result<Vec<Event>, SourceError>;

    async fn fetch_mine_plans(&self) -> Result<Vec<MinePlan>, SourceError>;

    /// One page of the station listing. `cursor` is `None` for the first
    /// page, or the `next` URL of the previous one.
    async fn fetch_stations_page(&self, cursor: Option<&str>)
        -> Result<StationPage, SourceError>;

    async fn fetch_rays(&self, event_resource_id: &str) -> Result<Vec<Ray>, SourceError>;

    /// Location-uncertainty scatter cloud for one event.
    async fn fetch_scatters(
        &self,
        event_resource_id: &str,
    ) -> Result<Vec<ScatterSample>, SourceError>;

    async fn fetch_sites(&self) -> Result<Vec<Site>, SourceError>;
}
