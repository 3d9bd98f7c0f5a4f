//! Remote collaborators — the research and planning services.
//!
//! The planner only talks to the [`TripBackend`] trait; [`HttpBackend`] is the
//! real implementation over the JSON endpoints.

pub mod http;
#[cfg(test)]
pub(crate) mod stub;

pub use http::HttpBackend;

use async_trait::async_trait;

use crate::error::TripError;

/// The two remote steps of a trip run.
#[async_trait]
pub trait TripBackend: Send + Sync {
    /// Turn a free-text query into unstructured background text.
    ///
    /// Errors are always [`TripError::Research`].
    async fn research(&self, input: &str) -> Result<String, TripError>;

    /// Turn research text plus the original query into a JSON-encoded itinerary.
    ///
    /// Returns the raw `plan` string; the caller parses it. Transport and
    /// status failures are [`TripError::Planning`], an unreadable envelope is
    /// [`TripError::PlanParse`].
    async fn plan(
        &self,
        research_content: &str,
        user_preferences: &str,
    ) -> Result<String, TripError>;
}
