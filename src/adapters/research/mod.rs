//! Research service adapters.
//!
//! - `HttpResearchClient` - JSON-over-HTTP client for the analysis service
//! - `MockResearchService` - In-memory stand-in for tests

mod http_research_client;
mod mock_research_service;

pub use http_research_client::{HttpResearchClient, HttpResearchConfig};
pub use mock_research_service::{MockOutcome, MockResearchService, DEFAULT_MOCK_BODY};
