//! Shared domain primitives (value objects, IDs, errors).

mod errors;
mod ids;
mod timestamp;

pub use errors::ValidationError;
pub use ids::ResearchId;
pub use timestamp::Timestamp;
