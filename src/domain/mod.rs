//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors)
//! - `research` - Product ideas, analysis results and the history cache
//! - `export` - Page-band pagination and artifact naming
//! - `publication` - Repository references and issue composition

pub mod export;
pub mod foundation;
pub mod publication;
pub mod research;
