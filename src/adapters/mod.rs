//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `research` - Analysis service client (HTTP, mock)
//! - `github` - Issue tracker client (GitHub REST, mock)
//! - `document` - Rasterizer, PDF assembler and artifact store

pub mod document;
pub mod github;
pub mod research;
