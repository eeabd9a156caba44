//! PRD Expert - Market research workflow for product ideas
//!
//! Collects a structured product idea, sends it to a language-model-backed
//! research service, and turns the returned market analysis into derived
//! artifacts: an image-based paginated PDF or a GitHub issue.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
