//! Finpersona Core - persona classification and goal allocation.
//!
//! This crate turns a user's income, region and spending split into a
//! behavioral persona and a target asset allocation for a selected goal.
//! It is pure and synchronous; persistence is reached through the
//! `ClassificationSink` trait.

pub mod allocation;
pub mod classification;
pub mod constants;
pub mod engine;
pub mod errors;
pub mod events;
pub mod goals;
pub mod personas;
pub mod profile;
pub mod reference;
pub mod simulation;

// Re-export the entry points
pub use engine::{ClassificationResult, PersonaEngine};
pub use profile::UserFinancialProfile;
pub use reference::ReferenceData;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
