//! Engine module - wires the pipeline stages together.
//!
//! ```text
//! normalize → tier → behavior → dominant category
//!     → rule table (→ vector similarity when undecided)
//!     → goal allocation → consistency check
//! ```

mod engine_model;
mod engine_service;
mod result_validator;

pub use engine_model::ClassificationResult;
pub use engine_service::PersonaEngine;
pub use result_validator::validate_result;
