//! Reference module - built-in tables and the JSON loader.

mod reference_defaults;
mod reference_model;

pub use reference_defaults::{
    default_allocation_bands, default_decision_table, default_goal_catalog, default_personas,
    default_region_index,
};
pub use reference_model::ReferenceData;
