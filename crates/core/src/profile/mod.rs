//! Profile module - raw user input and its normalized form.

mod profile_model;
mod profile_normalizer;

pub use profile_model::{AgeBracket, NormalizedProfile, SpendCategory, UserFinancialProfile};
pub use profile_normalizer::{normalize_profile, NormalizerSettings};
