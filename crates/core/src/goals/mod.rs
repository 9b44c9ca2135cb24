//! Goals module - goal definitions and the age-bracket suggestion catalog.

mod goals_model;

pub use goals_model::{GoalCatalog, GoalCategory, GoalDefinition, GoalPriority};
