//! Simulation module - seeded synthetic populations for distribution checks.

mod population_simulator;
mod simulation_model;

pub use population_simulator::{generate_population, run_simulation, PopulationGenerator};
pub use simulation_model::{PersonaDistribution, SimulationConfig};
