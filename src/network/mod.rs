pub mod export;
pub mod models;
pub mod parameters;
pub mod structure;

pub use models::{Cpt, Network, ParametrizedNetwork, Variable};
pub use parameters::{ParameterGenerator, generate_parameters};
pub use structure::{StructureGenerator, generate_structure};
