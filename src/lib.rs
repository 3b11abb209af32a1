pub mod common;
pub mod generator;
pub mod network;
pub mod sampling;

pub use common::{GeneratorError, GeneratorOptions, Result};
pub use generator::DatasetGenerator;
pub use network::{Cpt, Network, ParametrizedNetwork, Variable};
pub use sampling::{AncestralSampler, DatasetSummary, DatasetWriter};
