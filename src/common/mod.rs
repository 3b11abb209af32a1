pub mod error;
pub mod logging;
pub mod rng;
pub mod setup;

// Re-export key types
pub use error::{GeneratorError, Result};
pub use rng::{StrongRng, StructureRng};
pub use setup::{GenerationParams, GeneratorOptions};
