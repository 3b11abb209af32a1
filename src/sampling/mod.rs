pub mod ancestral;
pub mod arff;

pub use ancestral::{AncestralSampler, select_outcome};
pub use arff::{DatasetSummary, DatasetWriter, sample_to_file, write_header};
