use log::info;
use std::path::Path;
use std::sync::Arc;

use crate::common::error::Result;
use crate::common::rng::{StructureRng, strong_rng, structure_rng};
use crate::common::setup::{GenerationParams, GeneratorOptions};
use crate::network::models::{Network, ParametrizedNetwork};
use crate::network::parameters::ParameterGenerator;
use crate::network::structure::StructureGenerator;
use crate::sampling::arff::{DatasetSummary, DatasetWriter};

/// One generation run: a random structure, CPTs for it, and datasets
/// sampled from them.
///
/// Structure and CPTs share a single RNG seeded with `structure_seed`, so
/// everything except the sampled rows is reproducible from the options.
/// The structure is generated once and reused; parameters can be
/// regenerated with a different hardness on the same structure.
pub struct DatasetGenerator {
    params: GenerationParams,
    parallel: bool,
    rng: StructureRng,
    network: Option<Arc<Network>>,
}

impl DatasetGenerator {
    /// Validates the options before any generation work happens.
    pub fn new(options: &GeneratorOptions) -> Result<Self> {
        let params = options.validate()?;
        Ok(DatasetGenerator {
            params,
            parallel: options.parallel,
            rng: structure_rng(params.structure_seed),
            network: None,
        })
    }

    pub fn params(&self) -> &GenerationParams {
        &self.params
    }

    pub fn network(&self) -> Option<&Arc<Network>> {
        self.network.as_ref()
    }

    /// Draws the structure and keeps it for later calls.
    pub fn generate_structure(&mut self) -> Result<Arc<Network>> {
        let generator = StructureGenerator::new(
            self.params.n_variables,
            self.params.max_n_parents,
            self.params.max_n_values_per_node,
        )?;
        let network = generator.generate_shared(&mut self.rng)?;
        info!("Generated BN structure as follows:\n{}", network);
        self.network = Some(Arc::clone(&network));
        Ok(network)
    }

    fn structure(&mut self) -> Result<Arc<Network>> {
        match &self.network {
            Some(network) => Ok(Arc::clone(network)),
            None => self.generate_structure(),
        }
    }

    /// Draws CPTs for the current structure, generating the structure first
    /// if there is none yet.
    pub fn generate_parameters(&mut self, alpha_dirichlet: f64) -> Result<ParametrizedNetwork> {
        let network = self.structure()?;
        ParameterGenerator::new(alpha_dirichlet)?.generate(&network, &mut self.rng)
    }

    /// Draws CPTs with the configured alpha and samples the configured
    /// number of rows into `path`, using an OS-seeded strong RNG.
    pub fn generate_dataset(&mut self, path: impl AsRef<Path>) -> Result<DatasetSummary> {
        let parametrized = self.generate_parameters(self.params.alpha_dirichlet)?;
        self.write_dataset(&parametrized, path)
    }

    /// Samples the configured number of rows from an existing
    /// parametrization.
    pub fn write_dataset(
        &self,
        parametrized: &ParametrizedNetwork,
        path: impl AsRef<Path>,
    ) -> Result<DatasetSummary> {
        let mut rng = strong_rng()?;
        DatasetWriter::new(path.as_ref())
            .parallel(self.parallel)
            .write(parametrized, self.params.n_data_points, &mut rng)
    }
}
