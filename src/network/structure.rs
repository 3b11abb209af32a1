use log::{debug, trace};
use rand::Rng;
use rand::seq::{SliceRandom, index};
use std::sync::Arc;

use super::models::{Network, Variable};
use crate::common::error::{GeneratorError, Result};
use crate::common::rng::structure_rng;

/// Generates random DAG structures.
///
/// Acyclicity holds by construction: a random permutation of the variables
/// is fixed first, and each variable only draws parents from the variables
/// placed before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructureGenerator {
    n_variables: usize,
    max_n_parents: usize,
    max_n_values_per_node: usize,
}

impl StructureGenerator {
    pub fn new(
        n_variables: usize,
        max_n_parents: usize,
        max_n_values_per_node: usize,
    ) -> Result<Self> {
        if n_variables < 1 {
            return Err(GeneratorError::invalid(format!(
                "n_variables must be at least 1, got {}",
                n_variables
            )));
        }
        if max_n_values_per_node < 2 {
            return Err(GeneratorError::invalid(format!(
                "max_n_values_per_node must be at least 2, got {}",
                max_n_values_per_node
            )));
        }
        Ok(StructureGenerator {
            n_variables,
            max_n_parents,
            max_n_values_per_node,
        })
    }

    /// Draws a structure. Every random decision comes from `rng`, so the
    /// same generator state always yields the same network.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Network> {
        let mut variables: Vec<Variable> = (0..self.n_variables)
            .map(|i| {
                let n_values = rng.gen_range(2..=self.max_n_values_per_node);
                Variable::new(format!("n{}", i + 1), n_values)
            })
            .collect();

        let mut order: Vec<usize> = (0..self.n_variables).collect();
        order.shuffle(rng);
        trace!("generate - topological order: {:?}", order);

        // position 0 has no eligible parents
        for i in 1..order.len() {
            let n_parents = rng.gen_range(0..=i.min(self.max_n_parents));
            if n_parents == 0 {
                continue;
            }
            let parents: Vec<usize> = index::sample(rng, i, n_parents)
                .into_iter()
                .map(|position| order[position])
                .collect();
            trace!(
                "generate - {} gets parents {:?}",
                variables[order[i]].name,
                parents
            );
            variables[order[i]].parents = parents;
        }

        let network = Network::new(variables, order)?;
        debug!(
            "Generated structure with {} nodes and {} edges",
            network.len(),
            network.edge_count()
        );
        Ok(network)
    }

    pub fn generate_shared<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Arc<Network>> {
        Ok(Arc::new(self.generate(rng)?))
    }
}

/// Seeded convenience form: generates the structure from a fresh
/// reproducible RNG seeded with `seed`.
pub fn generate_structure(
    n_variables: usize,
    max_n_parents: usize,
    max_n_values_per_node: usize,
    seed: i64,
) -> Result<Network> {
    let generator = StructureGenerator::new(n_variables, max_n_parents, max_n_values_per_node)?;
    generator.generate(&mut structure_rng(seed))
}
