use log::{debug, trace};
use ndarray::Array2;
use rand::Rng;
use rand_distr::{Distribution, Gamma};
use std::sync::Arc;

use super::models::{Cpt, MAX_CPT_CELLS, Network, ParametrizedNetwork, cpt_cells};
use crate::common::error::{GeneratorError, Result};

/// Draws CPTs for a fixed structure.
///
/// Every CPT row is one sample of a symmetric Dirichlet(alpha, ..., alpha),
/// obtained by drawing one Gamma(alpha, 1) per outcome and dividing by the
/// sum. Large alpha gives rows close to uniform (weak dependencies, hard to
/// detect); small alpha gives sharp rows.
#[derive(Debug, Clone)]
pub struct ParameterGenerator {
    alpha_dirichlet: f64,
    gamma: Gamma<f64>,
}

impl ParameterGenerator {
    pub fn new(alpha_dirichlet: f64) -> Result<Self> {
        if !(alpha_dirichlet.is_finite() && alpha_dirichlet > 0.0) {
            return Err(GeneratorError::invalid(format!(
                "alpha_dirichlet must be a positive number, got {}",
                alpha_dirichlet
            )));
        }
        let gamma = Gamma::new(alpha_dirichlet, 1.0)
            .map_err(|e| GeneratorError::invalid(format!("alpha_dirichlet: {}", e)))?;
        Ok(ParameterGenerator {
            alpha_dirichlet,
            gamma,
        })
    }

    pub fn alpha_dirichlet(&self) -> f64 {
        self.alpha_dirichlet
    }

    /// Fails with `InvalidConfiguration` if any variable's CPT would exceed
    /// [`MAX_CPT_CELLS`]. Nothing is allocated or drawn before this check.
    pub fn check_table_sizes(network: &Network) -> Result<()> {
        for variable in network.variables() {
            let parent_cardinalities: Vec<usize> = variable
                .parents
                .iter()
                .map(|&p| network.variable(p).outcome_count())
                .collect();
            match cpt_cells(&parent_cardinalities, variable.outcome_count()) {
                Some(cells) if cells <= MAX_CPT_CELLS => {}
                Some(cells) => {
                    return Err(GeneratorError::invalid(format!(
                        "CPT of {} would have {} cells ({} parents), limit is {}; lower max_n_parents or max_n_values_per_node",
                        variable.name,
                        cells,
                        variable.parents.len(),
                        MAX_CPT_CELLS
                    )));
                }
                None => {
                    return Err(GeneratorError::invalid(format!(
                        "CPT size of {} ({} parents) overflows usize; lower max_n_parents or max_n_values_per_node",
                        variable.name,
                        variable.parents.len()
                    )));
                }
            }
        }
        Ok(())
    }

    /// Attaches a fresh CPT to every variable of `network`, in variable
    /// index order. The structure itself is shared, not copied.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        network: &Arc<Network>,
        rng: &mut R,
    ) -> Result<ParametrizedNetwork> {
        Self::check_table_sizes(network)?;
        let mut cpts = Vec::with_capacity(network.len());
        for variable in network.variables() {
            let parent_cardinalities: Vec<usize> = variable
                .parents
                .iter()
                .map(|&p| network.variable(p).outcome_count())
                .collect();
            // bounded by check_table_sizes
            let n_rows: usize = parent_cardinalities.iter().product();
            let n_outcomes = variable.outcome_count();

            let mut table = Array2::<f64>::zeros((n_rows, n_outcomes));
            for mut row in table.rows_mut() {
                self.fill_dirichlet_row(row.iter_mut(), n_outcomes, rng);
            }
            trace!(
                "generate - {} has {} rows of {} outcomes",
                variable.name,
                n_rows,
                n_outcomes
            );
            cpts.push(Cpt::new(parent_cardinalities, table)?);
        }
        debug!(
            "Generated {} CPTs with alpha_dirichlet={}",
            cpts.len(),
            self.alpha_dirichlet
        );
        ParametrizedNetwork::new(Arc::clone(network), cpts, self.alpha_dirichlet)
    }

    fn fill_dirichlet_row<'a, I, R>(&self, row: I, n_outcomes: usize, rng: &mut R)
    where
        I: Iterator<Item = &'a mut f64>,
        R: Rng + ?Sized,
    {
        let draws: Vec<f64> = (0..n_outcomes).map(|_| self.gamma.sample(rng)).collect();
        let sum: f64 = draws.iter().sum();
        if sum > 0.0 && sum.is_finite() {
            for (cell, draw) in row.zip(draws) {
                *cell = draw / sum;
            }
        } else {
            // every draw underflowed: take the alpha -> 0 limit, a point mass
            let hot = rng.gen_range(0..n_outcomes);
            for (s, cell) in row.enumerate() {
                *cell = if s == hot { 1.0 } else { 0.0 };
            }
        }
    }
}

/// Convenience form of [`ParameterGenerator::generate`].
pub fn generate_parameters<R: Rng + ?Sized>(
    network: &Arc<Network>,
    alpha_dirichlet: f64,
    rng: &mut R,
) -> Result<ParametrizedNetwork> {
    ParameterGenerator::new(alpha_dirichlet)?.generate(network, rng)
}
