use ndarray::{Array2, ArrayView1};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::common::error::{GeneratorError, Result};

/// Discrete random variable of the network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    /// Unique, stable name (`n1`, `n2`, ...)
    pub name: String,
    /// Outcome labels in creation order (`s0`, `s1`, ...)
    pub outcomes: Vec<String>,
    /// Parent variable indices, in the order they were assigned
    pub parents: Vec<usize>,
}

impl Variable {
    /// Create a parentless variable with `n_outcomes` labels `s0..s(n-1)`.
    pub fn new(name: impl Into<String>, n_outcomes: usize) -> Self {
        Variable {
            name: name.into(),
            outcomes: (0..n_outcomes).map(|s| format!("s{}", s)).collect(),
            parents: Vec::new(),
        }
    }

    pub fn outcome_count(&self) -> usize {
        self.outcomes.len()
    }

    pub fn outcome_name(&self, index: usize) -> &str {
        &self.outcomes[index]
    }
}

/// Network structure: variables plus the topological order witnessing
/// acyclicity. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Network {
    variables: Vec<Variable>,
    /// Topological order as a permutation of variable indices
    order: Vec<usize>,
    /// Inverse of `order`: variable index -> topological position
    #[serde(skip)]
    positions: Vec<usize>,
}

impl Network {
    /// Builds a network, checking that `order` is a permutation of the
    /// variable indices and that every parent precedes its child in it.
    pub fn new(variables: Vec<Variable>, order: Vec<usize>) -> Result<Self> {
        let n = variables.len();
        if order.len() != n {
            return Err(GeneratorError::invalid(format!(
                "topological order has {} entries for {} variables",
                order.len(),
                n
            )));
        }
        let mut positions = vec![usize::MAX; n];
        for (position, &variable) in order.iter().enumerate() {
            if variable >= n || positions[variable] != usize::MAX {
                return Err(GeneratorError::invalid(format!(
                    "topological order is not a permutation of 0..{}",
                    n
                )));
            }
            positions[variable] = position;
        }
        for (index, variable) in variables.iter().enumerate() {
            for &parent in &variable.parents {
                if parent >= n || positions[parent] >= positions[index] {
                    return Err(GeneratorError::invalid(format!(
                        "parent {} of {} does not precede it in the topological order",
                        parent, variable.name
                    )));
                }
            }
        }
        Ok(Network {
            variables,
            order,
            positions,
        })
    }

    pub fn new_shared(variables: Vec<Variable>, order: Vec<usize>) -> Result<Arc<Self>> {
        Ok(Arc::new(Self::new(variables, order)?))
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn variable(&self, index: usize) -> &Variable {
        &self.variables[index]
    }

    pub fn topological_order(&self) -> &[usize] {
        &self.order
    }

    /// Position of variable `index` in the topological order.
    pub fn position(&self, index: usize) -> usize {
        self.positions[index]
    }

    /// Variables in topological order.
    pub fn iter_topological(&self) -> impl Iterator<Item = &Variable> + '_ {
        self.order.iter().map(move |&i| &self.variables[i])
    }

    pub fn parent_names(&self, index: usize) -> Vec<&str> {
        self.variables[index]
            .parents
            .iter()
            .map(|&p| self.variables[p].name.as_str())
            .collect()
    }

    pub fn edge_count(&self) -> usize {
        self.variables.iter().map(|v| v.parents.len()).sum()
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut lines = vec![format!(
            "BN with {} nodes\nnode_name:\n\toutcome_1,...,outcome_v\n\tparent_1,...,parent_k",
            self.len()
        )];
        lines.extend(self.order.iter().map(|&index| {
            let variable = &self.variables[index];
            let parents = if variable.parents.is_empty() {
                "no parents".to_string()
            } else {
                format!("[{}]", self.parent_names(index).join(", "))
            };
            format!(
                "{}:\n\toutcomes: [{}]\n\tparents: {}",
                variable.name,
                variable.outcomes.join(", "),
                parents
            )
        }));
        writeln!(f, "{}", lines.join("\n"))
    }
}

/// Largest CPT, in cells (rows times outcomes), that parameter generation
/// will allocate: 2^26 cells, 512 MiB of `f64`.
pub const MAX_CPT_CELLS: usize = 1 << 26;

/// Number of cells of a CPT with the given parent cardinalities and outcome
/// count, or `None` if it does not fit in `usize`.
pub fn cpt_cells(parent_cardinalities: &[usize], n_outcomes: usize) -> Option<usize> {
    parent_cardinalities
        .iter()
        .try_fold(n_outcomes, |cells, &cardinality| cells.checked_mul(cardinality))
}

/// Conditional probability table of one variable.
///
/// One row per parent configuration, enumerated in mixed-radix order of the
/// parent cardinalities (first parent most significant), one column per
/// outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CptParts")]
pub struct Cpt {
    parent_cardinalities: Vec<usize>,
    probabilities: Array2<f64>,
}

impl Cpt {
    pub fn new(parent_cardinalities: Vec<usize>, probabilities: Array2<f64>) -> Result<Self> {
        let expected_rows = cpt_cells(&parent_cardinalities, 1).ok_or_else(|| {
            GeneratorError::invalid("CPT parent configurations overflow usize")
        })?;
        if probabilities.nrows() != expected_rows {
            return Err(GeneratorError::invalid(format!(
                "CPT has {} rows, parent configurations require {}",
                probabilities.nrows(),
                expected_rows
            )));
        }
        Ok(Cpt {
            parent_cardinalities,
            probabilities,
        })
    }

    pub fn n_rows(&self) -> usize {
        self.probabilities.nrows()
    }

    pub fn n_outcomes(&self) -> usize {
        self.probabilities.ncols()
    }

    pub fn parent_cardinalities(&self) -> &[usize] {
        &self.parent_cardinalities
    }

    pub fn row(&self, index: usize) -> ArrayView1<'_, f64> {
        self.probabilities.row(index)
    }

    pub fn table(&self) -> &Array2<f64> {
        &self.probabilities
    }

    /// Row-major flat copy of the table, length `n_rows * n_outcomes`.
    pub fn to_flat(&self) -> Vec<f64> {
        self.probabilities.iter().copied().collect()
    }

    /// Mixed-radix row index of a parent configuration, given the parents'
    /// outcome indices in parent-list order.
    pub fn row_index<I>(&self, parent_values: I) -> usize
    where
        I: IntoIterator<Item = usize>,
    {
        parent_values
            .into_iter()
            .zip(&self.parent_cardinalities)
            .fold(0, |row, (value, &cardinality)| row * cardinality + value)
    }
}

/// Serialized form of a [`Cpt`]; deserialization goes through
/// [`Cpt::new`] so the row count is checked.
#[derive(Deserialize)]
struct CptParts {
    parent_cardinalities: Vec<usize>,
    probabilities: Array2<f64>,
}

impl TryFrom<CptParts> for Cpt {
    type Error = GeneratorError;

    fn try_from(parts: CptParts) -> Result<Self> {
        Cpt::new(parts.parent_cardinalities, parts.probabilities)
    }
}

/// A structure together with one CPT per variable (indexed like the
/// structure's variables). Several parametrizations may share a structure.
#[derive(Debug, Clone)]
pub struct ParametrizedNetwork {
    network: Arc<Network>,
    cpts: Vec<Cpt>,
    alpha_dirichlet: f64,
}

impl ParametrizedNetwork {
    pub fn new(network: Arc<Network>, cpts: Vec<Cpt>, alpha_dirichlet: f64) -> Result<Self> {
        if cpts.len() != network.len() {
            return Err(GeneratorError::invalid(format!(
                "{} CPTs for {} variables",
                cpts.len(),
                network.len()
            )));
        }
        for (variable, cpt) in network.variables().iter().zip(&cpts) {
            let cardinalities: Vec<usize> = variable
                .parents
                .iter()
                .map(|&p| network.variable(p).outcome_count())
                .collect();
            if cpt.n_outcomes() != variable.outcome_count()
                || cpt.parent_cardinalities() != cardinalities.as_slice()
            {
                return Err(GeneratorError::invalid(format!(
                    "CPT shape does not match variable {}",
                    variable.name
                )));
            }
        }
        Ok(ParametrizedNetwork {
            network,
            cpts,
            alpha_dirichlet,
        })
    }

    pub fn network(&self) -> &Arc<Network> {
        &self.network
    }

    pub fn cpt(&self, index: usize) -> &Cpt {
        &self.cpts[index]
    }

    pub fn cpts(&self) -> &[Cpt] {
        &self.cpts
    }

    pub fn alpha_dirichlet(&self) -> f64 {
        self.alpha_dirichlet
    }
}
