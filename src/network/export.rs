//! Ground-truth export of a parametrized network as JSON, so that learned
//! structures and parameters can be scored against what generated the data.

use log::info;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::models::ParametrizedNetwork;
use crate::common::error::{GeneratorError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableRecord {
    pub name: String,
    pub outcomes: Vec<String>,
    /// Parent names, in the order that indexes CPT rows
    pub parents: Vec<String>,
    pub cpt_rows: usize,
    pub cpt_columns: usize,
    /// Row-major CPT
    pub cpt: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkRecord {
    pub alpha_dirichlet: f64,
    /// Variable names in topological order
    pub topological_order: Vec<String>,
    /// Variables in creation order
    pub variables: Vec<VariableRecord>,
}

impl From<&ParametrizedNetwork> for NetworkRecord {
    fn from(parametrized: &ParametrizedNetwork) -> Self {
        let network = parametrized.network();
        let variables = network
            .variables()
            .iter()
            .enumerate()
            .map(|(index, variable)| {
                let cpt = parametrized.cpt(index);
                VariableRecord {
                    name: variable.name.clone(),
                    outcomes: variable.outcomes.clone(),
                    parents: network
                        .parent_names(index)
                        .into_iter()
                        .map(str::to_string)
                        .collect(),
                    cpt_rows: cpt.n_rows(),
                    cpt_columns: cpt.n_outcomes(),
                    cpt: cpt.to_flat(),
                }
            })
            .collect();
        NetworkRecord {
            alpha_dirichlet: parametrized.alpha_dirichlet(),
            topological_order: network.iter_topological().map(|v| v.name.clone()).collect(),
            variables,
        }
    }
}

pub fn write_network_json(path: impl AsRef<Path>, parametrized: &ParametrizedNetwork) -> Result<()> {
    let path = path.as_ref();
    let record = NetworkRecord::from(parametrized);
    let file = File::create(path).map_err(|e| GeneratorError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &record)?;
    writer
        .write_all(b"\n")
        .and_then(|_| writer.flush())
        .map_err(|e| GeneratorError::io(path, e))?;
    info!("Wrote network description: {}", path.display());
    Ok(())
}
