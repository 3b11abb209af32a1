use clap::{Arg, ArgMatches, Command, value_parser};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::error::{GeneratorError, Result};
use super::logging::init_logging;

pub const DEFAULT_N_VARIABLES: i64 = 100;
pub const DEFAULT_MAX_N_PARENTS: i64 = 5;
pub const DEFAULT_MAX_N_VALUES_PER_NODE: i64 = 5;
pub const DEFAULT_N_DATA_POINTS: i64 = 50000;
pub const DEFAULT_ALPHA_DIRICHLET: f64 = 10.0;
pub const DEFAULT_STRUCTURE_SEED: i64 = 3071980;
pub const DEFAULT_OUTPUT_FILE: &str = "/tmp/data/data.arff";

/// These options define the inputs from the user.
///
/// Counts are kept signed so that out-of-range values coming from a CLI or a
/// config file reach [`GeneratorOptions::validate`] and are reported as
/// invalid configuration instead of failing to parse.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct GeneratorOptions {
    pub n_variables: i64,
    pub max_n_parents: i64,
    pub max_n_values_per_node: i64,
    pub n_data_points: i64,
    pub alpha_dirichlet: f64,
    pub structure_seed: i64,
    pub output_file: PathBuf,
    #[serde(default)]
    pub network_output_file: Option<PathBuf>,
    #[serde(default)]
    pub parallel: bool,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        GeneratorOptions {
            n_variables: DEFAULT_N_VARIABLES,
            max_n_parents: DEFAULT_MAX_N_PARENTS,
            max_n_values_per_node: DEFAULT_MAX_N_VALUES_PER_NODE,
            n_data_points: DEFAULT_N_DATA_POINTS,
            alpha_dirichlet: DEFAULT_ALPHA_DIRICHLET,
            structure_seed: DEFAULT_STRUCTURE_SEED,
            output_file: PathBuf::from(DEFAULT_OUTPUT_FILE),
            network_output_file: None,
            parallel: false,
        }
    }
}

/// Generation parameters after range checks, in the unsigned types the
/// generators work with.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GenerationParams {
    pub n_variables: usize,
    pub max_n_parents: usize,
    pub max_n_values_per_node: usize,
    pub n_data_points: usize,
    pub alpha_dirichlet: f64,
    pub structure_seed: i64,
}

impl GeneratorOptions {
    pub fn validate(&self) -> Result<GenerationParams> {
        if self.n_variables < 1 {
            return Err(GeneratorError::invalid(format!(
                "n_variables must be at least 1, got {}",
                self.n_variables
            )));
        }
        if self.max_n_parents < 0 {
            return Err(GeneratorError::invalid(format!(
                "max_n_parents must not be negative, got {}",
                self.max_n_parents
            )));
        }
        if self.max_n_values_per_node < 2 {
            return Err(GeneratorError::invalid(format!(
                "max_n_values_per_node must be at least 2, got {}",
                self.max_n_values_per_node
            )));
        }
        if self.n_data_points < 0 {
            return Err(GeneratorError::invalid(format!(
                "n_data_points must not be negative, got {}",
                self.n_data_points
            )));
        }
        if !(self.alpha_dirichlet.is_finite() && self.alpha_dirichlet > 0.0) {
            return Err(GeneratorError::invalid(format!(
                "alpha_dirichlet must be a positive number, got {}",
                self.alpha_dirichlet
            )));
        }
        Ok(GenerationParams {
            n_variables: self.n_variables as usize,
            max_n_parents: self.max_n_parents as usize,
            max_n_values_per_node: self.max_n_values_per_node as usize,
            n_data_points: self.n_data_points as usize,
            alpha_dirichlet: self.alpha_dirichlet,
            structure_seed: self.structure_seed,
        })
    }
}

pub fn build_command() -> Command {
    Command::new("BAYESGEN")
        .version("1.0")
        .about("Random Bayesian network and synthetic ARFF dataset generator.")
        .arg(
            Arg::new("n_variables")
                .long("n_variables")
                .value_name("NUMBER")
                .help("Number of nodes in the network")
                .value_parser(value_parser!(i64))
                .allow_negative_numbers(true)
                .default_value("100"),
        )
        .arg(
            Arg::new("max_n_parents")
                .long("max_n_parents")
                .value_name("NUMBER")
                .help("Maximum number of parents per node")
                .value_parser(value_parser!(i64))
                .allow_negative_numbers(true)
                .default_value("5"),
        )
        .arg(
            Arg::new("max_n_values_per_node")
                .long("max_n_values_per_node")
                .value_name("NUMBER")
                .help("Maximum number of outcomes per node (at least 2)")
                .value_parser(value_parser!(i64))
                .allow_negative_numbers(true)
                .default_value("5"),
        )
        .arg(
            Arg::new("n_data_points")
                .long("n_data_points")
                .value_name("NUMBER")
                .help("Number of rows to sample")
                .value_parser(value_parser!(i64))
                .allow_negative_numbers(true)
                .default_value("50000"),
        )
        .arg(
            Arg::new("alpha_dirichlet")
                .long("alpha_dirichlet")
                .value_name("FLOAT")
                .help("Dirichlet concentration for every CPT row; higher is flatter and harder to learn")
                .value_parser(value_parser!(f64))
                .allow_negative_numbers(true)
                .default_value("10.0"),
        )
        .arg(
            Arg::new("structure_seed")
                .long("structure_seed")
                .value_name("NUMBER")
                .help("Seed for structure and parameter generation")
                .value_parser(value_parser!(i64))
                .allow_negative_numbers(true)
                .default_value("3071980"),
        )
        .arg(
            Arg::new("output_file")
                .long("output_file")
                .value_name("FILE")
                .help("ARFF file to (re)create")
                .value_parser(value_parser!(PathBuf))
                .default_value(DEFAULT_OUTPUT_FILE),
        )
        .arg(
            Arg::new("network_output_file")
                .long("network_output_file")
                .value_name("FILE")
                .help("Writes the generated network as JSON (optional)")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("parallel")
                .long("parallel")
                .help("Samples rows on all cores")
                .action(clap::ArgAction::SetTrue),
        )
}

pub fn options_from_matches(matches: &ArgMatches) -> GeneratorOptions {
    let defaults = GeneratorOptions::default();
    GeneratorOptions {
        n_variables: matches
            .get_one::<i64>("n_variables")
            .copied()
            .unwrap_or(defaults.n_variables),
        max_n_parents: matches
            .get_one::<i64>("max_n_parents")
            .copied()
            .unwrap_or(defaults.max_n_parents),
        max_n_values_per_node: matches
            .get_one::<i64>("max_n_values_per_node")
            .copied()
            .unwrap_or(defaults.max_n_values_per_node),
        n_data_points: matches
            .get_one::<i64>("n_data_points")
            .copied()
            .unwrap_or(defaults.n_data_points),
        alpha_dirichlet: matches
            .get_one::<f64>("alpha_dirichlet")
            .copied()
            .unwrap_or(defaults.alpha_dirichlet),
        structure_seed: matches
            .get_one::<i64>("structure_seed")
            .copied()
            .unwrap_or(defaults.structure_seed),
        output_file: matches
            .get_one::<PathBuf>("output_file")
            .cloned()
            .unwrap_or(defaults.output_file),
        network_output_file: matches.get_one::<PathBuf>("network_output_file").cloned(),
        parallel: matches.get_flag("parallel"),
    }
}

/// Initializes logging and reads the options from the process arguments.
pub fn parse_configuration_options() -> GeneratorOptions {
    init_logging();
    let matches = build_command().get_matches();
    options_from_matches(&matches)
}
