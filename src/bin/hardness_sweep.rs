use anyhow::{Context, Result, bail};
use bayesgen::common::logging::init_logging;
use bayesgen::common::setup::{build_command, options_from_matches};
use bayesgen::DatasetGenerator;
use clap::{Arg, value_parser};
use colored::Colorize;
use log::info;
use std::fs;
use std::path::PathBuf;

/// Writes one dataset per Dirichlet alpha, all sampled from the same random
/// structure, so learners can be compared across dependency strengths.
fn main() -> Result<()> {
    init_logging();
    let matches = build_command()
        .name("HARDNESS_SWEEP")
        .about("Samples datasets at several Dirichlet concentrations from one random structure.")
        .arg(
            Arg::new("alphas")
                .long("alphas")
                .value_name("LIST")
                .help("Comma-separated alpha_dirichlet values")
                .value_parser(value_parser!(f64))
                .value_delimiter(',')
                .default_value("0.5,1,10,100"),
        )
        .arg(
            Arg::new("output_dir")
                .long("output_dir")
                .value_name("DIR")
                .help("Directory receiving data_alpha_<alpha>.arff files")
                .value_parser(value_parser!(PathBuf))
                .default_value("/tmp/data"),
        )
        .get_matches();

    let options = options_from_matches(&matches);
    let alphas: Vec<f64> = matches
        .get_many::<f64>("alphas")
        .map(|values| values.copied().collect())
        .unwrap_or_default();
    if alphas.is_empty() {
        bail!("No alpha values given");
    }
    let output_dir = matches
        .get_one::<PathBuf>("output_dir")
        .cloned()
        .unwrap_or_else(|| PathBuf::from("/tmp/data"));

    let mut generator = DatasetGenerator::new(&options)?;
    fs::create_dir_all(&output_dir)
        .with_context(|| format!("Couldn't create output directory {}", output_dir.display()))?;
    generator.generate_structure()?;

    for alpha in alphas {
        let parametrized = generator.generate_parameters(alpha)?;
        let path = output_dir.join(format!("data_alpha_{}.arff", alpha));
        info!("Sampling with alpha_dirichlet={}", alpha);
        let summary = generator
            .write_dataset(&parametrized, &path)
            .with_context(|| format!("Error writing {}", path.display()))?;
        println!(
            "{} alpha={} -> {}",
            "Dataset written:".green().bold(),
            alpha,
            summary.path.display().to_string().blue()
        );
    }
    Ok(())
}
