use anyhow::{Context, Result};
use bayesgen::common::setup::parse_configuration_options;
use bayesgen::network::export::write_network_json;
use bayesgen::DatasetGenerator;
use colored::Colorize;
use log::info;
use std::fs;

fn main() -> Result<()> {
    // Logging is initialized in setup.rs
    let options = parse_configuration_options();
    let mut generator = DatasetGenerator::new(&options)?;

    if let Some(dir) = options.output_file.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("Couldn't create output directory {}", dir.display()))?;
    }

    let parametrized = generator.generate_parameters(options.alpha_dirichlet)?;
    info!(
        "Generated CPTs for {} variables with alpha_dirichlet={}",
        parametrized.network().len(),
        options.alpha_dirichlet
    );

    if let Some(network_file) = &options.network_output_file {
        write_network_json(network_file, &parametrized)
            .with_context(|| format!("Couldn't write network to {}", network_file.display()))?;
    }

    let summary = generator
        .write_dataset(&parametrized, &options.output_file)
        .context("Error writing dataset")?;

    println!(
        "{} {} rows x {} attributes -> {}",
        "Dataset written:".green().bold(),
        summary.n_rows,
        summary.n_attributes,
        summary.path.display().to_string().blue()
    );
    Ok(())
}
