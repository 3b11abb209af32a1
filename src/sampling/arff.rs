use log::{info, warn};
use rand::{CryptoRng, Rng};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use super::ancestral::AncestralSampler;
use crate::common::error::{GeneratorError, Result};
use crate::network::models::{Network, ParametrizedNetwork};

const WRITE_BUFFER_BYTES: usize = 10 * 1024 * 1024;

/// What a finished dataset file contains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetSummary {
    pub path: PathBuf,
    pub relation: String,
    pub n_attributes: usize,
    pub n_rows: usize,
}

/// Writes the `@relation` / `@attribute` / `@data` header. Attributes appear
/// in topological order; each lists its outcomes in creation order.
pub fn write_header<W: Write>(out: &mut W, relation: &str, network: &Network) -> io::Result<()> {
    writeln!(out, "@relation {}", relation)?;
    writeln!(out)?;
    for variable in network.iter_topological() {
        writeln!(out, "@attribute {} {{{}}}", variable.name, variable.outcomes.join(","))?;
    }
    writeln!(out)?;
    writeln!(out, "@data")?;
    writeln!(out)?;
    Ok(())
}

/// Writes a sampled dataset to an ARFF file.
///
/// The file is recreated from scratch on every run. If anything fails after
/// the file was created, the partial file is removed before the error is
/// returned.
#[derive(Debug, Clone)]
pub struct DatasetWriter {
    path: PathBuf,
    relation: String,
    parallel: bool,
}

impl DatasetWriter {
    /// The relation name defaults to the file name.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let relation = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "dataset".to_string());
        DatasetWriter {
            path,
            relation,
            parallel: false,
        }
    }

    pub fn with_relation(mut self, relation: impl Into<String>) -> Self {
        self.relation = relation.into();
        self
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write<R: Rng + CryptoRng + ?Sized>(
        &self,
        parametrized: &ParametrizedNetwork,
        n_data_points: usize,
        rng: &mut R,
    ) -> Result<DatasetSummary> {
        if self.path.exists() {
            fs::remove_file(&self.path).map_err(|e| GeneratorError::io(&self.path, e))?;
        }
        let file = File::create(&self.path).map_err(|e| GeneratorError::io(&self.path, e))?;
        info!("Writing case file: {}", self.path.display());

        let mut out = BufWriter::with_capacity(WRITE_BUFFER_BYTES, file);
        let result = self
            .write_contents(&mut out, parametrized, n_data_points, rng)
            .and_then(|_| out.flush().map_err(|e| GeneratorError::io(&self.path, e)));
        drop(out);

        if let Err(e) = result {
            warn!("Discarding partial dataset {}: {}", self.path.display(), e);
            let _ = fs::remove_file(&self.path);
            return Err(e);
        }

        Ok(DatasetSummary {
            path: self.path.clone(),
            relation: self.relation.clone(),
            n_attributes: parametrized.network().len(),
            n_rows: n_data_points,
        })
    }

    fn write_contents<W: Write, R: Rng + CryptoRng + ?Sized>(
        &self,
        out: &mut W,
        parametrized: &ParametrizedNetwork,
        n_data_points: usize,
        rng: &mut R,
    ) -> Result<()> {
        let io_err = |e: io::Error| GeneratorError::io(&self.path, e);
        write_header(out, &self.relation, parametrized.network()).map_err(io_err)?;

        let sampler = AncestralSampler::new(parametrized);
        if self.parallel {
            sampler.sample_lines_parallel(n_data_points, rng, |chunk| {
                for line in chunk {
                    writeln!(out, "{}", line).map_err(io_err)?;
                }
                Ok(())
            })?;
        } else {
            for _ in 0..n_data_points {
                let case = sampler.sample_case(rng);
                writeln!(out, "{}", sampler.format_case(&case)).map_err(io_err)?;
            }
        }
        Ok(())
    }
}

/// Samples `n_data_points` rows from `parametrized` into the ARFF file at
/// `path`, single-threaded.
pub fn sample_to_file<R: Rng + CryptoRng + ?Sized>(
    parametrized: &ParametrizedNetwork,
    n_data_points: i64,
    path: impl Into<PathBuf>,
    rng: &mut R,
) -> Result<DatasetSummary> {
    if n_data_points < 0 {
        return Err(GeneratorError::invalid(format!(
            "n_data_points must not be negative, got {}",
            n_data_points
        )));
    }
    DatasetWriter::new(path).write(parametrized, n_data_points as usize, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::rng::{StrongRng, structure_rng};
    use crate::network::{generate_parameters, generate_structure};
    use rand::SeedableRng;
    use std::sync::Arc;

    fn parametrized(n: usize, seed: i64) -> ParametrizedNetwork {
        let network = Arc::new(generate_structure(n, 2, 3, seed).unwrap());
        generate_parameters(&network, 5.0, &mut structure_rng(seed)).unwrap()
    }

    #[test]
    fn test_header_layout() {
        let parametrized = parametrized(3, 42);
        let mut buffer = Vec::new();
        write_header(&mut buffer, "data.arff", parametrized.network()).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "@relation data.arff");
        assert_eq!(lines[1], "");
        for (line, variable) in lines[2..5].iter().zip(parametrized.network().iter_topological()) {
            assert_eq!(
                *line,
                format!("@attribute {} {{{}}}", variable.name, variable.outcomes.join(","))
            );
        }
        assert_eq!(&lines[5..], &["", "@data", ""]);
    }

    #[test]
    fn test_relation_defaults_to_file_name() {
        let writer = DatasetWriter::new("/tmp/data/data.arff");
        assert_eq!(writer.relation, "data.arff");
        let writer = writer.with_relation("bench");
        assert_eq!(writer.relation, "bench");
    }

    #[test]
    fn test_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.arff");
        fs::write(&path, "stale contents that are longer than the new header\n".repeat(50)).unwrap();

        let parametrized = parametrized(4, 1);
        let summary = DatasetWriter::new(&path)
            .write(&parametrized, 3, &mut StrongRng::seed_from_u64(1))
            .unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(!text.contains("stale"));
        assert!(text.starts_with("@relation data.arff\n"));
        assert_eq!(summary.n_rows, 3);
        assert_eq!(summary.n_attributes, 4);
    }

    #[test]
    fn test_missing_directory_is_io_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("data.arff");
        let result = DatasetWriter::new(&path).write(
            &parametrized(2, 2),
            1,
            &mut StrongRng::seed_from_u64(2),
        );
        match result {
            Err(GeneratorError::Io { path: failed, .. }) => assert_eq!(failed, path),
            other => panic!("expected IO failure, got {:?}", other),
        }
    }

    #[test]
    fn test_negative_row_count_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.arff");
        let result = sample_to_file(&parametrized(2, 3), -1, &path, &mut StrongRng::seed_from_u64(3));
        assert!(matches!(result, Err(GeneratorError::InvalidConfiguration(_))));
        assert!(!path.exists());
    }

    #[test]
    fn test_parallel_and_sequential_row_counts() {
        let dir = tempfile::tempdir().unwrap();
        let parametrized = parametrized(5, 4);
        for parallel in [false, true] {
            let path = dir.path().join(format!("data_{}.arff", parallel));
            DatasetWriter::new(&path)
                .parallel(parallel)
                .write(&parametrized, 5000, &mut StrongRng::seed_from_u64(4))
                .unwrap();
            let text = fs::read_to_string(&path).unwrap();
            let data = text.split("@data\n\n").nth(1).unwrap();
            assert_eq!(data.lines().count(), 5000);
            assert!(text.ends_with('\n'));
        }
    }
}
