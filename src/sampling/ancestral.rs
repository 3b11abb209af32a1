use log::trace;
use ndarray::ArrayView1;
use rand::{CryptoRng, Rng, SeedableRng};
use rayon::prelude::*;

use crate::common::error::{GeneratorError, Result};
use crate::common::rng::StrongRng;
use crate::network::models::ParametrizedNetwork;

/// Rows sampled per worker task in parallel mode.
pub const PARALLEL_CHUNK_ROWS: usize = 4096;

/// Chunks sampled per parallel round; bounds how many rows are buffered.
pub const PARALLEL_GROUP_CHUNKS: usize = 16;

/// Inverse-CDF selection over one CPT row: the first outcome whose running
/// probability sum exceeds `u`. Falls back to the last outcome when rounding
/// leaves the total just below `u`.
pub fn select_outcome(probabilities: ArrayView1<'_, f64>, u: f64) -> usize {
    let mut cumulative = 0.0;
    for (s, &p) in probabilities.iter().enumerate() {
        cumulative += p;
        if u < cumulative {
            return s;
        }
    }
    probabilities.len().saturating_sub(1)
}

/// Samples complete cases from a parametrized network, visiting variables in
/// topological order so every parent is drawn before its children.
///
/// A case is a vector of outcome indices indexed by topological position.
/// Each case is built from scratch; nothing carries over between rows.
pub struct AncestralSampler<'a> {
    parametrized: &'a ParametrizedNetwork,
    /// For each topological position, the positions of that variable's
    /// parents in parent-list order
    parent_positions: Vec<Vec<usize>>,
}

impl<'a> AncestralSampler<'a> {
    pub fn new(parametrized: &'a ParametrizedNetwork) -> Self {
        let network = parametrized.network();
        let parent_positions = network
            .topological_order()
            .iter()
            .map(|&index| {
                network
                    .variable(index)
                    .parents
                    .iter()
                    .map(|&p| network.position(p))
                    .collect()
            })
            .collect();
        AncestralSampler {
            parametrized,
            parent_positions,
        }
    }

    pub fn parametrized(&self) -> &ParametrizedNetwork {
        self.parametrized
    }

    /// Draws one case. Only cryptographically strong generators are accepted.
    pub fn sample_case<R: Rng + CryptoRng + ?Sized>(&self, rng: &mut R) -> Vec<usize> {
        let network = self.parametrized.network();
        let order = network.topological_order();
        let mut case = vec![0usize; order.len()];
        for (position, &index) in order.iter().enumerate() {
            let cpt = self.parametrized.cpt(index);
            let row = cpt.row_index(self.parent_positions[position].iter().map(|&p| case[p]));
            let u: f64 = rng.r#gen();
            case[position] = select_outcome(cpt.row(row), u);
        }
        case
    }

    /// Outcome labels of a case, comma-separated, in topological order.
    pub fn format_case(&self, case: &[usize]) -> String {
        let network = self.parametrized.network();
        let labels: Vec<&str> = network
            .iter_topological()
            .zip(case)
            .map(|(variable, &s)| variable.outcome_name(s))
            .collect();
        labels.join(",")
    }

    /// Draws `n_rows` cases and returns them formatted as data lines.
    pub fn sample_lines<R: Rng + CryptoRng + ?Sized>(&self, n_rows: usize, rng: &mut R) -> Vec<String> {
        (0..n_rows)
            .map(|_| self.format_case(&self.sample_case(rng)))
            .collect()
    }

    /// Draws `n_rows` data lines on the rayon pool and hands them to `sink`
    /// one chunk at a time, in chunk order.
    ///
    /// The rows are split into chunks of [`PARALLEL_CHUNK_ROWS`]. Each chunk
    /// gets its own [`StrongRng`], seeded sequentially from `master`, so the
    /// output is fully determined by the state of `master`. At most
    /// [`PARALLEL_GROUP_CHUNKS`] chunks are held in memory at once: a group
    /// is sampled in parallel and drained into `sink` before the next one
    /// starts. The first error from `sink` stops sampling and is returned.
    pub fn sample_lines_parallel<R, F>(&self, n_rows: usize, master: &mut R, mut sink: F) -> Result<()>
    where
        R: Rng + CryptoRng + ?Sized,
        F: FnMut(Vec<String>) -> Result<()>,
    {
        trace!(
            "sample_lines_parallel - {} chunks for {} rows",
            n_rows.div_ceil(PARALLEL_CHUNK_ROWS),
            n_rows
        );
        let mut group = Vec::with_capacity(PARALLEL_GROUP_CHUNKS);
        let mut remaining = n_rows;
        while remaining > 0 {
            group.clear();
            while remaining > 0 && group.len() < PARALLEL_GROUP_CHUNKS {
                let len = remaining.min(PARALLEL_CHUNK_ROWS);
                let rng = StrongRng::from_rng(&mut *master)
                    .map_err(|e| GeneratorError::RandomSourceUnavailable(e.to_string()))?;
                group.push((len, rng));
                remaining -= len;
            }
            let lines: Vec<Vec<String>> = group
                .par_drain(..)
                .map(|(len, mut rng)| self.sample_lines(len, &mut rng))
                .collect();
            for chunk in lines {
                sink(chunk)?;
            }
        }
        Ok(())
    }
}
