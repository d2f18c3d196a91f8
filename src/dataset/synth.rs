//! Seeded synthetic classification data.
//!
//! Samples are drawn from Gaussian clusters centered on the vertices of a hypercube in the
//! informative subspace. Each cluster is stretched by its own random linear map, so class
//! regions are randomly oriented. Redundant columns are random linear combinations of the
//! informative block, repeated columns duplicate earlier ones, and the remainder is noise.
//!
//! Every random draw comes from a single [`StdRng`] seeded from [`SynthesisOptions::seed`],
//! so identical options always yield identical datasets.

use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::seq::{SliceRandom, index};
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use thiserror::Error;

use super::{ClassLabel, Dataset, Sample};

/// Above this many informative dimensions vertices are drawn bit by bit instead of by index.
const MAX_INDEXED_VERTEX_DIMS: usize = 30;

/// Invalid synthesis configuration.
#[derive(Debug, Error, PartialEq)]
pub enum SynthesisError {
    #[error("sample_count must be greater than zero")]
    NoSamples,
    #[error("informative_dim must be greater than zero")]
    NoInformativeFeatures,
    #[error(
        "informative ({informative}) + redundant ({redundant}) + repeated ({repeated}) features exceed feature_dim ({feature_dim})"
    )]
    SplitExceedsFeatures {
        informative: usize,
        redundant: usize,
        repeated: usize,
        feature_dim: usize,
    },
    #[error("class_count must be at least 2, got {0}")]
    TooFewClasses(usize),
    #[error("clusters_per_class must be at least 1")]
    NoClusters,
    #[error(
        "{clusters} clusters do not fit on the hypercube vertices of {informative} informative feature(s)"
    )]
    TooManyClusters { clusters: usize, informative: usize },
    #[error("class_sep must be positive and finite, got {0}")]
    InvalidClassSep(f64),
    #[error("flip_fraction must lie in [0, 1], got {0}")]
    InvalidFlipFraction(f64),
    #[error("synthesized dataset has {found} distinct label(s); at least 2 are required")]
    DegenerateLabels { found: usize },
}

/// Parameters controlling dataset synthesis.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisOptions {
    pub sample_count: usize,
    pub feature_dim: usize,
    pub informative_dim: usize,
    pub redundant_dim: usize,
    pub repeated_dim: usize,
    pub class_count: usize,
    pub clusters_per_class: usize,
    /// Half side length of the hypercube hosting cluster centroids.
    pub class_sep: f64,
    /// Fraction of labels reassigned uniformly at random.
    pub flip_fraction: f64,
    /// Place centroids exactly on hypercube vertices.
    pub hypercube: bool,
    /// Shuffle samples and feature columns.
    pub shuffle: bool,
    pub seed: u64,
}

impl SynthesisOptions {
    /// Options for the given feature split with default cluster settings.
    ///
    /// The defaults place one cluster per class two units from the origin on each axis, which
    /// keeps classes linearly separable when every feature is informative. Two clusters per
    /// class at `class_sep = 1.0` reproduce the harder `make_classification` layout.
    pub fn new(
        sample_count: usize,
        feature_dim: usize,
        informative_dim: usize,
        redundant_dim: usize,
        repeated_dim: usize,
        seed: u64,
    ) -> Self {
        Self {
            sample_count,
            feature_dim,
            informative_dim,
            redundant_dim,
            repeated_dim,
            class_count: 2,
            clusters_per_class: 1,
            class_sep: 2.0,
            flip_fraction: 0.01,
            hypercube: true,
            shuffle: true,
            seed,
        }
    }

    pub fn cluster_count(&self) -> usize {
        self.class_count.saturating_mul(self.clusters_per_class)
    }

    pub fn validate(&self) -> Result<(), SynthesisError> {
        if self.sample_count == 0 {
            return Err(SynthesisError::NoSamples);
        }
        if self.informative_dim == 0 {
            return Err(SynthesisError::NoInformativeFeatures);
        }
        let used = self
            .informative_dim
            .checked_add(self.redundant_dim)
            .and_then(|sum| sum.checked_add(self.repeated_dim));
        if used.is_none_or(|used| used > self.feature_dim) {
            return Err(SynthesisError::SplitExceedsFeatures {
                informative: self.informative_dim,
                redundant: self.redundant_dim,
                repeated: self.repeated_dim,
                feature_dim: self.feature_dim,
            });
        }
        if self.class_count < 2 {
            return Err(SynthesisError::TooFewClasses(self.class_count));
        }
        if self.clusters_per_class == 0 {
            return Err(SynthesisError::NoClusters);
        }
        let clusters = self.cluster_count();
        if self.informative_dim < 64 && clusters as u64 > 1u64 << self.informative_dim {
            return Err(SynthesisError::TooManyClusters {
                clusters,
                informative: self.informative_dim,
            });
        }
        if !self.class_sep.is_finite() || self.class_sep <= 0.0 {
            return Err(SynthesisError::InvalidClassSep(self.class_sep));
        }
        if !(0.0..=1.0).contains(&self.flip_fraction) {
            return Err(SynthesisError::InvalidFlipFraction(self.flip_fraction));
        }
        Ok(())
    }
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        Self::new(1000, 2, 2, 0, 0, 42)
    }
}

/// Generate a labeled dataset from `options`.
pub fn synthesize(options: &SynthesisOptions) -> Result<Dataset, SynthesisError> {
    options.validate()?;
    let mut rng = StdRng::seed_from_u64(options.seed);

    let n = options.sample_count;
    let d = options.feature_dim;
    let informative = options.informative_dim;
    let redundant = options.redundant_dim;
    let repeated = options.repeated_dim;
    let class_count = options.class_count;

    let sizes = cluster_sizes(n, class_count, options.clusters_per_class);
    let centroids = place_centroids(&mut rng, options);

    let mut rows = vec![vec![0.0f64; d]; n];
    let mut labels: Vec<ClassLabel> = vec![0; n];
    for row in rows.iter_mut() {
        for value in row[..informative].iter_mut() {
            *value = rng.sample(StandardNormal);
        }
    }

    let mut start = 0usize;
    for (cluster, &size) in sizes.iter().enumerate() {
        let stop = start + size;
        let label = (cluster % class_count) as ClassLabel;
        let mixing = random_matrix(&mut rng, informative, informative);
        for idx in start..stop {
            labels[idx] = label;
            let draw = rows[idx][..informative].to_vec();
            for j in 0..informative {
                let mut acc = centroids[cluster][j];
                for (i, &x) in draw.iter().enumerate() {
                    acc += x * mixing[i * informative + j];
                }
                rows[idx][j] = acc;
            }
        }
        start = stop;
    }

    if redundant > 0 {
        let mixing = random_matrix(&mut rng, informative, redundant);
        for row in rows.iter_mut() {
            for j in 0..redundant {
                let mut acc = 0.0;
                for i in 0..informative {
                    acc += row[i] * mixing[i * redundant + j];
                }
                row[informative + j] = acc;
            }
        }
    }

    let filled = informative + redundant;
    if repeated > 0 {
        let sources: Vec<usize> = (0..repeated)
            .map(|_| ((filled - 1) as f64 * rng.random::<f64>() + 0.5) as usize)
            .collect();
        for row in rows.iter_mut() {
            for (j, &source) in sources.iter().enumerate() {
                row[filled + j] = row[source];
            }
        }
    }

    let useful = filled + repeated;
    for row in rows.iter_mut() {
        for value in row[useful..].iter_mut() {
            *value = rng.sample(StandardNormal);
        }
    }

    if options.flip_fraction > 0.0 {
        for label in labels.iter_mut() {
            if rng.random::<f64>() < options.flip_fraction {
                *label = rng.random_range(0..class_count) as ClassLabel;
            }
        }
    }

    let mut samples: Vec<Sample> = rows
        .into_iter()
        .zip(labels)
        .map(|(features, label)| Sample { features, label })
        .collect();

    if options.shuffle {
        samples.shuffle(&mut rng);
        let mut columns: Vec<usize> = (0..d).collect();
        columns.shuffle(&mut rng);
        for sample in samples.iter_mut() {
            let original = std::mem::take(&mut sample.features);
            sample.features = columns.iter().map(|&column| original[column]).collect();
        }
    }

    let dataset = Dataset::new(samples);
    let found = dataset.labels().len();
    if found < 2 {
        return Err(SynthesisError::DegenerateLabels { found });
    }
    tracing::debug!(
        samples = n,
        features = d,
        classes = found,
        seed = options.seed,
        "Synthesized dataset"
    );
    Ok(dataset)
}

fn cluster_sizes(n: usize, class_count: usize, clusters_per_class: usize) -> Vec<usize> {
    let clusters = class_count * clusters_per_class;
    let base = n / class_count / clusters_per_class;
    let mut sizes = vec![base; clusters];
    for i in 0..(n - base * clusters) {
        sizes[i % clusters] += 1;
    }
    sizes
}

fn place_centroids(rng: &mut StdRng, options: &SynthesisOptions) -> Vec<Vec<f64>> {
    let informative = options.informative_dim;
    let sep = options.class_sep;
    let mut centroids = hypercube_vertices(rng, informative, options.cluster_count());
    for centroid in centroids.iter_mut() {
        for value in centroid.iter_mut() {
            *value = *value * 2.0 * sep - sep;
        }
    }
    if !options.hypercube {
        for centroid in centroids.iter_mut() {
            let scale: f64 = rng.random();
            for value in centroid.iter_mut() {
                *value *= scale;
            }
        }
        let column_scale: Vec<f64> = (0..informative).map(|_| rng.random()).collect();
        for centroid in centroids.iter_mut() {
            for (value, scale) in centroid.iter_mut().zip(&column_scale) {
                *value *= scale;
            }
        }
    }
    centroids
}

/// Distinct 0/1 vertices of the `dims`-dimensional unit hypercube.
fn hypercube_vertices(rng: &mut StdRng, dims: usize, count: usize) -> Vec<Vec<f64>> {
    if dims <= MAX_INDEXED_VERTEX_DIMS {
        return index::sample(rng, 1usize << dims, count)
            .into_iter()
            .map(|vertex| {
                (0..dims)
                    .map(|bit| ((vertex >> bit) & 1) as f64)
                    .collect()
            })
            .collect();
    }
    let mut seen = BTreeSet::new();
    let mut vertices = Vec::with_capacity(count);
    while vertices.len() < count {
        let bits: Vec<bool> = (0..dims).map(|_| rng.random::<bool>()).collect();
        if seen.insert(bits.clone()) {
            vertices.push(bits.into_iter().map(|bit| if bit { 1.0 } else { 0.0 }).collect());
        }
    }
    vertices
}

/// Row-major `rows x cols` matrix with entries in `[-1, 1)`.
fn random_matrix(rng: &mut StdRng, rows: usize, cols: usize) -> Vec<f64> {
    (0..rows * cols)
        .map(|_| 2.0 * rng.random::<f64>() - 1.0)
        .collect()
}
