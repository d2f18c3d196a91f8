//! Library exports for the training binary, the predictor, benchmarks and tests.
/// Versioned model artifact: atomic export and validated load.
pub mod artifact;
/// Training configuration from defaults, TOML and command-line flags.
pub mod config;
/// Labeled samples and the seeded dataset synthesizer.
pub mod dataset;
/// Logging setup.
pub mod logging;
/// Optimization, logistic regression and evaluation metrics.
pub mod ml;
/// Synthesize → fit → export orchestration.
pub mod pipeline;
