//! Training configuration.
//!
//! Settings come from built-in defaults, an optional TOML file and command-line flags, in
//! increasing order of precedence.

mod cli;
mod errors;
mod load;
mod types;

pub use cli::{CliCommand, help_text, parse_args};
pub use errors::ConfigError;
pub use load::load_from_path;
pub use types::{DEFAULT_OUTPUT_PATH, TrainingConfig};
