use std::path::PathBuf;
use std::str::FromStr;

use super::{ConfigError, TrainingConfig, load_from_path};

/// What the command line asked for.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    Run(TrainingConfig),
    Help(String),
}

/// Parse command-line arguments (without the program name).
///
/// Settings from `--config <file>` are applied first, then every other flag overrides them.
pub fn parse_args(args: Vec<String>) -> Result<CliCommand, ConfigError> {
    if args.iter().any(|arg| arg == "-h" || arg == "--help") {
        return Ok(CliCommand::Help(help_text()));
    }
    let mut config = match config_file_arg(&args)? {
        Some(path) => load_from_path(&path)?,
        None => TrainingConfig::default(),
    };

    let mut idx = 0usize;
    while idx < args.len() {
        let flag = args[idx].as_str();
        match flag {
            "--config" => {
                idx += 1;
            }
            "--samples" => config.sample_count = parse_value(&args, &mut idx, flag)?,
            "--features" => config.feature_dim = parse_value(&args, &mut idx, flag)?,
            "--informative" => config.informative_dim = parse_value(&args, &mut idx, flag)?,
            "--redundant" => config.redundant_dim = parse_value(&args, &mut idx, flag)?,
            "--repeated" => config.repeated_dim = parse_value(&args, &mut idx, flag)?,
            "--classes" => config.class_count = parse_value(&args, &mut idx, flag)?,
            "--clusters-per-class" => {
                config.clusters_per_class = parse_value(&args, &mut idx, flag)?
            }
            "--class-sep" => config.class_sep = parse_value(&args, &mut idx, flag)?,
            "--flip" => config.flip_fraction = parse_value(&args, &mut idx, flag)?,
            "--no-hypercube" => config.hypercube = false,
            "--no-shuffle" => config.shuffle = false,
            "--seed" => config.seed = parse_value(&args, &mut idx, flag)?,
            "--l2" => config.regularization_strength = parse_value(&args, &mut idx, flag)?,
            "--tol" => config.convergence_tolerance = parse_value(&args, &mut idx, flag)?,
            "--max-iter" => config.max_iterations = parse_value(&args, &mut idx, flag)?,
            "--out" => config.output_path = PathBuf::from(take_value(&args, &mut idx, flag)?),
            "--log-dir" => {
                config.log_dir = Some(PathBuf::from(take_value(&args, &mut idx, flag)?))
            }
            unknown => return Err(ConfigError::UnknownArgument(unknown.to_string())),
        }
        idx += 1;
    }

    config.validate()?;
    Ok(CliCommand::Run(config))
}

fn config_file_arg(args: &[String]) -> Result<Option<PathBuf>, ConfigError> {
    let Some(pos) = args.iter().position(|arg| arg == "--config") else {
        return Ok(None);
    };
    args.get(pos + 1)
        .map(|value| Some(PathBuf::from(value)))
        .ok_or_else(|| ConfigError::MissingValue("--config".to_string()))
}

fn take_value<'a>(args: &'a [String], idx: &mut usize, flag: &str) -> Result<&'a str, ConfigError> {
    *idx += 1;
    args.get(*idx)
        .map(String::as_str)
        .ok_or_else(|| ConfigError::MissingValue(flag.to_string()))
}

fn parse_value<T: FromStr>(args: &[String], idx: &mut usize, flag: &str) -> Result<T, ConfigError> {
    let value = take_value(args, idx, flag)?;
    value.parse::<T>().map_err(|_| ConfigError::InvalidValue {
        flag: flag.to_string(),
        value: value.to_string(),
    })
}

/// Usage text for the training binary.
pub fn help_text() -> String {
    [
        "simple-classifier",
        "",
        "Synthesizes a labeled dataset, fits a one-vs-rest logistic regression model and",
        "exports its parameters as a versioned JSON artifact.",
        "",
        "Usage:",
        "  simple-classifier [--config train.toml] [options]",
        "",
        "Options:",
        "  --config <file>          TOML file with any of the settings below.",
        "  --samples <n>            Sample count (default: 1000).",
        "  --features <n>           Total feature count (default: 2).",
        "  --informative <n>        Informative features (default: 2).",
        "  --redundant <n>          Linear combinations of informative features (default: 0).",
        "  --repeated <n>           Duplicated features (default: 0).",
        "  --classes <n>            Class count (default: 2).",
        "  --clusters-per-class <n> Gaussian clusters per class (default: 1).",
        "  --class-sep <f64>        Hypercube half side length (default: 2.0).",
        "  --flip <f64>             Fraction of randomly reassigned labels (default: 0.01).",
        "  --no-hypercube           Randomly scale cluster centroids.",
        "  --no-shuffle             Keep samples and columns in generation order.",
        "  --seed <u64>             RNG seed (default: 42).",
        "  --l2 <f64>               Regularization strength lambda (default: 0.5).",
        "  --tol <f64>              Relative convergence tolerance (default: 1e-4).",
        "  --max-iter <n>           Solver iteration cap per class (default: 100).",
        "  --out <file>             Artifact path (default: SimpleClassifier.json).",
        "  --log-dir <dir>          Also write log files to this directory.",
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    fn run_config(values: &[&str]) -> TrainingConfig {
        match parse_args(args(values)).unwrap() {
            CliCommand::Run(config) => config,
            CliCommand::Help(_) => panic!("expected a run"),
        }
    }

    #[test]
    fn no_arguments_use_defaults() {
        assert_eq!(run_config(&[]), TrainingConfig::default());
    }

    #[test]
    fn flags_override_defaults() {
        let config = run_config(&[
            "--samples", "50", "--features", "4", "--seed", "9", "--l2", "0.25", "--out",
            "m.json", "--no-shuffle",
        ]);
        assert_eq!(config.sample_count, 50);
        assert_eq!(config.feature_dim, 4);
        assert_eq!(config.seed, 9);
        assert_eq!(config.regularization_strength, 0.25);
        assert_eq!(config.output_path, PathBuf::from("m.json"));
        assert!(!config.shuffle);
    }

    #[test]
    fn flags_take_precedence_over_config_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("train.toml");
        std::fs::write(&path, "sample_count = 300\nseed = 1\n").unwrap();
        let path_arg = path.to_string_lossy().into_owned();
        let config = run_config(&["--seed", "5", "--config", &path_arg]);
        assert_eq!(config.sample_count, 300);
        assert_eq!(config.seed, 5);
    }

    #[test]
    fn help_short_circuits() {
        assert!(matches!(
            parse_args(args(&["--samples", "x", "--help"])).unwrap(),
            CliCommand::Help(_)
        ));
    }

    #[test]
    fn bad_arguments_are_reported() {
        assert!(matches!(
            parse_args(args(&["--bogus"])),
            Err(ConfigError::UnknownArgument(_))
        ));
        assert!(matches!(
            parse_args(args(&["--samples"])),
            Err(ConfigError::MissingValue(_))
        ));
        assert!(matches!(
            parse_args(args(&["--samples", "many"])),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            parse_args(args(&["--tol", "0"])),
            Err(ConfigError::Invalid { .. })
        ));
    }
}
