//! Classify one feature vector with an exported model artifact.

use std::path::PathBuf;

use simple_classifier::artifact;
use simple_classifier::config::DEFAULT_OUTPUT_PATH;

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let Some(options) = parse_args(std::env::args().skip(1).collect())? else {
        println!("{}", help_text());
        return Ok(());
    };
    let params = artifact::load(&options.model).map_err(|err| err.to_string())?;
    if options.features.len() != params.feature_dim {
        return Err(format!(
            "Model expects {} features, got {}",
            params.feature_dim,
            options.features.len()
        ));
    }
    let label = params
        .predict(&options.features)
        .ok_or_else(|| "Model has no classes".to_string())?;
    println!("classLabel: {label}");
    for (class, probability) in params.predict_proba(&options.features) {
        println!("  p({class}) = {probability:.4}");
    }
    Ok(())
}

#[derive(Debug)]
struct Options {
    model: PathBuf,
    features: Vec<f64>,
}

fn parse_args(args: Vec<String>) -> Result<Option<Options>, String> {
    let mut model = PathBuf::from(DEFAULT_OUTPUT_PATH);
    let mut features = None;
    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "--model" => {
                idx += 1;
                let value = args.get(idx).ok_or("--model requires a value")?;
                model = PathBuf::from(value);
            }
            "--features" => {
                idx += 1;
                let value = args.get(idx).ok_or("--features requires a value")?;
                features = Some(parse_features(value)?);
            }
            "-h" | "--help" => return Ok(None),
            unknown => return Err(format!("Unknown argument: {unknown}")),
        }
        idx += 1;
    }
    let features = features.ok_or_else(|| format!("--features is required\n\n{}", help_text()))?;
    Ok(Some(Options { model, features }))
}

fn parse_features(value: &str) -> Result<Vec<f64>, String> {
    value
        .split(',')
        .map(|part| {
            let part = part.trim();
            part.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| format!("Invalid feature value: {part:?}"))
        })
        .collect()
}

fn help_text() -> String {
    [
        "simple-classifier-predict",
        "",
        "Usage:",
        "  simple-classifier-predict --features <f64,f64,...> [--model SimpleClassifier.json]",
    ]
    .join("\n")
}
