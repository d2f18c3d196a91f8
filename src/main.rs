//! Synthesizes a dataset, fits a one-vs-rest logistic regression model and exports it.

use std::error::Error;
use std::process::ExitCode;

use simple_classifier::config::{self, CliCommand};
use simple_classifier::{logging, pipeline};

fn main() -> ExitCode {
    let config = match config::parse_args(std::env::args().skip(1).collect()) {
        Ok(CliCommand::Help(text)) => {
            println!("{text}");
            return ExitCode::SUCCESS;
        }
        Ok(CliCommand::Run(config)) => config,
        Err(err) => {
            eprintln!("{err}");
            eprintln!("Run with --help for usage.");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = logging::init(config.log_dir.as_deref()) {
        eprintln!("Logging disabled: {err}");
    }

    match pipeline::run(&config) {
        Ok(summary) => {
            println!(
                "wrote {} ({} classes, {} features, train accuracy {:.4}{})",
                summary.artifact_path.display(),
                summary.class_labels.len(),
                summary.feature_dim,
                summary.train_accuracy,
                if summary.degraded { ", not converged" } else { "" }
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{}", error_chain(&err));
            ExitCode::FAILURE
        }
    }
}

fn error_chain(err: &dyn Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
