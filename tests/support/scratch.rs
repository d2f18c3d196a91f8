use std::path::{Path, PathBuf};

use simple_classifier::config::TrainingConfig;
use tempfile::TempDir;

/// A scratch directory holding the artifact of one training run.
pub struct ScratchRun {
    pub dir: TempDir,
    pub config: TrainingConfig,
}

impl ScratchRun {
    /// The reference run: 1000 samples, 2 informative features, seed 42.
    pub fn reference() -> Self {
        Self::with(TrainingConfig::default())
    }

    /// `config` with its output redirected into a fresh temp directory.
    pub fn with(config: TrainingConfig) -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let output_path = dir.path().join("SimpleClassifier.json");
        Self {
            dir,
            config: TrainingConfig {
                output_path,
                ..config
            },
        }
    }

    pub fn artifact_path(&self) -> &Path {
        &self.config.output_path
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

pub fn read_json(path: &Path) -> serde_json::Value {
    let text = std::fs::read_to_string(path).expect("read artifact");
    serde_json::from_str(&text).expect("artifact is JSON")
}

/// Names of every entry in `dir`, sorted.
pub fn dir_entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .expect("read dir")
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
