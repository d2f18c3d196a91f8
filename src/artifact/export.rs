use std::io::Write;
use std::path::{Path, PathBuf};

use super::{ArtifactError, ModelArtifact};
use crate::ml::logreg::ModelParameters;

/// Serialize `params` to `destination`, replacing any existing file atomically.
///
/// Missing parent directories are created. On failure the destination keeps its previous
/// contents and no temporary file is left behind.
pub fn export(params: &ModelParameters, destination: &Path) -> Result<(), ArtifactError> {
    let artifact = ModelArtifact::from_parameters(params)?;
    let bytes = serde_json::to_vec_pretty(&artifact).map_err(ArtifactError::Serialize)?;
    atomic_write(destination, &bytes)?;
    tracing::info!(
        path = %destination.display(),
        classes = artifact.class_labels.len(),
        features = artifact.feature_count,
        "Exported model artifact"
    );
    Ok(())
}

fn atomic_write(path: &Path, data: &[u8]) -> Result<(), ArtifactError> {
    let file_name = path.file_name().ok_or_else(|| ArtifactError::Write {
        path: path.to_path_buf(),
        source: std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "artifact path has no file name",
        ),
    })?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir).map_err(|source| ArtifactError::CreateDir {
        path: dir.clone(),
        source,
    })?;

    let prefix = format!(".{}.", file_name.to_string_lossy());
    // Dropping the temp file on any early return deletes it.
    let mut tmp = tempfile::Builder::new()
        .prefix(&prefix)
        .suffix(".tmp")
        .tempfile_in(&dir)
        .map_err(|source| ArtifactError::Write {
            path: dir.clone(),
            source,
        })?;
    let write_err = |source| ArtifactError::Write {
        path: path.to_path_buf(),
        source,
    };
    tmp.write_all(data).map_err(write_err)?;
    tmp.flush().map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(path).map_err(|err| write_err(err.error))?;
    sync_parent_dir(&dir)
}

fn sync_parent_dir(dir: &Path) -> Result<(), ArtifactError> {
    #[cfg(unix)]
    {
        let dir_handle = std::fs::File::open(dir).map_err(|source| ArtifactError::Write {
            path: dir.to_path_buf(),
            source,
        })?;
        dir_handle
            .sync_all()
            .map_err(|source| ArtifactError::Write {
                path: dir.to_path_buf(),
                source,
            })?;
    }
    #[cfg(not(unix))]
    {
        let _ = dir;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::load;
    use crate::artifact::tests::sample_params;
    use tempfile::tempdir;

    fn dir_entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn export_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.json");
        let params = sample_params();
        export(&params, &path).unwrap();
        assert_eq!(load(&path).unwrap(), params);
        assert_eq!(dir_entries(dir.path()), vec!["model.json".to_string()]);
    }

    #[test]
    fn export_writes_self_describing_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.json");
        export(&sample_params(), &path).unwrap();
        let value: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(value["format_version"], 1);
        assert_eq!(value["feature_count"], 2);
        assert_eq!(value["class_labels"], serde_json::json!([0, 1]));
        assert_eq!(value["classes"][0]["weights"], serde_json::json!([0.25, -1.5]));
        assert_eq!(value["input_name"], "input");
        assert_eq!(value["output_name"], "classLabel");
    }

    #[test]
    fn export_creates_missing_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("out").join("model.json");
        export(&sample_params(), &path).unwrap();
        assert!(path.is_file());
    }

    #[test]
    fn export_replaces_previous_artifact() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.json");
        export(&sample_params(), &path).unwrap();
        let mut updated = sample_params();
        updated.classes.get_mut(&1).unwrap().bias = 2.5;
        export(&updated, &path).unwrap();
        assert_eq!(load(&path).unwrap(), updated);
    }

    #[test]
    fn invalid_parameters_leave_existing_artifact_untouched() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.json");
        export(&sample_params(), &path).unwrap();
        let before = std::fs::read(&path).unwrap();

        let mut broken = sample_params();
        broken.classes.get_mut(&0).unwrap().weights.pop();
        let err = export(&broken, &path).unwrap_err();
        assert!(matches!(err, ArtifactError::Validation(_)));
        assert_eq!(std::fs::read(&path).unwrap(), before);
    }

    #[test]
    fn failed_replace_cleans_up_temp_file() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("model.json");
        std::fs::create_dir(&blocker).unwrap();
        std::fs::write(blocker.join("keep.txt"), b"keep").unwrap();

        let err = export(&sample_params(), &blocker).unwrap_err();
        assert!(err.is_io());
        assert_eq!(dir_entries(dir.path()), vec!["model.json".to_string()]);
        assert_eq!(std::fs::read(blocker.join("keep.txt")).unwrap(), b"keep");
    }

    #[test]
    fn unwritable_parent_is_an_io_error() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("plain-file");
        std::fs::write(&file, b"x").unwrap();
        let err = export(&sample_params(), &file.join("model.json")).unwrap_err();
        assert!(matches!(err, ArtifactError::CreateDir { .. }));
    }
}
