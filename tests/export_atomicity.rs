mod support;

use simple_classifier::artifact::{self, ArtifactError};
use simple_classifier::config::TrainingConfig;
use simple_classifier::ml::logreg::{ClassWeights, ModelParameters};
use simple_classifier::pipeline::{self, PipelineError};
use support::scratch::{ScratchRun, dir_entries};

fn two_class_params() -> ModelParameters {
    let mut params = ModelParameters::new(2);
    params.classes.insert(
        0,
        ClassWeights {
            weights: vec![0.5, -1.25],
            bias: 0.1,
        },
    );
    params.classes.insert(
        1,
        ClassWeights {
            weights: vec![-0.5, 1.25],
            bias: -0.1,
        },
    );
    params
}

#[test]
fn export_leaves_only_the_artifact() {
    let scratch = ScratchRun::reference();
    artifact::export(&two_class_params(), scratch.artifact_path()).expect("export");
    assert_eq!(dir_entries(scratch.dir.path()), vec!["SimpleClassifier.json"]);
}

#[test]
fn invalid_parameters_never_reach_disk() {
    let scratch = ScratchRun::reference();
    let mut params = two_class_params();
    params.classes.insert(
        2,
        ClassWeights {
            weights: vec![1.0],
            bias: 0.0,
        },
    );
    let err = artifact::export(&params, scratch.artifact_path()).unwrap_err();
    assert!(matches!(err, ArtifactError::Validation(_)));
    assert!(!err.is_io());
    assert!(dir_entries(scratch.dir.path()).is_empty());
}

#[test]
fn empty_parameters_are_rejected() {
    let scratch = ScratchRun::reference();
    let err = artifact::export(&ModelParameters::new(2), scratch.artifact_path()).unwrap_err();
    assert!(matches!(err, ArtifactError::Validation(_)));
    assert!(!scratch.artifact_path().exists());
}

#[test]
fn rejected_parameters_keep_previous_artifact() {
    let scratch = ScratchRun::reference();
    artifact::export(&two_class_params(), scratch.artifact_path()).expect("first export");
    let before = std::fs::read(scratch.artifact_path()).expect("read");

    let err = artifact::export(&ModelParameters::new(2), scratch.artifact_path()).unwrap_err();
    assert!(matches!(err, ArtifactError::Validation(_)));
    assert_eq!(std::fs::read(scratch.artifact_path()).expect("read"), before);
}

#[test]
fn unwritable_destination_fails_the_run() {
    let scratch = ScratchRun::reference();
    let blocker = scratch.path("blocker");
    std::fs::write(&blocker, b"not a directory").expect("write blocker");
    let config = TrainingConfig {
        sample_count: 100,
        output_path: blocker.join("SimpleClassifier.json"),
        ..scratch.config.clone()
    };

    let err = pipeline::run(&config).unwrap_err();
    match err {
        PipelineError::Artifact(inner) => assert!(inner.is_io()),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(dir_entries(scratch.dir.path()), vec!["blocker"]);
}

#[cfg(unix)]
#[test]
fn unwritable_directory_keeps_previous_artifact() {
    use std::os::unix::fs::PermissionsExt;

    let scratch = ScratchRun::reference();
    let locked = scratch.path("locked");
    std::fs::create_dir(&locked).expect("create dir");
    let path = locked.join("SimpleClassifier.json");
    artifact::export(&two_class_params(), &path).expect("first export");
    let before = std::fs::read(&path).expect("read");

    std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o555))
        .expect("lock dir");
    let write_check = locked.join("write-check");
    if std::fs::write(&write_check, b"x").is_ok() {
        // Permission bits are not enforced for this user (e.g. root).
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755))
            .expect("unlock dir");
        return;
    }

    let mut updated = two_class_params();
    updated.classes.get_mut(&1).expect("class 1").bias = 3.0;
    let result = artifact::export(&updated, &path);
    std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755))
        .expect("unlock dir");

    let err = result.unwrap_err();
    assert!(err.is_io(), "unexpected error: {err}");
    assert_eq!(std::fs::read(&path).expect("read"), before);
    assert_eq!(dir_entries(&locked), vec!["SimpleClassifier.json"]);
    assert_eq!(artifact::load(&path).expect("load"), two_class_params());
}
