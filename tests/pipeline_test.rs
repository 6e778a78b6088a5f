#![cfg(unix)]

mod common;

use std::fs;
use std::path::Path;

use promptmesh::{ConfigOverrides, GenerationPipeline, PromptMeshError, Worker};

use common::write_worker;

/// Diffuse stub that creates the image artifact it reports.
fn write_good_diffuse(root: &Path) {
    let image = root.join("artifacts").join("generated_image.png");
    fs::create_dir_all(image.parent().unwrap()).unwrap();
    write_worker(
        &root.join("bin"),
        "diffuse",
        &format!(
            r#"touch "{image}"
printf '{{"image_path": "{image}"}}' > "$2""#,
            image = image.display()
        ),
    );
}

/// Mesh stub that creates the model artifact it reports, plus an
/// invocation marker so tests can prove whether the stage ran.
fn write_good_mesh(root: &Path) {
    let model = root.join("artifacts").join("generated_model.obj");
    fs::create_dir_all(model.parent().unwrap()).unwrap();
    write_worker(
        &root.join("bin"),
        "generate",
        &format!(
            r#"touch "{marker}"
touch "{model}"
printf '{{"model_path": "{model}"}}' > "$2""#,
            marker = mesh_marker(root).display(),
            model = model.display()
        ),
    );
}

fn mesh_marker(root: &Path) -> std::path::PathBuf {
    root.join("mesh-invoked")
}

#[test]
fn happy_path_produces_existing_artifacts() {
    let root = tempfile::tempdir().unwrap();
    write_good_diffuse(root.path());
    write_good_mesh(root.path());
    let pipeline = GenerationPipeline::new(&common::config_in(root.path()));

    let result = pipeline
        .generate("a red chair", "fast-model-flux", &ConfigOverrides::default())
        .unwrap();

    assert_eq!(result.text, "a red chair");
    assert!(result.image.is_file());
    assert!(result.model.is_file());
    assert!(mesh_marker(root.path()).exists());
}

#[test]
fn diffuse_failure_aborts_before_mesh_stage() {
    let root = tempfile::tempdir().unwrap();
    write_worker(
        &root.path().join("bin"),
        "diffuse",
        r#"printf '{"error": "oom"}' > "$2""#,
    );
    write_good_mesh(root.path());
    let pipeline = GenerationPipeline::new(&common::config_in(root.path()));

    let err = pipeline
        .generate("a red chair", "flux_1_schnell", &ConfigOverrides::default())
        .unwrap_err();

    match err {
        PromptMeshError::StageReported { worker, message } => {
            assert_eq!(worker, Worker::Diffuse);
            assert_eq!(message, "oom");
        }
        other => panic!("expected StageReported, got {other:?}"),
    }
    // The second stage was never invoked
    assert!(!mesh_marker(root.path()).exists());
}

#[test]
fn phantom_image_artifact_aborts_before_mesh_stage() {
    let root = tempfile::tempdir().unwrap();
    // Exit 0 and claim an image that was never written
    write_worker(
        &root.path().join("bin"),
        "diffuse",
        r#"printf '{"image_path": "/nonexistent/img.png"}' > "$2""#,
    );
    write_good_mesh(root.path());
    let pipeline = GenerationPipeline::new(&common::config_in(root.path()));

    let err = pipeline
        .generate("a red chair", "flux_1_schnell", &ConfigOverrides::default())
        .unwrap_err();

    assert!(matches!(
        err,
        PromptMeshError::StageContract {
            worker: Worker::Diffuse,
            ..
        }
    ));
    assert!(!mesh_marker(root.path()).exists());
}

#[test]
fn phantom_mesh_artifact_is_contract_violation() {
    let root = tempfile::tempdir().unwrap();
    write_good_diffuse(root.path());
    write_worker(
        &root.path().join("bin"),
        "generate",
        r#"printf '{"model_path": "/nonexistent/mesh.obj"}' > "$2""#,
    );
    let pipeline = GenerationPipeline::new(&common::config_in(root.path()));

    let err = pipeline
        .generate("a red chair", "flux_1_schnell", &ConfigOverrides::default())
        .unwrap_err();

    assert!(matches!(
        err,
        PromptMeshError::StageContract {
            worker: Worker::GenerateMesh,
            ..
        }
    ));
}

#[test]
fn mesh_receives_the_diffused_image_path() {
    let root = tempfile::tempdir().unwrap();
    write_good_diffuse(root.path());
    let model = root.path().join("artifacts").join("generated_model.obj");
    let copy = root.path().join("mesh-request.json");
    write_worker(
        &root.path().join("bin"),
        "generate",
        &format!(
            r#"cp "$1" "{copy}"
touch "{model}"
printf '{{"model_path": "{model}"}}' > "$2""#,
            copy = copy.display(),
            model = model.display()
        ),
    );
    let pipeline = GenerationPipeline::new(&common::config_in(root.path()));

    let result = pipeline
        .generate("a red chair", "flux_1_schnell", &ConfigOverrides::default())
        .unwrap();

    let request: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&copy).unwrap()).unwrap();
    assert_eq!(
        request["image_path"].as_str().unwrap(),
        result.image.to_str().unwrap()
    );
}

#[test]
fn resolved_config_is_flattened_into_the_diffuse_request() {
    let root = tempfile::tempdir().unwrap();
    let image = root.path().join("artifacts").join("generated_image.png");
    fs::create_dir_all(image.parent().unwrap()).unwrap();
    let copy = root.path().join("diffuse-request.json");
    write_worker(
        &root.path().join("bin"),
        "diffuse",
        &format!(
            r#"cp "$1" "{copy}"
touch "{image}"
printf '{{"image_path": "{image}"}}' > "$2""#,
            copy = copy.display(),
            image = image.display()
        ),
    );
    write_good_mesh(root.path());
    let pipeline = GenerationPipeline::new(&common::config_in(root.path()));

    pipeline
        .generate(
            "a red chair",
            "flux_1_schnell",
            &ConfigOverrides::default().steps(8).seed(42),
        )
        .unwrap();

    let request: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&copy).unwrap()).unwrap();
    // Override applied, remaining Fast defaults intact
    assert_eq!(request["steps"], 8);
    assert_eq!(request["seed"], 42);
    assert_eq!(request["guidance_scale"], 0.0);
    assert_eq!(request["max_sequence_length"], 256);
}

#[test]
fn empty_prompt_is_rejected_without_running_any_stage() {
    let root = tempfile::tempdir().unwrap();
    write_good_mesh(root.path());
    // No diffuse binary: reaching the stage would be a Spawn error instead
    let pipeline = GenerationPipeline::new(&common::config_in(root.path()));

    let err = pipeline
        .generate("   ", "flux_1_schnell", &ConfigOverrides::default())
        .unwrap_err();

    assert!(matches!(err, PromptMeshError::InvalidInput(_)));
    assert!(!mesh_marker(root.path()).exists());
}

#[test]
fn transcribe_returns_trimmed_text() {
    let root = tempfile::tempdir().unwrap();
    write_worker(
        &root.path().join("bin"),
        "transcribe",
        r#"printf '{"transcription": " a dinosaur \\n"}' > "$2""#,
    );
    let pipeline = GenerationPipeline::new(&common::config_in(root.path()));

    let text = pipeline.transcribe(Path::new("/tmp/audio.wav")).unwrap();
    assert_eq!(text, "a dinosaur");
}

#[test]
fn empty_transcription_is_contract_violation() {
    let root = tempfile::tempdir().unwrap();
    write_worker(
        &root.path().join("bin"),
        "transcribe",
        r#"printf '{"transcription": "  "}' > "$2""#,
    );
    let pipeline = GenerationPipeline::new(&common::config_in(root.path()));

    let err = pipeline.transcribe(Path::new("/tmp/audio.wav")).unwrap_err();
    assert!(matches!(
        err,
        PromptMeshError::StageContract {
            worker: Worker::Transcribe,
            ..
        }
    ));
}
