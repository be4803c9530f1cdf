use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use mediagate_core::{
    GateConfig, PipelineState, RejectReason, SelectedFile, StorageBackend, UploadOutcome,
};
use mediagate_processing::{ConfirmationPrompt, Notice, Notifier, PromptRequest, PromptResponse};
use mediagate_runtime::initialize_gate;
use mediagate_runtime::setup::services::spawn_warm_up;
use mediagate_runtime::setup::services::setup_classifier;

struct AlwaysConfirm;

#[async_trait]
impl ConfirmationPrompt for AlwaysConfirm {
    async fn prompt(&self, _request: &PromptRequest) -> PromptResponse {
        PromptResponse::confirmed()
    }
}

#[derive(Default)]
struct Collect(Mutex<Vec<Notice>>);

impl Notifier for Collect {
    fn notify(&self, notice: Notice) {
        self.0.lock().unwrap().push(notice);
    }
}

fn local_config(dir: &std::path::Path) -> GateConfig {
    GateConfig {
        storage_backend: StorageBackend::Local,
        local_storage_path: Some(dir.to_string_lossy().into_owned()),
        local_storage_base_url: Some("http://localhost:8080/media".to_string()),
        warm_model_on_startup: false,
        ..GateConfig::default()
    }
}

const PDF: &[u8] = b"%PDF-1.5\n1 0 obj\n<<>>\nendobj\n%%EOF\n";

#[tokio::test]
async fn test_unsupported_type_is_rejected_by_wired_gate() {
    let dir = tempfile::tempdir().unwrap();
    let notices = Arc::new(Collect::default());
    let mut controller = initialize_gate(
        &local_config(dir.path()),
        Arc::new(AlwaysConfirm),
        notices.clone(),
    );

    let file = SelectedFile::from_bytes("notes.txt", "text/plain", b"hi".to_vec());
    let state = controller.on_file_selected(file).await;

    assert!(matches!(
        state,
        PipelineState::Rejected(RejectReason::UnsupportedType { .. })
    ));
    assert_eq!(notices.0.lock().unwrap()[0].title, "Invalid file type");
    assert!(!controller.classifier().is_loaded());
}

#[tokio::test]
async fn test_pdf_is_stored_in_local_backend() {
    let dir = tempfile::tempdir().unwrap();
    let mut controller = initialize_gate(
        &local_config(dir.path()),
        Arc::new(AlwaysConfirm),
        Arc::new(Collect::default()),
    );

    let file = SelectedFile::from_bytes("contract.pdf", "application/pdf", PDF.to_vec());
    let state = controller.on_file_selected(file).await;

    let PipelineState::Completed(UploadOutcome::Stored { key, location }) = &state else {
        panic!("expected stored outcome, got {:?}", state);
    };
    assert!(key.starts_with("valid-pdf-"));
    assert!(location.starts_with("http://localhost:8080/media/"));
    let stored = tokio::fs::read(dir.path().join(key)).await.unwrap();
    assert_eq!(stored, PDF);
}

#[tokio::test]
async fn test_missing_bucket_surfaces_as_failed_upload() {
    let notices = Arc::new(Collect::default());
    let config = GateConfig {
        storage_backend: StorageBackend::S3,
        s3_bucket: None,
        warm_model_on_startup: false,
        ..GateConfig::default()
    };
    let mut controller = initialize_gate(&config, Arc::new(AlwaysConfirm), notices.clone());

    let file = SelectedFile::from_bytes("contract.pdf", "application/pdf", PDF.to_vec());
    let state = controller.on_file_selected(file).await;

    let PipelineState::Completed(outcome) = &state else {
        panic!("expected completed run, got {:?}", state);
    };
    assert!(!outcome.succeeded());
    assert!(outcome.reason().unwrap().contains("S3_BUCKET"));
    assert_eq!(notices.0.lock().unwrap()[0].title, "Upload failed");
}

#[test]
fn test_warm_up_needs_a_runtime() {
    let classifier = setup_classifier(&GateConfig::default());
    assert!(!spawn_warm_up(classifier));
}
