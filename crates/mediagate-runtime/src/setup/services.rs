use std::sync::Arc;

use mediagate_core::GateConfig;
use mediagate_plugins::{RekognitionConfig, RekognitionLoader};
use mediagate_processing::{
    ConfirmationPrompt, ContentClassifier, ModelLoader, Notifier, PipelineController,
    PipelineLimits, UploadOrchestrator,
};
use mediagate_storage::Storage;
use tokio::runtime::Handle;

/// Content classifier backed by AWS Rekognition.
pub fn setup_classifier(config: &GateConfig) -> Arc<ContentClassifier> {
    let loader: Arc<dyn ModelLoader> = Arc::new(RekognitionLoader::new(
        RekognitionConfig::from_gate_config(config),
    ));
    Arc::new(ContentClassifier::new(loader).with_timeout(config.detection_timeout))
}

pub fn build_controller(
    config: &GateConfig,
    classifier: Arc<ContentClassifier>,
    storage: Arc<dyn Storage>,
    prompt: Arc<dyn ConfirmationPrompt>,
    notifier: Arc<dyn Notifier>,
) -> PipelineController {
    let uploader = UploadOrchestrator::new(prompt, storage, notifier.clone())
        .with_storage_timeout(config.storage_timeout)
        .notify_on_failure(config.notify_on_storage_failure);

    PipelineController::new(classifier, uploader, notifier)
        .with_limits(PipelineLimits::from(config))
}

/// Load the detection model in the background. Returns false when no Tokio
/// runtime is available; the model is then loaded on first classification.
pub fn spawn_warm_up(classifier: Arc<ContentClassifier>) -> bool {
    match Handle::try_current() {
        Ok(handle) => {
            handle.spawn(async move {
                // Failures are logged by `warm` and retried lazily.
                let _ = classifier.warm().await;
            });
            true
        }
        Err(_) => {
            tracing::debug!("No Tokio runtime; skipping model warm-up");
            false
        }
    }
}
