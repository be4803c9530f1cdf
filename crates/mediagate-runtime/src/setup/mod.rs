//! Gate setup and initialization
//!
//! Builds every collaborator from configuration and assembles the pipeline
//! controller.

pub mod services;
pub mod storage;

use std::sync::Arc;

use mediagate_core::GateConfig;
use mediagate_processing::{ConfirmationPrompt, Notifier, PipelineController};

/// Initialize a pipeline controller for the given configuration.
///
/// Storage is not contacted here; a missing bucket or region surfaces on the
/// first upload. When `WARM_MODEL_ON_STARTUP` is set and a Tokio runtime is
/// running, the detection model warm-up is spawned in the background.
pub fn initialize_gate(
    config: &GateConfig,
    prompt: Arc<dyn ConfirmationPrompt>,
    notifier: Arc<dyn Notifier>,
) -> PipelineController {
    tracing::info!(
        environment = %config.environment,
        storage_backend = %config.storage_backend,
        detection_region = %config.detection_region,
        "Initializing upload gate"
    );

    let storage = storage::setup_storage(config);
    let classifier = services::setup_classifier(config);
    let controller =
        services::build_controller(config, classifier.clone(), storage, prompt, notifier);

    if config.warm_model_on_startup {
        services::spawn_warm_up(classifier);
    }

    controller
}
