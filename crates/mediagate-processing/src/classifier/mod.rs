//! Content classifier
//!
//! Wraps a detection collaborator behind a load-once cache. The model loader
//! is injected at construction; the first successful load is shared by every
//! later classification and by the startup warm-up, so there is exactly one
//! load path. Failed loads are not cached and are retried on the next call.

mod normalize;

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use mediagate_core::{Detection, GateError, GateResult};
use tokio::sync::OnceCell;

use crate::decode::DecodedImage;

pub use normalize::normalize;

/// Detection as reported by the collaborator, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDetection {
    pub class: String,
    pub score: f32,
}

impl RawDetection {
    pub fn new(class: impl Into<String>, score: f32) -> Self {
        Self {
            class: class.into(),
            score,
        }
    }
}

/// A loaded object-detection model. Inference must not mutate it.
#[async_trait]
pub trait DetectionModel: Send + Sync {
    async fn detect(&self, image: &DecodedImage) -> anyhow::Result<Vec<RawDetection>>;
}

/// Loads a detection model; may be slow.
#[async_trait]
pub trait ModelLoader: Send + Sync {
    fn name(&self) -> &str;

    async fn load(&self) -> anyhow::Result<Arc<dyn DetectionModel>>;
}

pub struct ContentClassifier {
    loader: Arc<dyn ModelLoader>,
    model: OnceCell<Arc<dyn DetectionModel>>,
    timeout: Option<Duration>,
}

impl ContentClassifier {
    pub fn new(loader: Arc<dyn ModelLoader>) -> Self {
        Self {
            loader,
            model: OnceCell::new(),
            timeout: None,
        }
    }

    /// Bound each classification (including a lazy model load) by `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn is_loaded(&self) -> bool {
        self.model.initialized()
    }

    /// Return the cached model, loading it first if needed.
    pub async fn ensure_loaded(&self) -> GateResult<Arc<dyn DetectionModel>> {
        let model = self
            .model
            .get_or_try_init(|| async {
                let start = Instant::now();
                match self.loader.load().await {
                    Ok(model) => {
                        tracing::info!(
                            loader = %self.loader.name(),
                            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                            "Detection model loaded"
                        );
                        Ok(model)
                    }
                    Err(e) => {
                        tracing::error!(
                            loader = %self.loader.name(),
                            error = %e,
                            "Detection model load failed"
                        );
                        Err(GateError::classification("Failed to load detection model", e))
                    }
                }
            })
            .await?;

        Ok(model.clone())
    }

    /// Startup warm-up. A failure is logged and left for the next
    /// classification to retry; it never blocks file selection.
    pub async fn warm(&self) -> GateResult<()> {
        match self.ensure_loaded().await {
            Ok(_) => Ok(()),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "Detection model warm-up failed; will retry on first classification"
                );
                Err(e)
            }
        }
    }

    /// Detect categories in a decoded image.
    ///
    /// The result is normalized: lowercase labels, scores in `[0, 1]`, one
    /// entry per category, highest confidence first.
    pub async fn classify(&self, image: &DecodedImage) -> GateResult<Vec<Detection>> {
        let work = async {
            let model = self.ensure_loaded().await?;
            let start = Instant::now();
            let raw = model
                .detect(image)
                .await
                .map_err(|e| GateError::classification("Inference failed", e))?;

            tracing::debug!(
                raw_count = raw.len(),
                width = image.width(),
                height = image.height(),
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Inference completed"
            );

            Ok::<_, GateError>(normalize(raw))
        };

        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, work)
                .await
                .unwrap_or_else(|_| {
                    Err(GateError::Timeout {
                        operation: "classification",
                        after: limit,
                    })
                }),
            None => work.await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedModel(Vec<RawDetection>);

    #[async_trait]
    impl DetectionModel for FixedModel {
        async fn detect(&self, _image: &DecodedImage) -> anyhow::Result<Vec<RawDetection>> {
            Ok(self.0.clone())
        }
    }

    /// Fails the first `failures` loads, then succeeds.
    struct FlakyLoader {
        failures: usize,
        attempts: AtomicUsize,
    }

    #[async_trait]
    impl ModelLoader for FlakyLoader {
        fn name(&self) -> &str {
            "flaky"
        }

        async fn load(&self) -> anyhow::Result<Arc<dyn DetectionModel>> {
            let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
            if attempt < self.failures {
                anyhow::bail!("weights unavailable");
            }
            Ok(Arc::new(FixedModel(vec![
                RawDetection::new("Dog", 0.9),
                RawDetection::new("car", 0.4),
            ])))
        }
    }

    fn loader(failures: usize) -> Arc<FlakyLoader> {
        Arc::new(FlakyLoader {
            failures,
            attempts: AtomicUsize::new(0),
        })
    }

    fn tiny_image() -> DecodedImage {
        let img = image::DynamicImage::new_rgb8(2, 2);
        let mut buf = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        DecodedImage::from_encoded(buf.into()).unwrap()
    }

    #[tokio::test]
    async fn warm_and_classify_share_one_load() {
        let loader = loader(0);
        let classifier = ContentClassifier::new(loader.clone());

        classifier.warm().await.unwrap();
        assert!(classifier.is_loaded());
        classifier.classify(&tiny_image()).await.unwrap();
        classifier.classify(&tiny_image()).await.unwrap();

        assert_eq!(loader.attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_warm_up_is_retried_lazily() {
        let loader = loader(1);
        let classifier = ContentClassifier::new(loader.clone());

        assert!(classifier.warm().await.is_err());
        assert!(!classifier.is_loaded());

        let detections = classifier.classify(&tiny_image()).await.unwrap();
        assert_eq!(detections[0], Detection::new("dog", 0.9));
        assert_eq!(loader.attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn load_failure_is_a_classification_error() {
        let classifier = ContentClassifier::new(loader(usize::MAX));
        let err = classifier.classify(&tiny_image()).await.unwrap_err();
        assert!(err.is_classification());
    }
}
