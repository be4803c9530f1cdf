//! In-memory collaborators and fixtures shared by the pipeline tests.

#![allow(dead_code)]

use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use image::{ImageFormat, RgbImage};
use mediagate_core::{PipelineState, SelectedFile};
use mediagate_processing::{
    ConfirmationPrompt, ContentClassifier, DecodedImage, DetectionModel, ModelLoader, Notice,
    Notifier, PipelineController, PipelineLimits, PromptRequest, PromptResponse, RawDetection,
    UploadOrchestrator,
};
use mediagate_storage::{Storage, StorageBackend, StorageError, StorageResult, StoredObject};
use tokio::sync::watch;

/// Model returning a fixed label set, optionally slowly or with an error.
pub struct MockModel {
    labels: Vec<RawDetection>,
    delay: Option<Duration>,
    fail: bool,
    pub calls: AtomicUsize,
}

#[async_trait]
impl DetectionModel for MockModel {
    async fn detect(&self, _image: &DecodedImage) -> anyhow::Result<Vec<RawDetection>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            anyhow::bail!("inference backend unavailable");
        }
        Ok(self.labels.clone())
    }
}

pub struct MockLoader {
    pub model: Arc<MockModel>,
    pub loads: AtomicUsize,
}

impl MockLoader {
    pub fn detect_calls(&self) -> usize {
        self.model.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ModelLoader for MockLoader {
    fn name(&self) -> &str {
        "mock"
    }

    async fn load(&self) -> anyhow::Result<Arc<dyn DetectionModel>> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(self.model.clone())
    }
}

/// Answers every prompt the same way and records what was asked.
pub struct ScriptedPrompt {
    confirm: bool,
    pub requests: Mutex<Vec<PromptRequest>>,
    /// Busy flag seen while the prompt was open.
    pub busy_while_open: Mutex<Vec<bool>>,
    observer: Mutex<Option<watch::Receiver<PipelineState>>>,
}

impl ScriptedPrompt {
    pub fn new(confirm: bool) -> Self {
        Self {
            confirm,
            requests: Mutex::new(Vec::new()),
            busy_while_open: Mutex::new(Vec::new()),
            observer: Mutex::new(None),
        }
    }

    pub fn observe(&self, receiver: watch::Receiver<PipelineState>) {
        *self.observer.lock().unwrap() = Some(receiver);
    }

    pub fn count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ConfirmationPrompt for ScriptedPrompt {
    async fn prompt(&self, request: &PromptRequest) -> PromptResponse {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(rx) = self.observer.lock().unwrap().as_ref() {
            self.busy_while_open
                .lock()
                .unwrap()
                .push(rx.borrow().is_busy());
        }
        PromptResponse {
            confirmed: self.confirm,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RecordedPut {
    pub key: String,
    pub content_type: String,
    pub data: Bytes,
}

pub struct MockStorage {
    pub puts: Mutex<Vec<RecordedPut>>,
    fail: bool,
    delay: Option<Duration>,
}

impl MockStorage {
    pub fn new() -> Self {
        Self {
            puts: Mutex::new(Vec::new()),
            fail: false,
            delay: None,
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    pub fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::new()
        }
    }

    pub fn count(&self) -> usize {
        self.puts.lock().unwrap().len()
    }
}

impl Default for MockStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Storage for MockStorage {
    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> StorageResult<StoredObject> {
        self.puts.lock().unwrap().push(RecordedPut {
            key: key.to_string(),
            content_type: content_type.to_string(),
            data,
        });
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(StorageError::UploadFailed("503 Service Unavailable".to_string()));
        }
        Ok(StoredObject {
            key: key.to_string(),
            location: format!("memory://bucket/{}", key),
        })
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn titles(&self) -> Vec<String> {
        self.notices
            .lock()
            .unwrap()
            .iter()
            .map(|n| n.title.clone())
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }
}

pub fn png_bytes() -> Vec<u8> {
    let img = RgbImage::from_pixel(4, 3, image::Rgb([200, 120, 40]));
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .unwrap();
    buf
}

pub fn png_file() -> SelectedFile {
    SelectedFile::from_bytes("street.png", "image/png", png_bytes())
}

pub fn pdf_bytes() -> Vec<u8> {
    b"%PDF-1.4\n1 0 obj\n<< /Type /Catalog >>\nendobj\ntrailer\n<< /Root 1 0 R >>\n%%EOF\n"
        .to_vec()
}

pub fn pdf_file() -> SelectedFile {
    SelectedFile::from_bytes("invoice.pdf", "application/pdf", pdf_bytes())
}

/// A wired controller plus handles on every mock behind it.
pub struct Harness {
    pub controller: PipelineController,
    pub loader: Arc<MockLoader>,
    pub prompt: Arc<ScriptedPrompt>,
    pub storage: Arc<MockStorage>,
    pub notifier: Arc<RecordingNotifier>,
}

pub struct HarnessBuilder {
    labels: Vec<RawDetection>,
    model_delay: Option<Duration>,
    model_fails: bool,
    confirm: bool,
    storage: MockStorage,
    detection_timeout: Option<Duration>,
    storage_timeout: Option<Duration>,
    limits: PipelineLimits,
}

impl HarnessBuilder {
    pub fn new() -> Self {
        Self {
            labels: Vec::new(),
            model_delay: None,
            model_fails: false,
            confirm: true,
            storage: MockStorage::new(),
            detection_timeout: None,
            storage_timeout: None,
            limits: PipelineLimits::default(),
        }
    }

    pub fn labels(mut self, labels: &[(&str, f32)]) -> Self {
        self.labels = labels
            .iter()
            .map(|(class, score)| RawDetection::new(*class, *score))
            .collect();
        self
    }

    pub fn model_delay(mut self, delay: Duration) -> Self {
        self.model_delay = Some(delay);
        self
    }

    pub fn model_fails(mut self) -> Self {
        self.model_fails = true;
        self
    }

    pub fn decline(mut self) -> Self {
        self.confirm = false;
        self
    }

    pub fn storage(mut self, storage: MockStorage) -> Self {
        self.storage = storage;
        self
    }

    pub fn detection_timeout(mut self, timeout: Duration) -> Self {
        self.detection_timeout = Some(timeout);
        self
    }

    pub fn storage_timeout(mut self, timeout: Duration) -> Self {
        self.storage_timeout = Some(timeout);
        self
    }

    pub fn limits(mut self, limits: PipelineLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn build(self) -> Harness {
        let loader = Arc::new(MockLoader {
            model: Arc::new(MockModel {
                labels: self.labels,
                delay: self.model_delay,
                fail: self.model_fails,
                calls: AtomicUsize::new(0),
            }),
            loads: AtomicUsize::new(0),
        });
        let prompt = Arc::new(ScriptedPrompt::new(self.confirm));
        let storage = Arc::new(self.storage);
        let notifier = Arc::new(RecordingNotifier::default());

        let classifier = Arc::new(
            ContentClassifier::new(loader.clone()).with_timeout(self.detection_timeout),
        );
        let uploader = UploadOrchestrator::new(prompt.clone(), storage.clone(), notifier.clone())
            .with_storage_timeout(self.storage_timeout);
        let controller = PipelineController::new(classifier, uploader, notifier.clone())
            .with_limits(self.limits);
        prompt.observe(controller.subscribe());

        Harness {
            controller,
            loader,
            prompt,
            storage,
            notifier,
        }
    }
}

impl Default for HarnessBuilder {
    fn default() -> Self {
        Self::new()
    }
}
