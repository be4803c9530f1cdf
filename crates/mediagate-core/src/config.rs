//! Configuration module
//!
//! Storage target, detector settings and bounded waits are read from the
//! process environment (a `.env` file is honoured). Storage settings are kept
//! optional here: a missing bucket is reported by the storage layer on first
//! upload, not at startup.

use std::collections::HashMap;
use std::env;
use std::time::Duration;

use anyhow::{anyhow, Result};

use crate::constants::BYTES_PER_MB;
use crate::storage_types::StorageBackend;

const MAX_IMAGE_SIZE_MB: usize = 10;
const MAX_DOCUMENT_SIZE_MB: usize = 50;
const DETECTION_REGION: &str = "us-east-1";
const DETECTION_MIN_CONFIDENCE: f32 = 50.0;
const DETECTION_MAX_LABELS: i32 = 50;
const DETECTION_TIMEOUT_SECS: u64 = 30;
const STORAGE_TIMEOUT_SECS: u64 = 60;

#[derive(Clone, Debug)]
pub struct GateConfig {
    pub environment: String,
    // Storage configuration
    pub storage_backend: StorageBackend,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO, etc.)
    pub aws_region: Option<String>,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    // Size limits per media family
    pub max_image_size_bytes: usize,
    pub max_document_size_bytes: usize,
    // Detection collaborator
    pub detection_region: String,
    pub detection_min_confidence: f32,
    pub detection_max_labels: i32,
    pub warm_model_on_startup: bool,
    // Bounded waits; `None` waits forever
    pub detection_timeout: Option<Duration>,
    pub storage_timeout: Option<Duration>,
    pub notify_on_storage_failure: bool,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            storage_backend: StorageBackend::S3,
            s3_bucket: None,
            s3_region: None,
            s3_endpoint: None,
            aws_region: None,
            local_storage_path: None,
            local_storage_base_url: None,
            max_image_size_bytes: MAX_IMAGE_SIZE_MB * BYTES_PER_MB,
            max_document_size_bytes: MAX_DOCUMENT_SIZE_MB * BYTES_PER_MB,
            detection_region: DETECTION_REGION.to_string(),
            detection_min_confidence: DETECTION_MIN_CONFIDENCE,
            detection_max_labels: DETECTION_MAX_LABELS,
            warm_model_on_startup: true,
            detection_timeout: Some(Duration::from_secs(DETECTION_TIMEOUT_SECS)),
            storage_timeout: Some(Duration::from_secs(STORAGE_TIMEOUT_SECS)),
            notify_on_storage_failure: true,
        }
    }
}

impl GateConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(env::vars())
    }

    /// Build configuration from explicit key/value pairs.
    pub fn from_vars<I>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let vars: HashMap<String, String> = vars
            .into_iter()
            .filter(|(_, v)| !v.trim().is_empty())
            .collect();
        let get = |key: &str| vars.get(key).map(|v| v.trim().to_string());

        let environment = get("ENVIRONMENT")
            .or_else(|| get("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let storage_backend = match get("STORAGE_BACKEND") {
            Some(raw) => raw.parse()?,
            None => StorageBackend::S3,
        };

        let aws_region = get("AWS_REGION");

        let max_image_size_mb: usize = parse_or(&get, "MAX_IMAGE_SIZE_MB", MAX_IMAGE_SIZE_MB)?;
        let max_document_size_mb: usize =
            parse_or(&get, "MAX_DOCUMENT_SIZE_MB", MAX_DOCUMENT_SIZE_MB)?;

        let detection_min_confidence: f32 =
            parse_or(&get, "DETECTION_MIN_CONFIDENCE", DETECTION_MIN_CONFIDENCE)?;
        if !(0.0..=100.0).contains(&detection_min_confidence) {
            return Err(anyhow!(
                "DETECTION_MIN_CONFIDENCE must be between 0 and 100, got {}",
                detection_min_confidence
            ));
        }

        let config = GateConfig {
            environment,
            storage_backend,
            s3_bucket: get("S3_BUCKET"),
            s3_region: get("S3_REGION"),
            s3_endpoint: get("S3_ENDPOINT"),
            detection_region: get("DETECTION_REGION")
                .or_else(|| aws_region.clone())
                .unwrap_or_else(|| DETECTION_REGION.to_string()),
            aws_region,
            local_storage_path: get("LOCAL_STORAGE_PATH"),
            local_storage_base_url: get("LOCAL_STORAGE_BASE_URL"),
            max_image_size_bytes: max_image_size_mb * BYTES_PER_MB,
            max_document_size_bytes: max_document_size_mb * BYTES_PER_MB,
            detection_min_confidence,
            detection_max_labels: parse_or(&get, "DETECTION_MAX_LABELS", DETECTION_MAX_LABELS)?,
            warm_model_on_startup: get("WARM_MODEL_ON_STARTUP")
                .map(|v| parse_flag(&v))
                .unwrap_or(true),
            detection_timeout: timeout_secs(
                parse_or(&get, "DETECTION_TIMEOUT_SECS", DETECTION_TIMEOUT_SECS)?,
            ),
            storage_timeout: timeout_secs(
                parse_or(&get, "STORAGE_TIMEOUT_SECS", STORAGE_TIMEOUT_SECS)?,
            ),
            notify_on_storage_failure: get("NOTIFY_ON_STORAGE_FAILURE")
                .map(|v| parse_flag(&v))
                .unwrap_or(true),
        };

        Ok(config)
    }

    /// Region for the S3 backend, falling back to `AWS_REGION`.
    pub fn s3_region(&self) -> Option<&str> {
        self.s3_region.as_deref().or(self.aws_region.as_deref())
    }
}

fn parse_or<T, F>(get: &F, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .parse()
            .map_err(|_| anyhow!("{} must be a valid number, got '{}'", key, raw)),
        None => Ok(default),
    }
}

fn parse_flag(raw: &str) -> bool {
    matches!(raw.to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

fn timeout_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}
