//! AWS Rekognition label detection backend

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::io::Cursor;
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_rekognition::primitives::Blob;
use aws_sdk_rekognition::types::Image;
use aws_sdk_rekognition::Client as RekognitionClient;
use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat};
use mediagate_core::GateConfig;
use mediagate_processing::{DecodedImage, DetectionModel, ModelLoader, RawDetection};

/// Rekognition accepts at most 5 MB of inline image bytes.
const MAX_INLINE_IMAGE_BYTES: usize = 5 * 1024 * 1024;
const JPEG_QUALITY: u8 = 85;
/// Each shrink pass scales both edges by this factor.
const DOWNSCALE_FACTOR: f32 = 0.75;
/// Below this longest edge labels are no longer meaningful.
const MIN_EDGE_PX: u32 = 64;

#[derive(Debug, Clone, PartialEq)]
pub struct RekognitionConfig {
    /// AWS region (e.g., "us-east-1")
    pub region: String,
    /// Minimum confidence threshold (0-100)
    pub min_confidence: f32,
    pub max_labels: i32,
}

impl RekognitionConfig {
    pub fn from_gate_config(config: &GateConfig) -> Self {
        Self {
            region: config.detection_region.clone(),
            min_confidence: config.detection_min_confidence,
            max_labels: config.detection_max_labels,
        }
    }
}

/// Builds a Rekognition client once; the classifier caches the result.
pub struct RekognitionLoader {
    config: RekognitionConfig,
}

impl RekognitionLoader {
    pub fn new(config: RekognitionConfig) -> Self {
        Self { config }
    }
}

impl Debug for RekognitionLoader {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("RekognitionLoader")
            .field("region", &self.config.region)
            .finish()
    }
}

#[async_trait]
impl ModelLoader for RekognitionLoader {
    fn name(&self) -> &str {
        "aws-rekognition"
    }

    async fn load(&self) -> Result<Arc<dyn DetectionModel>> {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(aws_config::Region::new(self.config.region.clone()))
            .load()
            .await;

        if sdk_config.credentials_provider().is_none() {
            anyhow::bail!("No AWS credentials provider available for Rekognition");
        }

        tracing::info!(region = %self.config.region, "AWS Rekognition client ready");

        Ok(Arc::new(RekognitionDetector {
            client: RekognitionClient::new(&sdk_config),
            config: self.config.clone(),
        }))
    }
}

pub struct RekognitionDetector {
    client: RekognitionClient,
    config: RekognitionConfig,
}

impl Debug for RekognitionDetector {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("RekognitionDetector")
            .field("config", &self.config)
            .finish()
    }
}

#[async_trait]
impl DetectionModel for RekognitionDetector {
    async fn detect(&self, image: &DecodedImage) -> Result<Vec<RawDetection>> {
        let payload = rekognition_payload(image)?;

        tracing::debug!(
            image_size = payload.len(),
            min_confidence = self.config.min_confidence,
            "Sending image to AWS Rekognition"
        );

        let rekognition_image = Image::builder().bytes(Blob::new(payload.to_vec())).build();

        let response = self
            .client
            .detect_labels()
            .image(rekognition_image)
            .min_confidence(self.config.min_confidence)
            .max_labels(self.config.max_labels)
            .send()
            .await
            .context("Failed to detect labels")?;

        Ok(response
            .labels()
            .iter()
            .filter_map(|label| {
                let name = label.name()?;
                // Rekognition reports percentages.
                let score = label.confidence().unwrap_or(0.0) / 100.0;
                Some(RawDetection::new(name, score))
            })
            .collect())
    }
}

/// Bytes to send to Rekognition.
///
/// JPEG and PNG pass through untouched and anything else is re-encoded as
/// PNG. A payload over the inline limit is re-encoded as JPEG and downscaled
/// until it fits.
pub fn rekognition_payload(image: &DecodedImage) -> Result<Bytes> {
    fit_payload(image, MAX_INLINE_IMAGE_BYTES)
}

fn fit_payload(image: &DecodedImage, max_bytes: usize) -> Result<Bytes> {
    let payload = match image.format() {
        Some(ImageFormat::Jpeg) | Some(ImageFormat::Png) => image.encoded().clone(),
        other => {
            tracing::debug!(format = ?other, "Re-encoding image as PNG for Rekognition");
            let mut buf = Vec::new();
            image
                .pixels()
                .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
                .context("Failed to re-encode image as PNG")?;
            Bytes::from(buf)
        }
    };
    if payload.len() <= max_bytes {
        return Ok(payload);
    }

    let original_size = payload.len();
    let mut scaled = DynamicImage::ImageRgb8(image.pixels().to_rgb8());
    loop {
        let jpeg = encode_jpeg(&scaled)?;
        if jpeg.len() <= max_bytes {
            tracing::debug!(
                original_size,
                image_size = jpeg.len(),
                width = scaled.width(),
                height = scaled.height(),
                "Shrunk image to fit the Rekognition payload limit"
            );
            return Ok(jpeg);
        }

        let (width, height) = (scaled.width(), scaled.height());
        if width.max(height) <= MIN_EDGE_PX {
            anyhow::bail!(
                "Image cannot be shrunk below {} bytes for Rekognition",
                max_bytes
            );
        }
        let next_width = ((width as f32 * DOWNSCALE_FACTOR) as u32).max(1);
        let next_height = ((height as f32 * DOWNSCALE_FACTOR) as u32).max(1);
        scaled = scaled.thumbnail(next_width, next_height);
    }
}

fn encode_jpeg(image: &DynamicImage) -> Result<Bytes> {
    let mut buf = Vec::new();
    image
        .write_with_encoder(JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY))
        .context("Failed to encode image as JPEG")?;
    Ok(Bytes::from(buf))
}
