//! Explicit image decode step: data URL in, pixel-addressable image out.

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;

use bytes::Bytes;
use image::{DynamicImage, ImageFormat};
use mediagate_core::{DecodedContent, GateError, GateResult};

/// An image whose dimensions are resolved and pixels decoded, ready to be
/// handed to a detection model.
#[derive(Clone)]
pub struct DecodedImage {
    width: u32,
    height: u32,
    format: Option<ImageFormat>,
    pixels: Arc<DynamicImage>,
    encoded: Bytes,
}

impl DecodedImage {
    /// Decode encoded image bytes synchronously.
    pub fn from_encoded(encoded: Bytes) -> GateResult<Self> {
        let format = image::guess_format(&encoded).ok();
        let pixels =
            image::load_from_memory(&encoded).map_err(|e| GateError::ImageDecode(e.to_string()))?;

        if pixels.width() == 0 || pixels.height() == 0 {
            return Err(GateError::ImageDecode("image has no pixels".to_string()));
        }

        Ok(Self {
            width: pixels.width(),
            height: pixels.height(),
            format,
            pixels: Arc::new(pixels),
            encoded,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Container format sniffed from the encoded bytes.
    pub fn format(&self) -> Option<ImageFormat> {
        self.format
    }

    pub fn pixels(&self) -> &DynamicImage {
        &self.pixels
    }

    /// The original encoded bytes.
    pub fn encoded(&self) -> &Bytes {
        &self.encoded
    }
}

impl Debug for DecodedImage {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("DecodedImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("format", &self.format)
            .field("encoded_len", &self.encoded.len())
            .finish()
    }
}

/// Decode the image held by `content`, off the async executor.
pub async fn decode_image(content: &DecodedContent) -> GateResult<DecodedImage> {
    let encoded = content.materialize()?;
    let file_name = content.source().name.clone();

    let image = tokio::task::spawn_blocking(move || DecodedImage::from_encoded(encoded))
        .await
        .map_err(|e| GateError::ImageDecode(format!("decode task failed: {}", e)))??;

    tracing::debug!(
        file_name = %file_name,
        width = image.width(),
        height = image.height(),
        format = ?image.format(),
        "Image decoded"
    );

    Ok(image)
}
