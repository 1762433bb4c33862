use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use image::{DynamicImage, imageops::FilterType};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Longest side an image keeps before it is shipped to the vision endpoint.
pub const MAX_SIDE: u32 = 1600;
/// JPEG quality used when re-encoding.
pub const JPEG_QUALITY: u8 = 82;

/// An encoded image carried as a `data:` URL, the shape the front-end hands
/// over and the vision endpoint accepts verbatim.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImagePayload(String);

impl ImagePayload {
    /// Wraps a data URL without inspecting it. Use [`ImagePayload::decode`]
    /// to prove the payload is a real image.
    pub fn new(data_url: impl Into<String>) -> Self {
        Self(data_url.into())
    }

    pub fn from_bytes(mime: &str, bytes: &[u8]) -> Self {
        Self(format!("data:{};base64,{}", mime, BASE64.encode(bytes)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Splits the payload into its mime type and raw bytes.
    pub fn parts(&self) -> Result<(String, Vec<u8>)> {
        let rest = self
            .0
            .strip_prefix("data:")
            .ok_or_else(|| AppError::Validation("not a data URL".into()))?;
        let (mime, encoded) = rest
            .split_once(";base64,")
            .ok_or_else(|| AppError::Validation("data URL is not base64 encoded".into()))?;
        let bytes = BASE64
            .decode(encoded)
            .map_err(|e| AppError::Validation(format!("invalid base64 payload: {e}")))?;
        Ok((mime.to_string(), bytes))
    }

    /// Decodes the payload into pixels, which doubles as format validation.
    pub fn decode(&self) -> Result<DynamicImage> {
        let (_, bytes) = self.parts()?;
        image::load_from_memory(&bytes)
            .map_err(|e| AppError::Validation(format!("not a decodable image: {e}")))
    }

    /// Re-encodes as a JPEG capped at [`MAX_SIDE`] on the longest side.
    /// Purely a size reduction before an upload; no semantic effect.
    pub fn compressed(&self) -> Result<ImagePayload> {
        let decoded = self.decode()?;
        let resized = if decoded.width() > MAX_SIDE || decoded.height() > MAX_SIDE {
            decoded.resize(MAX_SIDE, MAX_SIDE, FilterType::Lanczos3)
        } else {
            decoded
        };

        // JPEG has no alpha channel.
        let rgb = DynamicImage::ImageRgb8(resized.to_rgb8());
        let mut buffer = Vec::new();
        {
            let mut cursor = std::io::Cursor::new(&mut buffer);
            let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(
                &mut cursor,
                JPEG_QUALITY,
            );
            rgb.write_with_encoder(encoder)?;
        }
        Ok(Self::from_bytes("image/jpeg", &buffer))
    }
}
