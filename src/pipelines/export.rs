// SPDX-License-Identifier: GPL-3.0-only

//! Strip export
//!
//! Encodes the rendered strip to PNG (lossless) or JPEG and writes it under a
//! timestamped filename. Both stages run on blocking workers.

use super::StillImage;
use crate::config::{BoothConfig, ExportFormat};
use crate::constants::{QualityPreset, export};
use crate::errors::ExportError;
use chrono::{DateTime, Local};
use image::ImageFormat;
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

impl ExportFormat {
    /// File extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpeg => "jpg",
        }
    }

    fn image_format(&self) -> ImageFormat {
        match self {
            ExportFormat::Png => ImageFormat::Png,
            ExportFormat::Jpeg => ImageFormat::Jpeg,
        }
    }
}

/// Encoded strip ready for saving
#[derive(Debug, Clone)]
pub struct EncodedStrip {
    pub data: Vec<u8>,
    pub format: ExportFormat,
    pub width: u32,
    pub height: u32,
}

/// Strip encoder and writer
#[derive(Debug, Clone)]
pub struct StripExporter {
    format: ExportFormat,
    quality: QualityPreset,
}

impl StripExporter {
    pub fn new(format: ExportFormat, quality: QualityPreset) -> Self {
        Self { format, quality }
    }

    pub fn from_config(config: &BoothConfig) -> Self {
        Self::new(config.export_format, config.export_quality)
    }

    pub fn format(&self) -> ExportFormat {
        self.format
    }

    /// `photo-strip_<YYYYmmdd_HHMMSS>.<ext>`
    pub fn file_name(&self, at: DateTime<Local>) -> String {
        format!("{}.{}", Self::file_stem(at), self.format.extension())
    }

    fn file_stem(at: DateTime<Local>) -> String {
        format!("{}_{}", export::FILE_PREFIX, at.format("%Y%m%d_%H%M%S"))
    }

    /// Encode synchronously
    pub fn encode_blocking(&self, strip: &StillImage) -> Result<EncodedStrip, ExportError> {
        let (width, height) = strip.dimensions();
        let data = match self.format {
            ExportFormat::Png => Self::encode_png(strip)?,
            ExportFormat::Jpeg => Self::encode_jpeg(strip, self.quality)?,
        };
        debug!(size = data.len(), format = ?self.format, "Encoding complete");
        Ok(EncodedStrip {
            data,
            format: self.format,
            width,
            height,
        })
    }

    /// Encode on a blocking worker
    pub async fn encode(&self, strip: StillImage) -> Result<EncodedStrip, ExportError> {
        info!(
            width = strip.width(),
            height = strip.height(),
            format = ?self.format,
            "Starting encoding"
        );

        let exporter = self.clone();
        tokio::task::spawn_blocking(move || exporter.encode_blocking(&strip))
            .await
            .map_err(|e| ExportError::EncodingFailed(format!("Encoding task error: {}", e)))?
    }

    /// Write the encoded strip into `output_dir` under a timestamped name
    ///
    /// Creates the directory if needed. Existing files are never replaced; a
    /// second export within the same second gets a numeric suffix.
    pub async fn save(
        &self,
        encoded: EncodedStrip,
        output_dir: PathBuf,
    ) -> Result<PathBuf, ExportError> {
        self.save_at(encoded, output_dir, Local::now()).await
    }

    /// [`save`](Self::save) with an explicit timestamp
    pub async fn save_at(
        &self,
        encoded: EncodedStrip,
        output_dir: PathBuf,
        at: DateTime<Local>,
    ) -> Result<PathBuf, ExportError> {
        let stem = Self::file_stem(at);
        let extension = encoded.format.extension();
        info!(dir = %output_dir.display(), stem = %stem, "Saving strip");

        let filepath = tokio::task::spawn_blocking(move || {
            write_unique(&output_dir, &stem, extension, &encoded.data)
        })
        .await
        .map_err(|e| ExportError::SaveFailed(format!("Save task error: {}", e)))??;

        info!(path = %filepath.display(), "Strip saved successfully");
        Ok(filepath)
    }

    /// Encode then save
    pub async fn export(
        &self,
        strip: StillImage,
        output_dir: PathBuf,
    ) -> Result<PathBuf, ExportError> {
        let encoded = self.encode(strip).await?;
        self.save(encoded, output_dir).await
    }

    fn encode_jpeg(strip: &StillImage, quality: QualityPreset) -> Result<Vec<u8>, ExportError> {
        let mut buffer = Vec::new();
        let mut cursor = std::io::Cursor::new(&mut buffer);

        // JPEG carries no alpha
        let rgb = image::DynamicImage::ImageRgba8(strip.clone()).into_rgb8();
        let mut encoder =
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut cursor, quality.jpeg_quality());
        encoder
            .encode(
                rgb.as_raw(),
                rgb.width(),
                rgb.height(),
                image::ExtendedColorType::Rgb8,
            )
            .map_err(|e| ExportError::EncodingFailed(format!("JPEG encoding failed: {}", e)))?;

        Ok(buffer)
    }

    fn encode_png(strip: &StillImage) -> Result<Vec<u8>, ExportError> {
        let mut buffer = Vec::new();
        strip
            .write_to(
                &mut std::io::Cursor::new(&mut buffer),
                ExportFormat::Png.image_format(),
            )
            .map_err(|e| ExportError::EncodingFailed(format!("PNG encoding failed: {}", e)))?;
        Ok(buffer)
    }
}

impl Default for StripExporter {
    fn default() -> Self {
        Self::new(ExportFormat::default(), QualityPreset::default())
    }
}

/// Create `<stem>.<ext>`, or `<stem>-2.<ext>`, `<stem>-3.<ext>`... if taken
fn write_unique(
    dir: &Path,
    stem: &str,
    extension: &str,
    data: &[u8],
) -> Result<PathBuf, ExportError> {
    std::fs::create_dir_all(dir)?;

    for attempt in 1..=export::MAX_NAME_ATTEMPTS {
        let name = if attempt == 1 {
            format!("{}.{}", stem, extension)
        } else {
            format!("{}-{}.{}", stem, attempt, extension)
        };
        let path = dir.join(name);

        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(mut file) => {
                file.write_all(data)?;
                return Ok(path);
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                debug!(path = %path.display(), "Name taken");
            }
            Err(e) => return Err(e.into()),
        }
    }

    Err(ExportError::SaveFailed(format!(
        "no free file name for {} after {} attempts",
        stem,
        export::MAX_NAME_ATTEMPTS
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use image::Rgba;

    fn checker() -> StillImage {
        StillImage::from_fn(8, 4, |x, y| {
            if (x + y) % 2 == 0 {
                Rgba([255, 255, 255, 255])
            } else {
                Rgba([0, 0, 0, 255])
            }
        })
    }

    #[test]
    fn test_file_name_format() {
        let at = Local.with_ymd_and_hms(2024, 6, 1, 14, 5, 9).unwrap();
        let png = StripExporter::default();
        assert_eq!(png.file_name(at), "photo-strip_20240601_140509.png");
        let jpeg = StripExporter::new(ExportFormat::Jpeg, QualityPreset::Low);
        assert_eq!(jpeg.file_name(at), "photo-strip_20240601_140509.jpg");
    }

    #[test]
    fn test_png_is_lossless() {
        let strip = checker();
        let encoded = StripExporter::default().encode_blocking(&strip).unwrap();
        let decoded = image::load_from_memory(&encoded.data).unwrap().to_rgba8();
        assert_eq!(decoded, strip);
    }

    #[test]
    fn test_jpeg_has_magic_bytes() {
        let exporter = StripExporter::new(ExportFormat::Jpeg, QualityPreset::High);
        let encoded = exporter.encode_blocking(&checker()).unwrap();
        assert_eq!(&encoded.data[..2], &[0xff, 0xd8]);
        assert_eq!((encoded.width, encoded.height), (8, 4));
    }

    #[tokio::test]
    async fn test_same_second_exports_keep_both() {
        let dir = std::env::temp_dir().join(format!("photobooth-export-{}", uuid::Uuid::new_v4()));
        let exporter = StripExporter::default();
        let at = Local.with_ymd_and_hms(2024, 6, 1, 14, 5, 9).unwrap();

        let first = exporter.encode_blocking(&checker()).unwrap();
        let second = exporter
            .encode_blocking(&StillImage::from_pixel(8, 4, Rgba([9, 9, 9, 255])))
            .unwrap();
        let second_data = second.data.clone();

        let a = exporter.save_at(first, dir.clone(), at).await.unwrap();
        let b = exporter.save_at(second, dir.clone(), at).await.unwrap();

        assert_eq!(a.file_name().unwrap(), "photo-strip_20240601_140509.png");
        assert_eq!(b.file_name().unwrap(), "photo-strip_20240601_140509-2.png");
        // The first strip was not overwritten
        assert_ne!(std::fs::read(&a).unwrap(), second_data);
        assert_eq!(std::fs::read(&b).unwrap(), second_data);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_export_writes_file() {
        let dir = std::env::temp_dir().join(format!("photobooth-export-{}", uuid::Uuid::new_v4()));
        let path = StripExporter::default()
            .export(checker(), dir.clone())
            .await
            .unwrap();
        assert!(path.starts_with(&dir));
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("png"));
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
