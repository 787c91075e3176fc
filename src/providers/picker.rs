//! Image selection boundary.
//!
//! The native implementation opens a file dialog restricted to still
//! images. A dialog has no interactive crop, so the "editable" contract is
//! honored by applying a fixed center crop to the selected photo and
//! storing the cropped copy in the temp directory.

use crate::{CareVoiceError, Result};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, GenericImageView};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "webp"];

/// Options for a picking session.
#[derive(Clone, Debug)]
pub struct PickerOptions {
    /// Apply the fixed-aspect crop to the selection
    pub editable: bool,
    /// Crop aspect ratio, width to height
    pub aspect_ratio: (u32, u32),
    /// JPEG quality of the cropped copy, 0.0 to 1.0
    pub quality: f32,
}

impl Default for PickerOptions {
    fn default() -> Self {
        Self {
            editable: true,
            aspect_ratio: (4, 3),
            quality: 1.0,
        }
    }
}

/// Outcome of a picking session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PickOutcome {
    /// The user dismissed the dialog; prior state is kept
    Canceled,
    /// A photo was chosen (possibly the cropped copy)
    Selected(PathBuf),
}

/// Image selection backend.
pub trait ImagePicker {
    fn pick(&self, options: &PickerOptions) -> Result<PickOutcome>;
}

/// Native file dialog picker.
pub struct NativeImagePicker;

impl ImagePicker for NativeImagePicker {
    fn pick(&self, options: &PickerOptions) -> Result<PickOutcome> {
        let file = rfd::FileDialog::new()
            .set_title("Attach a photo")
            .add_filter("Images", IMAGE_EXTENSIONS)
            .pick_file();

        let Some(path) = file else {
            debug!("Image picking canceled");
            return Ok(PickOutcome::Canceled);
        };

        if options.editable {
            let cropped = crop_to_aspect(&path, options)?;
            Ok(PickOutcome::Selected(cropped))
        } else {
            Ok(PickOutcome::Selected(path))
        }
    }
}

/// Center-crop the photo to the configured aspect ratio and write a JPEG
/// copy to the temp directory.
fn crop_to_aspect(path: &Path, options: &PickerOptions) -> Result<PathBuf> {
    let img = image::open(path).map_err(|e| CareVoiceError::Picker(e.to_string()))?;
    let (w, h) = img.dimensions();
    let (x, y, tw, th) = crop_rect(w, h, options.aspect_ratio);

    let cropped = img.crop_imm(x, y, tw, th);

    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("photo");
    let out = std::env::temp_dir().join(format!(
        "{}-{}x{}.jpg",
        stem, options.aspect_ratio.0, options.aspect_ratio.1
    ));

    let quality = (options.quality.clamp(0.0, 1.0) * 100.0) as u8;
    let writer = BufWriter::new(File::create(&out)?);
    let encoder = JpegEncoder::new_with_quality(writer, quality.max(1));
    DynamicImage::ImageRgb8(cropped.to_rgb8())
        .write_with_encoder(encoder)
        .map_err(|e| CareVoiceError::Picker(e.to_string()))?;

    info!("Cropped {}x{} photo to {}x{} at {:?}", w, h, tw, th, out);
    Ok(out)
}

/// Largest centered rectangle of the given aspect ratio that fits in a
/// `w` by `h` image. Returns `(x, y, width, height)`.
fn crop_rect(w: u32, h: u32, (aw, ah): (u32, u32)) -> (u32, u32, u32, u32) {
    let target = aw as f64 / ah as f64;
    let current = w as f64 / h as f64;

    let (tw, th) = if current > target {
        (((h as f64) * target).round() as u32, h)
    } else {
        (w, ((w as f64) / target).round() as u32)
    };
    let (tw, th) = (tw.clamp(1, w), th.clamp(1, h));

    ((w - tw) / 2, (h - th) / 2, tw, th)
}
