use std::{io::Cursor, sync::Arc};

use image::{codecs::png::PngEncoder, DynamicImage, ImageFormat, RgbImage, RgbaImage};
use zune_jpeg::JpegDecoder;

use crate::{
    error::{EditorError, Result},
    image_utils::{downscale_to_cap, flatten_alpha},
};

pub const DEFAULT_EXPORT_NAME: &str = "watermark-removed.png";

/// Decodes `bytes` into an opaque RGBA buffer ready for editing.
///
/// The buffer keeps the image's natural resolution unless `max_size` is
/// given, in which case larger images are downscaled to fit inside it.
pub fn decode_image(bytes: &[u8], max_size: Option<(u32, u32)>) -> Result<RgbaImage> {
    let decoded = if matches!(image::guess_format(bytes), Ok(ImageFormat::Jpeg)) {
        decode_jpeg(bytes).map_or_else(|| image::load_from_memory(bytes), Ok)
    } else {
        image::load_from_memory(bytes)
    }
    .map_err(EditorError::Decode)?;

    let image = flatten_alpha(decoded);
    match max_size {
        Some(cap) => downscale_to_cap(image, cap),
        None => Ok(image),
    }
}

// zune-jpeg is considerably faster than the `image` JPEG path. Anything it
// cannot hand back as RGB (grayscale, CMYK, corrupt data) goes to `image`.
fn decode_jpeg(bytes: &[u8]) -> Option<DynamicImage> {
    let mut decoder = JpegDecoder::new(Cursor::new(bytes));
    let pixels = match decoder.decode() {
        Ok(pixels) => pixels,
        Err(err) => {
            log::debug!("zune-jpeg failed, falling back to image: {err:?}");
            return None;
        }
    };
    let info = decoder.info()?;
    RgbImage::from_raw(info.width as u32, info.height as u32, pixels).map(DynamicImage::ImageRgb8)
}

/// Encodes `image` as PNG. Pure: the buffer is not touched.
pub fn export_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    image
        .write_with_encoder(PngEncoder::new(&mut bytes))
        .map_err(EditorError::Encode)?;
    Ok(bytes)
}

/// The pristine original and the current edit of one loaded image.
///
/// Both sides are shared snapshots: an edit swaps `current` for a new
/// allocation, so readers holding the previous `Arc` keep a stable view.
#[derive(Clone, Debug)]
pub struct ImageStore {
    original: Arc<RgbaImage>,
    current: Arc<RgbaImage>,
}

impl ImageStore {
    pub fn new(image: RgbaImage) -> Self {
        let original = Arc::new(image);
        Self {
            current: Arc::clone(&original),
            original,
        }
    }

    pub fn original(&self) -> &Arc<RgbaImage> {
        &self.original
    }

    pub fn current(&self) -> &Arc<RgbaImage> {
        &self.current
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.current.dimensions()
    }

    pub fn is_edited(&self) -> bool {
        !Arc::ptr_eq(&self.original, &self.current)
    }

    /// Replaces the current image; the previous one is dropped.
    pub fn commit_edit(&mut self, image: RgbaImage) {
        self.current = Arc::new(image);
    }

    pub fn reset_to_original(&mut self) {
        self.current = Arc::clone(&self.original);
    }

    pub fn export_current(&self) -> Result<Vec<u8>> {
        export_png(&self.current)
    }
}
