use eframe::egui;
use fast_image_resize::images::Image;
use fast_image_resize::{PixelType, ResizeOptions, Resizer};
use image::{DynamicImage, RgbaImage};

use crate::error::{EditorError, Result};

/// Cap used by `--downscale`. Buffers keep their natural size unless a cap is configured.
pub const DOWNSCALE_CAP: (u32, u32) = (3840, 2160);

/// Matte used when resolving transparent pixels to opaque.
pub const MATTE: [u8; 3] = [255, 255, 255];

pub fn to_color_image(img: &RgbaImage) -> egui::ColorImage {
    let size = [img.width() as usize, img.height() as usize];
    egui::ColorImage::from_rgba_unmultiplied(size, img.as_raw())
}

/// Converts to RGBA8 with every pixel opaque, compositing over [`MATTE`].
pub fn flatten_alpha(image: DynamicImage) -> RgbaImage {
    let mut rgba = image.into_rgba8();
    for pixel in rgba.pixels_mut() {
        let alpha = u32::from(pixel.0[3]);
        if alpha == 255 {
            continue;
        }
        for (channel, matte) in pixel.0.iter_mut().take(3).zip(MATTE) {
            let blended = u32::from(*channel) * alpha + u32::from(matte) * (255 - alpha);
            *channel = ((blended + 127) / 255) as u8;
        }
        pixel.0[3] = 255;
    }
    rgba
}

/// Target size for `width` x `height` so it fits inside `cap`, or `None`
/// when it already fits.
pub fn capped_size(width: u32, height: u32, cap: (u32, u32)) -> Option<(u32, u32)> {
    let (max_w, max_h) = (cap.0.max(1), cap.1.max(1));
    if width <= max_w && height <= max_h {
        return None;
    }
    let ratio = width as f64 / height.max(1) as f64;
    let (new_w, new_h) = if ratio > max_w as f64 / max_h as f64 {
        (max_w, (max_w as f64 / ratio) as u32)
    } else {
        ((max_h as f64 * ratio) as u32, max_h)
    };
    Some((new_w.max(1), new_h.max(1)))
}

/// Downscales buffers larger than `cap` with `fast_image_resize`; small ones pass through.
pub fn downscale_to_cap(image: RgbaImage, cap: (u32, u32)) -> Result<RgbaImage> {
    let Some((new_w, new_h)) = capped_size(image.width(), image.height(), cap) else {
        return Ok(image);
    };
    let (width, height) = image.dimensions();
    let src_image = Image::from_vec_u8(width, height, image.into_raw(), PixelType::U8x4)
        .map_err(|err| EditorError::Resize(err.to_string()))?;
    let mut dst_image = Image::new(new_w, new_h, PixelType::U8x4);
    let mut resizer = Resizer::new();
    resizer
        .resize(&src_image, &mut dst_image, &ResizeOptions::default())
        .map_err(|err| EditorError::Resize(err.to_string()))?;

    log::debug!("downscaled {width}x{height} to {new_w}x{new_h}");
    RgbaImage::from_raw(new_w, new_h, dst_image.into_vec())
        .ok_or_else(|| EditorError::Resize("resized buffer has the wrong length".into()))
}
