#![allow(dead_code)]

use std::{io::Cursor, path::PathBuf};

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

pub fn solid_image(width: u32, height: u32, color: [u8; 4]) -> DynamicImage {
    let pixel = Rgba(color);
    let buffer = RgbaImage::from_pixel(width, height, pixel);
    DynamicImage::ImageRgba8(buffer)
}

/// Opaque image with a distinct colour per pixel.
pub fn textured_image(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x * 7 % 256) as u8, (y * 11 % 256) as u8, ((x + y) * 3 % 256) as u8, 255])
    })
}

/// Solid background with a black "watermark" block.
pub fn watermarked_image(width: u32, height: u32, mark: (u32, u32, u32, u32)) -> RgbaImage {
    let (mx, my, mw, mh) = mark;
    RgbaImage::from_fn(width, height, |x, y| {
        if x >= mx && x < mx + mw && y >= my && y < my + mh {
            Rgba([0, 0, 0, 255])
        } else {
            Rgba([200, 100, 50, 255])
        }
    })
}

pub fn encode(image: &DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), format)
        .expect("failed to encode test image");
    bytes
}

pub fn png_bytes(image: &RgbaImage) -> Vec<u8> {
    encode(&DynamicImage::ImageRgba8(image.clone()), ImageFormat::Png)
}

pub fn write_image(path: impl Into<PathBuf>, image: &DynamicImage) {
    image
        .save(path.into())
        .expect("failed to write image to disk");
}
