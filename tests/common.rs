#![allow(dead_code)]

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A noisy gradient so encoders have real work to do.
pub fn sample_image(width: u32, height: u32) -> DynamicImage {
    let img = RgbImage::from_fn(width, height, |x, y| {
        let noise = (x.wrapping_mul(31) ^ y.wrapping_mul(17)) % 64;
        Rgb([
            ((x * 255 / width.max(1)) as u8).wrapping_add(noise as u8),
            ((y * 255 / height.max(1)) as u8).wrapping_add(noise as u8),
            (noise * 3) as u8,
        ])
    });
    DynamicImage::ImageRgb8(img)
}

pub fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    sample_image(width, height)
        .save_with_format(&path, ImageFormat::Png)
        .unwrap();
    path
}

/// JPEG saved at maximum quality, so re-encoding has room to shrink it.
pub fn write_jpeg(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    let file = File::create(&path).unwrap();
    let encoder = JpegEncoder::new_with_quality(file, 100);
    sample_image(width, height)
        .to_rgb8()
        .write_with_encoder(encoder)
        .unwrap();
    path
}

pub fn write_webp(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    sample_image(width, height)
        .save_with_format(&path, ImageFormat::WebP)
        .unwrap();
    path
}

pub fn write_corrupt(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    File::create(&path)
        .unwrap()
        .write_all(b"fake image data")
        .unwrap();
    path
}

pub fn write_text(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    File::create(&path)
        .unwrap()
        .write_all(b"not an image")
        .unwrap();
    path
}

/// Two PNGs and a JPEG at the top level, a WebP and a text file one level
/// down, and a README at the top.
pub fn create_mixed_tree(root: &Path) -> (Vec<PathBuf>, Vec<PathBuf>) {
    let subdir = root.join("subdir");
    fs::create_dir(&subdir).unwrap();

    let images = vec![
        write_png(root, "one.png", 120, 80),
        write_png(root, "two.PNG", 64, 64),
        write_jpeg(root, "three.jpg", 200, 100),
        write_webp(&subdir, "four.webp", 90, 60),
    ];
    let others = vec![write_text(root, "README.md"), write_text(&subdir, "notes.txt")];

    (images, others)
}

pub fn create_temp_directory() -> TempDir {
    TempDir::new().unwrap()
}

pub fn dimensions(path: &Path) -> (u32, u32) {
    image::image_dimensions(path).unwrap()
}

pub fn file_size(path: &Path) -> u64 {
    fs::metadata(path).unwrap().len()
}
