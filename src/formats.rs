//! Image format utilities and type-safe format handling
//!
//! Classifies files by extension and maps between the CLI's format names,
//! file extensions and the image crate's `ImageFormat`.

use crate::constants::SUPPORTED_IMAGE_EXTENSIONS;
use clap::ValueEnum;
use image::ImageFormat;
use std::fmt;
use std::path::{Path, PathBuf};

/// Formats the optimizer reads and writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum ImageFormatKind {
    /// Lossy WebP (quality 85)
    #[value(name = "webp")]
    WebP,
    /// PNG, post-processed with oxipng
    #[value(name = "png")]
    Png,
    /// Baseline JPEG
    #[value(name = "jpg", alias = "jpeg")]
    Jpeg,
}

impl ImageFormatKind {
    /// Classifies an extension, case-insensitively. Returns `None` for anything
    /// outside webp/png/jpg/jpeg.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_lowercase().as_str() {
            "jpg" | "jpeg" => Some(ImageFormatKind::Jpeg),
            "png" => Some(ImageFormatKind::Png),
            "webp" => Some(ImageFormatKind::WebP),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Canonical extension written when converting to this format
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormatKind::Jpeg => "jpg",
            ImageFormatKind::Png => "png",
            ImageFormatKind::WebP => "webp",
        }
    }

    pub fn to_image_format(&self) -> ImageFormat {
        match self {
            ImageFormatKind::Jpeg => ImageFormat::Jpeg,
            ImageFormatKind::Png => ImageFormat::Png,
            ImageFormatKind::WebP => ImageFormat::WebP,
        }
    }

    pub fn from_image_format(format: ImageFormat) -> Option<Self> {
        match format {
            ImageFormat::Jpeg => Some(ImageFormatKind::Jpeg),
            ImageFormat::Png => Some(ImageFormatKind::Png),
            ImageFormat::WebP => Some(ImageFormatKind::WebP),
            _ => None,
        }
    }
}

impl fmt::Display for ImageFormatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ImageFormatKind::Jpeg => "JPEG",
            ImageFormatKind::Png => "PNG",
            ImageFormatKind::WebP => "WebP",
        };
        write!(f, "{}", name)
    }
}

pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| SUPPORTED_IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Where a file ends up once encoded as `target`.
///
/// The path is kept when the target matches the file's current extension
/// class, so `photo.jpeg` stays `photo.jpeg` under `-f jpg`.
pub fn output_path_for(input: &Path, target: ImageFormatKind) -> PathBuf {
    match ImageFormatKind::from_path(input) {
        Some(current) if current == target => input.to_path_buf(),
        _ => input.with_extension(target.extension()),
    }
}
