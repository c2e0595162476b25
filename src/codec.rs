use crate::constants::{JPEG_QUALITY, LIBDEFLATER_HIGH_LEVEL, OXIPNG_PRESET, WEBP_QUALITY};
use crate::error::{OptimizeError, Result};
use crate::formats::ImageFormatKind;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::DynamicImage;
use oxipng::{Deflaters, Options, StripChunks};
use std::io::Cursor;

/// A decoded raster together with the format its bytes were actually in.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub image: DynamicImage,
    pub format: ImageFormatKind,
}

/// Decode/resize/encode operations the batch processor relies on.
///
/// `StandardCodec` is the production implementation; tests substitute their
/// own to simulate codec failures.
pub trait ImageCodec {
    /// Decodes `bytes`. `hint` is the format implied by the file extension and
    /// is used only when the content signature is not recognized.
    fn decode(&self, bytes: &[u8], hint: ImageFormatKind) -> Result<DecodedImage>;

    fn resize(&self, image: &DynamicImage, width: u32, height: u32) -> DynamicImage;

    /// Encodes with the high-compression preset for `format`.
    fn encode(&self, image: &DynamicImage, format: ImageFormatKind) -> Result<Vec<u8>>;
}

/// Codec backed by the `image` crate, with PNG output run through oxipng and
/// WebP output encoded by libwebp.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardCodec;

impl StandardCodec {
    fn encode_jpeg(image: &DynamicImage) -> Result<Vec<u8>> {
        let mut buf = Cursor::new(Vec::new());
        let encoder = JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY);
        // JPEG has no alpha channel
        image
            .to_rgb8()
            .write_with_encoder(encoder)
            .map_err(|e| OptimizeError::Encode(format!("JPEG encode failed: {}", e)))?;
        Ok(buf.into_inner())
    }

    fn encode_png(image: &DynamicImage) -> Result<Vec<u8>> {
        let mut buf = Cursor::new(Vec::new());
        image
            .write_to(&mut buf, image::ImageFormat::Png)
            .map_err(|e| OptimizeError::Encode(format!("PNG encode failed: {}", e)))?;

        let mut options = Options::from_preset(OXIPNG_PRESET);
        options.strip = StripChunks::Safe;
        options.deflate = Deflaters::Libdeflater {
            compression: LIBDEFLATER_HIGH_LEVEL,
        };

        oxipng::optimize_from_memory(buf.get_ref(), &options)
            .map_err(|e| OptimizeError::PngOptimization(e.to_string()))
    }

    /// Lossy WebP through libwebp. The encoder only takes 8-bit RGB(A), so
    /// other layouts are converted first.
    fn encode_webp(image: &DynamicImage) -> Result<Vec<u8>> {
        let (width, height) = (image.width(), image.height());
        let encoded = if image.color().has_alpha() {
            let rgba = image.to_rgba8();
            webp::Encoder::from_rgba(rgba.as_raw(), width, height)
                .encode_simple(false, WEBP_QUALITY)
        } else {
            let rgb = image.to_rgb8();
            webp::Encoder::from_rgb(rgb.as_raw(), width, height)
                .encode_simple(false, WEBP_QUALITY)
        };

        let memory =
            encoded.map_err(|e| OptimizeError::Encode(format!("WebP encode failed: {:?}", e)))?;
        Ok(memory.to_vec())
    }
}

impl ImageCodec for StandardCodec {
    fn decode(&self, bytes: &[u8], hint: ImageFormatKind) -> Result<DecodedImage> {
        let format = image::guess_format(bytes)
            .ok()
            .and_then(ImageFormatKind::from_image_format)
            .unwrap_or(hint);

        let image = image::load_from_memory_with_format(bytes, format.to_image_format())
            .map_err(OptimizeError::Decode)?;

        Ok(DecodedImage { image, format })
    }

    fn resize(&self, image: &DynamicImage, width: u32, height: u32) -> DynamicImage {
        image.resize_exact(width, height, FilterType::Lanczos3)
    }

    fn encode(&self, image: &DynamicImage, format: ImageFormatKind) -> Result<Vec<u8>> {
        match format {
            ImageFormatKind::Jpeg => Self::encode_jpeg(image),
            ImageFormatKind::Png => Self::encode_png(image),
            ImageFormatKind::WebP => Self::encode_webp(image),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, Rgba, RgbaImage};

    fn gradient(width: u32, height: u32) -> DynamicImage {
        let img = RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x * 7 % 256) as u8, (y * 5 % 256) as u8, 128, 255])
        });
        DynamicImage::ImageRgba8(img)
    }

    #[test]
    fn test_encode_jpeg_magic() {
        let data = StandardCodec.encode(&gradient(16, 16), ImageFormatKind::Jpeg).unwrap();
        assert_eq!(&data[0..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_encode_png_magic() {
        let data = StandardCodec.encode(&gradient(16, 16), ImageFormatKind::Png).unwrap();
        assert_eq!(&data[0..8], &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]);
    }

    #[test]
    fn test_encode_webp_magic() {
        let data = StandardCodec.encode(&gradient(16, 16), ImageFormatKind::WebP).unwrap();
        assert_eq!(&data[0..4], b"RIFF");
        assert_eq!(&data[8..12], b"WEBP");
    }

    #[test]
    fn test_encode_webp_is_lossy() {
        let source = gradient(64, 64);
        let data = StandardCodec.encode(&source, ImageFormatKind::WebP).unwrap();
        let decoded = StandardCodec.decode(&data, ImageFormatKind::WebP).unwrap();

        assert_eq!(decoded.format, ImageFormatKind::WebP);
        assert_eq!(decoded.image.dimensions(), (64, 64));
        assert_ne!(decoded.image.to_rgba8().as_raw(), source.to_rgba8().as_raw());
    }

    #[test]
    fn test_encode_webp_from_16bit() {
        let img = DynamicImage::new_rgb16(8, 8);
        assert!(StandardCodec.encode(&img, ImageFormatKind::WebP).is_ok());
    }

    #[test]
    fn test_decode_detects_content_format() {
        let png = StandardCodec.encode(&gradient(10, 6), ImageFormatKind::Png).unwrap();

        // The extension claims JPEG but the bytes are PNG.
        let decoded = StandardCodec.decode(&png, ImageFormatKind::Jpeg).unwrap();
        assert_eq!(decoded.format, ImageFormatKind::Png);
        assert_eq!(decoded.image.dimensions(), (10, 6));
    }

    #[test]
    fn test_decode_corrupt_input() {
        let result = StandardCodec.decode(b"definitely not an image", ImageFormatKind::Png);
        assert!(matches!(result, Err(OptimizeError::Decode(_))));
    }

    #[test]
    fn test_resize_exact() {
        let resized = StandardCodec.resize(&gradient(40, 20), 10, 5);
        assert_eq!(resized.dimensions(), (10, 5));
    }
}
