/// Extensions (lowercase) that are picked up during a scan.
pub const SUPPORTED_IMAGE_EXTENSIONS: &[&str] = &["webp", "png", "jpg", "jpeg"];

pub const JPEG_QUALITY: u8 = 85;
/// libwebp lossy quality, same scale as JPEG
pub const WEBP_QUALITY: f32 = 85.0;

pub const OXIPNG_PRESET: u8 = 4;
pub const LIBDEFLATER_HIGH_LEVEL: u8 = 12;

pub const DEFAULT_DIRECTORY: &str = ".";

pub const PROGRESS_BAR_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {wide_msg}";
pub const PROGRESS_BAR_CHARS: &str = "=>-";

// Common output message prefixes
pub const SUCCESS_PREFIX: &str = "✅";
pub const UNCHANGED_PREFIX: &str = "➖";
pub const SKIP_PREFIX: &str = "⏭️ ";
pub const RESIZE_PREFIX: &str = "🔄";
pub const SUMMARY_PREFIX: &str = "📊";
