use crate::codec::ImageCodec;
use crate::error::{OptimizeError, Result};
use crate::formats::{output_path_for, ImageFormatKind};
use image::GenericImageView;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessingOptions {
    pub target_format: Option<ImageFormatKind>,
    pub max_width: Option<u32>,
    pub max_height: Option<u32>,
    pub verbose: bool,
}

impl ProcessingOptions {
    pub fn new(
        target_format: Option<ImageFormatKind>,
        max_width: Option<u32>,
        max_height: Option<u32>,
        verbose: bool,
    ) -> Result<Self> {
        let options = Self {
            target_format,
            max_width,
            max_height,
            verbose,
        };
        options.validate()?;
        Ok(options)
    }

    /// Checks the width/height constraints.
    ///
    /// # Returns
    /// * `Err(OptimizeError::Configuration)` if both limits are set or either is zero
    pub fn validate(&self) -> Result<()> {
        if self.max_width.is_some() && self.max_height.is_some() {
            return Err(OptimizeError::Configuration(
                "width (-w) and height (-a) cannot be specified at the same time".to_string(),
            ));
        }
        if self.max_width == Some(0) {
            return Err(OptimizeError::Configuration(
                "width must be a positive number of pixels".to_string(),
            ));
        }
        if self.max_height == Some(0) {
            return Err(OptimizeError::Configuration(
                "height must be a positive number of pixels".to_string(),
            ));
        }
        Ok(())
    }
}

/// A discovered file whose extension is one of the supported image types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub path: PathBuf,
    pub format: ImageFormatKind,
}

impl ImageFile {
    /// Returns `None` when the extension is not a supported image type.
    pub fn from_path(path: &Path) -> Option<Self> {
        ImageFormatKind::from_path(path).map(|format| Self {
            path: path.to_path_buf(),
            format,
        })
    }
}

#[derive(Debug)]
pub enum FileOutcome {
    /// The file was rewritten (possibly under a new extension).
    Optimized {
        path: PathBuf,
        output_path: PathBuf,
        original_size: u64,
        new_size: u64,
        format: ImageFormatKind,
        resized_to: Option<(u32, u32)>,
    },
    /// Re-encoding would not have shrunk the file, so it was left as is.
    Unchanged { path: PathBuf, size: u64 },
    Failed { path: PathBuf, error: OptimizeError },
}

/// Computes the size an image should be scaled to so that it fits within the
/// given maximum, preserving its aspect ratio.
///
/// Images already within the limit keep their dimensions. The derived side is
/// rounded to the nearest pixel and never drops below 1.
pub fn target_dimensions(
    (width, height): (u32, u32),
    max_width: Option<u32>,
    max_height: Option<u32>,
) -> (u32, u32) {
    if let Some(limit) = max_width.filter(|&w| w > 0 && width > w) {
        return (limit, scale_side(height, limit, width));
    }

    if let Some(limit) = max_height.filter(|&h| h > 0 && height > h) {
        return (scale_side(width, limit, height), limit);
    }

    (width, height)
}

fn scale_side(other: u32, limit: u32, side: u32) -> u32 {
    let scaled = (other as f64 * (limit as f64 / side as f64)).round() as u32;
    scaled.max(1)
}

/// Core per-file pipeline: read -> decode -> resize -> encode -> replace.
///
/// # Returns
/// * `Ok(FileOutcome::Optimized)` when new bytes were written
/// * `Ok(FileOutcome::Unchanged)` when the same-format, same-size re-encode
///   was not smaller than the original
/// * `Err(OptimizeError)` on any failure; the original file is left intact
///
/// When the target format differs from the file's extension the output is
/// written next to it with the new extension and the original is removed
/// afterwards. An unrelated file already sitting at that path is never
/// overwritten. A symlinked `file` is resolved first: the file it points to
/// is rewritten and the link itself is left alone.
pub fn optimize_file<C: ImageCodec + ?Sized>(
    file: &ImageFile,
    options: &ProcessingOptions,
    codec: &C,
) -> Result<FileOutcome> {
    let source = resolve_link(&file.path)?;
    let bytes = fs::read(&source)?;
    let original_size = bytes.len() as u64;

    let decoded = codec.decode(&bytes, file.format)?;

    let (target_format, output_path) = match options.target_format {
        Some(format) => (format, output_path_for(&source, format)),
        None => (decoded.format, source.clone()),
    };
    let renamed = output_path != source;
    if renamed && fs::symlink_metadata(&output_path).is_ok() {
        return Err(OptimizeError::Conflict(output_path));
    }

    let dimensions = decoded.image.dimensions();
    let new_dimensions = target_dimensions(dimensions, options.max_width, options.max_height);
    let resized_to = (new_dimensions != dimensions).then_some(new_dimensions);

    let image = match resized_to {
        Some((width, height)) => codec.resize(&decoded.image, width, height),
        None => decoded.image,
    };

    let encoded = codec.encode(&image, target_format)?;
    let new_size = encoded.len() as u64;

    let same_shape = !renamed && resized_to.is_none() && target_format == decoded.format;
    if same_shape && new_size >= original_size {
        return Ok(FileOutcome::Unchanged {
            path: file.path.clone(),
            size: original_size,
        });
    }

    let permissions = fs::metadata(&source).ok().map(|m| m.permissions());
    write_atomically(&output_path, &encoded, permissions)?;

    if renamed {
        fs::remove_file(&source).map_err(|err| OptimizeError::Write {
            path: file.path.clone(),
            source: err,
        })?;
    }

    Ok(FileOutcome::Optimized {
        path: file.path.clone(),
        output_path,
        original_size,
        new_size,
        format: target_format,
        resized_to,
    })
}

/// Follows `path` to the file it names when it is a symlink. Other paths,
/// including ones that do not exist yet, come back unchanged.
fn resolve_link(path: &Path) -> Result<PathBuf> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_symlink() => {
            fs::canonicalize(path).map_err(|source| OptimizeError::Write {
                path: path.to_path_buf(),
                source,
            })
        }
        _ => Ok(path.to_path_buf()),
    }
}

/// Writes `bytes` to a temporary file in the destination directory and renames
/// it over `path`, so an interrupted run leaves either the old or the new file.
///
/// If `path` is a symlink the bytes land in its target and the link survives.
pub fn write_atomically(
    path: &Path,
    bytes: &[u8],
    permissions: Option<fs::Permissions>,
) -> Result<()> {
    let target = resolve_link(path)?;
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let write_error = |source: std::io::Error| OptimizeError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut temp = NamedTempFile::new_in(dir).map_err(write_error)?;
    temp.write_all(bytes).map_err(write_error)?;
    temp.as_file().sync_all().map_err(write_error)?;
    if let Some(permissions) = permissions {
        temp.as_file().set_permissions(permissions).map_err(write_error)?;
    }
    temp.persist(&target).map_err(|e| write_error(e.error))?;

    Ok(())
}
