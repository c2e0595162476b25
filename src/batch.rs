use crate::codec::{ImageCodec, StandardCodec};
use crate::constants::{
    PROGRESS_BAR_CHARS, PROGRESS_BAR_TEMPLATE, RESIZE_PREFIX, SKIP_PREFIX, SUCCESS_PREFIX,
    SUMMARY_PREFIX, UNCHANGED_PREFIX,
};
use crate::error::{OptimizeError, Result};
use crate::processing::{optimize_file, FileOutcome, ImageFile, ProcessingOptions};
use crate::utils::{calculate_compression_ratio, format_file_size};
use crate::{error, info, verbose, warn};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use walkdir::WalkDir;

/// A regular file found during the scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEntry {
    Image(ImageFile),
    Unsupported(PathBuf),
}

/// Aggregate counters for one run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub scanned: usize,
    pub optimized: usize,
    pub unchanged: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Bytes of successfully processed files before processing
    pub bytes_before: u64,
    /// Bytes of successfully processed files after processing
    pub bytes_after: u64,
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn record(&mut self, outcome: &FileOutcome) {
        self.scanned += 1;
        match outcome {
            FileOutcome::Optimized {
                original_size,
                new_size,
                ..
            } => {
                self.optimized += 1;
                self.bytes_before += original_size;
                self.bytes_after += new_size;
            }
            FileOutcome::Unchanged { size, .. } => {
                self.unchanged += 1;
                self.bytes_before += size;
                self.bytes_after += size;
            }
            FileOutcome::Failed { .. } => self.failed += 1,
        }
    }

    pub fn record_skipped(&mut self) {
        self.scanned += 1;
        self.skipped += 1;
    }

    /// Image files that went through the transform, whatever the result.
    pub fn attempted(&self) -> usize {
        self.optimized + self.unchanged + self.failed
    }

    pub fn succeeded(&self) -> usize {
        self.optimized + self.unchanged
    }

    pub fn reduction_ratio(&self) -> f64 {
        calculate_compression_ratio(self.bytes_before, self.bytes_after)
    }

    pub fn print(&self) {
        info!("\n{} Optimization Summary:", SUMMARY_PREFIX);
        info!("  📁 Files scanned: {}", self.scanned);
        info!(
            "  🖼️  Images processed: {}/{}",
            self.succeeded(),
            self.attempted()
        );
        info!("  {} Optimized: {}", SUCCESS_PREFIX, self.optimized);
        info!("  {} Already optimal: {}", UNCHANGED_PREFIX, self.unchanged);
        info!("  {} Skipped (unsupported): {}", SKIP_PREFIX, self.skipped);
        if self.failed > 0 {
            info!("  ⚠️  Failed: {}", self.failed);
        }
        info!(
            "  📦 Size: {} -> {}",
            format_file_size(self.bytes_before),
            format_file_size(self.bytes_after)
        );
        info!("  🎯 Overall reduction: {:.1}%", self.reduction_ratio());
        info!("  ⏱️  Total time: {:.2?}", self.elapsed);
    }
}

#[derive(Debug, Hash, PartialEq, Eq)]
enum FileIdentity {
    Inode(u64, u64),
    Path(PathBuf),
}

fn file_identity(path: &Path) -> FileIdentity {
    #[cfg(unix)]
    {
        use std::os::unix::fs::MetadataExt;
        if let Ok(metadata) = fs::metadata(path) {
            return FileIdentity::Inode(metadata.dev(), metadata.ino());
        }
    }
    FileIdentity::Path(path.canonicalize().unwrap_or_else(|_| path.to_path_buf()))
}

/// Checks the root is an existing, readable directory.
pub fn validate_root(root: &Path) -> Result<()> {
    let access_error = |source| OptimizeError::Access {
        path: root.to_path_buf(),
        source,
    };

    let metadata = fs::metadata(root).map_err(access_error)?;
    if !metadata.is_dir() {
        return Err(OptimizeError::NotADirectory(root.to_path_buf()));
    }
    fs::read_dir(root).map_err(access_error)?;
    Ok(())
}

/// Recursively lists every regular file under `root`, sorted by name within
/// each directory.
///
/// Symbolic links are followed. Links that point back at an ancestor are
/// reported and not descended into, and a file reachable through several
/// paths is listed only once.
pub fn scan_directory(root: &Path) -> Result<Vec<ScanEntry>> {
    validate_root(root)?;

    let mut seen = HashSet::new();
    let mut entries = Vec::new();

    for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                if let Some(ancestor) = e.loop_ancestor() {
                    warn!(
                        "Symlink loop detected at {:?} (points to {:?}), not descending",
                        e.path().unwrap_or(root),
                        ancestor
                    );
                } else {
                    warn!("Cannot read entry: {}", e);
                }
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        if !seen.insert(file_identity(path)) {
            verbose!("Already visited through another path: {:?}", path);
            continue;
        }

        entries.push(match ImageFile::from_path(path) {
            Some(file) => ScanEntry::Image(file),
            None => ScanEntry::Unsupported(path.to_path_buf()),
        });
    }

    Ok(entries)
}

/// Optimizes every supported image under `root` in place.
///
/// # Returns
/// * `Ok(RunSummary)` once every file was visited, even if some failed
/// * `Err(OptimizeError)` for invalid options or an inaccessible root; no file
///   is touched in that case
pub fn run(root: &Path, options: &ProcessingOptions) -> Result<RunSummary> {
    run_with_codec(root, options, &StandardCodec)
}

pub fn run_with_codec<C: ImageCodec + ?Sized>(
    root: &Path,
    options: &ProcessingOptions,
    codec: &C,
) -> Result<RunSummary> {
    options.validate()?;
    let start_time = Instant::now();

    info!("🚀 Optimizing images in: {}", root.display());
    match options.target_format {
        Some(format) => info!("🎭 Output format: {}", format),
        None => info!("🎭 Output format: original"),
    }
    if let Some(width) = options.max_width {
        info!("📏 Maximum width: {}px", width);
    }
    if let Some(height) = options.max_height {
        info!("📏 Maximum height: {}px", height);
    }

    let entries = scan_directory(root)?;
    let image_count = entries
        .iter()
        .filter(|e| matches!(e, ScanEntry::Image(_)))
        .count();
    info!(
        "📊 Found {} image files ({} files total)",
        image_count,
        entries.len()
    );

    let progress = create_progress_bar(image_count, options.verbose);
    let mut summary = RunSummary::default();

    for entry in entries {
        match entry {
            ScanEntry::Unsupported(path) => {
                verbose!("{} Skipping unsupported file: {:?}", SKIP_PREFIX, path);
                summary.record_skipped();
            }
            ScanEntry::Image(file) => {
                if let Some(name) = file.path.file_name() {
                    progress.set_message(name.to_string_lossy().into_owned());
                }

                let outcome = process_entry(&file, options, codec);
                progress.suspend(|| report_outcome(&outcome, options.verbose));
                summary.record(&outcome);
                progress.inc(1);
            }
        }
    }

    progress.finish_and_clear();
    summary.elapsed = start_time.elapsed();
    Ok(summary)
}

fn process_entry<C: ImageCodec + ?Sized>(
    file: &ImageFile,
    options: &ProcessingOptions,
    codec: &C,
) -> FileOutcome {
    optimize_file(file, options, codec).unwrap_or_else(|error| FileOutcome::Failed {
        path: file.path.clone(),
        error,
    })
}

fn report_outcome(outcome: &FileOutcome, verbose: bool) {
    // Only conversions and resizes can get here with a bigger file
    if let FileOutcome::Optimized {
        output_path,
        original_size,
        new_size,
        ..
    } = outcome
    {
        if new_size > original_size {
            warn!(
                "{:?} grew from {} to {}",
                output_path,
                format_file_size(*original_size),
                format_file_size(*new_size)
            );
        }
    }

    match outcome {
        FileOutcome::Failed { path, error } => {
            error!("Failed to optimize {:?}: {}", path, error);
        }
        _ if !verbose => {}
        FileOutcome::Optimized {
            output_path,
            original_size,
            new_size,
            format,
            resized_to,
            ..
        } => {
            info!(
                "{} Optimized: {:?} - Format: {} - {} -> {} ({:.1}%)",
                SUCCESS_PREFIX,
                output_path,
                format,
                format_file_size(*original_size),
                format_file_size(*new_size),
                calculate_compression_ratio(*original_size, *new_size)
            );
            if let Some((width, height)) = resized_to {
                info!("   {} Resized to {}x{}", RESIZE_PREFIX, width, height);
            }
        }
        FileOutcome::Unchanged { path, size } => {
            info!(
                "{} Already optimal: {:?} ({})",
                UNCHANGED_PREFIX,
                path,
                format_file_size(*size)
            );
        }
    }
}

fn create_progress_bar(len: usize, verbose: bool) -> ProgressBar {
    if verbose || crate::logger::is_quiet() {
        return ProgressBar::hidden();
    }

    let style = ProgressStyle::default_bar()
        .template(PROGRESS_BAR_TEMPLATE)
        .map(|style| style.progress_chars(PROGRESS_BAR_CHARS))
        .unwrap_or_else(|_| ProgressStyle::default_bar());

    let pb = ProgressBar::new(len as u64);
    pb.set_style(style);
    pb
}
