pub mod batch;
pub mod cli;
pub mod codec;
pub mod constants;
pub mod error;
pub mod formats;
pub mod logger;
pub mod processing;
pub mod utils;

pub use batch::{run, run_with_codec, scan_directory, validate_root, RunSummary, ScanEntry};
pub use codec::{DecodedImage, ImageCodec, StandardCodec};
pub use error::{OptimizeError, Result};
pub use formats::{is_image_file, output_path_for, ImageFormatKind};
pub use processing::{
    optimize_file, target_dimensions, write_atomically, FileOutcome, ImageFile, ProcessingOptions,
};
