use crate::constants::DEFAULT_DIRECTORY;
use crate::formats::ImageFormatKind;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "img-shrink",
    about = "Recursively optimize images in place",
    long_about = "img-shrink walks a directory tree and rewrites every WebP, PNG and JPEG image \
                  it finds with a smaller file size, keeping name and location. \
                  Images can optionally be converted to another format or scaled down to a \
                  maximum width or height while preserving their aspect ratio.",
    version,
    after_help = "EXAMPLES:\n  \
    img-shrink ./photos\n  \
    img-shrink ./photos -f webp -w 1920\n  \
    img-shrink -a 1080 -v"
)]
pub struct Args {
    #[arg(
        default_value = DEFAULT_DIRECTORY,
        help = "Directory to process recursively"
    )]
    pub directory: PathBuf,

    #[arg(
        short = 'f',
        long,
        value_enum,
        help = "Output format (webp, png, jpg)",
        long_help = "Convert every image to this format. Converted files get the new extension \
                     and the original file is removed. If not specified, the original format is kept."
    )]
    pub format: Option<ImageFormatKind>,

    #[arg(
        short = 'w',
        long,
        value_parser = clap::value_parser!(u32).range(1..),
        conflicts_with = "height",
        help = "Maximum width in pixels",
        long_help = "Scale images wider than this down to this width, preserving aspect ratio. \
                     Cannot be combined with --height."
    )]
    pub width: Option<u32>,

    #[arg(
        short = 'a',
        long,
        value_parser = clap::value_parser!(u32).range(1..),
        help = "Maximum height in pixels",
        long_help = "Scale images taller than this down to this height, preserving aspect ratio. \
                     Cannot be combined with --width."
    )]
    pub height: Option<u32>,

    #[arg(short = 'v', long, help = "Show a line for every processed file")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        conflicts_with = "verbose",
        help = "Only print errors"
    )]
    pub quiet: bool,
}
