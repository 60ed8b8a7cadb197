use crate::formats::TargetFormat;
use clap::builder::PossibleValuesParser;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "webp-squeeze",
    about = "Batch-convert images to WebP and see how much space you saved",
    long_about = "webp-squeeze re-encodes a batch of images into a compressed format (WebP by default) \
                  one file at a time, reports per-file and total size savings, and saves the results \
                  into an output directory. Files that fail to convert are reported and skipped.",
    version,
    after_help = "EXAMPLES:\n  \
    webp-squeeze convert photos/ -o converted -q 90\n  \
    webp-squeeze convert \"shots/*.png\" cover.jpg -o out -f avif\n  \
    webp-squeeze scan photos/ -r"
)]
pub struct Args {
    #[arg(short = 'v', long, global = true, help = "Show debug logs")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Only print errors")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(
        about = "Convert a batch of images",
        long_about = "Convert every accepted image, in order, then save the results. \
                      Inputs that are not images, or that already have the target extension, are skipped."
    )]
    Convert {
        #[arg(
            required = true,
            help = "Input files, directories or glob patterns",
            long_help = "Input can be a file path, a directory, or a glob expression. \
                         Examples: './images', '*.jpg', '/path/to/images/*.{jpg,png}'"
        )]
        inputs: Vec<String>,

        #[arg(short = 'o', long, help = "Output directory path")]
        output: PathBuf,

        #[arg(
            short = 'q',
            long,
            help = "Quality (1-100, default: 95)",
            long_help = "Encoding quality from 1 (smallest) to 100 (best). \
                         For PNG output it selects the deflate effort; PNG stays lossless."
        )]
        quality: Option<u8>,

        #[arg(
            short = 'f',
            long,
            value_parser = PossibleValuesParser::new(TargetFormat::format_names()),
            help = "Target format (default: webp)"
        )]
        format: Option<String>,

        #[arg(short = 'r', long, help = "Process subdirectories recursively")]
        recursive: bool,

        #[arg(
            long,
            default_value_t = 0,
            help = "Pause between saved files in milliseconds",
            long_help = "Delay inserted between consecutive saves. A local directory does not \
                         throttle writes, so the default is 0."
        )]
        delay_ms: u64,
    },

    #[command(
        about = "List which inputs would be converted",
        long_about = "Apply the same acceptance rules as `convert` and show every input \
                      with its size, without converting anything."
    )]
    Scan {
        #[arg(required = true, help = "Input files, directories or glob patterns")]
        inputs: Vec<String>,

        #[arg(
            short = 'f',
            long,
            value_parser = PossibleValuesParser::new(TargetFormat::format_names()),
            help = "Target format (default: webp)"
        )]
        format: Option<String>,

        #[arg(short = 'r', long, help = "Process subdirectories recursively")]
        recursive: bool,
    },
}
