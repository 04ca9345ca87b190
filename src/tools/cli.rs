//! Command line options for the two binaries.
//!
//! `jlcompress` compresses a file, or decompresses it when it already carries a header.
//! `jldecompress` only decompresses. Both reduce their arguments to a `JlOpts`.

use std::error::Error as _;
use std::path::{Path, PathBuf};

use clap::Parser;
use log::{debug, LevelFilter};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

use crate::compression::compress::CompressionStages;
use crate::error::JlError;
use crate::tools::file_io::make_output_filename;

/// Verbosity of user information
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Info,
    Debug,
    Trace,
}

impl Verbosity {
    fn from_flags(quiet: bool, verbose: u64) -> Self {
        match (quiet, verbose) {
            (true, _) => Verbosity::Quiet,
            (false, 0) => Verbosity::Info,
            (false, 1) => Verbosity::Debug,
            _ => Verbosity::Trace,
        }
    }

    pub fn level_filter(self) -> LevelFilter {
        match self {
            Verbosity::Quiet => LevelFilter::Off,
            Verbosity::Info => LevelFilter::Info,
            Verbosity::Debug => LevelFilter::Debug,
            Verbosity::Trace => LevelFilter::Trace,
        }
    }
}

/// jlcompress, a small run length and Huffman file compressor.
#[derive(Parser, Debug)]
#[clap(name = "jlcompress", version, about)]
pub struct CompressArgs {
    /// File to compress. A file that is already compressed is decompressed instead.
    pub input: PathBuf,
    /// Output file (default: input name plus ".compressed" or ".decompressed")
    pub output: Option<PathBuf>,
    /// Overwrite an existing output file
    #[clap(short, long)]
    pub force: bool,
    /// Transpose the bit planes of the input before any other stage
    #[clap(long)]
    pub flip: bool,
    /// Run length encode
    #[clap(long)]
    pub rle: bool,
    /// Huffman encode
    #[clap(long)]
    pub huffman: bool,
    /// Be verbose (a 2nd -v gives more)
    #[clap(short, long, parse(from_occurrences))]
    pub verbose: u64,
    /// Suppress everything but errors and the final statistics
    #[clap(short, long)]
    pub quiet: bool,
}

/// jldecompress, undo whatever jlcompress did to a file.
#[derive(Parser, Debug)]
#[clap(name = "jldecompress", version, about)]
pub struct DecompressArgs {
    /// Compressed file
    pub input: PathBuf,
    /// Output file (default: input name with ".compressed" replaced by ".decompressed")
    pub output: Option<PathBuf>,
    /// Overwrite an existing output file
    #[clap(short, long)]
    pub force: bool,
    /// Be verbose (a 2nd -v gives more)
    #[clap(short, long, parse(from_occurrences))]
    pub verbose: u64,
    /// Suppress everything but errors and the final statistics
    #[clap(short, long)]
    pub quiet: bool,
}

#[derive(Debug)]
pub struct JlOpts {
    /// File to read
    pub input: PathBuf,
    /// File to write, if named on the command line
    pub output: Option<PathBuf>,
    /// Silently overwrite existing files with the same name
    pub force_overwrite: bool,
    /// Stages to apply when compressing
    pub stages: CompressionStages,
    /// Verbosity of user information
    pub verbose: Verbosity,
}

impl JlOpts {
    /// The output file to use: the one named by the user, or one derived from the input.
    pub fn output_path(&self, compressing: bool) -> PathBuf {
        match &self.output {
            Some(output) => output.clone(),
            None => make_output_filename(&self.input, compressing),
        }
    }

    pub fn input(&self) -> &Path {
        &self.input
    }
}

impl From<CompressArgs> for JlOpts {
    fn from(args: CompressArgs) -> Self {
        Self {
            input: args.input,
            output: args.output,
            force_overwrite: args.force,
            stages: CompressionStages::explicit(args.flip, args.rle, args.huffman),
            verbose: Verbosity::from_flags(args.quiet, args.verbose),
        }
    }
}

impl From<DecompressArgs> for JlOpts {
    fn from(args: DecompressArgs) -> Self {
        Self {
            input: args.input,
            output: args.output,
            force_overwrite: args.force,
            stages: CompressionStages::default(),
            verbose: Verbosity::from_flags(args.quiet, args.verbose),
        }
    }
}

/// Install the terminal logger and set the log level from the verbosity.
pub fn init_logging(verbose: Verbosity) {
    // Errors and warnings go to stderr, the rest to stdout.
    if TermLogger::init(
        LevelFilter::Trace,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )
    .is_err()
    {
        eprintln!("Logger already initialized");
    }
    log::set_max_level(verbose.level_filter());
}

/// The line a binary prints for a top-level error. Shown even when logging is off.
pub fn error_message(program: &str, e: &JlError) -> String {
    format!("Error: {} - {}", program, e)
}

/// Print a top-level error on stderr and log its causes.
pub fn report_error(program: &str, e: &JlError) {
    eprintln!("{}", error_message(program, e));
    let mut source = e.source();
    while let Some(cause) = source {
        debug!("  caused by: {}", cause);
        source = cause.source();
    }
}
