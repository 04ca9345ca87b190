//Enable more cargo lint tests
#![warn(rust_2018_idioms)]
#![warn(clippy::disallowed_types)]

use std::process::exit;

use clap::Parser;
use log::info;

use jlcompress::compression::compress::compress;
use jlcompress::compression::decompress::decompress;
use jlcompress::compression::header::read_flags;
use jlcompress::error::Result;
use jlcompress::tools::cli::{init_logging, report_error, CompressArgs, JlOpts};
use jlcompress::tools::file_io::check_output;
use jlcompress::tools::report::final_statistics;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

const PROGRAM: &str = "jlcompress";

fn main() {
    let options = JlOpts::from(CompressArgs::parse());
    init_logging(options.verbose);

    if let Err(e) = run(&options) {
        report_error(PROGRAM, &e);
        exit(1);
    }
}

/// Compress the input, or decompress it if it already carries a header.
fn run(opts: &JlOpts) -> Result<()> {
    let flags = read_flags(opts.input(), true)?;
    let compressing = flags.is_empty();
    let output = opts.output_path(compressing);
    check_output(opts.input(), &output, opts.force_overwrite)?;

    if compressing {
        compress(&opts.stages, opts.input(), &output)?;
    } else {
        decompress(opts.input(), &output)?;
    }

    println!("{}", final_statistics(opts.input(), &output)?);
    info!("Done.");
    Ok(())
}
