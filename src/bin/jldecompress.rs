#![warn(rust_2018_idioms)]

use std::process::exit;

use clap::Parser;
use log::info;

use jlcompress::compression::decompress::decompress;
use jlcompress::compression::header::read_flags;
use jlcompress::error::Result;
use jlcompress::tools::cli::{init_logging, report_error, DecompressArgs, JlOpts};
use jlcompress::tools::file_io::check_output;
use jlcompress::tools::report::final_statistics;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

const PROGRAM: &str = "jldecompress";

fn main() {
    let options = JlOpts::from(DecompressArgs::parse());
    init_logging(options.verbose);

    if let Err(e) = run(&options) {
        report_error(PROGRAM, &e);
        exit(1);
    }
}

fn run(opts: &JlOpts) -> Result<()> {
    let flags = read_flags(opts.input(), true)?;
    if flags.is_empty() {
        println!("File {} is not compressed", opts.input().display());
        return Ok(());
    }

    let output = opts.output_path(false);
    check_output(opts.input(), &output, opts.force_overwrite)?;
    decompress(opts.input(), &output)?;

    println!("{}", final_statistics(opts.input(), &output)?);
    info!("Done.");
    Ok(())
}
