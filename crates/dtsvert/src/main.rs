//! A tool to batch convert stereo audio into Duplicated True Stereo (LRLR).
//!
//! See [`dtsvert`] documentation for more information.
//!
//! [`dtsvert`]: https://docs.rs/dtsvert

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

/// A tool to batch convert stereo audio into Duplicated True Stereo (LRLR).
#[derive(Parser)]
#[command(author, version, about, max_term_width = 80)]
pub struct Opts {
    #[command(flatten)]
    inner: dtsvert::cli::Dtsvert,
}

fn main() -> Result<ExitCode> {
    let opts = Opts::parse();
    dtsvert::cli::entry(&opts.inner)
}
