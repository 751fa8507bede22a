use core::cell::Cell;

use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use termcolor::{ColorChoice, StandardStream};

use crate::config::Config;
use crate::convert::{Runner, SUFFIX};
use crate::expand::{self, Expander};
use crate::filesystem::{Disk, Filesystem};
use crate::format::Format;
use crate::locate::{self, Locator, Platform};
use crate::out::{Colors, Out, blank, info};
use crate::process::{Spawn, System};
use crate::shell;

/// Convert stereo audio files into Duplicated True Stereo (LRLR) using SoX.
#[derive(Parser)]
pub struct Dtsvert {
    /// Path to the sox binary to use when performing conversions.
    #[arg(long, default_value = "sox")]
    sox: PathBuf,
    /// If set, prints the commands which would be run without running them.
    /// This also implies verbose.
    #[arg(short = 'D', long)]
    dry_run: bool,
    /// If set, enables verbose output.
    #[arg(short = 'v', long)]
    verbose: bool,
    /// If set, `**` in a pattern matches any number of nested directories.
    #[arg(short = 'r', long)]
    recursive: bool,
    /// Marker inserted before the extension of converted files.
    #[arg(long, default_value = SUFFIX)]
    suffix: String,
    /// Files or wildcard patterns to convert, like `*.wav`.
    paths: Vec<PathBuf>,
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Exit {
    /// All files were processed, whether or not they converted.
    Completed,
    /// The conversion tool could not be found.
    MissingTool,
    /// No patterns were given.
    Usage,
    /// The patterns matched no files.
    NoFiles,
}

impl From<Exit> for ExitCode {
    #[inline]
    fn from(exit: Exit) -> Self {
        match exit {
            Exit::Completed => ExitCode::SUCCESS,
            _ => ExitCode::FAILURE,
        }
    }
}

/// Entry for `dtsvert`.
///
/// See [`crate`] documentation.
pub fn entry(opts: &Dtsvert) -> Result<ExitCode> {
    // Current indentation level for output.
    let indent = Cell::new(0);

    let config = Config {
        dry_run: opts.dry_run,
        paths: opts.paths.clone(),
        recursive: opts.recursive,
        sox: opts.sox.clone(),
        suffix: opts.suffix.clone(),
        verbose: opts.verbose,
    };

    let choice = if io::stdout().is_terminal() {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };

    let cols = Colors::new();

    let o = StandardStream::stdout(choice);
    let mut o = o.lock();
    let mut o = Out::new(config.verbose || config.dry_run, &indent, &cols, &mut o);
    let exit = run(&mut o, &config, Platform::current(), &Disk, &mut System)?;
    Ok(exit.into())
}

pub(crate) fn run(
    o: &mut Out<'_>,
    config: &Config,
    platform: Platform,
    fs: &dyn Filesystem,
    spawn: &mut dyn Spawn,
) -> Result<Exit> {
    let expander = Expander::new(fs, config.recursive);

    let Some(tool) = Locator::new(&config.sox, platform).locate(spawn, &expander) else {
        locate::remediation(o, platform, &config.sox)?;
        return Ok(Exit::MissingTool);
    };

    info!(o => v, "Using {}", shell::escape(tool.program.as_os_str()));

    if let Some(version) = &tool.version {
        let mut o = o.indent(1);
        blank!(o => v, "{version}");
    }

    if config.paths.is_empty() {
        usage(o)?;
        return Ok(Exit::Usage);
    }

    let files = expand::expand_all(o, &expander, &config.paths)?;

    if files.is_empty() {
        info!(o, "No files to process. Exiting.");
        return Ok(Exit::NoFiles);
    }

    Runner::new(config, &tool, fs, spawn).run(o, &files)?;
    Ok(Exit::Completed)
}

fn usage(o: &mut Out<'_>) -> Result<()> {
    blank!(o, "Usage: {} [OPTIONS] <file1> [file2 ...]", env!("CARGO_PKG_NAME"));
    blank!(o, "Supports: {}", Format::SUPPORTED);
    Ok(())
}
