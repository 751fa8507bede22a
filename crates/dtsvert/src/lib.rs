//! A tool to batch convert stereo audio into Duplicated True Stereo (LRLR).
//!
//! Every argument is treated as a file or a wildcard pattern, like `*.wav`.
//! Each matching file in a supported format (wav, flac, aiff, aif, ogg, opus
//! and wv) is remixed by [SoX] into a four channel file where channels 1 and 3
//! carry the original left channel, and channels 2 and 4 carry the original
//! right channel.
//!
//! Converted files are written next to the original with a `_DTS` marker
//! before the extension, so `track.wav` is converted into `track_DTS.wav`.
//! The exact command run for each file is equivalent to:
//!
//! ```sh
//! sox track.wav track_DTS.wav remix 1 2 1 2
//! ```
//!
//! <br>
//!
//! ## Usage
//!
//! Use `--dry-run` or `-D` to see which commands would be run:
//!
//! ```sh
//! dtsvert --dry-run *.wav *.flac
//! ```
//!
//! Once this looks good, you can run the command without `--dry-run`.
//!
//! Patterns are expanded by the tool itself, so they also work in shells
//! which don't expand them. With `--recursive`, `**` matches any number of
//! nested directories:
//!
//! ```sh
//! dtsvert --recursive 'music/**/*.flac'
//! ```
//!
//! [SoX]: http://sox.sourceforge.net/

pub mod cli;
mod config;
mod convert;
mod expand;
mod filesystem;
mod format;
mod locate;
mod out;
mod process;
mod shell;
