use core::fmt;

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::Result;

use crate::config::Config;
use crate::filesystem::Filesystem;
use crate::format::Format;
use crate::locate::Tool;
use crate::out::{Out, blank, error, info, warn};
use crate::process::{Invocation, Spawn};
use crate::shell::{self, FormatCommand};

/// Marker inserted before the extension of converted files.
pub(crate) const SUFFIX: &str = "_DTS";

/// Remix directive which duplicates the left and right channels into a
/// four channel LRLR layout.
const REMIX: [&str; 5] = ["remix", "1", "2", "1", "2"];

/// The outcome of converting a single file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Outcome {
    /// The file was converted into the given path.
    Converted(PathBuf),
    /// Dry run, the file would have been converted into the given path.
    Planned(PathBuf),
    /// The file has an extension we don't support.
    Unsupported,
    /// The path is not a regular file.
    NotAFile,
    /// The conversion tool failed.
    Failed,
}

/// Tally of outcomes over a batch.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Tally {
    pub(crate) converted: usize,
    pub(crate) planned: usize,
    pub(crate) skipped: usize,
    pub(crate) failed: usize,
}

impl Tally {
    fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Converted(..) => self.converted += 1,
            Outcome::Planned(..) => self.planned += 1,
            Outcome::Unsupported | Outcome::NotAFile => self.skipped += 1,
            Outcome::Failed => self.failed += 1,
        }
    }
}

impl fmt::Display for Tally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} converted", self.converted)?;

        if self.planned > 0 {
            write!(f, ", {} planned", self.planned)?;
        }

        write!(f, ", {} skipped, {} failed", self.skipped, self.failed)
    }
}

/// Construct the output path for a file, inserting `suffix` before its
/// extension and lowercasing the extension. Returns `None` if the path has no
/// file name or extension.
pub(crate) fn output_path(path: &Path, suffix: &str) -> Option<PathBuf> {
    let stem = path.file_stem()?;
    let ext = path.extension()?.to_ascii_lowercase();

    let mut name = OsString::with_capacity(stem.len() + suffix.len() + ext.len() + 1);
    name.push(stem);
    name.push(suffix);
    name.push(".");
    name.push(&ext);
    Some(path.with_file_name(name))
}

/// Converts files one at a time with a located tool.
pub(crate) struct Runner<'a> {
    config: &'a Config,
    tool: &'a Tool,
    fs: &'a dyn Filesystem,
    spawn: &'a mut dyn Spawn,
}

impl<'a> Runner<'a> {
    pub(crate) fn new(
        config: &'a Config,
        tool: &'a Tool,
        fs: &'a dyn Filesystem,
        spawn: &'a mut dyn Spawn,
    ) -> Self {
        Self {
            config,
            tool,
            fs,
            spawn,
        }
    }

    /// Convert every file in order. A file which fails to convert never stops
    /// the files after it.
    pub(crate) fn run(&mut self, o: &mut Out<'_>, files: &[PathBuf]) -> Result<Tally> {
        let mut tally = Tally::default();

        for path in files {
            let outcome = self.convert(o, path)?;
            tally.record(&outcome);
        }

        info!(o, "Conversion complete!");
        blank!(o, "{tally}");
        Ok(tally)
    }

    /// Convert a single file.
    pub(crate) fn convert(&mut self, o: &mut Out<'_>, path: &Path) -> Result<Outcome> {
        let display = shell::escape(path.as_os_str());

        if !self.fs.is_file(path) {
            warn!(o, "Skipping: {display} (not a valid file)");
            return Ok(Outcome::NotAFile);
        }

        let Some(format) = Format::from_path(path) else {
            warn!(o, "Skipping unsupported file type: {display}");
            return Ok(Outcome::Unsupported);
        };

        let Some(to_path) = output_path(path, &self.config.suffix) else {
            warn!(o, "Skipping unsupported file type: {display}");
            return Ok(Outcome::Unsupported);
        };

        info!(o, "Converting {display} to Duplicated True Stereo (LRLR) format...");
        let mut o = o.indent(1);

        let mut cmd = Command::new(&self.tool.program);
        cmd.arg(path).arg(&to_path).args(REMIX);
        cmd.stdout(Stdio::inherit());

        let mut f = FormatCommand::new(&cmd);

        if !self.config.verbose {
            f.replace(&self.tool.program, "<sox>");
            f.replace(path, "<from>");
            f.replace(&to_path, "<to>");
        }

        blank!(o => v, "format: {format}");
        blank!(o => v, "{f}");

        if self.config.dry_run {
            return Ok(Outcome::Planned(to_path));
        }

        match self.spawn.spawn(&mut cmd) {
            Invocation::Success { diagnostic, .. } => {
                o.lines(&diagnostic)?;
                info!(o, "Done: {}", shell::escape(to_path.as_os_str()));
                Ok(Outcome::Converted(to_path))
            }
            Invocation::NotInvocable(e) => {
                error!(o, "Error during conversion of {display}: {e}");
                Ok(Outcome::Failed)
            }
            Invocation::Failed(failure) => {
                error!(o, "Error during conversion of {display}: {failure}");
                let mut o = o.indent(1);
                o.lines(&failure.diagnostic)?;
                Ok(Outcome::Failed)
            }
        }
    }
}
