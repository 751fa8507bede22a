use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::Result;

use crate::expand::Expander;
use crate::out::{Out, blank, error};
use crate::process::{Invocation, Spawn};
use crate::shell;

/// Where SoX usually ends up when installed on Windows.
const WINDOWS_SEARCH: [&str; 2] = [
    r"C:\Program Files (x86)\sox-*\sox.exe",
    r"C:\Program Files\sox-*\sox.exe",
];

const DOWNLOAD_URL: &str = "http://sox.sourceforge.net/";

/// The platform family, which decides how we search and what we suggest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Platform {
    Posix,
    Windows,
    Other,
}

impl Platform {
    pub(crate) fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else if cfg!(unix) {
            Platform::Posix
        } else {
            Platform::Other
        }
    }
}

/// A located conversion tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Tool {
    /// The program to invoke, either a bare command name or a path.
    pub(crate) program: PathBuf,
    /// The identity reported by `--version`, if it was queried.
    pub(crate) version: Option<String>,
}

/// Finds the conversion tool.
pub(crate) struct Locator<'a> {
    program: &'a Path,
    platform: Platform,
    search: Vec<PathBuf>,
}

impl<'a> Locator<'a> {
    pub(crate) fn new(program: &'a Path, platform: Platform) -> Self {
        Self {
            program,
            platform,
            search: WINDOWS_SEARCH.iter().map(PathBuf::from).collect(),
        }
    }

    /// Replace the patterns searched when the program cannot be invoked.
    #[cfg(test)]
    pub(crate) fn with_search<I>(mut self, search: I) -> Self
    where
        I: IntoIterator<Item: Into<PathBuf>>,
    {
        self.search = search.into_iter().map(Into::into).collect();
        self
    }

    /// Locate the tool.
    ///
    /// The program is first asked for its version, which succeeds if it can
    /// be found through the regular executable search path. On Windows, if
    /// the program could not be invoked at all, well-known installation
    /// directories are searched in order.
    pub(crate) fn locate(&self, spawn: &mut dyn Spawn, expander: &Expander<'_>) -> Option<Tool> {
        let mut cmd = Command::new(self.program);
        cmd.arg("--version");

        match spawn.spawn(&mut cmd) {
            Invocation::Success { stdout, diagnostic } => {
                let version = first_line(&stdout).or_else(|| first_line(&diagnostic));

                return Some(Tool {
                    program: self.program.to_path_buf(),
                    version,
                });
            }
            Invocation::NotInvocable(..) if self.platform == Platform::Windows => {}
            _ => return None,
        }

        for pattern in &self.search {
            for path in expander.expand(pattern) {
                if expander.fs().is_file(&path) {
                    return Some(Tool {
                        program: path,
                        version: None,
                    });
                }
            }
        }

        None
    }
}

fn first_line(s: &str) -> Option<String> {
    let line = s.lines().map(str::trim).find(|l| !l.is_empty())?;
    Some(line.to_owned())
}

/// Explain how to install the tool on the given platform.
pub(crate) fn remediation(o: &mut Out<'_>, platform: Platform, program: &Path) -> Result<()> {
    match platform {
        Platform::Posix => {
            error!(o, "Error: SoX is not installed or not in PATH.");
            blank!(o, "On Linux, you can install it with your package manager. For example:");

            {
                let mut o = o.indent(1);
                blank!(o, "On Debian/Ubuntu-based systems: sudo apt install sox");
                blank!(o, "On Red Hat/Fedora/CentOS-based systems: sudo dnf install sox");
                blank!(o, "On Arch-based systems: sudo pacman -S sox");
            }

            blank!(o, "On macOS, you can install it with: brew install sox");
        }
        Platform::Windows | Platform::Other => {
            error!(o, "Error: SoX is not installed.");
            blank!(o, "Download and install SoX from: {DOWNLOAD_URL}");
        }
    }

    if program != Path::new("sox") {
        let mut o = o.indent(1);
        blank!(o, "tried: {}", shell::escape(program.as_os_str()));
    }

    Ok(())
}
