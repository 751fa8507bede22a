use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;

/// A single entry in a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Entry {
    pub(crate) name: OsString,
    pub(crate) is_dir: bool,
}

/// The parts of a filesystem needed to expand patterns and pick files to
/// convert.
pub(crate) trait Filesystem {
    /// Test if anything exists at the given path, without following a final
    /// symbolic link.
    fn exists(&self, path: &Path) -> bool;

    /// Test if the path is a directory, following symbolic links.
    fn is_dir(&self, path: &Path) -> bool;

    /// Test if the path is a regular file, following symbolic links.
    fn is_file(&self, path: &Path) -> bool;

    /// List a directory sorted by name. Unreadable directories are empty.
    fn read_dir(&self, dir: &Path) -> Vec<Entry>;

    /// Every directory below `dir` relative to it, sorted and starting with
    /// `dir` itself as an empty path. Hidden directories are not descended
    /// into.
    fn subdirs(&self, dir: &Path) -> Vec<PathBuf>;
}

/// The real filesystem.
pub(crate) struct Disk;

impl Filesystem for Disk {
    #[inline]
    fn exists(&self, path: &Path) -> bool {
        fs::symlink_metadata(path).is_ok()
    }

    #[inline]
    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    #[inline]
    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read_dir(&self, dir: &Path) -> Vec<Entry> {
        let Ok(entries) = fs::read_dir(dir) else {
            return Vec::new();
        };

        let mut out = Vec::new();

        for e in entries.flatten() {
            out.push(Entry {
                is_dir: e.path().is_dir(),
                name: e.file_name(),
            });
        }

        out.sort_by(|a, b| a.name.cmp(&b.name));
        out
    }

    fn subdirs(&self, dir: &Path) -> Vec<PathBuf> {
        let walk = WalkBuilder::new(dir)
            .standard_filters(false)
            .hidden(true)
            .follow_links(true)
            .sort_by_file_name(|a, b| a.cmp(b))
            .build();

        let mut out = Vec::new();

        for entry in walk.flatten() {
            if !entry.file_type().is_some_and(|t| t.is_dir()) {
                continue;
            }

            if let Ok(relative) = entry.path().strip_prefix(dir) {
                out.push(relative.to_path_buf());
            }
        }

        out
    }
}
