use std::borrow::Cow;
use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

use anyhow::Result;
use globset::{GlobBuilder, GlobMatcher};

use crate::filesystem::Filesystem;
use crate::out::{Out, blank, warn};

/// Expands wildcard patterns against a filesystem.
pub(crate) struct Expander<'a> {
    fs: &'a dyn Filesystem,
    recursive: bool,
}

/// How a single path component of a pattern is matched.
enum Segment {
    /// Matched verbatim.
    Literal,
    /// Matches directory entries using a glob.
    Glob(GlobMatcher),
    /// `**` which matches any number of nested directories.
    Recursive,
}

impl<'a> Expander<'a> {
    pub(crate) fn new(fs: &'a dyn Filesystem, recursive: bool) -> Self {
        Self { fs, recursive }
    }

    #[inline]
    pub(crate) fn fs(&self) -> &'a dyn Filesystem {
        self.fs
    }

    /// Expand a single pattern into matching paths.
    ///
    /// A pattern without any wildcards matches itself if it exists. Otherwise
    /// it is expanded one component at a time, where every component but the
    /// last only matches directories. Matches are sorted by name within each
    /// directory, and names starting with `.` are only matched by components
    /// which also start with `.`.
    pub(crate) fn expand(&self, pattern: &Path) -> Vec<PathBuf> {
        if !has_magic(pattern.as_os_str()) {
            if self.fs.exists(pattern) {
                return vec![pattern.to_path_buf()];
            }

            return Vec::new();
        }

        let components = pattern.components().collect::<Vec<_>>();
        let last = components.len().saturating_sub(1);

        let mut current = vec![PathBuf::new()];

        for (n, component) in components.into_iter().enumerate() {
            let Component::Normal(name) = component else {
                for path in &mut current {
                    path.push(component.as_os_str());
                }

                continue;
            };

            let dir_only = n != last;
            let mut next = Vec::new();

            match self.segment(name) {
                Segment::Literal => {
                    for base in current {
                        let path = base.join(name);

                        let keep = if dir_only {
                            self.fs.is_dir(&path)
                        } else {
                            self.fs.exists(&path)
                        };

                        if keep {
                            next.push(path);
                        }
                    }
                }
                Segment::Glob(matcher) => {
                    for base in current {
                        self.matching(&base, name, dir_only, &mut next, |entry| {
                            matcher.is_match(entry)
                        });
                    }
                }
                Segment::Recursive => {
                    for base in current {
                        for relative in self.fs.subdirs(dir_or_cwd(&base)) {
                            let dir = if relative.as_os_str().is_empty() {
                                base.clone()
                            } else {
                                base.join(relative)
                            };

                            if dir_only {
                                next.push(dir);
                            } else {
                                self.matching(&dir, name, false, &mut next, |_| true);
                            }
                        }
                    }
                }
            }

            current = next;

            if current.is_empty() {
                break;
            }
        }

        current
    }

    fn segment(&self, name: &OsStr) -> Segment {
        let Some(name) = name.to_str() else {
            return Segment::Literal;
        };

        if self.recursive && name == "**" {
            return Segment::Recursive;
        }

        if !has_magic(OsStr::new(name)) {
            return Segment::Literal;
        }

        let glob = GlobBuilder::new(&literal_braces(name))
            .literal_separator(true)
            .backslash_escape(false)
            .case_insensitive(cfg!(windows))
            .build();

        match glob {
            Ok(glob) => Segment::Glob(glob.compile_matcher()),
            Err(..) => Segment::Literal,
        }
    }

    fn matching(
        &self,
        base: &Path,
        pattern: &OsStr,
        dir_only: bool,
        out: &mut Vec<PathBuf>,
        is_match: impl Fn(&OsStr) -> bool,
    ) {
        let hidden_ok = pattern.as_encoded_bytes().starts_with(b".");

        for entry in self.fs.read_dir(dir_or_cwd(base)) {
            if dir_only && !entry.is_dir {
                continue;
            }

            if !hidden_ok && entry.name.as_encoded_bytes().starts_with(b".") {
                continue;
            }

            if is_match(entry.name.as_os_str()) {
                out.push(base.join(&entry.name));
            }
        }
    }
}

/// Expand every pattern in order, warning about patterns which match nothing.
///
/// Paths matched by more than one pattern are kept every time they match.
pub(crate) fn expand_all(
    o: &mut Out<'_>,
    expander: &Expander<'_>,
    patterns: &[PathBuf],
) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for pattern in patterns {
        let matches = expander.expand(pattern);

        if matches.is_empty() {
            warn!(o, "No files matched for pattern: {}", pattern.display());
            continue;
        }

        blank!(o => v, "{}: {} match(es)", pattern.display(), matches.len());
        files.extend(matches);
    }

    Ok(files)
}

/// Test if the pattern contains any wildcard characters.
fn has_magic(pattern: &OsStr) -> bool {
    pattern
        .as_encoded_bytes()
        .iter()
        .any(|b| matches!(b, b'*' | b'?' | b'['))
}

/// Rewrite `{` and `}` outside of character classes into classes, so that
/// they match literally instead of forming alternations.
fn literal_braces(name: &str) -> Cow<'_, str> {
    if !name.contains(['{', '}']) {
        return Cow::Borrowed(name);
    }

    let mut o = String::with_capacity(name.len() + 4);
    let mut chars = name.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '[' => {
                o.push(c);

                if let Some(&c @ ('!' | '^')) = chars.peek() {
                    o.push(c);
                    chars.next();
                }

                // A leading `]` is part of the class.
                if let Some(&']') = chars.peek() {
                    o.push(']');
                    chars.next();
                }

                for c in chars.by_ref() {
                    o.push(c);

                    if c == ']' {
                        break;
                    }
                }
            }
            '{' => o.push_str("[{]"),
            '}' => o.push_str("[}]"),
            c => o.push(c),
        }
    }

    Cow::Owned(o)
}

fn dir_or_cwd(path: &Path) -> &Path {
    if path.as_os_str().is_empty() {
        Path::new(".")
    } else {
        path
    }
}
