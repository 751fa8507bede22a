use std::path::PathBuf;

/// Configuration for conversions.
pub(crate) struct Config {
    pub(crate) dry_run: bool,
    pub(crate) paths: Vec<PathBuf>,
    pub(crate) recursive: bool,
    pub(crate) sox: PathBuf,
    pub(crate) suffix: String,
    pub(crate) verbose: bool,
}

#[cfg(test)]
impl Config {
    pub(crate) fn new<I>(paths: I) -> Self
    where
        I: IntoIterator<Item: Into<PathBuf>>,
    {
        Self {
            dry_run: false,
            paths: paths.into_iter().map(Into::into).collect(),
            recursive: false,
            sox: PathBuf::from("sox"),
            suffix: crate::convert::SUFFIX.to_owned(),
            verbose: false,
        }
    }
}
