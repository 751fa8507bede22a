use core::fmt;

use std::path::Path;

/// An audio format that can be remixed into true stereo.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) enum Format {
    Aiff,
    Flac,
    Ogg,
    Opus,
    Wav,
    WavPack,
}

impl Format {
    /// Human readable list of supported formats, as shown in usage.
    pub(crate) const SUPPORTED: &'static str = "WAV, FLAC, AIFF (or AIF), OGG, OPUS, WAVPACK";

    /// Look up a format by extension, ignoring case.
    pub(crate) fn from_ext(ext: &str) -> Option<Format> {
        match ext.to_ascii_lowercase().as_str() {
            "aif" | "aiff" => Some(Format::Aiff),
            "flac" => Some(Format::Flac),
            "ogg" => Some(Format::Ogg),
            "opus" => Some(Format::Opus),
            "wav" => Some(Format::Wav),
            "wv" => Some(Format::WavPack),
            _ => None,
        }
    }

    /// Look up the format of a path by its extension.
    pub(crate) fn from_path(path: &Path) -> Option<Format> {
        Self::from_ext(path.extension()?.to_str()?)
    }

    pub(crate) fn name(&self) -> &'static str {
        match self {
            Format::Aiff => "AIFF",
            Format::Flac => "FLAC",
            Format::Ogg => "OGG",
            Format::Opus => "OPUS",
            Format::Wav => "WAV",
            Format::WavPack => "WAVPACK",
        }
    }
}

impl fmt::Display for Format {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.name().fmt(f)
    }
}
