use core::fmt;

use std::borrow::Cow;
use std::ffi::OsStr;
use std::process::Command;

/// Escape a path or argument so it can be pasted into a POSIX shell.
///
/// Invalid UTF-8 is replaced the same way as `Path::display`.
pub(crate) fn escape(s: &OsStr) -> Cow<'_, str> {
    match s.to_string_lossy() {
        Cow::Borrowed(s) => escape_str(s),
        Cow::Owned(s) => Cow::Owned(escape_str(&s).into_owned()),
    }
}

fn escape_str(s: &str) -> Cow<'_, str> {
    let Some(first) = s.find(|c| escape_in_bash(c).is_some()) else {
        return Cow::Borrowed(s);
    };

    let mut o = String::with_capacity(s.len() + 4);
    o.push_str(&s[..first]);

    for c in s[first..].chars() {
        match escape_in_bash(c) {
            Some(e) => o.push_str(e),
            None => o.push(c),
        }
    }

    Cow::Owned(o)
}

fn escape_in_bash(c: char) -> Option<&'static str> {
    match c {
        ' ' => Some("\\ "),
        '"' => Some("\\\""),
        '\'' => Some("\\'"),
        '\\' => Some("\\\\"),
        '$' => Some("\\$"),
        '`' => Some("\\`"),
        '&' => Some("\\&"),
        '|' => Some("\\|"),
        ';' => Some("\\;"),
        '<' => Some("\\<"),
        '>' => Some("\\>"),
        '!' => Some("\\!"),
        '(' => Some("\\("),
        ')' => Some("\\)"),
        '[' => Some("\\["),
        ']' => Some("\\]"),
        '*' => Some("\\*"),
        '?' => Some("\\?"),
        _ => None,
    }
}

/// Displays a command line, optionally substituting placeholders for
/// arguments which would otherwise be noisy.
pub(crate) struct FormatCommand<'a> {
    cmd: &'a Command,
    replacements: Vec<(&'a OsStr, &'static str)>,
}

impl<'a> FormatCommand<'a> {
    pub(crate) fn new(cmd: &'a Command) -> Self {
        Self {
            cmd,
            replacements: Vec::new(),
        }
    }

    /// Display `placeholder` wherever `key` appears as the program or an
    /// argument.
    pub(crate) fn replace(
        &mut self,
        key: &'a (impl AsRef<OsStr> + ?Sized),
        placeholder: &'static str,
    ) {
        self.replacements.push((key.as_ref(), placeholder));
    }

    fn write_arg(&self, f: &mut fmt::Formatter<'_>, arg: &OsStr) -> fmt::Result {
        match self.replacements.iter().find(|(key, _)| *key == arg) {
            Some((_, placeholder)) => f.write_str(placeholder),
            None => f.write_str(&escape(arg)),
        }
    }
}

impl fmt::Display for FormatCommand<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_arg(f, self.cmd.get_program())?;

        for arg in self.cmd.get_args() {
            f.write_str(" ")?;
            self.write_arg(f, arg)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::ffi::OsStr;
    use std::process::Command;

    use super::{FormatCommand, escape};

    #[test]
    fn plain_arguments_are_borrowed() {
        assert_eq!(escape(OsStr::new("track_DTS.wav")), "track_DTS.wav");
    }

    #[test]
    fn special_characters_are_escaped() {
        assert_eq!(
            escape(OsStr::new("My Song (live).wav")),
            "My\\ Song\\ \\(live\\).wav"
        );
        assert_eq!(escape(OsStr::new("it's.flac")), "it\\'s.flac");
    }

    #[test]
    #[cfg(unix)]
    fn invalid_utf8_is_shown_lossily() {
        use std::os::unix::ffi::OsStrExt;

        let name = OsStr::from_bytes(b"bad\xff name.wav");
        assert_eq!(escape(name), "bad\u{fffd}\\ name.wav");
    }

    #[test]
    fn format_with_placeholders() {
        let mut cmd = Command::new("/usr/bin/sox");
        cmd.args(["in put.wav", "out.wav", "remix", "1", "2", "1", "2"]);

        let mut f = FormatCommand::new(&cmd);
        assert_eq!(
            f.to_string(),
            "/usr/bin/sox in\\ put.wav out.wav remix 1 2 1 2"
        );

        f.replace("/usr/bin/sox", "<sox>");
        f.replace("in put.wav", "<from>");
        f.replace("out.wav", "<to>");
        assert_eq!(f.to_string(), "<sox> <from> <to> remix 1 2 1 2");
    }
}
