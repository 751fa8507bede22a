use core::fmt;

use std::io;
use std::process::{Command, Stdio};

/// The result of running an external program to completion.
#[derive(Debug)]
pub(crate) enum Invocation {
    /// The program exited successfully. Carries what it wrote to stdout and
    /// stderr, where those were captured.
    Success { stdout: String, diagnostic: String },
    /// The program could not be started at all.
    NotInvocable(io::Error),
    /// The program was started but did not succeed.
    Failed(Failure),
}

impl Invocation {
    /// Convert the result of spawning a command into an invocation.
    pub(crate) fn from_output(result: io::Result<std::process::Output>) -> Self {
        let output = match result {
            Ok(output) => output,
            Err(e) => {
                return match e.kind() {
                    io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => {
                        Invocation::NotInvocable(e)
                    }
                    _ => Invocation::Failed(Failure {
                        code: None,
                        diagnostic: e.to_string(),
                    }),
                };
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_owned();
        let diagnostic = String::from_utf8_lossy(&output.stderr).trim().to_owned();

        if output.status.success() {
            return Invocation::Success { stdout, diagnostic };
        }

        let diagnostic = match (diagnostic.is_empty(), stdout.is_empty()) {
            (false, _) => diagnostic,
            (true, false) => stdout,
            (true, true) => output.status.to_string(),
        };

        Invocation::Failed(Failure {
            code: output.status.code(),
            diagnostic,
        })
    }
}

/// A failed invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Failure {
    /// Exit code, if the program exited normally.
    pub(crate) code: Option<i32>,
    /// Diagnostic text produced by the program or the operating system.
    pub(crate) diagnostic: String,
}

impl fmt::Display for Failure {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "exited with status {code}"),
            None => write!(f, "did not run to completion"),
        }
    }
}

/// Runs external commands.
pub(crate) trait Spawn {
    /// Run the command to completion, blocking until it exits.
    fn spawn(&mut self, cmd: &mut Command) -> Invocation;
}

/// Spawns real processes with their output captured, unless the command
/// already configures its own stdout or stderr.
pub(crate) struct System;

impl Spawn for System {
    fn spawn(&mut self, cmd: &mut Command) -> Invocation {
        cmd.stdin(Stdio::null());
        Invocation::from_output(cmd.output())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::VecDeque;
    use std::ffi::OsString;
    use std::io;
    use std::process::Command;

    use super::{Failure, Invocation, Spawn};

    /// A recorded call to [`Fake::spawn`].
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub(crate) struct Call {
        pub(crate) program: OsString,
        pub(crate) args: Vec<OsString>,
    }

    impl Call {
        /// Arguments as lossy strings, for convenient assertions.
        pub(crate) fn args(&self) -> Vec<String> {
            self.args
                .iter()
                .map(|a| a.to_string_lossy().into_owned())
                .collect()
        }
    }

    /// What the fake should answer for a single call.
    pub(crate) enum Answer {
        Success,
        NotFound,
        Fail(i32, &'static str),
    }

    /// Records calls and replays canned answers. Once the answers run out
    /// every call succeeds.
    #[derive(Default)]
    pub(crate) struct Fake {
        pub(crate) calls: Vec<Call>,
        answers: VecDeque<Answer>,
    }

    impl Fake {
        pub(crate) fn new(answers: impl IntoIterator<Item = Answer>) -> Self {
            Self {
                calls: Vec::new(),
                answers: answers.into_iter().collect(),
            }
        }
    }

    impl Spawn for Fake {
        fn spawn(&mut self, cmd: &mut Command) -> Invocation {
            self.calls.push(Call {
                program: cmd.get_program().to_owned(),
                args: cmd.get_args().map(|a| a.to_owned()).collect(),
            });

            match self.answers.pop_front().unwrap_or(Answer::Success) {
                Answer::Success => Invocation::Success {
                    stdout: String::new(),
                    diagnostic: String::new(),
                },
                Answer::NotFound => {
                    Invocation::NotInvocable(io::Error::from(io::ErrorKind::NotFound))
                }
                Answer::Fail(code, diagnostic) => Invocation::Failed(Failure {
                    code: Some(code),
                    diagnostic: diagnostic.to_owned(),
                }),
            }
        }
    }
}
