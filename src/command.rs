use crate::history::History;
use crate::lexer::ArgList;
use anyhow::Result;
use std::io::Write;

/// Process exit code as observed when waiting for an external program.
///
/// A value of 0 indicates success; any non-zero value indicates failure.
/// Signal terminations are folded in as `128 + signal`, like POSIX shells do.
pub type ExitCode = i32;

/// Continuation signal produced by every command the shell runs.
///
/// The read-eval loop keeps prompting while commands answer [`Status::Continue`]
/// and stops on the first [`Status::Terminate`]. Only `exit` terminates; the
/// exit code of an external program never influences this value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Terminate,
    Continue,
}

impl Status {
    /// Numeric form of the signal: 0 terminates the loop, 1 continues it.
    pub fn code(self) -> i32 {
        match self {
            Status::Terminate => 0,
            Status::Continue => 1,
        }
    }

    pub fn should_continue(self) -> bool {
        self != Status::Terminate
    }
}

/// What a builtin may touch while it runs.
pub struct Context<'a> {
    /// Destination for the builtin's regular output.
    pub stdout: &'a mut dyn Write,
    /// Commands entered so far, oldest first.
    pub history: &'a History,
}

/// In-process implementation of a builtin command.
///
/// `args[0]` is the builtin's own name. Recoverable failures are returned as
/// errors and reported by the dispatcher, which then continues the loop.
pub type Handler = fn(&ArgList<'_>, &mut Context<'_>) -> Result<Status>;
