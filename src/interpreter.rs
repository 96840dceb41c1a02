use crate::builtin::Builtins;
use crate::command::{Context, ExitCode, Status};
use crate::external;
use crate::history::History;
use crate::input::LineSource;
use crate::lexer::{ArgList, split_line};
use anyhow::Result;
use log::{debug, trace};
use std::io::{self, Write};

/// Text shown before every read.
pub const PROMPT: &str = "\n> ";

/// A minimal shell that runs builtins in-process and everything else as a child process.
///
/// The interpreter owns the history ring and the writers builtins print to.
/// External programs always inherit the real standard streams.
///
/// Example
/// ```
/// use ush::{Interpreter, MemWriter, Status};
/// let out = MemWriter::new();
/// let mut sh = Interpreter::with_io(Box::new(out.clone()), Box::new(std::io::sink()));
/// assert_eq!(sh.eval_line("echo hello world\n"), Status::Continue);
/// assert_eq!(sh.eval_line("exit\n"), Status::Terminate);
/// assert_eq!(out.contents(), "hello world\n");
/// ```
pub struct Interpreter {
    history: History,
    builtins: Builtins,
    out: Box<dyn Write>,
    err: Box<dyn Write>,
}

impl Interpreter {
    /// Create an interpreter printing to the process's standard output and error.
    pub fn new() -> Self {
        Self::with_io(Box::new(io::stdout()), Box::new(io::stderr()))
    }

    /// Create an interpreter printing builtin output to `out` and diagnostics to `err`.
    pub fn with_io(out: Box<dyn Write>, err: Box<dyn Write>) -> Self {
        Self {
            history: History::new(),
            builtins: Builtins::new(),
            out,
            err,
        }
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Read, evaluate and repeat until `exit` or end of input.
    ///
    /// End of input is treated like `exit`. Errors are only returned when the
    /// line source or the shell's own output fails; failing commands are
    /// reported and the loop goes on.
    pub fn repl(&mut self, source: &mut dyn LineSource) -> Result<()> {
        loop {
            self.out.flush()?;
            let Some(line) = source.read_line(PROMPT)? else {
                debug!("end of input");
                break;
            };
            if !self.eval_line(&line).should_continue() {
                break;
            }
        }
        self.out.flush()?;
        Ok(())
    }

    /// Record one raw line in the history, split it and dispatch it.
    pub fn eval_line<S: AsRef<[u8]> + ?Sized>(&mut self, line: &S) -> Status {
        let line = line.as_ref();
        // The history keeps its own copy, taken before the line is split.
        if self.history.record(line) {
            trace!("recorded \"{}\"", line.escape_ascii());
        }
        let args = split_line(line);
        self.execute(&args)
    }

    /// Dispatch an argument list: builtins first, then external programs.
    ///
    /// An empty list is a no-op. Only the `exit` builtin yields
    /// [`Status::Terminate`]; every failure is reported on the error writer
    /// and answered with [`Status::Continue`].
    pub fn execute(&mut self, args: &ArgList<'_>) -> Status {
        let Some(name) = args.command() else {
            return Status::Continue;
        };

        let result = match self.builtins.lookup(name) {
            Some(builtin) => {
                debug!("builtin {name:?} with {} argument(s)", args.args().len());
                let mut ctx = Context {
                    stdout: &mut *self.out,
                    history: &self.history,
                };
                builtin.invoke(args, &mut ctx)
            }
            None => self.launch(args).map(|code| {
                trace!("{name:?} finished with {code}");
                Status::Continue
            }),
        };

        result.unwrap_or_else(|e| {
            self.report(&e);
            Status::Continue
        })
    }

    fn launch(&mut self, args: &ArgList<'_>) -> Result<ExitCode> {
        // Anything a builtin printed must appear before the child's output.
        self.out.flush()?;
        external::launch(args)
    }

    fn report(&mut self, error: &anyhow::Error) {
        debug!("command failed: {error:?}");
        // Nowhere left to report to if the error stream itself is broken.
        let _ = writeln!(self.err, "ush: {error:#}");
        let _ = self.err.flush();
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}
