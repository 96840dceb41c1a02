//! A small interactive command-line shell.
//!
//! Each line read from the user is split into arguments, recorded in a bounded
//! history ring and dispatched either to an in-process builtin (`cd`, `help`,
//! `exit`, `echo`, `history`, `pwd`) or to an external program that the shell
//! launches and waits for.
//!
//! The main entry point is [`Interpreter`], which owns the history and runs the
//! read-eval loop over any [`LineSource`]. The public modules [`lexer`],
//! [`history`] and [`command`] expose the building blocks for embedding.

mod builtin;
pub mod command;
mod external;
pub mod history;
mod input;
mod interpreter;
mod io_adapters;
pub mod lexer;

pub use builtin::{Builtin, Builtins};
pub use command::{ExitCode, Status};
pub use history::History;
pub use input::{Editor, LineSource, ReaderSource};
pub use interpreter::{Interpreter, PROMPT};
pub use io_adapters::MemWriter;

/// Report an unrecoverable resource failure and terminate the process.
///
/// Used wherever growing a buffer fails; the shell makes no attempt to
/// continue with partially built state.
pub fn fatal(message: &str) -> ! {
    log::error!("fatal: {message}");
    eprintln!("ush: {message}");
    std::process::exit(1)
}
