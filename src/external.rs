use crate::command::ExitCode;
use crate::lexer::ArgList;
use anyhow::{Context, Result, anyhow};
use log::debug;
use std::os::unix::process::ExitStatusExt;
use std::process::{Command, ExitStatus};

/// Run an external program and block until it has terminated.
///
/// `args[0]` is resolved through the inherited `PATH` (or used as a path when it
/// contains a slash) and the whole list is passed on as the program's argument
/// vector. The child inherits standard streams, environment and working
/// directory, and is reaped before this returns.
///
/// Failing to start the program at all (unknown command, permission denied,
/// no process slots left) is returned as an error; a program that runs and
/// fails is not an error and only yields its exit code.
pub fn launch(args: &ArgList<'_>) -> Result<ExitCode> {
    let finished = run(args)?;
    debug!("pid {} exited with {}", finished.pid, finished.code);
    Ok(finished.code)
}

/// A child that has been waited for.
#[derive(Debug, Clone, Copy)]
struct Finished {
    pid: u32,
    code: ExitCode,
}

fn run(args: &ArgList<'_>) -> Result<Finished> {
    let program = args.command().ok_or_else(|| anyhow!("empty command"))?;
    let shown = program.to_string_lossy();

    let mut child = Command::new(program)
        .args(args.args())
        .spawn()
        .with_context(|| shown.to_string())?;
    let pid = child.id();
    debug!("launched `{shown}` as pid {pid}");

    let exit_status = child
        .wait()
        .with_context(|| format!("{shown}: wait for pid {pid}"))?;
    let code = match exit_status.code() {
        Some(x) => x,
        None => terminated_by_signal(exit_status),
    };
    Ok(Finished { pid, code })
}

fn terminated_by_signal(exit_status: ExitStatus) -> ExitCode {
    if let Some(signal) = ExitStatusExt::signal(&exit_status) {
        128 + signal
    } else if ExitStatusExt::core_dumped(&exit_status) {
        255
    } else {
        -1
    }
}
