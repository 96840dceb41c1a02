use crate::command::{Context, Handler, Status};
use crate::lexer::ArgList;
use anyhow::{Context as _, Result, anyhow};
use log::debug;
use std::env;
use std::ffi::OsStr;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

/// A command implemented inside the shell process.
#[derive(Clone, Copy)]
pub struct Builtin {
    name: &'static str,
    handler: Handler,
}

impl Builtin {
    /// Canonical name of the command, e.g. "echo" or "cd".
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Runs the handler with the full argument list, `args[0]` included.
    pub fn invoke(&self, args: &ArgList<'_>, ctx: &mut Context<'_>) -> Result<Status> {
        (self.handler)(args, ctx)
    }
}

impl std::fmt::Debug for Builtin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Builtin").field("name", &self.name).finish()
    }
}

/// The builtin set, in the order `help` lists them. Closed at compile time.
static TABLE: [Builtin; 6] = [
    Builtin { name: "cd", handler: cd },
    Builtin { name: "help", handler: help },
    Builtin { name: "exit", handler: exit },
    Builtin { name: "echo", handler: echo },
    Builtin { name: "history", handler: history },
    Builtin { name: "pwd", handler: pwd },
];

/// Name to handler mapping consulted before any external program is tried.
#[derive(Debug, Clone, Copy)]
pub struct Builtins {
    table: &'static [Builtin],
}

impl Builtins {
    pub fn new() -> Self {
        Self { table: &TABLE }
    }

    /// Exact, case-sensitive lookup by command name.
    pub fn lookup<S: AsRef<OsStr> + ?Sized>(&self, name: &S) -> Option<&'static Builtin> {
        let name = name.as_ref();
        self.table.iter().find(|builtin| name == builtin.name)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + use<> {
        let table = self.table;
        table.iter().map(|builtin| builtin.name)
    }
}

impl Default for Builtins {
    fn default() -> Self {
        Self::new()
    }
}

/// Change the working directory of the shell and of every program it launches later.
fn cd(args: &ArgList<'_>, _ctx: &mut Context<'_>) -> Result<Status> {
    let Some(dir) = args.args().first() else {
        return Err(anyhow!("expected argument with \"cd\""));
    };
    let dir = Path::new(dir);
    env::set_current_dir(dir).with_context(|| format!("cd: {}", dir.display()))?;
    debug!("working directory is now {}", dir.display());
    Ok(Status::Continue)
}

fn help(_args: &ArgList<'_>, ctx: &mut Context<'_>) -> Result<Status> {
    let out = &mut *ctx.stdout;
    writeln!(out, "Linux Shell")?;
    writeln!(
        out,
        "How to Use Shell: Type the commands followed by arguments(if any) and press Enter."
    )?;
    writeln!(out, "Following are the builtin commands :")?;
    for name in Builtins::new().names() {
        writeln!(out, "\t{name}")?;
    }
    Ok(Status::Continue)
}

fn exit(_args: &ArgList<'_>, _ctx: &mut Context<'_>) -> Result<Status> {
    Ok(Status::Terminate)
}

/// Write the arguments separated by single spaces, then a newline.
fn echo(args: &ArgList<'_>, ctx: &mut Context<'_>) -> Result<Status> {
    for (index, arg) in args.args().iter().enumerate() {
        if index > 0 {
            ctx.stdout.write_all(b" ")?;
        }
        ctx.stdout.write_all(arg.as_bytes())?;
    }
    ctx.stdout.write_all(b"\n")?;
    Ok(Status::Continue)
}

fn history(_args: &ArgList<'_>, ctx: &mut Context<'_>) -> Result<Status> {
    ctx.history.list(&mut *ctx.stdout)?;
    Ok(Status::Continue)
}

/// Print the working directory. No newline: the next prompt starts with one.
fn pwd(_args: &ArgList<'_>, ctx: &mut Context<'_>) -> Result<Status> {
    let dir = env::current_dir().context("pwd")?;
    ctx.stdout.write_all(dir.as_os_str().as_bytes())?;
    Ok(Status::Continue)
}
