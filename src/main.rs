use anyhow::Result;
use argh::FromArgs;
use std::io::{self, IsTerminal};
use ush::{Editor, Interpreter, ReaderSource};

#[derive(FromArgs)]
/// A small interactive Linux shell with a handful of builtins and a
/// twenty-entry command history.
struct Options {
    #[argh(switch)]
    /// do not print the welcome and farewell banners.
    no_banner: bool,

    #[argh(switch, short = 'v')]
    /// log dispatch and process activity to standard error.
    verbose: bool,
}

fn main() -> Result<()> {
    let options: Options = argh::from_env();

    let default_filter = if options.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    if !options.no_banner {
        print_banner();
    }

    let mut sh = Interpreter::new();
    if io::stdin().is_terminal() {
        let mut editor = Editor::new()?;
        sh.repl(&mut editor)?;
    } else {
        log::debug!("standard input is not a terminal, reading lines as-is");
        let mut source = ReaderSource::new(io::stdin().lock(), io::stdout());
        sh.repl(&mut source)?;
    }

    if !options.no_banner {
        println!("\nGoodBye!!!");
    }
    Ok(())
}

fn print_banner() {
    let rule = "*".repeat(80);
    println!("{rule}");
    println!(" Welcome to Linux Shell.");
    print!("{rule}");
}
