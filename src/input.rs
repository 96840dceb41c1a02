use anyhow::{Context, Result};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::io::{BufRead, Write};

/// Where the read-eval loop gets its lines from.
pub trait LineSource {
    /// Show `prompt` and read one line.
    ///
    /// Returns the raw bytes of the line, or `Ok(None)` at end of input.
    /// A returned line may still carry its terminator.
    fn read_line(&mut self, prompt: &str) -> Result<Option<Vec<u8>>>;
}

/// Interactive terminal input with line editing.
///
/// Lines are also kept in the editor's own recall list so the arrow keys work;
/// that list is independent of the shell's `history` ring.
pub struct Editor {
    editor: DefaultEditor,
}

impl Editor {
    pub fn new() -> Result<Self> {
        let editor = DefaultEditor::new().context("failed to set up the line editor")?;
        Ok(Self { editor })
    }
}

impl LineSource for Editor {
    fn read_line(&mut self, prompt: &str) -> Result<Option<Vec<u8>>> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    self.editor.add_history_entry(line.as_str())?;
                }
                Ok(Some(line.into_bytes()))
            }
            // Ctrl-C drops the pending line and asks again.
            Err(ReadlineError::Interrupted) => Ok(Some(Vec::new())),
            Err(ReadlineError::Eof) => Ok(None),
            Err(err) => Err(anyhow::Error::new(err).context("failed to read input")),
        }
    }
}

/// Plain line reader, used when standard input is not a terminal.
///
/// The prompt is written to `prompt_out` before every read. Lines are passed
/// on as raw bytes, valid UTF-8 or not.
pub struct ReaderSource<R, W> {
    reader: R,
    prompt_out: W,
}

impl<R: BufRead, W: Write> ReaderSource<R, W> {
    pub fn new(reader: R, prompt_out: W) -> Self {
        Self { reader, prompt_out }
    }
}

impl<R: BufRead, W: Write> LineSource for ReaderSource<R, W> {
    fn read_line(&mut self, prompt: &str) -> Result<Option<Vec<u8>>> {
        self.prompt_out.write_all(prompt.as_bytes())?;
        self.prompt_out.flush()?;

        let mut buf = Vec::new();
        let n = self
            .reader
            .read_until(b'\n', &mut buf)
            .context("failed to read input")?;
        if n == 0 {
            return Ok(None);
        }
        Ok(Some(buf))
    }
}
