//! A module implementing lexical analysis (tokenization) of shell input lines.
//!
//! The shell has no quoting, grouping or substitution: a line is split on any
//! run of [`DELIMITERS`] and every non-empty piece becomes one argument. Quote
//! and parenthesis characters are plain separators here.
//!
//! Splitting works on raw bytes: arguments are handed to programs exactly as
//! they were typed, whether or not they are valid UTF-8.

use crate::fatal;
use std::ffi::OsStr;
use std::ops::Index;
use std::os::unix::ffi::OsStrExt;
use std::slice;

/// Bytes that separate arguments: space, double quote, tab, carriage
/// return, newline, bell and both parentheses.
pub const DELIMITERS: [u8; 8] = *b" \"\t\r\n\x07()";

/// Number of argument slots reserved before the first token is stored.
pub const INITIAL_CAPACITY: usize = 64;

/// Arguments of one input line, in left-to-right order.
///
/// Every argument borrows from the line it was split from, so an `ArgList`
/// cannot outlive that line. An empty list stands for an empty command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgList<'a> {
    tokens: Vec<&'a OsStr>,
}

impl<'a> ArgList<'a> {
    fn new() -> Self {
        let mut tokens = Vec::new();
        if tokens.try_reserve_exact(INITIAL_CAPACITY).is_err() {
            fatal("allocation error");
        }
        Self { tokens }
    }

    /// Appends a token, doubling the slot count when the list is full.
    fn push(&mut self, token: &'a OsStr) {
        if self.tokens.len() == self.tokens.capacity() {
            let extra = self.tokens.capacity().max(1);
            if self.tokens.try_reserve_exact(extra).is_err() {
                fatal("allocation error");
            }
        }
        self.tokens.push(token);
    }

    /// The command name, or `None` when the line held no arguments at all.
    pub fn command(&self) -> Option<&'a OsStr> {
        self.tokens.first().copied()
    }

    /// Everything after the command name.
    pub fn args(&self) -> &[&'a OsStr] {
        self.tokens.get(1..).unwrap_or(&[])
    }

    pub fn as_slice(&self) -> &[&'a OsStr] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Number of slots currently reserved.
    pub fn capacity(&self) -> usize {
        self.tokens.capacity()
    }

    pub fn iter(&self) -> slice::Iter<'_, &'a OsStr> {
        self.tokens.iter()
    }
}

impl<'a> Index<usize> for ArgList<'a> {
    type Output = &'a OsStr;

    fn index(&self, index: usize) -> &Self::Output {
        &self.tokens[index]
    }
}

impl<'a, 'b> IntoIterator for &'b ArgList<'a> {
    type Item = &'b &'a OsStr;
    type IntoIter = slice::Iter<'b, &'a OsStr>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

pub fn is_delimiter(byte: &u8) -> bool {
    DELIMITERS.contains(byte)
}

/// Split `line` into its arguments.
///
/// The line itself is left untouched, so a caller that needs an owned copy
/// (the history ring) can take it before or after splitting.
///
/// # Examples
/// ```
/// use ush::lexer::split_line;
/// let args = split_line("echo  a b\tc\n");
/// assert_eq!(args.as_slice(), ["echo", "a", "b", "c"]);
/// ```
pub fn split_line<S: AsRef<[u8]> + ?Sized>(line: &S) -> ArgList<'_> {
    let mut args = ArgList::new();
    for token in line
        .as_ref()
        .split(is_delimiter)
        .filter(|token| !token.is_empty())
    {
        args.push(OsStr::from_bytes(token));
    }
    args
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splits_on_runs_of_whitespace() {
        let args = split_line("echo  a b\tc");
        assert_eq!(args.as_slice(), ["echo", "a", "b", "c"]);
        assert_eq!(args.command(), Some(OsStr::new("echo")));
        assert_eq!(args.args(), ["a", "b", "c"]);
    }

    #[test]
    fn test_only_delimiters_is_empty_command() {
        let args = split_line(" \t\"()\x07\r\n");
        assert!(args.is_empty());
        assert_eq!(args.command(), None);
        assert!(args.args().is_empty());
    }

    #[test]
    fn test_empty_line_is_empty_command() {
        assert_eq!(split_line("").command(), None);
        assert_eq!(split_line("\n").command(), None);
    }

    #[test]
    fn test_quotes_and_parens_are_plain_separators() {
        let args = split_line("echo \"hello world\"(x)y\n");
        assert_eq!(args.as_slice(), ["echo", "hello", "world", "x", "y"]);
    }

    #[test]
    fn test_preserves_case_and_other_punctuation() {
        let args = split_line("Grep -i 'Foo' a|b;c\r\n");
        assert_eq!(args.as_slice(), ["Grep", "-i", "'Foo'", "a|b;c"]);
    }

    #[test]
    fn test_tokens_borrow_from_the_line() {
        let line = String::from("ls -l /tmp\n");
        let args = split_line(&line);
        let range = line.as_bytes().as_ptr_range();
        for token in &args {
            assert!(range.contains(&token.as_bytes().as_ptr()));
        }
        assert_eq!(args[2], "/tmp");
    }

    #[test]
    fn test_starts_with_initial_capacity() {
        assert!(split_line("true").capacity() >= INITIAL_CAPACITY);
    }

    #[test]
    fn test_grows_past_initial_capacity() {
        let line = (0..200).map(|i| i.to_string()).collect::<Vec<_>>().join(" ");
        let args = split_line(&line);
        assert_eq!(args.len(), 200);
        assert!(args.capacity() >= 200);
        assert_eq!(args[0], "0");
        assert_eq!(args[64], "64");
        assert_eq!(args[199], "199");
    }

    #[test]
    fn test_delimiter_set() {
        for byte in DELIMITERS {
            assert!(is_delimiter(&byte));
        }
        assert!(!is_delimiter(&b'\''));
        assert!(!is_delimiter(&b'|'));
    }

    #[test]
    fn test_non_utf8_bytes_are_kept_verbatim() {
        let args = split_line(b"touch \xff\xfe.txt (x\x80)\n".as_slice());
        assert_eq!(args.len(), 3);
        assert_eq!(args[1].as_bytes(), b"\xff\xfe.txt");
        assert_eq!(args[2].as_bytes(), b"x\x80");
    }
}
