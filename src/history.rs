//! Bounded ring of previously entered command lines.

use crate::fatal;
use crate::lexer::split_line;
use log::trace;
use std::ffi::{OsStr, OsString};
use std::io::{self, Write};
use std::os::unix::ffi::{OsStrExt, OsStringExt};

/// Number of lines the shell remembers.
pub const HISTORY_CAPACITY: usize = 20;

/// Fixed-size circular buffer of entered lines, oldest entries evicted first.
///
/// `cursor` always points at the slot that will be written next, which is
/// also the oldest retained entry once the ring has wrapped. Walking forward
/// from the cursor therefore visits entries oldest to newest; slots that were
/// never written are skipped.
#[derive(Debug, Clone)]
pub struct History {
    slots: Box<[Option<OsString>]>,
    cursor: usize,
}

impl History {
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }

    /// Create a ring with `capacity` slots.
    ///
    /// # Panics
    /// Panics when `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "history capacity must be non-zero");
        Self {
            slots: vec![None; capacity].into_boxed_slice(),
            cursor: 0,
        }
    }

    /// Remember `line` if it holds a command.
    ///
    /// The entry is an independent copy of the raw bytes with the line
    /// terminator removed. Lines without any argument are ignored and leave
    /// the cursor where it was. Returns whether the line was stored.
    pub fn record<S: AsRef<[u8]> + ?Sized>(&mut self, line: &S) -> bool {
        let line = line.as_ref();
        if split_line(line).command().is_none() {
            return false;
        }

        let text = strip_terminator(line);
        let mut entry = Vec::new();
        if entry.try_reserve_exact(text.len()).is_err() {
            fatal("allocation error");
        }
        entry.extend_from_slice(text);
        let entry = OsString::from_vec(entry);

        trace!("history[{}] <- {:?}", self.cursor, entry);
        self.slots[self.cursor] = Some(entry);
        self.cursor = (self.cursor + 1) % self.slots.len();
        true
    }

    /// Entries from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &OsStr> + '_ {
        let (newer, older) = self.slots.split_at(self.cursor);
        older
            .iter()
            .chain(newer.iter())
            .filter_map(|slot| slot.as_deref())
    }

    /// Write the numbered listing printed by the `history` builtin.
    ///
    /// Numbers start at 1 for the oldest retained entry and are contiguous
    /// regardless of how many lines were entered in total.
    pub fn list(&self, out: &mut dyn Write) -> io::Result<()> {
        for (index, entry) in self.iter().enumerate() {
            write!(out, "{:4}   ", index + 1)?;
            out.write_all(entry.as_bytes())?;
            out.write_all(b"\n")?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Index of the slot the next entry will be written to.
    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

fn strip_terminator(line: &[u8]) -> &[u8] {
    match line.strip_suffix(b"\n") {
        Some(rest) => rest.strip_suffix(b"\r").unwrap_or(rest),
        None => line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(history: &History) -> String {
        let mut out = Vec::new();
        history.list(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn entries(history: &History) -> Vec<&str> {
        history.iter().map(|entry| entry.to_str().unwrap()).collect()
    }

    #[test]
    fn test_new_history_is_empty() {
        let history = History::new();
        assert!(history.is_empty());
        assert_eq!(history.len(), 0);
        assert_eq!(history.capacity(), HISTORY_CAPACITY);
        assert_eq!(history.cursor(), 0);
        assert_eq!(listing(&history), "");
    }

    #[test]
    fn test_fewer_than_capacity_listed_without_gaps() {
        let mut history = History::new();
        for i in 1..=5 {
            assert!(history.record(&format!("echo {i}\n")));
        }

        assert_eq!(history.len(), 5);
        assert_eq!(
            listing(&history),
            "   1   echo 1\n   2   echo 2\n   3   echo 3\n   4   echo 4\n   5   echo 5\n"
        );
    }

    #[test]
    fn test_keeps_most_recent_entries_oldest_first() {
        let mut history = History::new();
        for i in 1..=47 {
            history.record(&format!("cmd{i}\n"));
        }

        let expected: Vec<String> = (28..=47).map(|i| format!("cmd{i}")).collect();
        assert_eq!(entries(&history), expected);

        let text = listing(&history);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), HISTORY_CAPACITY);
        assert_eq!(lines[0], "   1   cmd28");
        assert_eq!(lines[19], "  20   cmd47");
    }

    #[test]
    fn test_exactly_full_ring_wraps_cursor() {
        let mut history = History::new();
        for i in 0..HISTORY_CAPACITY {
            history.record(&format!("c{i}"));
        }
        assert_eq!(history.cursor(), 0);
        assert_eq!(history.iter().next(), Some(OsStr::new("c0")));
        assert_eq!(history.iter().last(), Some(OsStr::new("c19")));
    }

    #[test]
    fn test_overwrites_oldest_slot() {
        let mut history = History::with_capacity(3);
        for line in ["a", "b", "c", "d"] {
            history.record(line);
        }
        assert_eq!(history.len(), 3);
        assert_eq!(entries(&history), ["b", "c", "d"]);
        assert_eq!(history.cursor(), 1);
    }

    #[test]
    fn test_empty_command_not_recorded() {
        let mut history = History::new();
        history.record("ls\n");
        let cursor = history.cursor();

        assert!(!history.record("\n"));
        assert!(!history.record("  \t ( ) \"\n"));
        assert!(!history.record(""));

        assert_eq!(history.cursor(), cursor);
        assert_eq!(listing(&history), "   1   ls\n");
    }

    #[test]
    fn test_entry_is_raw_line_without_terminator() {
        let mut history = History::new();
        history.record("echo  \"a\"  (b)\r\n");
        assert_eq!(entries(&history), ["echo  \"a\"  (b)"]);
    }

    #[test]
    fn test_entry_keeps_non_utf8_bytes() {
        let mut history = History::new();
        assert!(history.record(b"touch \xff\n".as_slice()));
        assert_eq!(history.iter().next().unwrap().as_bytes(), b"touch \xff");

        let mut out = Vec::new();
        history.list(&mut out).unwrap();
        assert_eq!(out, b"   1   touch \xff\n");
    }

    #[test]
    fn test_entry_outlives_source_line() {
        let mut history = History::new();
        {
            let line = String::from("pwd\n");
            history.record(&line);
        }
        assert_eq!(history.iter().next(), Some(OsStr::new("pwd")));
    }

    #[test]
    #[should_panic(expected = "history capacity must be non-zero")]
    fn test_zero_capacity_rejected() {
        History::with_capacity(0);
    }
}
