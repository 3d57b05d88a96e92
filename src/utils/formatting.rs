//! Formatting utilities used for CLI output.

/// Notes longer than this are cut in the sessions table.
pub const NOTE_PREVIEW_CHARS: usize = 250;

pub fn bold(s: &str) -> String {
    format!("\x1b[1m{}\x1b[0m", s)
}

/// Cut a session note to `max` characters, appending `...` when it was
/// longer. Counts chars, not bytes, so multi-byte notes never split.
pub fn truncate_note(note: &str, max: usize) -> String {
    if note.chars().count() <= max {
        return note.to_string();
    }
    let mut out: String = note.chars().take(max).collect();
    out.push_str("...");
    out
}

/// Collapse newlines so a note fits on one table row.
pub fn single_line(note: &str) -> String {
    note.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Mask all but the last two characters of an identity key.
pub fn mask_identity(key: &str) -> String {
    let n = key.chars().count();
    if n <= 2 {
        return "*".repeat(n);
    }
    let tail: String = key.chars().skip(n - 2).collect();
    format!("{}{}", "*".repeat(n - 2), tail)
}
