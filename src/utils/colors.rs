/// ANSI color helper utilities for terminal output.
use ansi_term::Colour;

pub const RESET: &str = "\x1b[0m";
pub const GREY: &str = "\x1b[90m";

/// "Signed In" in green, "Not Signed In" in red.
pub fn presence_label(signed_in: bool) -> String {
    if signed_in {
        Colour::Green.bold().paint("Signed In").to_string()
    } else {
        Colour::Red.bold().paint("Not Signed In").to_string()
    }
}

/// Flagged sessions are shown in yellow so they stand out in the table.
pub fn flag_marker(flagged: bool) -> String {
    if flagged {
        Colour::Yellow.paint("flagged").to_string()
    } else {
        format!("{GREY}-{RESET}")
    }
}

pub fn dim(value: &str) -> String {
    format!("{GREY}{value}{RESET}")
}
