/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";

/// Colour of a rendered ledger line:
/// invoiced → grey, open with a date → yellow (next invoice), otherwise reset.
pub fn color_for_row(invoiced: bool, eligible: bool) -> &'static str {
    if invoiced {
        GREY
    } else if eligible {
        YELLOW
    } else {
        RESET
    }
}

pub fn paint(line: &str, color: &str) -> String {
    format!("{color}{line}{RESET}")
}
