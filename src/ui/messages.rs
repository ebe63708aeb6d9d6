//! User-facing status lines for billsync commands.
//!
//! Progress and results go to stdout; fatal errors go to stderr so a
//! scripted `billsync sync` can be piped without losing the failure reason.

use ansi_term::Colour::{Blue, Cyan, Green, Red, Yellow};
use ansi_term::Style;
use std::fmt;

const ICON_INFO: &str = "·";
const ICON_OK: &str = "✔";
const ICON_WARN: &str = "!";
const ICON_ERR: &str = "✘";

fn tag(style: Style, icon: &str) -> String {
    style.bold().paint(icon).to_string()
}

pub fn info<T: fmt::Display>(msg: T) {
    println!("{} {}", tag(Blue.normal(), ICON_INFO), msg);
}

pub fn success<T: fmt::Display>(msg: T) {
    println!("{} {}", tag(Green.normal(), ICON_OK), msg);
}

pub fn warning<T: fmt::Display>(msg: T) {
    println!("{} {}", tag(Yellow.normal(), ICON_WARN), msg);
}

pub fn error<T: fmt::Display>(msg: T) {
    eprintln!("{} {}", tag(Red.normal(), ICON_ERR), msg);
}

/// Section title above a merge plan or an invoice draft.
pub fn header<T: fmt::Display>(msg: T) {
    let title = msg.to_string();
    println!("{}", Cyan.bold().paint(&title));
    println!("{}", Cyan.paint("─".repeat(title.chars().count().max(8))));
}
