//! Formatting utilities used for CLI, invoice and export outputs.

pub fn bold(s: &str) -> String {
    format!("\x1b[1m{}\x1b[0m", s)
}

/// Currency amount with two decimals, e.g. `€220.00`.
pub fn money(currency: &str, value: f64) -> String {
    format!("{}{:.2}", currency, value)
}

/// Hourly rate as stored, prefixed with the currency (`€50`, `€47.5`).
pub fn rate(currency: &str, value: f64) -> String {
    format!("{}{}", currency, value)
}

pub fn hours(value: f64) -> String {
    format!("{:.2}", value)
}

/// Shorten `s` to `max` visible characters, ending with "...".
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(3)).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_has_two_decimals() {
        assert_eq!(money("€", 220.0), "€220.00");
        assert_eq!(money("$", 0.126), "$0.13");
    }

    #[test]
    fn rate_keeps_stored_precision() {
        assert_eq!(rate("€", 50.0), "€50");
        assert_eq!(rate("€", 47.5), "€47.5");
    }

    #[test]
    fn truncate_long_text() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a very long description", 10), "a very ...");
    }
}
