pub mod ledger_row;
pub mod settings;
pub mod time_entry;

pub use ledger_row::{LedgerEntry, LedgerRow};
pub use settings::Settings;
pub use time_entry::TimeEntry;
