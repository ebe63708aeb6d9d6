pub mod colors;
pub mod date;
pub mod duration;
pub mod formatting;
pub mod path;
pub mod table;

pub use duration::parse_duration_hours;
