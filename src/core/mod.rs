pub mod config;
pub mod generate;
pub mod invoice;
pub mod log;
pub mod reconcile;
pub mod sync;
