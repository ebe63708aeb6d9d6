pub mod config;
pub mod export;
pub mod init;
pub mod invoice;
pub mod list;
pub mod log;
pub mod sync;
