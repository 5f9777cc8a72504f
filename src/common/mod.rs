pub mod config;
pub mod credentials;
pub mod errors;
pub mod format;
