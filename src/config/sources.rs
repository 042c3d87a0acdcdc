//! Configuration sources: the hub document and environment overrides.

pub mod environment;
pub mod global_file;
pub mod server_file;
