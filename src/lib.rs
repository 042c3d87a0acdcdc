//! coursehub: Multi-Course Notebook Hub Engine
//!
//! Derives, from a declarative course tree on disk, the spawn profiles offered
//! to a hub user and the exact volume mounts, identity, and start-up commands
//! applied once a profile is chosen.

pub mod cli;
pub mod commands;
pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod membership;
pub mod mounts;
pub mod profile;
pub mod registry;
pub mod spawn;
pub mod types;
