//! Property-based tests for menu, command, and mount guarantees

mod command_rewind;
mod default_fallback;
mod strategies;
