//! Integration tests for the coursehub profile and mount engine

mod config_loading;
mod menu_synthesis;
mod registry_loading;
mod test_utils;
