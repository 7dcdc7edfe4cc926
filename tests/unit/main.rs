//! Unit test suite entry point.

mod build_tests;
mod config_tests;
mod filter_tests;
mod vibe_tests;
