// Public API for the binary and integration tests

pub mod broadcast;
pub mod config;
pub mod console;
pub mod error;
pub mod parser;
pub mod state;
pub mod types;
