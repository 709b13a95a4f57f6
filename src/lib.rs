// Public API for integration tests and potential library usage

pub mod client;
pub mod config;
pub mod engine;
pub mod protocol;
pub mod script;
pub mod transport;
pub mod types;
