// Library root: re-exports all modules so integration tests and external
// consumers can access the crate's public API.

pub mod config;
pub mod error;
pub mod gateway;
pub mod orchestrator;
pub mod postcode;
pub mod rent;
pub mod request;
pub mod result;
pub mod server;
