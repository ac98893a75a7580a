pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod report;
pub mod verifier;

#[cfg(test)]
mod testing;
