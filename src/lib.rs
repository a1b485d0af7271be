pub mod client;
pub mod config;
pub mod display;
pub mod errors;
pub mod sampler;
pub mod signing;
pub mod stats;
pub mod types;

#[cfg(test)]
mod test_utils;
