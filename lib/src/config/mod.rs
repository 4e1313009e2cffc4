//! Configuration module.
//!
//! Print settings and their JSON profile format.

mod print_config;

pub use print_config::PrintConfig;
