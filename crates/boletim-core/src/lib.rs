//! # boletim-core
//!
//! Core types, traits, configuration, and error handling for Boletim.

pub mod config;
pub mod error;
pub mod request;
pub mod snapshot;
pub mod traits;
