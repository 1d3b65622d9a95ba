//! # boletim-data
//!
//! Upstream COVID-19 data clients for Boletim.

pub mod client;
pub mod states;

pub use client::CovidClient;
