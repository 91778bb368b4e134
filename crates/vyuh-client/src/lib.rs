//! # vyuh-client
//!
//! `reqwest` implementation of [`vyuh_core::CrewApi`] against the external
//! Vyuh backend service. Owns the endpoint paths and the status-code
//! mapping; everything above it works through the trait.

mod http;

pub use http::{ClientConfig, HttpCrewApi};
