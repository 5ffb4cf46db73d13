//! Shared types and models for the BioGarden farm management platform
//!
//! This crate contains types shared between the backend, browser clients (via
//! WASM), and other components of the system.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
