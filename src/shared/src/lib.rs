//! Shared types for the Adaptive Mind business metrics platform

pub mod types;

pub use types::*;
