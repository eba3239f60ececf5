//! Command implementations
//!
//! Each command module provides a clap-derived struct and execute method.

pub mod build;
pub mod check;
pub mod clean;
pub mod serve;
pub mod setup;
