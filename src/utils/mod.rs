//! Shared helpers: paths, terminal output, tool detection

pub mod paths;
pub mod terminal;
pub mod tools;
