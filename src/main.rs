//! wasmkit - build tooling for a Rust WebAssembly browser game
//!
//! One binary replaces the loose build, hosting and setup scripts:
//!
//! ```text
//! wasmkit setup          rustup target + cargo-web + manifest deps
//! wasmkit build [debug]  rm -r target && cargo web build ... --target wasm32-unknown-unknown
//! wasmkit serve          http://localhost:8888/ from pub/
//! ```

mod build;
mod cli;
mod commands;
mod config;
mod error;
mod exec;
mod server;
mod setup;
mod utils;

use std::process::ExitCode;

use clap::Parser;

use cli::Cli;
use error::WasmkitError;
use utils::terminal::print_error;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match cli.execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<WasmkitError>() {
                Some(wasmkit_err) => wasmkit_err.display_with_hints(),
                None => print_error(&format!("{:#}", err)),
            }
            ExitCode::FAILURE
        }
    }
}
