//! # Stockroom Entry Point
//!
//! Starts the runtime and hands over to `stockroom_console::run`.
//!
//! ## Exit Status
//! - `0` - Operator quit or input ended
//! - `1` - Startup failed (database or image directory unusable)

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    // The actual setup is in lib.rs for better testability
    match stockroom_console::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("stockroom: {err}");
            ExitCode::FAILURE
        }
    }
}
