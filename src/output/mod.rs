//! Output formatting for CLI results.
//!
//! - [`terminal`] - Aligned, coloured text
//! - [`print_json`] - Pretty JSON, same shape as the HTTP API

mod terminal;

pub use terminal::{format_label, render_ports, render_subnet};

use serde::Serialize;
use std::error::Error;

/// Print `value` as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Error serializing JSON: {e}"))?;
    println!("{json}");
    Ok(())
}
