//! Op Lab: CPU reference harness for the elementwise operation registry.

#[path = "../cases/mod.rs"]
pub mod cases;

pub mod case_io;
pub mod config;
pub mod engine;
pub mod report;

use tracing_subscriber::EnvFilter;

/// Installs the fmt subscriber, honouring `RUST_LOG` and defaulting to `info`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
