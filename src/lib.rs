#[cfg(not(target_arch = "wasm32"))]
pub mod app;
pub mod config;
pub mod error;
pub mod export;
pub mod ffi;
pub mod profile;
pub mod render;
#[cfg(not(target_arch = "wasm32"))]
pub mod terminal;
pub mod tunnel;
#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use error::EngineError;
pub use tunnel::{Tunnel, TunnelConfig};

/// Install a stderr `tracing` subscriber. `RUST_LOG` overrides the default
/// `warn` filter.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
