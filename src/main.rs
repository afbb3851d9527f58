use anyhow::Result;
#[cfg(not(target_arch = "wasm32"))]
use clap::Parser;

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<()> {
    tunnel_fx::init_tracing();
    let cfg = tunnel_fx::config::Config::parse();
    tunnel_fx::app::run(cfg)
}

// The browser build drives the engine through `tunnel_fx::wasm`.
#[cfg(target_arch = "wasm32")]
fn main() -> Result<()> {
    anyhow::bail!("the terminal preview is not available on wasm32")
}
