//! `wasm-bindgen` surface for the browser loader.
//!
//! The page calls `Tunnel.new()`, reads the module-level `width()` and
//! `height()`, wraps `framebuffer()` in an `ImageData` over linear memory
//! once, then calls `step()` from its animation callback.

use wasm_bindgen::prelude::*;

use crate::tunnel;

#[wasm_bindgen(js_name = Tunnel)]
pub struct TunnelHandle {
    inner: tunnel::Tunnel,
}

#[wasm_bindgen(js_class = Tunnel)]
impl TunnelHandle {
    pub fn new() -> Result<TunnelHandle, JsError> {
        let inner = tunnel::Tunnel::new().map_err(|err| JsError::new(&err.to_string()))?;
        Ok(Self { inner })
    }

    /// Address of the RGBA pixels in linear memory. Fixed for the lifetime
    /// of this handle.
    pub fn framebuffer(&self) -> *const u8 {
        self.inner.framebuffer_ptr()
    }

    pub fn step(&mut self) {
        self.inner.step();
    }
}

#[wasm_bindgen]
pub fn width() -> u32 {
    tunnel::width() as u32
}

#[wasm_bindgen]
pub fn height() -> u32 {
    tunnel::height() as u32
}
