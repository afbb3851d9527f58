#![cfg(target_arch = "wasm32")]

use tunnel_fx::wasm::{TunnelHandle, height, width};
use wasm_bindgen_test::*;

#[wasm_bindgen_test]
fn loader_protocol_keeps_framebuffer_in_place() {
    let mut demo = TunnelHandle::new().expect("construct");
    assert_eq!((width(), height()), (320, 240));

    let ptr = demo.framebuffer();
    assert!(!ptr.is_null());
    for _ in 0..3 {
        demo.step();
        assert_eq!(demo.framebuffer(), ptr);
    }

    let len = 4 * width() as usize * height() as usize;
    let pixels = unsafe { std::slice::from_raw_parts(ptr, len) };
    assert!(pixels.chunks_exact(4).all(|px| px[3] == 255));
}
