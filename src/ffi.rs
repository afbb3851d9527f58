//! C ABI over [`Tunnel`] for hosts that view the framebuffer in place
//! (e.g. a WebAssembly loader wrapping linear memory in an image object).
//!
//! Protocol: `tunnel_new` once, then `tunnel_width`/`tunnel_height` and
//! `tunnel_framebuffer` at any time, `tunnel_step` once per frame, and
//! `tunnel_free` exactly once at the end. The framebuffer address is stable
//! until `tunnel_free`.

use crate::tunnel::{self, Tunnel};

/// Construct an engine with the compiled-in dimensions.
///
/// Returns null if construction fails.
#[unsafe(no_mangle)]
pub extern "C" fn tunnel_new() -> *mut Tunnel {
    match Tunnel::new() {
        Ok(t) => Box::into_raw(Box::new(t)),
        Err(err) => {
            tracing::error!(%err, "tunnel construction failed");
            std::ptr::null_mut()
        }
    }
}

/// # Safety
///
/// `handle` must be null or a pointer returned by [`tunnel_new`] that has not
/// been freed yet. Every framebuffer pointer obtained from it is dangling
/// afterwards.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn tunnel_free(handle: *mut Tunnel) {
    if handle.is_null() {
        return;
    }
    // SAFETY: caller guarantees `handle` came from `tunnel_new` and is live.
    drop(unsafe { Box::from_raw(handle) });
}

#[unsafe(no_mangle)]
pub extern "C" fn tunnel_width() -> u32 {
    tunnel::width() as u32
}

#[unsafe(no_mangle)]
pub extern "C" fn tunnel_height() -> u32 {
    tunnel::height() as u32
}

/// Address of `4 * width * height` bytes of RGBA pixels.
///
/// # Safety
///
/// `handle` must be null or a live pointer from [`tunnel_new`]. The returned
/// region may only be read, only while no `tunnel_step` is in progress, and
/// only until `tunnel_free` is called.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn tunnel_framebuffer(handle: *const Tunnel) -> *const u8 {
    // SAFETY: caller guarantees `handle` is null or live.
    match unsafe { handle.as_ref() } {
        Some(t) => t.framebuffer_ptr(),
        None => std::ptr::null(),
    }
}

/// # Safety
///
/// Same requirements as [`tunnel_framebuffer`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn tunnel_framebuffer_len(handle: *const Tunnel) -> usize {
    // SAFETY: caller guarantees `handle` is null or live.
    unsafe { handle.as_ref() }.map_or(0, Tunnel::framebuffer_len)
}

/// # Safety
///
/// `handle` must be null or a live pointer from [`tunnel_new`], with no other
/// reference to the engine in use for the duration of the call.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn tunnel_step(handle: *mut Tunnel) {
    // SAFETY: caller guarantees exclusive access to a live engine.
    if let Some(t) = unsafe { handle.as_mut() } {
        t.step();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_round_trip() {
        let h = tunnel_new();
        assert!(!h.is_null());
        unsafe {
            let ptr = tunnel_framebuffer(h);
            let len = tunnel_framebuffer_len(h);
            assert_eq!(len, tunnel_width() as usize * tunnel_height() as usize * 4);

            tunnel_step(h);
            tunnel_step(h);
            assert_eq!(tunnel_framebuffer(h), ptr);

            let pixels = std::slice::from_raw_parts(ptr, len);
            assert!(pixels.chunks_exact(4).all(|px| px[3] == 255));
            assert_eq!((*h).clock(), 2);

            tunnel_free(h);
        }
    }

    #[test]
    fn null_handles_are_ignored() {
        unsafe {
            assert!(tunnel_framebuffer(std::ptr::null()).is_null());
            assert_eq!(tunnel_framebuffer_len(std::ptr::null()), 0);
            tunnel_step(std::ptr::null_mut());
            tunnel_free(std::ptr::null_mut());
        }
    }
}
