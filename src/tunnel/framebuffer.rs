use crate::error::EngineError;

pub const BYTES_PER_PIXEL: usize = 4;

/// Engine-owned RGBA8 pixels, row-major, origin top-left, no row padding.
///
/// Backed by a boxed slice: it cannot grow or shrink, so the heap address
/// handed out by [`Framebuffer::as_ptr`] is fixed from construction until
/// drop, even if the owning value is moved.
#[derive(Debug)]
pub struct Framebuffer {
    width: usize,
    height: usize,
    bytes: Box<[u8]>,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Result<Self, EngineError> {
        if width == 0 || height == 0 {
            return Err(EngineError::InvalidDimensions { width, height });
        }
        let len = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(BYTES_PER_PIXEL))
            .filter(|&n| n <= isize::MAX as usize)
            .ok_or(EngineError::InvalidDimensions { width, height })?;

        let mut bytes: Vec<u8> = Vec::new();
        bytes
            .try_reserve_exact(len)
            .map_err(|_| EngineError::Allocation {
                what: "framebuffer",
                bytes: len,
            })?;
        bytes.resize(len, 0);

        Ok(Self {
            width,
            height,
            bytes: bytes.into_boxed_slice(),
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn stride(&self) -> usize {
        self.width * BYTES_PER_PIXEL
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_ptr(&self) -> *const u8 {
        self.bytes.as_ptr()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub(crate) fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    pub fn view(&self) -> FrameView<'_> {
        FrameView {
            width: self.width,
            height: self.height,
            bytes: &self.bytes,
        }
    }
}

/// Borrowed, read-only window onto a [`Framebuffer`].
///
/// The borrow keeps the engine alive and prevents it from stepping while the
/// view exists.
#[derive(Clone, Copy, Debug)]
pub struct FrameView<'a> {
    width: usize,
    height: usize,
    bytes: &'a [u8],
}

impl<'a> FrameView<'a> {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn stride(&self) -> usize {
        self.width * BYTES_PER_PIXEL
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y * self.width + x) * BYTES_PER_PIXEL;
        Some([
            self.bytes[i],
            self.bytes[i + 1],
            self.bytes[i + 2],
            self.bytes[i + 3],
        ])
    }

    pub fn rows(&self) -> std::slice::ChunksExact<'a, u8> {
        self.bytes.chunks_exact(self.stride())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocates_exact_rgba_length() {
        let fb = Framebuffer::new(7, 3).unwrap();
        assert_eq!(fb.len(), 7 * 3 * 4);
        assert_eq!(fb.stride(), 28);
        assert!(fb.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn rejects_zero_and_overflowing_sizes() {
        assert!(matches!(
            Framebuffer::new(0, 10),
            Err(EngineError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            Framebuffer::new(usize::MAX, 2),
            Err(EngineError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn view_addresses_pixels_row_major() {
        let mut fb = Framebuffer::new(2, 2).unwrap();
        fb.as_bytes_mut()[8..12].copy_from_slice(&[1, 2, 3, 4]);
        let view = fb.view();
        assert_eq!(view.pixel(0, 1), Some([1, 2, 3, 4]));
        assert_eq!(view.pixel(2, 0), None);
        assert_eq!(view.rows().count(), 2);
    }
}
