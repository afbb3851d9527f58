mod ascii;
mod halfblock;

pub use ascii::AsciiRenderer;
pub use halfblock::HalfBlockRenderer;

use crate::tunnel::{BYTES_PER_PIXEL, FrameView};
use std::io::Write;

pub struct Frame<'a> {
    pub term_cols: u16,
    pub visual_rows: u16,
    pub pixel_width: usize,
    pub pixel_height: usize,
    pub pixels_rgba: &'a [u8],
    pub hud: &'a str,
    pub hud_rows: u16,
    pub sync_updates: bool,
}

pub trait Renderer {
    fn name(&self) -> &'static str;
    /// Pixels covered by one terminal cell, as `(columns, rows)`.
    fn cell_shape(&self) -> (usize, usize);
    fn render(&mut self, frame: &Frame<'_>, out: &mut dyn Write) -> anyhow::Result<()>;
}

pub fn luma_u8(r: u8, g: u8, b: u8) -> u8 {
    // Rec. 601 weights in 8.8 fixed point.
    ((r as u32 * 77 + g as u32 * 150 + b as u32 * 29) >> 8) as u8
}

/// Nearest-neighbour resample of `src` into a `dst_w x dst_h` RGBA buffer.
pub fn fit_nearest(src: &FrameView<'_>, dst_w: usize, dst_h: usize, out: &mut Vec<u8>) {
    let need = dst_w.saturating_mul(dst_h).saturating_mul(BYTES_PER_PIXEL);
    out.resize(need, 0);
    if need == 0 || src.width() == 0 || src.height() == 0 {
        return;
    }
    let bytes = src.as_bytes();
    for y in 0..dst_h {
        let sy = y * src.height() / dst_h;
        for x in 0..dst_w {
            let sx = x * src.width() / dst_w;
            let si = (sy * src.width() + sx) * BYTES_PER_PIXEL;
            let di = (y * dst_w + x) * BYTES_PER_PIXEL;
            out[di..di + BYTES_PER_PIXEL].copy_from_slice(&bytes[si..si + BYTES_PER_PIXEL]);
        }
    }
}

/// Validate the frame against the cell shape and open a paint pass.
///
/// Returns `false` (writing nothing) for empty or mismatched frames.
pub(crate) fn begin_frame(
    frame: &Frame<'_>,
    cell: (usize, usize),
    out: &mut dyn Write,
) -> anyhow::Result<bool> {
    let cols = frame.term_cols as usize;
    let rows = frame.visual_rows as usize;
    let (w, h) = (frame.pixel_width, frame.pixel_height);
    if cols == 0 || rows == 0 || w == 0 || h == 0 {
        return Ok(false);
    }
    if w != cols * cell.0 || h != rows * cell.1 {
        return Ok(false);
    }
    if frame.pixels_rgba.len() < w.saturating_mul(h).saturating_mul(BYTES_PER_PIXEL) {
        return Ok(false);
    }

    if frame.sync_updates {
        out.write_all(b"\x1b[?2026h")?;
    }
    // Home, reset, and disable autowrap (DECAWM) so writing the last column
    // does not push the cursor onto the next line.
    out.write_all(b"\x1b[H\x1b[0m\x1b[?7l")?;
    Ok(true)
}

pub(crate) fn end_frame(frame: &Frame<'_>, out: &mut dyn Write) -> anyhow::Result<()> {
    let cols = frame.term_cols as usize;
    let mut hud_lines = frame.hud.lines();
    for i in 0..(frame.hud_rows as usize) {
        write!(out, "\x1b[{};1H\x1b[0m\x1b[2K", frame.visual_rows as usize + i + 1)?;
        if let Some(line) = hud_lines.next() {
            let clipped: String = line.chars().take(cols).collect();
            out.write_all(clipped.as_bytes())?;
        }
    }

    out.write_all(b"\x1b[?7h")?;
    if frame.sync_updates {
        out.write_all(b"\x1b[?2026l")?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tunnel::{Tunnel, TunnelConfig};

    #[test]
    fn luma_extremes() {
        assert_eq!(luma_u8(0, 0, 0), 0);
        assert_eq!(luma_u8(255, 255, 255), 255);
    }

    #[test]
    fn fit_nearest_identity_and_downscale() {
        let t = Tunnel::with_config(TunnelConfig::with_size(8, 6)).unwrap();
        let view = t.framebuffer();

        let mut same = Vec::new();
        fit_nearest(&view, 8, 6, &mut same);
        assert_eq!(same, view.as_bytes());

        let mut half = Vec::new();
        fit_nearest(&view, 4, 3, &mut half);
        assert_eq!(half.len(), 4 * 3 * 4);
        // Destination (1, 1) samples source (2, 2).
        assert_eq!(&half[20..24], &view.pixel(2, 2).unwrap()[..]);
    }
}
