use crate::tunnel::{BYTES_PER_PIXEL, FrameView};
use clap::ValueEnum;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// One binary PPM (P6) file per frame; alpha is dropped.
    Ppm,
    /// All frames concatenated into a single raw RGBA8 stream.
    Rgba,
}

pub fn frame_file_name(index: u64) -> String {
    format!("frame_{index:05}.ppm")
}

/// Binary PPM: `P6\n{w} {h}\n255\n` then packed RGB rows, top row first.
pub fn write_ppm(frame: &FrameView<'_>, out: &mut dyn Write) -> anyhow::Result<()> {
    write!(out, "P6\n{} {}\n255\n", frame.width(), frame.height())?;
    let mut row_rgb = Vec::with_capacity(frame.width() * 3);
    for row in frame.rows() {
        row_rgb.clear();
        for px in row.chunks_exact(BYTES_PER_PIXEL) {
            row_rgb.extend_from_slice(&px[..3]);
        }
        out.write_all(&row_rgb)?;
    }
    Ok(())
}

pub fn write_rgba(frame: &FrameView<'_>, out: &mut dyn Write) -> anyhow::Result<()> {
    out.write_all(frame.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tunnel::{Tunnel, TunnelConfig};

    #[test]
    fn ppm_header_and_body_size() {
        let t = Tunnel::with_config(TunnelConfig::with_size(5, 3)).unwrap();
        let mut out = Vec::new();
        write_ppm(&t.framebuffer(), &mut out).unwrap();
        let header = b"P6\n5 3\n255\n";
        assert!(out.starts_with(header));
        assert_eq!(out.len(), header.len() + 5 * 3 * 3);
        let px = t.framebuffer().pixel(0, 0).unwrap();
        assert_eq!(&out[header.len()..header.len() + 3], &px[..3]);
    }

    #[test]
    fn rgba_is_the_framebuffer_verbatim() {
        let t = Tunnel::with_config(TunnelConfig::with_size(4, 4)).unwrap();
        let mut out = Vec::new();
        write_rgba(&t.framebuffer(), &mut out).unwrap();
        assert_eq!(out, t.framebuffer().as_bytes());
    }

    #[test]
    fn frame_names_are_zero_padded() {
        assert_eq!(frame_file_name(7), "frame_00007.ppm");
        assert_eq!(frame_file_name(123_456), "frame_123456.ppm");
    }
}
