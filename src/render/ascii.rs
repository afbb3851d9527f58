use crate::render::{Frame, Renderer, begin_frame, end_frame, luma_u8};
use std::io::Write;

pub struct AsciiRenderer {
    last_fg: Option<(u8, u8, u8)>,
}

impl AsciiRenderer {
    pub fn new() -> Self {
        Self { last_fg: None }
    }
}

impl Default for AsciiRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for AsciiRenderer {
    fn name(&self) -> &'static str {
        "ascii"
    }

    fn cell_shape(&self) -> (usize, usize) {
        (1, 1)
    }

    fn render(&mut self, frame: &Frame<'_>, out: &mut dyn Write) -> anyhow::Result<()> {
        if !begin_frame(frame, self.cell_shape(), out)? {
            return Ok(());
        }
        self.last_fg = None;

        // Dark -> bright.
        const RAMP: &[u8] = b" .,:;irsXA253hMHGS#9B&@";
        let w = frame.pixel_width;

        for y in 0..frame.visual_rows as usize {
            for x in 0..w {
                let i = (y * w + x) * 4;
                let fg = (
                    frame.pixels_rgba[i],
                    frame.pixels_rgba[i + 1],
                    frame.pixels_rgba[i + 2],
                );
                let l = luma_u8(fg.0, fg.1, fg.2) as usize;
                let ch = RAMP[l * (RAMP.len() - 1) / 255];

                if self.last_fg != Some(fg) {
                    write!(out, "\x1b[38;2;{};{};{}m", fg.0, fg.1, fg.2)?;
                    self.last_fg = Some(fg);
                }
                out.write_all(&[ch])?;
            }
            out.write_all(b"\r\n")?;
        }

        end_frame(frame, out)
    }
}
