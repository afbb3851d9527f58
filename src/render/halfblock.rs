use crate::render::{Frame, Renderer, begin_frame, end_frame};
use std::io::Write;

/// Two pixels per cell: the top one as foreground of `▀`, the bottom one as
/// background.
pub struct HalfBlockRenderer {
    last_fg: Option<(u8, u8, u8)>,
    last_bg: Option<(u8, u8, u8)>,
}

impl HalfBlockRenderer {
    pub fn new() -> Self {
        Self {
            last_fg: None,
            last_bg: None,
        }
    }
}

impl Default for HalfBlockRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for HalfBlockRenderer {
    fn name(&self) -> &'static str {
        "halfblock"
    }

    fn cell_shape(&self) -> (usize, usize) {
        (1, 2)
    }

    fn render(&mut self, frame: &Frame<'_>, out: &mut dyn Write) -> anyhow::Result<()> {
        if !begin_frame(frame, self.cell_shape(), out)? {
            return Ok(());
        }
        self.last_fg = None;
        self.last_bg = None;

        const HALF_BLOCK: &str = "\u{2580}";
        let w = frame.pixel_width;
        let px = frame.pixels_rgba;

        for row in 0..frame.visual_rows as usize {
            let top = (row * 2) * w * 4;
            let bot = top + w * 4;
            for x in 0..w {
                let ti = top + x * 4;
                let bi = bot + x * 4;
                let fg = (px[ti], px[ti + 1], px[ti + 2]);
                let bg = (px[bi], px[bi + 1], px[bi + 2]);

                if self.last_fg != Some(fg) {
                    write!(out, "\x1b[38;2;{};{};{}m", fg.0, fg.1, fg.2)?;
                    self.last_fg = Some(fg);
                }
                if self.last_bg != Some(bg) {
                    write!(out, "\x1b[48;2;{};{};{}m", bg.0, bg.1, bg.2)?;
                    self.last_bg = Some(bg);
                }
                out.write_all(HALF_BLOCK.as_bytes())?;
            }
            out.write_all(b"\x1b[0m\r\n")?;
            self.last_fg = None;
            self.last_bg = None;
        }

        end_frame(frame, out)
    }
}
