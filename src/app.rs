use crate::config::{Config, RendererMode, profile_from_config};
use crate::profile::{EffectProfile, profile_storage_path};
use crate::render::{AsciiRenderer, Frame, HalfBlockRenderer, Renderer, fit_nearest};
use crate::terminal::TerminalGuard;
use crate::tunnel::Tunnel;
use anyhow::{Context, bail};
use std::fmt::Write as _;
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::{Duration, Instant};

pub fn run(cfg: Config) -> anyhow::Result<()> {
    let profile_path = cfg
        .profile
        .as_deref()
        .map(PathBuf::from)
        .or_else(profile_storage_path);
    let profile = EffectProfile::load(profile_path.as_deref()).with_context(|| {
        format!(
            "load profile {}",
            profile_path
                .as_deref()
                .map(|p| p.display().to_string())
                .unwrap_or_default()
        )
    })?;
    let tunnel_cfg = cfg.tunnel_config(&profile);

    if cfg.save_profile {
        let Some(path) = profile_path.as_deref() else {
            bail!("no profile location: pass --profile or set HOME/XDG_CONFIG_HOME");
        };
        profile_from_config(&tunnel_cfg)
            .save(Some(path))
            .with_context(|| format!("save profile {}", path.display()))?;
        println!("saved profile to {}", path.display());
        return Ok(());
    }

    let mut tunnel = Tunnel::with_config(tunnel_cfg).context("construct tunnel")?;
    let frames = cfg.frames.unwrap_or(tunnel.period() as u64);
    let mut renderer: Box<dyn Renderer> = match cfg.renderer {
        RendererMode::Ascii => Box::new(AsciiRenderer::new()),
        RendererMode::HalfBlock => Box::new(HalfBlockRenderer::new()),
    };
    tracing::info!(
        frames,
        renderer = renderer.name(),
        width = tunnel.width(),
        height = tunnel.height(),
        "starting preview"
    );

    let _guard = TerminalGuard::new()?;
    let mut out = BufWriter::new(TerminalGuard::stdout());
    let mut scaled = Vec::new();
    let mut hud = String::new();
    let mut fps = FpsCounter::new();
    let target = Duration::from_secs_f32(1.0 / cfg.fps.max(1) as f32);

    // Paint the clock-0 frame before the first step, then step + paint.
    let mut step_ms = 0.0f32;
    for i in 0..=frames {
        let now = Instant::now();
        if i > 0 {
            let step_start = Instant::now();
            tunnel.step();
            step_ms = step_start.elapsed().as_secs_f32() * 1000.0;
        }

        let (cols, rows) = TerminalGuard::size();
        let layout = Layout::for_terminal(cols, rows, cfg.hud, renderer.cell_shape());
        fit_nearest(
            &tunnel.framebuffer(),
            layout.pixel_width,
            layout.pixel_height,
            &mut scaled,
        );

        hud.clear();
        let _ = write!(
            hud,
            "tunnel {}x{} | clock {}/{} | step {:.2} ms | {:.1} FPS | {}",
            tunnel.width(),
            tunnel.height(),
            tunnel.clock(),
            tunnel.period(),
            step_ms,
            fps.fps(),
            renderer.name()
        );

        let frame = Frame {
            term_cols: cols,
            visual_rows: layout.visual_rows,
            pixel_width: layout.pixel_width,
            pixel_height: layout.pixel_height,
            pixels_rgba: &scaled,
            hud: &hud,
            hud_rows: layout.hud_rows,
            sync_updates: cfg.sync_updates,
        };
        renderer.render(&frame, &mut out)?;
        fps.tick();

        let elapsed = now.elapsed();
        if elapsed < target {
            std::thread::sleep(target - elapsed);
        }
    }
    Ok(())
}

/// How a terminal of `cols x rows` cells is split between picture and HUD.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub visual_rows: u16,
    pub hud_rows: u16,
    pub pixel_width: usize,
    pub pixel_height: usize,
}

impl Layout {
    pub fn for_terminal(cols: u16, rows: u16, show_hud: bool, cell: (usize, usize)) -> Self {
        let hud_rows = if show_hud && rows > 2 { 1 } else { 0 };
        let visual_rows = rows.saturating_sub(hud_rows);
        Self {
            visual_rows,
            hud_rows,
            pixel_width: cols as usize * cell.0,
            pixel_height: visual_rows as usize * cell.1,
        }
    }
}

struct FpsCounter {
    last: Instant,
    frames: u32,
    fps: f32,
}

impl FpsCounter {
    fn new() -> Self {
        Self {
            last: Instant::now(),
            frames: 0,
            fps: 0.0,
        }
    }

    fn tick(&mut self) {
        self.frames += 1;
        let now = Instant::now();
        let dt = now.duration_since(self.last).as_secs_f32();
        if dt >= 0.5 {
            self.fps = (self.frames as f32) / dt;
            self.frames = 0;
            self.last = now;
        }
    }

    fn fps(&self) -> f32 {
        self.fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_reserves_one_hud_row() {
        let l = Layout::for_terminal(80, 24, true, (1, 2));
        assert_eq!(l.hud_rows, 1);
        assert_eq!(l.visual_rows, 23);
        assert_eq!((l.pixel_width, l.pixel_height), (80, 46));
    }

    #[test]
    fn layout_drops_hud_on_tiny_terminals() {
        let l = Layout::for_terminal(10, 2, true, (1, 1));
        assert_eq!(l.hud_rows, 0);
        assert_eq!(l.visual_rows, 2);
    }

    #[test]
    fn layout_without_hud_uses_all_rows() {
        let l = Layout::for_terminal(40, 10, false, (1, 1));
        assert_eq!((l.visual_rows, l.pixel_height), (10, 10));
    }
}
