mod clock;
mod framebuffer;
mod geometry;
mod texture;

use crate::error::EngineError;
use rayon::prelude::*;

pub use clock::Clock;
pub use framebuffer::{BYTES_PER_PIXEL, FrameView, Framebuffer};
pub use geometry::{CENTER_ANGLE, CENTER_DEPTH, GeometryTable};
pub use texture::{MAX_TEXTURE_EDGE, TEXTURE_HEIGHT, TEXTURE_WIDTH, Texture, TexturePattern};

/// Compiled-in raster width used by [`Tunnel::new`].
pub const WIDTH: usize = 320;
/// Compiled-in raster height used by [`Tunnel::new`].
pub const HEIGHT: usize = 240;

pub const DEFAULT_SCALE: f32 = 32.0;

pub fn width() -> usize {
    WIDTH
}

pub fn height() -> usize {
    HEIGHT
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dimensions {
    pub width: usize,
    pub height: usize,
}

impl Dimensions {
    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TunnelConfig {
    pub width: usize,
    pub height: usize,
    pub texture_width: usize,
    pub texture_height: usize,
    pub pattern: TexturePattern,
    /// Depth multiplier; larger values push the texture further down the tunnel.
    pub scale: f32,
    /// Texels per step along the depth axis.
    pub depth_speed: u32,
    /// Texels per step around the tunnel. Zero keeps the walls still.
    pub angle_speed: u32,
    /// Split each step across rows with rayon.
    pub parallel: bool,
}

impl Default for TunnelConfig {
    fn default() -> Self {
        Self {
            width: WIDTH,
            height: HEIGHT,
            texture_width: TEXTURE_WIDTH,
            texture_height: TEXTURE_HEIGHT,
            pattern: TexturePattern::Xor,
            scale: DEFAULT_SCALE,
            depth_speed: 1,
            angle_speed: 0,
            parallel: false,
        }
    }
}

impl TunnelConfig {
    pub fn with_size(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }
}

/// Tunnel effect engine.
///
/// Owns a precomputed `(angle, depth)` table, a source texture and an RGBA
/// framebuffer. Each [`Tunnel::step`] advances the clock and resamples the
/// texture into the framebuffer in place; nothing is allocated after
/// construction.
#[derive(Debug)]
pub struct Tunnel {
    dims: Dimensions,
    config: TunnelConfig,
    geometry: GeometryTable,
    texture: Texture,
    clock: Clock,
    framebuffer: Framebuffer,
}

impl Tunnel {
    /// Engine with the compiled-in dimensions and default effect parameters.
    pub fn new() -> Result<Self, EngineError> {
        Self::with_config(TunnelConfig::default())
    }

    pub fn with_config(mut config: TunnelConfig) -> Result<Self, EngineError> {
        if !config.scale.is_finite() || config.scale <= 0.0 {
            tracing::warn!(scale = config.scale, "invalid depth scale; using default");
            config.scale = DEFAULT_SCALE;
        }

        let framebuffer = Framebuffer::new(config.width, config.height)?;
        let texture = Texture::new(config.texture_width, config.texture_height, config.pattern)?;
        let geometry = GeometryTable::build(
            config.width,
            config.height,
            config.texture_width,
            config.texture_height,
            config.scale,
        )?;
        let clock = Clock::new(Clock::period_for(
            config.texture_width as u32,
            config.texture_height as u32,
        ));

        tracing::debug!(
            width = config.width,
            height = config.height,
            texture_width = config.texture_width,
            texture_height = config.texture_height,
            pattern = config.pattern.label(),
            period = clock.period(),
            "tunnel constructed"
        );

        let mut tunnel = Self {
            dims: Dimensions {
                width: config.width,
                height: config.height,
            },
            config,
            geometry,
            texture,
            clock,
            framebuffer,
        };
        tunnel.render();
        Ok(tunnel)
    }

    pub fn width(&self) -> usize {
        self.dims.width
    }

    pub fn height(&self) -> usize {
        self.dims.height
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dims
    }

    pub fn config(&self) -> &TunnelConfig {
        &self.config
    }

    pub fn geometry(&self) -> &GeometryTable {
        &self.geometry
    }

    pub fn texture(&self) -> &Texture {
        &self.texture
    }

    /// Current clock value in `[0, period())`.
    pub fn clock(&self) -> u32 {
        self.clock.value()
    }

    /// Number of steps after which the animation repeats exactly.
    pub fn period(&self) -> u32 {
        self.clock.period()
    }

    pub fn framebuffer(&self) -> FrameView<'_> {
        self.framebuffer.view()
    }

    /// Raw address of the framebuffer for zero-copy consumers.
    ///
    /// The address and [`Tunnel::framebuffer_len`] are fixed for the lifetime
    /// of this engine. The pointer must not be dereferenced after the engine
    /// is dropped, and must not be read while [`Tunnel::step`] is running.
    /// Prefer [`Tunnel::framebuffer`] inside Rust.
    pub fn framebuffer_ptr(&self) -> *const u8 {
        self.framebuffer.as_ptr()
    }

    pub fn framebuffer_len(&self) -> usize {
        self.framebuffer.len()
    }

    /// Advance the clock one tick and redraw.
    pub fn step(&mut self) {
        self.clock.tick();
        self.render();
    }

    /// Jump to `clock` (reduced modulo the period) and redraw.
    pub fn seek(&mut self, clock: u64) {
        self.clock.set(clock);
        self.render();
    }

    /// Texture coordinate `(u, v)` sampled for pixel `index` at the current
    /// clock, or `None` past the last pixel.
    pub fn texel_coord(&self, index: usize) -> Option<(usize, usize)> {
        let depth = *self.geometry.depths().get(index)?;
        let angle = *self.geometry.angles().get(index)?;
        let (shift_u, shift_v, tw, th) = self.shifts();
        let u = wrap_add(depth, shift_u, tw);
        let v = wrap_add(angle, shift_v, th);
        Some((u as usize, v as usize))
    }

    /// Redraw the current clock without advancing it.
    pub fn render(&mut self) {
        let (shift_u, shift_v, tw, th) = self.shifts();
        let sampler = RowSampler {
            width: self.dims.width,
            geometry: &self.geometry,
            texture: &self.texture,
            shift_u,
            shift_v,
            tw,
            th,
        };
        let stride = self.framebuffer.stride();
        let pixels = self.framebuffer.as_bytes_mut();

        if self.config.parallel {
            pixels
                .par_chunks_exact_mut(stride)
                .enumerate()
                .for_each(|(y, row)| sampler.fill_row(y, row));
        } else {
            for (y, row) in pixels.chunks_exact_mut(stride).enumerate() {
                sampler.fill_row(y, row);
            }
        }
    }

    fn shifts(&self) -> (u32, u32, u32, u32) {
        let tw = self.texture.width() as u32;
        let th = self.texture.height() as u32;
        (
            self.clock.shift(self.config.depth_speed, tw),
            self.clock.shift(self.config.angle_speed, th),
            tw,
            th,
        )
    }
}

struct RowSampler<'a> {
    width: usize,
    geometry: &'a GeometryTable,
    texture: &'a Texture,
    shift_u: u32,
    shift_v: u32,
    tw: u32,
    th: u32,
}

impl RowSampler<'_> {
    #[inline]
    fn fill_row(&self, y: usize, row: &mut [u8]) {
        let base = y * self.width;
        let depths = &self.geometry.depths()[base..base + self.width];
        let angles = &self.geometry.angles()[base..base + self.width];
        for ((px, &d), &a) in row.chunks_exact_mut(BYTES_PER_PIXEL).zip(depths).zip(angles) {
            let u = wrap_add(d, self.shift_u, self.tw);
            let v = wrap_add(a, self.shift_v, self.th);
            px.copy_from_slice(&self.texture.texel(u as usize, v as usize));
        }
    }
}

// Both operands are already in [0, m), so one conditional subtract reduces the sum.
#[inline]
fn wrap_add(a: u32, b: u32, m: u32) -> u32 {
    let s = a + b;
    if s >= m { s - m } else { s }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn tunnel_is_send_and_sync() {
        assert_send_sync::<Tunnel>();
    }

    #[test]
    fn wrap_add_reduces_once() {
        assert_eq!(wrap_add(255, 255, 256), 254);
        assert_eq!(wrap_add(0, 0, 256), 0);
        assert_eq!(wrap_add(3, 4, 8), 7);
    }

    #[test]
    fn construction_renders_clock_zero() {
        let t = Tunnel::with_config(TunnelConfig::with_size(16, 16)).unwrap();
        assert_eq!(t.clock(), 0);
        let (a, d) = t.geometry().at(3, 5);
        let expected = t.texture().texel(d as usize, a as usize);
        assert_eq!(t.framebuffer().pixel(3, 5), Some(expected));
    }

    #[test]
    fn invalid_scale_falls_back_to_default() {
        let cfg = TunnelConfig {
            scale: f32::NAN,
            ..TunnelConfig::with_size(8, 8)
        };
        let t = Tunnel::with_config(cfg).unwrap();
        assert_eq!(t.config().scale, DEFAULT_SCALE);
    }
}
