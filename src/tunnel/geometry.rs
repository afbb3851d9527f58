use crate::error::EngineError;
use std::f64::consts::TAU;

/// Depth assigned to the exact center pixel, where the radial transform has
/// no finite value.
pub const CENTER_DEPTH: u32 = 0;

/// Angle assigned to the exact center pixel.
pub const CENTER_ANGLE: u32 = 0;

/// Per-pixel `(angle, depth)` pairs, pre-reduced into texture space.
///
/// Built once; this is the only place the tunnel does trigonometry or
/// division. `depth[i] < texture_width` and `angle[i] < texture_height` for
/// every `i`.
#[derive(Clone, Debug)]
pub struct GeometryTable {
    width: usize,
    height: usize,
    angle: Box<[u32]>,
    depth: Box<[u32]>,
}

impl GeometryTable {
    pub fn build(
        width: usize,
        height: usize,
        texture_width: usize,
        texture_height: usize,
        scale: f32,
    ) -> Result<Self, EngineError> {
        let n = width
            .checked_mul(height)
            .ok_or(EngineError::InvalidDimensions { width, height })?;
        let bytes = n.saturating_mul(std::mem::size_of::<u32>());

        let mut angle: Vec<u32> = Vec::new();
        let mut depth: Vec<u32> = Vec::new();
        angle
            .try_reserve_exact(n)
            .map_err(|_| EngineError::Allocation { what: "angle table", bytes })?;
        depth
            .try_reserve_exact(n)
            .map_err(|_| EngineError::Allocation { what: "depth table", bytes })?;

        let cx = (width / 2) as i64;
        let cy = (height / 2) as i64;
        let scale = scale as f64;
        let tw = texture_width as f64;
        let th = texture_height as f64;

        for y in 0..height {
            let dy = y as i64 - cy;
            for x in 0..width {
                let dx = x as i64 - cx;
                if dx == 0 && dy == 0 {
                    angle.push(CENTER_ANGLE);
                    depth.push(CENTER_DEPTH);
                    continue;
                }

                let (fx, fy) = (dx as f64, dy as f64);
                let dist = (fx * fx + fy * fy).sqrt();
                let d = (scale * tw / dist).floor() as i64;
                let a = (th * fy.atan2(fx) / TAU).floor() as i64;

                depth.push(d.rem_euclid(texture_width as i64) as u32);
                angle.push(a.rem_euclid(texture_height as i64) as u32);
            }
        }

        Ok(Self {
            width,
            height,
            angle: angle.into_boxed_slice(),
            depth: depth.into_boxed_slice(),
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.depth.len()
    }

    pub fn is_empty(&self) -> bool {
        self.depth.is_empty()
    }

    pub fn angles(&self) -> &[u32] {
        &self.angle
    }

    pub fn depths(&self) -> &[u32] {
        &self.depth
    }

    /// `(angle, depth)` for pixel `(x, y)`.
    pub fn at(&self, x: usize, y: usize) -> (u32, u32) {
        let i = y * self.width + x;
        (self.angle[i], self.depth[i])
    }
}
