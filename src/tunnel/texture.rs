use crate::error::EngineError;

pub const TEXTURE_WIDTH: usize = 256;
pub const TEXTURE_HEIGHT: usize = 256;

/// Largest texture edge the lookup table can address with its `u32` entries
/// while keeping per-step shift math comfortably inside `u64`.
pub const MAX_TEXTURE_EDGE: usize = 65_536;

const NOISE_LATTICE: usize = 16;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TexturePattern {
    /// Classic `x ^ y` demo texture.
    #[default]
    Xor,
    /// Two-tone checkerboard with square cells of `cell` texels.
    Checker { cell: usize },
    /// Tileable value noise, fully determined by `seed`.
    Noise { seed: u64 },
}

impl TexturePattern {
    pub fn label(self) -> &'static str {
        match self {
            Self::Xor => "xor",
            Self::Checker { .. } => "checker",
            Self::Noise { .. } => "noise",
        }
    }
}

/// Read-only RGBA source image sampled by the tunnel.
///
/// `u` runs along the width (depth axis), `v` along the height (angle axis).
#[derive(Clone, Debug)]
pub struct Texture {
    width: usize,
    height: usize,
    texels: Box<[[u8; 4]]>,
}

impl Texture {
    pub fn new(width: usize, height: usize, pattern: TexturePattern) -> Result<Self, EngineError> {
        if width == 0 || height == 0 || width > MAX_TEXTURE_EDGE || height > MAX_TEXTURE_EDGE {
            return Err(EngineError::InvalidTexture { width, height });
        }
        let n = width
            .checked_mul(height)
            .ok_or(EngineError::InvalidTexture { width, height })?;
        let mut texels: Vec<[u8; 4]> = Vec::new();
        texels
            .try_reserve_exact(n)
            .map_err(|_| EngineError::Allocation {
                what: "texture",
                bytes: n.saturating_mul(4),
            })?;

        match pattern {
            TexturePattern::Xor => {
                for y in 0..height {
                    let ty = y * 256 / height;
                    for x in 0..width {
                        let tx = x * 256 / width;
                        let c = (tx ^ ty) as u8;
                        texels.push([c, c / 2 + 64, 255 - c, 255]);
                    }
                }
            }
            TexturePattern::Checker { cell } => {
                let cell = cell.max(1);
                for y in 0..height {
                    for x in 0..width {
                        let on = ((x / cell) + (y / cell)) % 2 == 0;
                        texels.push(if on {
                            [236, 242, 255, 255]
                        } else {
                            [18, 24, 48, 255]
                        });
                    }
                }
            }
            TexturePattern::Noise { seed } => {
                let mut rng = fastrand::Rng::with_seed(seed);
                let mut lattice = [0u8; NOISE_LATTICE * NOISE_LATTICE];
                for v in lattice.iter_mut() {
                    *v = rng.u8(..);
                }
                for y in 0..height {
                    for x in 0..width {
                        let n = value_noise(&lattice, x, y, width, height);
                        texels.push(noise_color(n));
                    }
                }
            }
        }

        Ok(Self {
            width,
            height,
            texels: texels.into_boxed_slice(),
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Sample with in-range coordinates. Both must already be reduced.
    #[inline]
    pub fn texel(&self, u: usize, v: usize) -> [u8; 4] {
        self.texels[v * self.width + u]
    }
}

// Bilinear interpolation on a wrapping lattice so the texture tiles seamlessly.
fn value_noise(lattice: &[u8], x: usize, y: usize, w: usize, h: usize) -> u8 {
    let fx = x as f32 * NOISE_LATTICE as f32 / w as f32;
    let fy = y as f32 * NOISE_LATTICE as f32 / h as f32;
    let x0 = fx.floor() as usize % NOISE_LATTICE;
    let y0 = fy.floor() as usize % NOISE_LATTICE;
    let x1 = (x0 + 1) % NOISE_LATTICE;
    let y1 = (y0 + 1) % NOISE_LATTICE;
    let tx = smooth(fx.fract());
    let ty = smooth(fy.fract());

    let at = |xx: usize, yy: usize| lattice[yy * NOISE_LATTICE + xx] as f32;
    let top = at(x0, y0) * (1.0 - tx) + at(x1, y0) * tx;
    let bot = at(x0, y1) * (1.0 - tx) + at(x1, y1) * tx;
    (top * (1.0 - ty) + bot * ty).round().clamp(0.0, 255.0) as u8
}

fn smooth(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

fn noise_color(n: u8) -> [u8; 4] {
    let v = n as u16;
    [
        (v * 3 / 4) as u8,
        (40 + v * 3 / 5) as u8,
        (90 + v * 2 / 3).min(255) as u8,
        255,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_and_oversized_textures() {
        assert!(matches!(
            Texture::new(0, 4, TexturePattern::Xor),
            Err(EngineError::InvalidTexture { .. })
        ));
        assert!(matches!(
            Texture::new(4, MAX_TEXTURE_EDGE + 1, TexturePattern::Xor),
            Err(EngineError::InvalidTexture { .. })
        ));
    }

    #[test]
    fn xor_texture_matches_formula_at_full_resolution() {
        let t = Texture::new(256, 256, TexturePattern::Xor).unwrap();
        let c = (13usize ^ 200usize) as u8;
        assert_eq!(t.texel(13, 200), [c, c / 2 + 64, 255 - c, 255]);
        assert_eq!(t.texel(0, 0)[0], 0);
    }

    #[test]
    fn checker_alternates_cells() {
        let t = Texture::new(8, 8, TexturePattern::Checker { cell: 2 }).unwrap();
        assert_eq!(t.texel(0, 0), t.texel(1, 1));
        assert_ne!(t.texel(0, 0), t.texel(2, 0));
        assert_eq!(t.texel(0, 0), t.texel(2, 2));
    }

    #[test]
    fn noise_is_seed_deterministic() {
        let a = Texture::new(64, 64, TexturePattern::Noise { seed: 7 }).unwrap();
        let b = Texture::new(64, 64, TexturePattern::Noise { seed: 7 }).unwrap();
        let c = Texture::new(64, 64, TexturePattern::Noise { seed: 8 }).unwrap();
        assert_eq!(a.texels, b.texels);
        assert_ne!(a.texels, c.texels);
    }

    #[test]
    fn every_texel_is_opaque() {
        for pattern in [
            TexturePattern::Xor,
            TexturePattern::Checker { cell: 3 },
            TexturePattern::Noise { seed: 1 },
        ] {
            let t = Texture::new(32, 24, pattern).unwrap();
            assert!(t.texels.iter().all(|px| px[3] == 255), "{}", pattern.label());
        }
    }

    #[cfg(target_pointer_width = "32")]
    #[test]
    fn max_edges_overflowing_address_space_are_rejected() {
        let edge = MAX_TEXTURE_EDGE;
        assert_eq!(
            Texture::new(edge, edge, TexturePattern::Xor).unwrap_err(),
            EngineError::InvalidTexture {
                width: edge,
                height: edge
            }
        );
    }
}
