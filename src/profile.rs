use crate::tunnel::{TexturePattern, TunnelConfig};
use std::fmt;
use std::path::{Path, PathBuf};

/// Saved effect parameters. Absent keys leave the built-in default alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EffectProfile {
    pub width: Option<usize>,
    pub height: Option<usize>,
    pub pattern: Option<TexturePattern>,
    pub scale: Option<f32>,
    pub depth_speed: Option<u32>,
    pub angle_speed: Option<u32>,
    pub parallel: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileError {
    Io(String),
    Parse { line: usize, message: String },
}

impl fmt::Display for ProfileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "I/O error: {msg}"),
            Self::Parse { line, message } => write!(f, "parse error at line {line}: {message}"),
        }
    }
}

impl std::error::Error for ProfileError {}

impl EffectProfile {
    /// Read a profile. A missing file (or no path) is an empty profile.
    pub fn load(path: Option<&Path>) -> Result<Self, ProfileError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let text = match std::fs::read_to_string(path) {
            Ok(v) => v,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(err) => return Err(ProfileError::Io(err.to_string())),
        };
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, ProfileError> {
        let mut profile = Self::default();
        let mut pattern_name: Option<(usize, String)> = None;
        let mut checker_cell: Option<usize> = None;
        let mut noise_seed: Option<u64> = None;

        for (line_idx, raw) in text.lines().enumerate() {
            let line_no = line_idx + 1;
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key_raw, value_raw)) = line.split_once('=') else {
                return Err(ProfileError::Parse {
                    line: line_no,
                    message: "expected <key>=<value>".to_string(),
                });
            };
            let key = key_raw.trim();
            let value = value_raw.trim();
            let bad = |what: &str| ProfileError::Parse {
                line: line_no,
                message: format!("{key} must be {what}"),
            };
            match key {
                "width" => {
                    profile.width = Some(parse_positive(value).ok_or_else(|| bad("a positive integer"))?);
                }
                "height" => {
                    profile.height = Some(parse_positive(value).ok_or_else(|| bad("a positive integer"))?);
                }
                "pattern" => pattern_name = Some((line_no, value.to_ascii_lowercase())),
                "checker_cell" => {
                    checker_cell = Some(parse_positive(value).ok_or_else(|| bad("a positive integer"))?);
                }
                "noise_seed" => {
                    noise_seed = Some(value.parse().map_err(|_| bad("an unsigned integer"))?);
                }
                "scale" => {
                    let v: f32 = value.parse().map_err(|_| bad("a positive number"))?;
                    if !v.is_finite() || v <= 0.0 {
                        return Err(bad("a positive number"));
                    }
                    profile.scale = Some(v);
                }
                "depth_speed" => {
                    profile.depth_speed = Some(value.parse().map_err(|_| bad("an unsigned integer"))?);
                }
                "angle_speed" => {
                    profile.angle_speed = Some(value.parse().map_err(|_| bad("an unsigned integer"))?);
                }
                "parallel" => {
                    profile.parallel = Some(parse_bool(value).ok_or_else(|| bad("true/false"))?);
                }
                _ => {}
            }
        }

        if let Some((line, name)) = pattern_name {
            profile.pattern = Some(match name.as_str() {
                "xor" => TexturePattern::Xor,
                "checker" => TexturePattern::Checker {
                    cell: checker_cell.unwrap_or(DEFAULT_CHECKER_CELL),
                },
                "noise" => TexturePattern::Noise {
                    seed: noise_seed.unwrap_or(DEFAULT_NOISE_SEED),
                },
                other => {
                    return Err(ProfileError::Parse {
                        line,
                        message: format!("unknown pattern '{other}' (expected xor, checker or noise)"),
                    });
                }
            });
        }
        Ok(profile)
    }

    pub fn save(&self, path: Option<&Path>) -> Result<(), ProfileError> {
        let Some(path) = path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ProfileError::Io(e.to_string()))?;
        }
        let tmp = path.with_extension("tmp");
        std::fs::write(&tmp, self.to_text()).map_err(|e| ProfileError::Io(e.to_string()))?;
        std::fs::rename(&tmp, path).map_err(|e| ProfileError::Io(e.to_string()))
    }

    pub fn to_text(&self) -> String {
        let mut body = String::from("# tunnel_fx effect profile v1\n");
        if let Some(v) = self.width {
            body.push_str(&format!("width={v}\n"));
        }
        if let Some(v) = self.height {
            body.push_str(&format!("height={v}\n"));
        }
        match self.pattern {
            Some(TexturePattern::Xor) => body.push_str("pattern=xor\n"),
            Some(TexturePattern::Checker { cell }) => {
                body.push_str(&format!("pattern=checker\nchecker_cell={cell}\n"))
            }
            Some(TexturePattern::Noise { seed }) => {
                body.push_str(&format!("pattern=noise\nnoise_seed={seed}\n"))
            }
            None => {}
        }
        if let Some(v) = self.scale {
            body.push_str(&format!("scale={v}\n"));
        }
        if let Some(v) = self.depth_speed {
            body.push_str(&format!("depth_speed={v}\n"));
        }
        if let Some(v) = self.angle_speed {
            body.push_str(&format!("angle_speed={v}\n"));
        }
        if let Some(v) = self.parallel {
            body.push_str(&format!("parallel={v}\n"));
        }
        body
    }

    /// Overlay the keys this profile sets onto `cfg`.
    pub fn apply(&self, cfg: &mut TunnelConfig) {
        if let Some(v) = self.width {
            cfg.width = v;
        }
        if let Some(v) = self.height {
            cfg.height = v;
        }
        if let Some(v) = self.pattern {
            cfg.pattern = v;
        }
        if let Some(v) = self.scale {
            cfg.scale = v;
        }
        if let Some(v) = self.depth_speed {
            cfg.depth_speed = v;
        }
        if let Some(v) = self.angle_speed {
            cfg.angle_speed = v;
        }
        if let Some(v) = self.parallel {
            cfg.parallel = v;
        }
    }
}

pub const DEFAULT_CHECKER_CELL: usize = 16;
pub const DEFAULT_NOISE_SEED: u64 = 0x7C4E_2026;

pub fn profile_storage_path() -> Option<PathBuf> {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        if !xdg.trim().is_empty() {
            return Some(PathBuf::from(xdg).join("tunnel_fx").join("profile.txt"));
        }
    }
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("tunnel_fx")
            .join("profile.txt"),
    )
}

fn parse_positive(raw: &str) -> Option<usize> {
    raw.parse::<usize>().ok().filter(|&v| v > 0)
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
