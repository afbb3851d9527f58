use crate::profile::{DEFAULT_CHECKER_CELL, DEFAULT_NOISE_SEED, EffectProfile};
use crate::tunnel::{TexturePattern, TunnelConfig};
use clap::{Parser, ValueEnum};

#[derive(Parser, Debug, Clone)]
#[command(name = "tunnel_fx", version, about = "Lookup-table tunnel effect, previewed in the terminal")]
pub struct Config {
    #[arg(long)]
    pub width: Option<usize>,

    #[arg(long)]
    pub height: Option<usize>,

    #[arg(long, value_enum)]
    pub pattern: Option<PatternArg>,

    #[arg(long)]
    pub checker_cell: Option<usize>,

    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long)]
    pub scale: Option<f32>,

    #[arg(long)]
    pub depth_speed: Option<u32>,

    #[arg(long)]
    pub angle_speed: Option<u32>,

    #[arg(long, action = clap::ArgAction::Set)]
    pub parallel: Option<bool>,

    /// Effect profile (key=value). Defaults to the per-user config location.
    #[arg(long)]
    pub profile: Option<String>,

    /// Write the resolved parameters to the profile path and exit.
    #[arg(long, default_value_t = false)]
    pub save_profile: bool,

    #[arg(long, default_value_t = 60)]
    pub fps: u32,

    /// Steps to run. Defaults to one full animation period.
    #[arg(long)]
    pub frames: Option<u64>,

    #[arg(long, value_enum, default_value_t = RendererMode::HalfBlock)]
    pub renderer: RendererMode,

    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub hud: bool,

    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub sync_updates: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PatternArg {
    Xor,
    #[value(alias = "checkerboard")]
    Checker,
    Noise,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RendererMode {
    #[value(alias = "ansi", alias = "text")]
    Ascii,
    #[value(name = "half-block", alias = "halfblock", alias = "half_block", alias = "hb")]
    HalfBlock,
}

impl PatternArg {
    pub fn to_pattern(self, checker_cell: Option<usize>, seed: Option<u64>) -> TexturePattern {
        match self {
            Self::Xor => TexturePattern::Xor,
            Self::Checker => TexturePattern::Checker {
                cell: checker_cell.unwrap_or(DEFAULT_CHECKER_CELL).max(1),
            },
            Self::Noise => TexturePattern::Noise {
                seed: seed.unwrap_or(DEFAULT_NOISE_SEED),
            },
        }
    }
}

impl Config {
    /// Built-in defaults, overlaid by `profile`, overlaid by explicit flags.
    pub fn tunnel_config(&self, profile: &EffectProfile) -> TunnelConfig {
        let mut cfg = TunnelConfig::default();
        profile.apply(&mut cfg);

        if let Some(v) = self.width {
            cfg.width = v;
        }
        if let Some(v) = self.height {
            cfg.height = v;
        }
        if let Some(p) = self.pattern {
            cfg.pattern = p.to_pattern(self.checker_cell, self.seed);
        }
        // Pattern parameters also refine a pattern chosen by the profile.
        match &mut cfg.pattern {
            TexturePattern::Checker { cell } => {
                if let Some(v) = self.checker_cell {
                    *cell = v.max(1);
                }
            }
            TexturePattern::Noise { seed } => {
                if let Some(v) = self.seed {
                    *seed = v;
                }
            }
            TexturePattern::Xor => {}
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
        cfg
    }
}

/// Profile capturing every field of `cfg`.
pub fn profile_from_config(cfg: &TunnelConfig) -> EffectProfile {
    EffectProfile {
        width: Some(cfg.width),
        height: Some(cfg.height),
        pattern: Some(cfg.pattern),
        scale: Some(cfg.scale),
        depth_speed: Some(cfg.depth_speed),
        angle_speed: Some(cfg.angle_speed),
        parallel: Some(cfg.parallel),
    }
}
