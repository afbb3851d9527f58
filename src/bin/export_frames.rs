use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tunnel_fx::config::PatternArg;
use tunnel_fx::export::{ExportFormat, frame_file_name, write_ppm, write_rgba};
use tunnel_fx::tunnel::{HEIGHT, Tunnel, TunnelConfig, WIDTH};

const DEFAULT_OUTPUT: &str = "frames";

#[derive(Parser, Debug, Clone)]
#[command(
    name = "export_frames",
    version,
    about = "Offline tunnel export (PPM sequence or raw RGBA stream)"
)]
pub(crate) struct Cli {
    /// Output directory for `ppm`, output file for `rgba`.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_OUTPUT)]
    pub(crate) out: PathBuf,

    #[arg(long, value_enum, default_value_t = ExportFormat::Ppm)]
    pub(crate) format: ExportFormat,

    /// Frames to write. Defaults to one full animation period.
    #[arg(long)]
    pub(crate) frames: Option<u64>,

    /// Clock value of the first exported frame.
    #[arg(long, default_value_t = 0)]
    pub(crate) start: u64,

    #[arg(long, default_value_t = WIDTH)]
    pub(crate) width: usize,

    #[arg(long, default_value_t = HEIGHT)]
    pub(crate) height: usize,

    #[arg(long, value_enum, default_value_t = PatternArg::Xor)]
    pub(crate) pattern: PatternArg,

    #[arg(long)]
    pub(crate) checker_cell: Option<usize>,

    #[arg(long)]
    pub(crate) seed: Option<u64>,

    #[arg(long, default_value_t = 1)]
    pub(crate) depth_speed: u32,

    #[arg(long, default_value_t = 0)]
    pub(crate) angle_speed: u32,

    #[arg(long, default_value_t = false)]
    pub(crate) parallel: bool,
}

pub(crate) fn validate_args(args: &Cli) -> Result<()> {
    if args.width == 0 {
        bail!("--width must be >= 1");
    }
    if args.height == 0 {
        bail!("--height must be >= 1");
    }
    if args.frames == Some(0) {
        bail!("--frames must be >= 1");
    }
    Ok(())
}

pub(crate) fn tunnel_config(args: &Cli) -> TunnelConfig {
    TunnelConfig {
        pattern: args.pattern.to_pattern(args.checker_cell, args.seed),
        depth_speed: args.depth_speed,
        angle_speed: args.angle_speed,
        parallel: args.parallel,
        ..TunnelConfig::with_size(args.width, args.height)
    }
}

fn main() -> Result<()> {
    tunnel_fx::init_tracing();
    let args = Cli::parse();
    run(args)
}

fn run(args: Cli) -> Result<()> {
    validate_args(&args)?;

    let mut tunnel = Tunnel::with_config(tunnel_config(&args)).context("construct tunnel")?;
    let frame_count = args.frames.unwrap_or(tunnel.period() as u64);
    tunnel.seek(args.start);

    let start = Instant::now();
    match args.format {
        ExportFormat::Ppm => export_ppm_sequence(&mut tunnel, &args.out, frame_count)?,
        ExportFormat::Rgba => export_rgba_stream(&mut tunnel, &args.out, frame_count)?,
    }

    let elapsed = start.elapsed().as_secs_f64();
    println!(
        "exported {} frame(s) {}x{} {:?} -> {} in {:.2}s",
        frame_count,
        tunnel.width(),
        tunnel.height(),
        args.format,
        args.out.display(),
        elapsed
    );
    Ok(())
}

fn export_ppm_sequence(tunnel: &mut Tunnel, dir: &Path, frame_count: u64) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("create output directory {}", dir.display()))?;
    for i in 0..frame_count {
        if i > 0 {
            tunnel.step();
        }
        let path = dir.join(frame_file_name(i));
        let file = File::create(&path).with_context(|| format!("create {}", path.display()))?;
        let mut w = BufWriter::new(file);
        write_ppm(&tunnel.framebuffer(), &mut w).with_context(|| format!("write {}", path.display()))?;
        w.flush()?;
        tracing::trace!(frame = i, clock = tunnel.clock(), "wrote ppm frame");
    }
    Ok(())
}

fn export_rgba_stream(tunnel: &mut Tunnel, path: &Path, frame_count: u64) -> Result<()> {
    let mut parent = path.parent().unwrap_or_else(|| Path::new(""));
    if parent == Path::new("") {
        parent = Path::new(".");
    }
    fs::create_dir_all(parent)
        .with_context(|| format!("create output directory {}", parent.display()))?;

    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut w = BufWriter::new(file);
    for i in 0..frame_count {
        if i > 0 {
            tunnel.step();
        }
        write_rgba(&tunnel.framebuffer(), &mut w).context("write rgba frame")?;
        tracing::trace!(frame = i, clock = tunnel.clock(), "wrote rgba frame");
    }
    w.flush()?;
    Ok(())
}
