use std::time::Instant;

use anyhow::Result;
use tunnel_fx::tunnel::{Tunnel, TunnelConfig};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    Serial,
    Parallel,
    Both,
}

struct Args {
    mode: Mode,
    frames: usize,
    w: usize,
    h: usize,
    ci_smoke: bool,
    max_ms: f64,
}

fn parse_args() -> Args {
    let mut args = Args {
        mode: Mode::Both,
        frames: 600,
        w: tunnel_fx::tunnel::WIDTH,
        h: tunnel_fx::tunnel::HEIGHT,
        ci_smoke: false,
        max_ms: 4.0,
    };

    let argv = std::env::args().skip(1).collect::<Vec<_>>();
    let mut i = 0usize;
    while i < argv.len() {
        let k = argv[i].as_str();
        let v = argv.get(i + 1).map(|s| s.as_str());
        match (k, v) {
            ("--mode", Some("serial")) => {
                args.mode = Mode::Serial;
                i += 2;
            }
            ("--mode", Some("parallel")) => {
                args.mode = Mode::Parallel;
                i += 2;
            }
            ("--mode", Some("both")) => {
                args.mode = Mode::Both;
                i += 2;
            }
            ("--frames", Some(x)) => {
                if let Ok(n) = x.parse::<usize>() {
                    args.frames = n.max(1);
                }
                i += 2;
            }
            ("--w", Some(x)) => {
                if let Ok(n) = x.parse::<usize>() {
                    args.w = n.max(1);
                }
                i += 2;
            }
            ("--h", Some(x)) => {
                if let Ok(n) = x.parse::<usize>() {
                    args.h = n.max(1);
                }
                i += 2;
            }
            ("--max-ms", Some(x)) => {
                if let Ok(n) = x.parse::<f64>() {
                    args.max_ms = n.max(0.0);
                }
                i += 2;
            }
            ("--ci-smoke", _) => {
                args.ci_smoke = true;
                i += 1;
            }
            _ => {
                eprintln!("ignoring unknown argument: {k}");
                i += 1;
            }
        }
    }
    args
}

fn bench(args: &Args, parallel: bool) -> Result<(f64, u64)> {
    let cfg = TunnelConfig {
        parallel,
        ..TunnelConfig::with_size(args.w, args.h)
    };
    let build_start = Instant::now();
    let mut tunnel = Tunnel::with_config(cfg)?;
    let build_ms = build_start.elapsed().as_secs_f64() * 1000.0;

    let start = Instant::now();
    for _ in 0..args.frames {
        tunnel.step();
    }
    let ms = start.elapsed().as_secs_f64() * 1000.0 / args.frames as f64;

    // Fold the final frame so the loop cannot be optimised away.
    let checksum = tunnel
        .framebuffer()
        .as_bytes()
        .iter()
        .fold(0u64, |acc, &b| acc.wrapping_mul(31).wrapping_add(b as u64));

    println!(
        "{:<8} build {:>8.3} ms  step {:>8.3} ms/frame  {:>8.1} FPS  checksum {:016x}",
        if parallel { "parallel" } else { "serial" },
        build_ms,
        ms,
        if ms > 0.0 { 1000.0 / ms } else { 0.0 },
        checksum
    );
    Ok((ms, checksum))
}

fn main() -> Result<()> {
    tunnel_fx::init_tracing();
    let args = parse_args();
    println!(
        "tunnel benchmark: frames={} size={}x{} mode={:?}",
        args.frames, args.w, args.h, args.mode
    );

    let mut results = Vec::new();
    if matches!(args.mode, Mode::Serial | Mode::Both) {
        results.push(bench(&args, false)?);
    }
    if matches!(args.mode, Mode::Parallel | Mode::Both) {
        results.push(bench(&args, true)?);
    }

    if args.ci_smoke {
        let slow = results.iter().any(|(ms, _)| *ms > args.max_ms);
        let diverged = results.windows(2).any(|w| w[0].1 != w[1].1);
        if slow || diverged {
            eprintln!("CI smoke: FAIL");
            if slow {
                eprintln!("  step slower than {:.3} ms/frame", args.max_ms);
            }
            if diverged {
                eprintln!("  serial and parallel frames differ");
            }
            anyhow::bail!("ci smoke failed");
        }
        println!("CI smoke: PASS (max_ms={:.3})", args.max_ms);
    }
    Ok(())
}
