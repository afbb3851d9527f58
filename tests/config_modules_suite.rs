use clap::Parser;
use tunnel_fx::config::{Config, PatternArg, RendererMode, profile_from_config};
use tunnel_fx::profile::{DEFAULT_CHECKER_CELL, EffectProfile, ProfileError};
use tunnel_fx::tunnel::{HEIGHT, TexturePattern, TunnelConfig, WIDTH};

fn temp_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir()
        .join(format!("tunnel_fx_test_{}_{}", std::process::id(), name))
        .join("profile.txt")
}

#[test]
fn profile_parses_known_keys_and_ignores_comments() {
    let text = r#"
        # saved by hand
        width = 200
        height=150
        pattern=checker
        checker_cell=4
        depth_speed=3
        angle_speed=1
        scale=24.5
        parallel=yes
        unknown_key=whatever
    "#;
    let p = EffectProfile::parse(text).expect("profile parse should succeed");
    assert_eq!(p.width, Some(200));
    assert_eq!(p.height, Some(150));
    assert_eq!(p.pattern, Some(TexturePattern::Checker { cell: 4 }));
    assert_eq!(p.depth_speed, Some(3));
    assert_eq!(p.angle_speed, Some(1));
    assert_eq!(p.scale, Some(24.5));
    assert_eq!(p.parallel, Some(true));
}

#[test]
fn profile_checker_without_cell_uses_default() {
    let p = EffectProfile::parse("pattern=checker\n").unwrap();
    assert_eq!(
        p.pattern,
        Some(TexturePattern::Checker {
            cell: DEFAULT_CHECKER_CELL
        })
    );
}

#[test]
fn profile_errors_report_line_numbers() {
    let err = EffectProfile::parse("width=10\nheight\n").expect_err("missing '=' should fail");
    assert!(matches!(err, ProfileError::Parse { line: 2, .. }));

    let err = EffectProfile::parse("\n\nwidth=0\n").expect_err("zero width should fail");
    assert!(matches!(err, ProfileError::Parse { line: 3, .. }));

    let err = EffectProfile::parse("scale=-1\n").expect_err("negative scale should fail");
    assert!(matches!(err, ProfileError::Parse { line: 1, .. }));

    let err = EffectProfile::parse("pattern=plasma\n").expect_err("unknown pattern should fail");
    assert!(err.to_string().contains("plasma"));
}

#[test]
fn profile_missing_file_is_empty() {
    let p = EffectProfile::load(Some(&temp_path("missing"))).unwrap();
    assert_eq!(p, EffectProfile::default());
    assert_eq!(EffectProfile::load(None).unwrap(), EffectProfile::default());
}

#[test]
fn profile_save_then_load_preserves_values() {
    let path = temp_path("roundtrip");
    let cfg = TunnelConfig {
        pattern: TexturePattern::Noise { seed: 42 },
        depth_speed: 2,
        angle_speed: 3,
        parallel: true,
        ..TunnelConfig::with_size(64, 32)
    };
    let saved = profile_from_config(&cfg);
    saved.save(Some(&path)).expect("save should succeed");
    let loaded = EffectProfile::load(Some(&path)).expect("load should succeed");
    assert_eq!(loaded, saved);

    let mut resolved = TunnelConfig::default();
    loaded.apply(&mut resolved);
    assert_eq!(resolved, cfg);

    let _ = std::fs::remove_dir_all(path.parent().unwrap());
}

#[test]
fn cli_defaults_are_stable() {
    let cfg = Config::try_parse_from(["tunnel_fx"]).expect("parse should succeed");
    assert_eq!(cfg.fps, 60);
    assert_eq!(cfg.frames, None);
    assert_eq!(cfg.renderer, RendererMode::HalfBlock);
    assert!(cfg.hud);
    assert!(cfg.sync_updates);
    assert!(!cfg.save_profile);

    let resolved = cfg.tunnel_config(&EffectProfile::default());
    assert_eq!(resolved, TunnelConfig::default());
    assert_eq!((resolved.width, resolved.height), (WIDTH, HEIGHT));
}

#[test]
fn cli_flags_override_profile() {
    let profile = EffectProfile::parse("width=50\nheight=40\ndepth_speed=9\npattern=xor\n").unwrap();
    let cfg = Config::try_parse_from([
        "tunnel_fx",
        "--width",
        "80",
        "--pattern",
        "noise",
        "--seed",
        "5",
        "--parallel",
        "true",
        "--renderer",
        "ascii",
    ])
    .expect("parse should succeed");
    assert_eq!(cfg.pattern, Some(PatternArg::Noise));

    let resolved = cfg.tunnel_config(&profile);
    assert_eq!(resolved.width, 80);
    assert_eq!(resolved.height, 40);
    assert_eq!(resolved.depth_speed, 9);
    assert_eq!(resolved.pattern, TexturePattern::Noise { seed: 5 });
    assert!(resolved.parallel);
    assert_eq!(cfg.renderer, RendererMode::Ascii);
}

#[test]
fn cli_renderer_aliases() {
    let cfg = Config::try_parse_from(["tunnel_fx", "--renderer", "hb"]).unwrap();
    assert_eq!(cfg.renderer, RendererMode::HalfBlock);
    let cfg = Config::try_parse_from(["tunnel_fx", "--pattern", "checkerboard"]).unwrap();
    assert_eq!(cfg.pattern, Some(PatternArg::Checker));
}

#[test]
fn cli_pattern_parameters_refine_profile_pattern() {
    let profile = EffectProfile::parse("pattern=checker\nchecker_cell=4\n").unwrap();
    let cfg = Config::try_parse_from(["tunnel_fx", "--checker-cell", "8"]).unwrap();
    assert_eq!(
        cfg.tunnel_config(&profile).pattern,
        TexturePattern::Checker { cell: 8 }
    );

    let profile = EffectProfile::parse("pattern=noise\nnoise_seed=3\n").unwrap();
    let cfg = Config::try_parse_from(["tunnel_fx", "--seed", "11"]).unwrap();
    assert_eq!(
        cfg.tunnel_config(&profile).pattern,
        TexturePattern::Noise { seed: 11 }
    );

    // A seed means nothing to a checker pattern.
    let profile = EffectProfile::parse("pattern=checker\nchecker_cell=4\n").unwrap();
    let cfg = Config::try_parse_from(["tunnel_fx", "--seed", "11"]).unwrap();
    assert_eq!(
        cfg.tunnel_config(&profile).pattern,
        TexturePattern::Checker { cell: 4 }
    );
}
