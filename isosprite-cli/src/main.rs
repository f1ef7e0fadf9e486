use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use isosprite_core::config::{self, NormalizeConfig, SpriteConfig};
use isosprite_core::normalize::NormalizeOutcome;
use isosprite_core::pipeline;
use isosprite_core::render::SoftwareRenderer;
use isosprite_core::VERSION;

#[derive(Parser, Debug)]
#[command(
    name = "isosprite",
    version = VERSION,
    about = "Isometric sprite rendering and normalization"
)]
struct Cli {
    /// YAML file overriding pipeline constants
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a glTF model into a transparent square PNG
    Render {
        input: PathBuf,
        output: PathBuf,
        /// Side length in pixels (defaults to render.default_size)
        size: Option<u32>,
        /// Also write render metadata as JSON
        #[arg(long)]
        meta: Option<PathBuf>,
    },
    /// Crop, pad, scale and center sprites in place
    Normalize {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        #[arg(long)]
        size: Option<u32>,
        #[arg(long)]
        pad_ratio: Option<f32>,
    },
    /// Print the effective configuration as YAML
    Config,
}

fn load_config(path: Option<&Path>) -> Result<SpriteConfig> {
    match path {
        Some(p) => {
            config::load_from_path(p).with_context(|| format!("loading config {}", p.display()))
        }
        None => Ok(SpriteConfig::default()),
    }
}

fn render(
    input: &Path,
    output: &Path,
    size: u32,
    meta: Option<&Path>,
    cfg: &SpriteConfig,
) -> Result<()> {
    let mut backend = SoftwareRenderer::new(&cfg.render);
    let summary = pipeline::render_model(input, output, size, cfg, &mut backend)
        .with_context(|| format!("rendering {}", input.display()))?;
    if let Some(meta_path) = meta {
        isosprite_core::export::write_meta(&summary.meta(input, output), meta_path)
            .with_context(|| format!("writing metadata {}", meta_path.display()))?;
    }
    println!("Rendered {} -> {}", input.display(), output.display());
    Ok(())
}

/// Normalizes every file, then fails if any of them failed.
fn normalize_files(files: &[PathBuf], cfg: &NormalizeConfig) -> Result<()> {
    cfg.validate()?;
    let report = pipeline::normalize_batch(files, cfg);
    for (path, result) in &report.results {
        match result {
            Ok(NormalizeOutcome::Normalized(_)) => println!("normalized: {}", path.display()),
            Ok(NormalizeOutcome::Untouched) => println!("unchanged: {}", path.display()),
            Err(e) => eprintln!("failed: {}: {}", path.display(), e),
        }
    }
    if !report.is_success() {
        bail!("{} of {} files failed to normalize", report.failure_count(), report.results.len());
    }
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let mut cfg = load_config(cli.config.as_deref())?;
    match cli.cmd {
        Command::Render { input, output, size, meta } => {
            let size = size.unwrap_or(cfg.render.default_size);
            render(&input, &output, size, meta.as_deref(), &cfg)
        }
        Command::Normalize { files, size, pad_ratio } => {
            if let Some(size) = size {
                cfg.normalize.out_size = size;
            }
            if let Some(ratio) = pad_ratio {
                cfg.normalize.pad_ratio = ratio;
            }
            normalize_files(&files, &cfg.normalize)
        }
        Command::Config => {
            print!("{}", config::to_yaml(&cfg)?);
            Ok(())
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    run(Cli::parse())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use tempfile::TempDir;

    #[test]
    fn render_size_is_optional() {
        let args = ["isosprite", "render", "in.gltf", "out/sprite.png"];
        let cli = Cli::try_parse_from(args).expect("parse");
        match cli.cmd {
            Command::Render { size, meta, .. } => {
                assert_eq!(size, None);
                assert_eq!(meta, None);
            }
            other => panic!("unexpected {other:?}"),
        }
        let args = ["isosprite", "render", "in.gltf", "out.png", "256"];
        let cli = Cli::try_parse_from(args).expect("parse");
        assert!(matches!(cli.cmd, Command::Render { size: Some(256), .. }));
    }

    #[test]
    fn render_requires_input_and_output() {
        assert!(Cli::try_parse_from(["isosprite", "render", "in.gltf"]).is_err());
    }

    #[test]
    fn normalize_requires_a_file() {
        let err = Cli::try_parse_from(["isosprite", "normalize"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn normalize_accepts_many_files() {
        let cli = Cli::try_parse_from([
            "isosprite", "--config", "c.yaml", "normalize", "a.png", "b.png", "--pad-ratio", "0.1",
        ])
        .expect("parse");
        assert_eq!(cli.config, Some(PathBuf::from("c.yaml")));
        match cli.cmd {
            Command::Normalize { files, pad_ratio, size } => {
                assert_eq!(files.len(), 2);
                assert_eq!(pad_ratio, Some(0.1));
                assert_eq!(size, None);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn failed_file_fails_the_batch_after_the_rest_run() {
        let dir = TempDir::new().expect("temp dir");
        let good = dir.path().join("good.png");
        let mut image = RgbaImage::new(40, 40);
        for y in 10..20 {
            for x in 5..30 {
                image.put_pixel(x, y, Rgba([20, 120, 60, 255]));
            }
        }
        image.save(&good).expect("save");
        let missing = dir.path().join("missing.png");

        let cfg = NormalizeConfig {
            out_size: 64, ..NormalizeConfig::default()
        };
        let err = normalize_files(&[missing, good.clone()], &cfg).unwrap_err();
        assert!(err.to_string().contains("1 of 2"), "{err}");
        assert_eq!(image::open(&good).expect("decode").to_rgba8().dimensions(), (64, 64));
    }

    #[test]
    fn normalize_command_honors_size_override() {
        let dir = TempDir::new().expect("temp dir");
        let sprite = dir.path().join("sprite.png");
        let mut image = RgbaImage::new(30, 30);
        image.put_pixel(12, 14, Rgba([255, 255, 255, 255]));
        image.save(&sprite).expect("save");

        let args = ["isosprite", "normalize", "--size", "48", sprite.to_str().expect("utf-8 path")];
        run(Cli::try_parse_from(args).expect("parse")).expect("normalize");
        assert_eq!(image::open(&sprite).expect("decode").to_rgba8().dimensions(), (48, 48));
    }

    #[test]
    fn invalid_pad_ratio_is_rejected() {
        let cfg = NormalizeConfig {
            pad_ratio: -1.0, ..NormalizeConfig::default()
        };
        assert!(normalize_files(&[PathBuf::from("unused.png")], &cfg).is_err());
    }
}
