use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "layercomp", version)]
struct Cli {
    /// Log debug events to stderr.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a fresh session's scene snapshot as JSON.
    New(NewArgs),
    /// Render a scene snapshot JSON to a PNG.
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
struct NewArgs {
    /// Output JSON path.
    #[arg(long)]
    out: PathBuf,

    /// Number of default text layers to add.
    #[arg(long, default_value_t = 0)]
    texts: usize,

    /// Seed for text placement.
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input scene snapshot JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Square output size in pixels (defaults to LAYERCOMP_EXPORT_PX, then 1200).
    #[arg(long)]
    size: Option<u32>,

    /// Root directory image references resolve against (defaults to the input's directory).
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Register a font file for text layers, as `NAME=PATH`. Repeatable.
    #[arg(long = "font", value_parser = parse_font_arg)]
    fonts: Vec<(String, PathBuf)>,
}

fn parse_font_arg(s: &str) -> Result<(String, PathBuf), String> {
    let (name, path) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=PATH, got '{s}'"))?;
    if name.trim().is_empty() || path.is_empty() {
        return Err(format!("expected NAME=PATH, got '{s}'"));
    }
    Ok((name.trim().to_string(), PathBuf::from(path)))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::New(args) => cmd_new(args),
        Command::Render(args) => cmd_render(args),
    }
}

/// `RUST_LOG` wins when set; otherwise `--verbose` picks between debug and warn.
fn init_tracing(verbose: bool) {
    let fallback = if verbose { "layercomp=debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_new(args: NewArgs) -> anyhow::Result<()> {
    let mut session = layercomp::Session::with_seed(args.seed);
    for _ in 0..args.texts {
        session.add_text();
    }
    let json = serde_json::to_string_pretty(&session.snapshot()).context("serialize scene")?;
    ensure_parent(&args.out)?;
    std::fs::write(&args.out, json)
        .with_context(|| format!("write scene '{}'", args.out.display()))?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn read_scene_json(path: &Path) -> anyhow::Result<layercomp::SceneSnapshot> {
    let f = File::open(path).with_context(|| format!("open scene '{}'", path.display()))?;
    let r = BufReader::new(f);
    let scene: layercomp::SceneSnapshot =
        serde_json::from_reader(r).with_context(|| "parse scene JSON")?;
    Ok(scene)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let scene = read_scene_json(&args.in_path)?;

    let settings = match args.size {
        Some(px) => layercomp::ExportSettings::square(px),
        None => layercomp::ExportSettings::from_env(),
    };

    let assets_root = match &args.assets {
        Some(root) => root.clone(),
        None => args
            .in_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf(),
    };
    let loader = layercomp::FsImageLoader::new(assets_root);

    let mut text = layercomp::RasterTextEngine::new();
    for (name, path) in &args.fonts {
        let family = text.register_font_file(name, path)?;
        tracing::debug!(%name, %family, "font registered");
    }

    let raster = layercomp::render_scene(&scene, &loader, &mut text, &settings)?;
    let png = raster.encode_png()?;

    ensure_parent(&args.out)?;
    std::fs::write(&args.out, png).with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn ensure_parent(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}
