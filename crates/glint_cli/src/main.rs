use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use glint_core::{default_scene_json, load_scene_file, MAX_DEPTH_LIMIT};
use glint_renderer::{save_png, RenderConfig, RenderJob};

/// Render a JSON scene of spheres and planes to a PNG image.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Scene description (JSON)
    #[clap(required_unless_present = "dump_default_scene")]
    scene: Option<PathBuf>,

    /// Output image path
    #[clap(short, long, default_value = "out.png")]
    output: PathBuf,

    /// Maximum reflection bounces (overrides the scene file)
    #[clap(long, value_parser = clap::value_parser!(u32).range(0..=MAX_DEPTH_LIMIT as i64))]
    max_depth: Option<u32>,

    /// Worker threads (defaults to one per core)
    #[clap(short = 'j', long)]
    threads: Option<usize>,

    /// Image rows per parallel work item
    #[clap(long)]
    band_height: Option<u32>,

    /// Render on a single thread
    #[clap(long, action)]
    serial: bool,

    /// Print the built-in example scene and exit
    #[clap(long, action)]
    dump_default_scene: bool,

    /// Log per-band progress
    #[clap(short, long, action)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    if args.dump_default_scene {
        let json = default_scene_json().context("failed to serialize the default scene")?;
        println!("{}", json);
        return Ok(());
    }

    let Some(scene_path) = args.scene.as_ref() else {
        anyhow::bail!("no scene file given");
    };

    log::info!("Starting Glint");

    let desc = load_scene_file(scene_path)
        .with_context(|| format!("failed to load scene {}", scene_path.display()))?;

    let mut config = RenderConfig::default().with_settings(&desc.render);
    if let Some(max_depth) = args.max_depth {
        config = config.with_max_depth(max_depth);
    }
    if let Some(threads) = args.threads {
        config = config.with_threads(threads);
    }
    if let Some(band_height) = args.band_height {
        config = config.with_band_height(band_height);
    }

    let job = RenderJob::new(&desc, config).context("failed to set up render")?;
    let image = if args.serial {
        job.render()
    } else {
        job.render_parallel()
    }
    .context("render failed")?;

    save_png(&image, &args.output)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    Ok(())
}
