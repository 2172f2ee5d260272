use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use heightmap::config::{self, Settings};
use heightmap::elevation::summarize;
use heightmap::{ElevationEngine, GenerationParams, drag_samples, timed};

#[derive(Parser, Debug)]
#[command(about = "Generate and sculpt a square elevation grid")]
struct Args {
    /// JSON settings file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    islandness: Option<f64>,
    #[arg(long)]
    size: Option<usize>,
    /// Replay a drag gesture, e.g. `0.2,0.5:0.8,0.5`
    #[arg(long)]
    stroke: Option<String>,
    #[arg(long, default_value = "mountain")]
    tool: String,
    #[arg(long, default_value = "small")]
    brush: String,
    #[arg(long, default_value_t = 500.0)]
    duration_ms: f32,
}

fn parse_point(s: &str) -> anyhow::Result<(f32, f32)> {
    let (x, y) = s
        .split_once(',')
        .with_context(|| format!("expected x,y but got {s:?}"))?;
    Ok((x.trim().parse()?, y.trim().parse()?))
}

fn parse_stroke(s: &str) -> anyhow::Result<((f32, f32), (f32, f32))> {
    let (a, b) = s
        .split_once(':')
        .with_context(|| format!("expected x0,y0:x1,y1 but got {s:?}"))?;
    Ok((parse_point(a)?, parse_point(b)?))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut settings = match &args.config {
        Some(path) => Settings::from_json_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => Settings::default(),
    };
    if let Some(seed) = args.seed {
        settings.seed = seed;
    }
    if let Some(islandness) = args.islandness {
        settings.islandness = islandness;
    }
    if let Some(size) = args.size {
        settings.size = size;
    }

    let params: GenerationParams = settings.params();
    tracing::info!(
        "Generating {0}x{0} grid with seed={1}, islandness={2}",
        settings.size,
        params.seed,
        params.islandness
    );

    let mut timings = Vec::new();
    let mut engine = timed(&mut timings, "generate", || {
        ElevationEngine::with_params(settings.size, params)
    })?;

    if let Some(gesture) = &args.stroke {
        let (from, to) = parse_stroke(gesture)?;
        let tool = config::tool(&args.tool)?;
        let brush = config::brush_size(&args.brush)?;
        let samples = drag_samples(from, to, args.duration_ms, 16.0);
        timed(&mut timings, "paint", || {
            engine.begin_stroke();
            for &(x, y, dt) in &samples {
                engine.paint_at(&tool, x, y, &brush, dt);
            }
        });
        tracing::info!(
            "Painted {} samples with tool={} brush={}",
            samples.len(),
            args.tool,
            args.brush
        );
    }

    tracing::info!("Timings:");
    for t in &timings {
        tracing::info!("  {:20} {:8.1} ms", t.name, t.ms);
    }

    let stats = summarize(engine.elevation_grid());
    tracing::info!("Elevation:");
    tracing::info!("  min           {:8.3}", stats.min);
    tracing::info!("  max           {:8.3}", stats.max);
    tracing::info!("  mean          {:8.3}", stats.mean);
    tracing::info!("  land fraction {:8.3}", stats.land_fraction);
    tracing::info!("  center mean   {:8.3}", stats.center_mean);
    tracing::info!("  corner mean   {:8.3}", stats.corner_mean);
    tracing::info!("  unsaved paint {}", engine.has_unsaved_paint());

    Ok(())
}
