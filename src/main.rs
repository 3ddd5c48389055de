//! Terrace command line tool: build, generate and convert terrain documents.
//!
//! Usage: cargo run --release -- [OPTIONS]
//!
//! Options:
//!   --config <PATH>      Editor configuration (JSON)
//!   --input <PATH>       Open an existing document (.json project or .png heightmap)
//!   --rows <N>           Grid rows for a new terrain
//!   --cols <N>           Grid columns for a new terrain
//!   --width <W>          Extent along X for a new terrain
//!   --height <H>         Extent along Z for a new terrain
//!   --algorithm <NAME>   Apply a registered algorithm (repeatable, in order)
//!   --seed <SEED>        Seed for the fbm-noise algorithm
//!   --output <PATH>      Save the result; the format follows the extension
//!   --gpu                Upload terrain buffers to a headless GPU device

use std::path::PathBuf;
use std::time::Instant;

use terrace::algorithm::{FbmNoise, FbmParams};
use terrace::core::config::EditorConfig;
use terrace::core::logging;
use terrace::core::types::Result;
use terrace::editor::TerrainEditor;
use terrace::render::GpuContext;

fn main() {
    logging::init();

    let args: Vec<String> = std::env::args().collect();
    if let Err(e) = run(&args) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: &[String]) -> Result<()> {
    let config = match parse_path_arg(args, "--config") {
        Some(path) => {
            log::info!("Loading config from {}", path.display());
            EditorConfig::load(&path)?
        }
        None => EditorConfig::default(),
    };

    let mut editor = TerrainEditor::new(config.clone())?;

    if let Some(input) = parse_path_arg(args, "--input") {
        editor.open(&input)?;
    } else {
        let rows = parse_usize_arg(args, "--rows").unwrap_or(config.default_rows);
        let cols = parse_usize_arg(args, "--cols").unwrap_or(config.default_columns);
        let width = parse_f32_arg(args, "--width").unwrap_or(config.default_width);
        let height = parse_f32_arg(args, "--height").unwrap_or(config.default_height);
        editor.create_terrain(rows, cols, width, height)?;
    }

    if let Some(seed) = parse_u32_arg(args, "--seed") {
        editor.algorithms_mut().register(Box::new(FbmNoise::new(FbmParams {
            seed,
            ..Default::default()
        })));
    }

    let patch = editor.page().patch();
    println!("=== Terrace ===");
    println!("Terrain: {}", editor.page().name);
    println!("Grid:    {} x {} ({} vertices)", patch.rows(), patch.columns(), patch.vertex_count());
    println!("Extent:  {} x {}", patch.width(), patch.height());
    println!("Layers:  {}", patch.texture_count());
    println!();

    for name in parse_all_str_args(args, "--algorithm") {
        let start = Instant::now();
        editor.apply_algorithm(&name)?;
        println!("Applied {:<12} {:.1}ms", name, start.elapsed().as_secs_f64() * 1000.0);
    }

    let kind = if args.iter().any(|a| a == "--gpu") {
        let gpu = GpuContext::new_headless_blocking()?;
        editor.update_gpu(&gpu.device, &gpu.queue)?
    } else {
        editor.sync_buffers()
    };
    let buffers = editor.buffers();
    println!(
        "Buffers: {:?}, {} vertices, {} indices, {} layers",
        kind,
        buffers.vertices().len(),
        buffers.index_count(),
        buffers.layers().len()
    );

    let heights = editor.page().patch().heights();
    let (min, max) = heights
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &h| (lo.min(h), hi.max(h)));
    println!("Heights: {:.2} .. {:.2}", min, max);

    if let Some(output) = parse_path_arg(args, "--output") {
        editor.save(&output)?;
        println!("Saved:   {}", output.display());
    }

    Ok(())
}

fn parse_f32_arg(args: &[String], flag: &str) -> Option<f32> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_u32_arg(args: &[String], flag: &str) -> Option<u32> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_usize_arg(args: &[String], flag: &str) -> Option<usize> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_path_arg(args: &[String], flag: &str) -> Option<PathBuf> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(PathBuf::from)
}

/// Every value following `flag`, in command line order
fn parse_all_str_args(args: &[String], flag: &str) -> Vec<String> {
    args.windows(2)
        .filter(|pair| pair[0] == flag)
        .map(|pair| pair[1].clone())
        .collect()
}
