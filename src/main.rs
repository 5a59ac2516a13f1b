use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use boardscan::detection::preprocessing;
use boardscan::preview::{PREVIEW_JPEG_QUALITY, encode_jpeg, render_preview};
use boardscan::{AnalysisConfig, AnalysisDetails, AnalysisOutcome, BoardAnalyzer, BrandConfig};

#[derive(Parser)]
#[command(name = "boardscan")]
#[command(about = "Check photo quality and measure promotional board coverage")]
struct Cli {
    /// Paths to input image files
    #[arg(value_name = "IMAGE", required = true)]
    images: Vec<PathBuf>,

    /// JSON file overriding thresholds and detection parameters
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Require a brand logo (lowers the compliance score)
    #[arg(long)]
    logo_required: bool,

    /// Brand color that should appear on the board (repeatable)
    #[arg(long = "required-color", value_name = "COLOR")]
    required_colors: Vec<String>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Save annotated JPEG previews to directory
    #[arg(long, value_name = "DIR")]
    preview: Option<PathBuf>,

    /// Save debug outputs to directory (must be empty)
    #[arg(long, value_name = "DIR")]
    debug_out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let default_filter = if args.verbose { "boardscan=debug" } else { "boardscan=info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .init();

    let config = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            AnalysisConfig::from_json_str(&json)?
        }
        None => AnalysisConfig::default(),
    };

    let analyzer = BoardAnalyzer::new()
        .with_config(config)?
        .with_brand(BrandConfig {
            logo_required: args.logo_required,
            required_colors: args.required_colors.clone(),
        });

    if let Some(dir) = &args.debug_out {
        prepare_empty_dir(dir)?;
    }
    if let Some(dir) = &args.preview {
        std::fs::create_dir_all(dir)?;
    }

    let mut inputs = Vec::with_capacity(args.images.len());
    for path in &args.images {
        let bytes = std::fs::read(path).with_context(|| format!("Failed to read image {}", path.display()))?;
        inputs.push(bytes);
    }

    info!(images = inputs.len(), "Running analysis");
    let outcomes = analyzer.analyze_batch(&inputs);

    for (index, ((path, bytes), outcome)) in args.images.iter().zip(&inputs).zip(&outcomes).enumerate() {
        let stem = output_stem(index, path);

        if let Some(dir) = &args.debug_out {
            save_debug_images(&analyzer, bytes, &dir.join(&stem))?;
        }
        if let (Some(dir), AnalysisOutcome::Success(result)) = (&args.preview, outcome) {
            let decoded = preprocessing::decode(bytes)?;
            let board = match &result.analysis {
                AnalysisDetails::ContourAnalysis { board_characteristics, .. } => board_characteristics.dimensions,
                _ => None,
            };
            let jpeg = encode_jpeg(&render_preview(&decoded.image, board), PREVIEW_JPEG_QUALITY)?;
            let out = dir.join(format!("{}_preview.jpg", stem));
            std::fs::write(&out, jpeg)?;
            info!(path = %out.display(), "Saved preview");
        }
    }

    let json = if outcomes.len() == 1 {
        to_json(&outcomes[0], args.pretty)?
    } else {
        to_json(&outcomes, args.pretty)?
    };
    println!("{}", json);

    Ok(())
}

/// Batch index plus file stem, so inputs sharing a name do not collide
fn output_stem(index: usize, path: &Path) -> String {
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    format!("{:03}_{}", index, name)
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
}

/// The directory must be empty or non-existent
fn prepare_empty_dir(dir: &Path) -> anyhow::Result<()> {
    if dir.exists() {
        let entries = std::fs::read_dir(dir)?;
        if entries.count() > 0 {
            anyhow::bail!("Debug directory is not empty: {}", dir.display());
        }
    } else {
        std::fs::create_dir_all(dir)?;
    }
    Ok(())
}

fn save_debug_images(analyzer: &BoardAnalyzer, bytes: &[u8], dir: &Path) -> anyhow::Result<()> {
    let decoded = match preprocessing::decode(bytes) {
        Ok(decoded) => decoded,
        // Nothing to dump for undecodable input; the outcome already says why.
        Err(_) => return Ok(()),
    };
    std::fs::create_dir_all(dir)?;

    decoded
        .image
        .save(dir.join("00_input.png"))
        .map_err(|e| anyhow::anyhow!("Failed to save debug input: {}", e))?;
    preprocessing::to_grayscale(&decoded.image)
        .save(dir.join("01_grayscale.png"))
        .map_err(|e| anyhow::anyhow!("Failed to save debug image: {}", e))?;

    if let Some(edges) = analyzer.edge_map(&decoded).to_image() {
        edges
            .save(dir.join("02_edges.png"))
            .map_err(|e| anyhow::anyhow!("Failed to save debug image: {}", e))?;
    }

    info!(dir = %dir.display(), "Saved debug images");
    Ok(())
}
