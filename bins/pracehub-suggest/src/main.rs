//! pracehub-suggest: build the flattened place-suggestion list from the
//! municipality centroid index.
//!
//! The suggestion list powers place autocomplete and is regenerated only
//! when missing, so the daily data build stays idempotent. Set `--force`
//! (or `FORCE_SUGGEST_BUILD=1`) to rebuild.

use anyhow::{bail, Context};
use clap::Parser;
use pracehub_geo::{CentroidIndex, GeoIndex, PlaceSuggestion};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pracehub-suggest")]
#[command(about = "Derive the place suggestion list from the centroid index")]
#[command(version)]
struct Cli {
    /// Path to the centroid index (obce_centroids.json)
    #[arg(long, default_value = "public/data/obce_centroids.json")]
    input: PathBuf,

    /// Path of the suggestion list to write (obce_suggest.json)
    #[arg(long, default_value = "public/data/obce_suggest.json")]
    output: PathBuf,

    /// Rebuild even when the output already exists
    #[arg(long)]
    force: bool,
}

enum BuildOutcome {
    Written(usize),
    SkippedExisting,
}

fn force_from_env() -> bool {
    std::env::var("FORCE_SUGGEST_BUILD")
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false)
}

fn build(input: &Path, output: &Path, force: bool) -> anyhow::Result<BuildOutcome> {
    if output.exists() && !force {
        return Ok(BuildOutcome::SkippedExisting);
    }

    let raw = std::fs::read_to_string(input)
        .with_context(|| format!("missing input: {}", input.display()))?;
    let data: CentroidIndex = serde_json::from_str(&raw)
        .with_context(|| format!("invalid centroid index: {}", input.display()))?;
    let source = data.source.clone();
    let index = GeoIndex::from_index(data);
    if index.is_empty() {
        bail!("invalid input: no keyed places in {}", input.display());
    }

    let mut items: Vec<PlaceSuggestion> = index
        .places()
        .filter_map(|(key, place)| PlaceSuggestion::from_place(key, place))
        .collect();
    // Keyed records come out of a map; sort for a stable output file.
    items.sort_by(|a, b| a.name_key.cmp(&b.name_key).then_with(|| a.key.cmp(&b.key)));

    let out = serde_json::json!({
        "built_at": chrono::Utc::now().to_rfc3339(),
        "source": source,
        "count": items.len(),
        "items": items,
    });

    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("cannot create {}", parent.display()))?;
    }
    std::fs::write(output, serde_json::to_string(&out)?)
        .with_context(|| format!("cannot write {}", output.display()))?;

    Ok(BuildOutcome::Written(items.len()))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .compact()
        .init();

    let cli = Cli::parse();
    let force = cli.force || force_from_env();

    match build(&cli.input, &cli.output, force)? {
        BuildOutcome::Written(count) => {
            info!(count, output = %cli.output.display(), "suggestion list written");
        }
        BuildOutcome::SkippedExisting => {
            info!(
                output = %cli.output.display(),
                "suggestion list exists, skipping (use --force to rebuild)"
            );
        }
    }

    Ok(())
}
