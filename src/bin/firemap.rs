use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use firemap_rs::{fetch::Client, registry::MapContext, sources, stats, storage};
use num_format::{Locale, ToFormattedString};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "firemap",
    version,
    about = "Ingest, normalize, style & filter fire-station geodata layers"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load every configured source (and optionally export and print stats).
    Load(LoadArgs),
}

#[derive(Args, Debug)]
struct LoadArgs {
    /// Directory or base URL holding the export documents.
    #[arg(short, long)]
    root: String,
    /// Write all loaded layers as one GeoJSON FeatureCollection.
    #[arg(long)]
    export: Option<PathBuf>,
    /// Write the per-station coverage summary as CSV.
    #[arg(long)]
    coverage: Option<PathBuf>,
    /// Print coverage and incident statistics to stdout.
    #[arg(long, default_value_t = false)]
    stats: bool,
}

fn fmt_opt(v: Option<f64>) -> String {
    match v {
        Some(x) if x.is_finite() => {
            // Format up to 4 decimals, then trim trailing zeros and trailing dot.
            let s = format!("{:.4}", x);
            s.trim_end_matches('0').trim_end_matches('.').to_string()
        }
        _ => "NA".to_string(),
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Load(args) => cmd_load(args),
    }
}

fn cmd_load(args: LoadArgs) -> Result<()> {
    let client = Client::default();
    let root = sources::SourceRoot::parse(&args.root);
    let mut ctx = MapContext::new();

    let layers = sources::load_all(&mut ctx, &root, &client);
    if layers.is_empty() {
        anyhow::bail!("no source loaded from {}", args.root);
    }

    let mut total = 0usize;
    for layer in &layers {
        let group = ctx.registry.group(layer.group);
        let n = group.features().len();
        total += n;
        println!(
            "{:40} {:>8} features{}",
            layer.label,
            n.to_formatted_string(&Locale::en),
            if group.is_shown() { "  [shown]" } else { "" }
        );
    }
    println!(
        "{} layers, {} features, {} registered for station filtering",
        layers.len(),
        total.to_formatted_string(&Locale::en),
        ctx.registry.entry_count().to_formatted_string(&Locale::en)
    );

    if let Some(path) = args.export.as_ref() {
        storage::save_geojson(&ctx, path)?;
        eprintln!("Saved layers to {}", path.display());
    }

    if let Some(path) = args.coverage.as_ref() {
        let rows = stats::coverage_summary(&ctx.registry);
        storage::save_coverage_csv(&rows, path)?;
        eprintln!("Saved coverage to {}", path.display());
    }

    if args.stats {
        for row in stats::coverage_summary(&ctx.registry) {
            let station = row
                .key
                .station
                .as_ref()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "unresolved".to_string());
            println!(
                "{} • station {}  features={}",
                row.key.layer_key, station, row.features
            );
        }
        for layer in &layers {
            if let Some(values) = layer.incidents.as_ref() {
                let s = stats::incident_summary(values);
                println!(
                    "{}  count={} missing={}  min={} max={} mean={} median={}",
                    layer.label,
                    s.count,
                    s.missing,
                    fmt_opt(s.min),
                    fmt_opt(s.max),
                    fmt_opt(s.mean),
                    fmt_opt(s.median)
                );
            }
        }
    }

    Ok(())
}
