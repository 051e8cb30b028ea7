use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sitewatch::data::units::{format_ms, now_ms};
use sitewatch::{compute_analytics, AnalyticsOptions, Settings, Site, SiteStore};

#[derive(Parser, Debug)]
#[command(name = "sitewatch")]
#[command(about = "Availability report over a recorded site collection")]
struct Args {
    /// Path to a JSON file holding the site collection
    #[arg(short, long, default_value = "sites.json")]
    file: PathBuf,

    /// Optional settings file (TOML)
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Analytics window in hours (default: full history)
    #[arg(short, long)]
    window_hours: Option<u64>,

    /// Per-monitor history limit (overrides settings)
    #[arg(long)]
    history_limit: Option<usize>,

    /// Write the report as JSON to this path instead of printing it
    #[arg(short, long)]
    export: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let mut settings = Settings::load(args.settings.as_deref())?;
    if let Some(limit) = args.history_limit {
        settings.history_limit = limit;
    }
    if args.window_hours.is_some() {
        settings.window_hours = args.window_hours;
    }

    let sites = load_sites(&args.file)?;
    tracing::info!(count = sites.len(), "loaded site collection");

    let mut store = SiteStore::new(settings.history_limit);
    store.replace_sites(sites);

    let now = now_ms();
    let options = match settings.window_hours {
        Some(hours) => AnalyticsOptions {
            range: Some((now - hours as i64 * 3_600_000, now)),
            now: Some(now),
        },
        None => AnalyticsOptions {
            range: None,
            now: Some(now),
        },
    };

    match args.export {
        Some(path) => export_report(&store, &options, &path),
        None => {
            print_report(&store, &options);
            Ok(())
        }
    }
}

fn load_sites(path: &Path) -> Result<Vec<Site>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse {}", path.display()))
}

/// Print a per-monitor availability report plus the global totals.
fn print_report(store: &SiteStore, options: &AnalyticsOptions) {
    for site in store.sites() {
        println!("{} ({})", site.display_name(), site.identifier);
        for monitor in &site.monitors {
            let snapshot = compute_analytics(&monitor.history, options);
            println!(
                "  [{}] {} {}  uptime {:.2}%  checks {}  incidents {}",
                monitor.kind.label(),
                monitor.id,
                monitor.status.symbol(),
                snapshot.uptime_percent,
                snapshot.total_checks,
                snapshot.incident_count,
            );
            if let Some(avg) = snapshot.avg_response_time {
                println!(
                    "      avg {:.1}ms  p50 {:.1}ms  p95 {:.1}ms  p99 {:.1}ms",
                    avg,
                    snapshot.p50.unwrap_or(0.0),
                    snapshot.p95.unwrap_or(0.0),
                    snapshot.p99.unwrap_or(0.0),
                );
            }
            if snapshot.incident_count > 0 {
                println!(
                    "      downtime {}  mttr {}",
                    format_ms(snapshot.total_downtime_ms),
                    format_ms(snapshot.mttr_ms as i64),
                );
            }
        }
    }

    let stats = store.stats();
    println!(
        "total uptime {:.1}  total downtime {:.1}  (response-time weighted)",
        stats.total_uptime(),
        stats.total_downtime()
    );
}

/// Write the same report as pretty-printed JSON.
fn export_report(store: &SiteStore, options: &AnalyticsOptions, path: &Path) -> Result<()> {
    let mut export = serde_json::Map::new();

    let stats = store.stats();
    export.insert(
        "totals".to_string(),
        serde_json::json!({
            "total_uptime": stats.total_uptime(),
            "total_downtime": stats.total_downtime(),
        }),
    );

    let sites: Vec<serde_json::Value> = store
        .sites()
        .iter()
        .map(|site| {
            let monitors: Vec<serde_json::Value> = site
                .monitors
                .iter()
                .map(|monitor| {
                    let snapshot = compute_analytics(&monitor.history, options);
                    serde_json::json!({
                        "id": monitor.id,
                        "type": monitor.kind.label(),
                        "status": monitor.status.symbol(),
                        "uptime_percent": snapshot.uptime_percent,
                        "total_checks": snapshot.total_checks,
                        "avg_response_time": snapshot.avg_response_time,
                        "p50": snapshot.p50,
                        "p95": snapshot.p95,
                        "p99": snapshot.p99,
                        "incident_count": snapshot.incident_count,
                        "total_downtime_ms": snapshot.total_downtime_ms,
                        "mttr_ms": snapshot.mttr_ms,
                        "downtime_periods": snapshot.downtime_periods,
                    })
                })
                .collect();

            serde_json::json!({
                "identifier": site.identifier,
                "name": site.name,
                "monitoring": site.monitoring(),
                "monitors": monitors,
            })
        })
        .collect();
    export.insert("sites".to_string(), serde_json::Value::Array(sites));

    let json = serde_json::to_string_pretty(&serde_json::Value::Object(export))?;
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;

    println!("Exported report to: {}", path.display());
    Ok(())
}
