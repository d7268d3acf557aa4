use std::path::PathBuf;
use std::time::Duration;

use catalog::catalogue::{build_catalogue, most_recent_event_id};
use catalog::source::CatalogSource;
use clap::Parser;
use foundation::{MineClock, SystemClock, UtcOffset};
use pipeline::backend::{EventWindow, LocalBackend, RenderBackend};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod headless;
mod http_source;
mod prefs_file;

use headless::HeadlessSink;
use http_source::HttpCatalogSource;
use prefs_file::FilePrefStore;

/// Live refresh cadence; outside live mode the configured rate applies.
const LIVE_REFRESH_SECS: u64 = 30;

/// Pacing between mine piece loads, so startup stays responsive.
const PIECE_LOAD_INTERVAL_MS: u64 = 25;

#[derive(Debug, Parser)]
#[command(name = "viewer", about = "Seismic monitoring scene service")]
struct Args {
    /// Base URL of the monitoring API.
    #[arg(long, env = "QUAKE_API_URL")]
    api_url: String,

    /// Bearer token for the API, if it requires one.
    #[arg(long, env = "QUAKE_AUTH_TOKEN")]
    auth_token: Option<String>,

    /// Site code to scope queries to.
    #[arg(long, env = "QUAKE_SITE")]
    site: Option<String>,

    /// Network code within the site.
    #[arg(long, env = "QUAKE_NETWORK")]
    network: Option<String>,

    /// Mine UTC offset, e.g. "+10:00". Overrides the site listing.
    #[arg(long, env = "QUAKE_UTC_OFFSET")]
    utc_offset: Option<String>,

    /// Refresh continuously every 30 seconds.
    #[arg(long)]
    live: bool,

    /// Minutes between refreshes outside live mode.
    #[arg(long)]
    refresh_rate: Option<f64>,

    /// Workflow status filter for events.
    #[arg(long, default_value = "accepted")]
    status: String,

    /// Focus window length, in hours back from now.
    #[arg(long, default_value_t = 2190.0)]
    focus_hours: f64,

    /// Historical window length, in hours back from now.
    #[arg(long, default_value_t = 8760.0)]
    historical_hours: f64,

    /// Preference file path.
    #[arg(long, default_value = "quake-prefs.json")]
    prefs: PathBuf,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    if let Err(e) = run(args).await {
        tracing::error!(error = %e, "viewer failed");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let store = FilePrefStore::load(args.prefs.clone());
    let live = args.live || prefs::get_bool(&store, prefs::KEY_LIVE_MODE, false);
    let refresh_rate = args
        .refresh_rate
        .unwrap_or_else(|| prefs::get_number(&store, prefs::KEY_REFRESH_RATE, 10.0));
    let preset = prefs::get_string(&store, prefs::KEY_COLOR_PRESET, "coolwarm");

    let source = HttpCatalogSource::new(
        args.api_url.clone(),
        args.auth_token.clone(),
        args.site.clone(),
        args.network.clone(),
    );

    let offset = resolve_offset(&source, args.site.as_deref(), args.utc_offset.as_deref()).await;
    let clock = MineClock::new(SystemClock, offset);
    info!(offset_minutes = offset.minutes(), live, "starting viewer");

    let mut backend = LocalBackend::new(source, HeadlessSink::default());
    backend.update_mine().await?;
    while backend.load_next_piece()? {
        tokio::time::sleep(Duration::from_millis(PIECE_LOAD_INTERVAL_MS)).await;
    }

    backend.update_color_preset(&preset).await?;
    backend.update_stations().await?;

    let interval = if live {
        Duration::from_secs(LIVE_REFRESH_SECS)
    } else {
        Duration::from_secs_f64(refresh_rate * 60.0)
    };

    loop {
        let window = EventWindow {
            now: clock.query_instant_days_ago(0.0),
            focus_time: clock.query_instant_days_ago(args.focus_hours / 24.0),
            historical_time: clock.query_instant_days_ago(args.historical_hours / 24.0),
            status: args.status.clone(),
            monitor_live: live,
        };
        backend.update_events(&window).await?;

        for event in backend.pipeline.drain_events() {
            info!(?event, "scene update");
        }

        let catalogue = build_catalogue(backend.pipeline.last_focus_events(), &clock);
        if live {
            // Live mode follows the newest event.
            if let Some(id) = most_recent_event_id(&catalogue) {
                let id = id.to_string();
                backend.activate_event(&id).await?;
            }
        } else if catalogue.is_empty() {
            warn!("no events in the focus window");
        }

        tokio::time::sleep(interval).await;
    }
}

/// Mine offset: explicit flag first, then the site listing, then UTC.
async fn resolve_offset<S: CatalogSource>(
    source: &S,
    site: Option<&str>,
    flag: Option<&str>,
) -> UtcOffset {
    if let Some(raw) = flag {
        match UtcOffset::parse(raw) {
            Ok(offset) => return offset,
            Err(e) => warn!(raw, error = %e, "ignoring invalid utc offset flag"),
        }
    }
    match source.fetch_sites().await {
        Ok(sites) => {
            let matched = match site {
                Some(code) => sites.iter().find(|s| s.code == code),
                None => sites.first(),
            };
            if let Some(site) = matched {
                match UtcOffset::parse(&site.timezone) {
                    Ok(offset) => return offset,
                    Err(e) => {
                        warn!(timezone = %site.timezone, error = %e, "site timezone unusable")
                    }
                }
            } else {
                warn!(?site, "site not found in listing");
            }
        }
        Err(e) => warn!(error = %e, "site listing unavailable"),
    }
    UtcOffset::default()
}
