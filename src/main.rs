//! carrier-locator - Closest logistics carriers for a pickup address
//!
//! This is the composition root that wires together all the components.

use anyhow::Context;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use carrier_locator::adapters::inbound::{console, ApiServer};
use carrier_locator::adapters::outbound::{
    CsvCarrierLoader, GoogleGeocoder, InMemoryCarrierRepository, LeafletMapRenderer,
    NominatimGeocoder,
};
use carrier_locator::config::{load_config, Config, GeocoderKind};
use carrier_locator::{CarrierLocatorService, Geocoder, MapModelBuilder, MapRenderer};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::fmt::format::FmtSpan;

/// Closest logistics carriers for a pickup address
#[derive(Parser)]
#[command(name = "carrier-locator")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Pickup address; multiple words are joined with spaces
    address: Vec<String>,

    /// Number of carriers to list
    #[arg(short = 'n', long)]
    count: Option<usize>,

    /// Where to write the HTML map
    #[arg(short, long)]
    output: Option<String>,

    /// Serve the HTTP API after any one-shot query
    #[arg(long)]
    serve: bool,
}

impl Cli {
    fn address(&self) -> String {
        self.address.join(" ").trim().to_string()
    }

    /// Command-line flags take precedence over the environment.
    fn apply(&self, cfg: &mut Config) {
        if let Some(count) = self.count {
            cfg.result_count = count;
        }
        if let Some(output) = &self.output {
            cfg.map_output_path = output.clone();
        }
        if self.serve {
            cfg.api_enabled = true;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration from environment
    let mut cfg = load_config()?;
    cli.apply(&mut cfg);

    // Setup logging
    let log_level = if cfg.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr)
        .init();

    cfg.validate().context("invalid configuration")?;

    let address = cli.address();
    if address.is_empty() && !cfg.api_enabled {
        Cli::command()
            .error(
                ErrorKind::MissingRequiredArgument,
                "an ADDRESS is required unless --serve is given",
            )
            .exit();
    }

    tracing::info!(
        "starting carrier-locator dataset={} geocoder={}",
        cfg.dataset_source,
        cfg.geocoder
    );

    // ===== COMPOSITION ROOT =====
    // Wire up all adapters and services

    // 1. Create outbound adapters

    // Carrier dataset (CSV, loaded once)
    let carrier_repo = match CsvCarrierLoader::new().load(&cfg.dataset_source).await {
        Ok(report) => InMemoryCarrierRepository::new(report.carriers),
        Err(e) => {
            tracing::error!("failed to load carrier dataset {}: {}", cfg.dataset_source, e);
            InMemoryCarrierRepository::empty()
        }
    };

    // Geocoder (Google or Nominatim)
    let geocoder = build_geocoder(&cfg)?;

    // Map renderer (Leaflet HTML)
    let renderer: Arc<dyn MapRenderer> = Arc::new(LeafletMapRenderer::new(cfg.map_zoom));

    // 2. Create application service
    let service = Arc::new(CarrierLocatorService::new(
        Arc::new(carrier_repo),
        geocoder,
        Some(renderer),
        MapModelBuilder::new(cfg.coverage_radius_meters),
        cfg.result_count,
    ));

    // 3. Run a single query, or serve the API
    if !address.is_empty() {
        run_query(&service, &address, &cfg.map_output_path).await?;
    }

    if cfg.api_enabled {
        let server = ApiServer::new(cfg.api_listen_addr.clone(), service);
        server.run().await?;
    }

    Ok(())
}

fn build_geocoder(cfg: &Config) -> anyhow::Result<Arc<dyn Geocoder>> {
    let timeout = Duration::from_secs(cfg.geocode_timeout_secs);
    let geocoder: Arc<dyn Geocoder> = match cfg.geocoder_kind()? {
        GeocoderKind::Google => {
            let api_key = cfg.google_api_key.clone().unwrap_or_default();
            Arc::new(GoogleGeocoder::new(api_key, cfg.google_base_url.clone(), timeout)?)
        }
        GeocoderKind::Nominatim => {
            Arc::new(NominatimGeocoder::new(cfg.nominatim_base_url.clone(), timeout)?)
        }
    };
    Ok(geocoder)
}

async fn run_query(
    service: &CarrierLocatorService,
    address: &str,
    map_output_path: &str,
) -> anyhow::Result<()> {
    let outcome = service.locate(address).await;
    print!("{}", console::format_outcome(&outcome));

    let Some(report) = outcome.report() else {
        return Ok(());
    };

    if let Some(error) = &report.render_error {
        tracing::warn!("map not written: {}", error);
    }
    if let Some(document) = &report.rendered_map {
        tokio::fs::write(map_output_path, document)
            .await
            .with_context(|| format!("failed to write map to {}", map_output_path))?;
        println!("\nMap written to {}", map_output_path);
    }
    Ok(())
}
