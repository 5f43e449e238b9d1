use fledge::audubon::mass::MassAudubonAPI;
use fledge::audubon::national::NationalAudubonAPI;
use fledge::browser::HeadlessBrowser;
use fledge::config::env_loader::load_config;
use fledge::config::model::Config;
use fledge::geocoding::api::GeocodingAPI;
use fledge::output::write_events;
use fledge::tracing::setup_loki;
use std::error::Error;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let loki = setup_loki().await;

    let config = load_config();

    info!("Starting combined scrape");

    if let Err(err) = run(&config).await {
        error!("Scrape failed: {}", err);
    }

    if let Some((controller, handle)) = loki {
        controller.shutdown().await;
        let _ = handle.await;
    }
}

async fn run(config: &Config) -> Result<(), Box<dyn Error>> {
    let browser = HeadlessBrowser::launch().await?;
    let geocoder = GeocodingAPI::default();

    let mut events = Vec::new();

    if config.debug_config.skip_mass {
        info!("Skipping Mass Audubon");
    } else {
        events.extend(MassAudubonAPI::get_events(&browser, config.pages).await);
    }

    if config.debug_config.skip_national {
        info!("Skipping National Audubon");
    } else {
        let geocoder = (!config.debug_config.skip_geocoding).then_some(&geocoder);

        events.extend(NationalAudubonAPI::get_events(&browser, config.pages, geocoder).await);
    }

    browser.close().await;

    if let Some(limit) = config.debug_config.event_limit {
        events.truncate(limit);
    }

    write_events(&config.output_path, &events)
}
