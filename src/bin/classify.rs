// src/bin/classify.rs
// Demo driver: run one processing cycle for each configured camera against
// a single image file and print the resulting predictions and events.

use anyhow::{Context, Result};

use snapsense::{setup_platform, EventBus, PlatformConfig};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let config_path = args
        .next()
        .context("usage: classify <config.json> <image>")?;
    let image_path = args
        .next()
        .context("usage: classify <config.json> <image>")?;

    let raw = std::fs::read_to_string(&config_path)
        .with_context(|| format!("reading config {}", config_path))?;
    let mut config: PlatformConfig =
        serde_json::from_str(&raw).context("parsing platform config")?;

    if config.api_key.is_empty() {
        config.api_key = std::env::var("CLARIFAI_API_KEY")
            .context("config has no api_key and CLARIFAI_API_KEY is not set")?;
    }

    let bus = EventBus::default();
    let mut listener = bus.subscribe();
    let mut entities = setup_platform(&config, bus)?;

    let image = std::fs::read(&image_path)
        .with_context(|| format!("reading image {}", image_path))?;

    for entity in &mut entities {
        entity
            .process_image(&image)
            .await
            .with_context(|| format!("processing cycle for {}", entity.name()))?;
        println!(
            "{}: state={:?} {}",
            entity.name(),
            entity.state(),
            serde_json::to_string_pretty(&entity.attributes())?
        );
    }

    while let Ok(event) = listener.try_recv() {
        println!("found_object: {} ({})", event.object, event.entity_id);
    }

    Ok(())
}
