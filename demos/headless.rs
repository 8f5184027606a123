//! Drives the Caminos de Santiago map without a UI: loads the overlay,
//! clicks on a few places and prints what the popup would show.
//!
//! Run with `RUST_LOG=debug cargo run --example headless` for the log output.

use anyhow::Context;
use caminos::{
    core::{config::MapConfig, geo::LatLng},
    input::events::InputEvent,
    layers::style::classify,
    Map, Point,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => MapConfig::from_file(&path)
            .map_err(|e| anyhow::anyhow!(e))
            .with_context(|| format!("loading config from {}", path))?,
        None => MapConfig::default(),
    };

    let mut map = Map::new(config).map_err(|e| anyhow::anyhow!(e))?;
    let loaded = map
        .load_overlays()
        .await
        .map_err(|e| anyhow::anyhow!(e))
        .context("loading overlays")?;
    println!("Loaded {} features", loaded);

    for group in ["grupo1", "grupo2", "grupo3", "otros"] {
        println!("{:>8} -> {}", group, classify(Some(group)).stroke_color);
    }

    let clicks = [
        ("Burgos", LatLng::new(42.3440, -3.7038)),
        ("Ourense", LatLng::new(42.3360, -7.8640)),
        ("Padrón", LatLng::new(42.7400, -8.6580)),
    ];

    for (place, at) in clicks {
        let coordinate = at.to_mercator();
        let pixel = map.view().coordinate_to_pixel(coordinate);
        map.handle_event(&InputEvent::SingleClick { pixel, coordinate })
            .map_err(|e| anyhow::anyhow!(e))?;

        match map.popup().content() {
            Some(html) => println!("{}: {}", place, html),
            None => println!("{}: nothing here", place),
        }
    }

    for event in map.drain_events() {
        println!("{:?}", event);
    }

    map.handle_event(&InputEvent::Resize {
        size: Point::new(1280.0, 720.0),
    })
    .map_err(|e| anyhow::anyhow!(e))?;
    if let Some(attribution) = map.attribution_html() {
        println!("Attribution: {}", attribution);
    }

    Ok(())
}
