//! # caminos
//!
//! Attribute-driven styling, click selection and popups for vector trail
//! overlays on a slippy web map.
//!
//! The crate models the pieces of an interactive map that carry decision
//! logic: a categorical style classifier used by the renderer, a selection
//! handler that turns a pointer coordinate into a popup payload, and the
//! view, layer, control and popup state they plug into.

pub mod core;
pub mod data;
pub mod input;
pub mod layers;
pub mod prelude;
pub mod spatial;
pub mod tiles;
pub mod traits;
pub mod ui;
pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    bounds::Bounds,
    config::MapConfig,
    geo::{LatLng, LatLngBounds, Point},
    map::Map,
    view::View,
};

pub use layers::{
    base::Layer,
    manager::{LayerGroup, LayerManager},
    style::{CategoryClassifier, Color, StyleDescriptor},
    tile::TileLayer,
    vector::{Feature, VectorLayer},
};

pub use input::{
    events::{InputEvent, MapEvent},
    selection::{SelectionHandler, SelectionResult},
};

pub use ui::{controls::ControlManager, popup::PopupOverlay};

pub use spatial::index::SpatialIndex;

pub use traits::{HitTest, SelectionSink, StyleFunction};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "tokio-runtime")]
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Layer error: {0}")]
    Layer(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Error type alias for convenience
pub type Error = MapError;
