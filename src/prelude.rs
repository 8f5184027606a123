//! Prelude module for common caminos types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use caminos::prelude::*;`

pub use crate::core::{
    bounds::Bounds,
    config::{
        ControlsConfig, LayerGroupConfig, MapConfig, PopupConfig, StyleRuleConfig,
        TileLayerConfig, VectorLayerConfig, ViewConfig,
    },
    geo::{LatLng, LatLngBounds, Point},
    map::Map,
    view::View,
};

pub use crate::layers::{
    base::{Layer, LayerProperties, LayerRole, LayerType},
    manager::{LayerGroup, LayerManager},
    style::{CategoryClassifier, Color, StyleDescriptor},
    tile::TileLayer,
    vector::{Feature, VectorLayer},
};

pub use crate::data::geojson::{GeoJson, GeoJsonFeature, GeoJsonGeometry, Position};

pub use crate::input::{
    events::{EventHandled, InputEvent, KeyCode, MapEvent},
    selection::{SelectionHandler, SelectionResult},
};

pub use crate::spatial::index::{SpatialIndex, SpatialItem};

pub use crate::tiles::source::TileSource;

pub use crate::ui::{
    controls::{Control, ControlKind, ControlManager, SwitcherEntry},
    popup::{PopupOverlay, PopupTemplate},
};

pub use crate::traits::{HitTest, SelectionSink, StyleFunction};

pub use crate::{Error as MapError, Result};

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
