//! Configuration of the map: view, layers, styling rules, popup and controls
//!
//! Every section has a `Default` reproducing the Caminos de Santiago map, so
//! `MapConfig::default()` is a complete, valid configuration. The same
//! structures load from JSON, with missing fields falling back to defaults.

use crate::{
    core::{
        constants::{
            CATEGORY_KEY, DEFAULT_AUTO_PAN_DURATION_MS, DEFAULT_HIT_TOLERANCE_PX,
            DEFAULT_STROKE_WIDTH, DEFAULT_VIEWPORT_SIZE, MEASURE_KEY, NAME_KEY,
        },
        geo::{LatLng, LatLngBounds, Point},
    },
    layers::style::{CategoryClassifier, CAMINOS_DEFAULT_COLOR, CAMINOS_PALETTE},
    prelude::HashSet,
    tiles::source::TileSource,
    Result,
};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, path::Path};

const IGN_ATTRIBUTION: &str =
    "© <a href=\"https://www.ign.es/web/ign/portal\">Instituto Geográfico Nacional</a>";

fn config_error(message: String) -> Box<dyn std::error::Error + Send + Sync> {
    Box::new(crate::Error::Config(message))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub view: ViewConfig,
    pub base_layers: LayerGroupConfig<TileLayerConfig>,
    pub overlays: Vec<LayerGroupConfig<VectorLayerConfig>>,
    pub popup: PopupConfig,
    pub controls: ControlsConfig,
}

impl MapConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: MapConfig = serde_json::from_str(text).map_err(crate::Error::from)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref()).map_err(crate::Error::from)?;
        Self::from_json_str(&text)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self).map_err(crate::Error::from)?)
    }

    /// Checks the invariants the map relies on when it is built
    pub fn validate(&self) -> Result<()> {
        self.view.validate()?;

        let mut ids = HashSet::default();
        let all_ids = self
            .base_layers
            .layers
            .iter()
            .map(|layer| layer.id.as_str())
            .chain(self.group_ids())
            .chain(
                self.overlays
                    .iter()
                    .flat_map(|group| group.layers.iter().map(|layer| layer.id.as_str())),
            );
        for id in all_ids {
            if !ids.insert(id) {
                return Err(config_error(format!("duplicate layer or group id {}", id)));
            }
        }

        if self.base_layers.layers.is_empty() {
            return Err(config_error("at least one base layer is required".to_string()));
        }

        let visible = self.base_layers.layers.iter().filter(|l| l.visible).count();
        if visible != 1 {
            return Err(config_error(format!(
                "exactly one base layer must be visible, found {}",
                visible
            )));
        }

        for layer in self.overlays.iter().flat_map(|group| group.layers.iter()) {
            CategoryClassifier::from_config(&layer.style).map_err(|e| {
                config_error(format!("style of layer {}: {}", layer.id, e))
            })?;
        }

        self.controls.validate()
    }

    fn group_ids(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.base_layers.id.as_str())
            .chain(self.overlays.iter().map(|group| group.id.as_str()))
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            view: ViewConfig::default(),
            base_layers: LayerGroupConfig {
                id: "base".to_string(),
                title: "Mapas base".to_string(),
                layers: vec![
                    TileLayerConfig {
                        id: "osm".to_string(),
                        title: "OpenStreetMap".to_string(),
                        source: TileSource::osm(),
                        visible: true,
                    },
                    TileLayerConfig {
                        id: "pnoa".to_string(),
                        title: "PNOA".to_string(),
                        source: TileSource::wms(
                            "https://www.ign.es/wms-inspire/pnoa-ma?",
                            "OI.OrthoimageCoverage",
                            IGN_ATTRIBUTION,
                        ),
                        visible: false,
                    },
                    TileLayerConfig {
                        id: "mtn50".to_string(),
                        title: "MTN50".to_string(),
                        source: TileSource::wms(
                            "https://www.ign.es/wms/primera-edicion-mtn",
                            "MTN50",
                            IGN_ATTRIBUTION,
                        ),
                        visible: false,
                    },
                ],
            },
            overlays: vec![LayerGroupConfig {
                id: "capas".to_string(),
                title: "Capas".to_string(),
                layers: vec![VectorLayerConfig::default()],
            }],
            popup: PopupConfig::default(),
            controls: ControlsConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub center: LatLng,
    pub zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// `[min_lon, min_lat, max_lon, max_lat]` the view center may not leave
    pub extent: [f64; 4],
    /// Click radius in pixels used for hit-testing
    pub hit_tolerance_px: f64,
    /// Viewport size in pixels until the host reports one
    pub size: Point,
}

impl ViewConfig {
    pub fn extent_bounds(&self) -> LatLngBounds {
        LatLngBounds::from_extent(self.extent)
    }

    fn validate(&self) -> Result<()> {
        if self.min_zoom > self.max_zoom {
            return Err(config_error(format!(
                "min_zoom {} is greater than max_zoom {}",
                self.min_zoom, self.max_zoom
            )));
        }
        if self.zoom < self.min_zoom || self.zoom > self.max_zoom {
            return Err(config_error(format!(
                "zoom {} outside [{}, {}]",
                self.zoom, self.min_zoom, self.max_zoom
            )));
        }

        let extent = self.extent_bounds();
        if !extent.is_valid() {
            return Err(config_error(format!("invalid view extent {:?}", self.extent)));
        }
        if !extent.contains(&self.center) {
            return Err(config_error(format!(
                "center ({}, {}) outside the view extent",
                self.center.lat, self.center.lng
            )));
        }
        if self.hit_tolerance_px < 0.0 || self.size.x <= 0.0 || self.size.y <= 0.0 {
            return Err(config_error(
                "hit tolerance must be >= 0 and the viewport size positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            // Madrid
            center: LatLng::from_lon_lat(-3.7038, 40.4168),
            zoom: 6.0,
            min_zoom: 4.0,
            max_zoom: 16.0,
            extent: [-10.0, 35.0, 5.0, 44.0],
            hit_tolerance_px: DEFAULT_HIT_TOLERANCE_PX,
            size: Point::new(DEFAULT_VIEWPORT_SIZE.0, DEFAULT_VIEWPORT_SIZE.1),
        }
    }
}

/// A titled group of layers as listed by the layer switcher
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerGroupConfig<L> {
    pub id: String,
    pub title: String,
    pub layers: Vec<L>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileLayerConfig {
    pub id: String,
    pub title: String,
    pub source: TileSource,
    #[serde(default)]
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorLayerConfig {
    pub id: String,
    pub title: String,
    /// GeoJSON path or `http(s)://` URL
    pub source: String,
    pub visible: bool,
    pub style: StyleRuleConfig,
}

impl Default for VectorLayerConfig {
    fn default() -> Self {
        Self {
            id: "caminos".to_string(),
            title: "Caminos de Santiago".to_string(),
            source: "./data/caminos_santiago.geojson".to_string(),
            visible: true,
            style: StyleRuleConfig::default(),
        }
    }
}

/// Categorical styling rule: attribute value to hex colour, with a default
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleRuleConfig {
    pub attribute: String,
    pub categories: BTreeMap<String, String>,
    pub default_color: String,
    pub stroke_width: f32,
}

impl Default for StyleRuleConfig {
    fn default() -> Self {
        Self {
            attribute: CATEGORY_KEY.to_string(),
            categories: CAMINOS_PALETTE
                .iter()
                .map(|(value, color)| (value.to_string(), color.to_hex()))
                .collect(),
            default_color: CAMINOS_DEFAULT_COLOR.to_hex(),
            stroke_width: DEFAULT_STROKE_WIDTH,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopupConfig {
    pub title: String,
    pub name_label: String,
    pub measure_label: String,
    pub unit: String,
    pub name_key: String,
    pub measure_key: String,
    pub auto_pan: bool,
    pub auto_pan_duration_ms: u64,
}

impl Default for PopupConfig {
    fn default() -> Self {
        Self {
            title: "Camino de Santiago".to_string(),
            name_label: "Nombre".to_string(),
            measure_label: "Longitud".to_string(),
            unit: "km".to_string(),
            name_key: NAME_KEY.to_string(),
            measure_key: MEASURE_KEY.to_string(),
            auto_pan: true,
            auto_pan_duration_ms: DEFAULT_AUTO_PAN_DURATION_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlsConfig {
    /// Zoom buttons, rotate reset and attribution
    pub defaults: bool,
    pub full_screen: bool,
    /// `[min_lon, min_lat, max_lon, max_lat]` target of the zoom-to-extent button
    pub zoom_to_extent: Option<[f64; 4]>,
    /// Tooltip of the layer switcher; `None` leaves the switcher out
    pub layer_switcher: Option<String>,
}

impl ControlsConfig {
    fn validate(&self) -> Result<()> {
        match self.zoom_to_extent {
            Some(extent) if !LatLngBounds::from_extent(extent).is_valid() => Err(config_error(
                format!("invalid zoom-to-extent target {:?}", extent),
            )),
            _ => Ok(()),
        }
    }
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            defaults: true,
            full_screen: true,
            // A Coruña
            zoom_to_extent: Some([-8.4125, 43.3623, -8.3558, 43.385]),
            layer_switcher: Some("Leyenda".to_string()),
        }
    }
}
