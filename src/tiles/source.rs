use serde::{Deserialize, Serialize};

const OSM_ATTRIBUTION: &str =
    "© <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";

/// Where a base layer's imagery comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TileSource {
    /// The OpenStreetMap tile servers
    Osm {
        #[serde(default = "default_osm_attribution")]
        attribution: String,
    },
    /// A WMS endpoint serving one named layer
    Wms {
        url: String,
        layers: String,
        /// Request the layer in tile-sized pieces instead of one image
        #[serde(default)]
        tiled: bool,
        #[serde(default)]
        attribution: Option<String>,
    },
}

fn default_osm_attribution() -> String {
    OSM_ATTRIBUTION.to_string()
}

impl TileSource {
    pub fn osm() -> Self {
        TileSource::Osm {
            attribution: default_osm_attribution(),
        }
    }

    /// Tiled WMS source
    pub fn wms(url: &str, layers: &str, attribution: &str) -> Self {
        TileSource::Wms {
            url: url.to_string(),
            layers: layers.to_string(),
            tiled: true,
            attribution: Some(attribution.to_string()),
        }
    }

    pub fn attribution(&self) -> Option<&str> {
        match self {
            TileSource::Osm { attribution } => Some(attribution),
            TileSource::Wms { attribution, .. } => attribution.as_deref(),
        }
    }
}
