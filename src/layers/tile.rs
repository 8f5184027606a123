use crate::{
    core::config::TileLayerConfig,
    layers::base::{Layer, LayerProperties, LayerRole, LayerType},
    tiles::source::TileSource,
};

/// Background imagery layer, one of a mutually exclusive set
pub struct TileLayer {
    properties: LayerProperties,
    source: TileSource,
}

impl TileLayer {
    pub fn new(id: String, name: String, source: TileSource) -> Self {
        Self {
            properties: LayerProperties::new(id, name, LayerType::Tile, LayerRole::Base),
            source,
        }
    }

    /// Create an OpenStreetMap tile layer
    pub fn openstreetmap(id: String, name: String) -> Self {
        Self::new(id, name, TileSource::osm())
    }

    pub fn from_config(config: &TileLayerConfig) -> Self {
        let mut layer = Self::new(config.id.clone(), config.title.clone(), config.source.clone());
        layer.set_visible(config.visible);
        layer
    }

    pub fn source(&self) -> &TileSource {
        &self.source
    }
}

impl Layer for TileLayer {
    crate::impl_layer_trait!(properties);

    fn attribution(&self) -> Option<&str> {
        self.source.attribution()
    }

    fn options(&self) -> serde_json::Value {
        serde_json::to_value(&self.source).unwrap_or(serde_json::Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_layer_creation() {
        let layer = TileLayer::openstreetmap("osm".to_string(), "OpenStreetMap".to_string());
        assert_eq!(layer.id(), "osm");
        assert_eq!(layer.layer_type(), LayerType::Tile);
        assert_eq!(layer.role(), LayerRole::Base);
        assert!(layer.is_visible());
        assert!(layer.as_hit_test().is_none());
        assert!(layer.attribution().unwrap().contains("OpenStreetMap"));
    }

    #[test]
    fn test_from_config() {
        let config = TileLayerConfig {
            id: "mtn50".to_string(),
            title: "MTN50".to_string(),
            source: TileSource::wms("https://www.ign.es/wms/primera-edicion-mtn", "MTN50", "IGN"),
            visible: false,
        };
        let layer = TileLayer::from_config(&config);
        assert_eq!(layer.name(), "MTN50");
        assert!(!layer.is_visible());
        assert_eq!(layer.attribution(), Some("IGN"));
        assert_eq!(layer.options()["layers"], "MTN50");
    }
}
