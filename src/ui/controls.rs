//! Map controls and the state they own
//!
//! Controls here are descriptors plus the little state they carry (the
//! full-screen flag). Activating a control arrives at the map as an
//! [`InputEvent::ControlActivated`](crate::input::events::InputEvent).

use crate::{
    core::{config::ControlsConfig, geo::LatLngBounds},
    layers::{base::LayerRole, manager::LayerManager},
};
use serde::{Deserialize, Serialize};

/// Controls the host can activate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControlKind {
    ZoomIn,
    ZoomOut,
    FullScreen,
    ZoomToExtent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Control {
    Zoom,
    Rotate,
    Attribution,
    FullScreen,
    ZoomToExtent { extent: LatLngBounds },
    LayerSwitcher { tip_label: String },
}

impl Control {
    /// Whether activating `kind` belongs to this control
    pub fn handles(&self, kind: ControlKind) -> bool {
        matches!(
            (self, kind),
            (Control::Zoom, ControlKind::ZoomIn)
                | (Control::Zoom, ControlKind::ZoomOut)
                | (Control::FullScreen, ControlKind::FullScreen)
                | (Control::ZoomToExtent { .. }, ControlKind::ZoomToExtent)
        )
    }
}

/// One row of the layer switcher
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwitcherEntry {
    pub group: String,
    pub layer_id: String,
    pub title: String,
    pub role: LayerRole,
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ControlManager {
    controls: Vec<Control>,
    full_screen: bool,
}

impl ControlManager {
    pub fn new(controls: Vec<Control>) -> Self {
        Self {
            controls,
            full_screen: false,
        }
    }

    pub fn from_config(config: &ControlsConfig) -> Self {
        let mut controls = Vec::new();
        if config.defaults {
            controls.extend([Control::Zoom, Control::Rotate, Control::Attribution]);
        }
        if config.full_screen {
            controls.push(Control::FullScreen);
        }
        if let Some(extent) = config.zoom_to_extent {
            controls.push(Control::ZoomToExtent {
                extent: LatLngBounds::from_extent(extent),
            });
        }
        if let Some(tip_label) = &config.layer_switcher {
            controls.push(Control::LayerSwitcher {
                tip_label: tip_label.clone(),
            });
        }
        Self::new(controls)
    }

    pub fn controls(&self) -> &[Control] {
        &self.controls
    }

    /// Whether some control accepts `kind`
    pub fn supports(&self, kind: ControlKind) -> bool {
        self.controls.iter().any(|control| control.handles(kind))
    }

    pub fn is_full_screen(&self) -> bool {
        self.full_screen
    }

    /// Flips full-screen mode and returns the new state
    pub fn toggle_full_screen(&mut self) -> bool {
        self.full_screen = !self.full_screen;
        self.full_screen
    }

    pub fn zoom_to_extent_target(&self) -> Option<&LatLngBounds> {
        self.controls.iter().find_map(|control| match control {
            Control::ZoomToExtent { extent } => Some(extent),
            _ => None,
        })
    }

    pub fn layer_switcher_tip(&self) -> Option<&str> {
        self.controls.iter().find_map(|control| match control {
            Control::LayerSwitcher { tip_label } => Some(tip_label.as_str()),
            _ => None,
        })
    }

    /// Layer switcher rows, topmost layer first. Empty without a switcher.
    pub fn switcher_entries(&self, layers: &LayerManager) -> Vec<SwitcherEntry> {
        if self.layer_switcher_tip().is_none() {
            return Vec::new();
        }

        layers
            .groups()
            .iter()
            .rev()
            .flat_map(|group| {
                group.layers().rev().map(move |layer| SwitcherEntry {
                    group: group.title().to_string(),
                    layer_id: layer.id().to_string(),
                    title: layer.name().to_string(),
                    role: layer.role(),
                    visible: layer.is_visible(),
                })
            })
            .collect()
    }

    /// Attribution line of the visible layers, when the attribution control is shown
    pub fn attribution_html(&self, layers: &LayerManager) -> Option<String> {
        if !self.controls.contains(&Control::Attribution) {
            return None;
        }
        let attributions = layers.attributions();
        if attributions.is_empty() {
            None
        } else {
            Some(attributions.join(" | "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        layers::{base::Layer, manager::LayerGroup, tile::TileLayer, vector::VectorLayer},
        tiles::source::TileSource,
    };

    fn layers() -> LayerManager {
        let mut manager = LayerManager::new();
        manager
            .add_group(LayerGroup::new("base", "Mapas base", LayerRole::Base))
            .unwrap();
        manager
            .add_group(LayerGroup::new("capas", "Capas", LayerRole::Overlay))
            .unwrap();
        manager
            .add_layer("base", Box::new(TileLayer::openstreetmap("osm".into(), "OSM".into())))
            .unwrap();
        let mut mtn = TileLayer::new(
            "mtn50".into(),
            "MTN50".into(),
            TileSource::wms("https://www.ign.es/wms/primera-edicion-mtn", "MTN50", "IGN"),
        );
        mtn.set_visible(false);
        manager.add_layer("base", Box::new(mtn)).unwrap();
        manager
            .add_layer(
                "capas",
                Box::new(VectorLayer::new("caminos".into(), "Caminos de Santiago".into())),
            )
            .unwrap();
        manager
    }

    #[test]
    fn test_from_default_config() {
        let controls = ControlManager::from_config(&ControlsConfig::default());
        assert_eq!(controls.controls().len(), 6);
        assert!(controls.supports(ControlKind::ZoomIn));
        assert!(controls.supports(ControlKind::FullScreen));
        assert!(controls.supports(ControlKind::ZoomToExtent));
        assert_eq!(controls.layer_switcher_tip(), Some("Leyenda"));

        let target = controls.zoom_to_extent_target().unwrap();
        assert_eq!(target.to_extent(), [-8.4125, 43.3623, -8.3558, 43.385]);
    }

    #[test]
    fn test_minimal_config() {
        let config = ControlsConfig {
            defaults: false,
            full_screen: false,
            zoom_to_extent: None,
            layer_switcher: None,
        };
        let controls = ControlManager::from_config(&config);
        assert!(controls.controls().is_empty());
        assert!(!controls.supports(ControlKind::ZoomIn));
        assert!(controls.zoom_to_extent_target().is_none());
        assert!(controls.switcher_entries(&layers()).is_empty());
        assert_eq!(controls.attribution_html(&layers()), None);
    }

    #[test]
    fn test_toggle_full_screen() {
        let mut controls = ControlManager::from_config(&ControlsConfig::default());
        assert!(!controls.is_full_screen());
        assert!(controls.toggle_full_screen());
        assert!(!controls.toggle_full_screen());
    }

    #[test]
    fn test_switcher_entries() {
        let controls = ControlManager::from_config(&ControlsConfig::default());
        let entries = controls.switcher_entries(&layers());

        let titles: Vec<&str> = entries.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Caminos de Santiago", "MTN50", "OSM"]);
        assert_eq!(entries[0].group, "Capas");
        assert_eq!(entries[0].role, LayerRole::Overlay);
        assert_eq!(entries[1].group, "Mapas base");
        assert!(!entries[1].visible);
        assert!(entries[2].visible);
    }

    #[test]
    fn test_attribution_html() {
        let controls = ControlManager::from_config(&ControlsConfig::default());
        let mut layers = layers();
        assert!(controls
            .attribution_html(&layers)
            .unwrap()
            .contains("OpenStreetMap"));

        layers.set_base_layer("mtn50").unwrap();
        assert_eq!(controls.attribution_html(&layers).as_deref(), Some("IGN"));
    }
}
