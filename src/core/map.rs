use crate::{
    core::{
        config::MapConfig,
        constants::DEFAULT_AUTO_PAN_MARGIN_PX,
        geo::Point,
        view::View,
    },
    input::{
        events::{EventHandled, InputEvent, KeyCode, MapEvent},
        selection::{SelectionHandler, SelectionResult},
    },
    layers::{
        base::{Layer, LayerRole},
        manager::{LayerGroup, LayerManager},
        style::CategoryClassifier,
        tile::TileLayer,
        vector::VectorLayer,
    },
    traits::SelectionSink,
    ui::{
        controls::{ControlKind, ControlManager, SwitcherEntry},
        popup::PopupOverlay,
    },
    Result,
};

/// The interactive map: view, layers, popup and controls wired together.
///
/// Hosts feed [`InputEvent`]s through [`Map::handle_event`] and collect the
/// resulting [`MapEvent`]s with [`Map::drain_events`].
pub struct Map {
    config: MapConfig,
    view: View,
    layers: LayerManager,
    selection: SelectionHandler,
    popup: PopupOverlay,
    controls: ControlManager,
    events: Vec<MapEvent>,
}

impl Map {
    /// Builds the map described by `config`. Overlays start out empty.
    pub fn new(config: MapConfig) -> Result<Self> {
        config.validate()?;

        let mut layers = LayerManager::new();

        let base = &config.base_layers;
        layers.add_group(LayerGroup::new(&base.id, &base.title, LayerRole::Base))?;
        for layer in &base.layers {
            layers.add_layer(&base.id, Box::new(TileLayer::from_config(layer)))?;
        }

        for group in &config.overlays {
            layers.add_group(LayerGroup::new(&group.id, &group.title, LayerRole::Overlay))?;
            for layer in &group.layers {
                let mut vector = VectorLayer::new(layer.id.clone(), layer.title.clone())
                    .with_classifier(CategoryClassifier::from_config(&layer.style)?)
                    .with_source_url(layer.source.clone());
                vector.set_visible(layer.visible);
                layers.add_layer(&group.id, Box::new(vector))?;
            }
        }

        log::info!(
            "Map created with {} layers in {} groups",
            layers.len(),
            layers.groups().len()
        );

        Ok(Self {
            view: View::new(&config.view),
            selection: SelectionHandler::new(&config.popup.name_key, &config.popup.measure_key),
            popup: PopupOverlay::from_config(&config.popup),
            controls: ControlManager::from_config(&config.controls),
            layers,
            config,
            events: Vec::new(),
        })
    }

    pub fn handle_event(&mut self, event: &InputEvent) -> Result<EventHandled> {
        let handled = match event {
            InputEvent::SingleClick { coordinate, .. } => {
                self.click(*coordinate);
                EventHandled::Handled
            }
            InputEvent::DoubleClick { coordinate, .. } => {
                let zoom = self.view.zoom() + 1.0;
                if self.view.zoom_at(zoom, *coordinate) {
                    self.emit_view_changed(0);
                }
                EventHandled::Handled
            }
            InputEvent::PointerMove { .. } => EventHandled::NotHandled,
            InputEvent::KeyPress { key, .. } => match key {
                KeyCode::Escape => self.close_popup(),
                KeyCode::Plus => self.zoom_by(1.0),
                KeyCode::Minus => self.zoom_by(-1.0),
                KeyCode::Enter | KeyCode::Other(_) => EventHandled::NotHandled,
            },
            InputEvent::Resize { size } => {
                self.view.set_size(*size);
                EventHandled::Handled
            }
            InputEvent::PopupCloserClicked => self.close_popup(),
            InputEvent::ControlActivated { control } => self.activate_control(*control),
        };
        Ok(handled)
    }

    /// Resolves what a click at `coordinate` would select, without touching the popup
    pub fn select_at(&self, coordinate: Point) -> SelectionResult {
        let tolerance = self.view.tolerance_for(self.config.view.hit_tolerance_px);
        self.selection.on_select(&self.layers, coordinate, tolerance)
    }

    fn click(&mut self, coordinate: Point) {
        let result = self.select_at(coordinate);
        let was_open = self.popup.is_open();
        self.popup.present(&result);

        match result {
            SelectionResult::Hit {
                name, coordinate, ..
            } => {
                self.events.push(MapEvent::PopupOpened { name, coordinate });
                if self.popup.auto_pan()
                    && self.view.auto_pan_to(coordinate, DEFAULT_AUTO_PAN_MARGIN_PX)
                {
                    let duration = self.popup.auto_pan_duration().as_millis() as u64;
                    self.emit_view_changed(duration);
                }
            }
            SelectionResult::Miss if was_open => self.events.push(MapEvent::PopupClosed),
            SelectionResult::Miss => {}
        }
    }

    fn close_popup(&mut self) -> EventHandled {
        if self.popup.close() {
            self.events.push(MapEvent::PopupClosed);
            EventHandled::Handled
        } else {
            EventHandled::NotHandled
        }
    }

    fn zoom_by(&mut self, delta: f64) -> EventHandled {
        if self.view.zoom_by(delta) {
            self.emit_view_changed(0);
        }
        EventHandled::Handled
    }

    fn activate_control(&mut self, control: ControlKind) -> EventHandled {
        if !self.controls.supports(control) {
            log::warn!("Control {:?} is not enabled on this map", control);
            return EventHandled::NotHandled;
        }

        match control {
            ControlKind::ZoomIn => self.zoom_by(1.0),
            ControlKind::ZoomOut => self.zoom_by(-1.0),
            ControlKind::FullScreen => {
                let full_screen = self.controls.toggle_full_screen();
                self.events.push(MapEvent::FullScreenChange { full_screen });
                EventHandled::Handled
            }
            ControlKind::ZoomToExtent => {
                if let Some(target) = self.controls.zoom_to_extent_target().cloned() {
                    self.view.fit_lat_lng(&target);
                    self.emit_view_changed(0);
                }
                EventHandled::Handled
            }
        }
    }

    fn emit_view_changed(&mut self, duration_ms: u64) {
        self.events.push(MapEvent::ViewChanged {
            center: self.view.center(),
            zoom: self.view.zoom(),
            duration_ms,
        });
    }

    /// Makes `layer_id` the visible base layer
    pub fn set_base_layer(&mut self, layer_id: &str) -> Result<()> {
        if self.layers.set_base_layer(layer_id)? {
            self.events.push(MapEvent::BaseLayerChange {
                layer_id: layer_id.to_string(),
            });
        }
        Ok(())
    }

    pub fn set_layer_visible(&mut self, layer_id: &str, visible: bool) -> Result<()> {
        let role = self
            .layers
            .get_layer(layer_id)
            .map(|layer| layer.role())
            .ok_or_else(|| crate::Error::Layer(format!("no layer {}", layer_id)))?;

        if role == LayerRole::Base && visible {
            return self.set_base_layer(layer_id);
        }

        if self.layers.set_layer_visible(layer_id, visible)? {
            self.events.push(MapEvent::OverlayToggled {
                layer_id: layer_id.to_string(),
                visible,
            });
        }
        Ok(())
    }

    /// Adds the features of a GeoJSON document to an overlay layer
    pub fn load_overlay_geojson(&mut self, layer_id: &str, text: &str) -> Result<usize> {
        self.layers
            .vector_layer_mut(layer_id)
            .ok_or_else(|| crate::Error::Layer(format!("no vector layer {}", layer_id)))?
            .load_geojson(text)
    }

    /// Loads every overlay from its configured source, returning the feature count
    #[cfg(feature = "tokio-runtime")]
    pub async fn load_overlays(&mut self) -> Result<usize> {
        let sources: Vec<(String, String)> = self
            .config
            .overlays
            .iter()
            .flat_map(|group| group.layers.iter())
            .map(|layer| (layer.id.clone(), layer.source.clone()))
            .collect();

        let mut total = 0;
        for (layer_id, source) in sources {
            let features = crate::data::geojson::load_geojson(&source)
                .await?
                .into_features()?;
            let layer = self
                .layers
                .vector_layer_mut(&layer_id)
                .ok_or_else(|| crate::Error::Layer(format!("no vector layer {}", layer_id)))?;
            total += layer.add_features(features)?;
            log::info!("Loaded overlay {} from {}", layer_id, source);
        }
        Ok(total)
    }

    /// Events emitted since the last call, oldest first
    pub fn drain_events(&mut self) -> Vec<MapEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut View {
        &mut self.view
    }

    pub fn layers(&self) -> &LayerManager {
        &self.layers
    }

    pub fn layers_mut(&mut self) -> &mut LayerManager {
        &mut self.layers
    }

    pub fn popup(&self) -> &PopupOverlay {
        &self.popup
    }

    pub fn controls(&self) -> &ControlManager {
        &self.controls
    }

    pub fn switcher_entries(&self) -> Vec<SwitcherEntry> {
        self.controls.switcher_entries(&self.layers)
    }

    pub fn attribution_html(&self) -> Option<String> {
        self.controls.attribution_html(&self.layers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{core::geo::LatLng, input::events::KeyModifiers};

    const CAMINOS: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "id": "frances",
             "properties": {"nombre": "Camino Francés", "longitud": 764, "agrupacion": "grupo2"},
             "geometry": {"type": "LineString", "coordinates": [[-4.0, 42.5], [-3.0, 42.5]]}}
        ]
    }"#;

    fn map() -> Map {
        let mut map = Map::new(MapConfig::default()).unwrap();
        map.load_overlay_geojson("caminos", CAMINOS).unwrap();
        map
    }

    fn click(at: Point) -> InputEvent {
        InputEvent::SingleClick {
            pixel: Point::new(0.0, 0.0),
            coordinate: at,
        }
    }

    #[test]
    fn test_map_creation() {
        let map = Map::new(MapConfig::default()).unwrap();
        assert_eq!(map.layers().len(), 4);
        assert_eq!(map.layers().active_base_layer().unwrap().id(), "osm");
        assert!(!map.popup().is_open());
        assert_eq!(map.view().zoom(), 6.0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = MapConfig::default();
        config.view.min_zoom = 20.0;
        assert!(Map::new(config).is_err());
    }

    #[test]
    fn test_click_opens_and_closes_popup() {
        let mut map = map();
        let on_trail = LatLng::new(42.5, -3.5).to_mercator();

        assert_eq!(map.handle_event(&click(on_trail)).unwrap(), EventHandled::Handled);
        assert!(map.popup().is_open());
        assert!(map.popup().content().unwrap().contains("764 km"));
        assert!(matches!(
            map.drain_events().first(),
            Some(MapEvent::PopupOpened { name, .. }) if name == "Camino Francés"
        ));

        let nowhere = LatLng::new(38.0, 0.0).to_mercator();
        map.handle_event(&click(nowhere)).unwrap();
        assert!(!map.popup().is_open());
        assert_eq!(map.drain_events(), vec![MapEvent::PopupClosed]);
    }

    #[test]
    fn test_escape_and_closer() {
        let mut map = map();
        let on_trail = LatLng::new(42.5, -3.5).to_mercator();
        let escape = InputEvent::KeyPress {
            key: KeyCode::Escape,
            modifiers: KeyModifiers::default(),
        };

        assert_eq!(map.handle_event(&escape).unwrap(), EventHandled::NotHandled);

        map.handle_event(&click(on_trail)).unwrap();
        assert_eq!(map.handle_event(&escape).unwrap(), EventHandled::Handled);
        assert!(!map.popup().is_open());

        map.handle_event(&click(on_trail)).unwrap();
        map.handle_event(&InputEvent::PopupCloserClicked).unwrap();
        assert!(!map.popup().is_open());
    }

    #[test]
    fn test_select_at_does_not_touch_popup() {
        let map = map();
        let result = map.select_at(LatLng::new(42.5, -3.5).to_mercator());
        assert_eq!(result.name(), Some("Camino Francés"));
        assert!(!map.popup().is_open());
    }

    #[test]
    fn test_hidden_overlay_gives_miss() {
        let mut map = map();
        map.set_layer_visible("caminos", false).unwrap();
        assert!(!map.select_at(LatLng::new(42.5, -3.5).to_mercator()).is_hit());
        assert_eq!(
            map.drain_events(),
            vec![MapEvent::OverlayToggled {
                layer_id: "caminos".to_string(),
                visible: false
            }]
        );
    }

    #[test]
    fn test_base_layer_switching() {
        let mut map = map();
        map.set_base_layer("pnoa").unwrap();
        assert_eq!(map.layers().active_base_layer().unwrap().id(), "pnoa");
        assert!(map.attribution_html().unwrap().contains("Instituto Geográfico Nacional"));

        map.set_layer_visible("mtn50", true).unwrap();
        assert_eq!(map.layers().active_base_layer().unwrap().id(), "mtn50");
        assert_eq!(
            map.drain_events(),
            vec![
                MapEvent::BaseLayerChange {
                    layer_id: "pnoa".to_string()
                },
                MapEvent::BaseLayerChange {
                    layer_id: "mtn50".to_string()
                },
            ]
        );
        assert!(map.set_base_layer("caminos").is_err());
    }

    #[test]
    fn test_controls() {
        let mut map = map();
        map.handle_event(&InputEvent::ControlActivated {
            control: ControlKind::FullScreen,
        })
        .unwrap();
        assert!(map.controls().is_full_screen());

        map.handle_event(&InputEvent::ControlActivated {
            control: ControlKind::ZoomToExtent,
        })
        .unwrap();
        let center = map.view().center_lat_lng();
        assert!(center.lat > 43.3623 && center.lat < 43.385);
        assert!(center.lng > -8.4125 && center.lng < -8.3558);

        let events = map.drain_events();
        assert_eq!(events[0], MapEvent::FullScreenChange { full_screen: true });
        assert!(matches!(events[1], MapEvent::ViewChanged { .. }));
    }

    #[test]
    fn test_keyboard_and_double_click_zoom() {
        let mut map = map();
        map.handle_event(&InputEvent::KeyPress {
            key: KeyCode::Plus,
            modifiers: KeyModifiers::default(),
        })
        .unwrap();
        assert_eq!(map.view().zoom(), 7.0);

        let center = map.view().center();
        map.handle_event(&InputEvent::DoubleClick {
            pixel: Point::new(512.0, 384.0),
            coordinate: center,
        })
        .unwrap();
        assert_eq!(map.view().zoom(), 8.0);
        assert_eq!(map.drain_events().len(), 2);
    }

    #[test]
    fn test_resize() {
        let mut map = map();
        map.handle_event(&InputEvent::Resize {
            size: Point::new(800.0, 600.0),
        })
        .unwrap();
        assert_eq!(map.view().size(), Point::new(800.0, 600.0));
    }

    #[test]
    fn test_load_into_unknown_layer() {
        let mut map = map();
        assert!(map.load_overlay_geojson("osm", CAMINOS).is_err());
        assert!(map.load_overlay_geojson("missing", CAMINOS).is_err());
    }
}
