use crate::{
    core::geo::Point,
    layers::{
        base::{Layer, LayerRole},
        vector::{Feature, VectorLayer},
    },
    traits::HitTest,
    Result,
};

fn layer_error(message: String) -> Box<dyn std::error::Error + Send + Sync> {
    Box::new(crate::Error::Layer(message))
}

/// Titled set of layers sharing a role, as listed by the layer switcher
pub struct LayerGroup {
    id: String,
    title: String,
    role: LayerRole,
    /// Sorted by z-index, bottom first
    layers: Vec<Box<dyn Layer>>,
}

impl LayerGroup {
    pub fn new(id: impl Into<String>, title: impl Into<String>, role: LayerRole) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            role,
            layers: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn role(&self) -> LayerRole {
        self.role
    }

    /// Layers in render order, bottom first
    pub fn layers(&self) -> impl DoubleEndedIterator<Item = &dyn Layer> {
        self.layers.iter().map(|layer| layer.as_ref())
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Inserts above every layer with the same or lower z-index
    fn insert(&mut self, layer: Box<dyn Layer>) {
        let z_index = layer.z_index();
        let position = self
            .layers
            .iter()
            .position(|l| l.z_index() > z_index)
            .unwrap_or(self.layers.len());
        self.layers.insert(position, layer);
    }
}

/// Owns the layer groups, bottom group first
#[derive(Default)]
pub struct LayerManager {
    groups: Vec<LayerGroup>,
}

impl LayerManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a group on top of the existing ones
    pub fn add_group(&mut self, group: LayerGroup) -> Result<()> {
        if self.group(group.id()).is_some() {
            return Err(layer_error(format!("group {} already exists", group.id())));
        }
        self.groups.push(group);
        Ok(())
    }

    /// Adds a layer to a group whose role matches the layer's
    pub fn add_layer(&mut self, group_id: &str, layer: Box<dyn Layer>) -> Result<()> {
        if self.get_layer(layer.id()).is_some() {
            return Err(layer_error(format!("layer {} already exists", layer.id())));
        }

        let group = self
            .groups
            .iter_mut()
            .find(|group| group.id == group_id)
            .ok_or_else(|| layer_error(format!("no group {}", group_id)))?;

        if group.role != layer.role() {
            return Err(layer_error(format!(
                "layer {} has role {:?} but group {} holds {:?} layers",
                layer.id(),
                layer.role(),
                group_id,
                group.role
            )));
        }

        log::debug!("Adding {} layer {} to group {}", layer.layer_type(), layer.id(), group_id);
        group.insert(layer);
        Ok(())
    }

    pub fn group(&self, group_id: &str) -> Option<&LayerGroup> {
        self.groups.iter().find(|group| group.id == group_id)
    }

    /// Groups in render order, bottom first
    pub fn groups(&self) -> &[LayerGroup] {
        &self.groups
    }

    /// All layers in render order, bottom first
    pub fn layers(&self) -> impl DoubleEndedIterator<Item = &dyn Layer> {
        self.groups.iter().flat_map(|group| group.layers())
    }

    pub fn get_layer(&self, layer_id: &str) -> Option<&dyn Layer> {
        self.layers().find(|layer| layer.id() == layer_id)
    }

    /// Applies a function to a specific layer mutably
    pub fn with_layer_mut<F, R>(&mut self, layer_id: &str, f: F) -> Option<R>
    where
        F: FnOnce(&mut dyn Layer) -> R,
    {
        self.groups
            .iter_mut()
            .flat_map(|group| group.layers.iter_mut())
            .find(|layer| layer.id() == layer_id)
            .map(|layer| f(layer.as_mut()))
    }

    pub fn vector_layer(&self, layer_id: &str) -> Option<&VectorLayer> {
        self.get_layer(layer_id)?.as_any().downcast_ref::<VectorLayer>()
    }

    pub fn vector_layer_mut(&mut self, layer_id: &str) -> Option<&mut VectorLayer> {
        self.groups
            .iter_mut()
            .flat_map(|group| group.layers.iter_mut())
            .find(|layer| layer.id() == layer_id)?
            .as_any_mut()
            .downcast_mut::<VectorLayer>()
    }

    /// Makes `layer_id` the only visible base layer. Returns whether anything changed.
    pub fn set_base_layer(&mut self, layer_id: &str) -> Result<bool> {
        match self.get_layer(layer_id) {
            Some(layer) if layer.role() == LayerRole::Base => {}
            Some(_) => return Err(layer_error(format!("{} is not a base layer", layer_id))),
            None => return Err(layer_error(format!("no layer {}", layer_id))),
        }

        let mut changed = false;
        for layer in self
            .groups
            .iter_mut()
            .flat_map(|group| group.layers.iter_mut())
            .filter(|layer| layer.role() == LayerRole::Base)
        {
            let visible = layer.id() == layer_id;
            if layer.is_visible() != visible {
                layer.set_visible(visible);
                changed = true;
            }
        }

        if changed {
            log::info!("Base layer switched to {}", layer_id);
        }
        Ok(changed)
    }

    /// Shows or hides a layer. Showing a base layer hides the other base
    /// layers; base layers cannot be hidden directly.
    pub fn set_layer_visible(&mut self, layer_id: &str, visible: bool) -> Result<bool> {
        let role = self
            .get_layer(layer_id)
            .map(|layer| layer.role())
            .ok_or_else(|| layer_error(format!("no layer {}", layer_id)))?;

        match (role, visible) {
            (LayerRole::Base, true) => self.set_base_layer(layer_id),
            (LayerRole::Base, false) => Err(layer_error(format!(
                "base layer {} is replaced by selecting another base layer",
                layer_id
            ))),
            (LayerRole::Overlay, _) => Ok(self
                .with_layer_mut(layer_id, |layer| {
                    let changed = layer.is_visible() != visible;
                    layer.set_visible(visible);
                    changed
                })
                .unwrap_or(false)),
        }
    }

    /// The visible base layer
    pub fn active_base_layer(&self) -> Option<&dyn Layer> {
        self.layers()
            .find(|layer| layer.role() == LayerRole::Base && layer.is_visible())
    }

    /// Attributions of visible layers, bottom first, without duplicates
    pub fn attributions(&self) -> Vec<&str> {
        let mut attributions: Vec<&str> = Vec::new();
        for attribution in self
            .layers()
            .filter(|layer| layer.is_visible())
            .filter_map(|layer| layer.attribution())
        {
            if !attributions.contains(&attribution) {
                attributions.push(attribution);
            }
        }
        attributions
    }

    pub fn len(&self) -> usize {
        self.groups.iter().map(LayerGroup::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl HitTest for LayerManager {
    /// Features of every visible layer, topmost layer first
    fn features_at(&self, coordinate: Point, tolerance: f64) -> Vec<&Feature> {
        self.layers()
            .rev()
            .filter(|layer| layer.is_visible())
            .filter_map(|layer| layer.as_hit_test())
            .flat_map(|source| source.features_at(coordinate, tolerance))
            .collect()
    }
}
