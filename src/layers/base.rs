use crate::{core::bounds::Bounds, traits::HitTest};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerType {
    Tile,
    Vector,
}

impl std::fmt::Display for LayerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayerType::Tile => write!(f, "tile"),
            LayerType::Vector => write!(f, "vector"),
        }
    }
}

/// Whether a layer is a mutually exclusive background or a stackable overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerRole {
    Base,
    Overlay,
}

#[derive(Debug, Clone)]
pub struct LayerProperties {
    pub id: String,
    pub name: String,
    pub layer_type: LayerType,
    pub role: LayerRole,
    pub z_index: i32,
    pub visible: bool,
}

impl LayerProperties {
    pub fn new(id: String, name: String, layer_type: LayerType, role: LayerRole) -> Self {
        Self {
            id,
            name,
            layer_type,
            role,
            z_index: 0,
            visible: true,
        }
    }
}

/// Common behaviour of everything the layer manager can hold
pub trait Layer: Send + Sync {
    fn id(&self) -> &str;

    /// Title shown in the layer switcher
    fn name(&self) -> &str;

    fn layer_type(&self) -> LayerType;

    fn role(&self) -> LayerRole;

    fn is_visible(&self) -> bool;

    fn set_visible(&mut self, visible: bool);

    /// Ordering inside the owning group, higher draws on top
    fn z_index(&self) -> i32;

    fn set_z_index(&mut self, z_index: i32);

    /// HTML attribution of the layer's data provider
    fn attribution(&self) -> Option<&str> {
        None
    }

    /// Projected extent of the layer's content, if it has one
    fn extent(&self) -> Option<Bounds> {
        None
    }

    /// Layers whose content can be clicked expose their hit-test here
    fn as_hit_test(&self) -> Option<&dyn HitTest> {
        None
    }

    /// Snapshot of layer options for debugging and serialization
    fn options(&self) -> serde_json::Value;

    fn as_any(&self) -> &dyn std::any::Any;
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any;
}
