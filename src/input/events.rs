use crate::{core::geo::Point, ui::controls::ControlKind};
use serde::{Deserialize, Serialize};

/// What the host's event loop hands to [`Map::handle_event`](crate::core::map::Map::handle_event).
///
/// Pointer events carry both the viewport pixel and the projected coordinate
/// under it; the host is the one that knows how its canvas is laid out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Click or tap not followed by a second one
    SingleClick { pixel: Point, coordinate: Point },
    /// Double click/tap
    DoubleClick { pixel: Point, coordinate: Point },
    /// Pointer moved over the map
    PointerMove { pixel: Point, coordinate: Point },
    /// Keyboard input
    KeyPress {
        key: KeyCode,
        modifiers: KeyModifiers,
    },
    /// Viewport/window resize
    Resize { size: Point },
    /// The popup's close button was pressed
    PopupCloserClicked,
    /// A map control button was pressed
    ControlActivated { control: ControlKind },
}

/// Keys the map reacts to; anything else arrives as `Other`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    Plus,
    Minus,
    Escape,
    Enter,
    Other(u32),
}

/// Keyboard modifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct KeyModifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

/// Lets the host know whether to fall back to its own default action
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventHandled {
    Handled,
    NotHandled,
}

/// Queued by the map, read back with `Map::drain_events`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MapEvent {
    /// View center or zoom changed; `duration_ms` is non-zero when animated
    ViewChanged {
        center: Point,
        zoom: f64,
        duration_ms: u64,
    },
    /// The popup was shown for a feature
    PopupOpened { name: String, coordinate: Point },
    /// The popup was hidden
    PopupClosed,
    /// Base layer was changed
    BaseLayerChange { layer_id: String },
    /// Overlay layer was shown or hidden
    OverlayToggled { layer_id: String, visible: bool },
    /// Full screen mode was entered or left
    FullScreenChange { full_screen: bool },
}
