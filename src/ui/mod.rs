pub mod controls;
pub mod popup;

pub use controls::{Control, ControlKind, ControlManager, SwitcherEntry};
pub use popup::{PopupOverlay, PopupTemplate};
