pub mod events;
pub mod selection;

// Re-export the essential types
pub use events::{EventHandled, InputEvent, KeyCode, KeyModifiers, MapEvent};
pub use selection::{SelectionHandler, SelectionResult};
