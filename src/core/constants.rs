//! Engine-wide constants and the attribute keys of the trail data

/// Default square tile size in pixels.
pub const TILE_SIZE: u32 = 256;

/// Half the equatorial circumference in Web Mercator metres.
pub const HALF_WORLD_EXTENT: f64 = 20_037_508.342_789_244;

/// Metres per pixel at zoom 0 for 256 px tiles.
pub const INITIAL_RESOLUTION: f64 = 2.0 * HALF_WORLD_EXTENT / TILE_SIZE as f64;

/// Pixel radius around a click inside which features count as hit.
pub const DEFAULT_HIT_TOLERANCE_PX: f64 = 3.0;

/// Duration of the popup auto-pan animation.
pub const DEFAULT_AUTO_PAN_DURATION_MS: u64 = 250;

/// Distance kept between an auto-panned popup anchor and the viewport edge.
pub const DEFAULT_AUTO_PAN_MARGIN_PX: f64 = 20.0;

/// Viewport size assumed before the host reports one.
pub const DEFAULT_VIEWPORT_SIZE: (f64, f64) = (1024.0, 768.0);

/// Attribute holding the category used for styling.
pub const CATEGORY_KEY: &str = "agrupacion";

/// Attribute holding the feature's display name.
pub const NAME_KEY: &str = "nombre";

/// Attribute holding the feature's numeric measure.
pub const MEASURE_KEY: &str = "longitud";

/// Stroke width applied by the category styling rule.
pub const DEFAULT_STROKE_WIDTH: f32 = 3.0;
