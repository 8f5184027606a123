use crate::core::{
    bounds::Bounds,
    config::ViewConfig,
    constants::INITIAL_RESOLUTION,
    geo::{LatLng, LatLngBounds, Point},
};
use serde::{Deserialize, Serialize};

/// Current view of the map: center, zoom and viewport size
///
/// The center lives in Web Mercator and is kept inside the constraint
/// extent; pixels are measured from the top-left corner of the viewport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct View {
    center: Point,
    zoom: f64,
    min_zoom: f64,
    max_zoom: f64,
    size: Point,
    /// Area the center may not leave
    extent: Bounds,
}

impl View {
    pub fn new(config: &ViewConfig) -> Self {
        let mut view = Self {
            center: config.center.to_mercator(),
            zoom: config.zoom,
            min_zoom: config.min_zoom,
            max_zoom: config.max_zoom,
            size: config.size,
            extent: config.extent_bounds().to_mercator(),
        };
        view.set_zoom(config.zoom);
        view.set_center(view.center);
        view
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn center_lat_lng(&self) -> LatLng {
        LatLng::from_mercator(self.center)
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn zoom_limits(&self) -> (f64, f64) {
        (self.min_zoom, self.max_zoom)
    }

    pub fn size(&self) -> Point {
        self.size
    }

    pub fn extent(&self) -> &Bounds {
        &self.extent
    }

    /// Moves the center, clamped to the extent. Returns whether it moved.
    pub fn set_center(&mut self, center: Point) -> bool {
        let clamped = self.extent.clamp(&center);
        let changed = clamped != self.center;
        self.center = clamped;
        changed
    }

    pub fn set_center_lat_lng(&mut self, center: LatLng) -> bool {
        self.set_center(center.to_mercator())
    }

    /// Sets the zoom, clamped to the zoom limits. Returns whether it changed.
    pub fn set_zoom(&mut self, zoom: f64) -> bool {
        let clamped = zoom.clamp(self.min_zoom, self.max_zoom);
        let changed = (clamped - self.zoom).abs() > f64::EPSILON;
        self.zoom = clamped;
        changed
    }

    pub fn zoom_by(&mut self, delta: f64) -> bool {
        self.set_zoom(self.zoom + delta)
    }

    /// Zooms keeping `anchor` under the same pixel. Returns whether the zoom changed.
    pub fn zoom_at(&mut self, zoom: f64, anchor: Point) -> bool {
        let pixel = self.coordinate_to_pixel(anchor);
        if !self.set_zoom(zoom) {
            return false;
        }
        let resolution = self.resolution();
        self.set_center(Point::new(
            anchor.x - (pixel.x - self.size.x / 2.0) * resolution,
            anchor.y + (pixel.y - self.size.y / 2.0) * resolution,
        ));
        true
    }

    pub fn set_size(&mut self, size: Point) {
        if size.x > 0.0 && size.y > 0.0 {
            self.size = size;
        } else {
            log::warn!("Ignoring viewport size {}x{}", size.x, size.y);
        }
    }

    /// Map units per pixel at the current zoom
    pub fn resolution(&self) -> f64 {
        Self::resolution_for_zoom(self.zoom)
    }

    pub fn resolution_for_zoom(zoom: f64) -> f64 {
        INITIAL_RESOLUTION / 2f64.powf(zoom)
    }

    /// Converts a pixel radius into map units at the current zoom
    pub fn tolerance_for(&self, pixels: f64) -> f64 {
        pixels * self.resolution()
    }

    /// Area currently shown in the viewport
    pub fn visible_extent(&self) -> Bounds {
        let resolution = self.resolution();
        Bounds::from_center_and_size(
            self.center,
            self.size.x * resolution,
            self.size.y * resolution,
        )
    }

    pub fn pixel_to_coordinate(&self, pixel: Point) -> Point {
        let resolution = self.resolution();
        Point::new(
            self.center.x + (pixel.x - self.size.x / 2.0) * resolution,
            self.center.y - (pixel.y - self.size.y / 2.0) * resolution,
        )
    }

    pub fn coordinate_to_pixel(&self, coordinate: Point) -> Point {
        let resolution = self.resolution();
        Point::new(
            (coordinate.x - self.center.x) / resolution + self.size.x / 2.0,
            (self.center.y - coordinate.y) / resolution + self.size.y / 2.0,
        )
    }

    /// Centers on `bounds` at the largest zoom that still shows all of it
    pub fn fit(&mut self, bounds: &Bounds) {
        if !bounds.is_valid() {
            log::warn!("Cannot fit view to an invalid extent {:?}", bounds);
            return;
        }

        let needed = (bounds.width() / self.size.x).max(bounds.height() / self.size.y);
        let zoom = if needed > 0.0 {
            (INITIAL_RESOLUTION / needed).log2()
        } else {
            self.max_zoom
        };

        self.set_zoom(zoom);
        self.set_center(bounds.center());
    }

    pub fn fit_lat_lng(&mut self, bounds: &LatLngBounds) {
        self.fit(&bounds.to_mercator());
    }

    /// Pans just enough to bring `coordinate` at least `margin_px` inside the
    /// viewport edges. Returns whether the center moved.
    pub fn auto_pan_to(&mut self, coordinate: Point, margin_px: f64) -> bool {
        let pixel = self.coordinate_to_pixel(coordinate);
        let margin = margin_px.min(self.size.x / 2.0).min(self.size.y / 2.0);

        let shift = |value: f64, length: f64| {
            if value < margin {
                value - margin
            } else if value > length - margin {
                value - (length - margin)
            } else {
                0.0
            }
        };
        let dx = shift(pixel.x, self.size.x);
        let dy = shift(pixel.y, self.size.y);
        if dx == 0.0 && dy == 0.0 {
            return false;
        }

        let resolution = self.resolution();
        let target = Point::new(self.center.x + dx * resolution, self.center.y - dy * resolution);
        self.set_center(target)
    }
}

impl Default for View {
    fn default() -> Self {
        Self::new(&ViewConfig::default())
    }
}
