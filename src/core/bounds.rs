use crate::core::geo::Point;
use serde::{Deserialize, Serialize};

/// Axis-aligned extent in EPSG:3857 metres, or in pixels for viewport math.
///
/// `min` is the south-west corner and `max` the north-east one. An extent
/// whose corners are swapped is invalid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl Bounds {
    pub fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    pub fn from_coords(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self::new(Point::new(min_x, min_y), Point::new(max_x, max_y))
    }

    pub fn from_center_and_size(center: Point, width: f64, height: f64) -> Self {
        let (dx, dy) = (width / 2.0, height / 2.0);
        Self::from_coords(center.x - dx, center.y - dy, center.x + dx, center.y + dy)
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.min.x + self.width() / 2.0,
            self.min.y + self.height() / 2.0,
        )
    }

    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y
    }

    /// Edges count as inside
    pub fn contains(&self, point: &Point) -> bool {
        (self.min.x..=self.max.x).contains(&point.x) && (self.min.y..=self.max.y).contains(&point.y)
    }

    /// Grows in place to cover `other` as well
    pub fn extend_bounds(&mut self, other: &Bounds) {
        self.min = Point::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y));
        self.max = Point::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y));
    }

    /// Copy pushed outwards by `margin` on all four sides
    pub fn expanded(&self, margin: f64) -> Bounds {
        Self::from_coords(
            self.min.x - margin,
            self.min.y - margin,
            self.max.x + margin,
            self.max.y + margin,
        )
    }

    /// Nearest point of the extent to `point`
    pub fn clamp(&self, point: &Point) -> Point {
        Point::new(
            point.x.max(self.min.x).min(self.max.x),
            point.y.max(self.min.y).min(self.max.y),
        )
    }
}

impl From<geo_types::Rect<f64>> for Bounds {
    fn from(rect: geo_types::Rect<f64>) -> Self {
        let (min, max) = (rect.min(), rect.max());
        Self::from_coords(min.x, min.y, max.x, max.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extent_measures() {
        let galicia = Bounds::from_coords(-1_000_000.0, 5_100_000.0, -750_000.0, 5_400_000.0);
        assert_eq!(galicia.width(), 250_000.0);
        assert_eq!(galicia.height(), 300_000.0);
        assert_eq!(galicia.center(), Point::new(-875_000.0, 5_250_000.0));
    }

    #[test]
    fn test_contains_includes_edges() {
        let square = Bounds::from_center_and_size(Point::new(0.0, 0.0), 20.0, 20.0);
        assert!(square.contains(&Point::new(10.0, -10.0)));
        assert!(square.contains(&Point::new(3.0, 4.0)));
        assert!(!square.contains(&Point::new(10.5, 0.0)));
    }

    #[test]
    fn test_expanded_margin() {
        let square = Bounds::from_coords(0.0, 0.0, 10.0, 10.0);
        let grown = square.expanded(1.0);
        assert_eq!(grown, Bounds::from_coords(-1.0, -1.0, 11.0, 11.0));
        assert!(grown.contains(&Point::new(10.5, -0.5)));
        assert!(!square.contains(&Point::new(10.5, -0.5)));
    }

    #[test]
    fn test_extend_and_validity() {
        let mut extent = Bounds::from_coords(1.0, 2.0, 1.0, 2.0);
        assert!(extent.is_valid());
        extent.extend_bounds(&Bounds::from_coords(-1.0, 0.0, 0.5, 5.0));
        assert_eq!(extent, Bounds::from_coords(-1.0, 0.0, 1.0, 5.0));

        assert!(!Bounds::from_coords(3.0, 0.0, 1.0, 5.0).is_valid());
    }

    #[test]
    fn test_clamp_to_nearest_edge() {
        let extent = Bounds::from_coords(0.0, 0.0, 10.0, 10.0);
        assert_eq!(extent.clamp(&Point::new(-5.0, 20.0)), Point::new(0.0, 10.0));
        assert_eq!(extent.clamp(&Point::new(3.0, 4.0)), Point::new(3.0, 4.0));
    }

    #[test]
    fn test_from_rect() {
        let rect = geo_types::Rect::new(
            geo_types::coord! { x: 4.0, y: 8.0 },
            geo_types::coord! { x: -2.0, y: 1.0 },
        );
        assert_eq!(Bounds::from(rect), Bounds::from_coords(-2.0, 1.0, 4.0, 8.0));
    }
}
