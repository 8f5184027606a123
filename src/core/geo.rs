//! Geographic and projected coordinates
//!
//! Trail data arrives as WGS84 longitude/latitude and everything the map
//! measures (resolution, hit tolerance, view extents) is in EPSG:3857 metres.

use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_4;

use crate::core::bounds::Bounds;

/// WGS84 semi-major axis used by spherical Web Mercator
const EARTH_RADIUS: f64 = 6_378_137.0;
/// Latitude at which Web Mercator becomes a square world
const MERCATOR_LAT_LIMIT: f64 = 85.051_128_779_8;

/// WGS84 position in degrees
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// GeoJSON positions are `[lon, lat]`
    pub fn from_lon_lat(lon: f64, lat: f64) -> Self {
        Self { lat, lng: lon }
    }

    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }

    /// Projects to EPSG:3857. Latitudes past the Mercator limit are pinned to it.
    pub fn to_mercator(&self) -> Point {
        let lat = self.lat.clamp(-MERCATOR_LAT_LIMIT, MERCATOR_LAT_LIMIT);
        Point::new(
            EARTH_RADIUS * self.lng.to_radians(),
            EARTH_RADIUS * (FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln(),
        )
    }

    pub fn from_mercator(point: Point) -> Self {
        let lat = 2.0 * (point.y / EARTH_RADIUS).exp().atan() - 2.0 * FRAC_PI_4;
        Self::new(lat.to_degrees(), (point.x / EARTH_RADIUS).to_degrees())
    }
}

/// Projected coordinate in metres, or a pixel offset in the viewport
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<Point> for geo_types::Point<f64> {
    fn from(point: Point) -> Self {
        geo_types::Point::new(point.x, point.y)
    }
}

impl From<geo_types::Coord<f64>> for Point {
    fn from(coord: geo_types::Coord<f64>) -> Self {
        Point::new(coord.x, coord.y)
    }
}

/// Geographic rectangle between two corners
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatLngBounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl LatLngBounds {
    pub fn new(south_west: LatLng, north_east: LatLng) -> Self {
        Self {
            south_west,
            north_east,
        }
    }

    /// From a `[min_lon, min_lat, max_lon, max_lat]` extent
    pub fn from_extent([west, south, east, north]: [f64; 4]) -> Self {
        Self::new(LatLng::new(south, west), LatLng::new(north, east))
    }

    pub fn to_extent(&self) -> [f64; 4] {
        let (sw, ne) = (self.south_west, self.north_east);
        [sw.lng, sw.lat, ne.lng, ne.lat]
    }

    pub fn contains(&self, point: &LatLng) -> bool {
        (self.south_west.lat..=self.north_east.lat).contains(&point.lat)
            && (self.south_west.lng..=self.north_east.lng).contains(&point.lng)
    }

    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.south_west.lat + self.north_east.lat) / 2.0,
            (self.south_west.lng + self.north_east.lng) / 2.0,
        )
    }

    /// Both corners are real coordinates and the rectangle has an area
    pub fn is_valid(&self) -> bool {
        let (sw, ne) = (self.south_west, self.north_east);
        sw.is_valid() && ne.is_valid() && sw.lat < ne.lat && sw.lng < ne.lng
    }

    pub fn to_mercator(&self) -> Bounds {
        Bounds::new(self.south_west.to_mercator(), self.north_east.to_mercator())
    }
}
