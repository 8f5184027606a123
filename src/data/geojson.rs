//! GeoJSON reading for vector overlays
//!
//! Coordinates in GeoJSON files are `[lon, lat]` in EPSG:4326; features are
//! handed to layers in the EPSG:3857 space of the map view.

use crate::{
    core::geo::{LatLng, Point},
    layers::vector::Feature,
    prelude::HashMap,
    Result,
};
use geo_types::{
    Coord, Geometry, GeometryCollection, LineString, MultiLineString, MultiPoint, MultiPolygon,
    Polygon,
};
use serde::{
    de::{self, IgnoredAny, SeqAccess, Visitor},
    Deserialize, Deserializer, Serialize, Serializer,
};
use std::{fmt, path::Path};

/// A GeoJSON position. Elevation and any further ordinates are read and dropped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub lon: f64,
    pub lat: f64,
}

impl Position {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

impl Serialize for Position {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        [self.lon, self.lat].serialize(serializer)
    }
}

struct PositionVisitor;

impl<'de> Visitor<'de> for PositionVisitor {
    type Value = Position;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a position with at least two numbers")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<Position, A::Error> {
        let lon = seq
            .next_element()?
            .ok_or_else(|| de::Error::invalid_length(0, &self))?;
        let lat = seq
            .next_element()?
            .ok_or_else(|| de::Error::invalid_length(1, &self))?;
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(Position { lon, lat })
    }
}

impl<'de> Deserialize<'de> for Position {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_seq(PositionVisitor)
    }
}

/// GeoJSON feature types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GeoJsonGeometry {
    Point {
        coordinates: Position,
    },
    LineString {
        coordinates: Vec<Position>,
    },
    Polygon {
        coordinates: Vec<Vec<Position>>,
    },
    MultiPoint {
        coordinates: Vec<Position>,
    },
    MultiLineString {
        coordinates: Vec<Vec<Position>>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<Position>>>,
    },
    GeometryCollection {
        geometries: Vec<GeoJsonGeometry>,
    },
}

/// GeoJSON feature with geometry and properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoJsonFeature {
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    pub geometry: Option<GeoJsonGeometry>,
    #[serde(default)]
    pub properties: Option<std::collections::HashMap<String, serde_json::Value>>,
}

/// Root GeoJSON object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GeoJson {
    Feature(GeoJsonFeature),
    FeatureCollection { features: Vec<GeoJsonFeature> },
}

impl GeoJson {
    /// Parses a GeoJSON document
    pub fn parse(text: &str) -> Result<Self> {
        serde_json::from_str(text)
            .map_err(|e| crate::Error::ParseError(format!("Invalid GeoJSON: {}", e)).into())
    }

    /// Gets all features in the document
    pub fn features(&self) -> Vec<&GeoJsonFeature> {
        match self {
            GeoJson::Feature(feature) => vec![feature],
            GeoJson::FeatureCollection { features } => features.iter().collect(),
        }
    }

    /// Converts every feature into a projected [`Feature`].
    ///
    /// Features without an `id` stay anonymous; the layer they are added to
    /// names them.
    pub fn into_features(self) -> Result<Vec<Feature>> {
        let raw = match self {
            GeoJson::Feature(feature) => vec![feature],
            GeoJson::FeatureCollection { features } => features,
        };

        raw.into_iter().map(GeoJsonFeature::into_feature).collect()
    }
}

impl GeoJsonFeature {
    fn into_feature(self) -> Result<Feature> {
        let id = match self.id {
            Some(serde_json::Value::String(id)) => id,
            Some(serde_json::Value::Number(id)) => id.to_string(),
            _ => String::new(),
        };

        let geometry = match &self.geometry {
            Some(geometry) => geometry.to_geometry()?,
            None => Geometry::GeometryCollection(GeometryCollection::default()),
        };

        let properties: HashMap<String, serde_json::Value> =
            self.properties.unwrap_or_default().into_iter().collect();

        Ok(Feature::new(id, geometry).with_properties(properties))
    }
}

fn project(position: &Position) -> Result<Coord<f64>> {
    let lat_lng = LatLng::from_lon_lat(position.lon, position.lat);
    if !lat_lng.is_valid() {
        return Err(Box::new(crate::Error::InvalidCoordinates(format!(
            "[{}, {}] is outside lon/lat range",
            position.lon, position.lat
        ))));
    }

    let Point { x, y } = lat_lng.to_mercator();
    Ok(Coord { x, y })
}

fn project_line(positions: &[Position]) -> Result<LineString<f64>> {
    positions
        .iter()
        .map(project)
        .collect::<Result<Vec<_>>>()
        .map(LineString::new)
}

fn project_polygon(rings: &[Vec<Position>]) -> Result<Polygon<f64>> {
    let mut rings = rings.iter().map(|ring| project_line(ring));
    let exterior = match rings.next() {
        Some(exterior) => exterior?,
        None => LineString::new(Vec::new()),
    };
    let interiors = rings.collect::<Result<Vec<_>>>()?;
    Ok(Polygon::new(exterior, interiors))
}

impl GeoJsonGeometry {
    /// Projects the geometry into Web Mercator
    pub fn to_geometry(&self) -> Result<Geometry<f64>> {
        Ok(match self {
            GeoJsonGeometry::Point { coordinates } => {
                Geometry::Point(geo_types::Point(project(coordinates)?))
            }
            GeoJsonGeometry::LineString { coordinates } => {
                Geometry::LineString(project_line(coordinates)?)
            }
            GeoJsonGeometry::Polygon { coordinates } => {
                Geometry::Polygon(project_polygon(coordinates)?)
            }
            GeoJsonGeometry::MultiPoint { coordinates } => Geometry::MultiPoint(MultiPoint::new(
                coordinates
                    .iter()
                    .map(|c| project(c).map(geo_types::Point))
                    .collect::<Result<Vec<_>>>()?,
            )),
            GeoJsonGeometry::MultiLineString { coordinates } => {
                Geometry::MultiLineString(MultiLineString::new(
                    coordinates
                        .iter()
                        .map(|line| project_line(line))
                        .collect::<Result<Vec<_>>>()?,
                ))
            }
            GeoJsonGeometry::MultiPolygon { coordinates } => {
                Geometry::MultiPolygon(MultiPolygon::new(
                    coordinates
                        .iter()
                        .map(|polygon| project_polygon(polygon))
                        .collect::<Result<Vec<_>>>()?,
                ))
            }
            GeoJsonGeometry::GeometryCollection { geometries } => {
                Geometry::GeometryCollection(GeometryCollection::new_from(
                    geometries
                        .iter()
                        .map(|g| g.to_geometry())
                        .collect::<Result<Vec<_>>>()?,
                ))
            }
        })
    }
}

/// Reads and parses a GeoJSON file
pub fn read_geojson_file<P: AsRef<Path>>(path: P) -> Result<GeoJson> {
    let text = std::fs::read_to_string(path.as_ref()).map_err(crate::Error::from)?;
    GeoJson::parse(&text)
}

/// Loads GeoJSON from an `http(s)://` URL or a local path
#[cfg(feature = "tokio-runtime")]
pub async fn load_geojson(source: &str) -> Result<GeoJson> {
    let text = if source.starts_with("http://") || source.starts_with("https://") {
        log::debug!("Fetching GeoJSON from {}", source);
        reqwest::get(source)
            .await
            .and_then(|response| response.error_for_status())
            .map_err(crate::Error::from)?
            .text()
            .await
            .map_err(crate::Error::from)?
    } else {
        log::debug!("Reading GeoJSON from {}", source);
        tokio::fs::read_to_string(source)
            .await
            .map_err(crate::Error::from)?
    };

    GeoJson::parse(&text)
}
