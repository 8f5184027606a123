use crate::{
    core::{bounds::Bounds, geo::Point},
    data::geojson::GeoJson,
    layers::{
        base::{Layer, LayerProperties, LayerRole, LayerType},
        style::{CategoryClassifier, StyleDescriptor, DEFAULT_CLASSIFIER},
    },
    prelude::HashMap,
    spatial::index::{SpatialIndex, SpatialItem},
    traits::{HitTest, StyleFunction},
    Result,
};

use geo::{BoundingRect, Contains, EuclideanDistance};
use geo_types::{Coord, Geometry, LineString, Polygon};
use std::collections::BTreeMap;

/// A geographic entity: projected geometry plus named attributes.
///
/// An empty id marks an anonymous feature; [`VectorLayer::add_feature`]
/// gives it a name unique within the layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    id: String,
    geometry: Geometry<f64>,
    properties: HashMap<String, serde_json::Value>,
}

impl Feature {
    pub fn new(id: impl Into<String>, geometry: Geometry<f64>) -> Self {
        Self {
            id: id.into(),
            geometry,
            properties: HashMap::default(),
        }
    }

    pub fn point(id: impl Into<String>, position: Point) -> Self {
        Self::new(id, Geometry::Point(position.into()))
    }

    pub fn line_string(id: impl Into<String>, points: Vec<Point>) -> Self {
        Self::new(id, Geometry::LineString(Self::line(points)))
    }

    /// Polygon without holes; the ring is closed automatically
    pub fn polygon(id: impl Into<String>, exterior: Vec<Point>) -> Self {
        Self::new(
            id,
            Geometry::Polygon(Polygon::new(Self::line(exterior), Vec::new())),
        )
    }

    fn line(points: Vec<Point>) -> LineString<f64> {
        LineString::new(
            points
                .into_iter()
                .map(|p| Coord { x: p.x, y: p.y })
                .collect(),
        )
    }

    /// Add a property to this feature
    pub fn with_property<V: Into<serde_json::Value>>(
        mut self,
        key: impl Into<String>,
        value: V,
    ) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn with_properties(mut self, properties: HashMap<String, serde_json::Value>) -> Self {
        self.properties = properties;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_anonymous(&self) -> bool {
        self.id.is_empty()
    }

    pub fn geometry(&self) -> &Geometry<f64> {
        &self.geometry
    }

    pub fn properties(&self) -> &HashMap<String, serde_json::Value> {
        &self.properties
    }

    /// Get a property value
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.properties.get(key)
    }

    /// Get a property only if it holds a string
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(|value| value.as_str())
    }

    /// Numeric reading of a property: JSON numbers, or strings that parse as a
    /// finite number (so "NaN" and "inf" read as absent)
    pub fn get_f64(&self, key: &str) -> Option<f64> {
        let value = match self.get(key)? {
            serde_json::Value::Number(number) => number.as_f64(),
            serde_json::Value::String(text) => text.trim().parse::<f64>().ok(),
            _ => None,
        };
        value.filter(|value| value.is_finite())
    }

    /// Set a property value
    pub fn set_property<V: Into<serde_json::Value>>(&mut self, key: impl Into<String>, value: V) {
        self.properties.insert(key.into(), value.into());
    }

    /// Bounding box of the geometry, `None` for empty geometries
    pub fn extent(&self) -> Option<Bounds> {
        self.geometry.bounding_rect().map(Bounds::from)
    }

    /// Distance from `point` to the geometry; zero inside polygons
    pub fn distance_to(&self, point: Point) -> f64 {
        geometry_distance(&self.geometry, &point.into())
    }
}

fn polygon_distance(polygon: &Polygon<f64>, point: &geo_types::Point<f64>) -> f64 {
    if polygon.contains(point) {
        0.0
    } else {
        point.euclidean_distance(polygon)
    }
}

fn nearest<I: Iterator<Item = f64>>(distances: I) -> f64 {
    distances.fold(f64::INFINITY, f64::min)
}

fn geometry_distance(geometry: &Geometry<f64>, point: &geo_types::Point<f64>) -> f64 {
    match geometry {
        Geometry::Point(p) => point.euclidean_distance(p),
        Geometry::Line(line) => point.euclidean_distance(line),
        Geometry::LineString(line) => point.euclidean_distance(line),
        Geometry::Polygon(polygon) => polygon_distance(polygon, point),
        Geometry::MultiPoint(points) => nearest(points.iter().map(|p| point.euclidean_distance(p))),
        Geometry::MultiLineString(lines) => {
            nearest(lines.iter().map(|line| point.euclidean_distance(line)))
        }
        Geometry::MultiPolygon(polygons) => {
            nearest(polygons.iter().map(|polygon| polygon_distance(polygon, point)))
        }
        Geometry::GeometryCollection(collection) => {
            nearest(collection.iter().map(|g| geometry_distance(g, point)))
        }
        Geometry::Rect(rect) => polygon_distance(&rect.to_polygon(), point),
        Geometry::Triangle(triangle) => polygon_distance(&triangle.to_polygon(), point),
    }
}

/// Vector layer holding features in draw order, styled per feature
pub struct VectorLayer {
    /// Base layer properties
    properties: LayerProperties,
    /// Where the features were loaded from, if anywhere
    source_url: Option<String>,
    /// Features keyed by insertion sequence, i.e. bottom to top
    features: BTreeMap<u64, Feature>,
    ids: HashMap<String, u64>,
    index: SpatialIndex<u64>,
    next_seq: u64,
    style: Box<dyn StyleFunction>,
}

impl VectorLayer {
    /// Create a new overlay layer styled by the trail-grouping classifier
    pub fn new(id: String, name: String) -> Self {
        Self {
            properties: LayerProperties::new(id, name, LayerType::Vector, LayerRole::Overlay),
            source_url: None,
            features: BTreeMap::new(),
            ids: HashMap::default(),
            index: SpatialIndex::new(),
            next_seq: 0,
            style: Box::new((*DEFAULT_CLASSIFIER).clone()),
        }
    }

    pub fn with_style<S: StyleFunction + 'static>(mut self, style: S) -> Self {
        self.style = Box::new(style);
        self
    }

    pub fn with_classifier(self, classifier: CategoryClassifier) -> Self {
        self.with_style(classifier)
    }

    pub fn with_source_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = Some(url.into());
        self
    }

    pub fn set_style<S: StyleFunction + 'static>(&mut self, style: S) {
        self.style = Box::new(style);
    }

    pub fn source_url(&self) -> Option<&str> {
        self.source_url.as_deref()
    }

    /// Adds a feature on top of the others.
    ///
    /// A feature with the same id is replaced and returned; the new one
    /// takes the topmost position. Anonymous features are named
    /// `<layer id>-<n>` first.
    pub fn add_feature(&mut self, mut feature: Feature) -> Result<Option<Feature>> {
        let seq = self.next_seq;
        self.next_seq += 1;

        if feature.is_anonymous() {
            feature.id = self.unused_id(seq);
        }
        let previous = self.remove_feature(feature.id())?;

        if let Some(extent) = feature.extent() {
            self.index
                .insert(SpatialItem::new(feature.id().to_string(), extent, seq))?;
        }

        self.ids.insert(feature.id().to_string(), seq);
        self.features.insert(seq, feature);
        Ok(previous)
    }

    fn unused_id(&self, mut n: u64) -> String {
        loop {
            let id = format!("{}-{}", self.properties.id, n);
            if !self.ids.contains_key(&id) {
                return id;
            }
            n += 1;
        }
    }

    /// Adds features in order and returns how many the layer gained.
    /// Features that replace one with the same id are not counted.
    pub fn add_features<I: IntoIterator<Item = Feature>>(&mut self, features: I) -> Result<usize> {
        let mut gained = 0;
        for feature in features {
            if self.add_feature(feature)?.is_none() {
                gained += 1;
            }
        }
        Ok(gained)
    }

    /// Parses GeoJSON text and appends its features, returning how many the
    /// layer gained
    pub fn load_geojson(&mut self, text: &str) -> Result<usize> {
        let geojson = GeoJson::parse(text)?;
        let features = geojson.into_features()?;
        let added = self.add_features(features)?;
        log::info!("Loaded {} features into layer {}", added, self.properties.id);
        Ok(added)
    }

    /// Remove a feature by ID
    pub fn remove_feature(&mut self, id: &str) -> Result<Option<Feature>> {
        match self.ids.remove(id) {
            Some(seq) => {
                self.index.remove(id);
                Ok(self.features.remove(&seq))
            }
            None => Ok(None),
        }
    }

    /// Get a feature by ID
    pub fn get_feature(&self, id: &str) -> Option<&Feature> {
        self.ids.get(id).and_then(|seq| self.features.get(seq))
    }

    /// All features, bottom to top
    pub fn features(&self) -> impl Iterator<Item = &Feature> {
        self.features.values()
    }

    /// Features paired with their style, bottom to top.
    ///
    /// The style function runs on every call; nothing is cached.
    pub fn styled_features(&self) -> impl Iterator<Item = (&Feature, StyleDescriptor)> {
        self.features
            .values()
            .map(move |feature| (feature, self.style.style(feature)))
    }

    pub fn style_for(&self, feature: &Feature) -> StyleDescriptor {
        self.style.style(feature)
    }

    pub fn feature_count(&self) -> usize {
        self.features.len()
    }

    /// Clear all features
    pub fn clear(&mut self) {
        self.features.clear();
        self.ids.clear();
        self.index.clear();
    }
}

impl HitTest for VectorLayer {
    fn features_at(&self, coordinate: Point, tolerance: f64) -> Vec<&Feature> {
        if !self.is_visible() {
            return Vec::new();
        }

        let tolerance = tolerance.max(0.0);
        let mut hits: Vec<(u64, &Feature)> = self
            .index
            .query_point(coordinate, tolerance)
            .into_iter()
            .filter_map(|item| self.features.get(&item.data).map(|f| (item.data, f)))
            .filter(|(_, feature)| feature.distance_to(coordinate) <= tolerance)
            .collect();

        // topmost (latest added) first
        hits.sort_unstable_by(|a, b| b.0.cmp(&a.0));
        hits.into_iter().map(|(_, feature)| feature).collect()
    }
}

impl Layer for VectorLayer {
    crate::impl_layer_trait!(properties);

    fn extent(&self) -> Option<Bounds> {
        self.index.bounds()
    }

    fn as_hit_test(&self) -> Option<&dyn HitTest> {
        Some(self)
    }

    fn options(&self) -> serde_json::Value {
        serde_json::json!({
            "source": self.source_url,
            "feature_count": self.features.len()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trail(id: &str, points: &[(f64, f64)]) -> Feature {
        Feature::line_string(id, points.iter().map(|(x, y)| Point::new(*x, *y)).collect())
    }

    fn sample_layer() -> VectorLayer {
        let mut layer = VectorLayer::new("caminos".to_string(), "Caminos de Santiago".to_string());
        layer
            .add_feature(
                trail("frances", &[(0.0, 0.0), (100.0, 0.0)])
                    .with_property("nombre", "Camino Francés")
                    .with_property("agrupacion", "grupo2")
                    .with_property("longitud", 764),
            )
            .unwrap();
        layer
            .add_feature(
                trail("variante", &[(50.0, -50.0), (50.0, 50.0)])
                    .with_property("nombre", "Variante")
                    .with_property("agrupacion", "grupo1"),
            )
            .unwrap();
        layer
    }

    #[test]
    fn test_vector_layer_creation() {
        let layer = VectorLayer::new("test".to_string(), "Test Vector Layer".to_string());
        assert_eq!(layer.id(), "test");
        assert_eq!(layer.name(), "Test Vector Layer");
        assert_eq!(layer.layer_type(), LayerType::Vector);
        assert_eq!(layer.role(), LayerRole::Overlay);
        assert_eq!(layer.feature_count(), 0);
        assert!(layer.extent().is_none());
    }

    #[test]
    fn test_feature_operations() {
        let mut layer = sample_layer();
        assert_eq!(layer.feature_count(), 2);
        assert!(layer.get_feature("frances").is_some());

        let removed = layer.remove_feature("frances").unwrap();
        assert_eq!(removed.map(|f| f.id().to_string()), Some("frances".to_string()));
        assert_eq!(layer.feature_count(), 1);
        assert!(layer.features_at(Point::new(10.0, 0.0), 1.0).is_empty());

        layer.clear();
        assert_eq!(layer.feature_count(), 0);
    }

    #[test]
    fn test_feature_attribute_access() {
        let feature = Feature::point("p", Point::new(0.0, 0.0))
            .with_property("nombre", "Camino Primitivo")
            .with_property("longitud", "321.5")
            .with_property("etapas", serde_json::Value::Null);

        assert_eq!(feature.get_str("nombre"), Some("Camino Primitivo"));
        assert_eq!(feature.get_f64("longitud"), Some(321.5));
        assert_eq!(feature.get_f64("etapas"), None);
        assert_eq!(feature.get_f64("nombre"), None);
        assert_eq!(feature.get_str("missing"), None);
    }

    #[test]
    fn test_non_finite_measures_are_absent() {
        let feature = Feature::point("p", Point::new(0.0, 0.0))
            .with_property("nan", "NaN")
            .with_property("inf", " inf ")
            .with_property("neg", "-infinity")
            .with_property("ok", "1e3");

        assert_eq!(feature.get_f64("nan"), None);
        assert_eq!(feature.get_f64("inf"), None);
        assert_eq!(feature.get_f64("neg"), None);
        assert_eq!(feature.get_f64("ok"), Some(1000.0));
    }

    #[test]
    fn test_anonymous_features_accumulate_across_documents() {
        let document = |lon: f64| {
            format!(
                r#"{{"type": "FeatureCollection", "features": [{{"type": "Feature",
                    "properties": {{"agrupacion": "otros"}},
                    "geometry": {{"type": "Point", "coordinates": [{}, 42.0]}}}}]}}"#,
                lon
            )
        };

        let mut layer = VectorLayer::new("caminos".to_string(), "Caminos".to_string());
        assert_eq!(layer.load_geojson(&document(-8.0)).unwrap(), 1);
        assert_eq!(layer.load_geojson(&document(-7.0)).unwrap(), 1);
        assert_eq!(layer.feature_count(), 2);

        let ids: Vec<&str> = layer.features().map(|f| f.id()).collect();
        assert_eq!(ids, vec!["caminos-0", "caminos-1"]);
    }

    #[test]
    fn test_anonymous_name_skips_taken_ids() {
        let mut layer = VectorLayer::new("caminos".to_string(), "Caminos".to_string());
        layer
            .add_feature(Feature::point("caminos-1", Point::new(0.0, 0.0)))
            .unwrap();
        layer
            .add_feature(Feature::point("", Point::new(1.0, 1.0)))
            .unwrap();

        assert_eq!(layer.feature_count(), 2);
        assert!(layer.get_feature("caminos-1").is_some());
        assert!(layer.get_feature("caminos-2").is_some());
    }

    #[test]
    fn test_replacements_are_not_counted_as_gained() {
        let mut layer = sample_layer();
        let gained = layer
            .add_features(vec![
                trail("frances", &[(0.0, 0.0), (100.0, 0.0)]),
                trail("norte", &[(0.0, 10.0), (100.0, 10.0)]),
            ])
            .unwrap();
        assert_eq!(gained, 1);
        assert_eq!(layer.feature_count(), 3);
    }

    #[test]
    fn test_hit_test_on_line() {
        let layer = sample_layer();

        let hits = layer.features_at(Point::new(10.0, 1.0), 2.0);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id(), "frances");

        // inside the envelope of nothing and too far from both lines
        assert!(layer.features_at(Point::new(20.0, 20.0), 2.0).is_empty());
    }

    #[test]
    fn test_hit_test_topmost_first() {
        let layer = sample_layer();

        let hits = layer.features_at(Point::new(50.0, 0.0), 1.0);
        let ids: Vec<&str> = hits.iter().map(|f| f.id()).collect();
        assert_eq!(ids, vec!["variante", "frances"]);
    }

    #[test]
    fn test_readding_moves_feature_to_top() {
        let mut layer = sample_layer();
        let previous = layer
            .add_feature(trail("frances", &[(0.0, 0.0), (100.0, 0.0)]))
            .unwrap();
        assert!(previous.is_some());
        assert_eq!(layer.feature_count(), 2);

        let hits = layer.features_at(Point::new(50.0, 0.0), 1.0);
        assert_eq!(hits[0].id(), "frances");
    }

    #[test]
    fn test_hit_test_polygon_interior() {
        let mut layer = VectorLayer::new("zonas".to_string(), "Zonas".to_string());
        layer
            .add_feature(Feature::polygon(
                "galicia",
                vec![
                    Point::new(0.0, 0.0),
                    Point::new(10.0, 0.0),
                    Point::new(10.0, 10.0),
                    Point::new(0.0, 10.0),
                ],
            ))
            .unwrap();

        assert_eq!(layer.features_at(Point::new(5.0, 5.0), 0.0).len(), 1);
        assert_eq!(layer.features_at(Point::new(11.0, 5.0), 1.5).len(), 1);
        assert!(layer.features_at(Point::new(13.0, 5.0), 1.5).is_empty());
    }

    #[test]
    fn test_hidden_layer_has_no_hits() {
        let mut layer = sample_layer();
        layer.set_visible(false);
        assert!(layer.features_at(Point::new(10.0, 0.0), 2.0).is_empty());
    }

    #[test]
    fn test_styled_features_use_classifier() {
        let layer = sample_layer();
        let styles: Vec<(String, String)> = layer
            .styled_features()
            .map(|(f, style)| (f.id().to_string(), style.fill_color.to_hex()))
            .collect();

        assert_eq!(
            styles,
            vec![
                ("frances".to_string(), "#33FF57".to_string()),
                ("variante".to_string(), "#FF5733".to_string()),
            ]
        );
    }

    #[test]
    fn test_custom_style_function() {
        let layer = sample_layer().with_style(|_: &Feature| {
            StyleDescriptor::solid(crate::layers::style::Color::rgb(0, 0, 0), 1.0)
        });
        assert!(layer
            .styled_features()
            .all(|(_, style)| style.stroke_width == 1.0));
    }

    #[test]
    fn test_layer_extent() {
        let layer = sample_layer();
        assert_eq!(layer.extent(), Some(Bounds::from_coords(0.0, -50.0, 100.0, 50.0)));
    }
}
