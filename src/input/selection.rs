//! Pointer selection: from a clicked coordinate to a popup payload
//!
//! Each call is independent. The handler asks a [`HitTest`] source for the
//! features under the coordinate, looks only at the first (topmost) one, and
//! reports a [`SelectionResult::Hit`] when that feature carries a display
//! name. Everything else, including an empty query, is a
//! [`SelectionResult::Miss`].

use crate::{
    core::{
        constants::{MEASURE_KEY, NAME_KEY},
        geo::Point,
    },
    layers::vector::Feature,
    traits::HitTest,
};
use serde::{Deserialize, Serialize};

/// Outcome of one pointer selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SelectionResult {
    Hit {
        name: String,
        measure: Option<f64>,
        coordinate: Point,
    },
    Miss,
}

impl SelectionResult {
    pub fn is_hit(&self) -> bool {
        matches!(self, SelectionResult::Hit { .. })
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            SelectionResult::Hit { name, .. } => Some(name),
            SelectionResult::Miss => None,
        }
    }

    pub fn measure(&self) -> Option<f64> {
        match self {
            SelectionResult::Hit { measure, .. } => *measure,
            SelectionResult::Miss => None,
        }
    }

    /// Anchor for the popup
    pub fn coordinate(&self) -> Option<Point> {
        match self {
            SelectionResult::Hit { coordinate, .. } => Some(*coordinate),
            SelectionResult::Miss => None,
        }
    }
}

/// Reads the display-name and measure attributes of the topmost feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionHandler {
    pub name_key: String,
    pub measure_key: String,
}

impl SelectionHandler {
    pub fn new(name_key: impl Into<String>, measure_key: impl Into<String>) -> Self {
        Self {
            name_key: name_key.into(),
            measure_key: measure_key.into(),
        }
    }

    /// Resolves a selection at `coordinate`, `tolerance` being in map units
    pub fn on_select(
        &self,
        source: &dyn HitTest,
        coordinate: Point,
        tolerance: f64,
    ) -> SelectionResult {
        let result = match source.features_at(coordinate, tolerance).first() {
            Some(feature) => self.select_feature(feature, coordinate),
            None => SelectionResult::Miss,
        };

        match &result {
            SelectionResult::Hit { name, .. } => {
                log::debug!("Selected {} at ({:.1}, {:.1})", name, coordinate.x, coordinate.y)
            }
            SelectionResult::Miss => {
                log::debug!("No selection at ({:.1}, {:.1})", coordinate.x, coordinate.y)
            }
        }

        result
    }

    /// Builds the result for a feature already known to be under the pointer
    pub fn select_feature(&self, feature: &Feature, coordinate: Point) -> SelectionResult {
        match self.display_name(feature) {
            Some(name) => SelectionResult::Hit {
                name,
                measure: feature.get_f64(&self.measure_key),
                coordinate,
            },
            None => SelectionResult::Miss,
        }
    }

    /// Non-empty strings are names as-is and numbers are printed; any other
    /// value, or no value, means the feature has no name
    fn display_name(&self, feature: &Feature) -> Option<String> {
        match feature.get(&self.name_key)? {
            serde_json::Value::String(name) if !name.is_empty() => Some(name.clone()),
            serde_json::Value::Number(number) => Some(number.to_string()),
            _ => None,
        }
    }
}

impl Default for SelectionHandler {
    fn default() -> Self {
        Self::new(NAME_KEY, MEASURE_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Fixed answer regardless of where the pointer is
    struct StubIndex(Vec<Feature>);

    impl HitTest for StubIndex {
        fn features_at(&self, _coordinate: Point, _tolerance: f64) -> Vec<&Feature> {
            self.0.iter().collect()
        }
    }

    fn frances() -> Feature {
        Feature::point("frances", Point::new(0.0, 0.0))
            .with_property("nombre", "Camino Francés")
            .with_property("longitud", 764)
    }

    #[test]
    fn test_miss_on_empty_query() {
        let handler = SelectionHandler::default();
        let result = handler.on_select(&StubIndex(Vec::new()), Point::new(1.0, 2.0), 5.0);
        assert_eq!(result, SelectionResult::Miss);
        assert!(!result.is_hit());
        assert_eq!(result.coordinate(), None);
    }

    #[test]
    fn test_hit_carries_name_measure_and_coordinate() {
        let handler = SelectionHandler::default();
        let coordinate = Point::new(-950_000.0, 5_300_000.0);

        let result = handler.on_select(&StubIndex(vec![frances()]), coordinate, 5.0);
        assert_eq!(
            result,
            SelectionResult::Hit {
                name: "Camino Francés".to_string(),
                measure: Some(764.0),
                coordinate,
            }
        );
        assert_eq!(result.name(), Some("Camino Francés"));
        assert_eq!(result.measure(), Some(764.0));
    }

    #[test]
    fn test_hit_without_measure() {
        let handler = SelectionHandler::default();
        let feature = Feature::point("inglés", Point::new(0.0, 0.0))
            .with_property("nombre", "Camino Inglés")
            .with_property("longitud", "desconocida");

        let result = handler.on_select(&StubIndex(vec![feature]), Point::new(0.0, 0.0), 1.0);
        assert_eq!(result.name(), Some("Camino Inglés"));
        assert_eq!(result.measure(), None);
    }

    #[test]
    fn test_miss_when_first_feature_has_no_name() {
        let handler = SelectionHandler::default();
        let unnamed = Feature::point("sin-nombre", Point::new(0.0, 0.0))
            .with_property("agrupacion", "grupo1")
            .with_property("longitud", 120);

        let result = handler.on_select(
            &StubIndex(vec![unnamed, frances()]),
            Point::new(0.0, 0.0),
            1.0,
        );
        assert_eq!(result, SelectionResult::Miss);
    }

    #[test]
    fn test_first_named_feature_wins() {
        let handler = SelectionHandler::default();
        let norte = Feature::point("norte", Point::new(0.0, 0.0))
            .with_property("nombre", "Camino del Norte")
            .with_property("longitud", 817.5);

        let result = handler.on_select(
            &StubIndex(vec![norte, frances()]),
            Point::new(0.0, 0.0),
            1.0,
        );
        assert_eq!(result.name(), Some("Camino del Norte"));
        assert_eq!(result.measure(), Some(817.5));
    }

    #[test]
    fn test_blank_and_non_string_names() {
        let handler = SelectionHandler::default();
        let at = Point::new(0.0, 0.0);

        let empty = Feature::point("a", at).with_property("nombre", "");
        assert!(!handler.select_feature(&empty, at).is_hit());

        let null = Feature::point("b", at).with_property("nombre", serde_json::Value::Null);
        assert!(!handler.select_feature(&null, at).is_hit());

        let flag = Feature::point("c", at).with_property("nombre", true);
        assert!(!handler.select_feature(&flag, at).is_hit());

        let numbered = Feature::point("d", at).with_property("nombre", 42);
        assert_eq!(handler.select_feature(&numbered, at).name(), Some("42"));

        let zero = Feature::point("e", at).with_property("nombre", 0);
        assert_eq!(handler.select_feature(&zero, at).name(), Some("0"));
    }

    #[test]
    fn test_non_finite_measure_is_absent() {
        let handler = SelectionHandler::default();
        let feature = Feature::point("primitivo", Point::new(0.0, 0.0))
            .with_property("nombre", "Camino Primitivo")
            .with_property("longitud", "NaN");

        let result = handler.on_select(&StubIndex(vec![feature]), Point::new(0.0, 0.0), 1.0);
        assert_eq!(result.name(), Some("Camino Primitivo"));
        assert_eq!(result.measure(), None);
    }

    #[test]
    fn test_custom_keys() {
        let handler = SelectionHandler::new("name", "length_km");
        let feature = Feature::point("x", Point::new(0.0, 0.0))
            .with_property("name", "Via de la Plata")
            .with_property("length_km", 1000)
            .with_property("nombre", "ignored");

        let result = handler.select_feature(&feature, Point::new(0.0, 0.0));
        assert_eq!(result.name(), Some("Via de la Plata"));
        assert_eq!(result.measure(), Some(1000.0));
    }
}
