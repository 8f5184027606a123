//! Attribute-driven feature styling
//!
//! A [`CategoryClassifier`] maps the value of one categorical attribute to a
//! [`StyleDescriptor`] through a fixed lookup table with an explicit default
//! entry, so every feature gets a style whatever its data looks like.

use crate::{
    core::{config::StyleRuleConfig, constants::CATEGORY_KEY, constants::DEFAULT_STROKE_WIDTH},
    layers::vector::Feature,
    prelude::HashMap,
    traits::StyleFunction,
    Result,
};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;

/// RGBA colour with 8 bits per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parses `#RRGGBB` or `#RRGGBBAA` (case insensitive, `#` optional)
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.trim().trim_start_matches('#');
        if !(digits.len() == 6 || digits.len() == 8) || !digits.is_ascii() {
            return Err(Box::new(crate::Error::ParseError(format!(
                "Invalid hex color: {}",
                hex
            ))));
        }

        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16).map_err(|e| {
                crate::Error::ParseError(format!("Invalid hex color {}: {}", hex, e))
            })
        };

        let a = if digits.len() == 8 { channel(6)? } else { 255 };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?, a))
    }

    /// Upper-case `#RRGGBB`, with the alpha byte appended only when not opaque
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Visual style of one feature as handed to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StyleDescriptor {
    pub stroke_color: Color,
    pub fill_color: Color,
    pub stroke_width: f32,
}

impl StyleDescriptor {
    /// Stroke and fill share one colour
    pub const fn solid(color: Color, stroke_width: f32) -> Self {
        Self {
            stroke_color: color,
            fill_color: color,
            stroke_width,
        }
    }
}

impl Default for StyleDescriptor {
    fn default() -> Self {
        Self::solid(CAMINOS_DEFAULT_COLOR, DEFAULT_STROKE_WIDTH)
    }
}

/// Colours of the trail groupings, keyed by `agrupacion` value
pub const CAMINOS_PALETTE: [(&str, Color); 3] = [
    ("grupo1", Color::rgb(0xFF, 0x57, 0x33)),
    ("grupo2", Color::rgb(0x33, 0xFF, 0x57)),
    ("grupo3", Color::rgb(0x33, 0x57, 0xFF)),
];

/// Colour for any grouping missing from [`CAMINOS_PALETTE`]
pub const CAMINOS_DEFAULT_COLOR: Color = Color::rgb(0xFF, 0x33, 0xA1);

/// Shared classifier for the trail overlay
pub static DEFAULT_CLASSIFIER: Lazy<CategoryClassifier> = Lazy::new(CategoryClassifier::caminos);

/// Classifies a grouping value with [`DEFAULT_CLASSIFIER`]
pub fn classify(value: Option<&str>) -> StyleDescriptor {
    DEFAULT_CLASSIFIER.classify(value)
}

/// Exact-match lookup from a categorical attribute to a style
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryClassifier {
    attribute: String,
    table: HashMap<String, StyleDescriptor>,
    default: StyleDescriptor,
}

impl CategoryClassifier {
    pub fn new(attribute: impl Into<String>, default: StyleDescriptor) -> Self {
        Self {
            attribute: attribute.into(),
            table: HashMap::default(),
            default,
        }
    }

    /// Binds `value` to `style`, replacing any earlier binding
    pub fn with_category(mut self, value: impl Into<String>, style: StyleDescriptor) -> Self {
        self.table.insert(value.into(), style);
        self
    }

    /// The trail-grouping rule: `grupo1..3` to their colours, pink otherwise
    pub fn caminos() -> Self {
        CAMINOS_PALETTE.iter().fold(
            Self::new(
                CATEGORY_KEY,
                StyleDescriptor::solid(CAMINOS_DEFAULT_COLOR, DEFAULT_STROKE_WIDTH),
            ),
            |classifier, (value, color)| {
                classifier.with_category(*value, StyleDescriptor::solid(*color, DEFAULT_STROKE_WIDTH))
            },
        )
    }

    pub fn from_config(config: &StyleRuleConfig) -> Result<Self> {
        let default = StyleDescriptor::solid(
            Color::from_hex(&config.default_color)?,
            config.stroke_width,
        );

        let mut classifier = Self::new(config.attribute.clone(), default);
        for (value, hex) in &config.categories {
            let style = StyleDescriptor::solid(Color::from_hex(hex)?, config.stroke_width);
            classifier.table.insert(value.clone(), style);
        }

        Ok(classifier)
    }

    /// Name of the attribute this classifier reads
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    pub fn default_style(&self) -> StyleDescriptor {
        self.default
    }

    /// Known category values and their styles
    pub fn categories(&self) -> impl Iterator<Item = (&str, &StyleDescriptor)> {
        self.table.iter().map(|(value, style)| (value.as_str(), style))
    }

    pub fn classify(&self, value: Option<&str>) -> StyleDescriptor {
        value
            .and_then(|value| self.table.get(value))
            .copied()
            .unwrap_or(self.default)
    }

    /// Non-string attribute values fall through to the default style
    pub fn classify_feature(&self, feature: &Feature) -> StyleDescriptor {
        self.classify(feature.get_str(&self.attribute))
    }
}

impl Default for CategoryClassifier {
    fn default() -> Self {
        Self::caminos()
    }
}

impl StyleFunction for CategoryClassifier {
    fn style(&self, feature: &Feature) -> StyleDescriptor {
        self.classify_feature(feature)
    }
}
