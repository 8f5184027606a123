//! Shared trait abstractions at the seams between the map and its collaborators
//!
//! The renderer styles features through [`StyleFunction`], pointer handling
//! resolves features through [`HitTest`], and selection outcomes are handed
//! to a [`SelectionSink`] for presentation.

use crate::{
    core::geo::Point,
    input::selection::SelectionResult,
    layers::{style::StyleDescriptor, vector::Feature},
};

/// Spatial query answering "which features are under this coordinate".
pub trait HitTest {
    /// Features within `tolerance` map units of `coordinate`.
    ///
    /// Results are ordered topmost-rendered first: later groups before
    /// earlier ones, higher z-index before lower, and within a layer the
    /// most recently added feature first.
    fn features_at(&self, coordinate: Point, tolerance: f64) -> Vec<&Feature>;

    /// Whether anything at all lies under `coordinate`
    fn has_feature_at(&self, coordinate: Point, tolerance: f64) -> bool {
        !self.features_at(coordinate, tolerance).is_empty()
    }
}

/// Per-feature style resolution, called by the renderer on every redraw.
pub trait StyleFunction: Send + Sync {
    fn style(&self, feature: &Feature) -> StyleDescriptor;
}

impl<F> StyleFunction for F
where
    F: Fn(&Feature) -> StyleDescriptor + Send + Sync,
{
    fn style(&self, feature: &Feature) -> StyleDescriptor {
        self(feature)
    }
}

/// Consumer of selection outcomes (a popup, a side panel, a log).
pub trait SelectionSink {
    fn present(&mut self, result: &SelectionResult);
}

impl SelectionSink for Vec<SelectionResult> {
    fn present(&mut self, result: &SelectionResult) {
        self.push(result.clone());
    }
}
