//! Envelope index over feature extents
//!
//! Hit testing asks the R-tree for candidates first and only then measures
//! exact distances, so a click never walks every trail segment.

use crate::{
    core::{bounds::Bounds, geo::Point},
    Result,
};

use rstar::{RTree, RTreeObject, AABB};

/// Envelope stored in the tree along with the feature it stands for
#[derive(Debug, Clone)]
pub struct SpatialItem<T> {
    pub id: String,
    pub bounds: Bounds,
    pub data: T,
}

impl<T> SpatialItem<T> {
    pub fn new(id: String, bounds: Bounds, data: T) -> Self {
        Self { id, bounds, data }
    }
}

// rstar finds the item to remove through equality; ids are unique per index
impl<T> PartialEq for SpatialItem<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for SpatialItem<T> {}

fn aabb(bounds: &Bounds) -> AABB<[f64; 2]> {
    AABB::from_corners([bounds.min.x, bounds.min.y], [bounds.max.x, bounds.max.y])
}

impl<T> RTreeObject for SpatialItem<T> {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        aabb(&self.bounds)
    }
}

/// R-tree of feature envelopes plus the extent they cover together
pub struct SpatialIndex<T> {
    rtree: RTree<SpatialItem<T>>,
    bounds: Option<Bounds>,
}

impl<T: Clone> SpatialIndex<T> {
    pub fn new() -> Self {
        Self {
            rtree: RTree::new(),
            bounds: None,
        }
    }

    pub fn insert(&mut self, item: SpatialItem<T>) -> Result<()> {
        if !item.bounds.is_valid() {
            return Err(Box::new(crate::Error::InvalidCoordinates(format!(
                "envelope of {} has min greater than max",
                item.id
            ))));
        }

        match self.bounds.as_mut() {
            Some(total) => total.extend_bounds(&item.bounds),
            None => self.bounds = Some(item.bounds),
        }
        self.rtree.insert(item);
        Ok(())
    }

    /// Items whose envelope touches `bounds`
    pub fn query(&self, bounds: &Bounds) -> Vec<&SpatialItem<T>> {
        self.rtree
            .locate_in_envelope_intersecting(&aabb(bounds))
            .collect()
    }

    /// Items whose envelope comes within `tolerance` of `point`
    pub fn query_point(&self, point: Point, tolerance: f64) -> Vec<&SpatialItem<T>> {
        self.query(&Bounds::new(point, point).expanded(tolerance.max(0.0)))
    }

    /// Drops the item with `id` and shrinks the covered extent to what is left
    pub fn remove(&mut self, id: &str) -> Option<SpatialItem<T>> {
        let target = self.rtree.iter().find(|item| item.id == id).cloned()?;
        let removed = self.rtree.remove(&target);

        self.bounds = if self.rtree.size() == 0 {
            None
        } else {
            let root = self.rtree.root().envelope();
            let (lower, upper) = (root.lower(), root.upper());
            Some(Bounds::from_coords(lower[0], lower[1], upper[0], upper[1]))
        };
        removed
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    pub fn len(&self) -> usize {
        self.rtree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.rtree = RTree::new();
        self.bounds = None;
    }
}

impl<T: Clone> Default for SpatialIndex<T> {
    fn default() -> Self {
        Self::new()
    }
}
