//! Spatial index for resolving which mask a point hits, using an R-tree

use rstar::{AABB, RTree, RTreeObject};

use crate::model::Mask;

/// Entry in the spatial index: a mask's box and its position in the mask list
#[derive(Debug, Clone)]
pub struct MaskEntry {
    /// Index into the masks slice
    pub index: usize,
    pub lower: [f64; 2],
    pub upper: [f64; 2],
    pub area: f64,
}

impl RTreeObject for MaskEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.lower, self.upper)
    }
}

/// Spatial index over a mask list
pub struct MaskIndex<'a> {
    tree: RTree<MaskEntry>,
    masks: &'a [Mask],
}

impl<'a> MaskIndex<'a> {
    pub fn new(masks: &'a [Mask]) -> Self {
        let entries = masks
            .iter()
            .enumerate()
            .map(|(index, mask)| MaskEntry {
                index,
                lower: mask.bounding_box.min_corner(),
                upper: mask.bounding_box.max_corner(),
                area: mask.bounding_box.area(),
            })
            .collect();

        Self {
            tree: RTree::bulk_load(entries),
            masks,
        }
    }

    /// Smallest-area mask whose box contains the point (edges inclusive).
    /// Equal areas resolve to the mask that comes first in list order.
    pub fn hit(&self, x: f64, y: f64) -> Option<&'a Mask> {
        if !x.is_finite() || !y.is_finite() {
            return None;
        }

        let probe = AABB::from_point([x, y]);
        self.tree
            .locate_in_envelope_intersecting(&probe)
            // The envelope normalizes flipped boxes; containment does not
            .filter(|entry| self.masks[entry.index].bounding_box.contains(x, y))
            .min_by(|a, b| {
                a.area
                    .total_cmp(&b.area)
                    .then_with(|| a.index.cmp(&b.index))
            })
            .map(|entry| &self.masks[entry.index])
    }

    pub fn len(&self) -> usize {
        self.masks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.masks.is_empty()
    }
}
