//! Spatial indexing for fast position-to-cell lookups
//!
//! This module is only available with the `spatial-index` feature.

use glam::Vec3;
use kiddo::immutable::float::kdtree::ImmutableKdTree;
use kiddo::SquaredEuclidean;
use std::fmt;

/// KD-tree over cell centers
///
/// On the unit sphere the center closest in straight-line distance is also the
/// closest along the surface, so the nearest center is the cell containing the
/// query direction. This holds for queries off the sphere too: any positive scale
/// of a position lands in the same cell.
#[derive(Clone)]
pub struct SpatialIndex {
    // kiddo cannot build an empty tree
    tree: Option<ImmutableKdTree<f32, usize, 3, 32>>,
}

impl SpatialIndex {
    /// Build the index from cell centers, in cell ID order
    ///
    /// # Example
    ///
    /// ```
    /// use sphere_voronoi::*;
    ///
    /// let centers = vec![Vec3::X, Vec3::Y, Vec3::Z];
    ///
    /// let index = SpatialIndex::new(&centers);
    /// assert_eq!(index.find_nearest(Vec3::new(1.0, 0.1, 0.0)), Some(0));
    /// ```
    pub fn new(centers: &[Vec3]) -> Self {
        if centers.is_empty() {
            return Self { tree: None };
        }

        let points: Vec<[f32; 3]> = centers.iter().map(|c| c.to_array()).collect();
        Self {
            tree: Some(ImmutableKdTree::new_from_slice(&points)),
        }
    }

    /// Find the ID of the center closest to `position`
    ///
    /// Returns `None` only for an index built without centers.
    pub fn find_nearest(&self, position: Vec3) -> Option<usize> {
        let tree = self.tree.as_ref()?;
        let result = tree.nearest_one::<SquaredEuclidean>(&position.to_array());
        Some(result.item as usize)
    }

    /// Check if the index holds no centers
    pub fn is_empty(&self) -> bool {
        self.tree.is_none()
    }
}

impl fmt::Debug for SpatialIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpatialIndex")
            .field("empty", &self.is_empty())
            .finish()
    }
}
