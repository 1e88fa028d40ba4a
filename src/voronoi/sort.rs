//! Counter-clockwise ordering of cell boundaries
//!
//! The sweep leaves every site with its edge records in the order its vertices
//! were found. This pass sorts each site's records counter-clockwise around the
//! site and rewrites every `divergent` index to point into the sorted lists.

use glam::DVec3;
use std::cmp::Ordering;

use crate::cell::Edge;

/// Angular order around `center`, starting from a reference direction
///
/// Compares by the sign of two dot products first, which settles every pair that
/// lies in different half-planes without any trigonometry. Pairs in the same
/// half-plane are less than π apart, so the sign of their triple product decides.
struct AngularOrder {
    center: DVec3,
    reference: DVec3,
    /// Reference rotated a quarter turn clockwise
    clockwise: DVec3,
}

impl AngularOrder {
    fn new(center: DVec3, zero: DVec3) -> Self {
        let reference = zero - center;
        // center doubles as the surface normal
        let clockwise = reference.cross(center);
        Self {
            center,
            reference,
            clockwise,
        }
    }

    /// Whether `a` comes before `b` counter-clockwise from the reference
    ///
    /// ```text
    ///           β > 0   β = 0   β < 0
    ///  α > 0 |   ×     a > b   a > b
    ///  α = 0 | a < b     †       ×
    ///  α < 0 | a < b     ×       ×
    /// ```
    ///
    /// `×` falls back to the triple product, `†` means both points sit at 0 or π.
    fn precedes(&self, a: DVec3, b: DVec3) -> bool {
        let a = a - self.center;
        let b = b - self.center;
        let alpha = a.dot(self.clockwise);
        let beta = b.dot(self.clockwise);

        if beta <= 0.0 && alpha > 0.0 {
            false
        } else if alpha <= 0.0 && beta > 0.0 {
            true
        } else if alpha == 0.0 && beta == 0.0 {
            a.dot(self.reference) > 0.0 && b.dot(self.reference) < 0.0
        } else {
            a.cross(b).dot(self.center) > 0.0
        }
    }

    fn compare(&self, a: DVec3, b: DVec3) -> Ordering {
        if self.precedes(a, b) {
            Ordering::Less
        } else if self.precedes(b, a) {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }
}

/// Sort one site's edge records counter-clockwise around `center`
///
/// Returns the rank table: `ranks[old]` is the record's position after sorting.
pub(crate) fn sort_edges(center: DVec3, edges: &mut Vec<Edge>, vertices: &[DVec3]) -> Vec<usize> {
    let Some(first) = edges.first() else {
        return Vec::new();
    };

    let order = AngularOrder::new(center, vertices[first.vertex]);
    let mut permutation: Vec<usize> = (0..edges.len()).collect();
    permutation.sort_by(|&a, &b| {
        order.compare(vertices[edges[a].vertex], vertices[edges[b].vertex])
    });

    let mut ranks = vec![0; edges.len()];
    for (rank, &old) in permutation.iter().enumerate() {
        ranks[old] = rank;
    }

    let sorted: Vec<Edge> = permutation.into_iter().map(|old| edges[old]).collect();
    *edges = sorted;
    ranks
}

/// Sort every site's edge records and remap `divergent` through the neighbors'
/// rank tables
pub(crate) fn sort_cells(sites: &[DVec3], edges: &mut [Vec<Edge>], vertices: &[DVec3]) {
    let ranks: Vec<Vec<usize>> = sites
        .iter()
        .zip(edges.iter_mut())
        .map(|(&center, records)| sort_edges(center, records, vertices))
        .collect();

    for records in edges.iter_mut() {
        for edge in records.iter_mut() {
            edge.divergent = ranks[edge.neighbor][edge.divergent];
        }
    }
}
