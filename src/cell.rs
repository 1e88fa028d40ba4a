//! Voronoi Cell Structure
//!
//! A cell is one site's region of the sphere: its center plus a cyclic,
//! counter-clockwise loop of boundary edges with adjacency back-references.

use glam::Vec3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One boundary edge of a cell
///
/// The edge runs from `vertex` to the vertex of the next edge in the cell's loop and
/// separates the cell from `neighbor`.
///
/// # Adjacency
///
/// `divergent` indexes the neighbor's edge that leaves the same Voronoi vertex:
///
/// ```text
/// cells[e.neighbor].edges[e.divergent].vertex == e.vertex
/// ```
///
/// The neighbor's copy of this boundary edge (its *twin*) is the edge just before
/// the divergent one in the neighbor's loop. See [`Cell::twin_index`].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    /// Index into the diagram's vertex list
    pub vertex: usize,
    /// Cell on the other side of this edge
    pub neighbor: usize,
    /// Position of the neighbor's edge that leaves the same vertex
    pub divergent: usize,
}

/// A single Voronoi cell on the sphere
///
/// Cell IDs are the index of the generating site in the input point list. The edge
/// loop traces the boundary counter-clockwise as seen from outside the sphere.
///
/// A cell can have an empty edge loop when the diagram has fewer than three sites.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    /// Unique identifier for this cell (0 to cell_count-1)
    pub id: usize,

    /// The generating site, a unit vector
    pub center: Vec3,

    /// Boundary edges in counter-clockwise order
    pub edges: Vec<Edge>,
}

impl Cell {
    /// Create a new Voronoi cell
    ///
    /// This is typically called during diagram generation, not by user code.
    pub fn new(id: usize, center: Vec3, edges: Vec<Edge>) -> Self {
        Self { id, center, edges }
    }

    /// Number of boundary edges, which equals the number of boundary vertices
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// IDs of adjacent cells, in boundary order
    pub fn neighbors(&self) -> impl Iterator<Item = usize> + '_ {
        self.edges.iter().map(|edge| edge.neighbor)
    }

    /// Check if this cell is a neighbor of another cell
    #[inline]
    pub fn is_neighbor_of(&self, other_cell_id: usize) -> bool {
        self.edges.iter().any(|edge| edge.neighbor == other_cell_id)
    }

    /// Vertex indices of the boundary loop
    pub fn vertex_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.edges.iter().map(|edge| edge.vertex)
    }

    /// Position of the twin of edge `edge` in the neighbor's edge loop
    ///
    /// `neighbor_edge_count` is the length of the neighbor's loop. Returns `None`
    /// for an out-of-range edge or an empty neighbor loop.
    pub fn twin_index(&self, edge: usize, neighbor_edge_count: usize) -> Option<usize> {
        let edge = self.edges.get(edge)?;
        if neighbor_edge_count == 0 {
            return None;
        }
        Some((edge.divergent + neighbor_edge_count - 1) % neighbor_edge_count)
    }

    /// Calculate the approximate surface area of this cell
    ///
    /// Sums the flat triangles between the center and each boundary edge, so it
    /// slightly underestimates the spherical area.
    pub fn approximate_area(&self, vertices: &[Vec3]) -> f32 {
        if self.edges.len() < 3 {
            return 0.0;
        }

        let mut area = 0.0;
        for (i, edge) in self.edges.iter().enumerate() {
            let next = &self.edges[(i + 1) % self.edges.len()];
            let v1 = vertices[edge.vertex] - self.center;
            let v2 = vertices[next.vertex] - self.center;
            area += v1.cross(v2).length() * 0.5;
        }

        area
    }

    /// Get distance to another cell (great circle distance between centers)
    ///
    /// Returns the arc distance along the sphere surface, not Euclidean distance.
    pub fn distance_to(&self, other: &Cell, sphere_radius: f32) -> f32 {
        let cos_angle = self.center.dot(other.center) / (self.center.length() * other.center.length());

        // Clamp to avoid numerical issues with acos
        sphere_radius * cos_angle.clamp(-1.0, 1.0).acos()
    }
}
