//! Spherical Voronoi diagrams
//!
//! [`SphericalVoronoi::generate`] runs Fortune's sweep over the sphere and then
//! sorts every cell's boundary counter-clockwise. All geometry is computed in `f64`
//! and handed out as `f32`.

mod events;
mod sort;
mod sweep;
mod wavefront;

use glam::{DVec3, Vec3};
use log::debug;
use std::cmp::Ordering;
use std::time::Instant;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::cell::Cell;
use crate::config::{SitePolicy, UNIT_LENGTH_TOLERANCE};
use crate::error::{Result, VoronoiError};
use sweep::{Sweep, SweepOutput};

/// A Voronoi diagram on the unit sphere
///
/// Cell `i` belongs to input point `i`. Every Voronoi vertex is shared by (for
/// input in general position) exactly three cells, which refer to it by index into
/// [`vertices`](SphericalVoronoi::vertices).
///
/// # Example
///
/// ```rust
/// use sphere_voronoi::*;
///
/// // four sites spread over the sphere, rescaled onto it
/// let sites = [
///     Vec3::new(0.0, 0.0, 1.0),
///     Vec3::new(0.9, 0.1, -0.3),
///     Vec3::new(-0.4, 0.8, -0.3),
///     Vec3::new(-0.5, -0.8, -0.3),
/// ];
/// let diagram = SphericalVoronoi::generate(&sites).unwrap();
///
/// assert_eq!(diagram.cell_count(), 4);
/// assert_eq!(diagram.vertex_count(), 4);
/// assert_eq!(diagram.edge_count(), 6);
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SphericalVoronoi {
    cells: Vec<Cell>,
    vertices: Vec<Vec3>,
}

impl SphericalVoronoi {
    /// Generate the diagram of a set of points on the unit sphere
    ///
    /// Points are rescaled onto the sphere first. An empty input yields an empty
    /// diagram; one or two sites yield cells without boundary edges.
    ///
    /// # Errors
    ///
    /// - `InvalidSite` if a point is not finite or has zero length
    /// - `CoincidentSites` if two points land on the same spot of the sphere
    pub fn generate(points: &[Vec3]) -> Result<Self> {
        Self::generate_with_policy(points, SitePolicy::default())
    }

    /// Generate the diagram with an explicit policy for non-unit points
    ///
    /// # Errors
    ///
    /// As [`generate`](Self::generate), plus `NotNormalized` when `policy` is
    /// [`SitePolicy::Strict`] and a point is not unit length.
    pub fn generate_with_policy(points: &[Vec3], policy: SitePolicy) -> Result<Self> {
        let start = Instant::now();
        let sites = prepare_sites(points, policy)?;

        let SweepOutput {
            vertices,
            mut edges,
            events,
        } = Sweep::new(&sites).run();
        sort::sort_cells(&sites, &mut edges, &vertices);

        let cells: Vec<Cell> = sites
            .iter()
            .zip(edges)
            .enumerate()
            .map(|(id, (site, edges))| Cell::new(id, site.as_vec3(), edges))
            .collect();

        debug!(
            "Voronoi sweep: {} sites, {} vertices, {} events in {:.2?}",
            cells.len(),
            vertices.len(),
            events,
            start.elapsed()
        );

        Ok(Self {
            cells,
            vertices: vertices.iter().map(DVec3::as_vec3).collect(),
        })
    }

    /// All cells, indexed by site
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Get a cell by ID
    ///
    /// # Errors
    ///
    /// Returns `CellNotFound` if the ID is out of range
    pub fn cell(&self, id: usize) -> Result<&Cell> {
        self.cells.get(id).ok_or(VoronoiError::CellNotFound(id))
    }

    /// Voronoi vertices, each on the unit sphere
    #[inline]
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of Voronoi edges, each counted once although two cells list it
    pub fn edge_count(&self) -> usize {
        self.cells.iter().map(Cell::edge_count).sum::<usize>() / 2
    }

    /// Locate the neighbor's copy of a boundary edge
    ///
    /// Returns `(neighbor, index)` such that `cells[neighbor].edges[index]` runs along
    /// the same Voronoi edge as `cells[cell].edges[edge]`, in the opposite direction.
    /// Returns `None` if either index is out of range.
    pub fn twin(&self, cell: usize, edge: usize) -> Option<(usize, usize)> {
        let record = self.cells.get(cell)?.edges.get(edge)?;
        let neighbor = self.cells.get(record.neighbor)?;
        let index = self.cells[cell].twin_index(edge, neighbor.edge_count())?;
        Some((record.neighbor, index))
    }
}

/// Validate the input points and move them onto the unit sphere in `f64`
fn prepare_sites(points: &[Vec3], policy: SitePolicy) -> Result<Vec<DVec3>> {
    let mut sites = Vec::with_capacity(points.len());
    for (index, point) in points.iter().enumerate() {
        let site = point.as_dvec3();
        let length = site.length();
        if !site.is_finite() || length == 0.0 {
            return Err(VoronoiError::InvalidSite { index });
        }
        if policy == SitePolicy::Strict && (length - 1.0).abs() > UNIT_LENGTH_TOLERANCE {
            return Err(VoronoiError::NotNormalized { index, length });
        }
        sites.push(site / length);
    }

    // identical sites end up adjacent in lexicographic order
    let mut order: Vec<usize> = (0..sites.len()).collect();
    order.sort_by(|&a, &b| lexicographic(sites[a], sites[b]).then(a.cmp(&b)));
    for pair in order.windows(2) {
        if sites[pair[0]] == sites[pair[1]] {
            return Err(VoronoiError::CoincidentSites {
                first: pair[0].min(pair[1]),
                second: pair[0].max(pair[1]),
            });
        }
    }

    Ok(sites)
}

fn lexicographic(a: DVec3, b: DVec3) -> Ordering {
    a.x.total_cmp(&b.x)
        .then(a.y.total_cmp(&b.y))
        .then(a.z.total_cmp(&b.z))
}
