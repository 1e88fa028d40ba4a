//! Mesh generation for Voronoi diagrams
//!
//! Turns a [`SphericalVoronoi`] into flat-shaded render buffers: one tesselated
//! sub-mesh per cell, with every vertex duplicated per cell so each cell can carry
//! its own color.

mod colors;

pub use colors::{CellColor, CellColorMapper, PositionColorMapper, RandomColorMapper, UniformColorMapper};

use glam::Vec3;
use log::{debug, warn};
use std::ops::Range;

use crate::config::check_resolution;
use crate::error::{Result, VoronoiError};
use crate::tesselate::tesselate;
use crate::voronoi::SphericalVoronoi;

/// Floats per vertex in [`MeshBuffers::vertex_data`]: position then color
pub const FLOATS_PER_VERTEX: usize = 6;

/// Number of loop indices repeated after each cell's outline
///
/// Renderers drawing the outlines as line strips with adjacency need the loop's
/// start again, plus one point on either side of it.
pub const OUTLINE_PADDING: usize = 3;

/// Where one cell's indices live in [`MeshBuffers::indices`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellRanges {
    /// Outline loop including its trailing adjacency padding
    pub outline: Range<usize>,
    /// Triangle list of the cell's fill
    pub fill: Range<usize>,
    /// Offsets from `outline.start` where each Voronoi edge begins
    pub segments: Vec<usize>,
}

/// Engine-agnostic render buffers
///
/// `vertex_data` interleaves position and color, [`FLOATS_PER_VERTEX`] floats per
/// vertex. `indices` holds three regions back to back:
///
/// ```text
/// [ outlines + padding | centers | fill triangles ]
///   0                   centers_offset
///                                  fill_offset
/// ```
///
/// Indices are stored as `I`, which must be able to address every vertex.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshBuffers<I> {
    /// Interleaved `x, y, z, r, g, b` per vertex
    pub vertex_data: Vec<f32>,
    /// All index regions, see the type docs for the layout
    pub indices: Vec<I>,
    /// Start of the center-point region
    pub centers_offset: usize,
    /// Start of the fill region
    pub fill_offset: usize,
    /// Per-cell index ranges, by cell ID
    pub cells: Vec<CellRanges>,
}

impl<I> MeshBuffers<I> {
    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertex_data.len() / FLOATS_PER_VERTEX
    }

    /// Get the number of fill triangles
    pub fn triangle_count(&self) -> usize {
        (self.indices.len() - self.fill_offset) / 3
    }

    /// Check if mesh is empty
    pub fn is_empty(&self) -> bool {
        self.vertex_data.is_empty()
    }

    /// Outline loops with their adjacency padding
    pub fn outlines(&self) -> &[I] {
        &self.indices[..self.centers_offset]
    }

    /// One center-point index per cell
    pub fn centers(&self) -> &[I] {
        &self.indices[self.centers_offset..self.fill_offset]
    }

    /// Fill triangle list
    pub fn fill(&self) -> &[I] {
        &self.indices[self.fill_offset..]
    }

    /// Position of vertex `index`
    pub fn position(&self, index: usize) -> Vec3 {
        let base = index * FLOATS_PER_VERTEX;
        Vec3::from_slice(&self.vertex_data[base..base + 3])
    }

    /// Color of vertex `index`
    pub fn color(&self, index: usize) -> CellColor {
        let base = index * FLOATS_PER_VERTEX + 3;
        [
            self.vertex_data[base],
            self.vertex_data[base + 1],
            self.vertex_data[base + 2],
        ]
    }
}

/// Build render buffers for a diagram
///
/// Each cell is tesselated as a fan around its center with edges no longer than
/// about `resolution`. Cells with fewer than three boundary vertices only get a
/// center point.
///
/// # Arguments
///
/// * `diagram` - The diagram to mesh
/// * `resolution` - Maximum mesh edge length, strictly positive
/// * `color_mapper` - Chooses each cell's flat color
///
/// # Errors
///
/// - `InvalidConfig` if `resolution` is not a positive finite number
/// - `IndexOverflow` if `I` cannot address every vertex of the mesh
///
/// # Example
///
/// ```rust
/// use sphere_voronoi::*;
///
/// let sites = [
///     Vec3::new(0.0, 0.0, 1.0),
///     Vec3::new(0.9, 0.1, -0.3),
///     Vec3::new(-0.4, 0.8, -0.3),
///     Vec3::new(-0.5, -0.8, -0.3),
/// ];
/// let diagram = SphericalVoronoi::generate(&sites).unwrap();
/// let mesh: MeshBuffers<u32> = assemble_mesh(&diagram, 0.2, &PositionColorMapper).unwrap();
///
/// assert_eq!(mesh.centers().len(), 4);
/// assert!(mesh.triangle_count() > 0);
/// ```
pub fn assemble_mesh<I, C>(
    diagram: &SphericalVoronoi,
    resolution: f32,
    color_mapper: &C,
) -> Result<MeshBuffers<I>>
where
    I: TryFrom<usize> + Copy,
    C: CellColorMapper + ?Sized,
{
    check_resolution(resolution)?;

    let mut vertex_data = Vec::new();
    let mut outlines: Vec<usize> = Vec::new();
    let mut centers: Vec<usize> = Vec::with_capacity(diagram.cell_count());
    let mut fill: Vec<usize> = Vec::new();
    let mut cells = Vec::with_capacity(diagram.cell_count());

    // reused scratch buffer for each cell's fan
    let mut points: Vec<Vec3> = Vec::new();

    for cell in diagram.cells() {
        if cell.edge_count() < 3 {
            warn!(
                "cell {} has {} boundary vertices, skipping its fill",
                cell.id,
                cell.edge_count()
            );
        }

        points.clear();
        points.push(cell.center);
        points.extend(cell.vertex_indices().map(|vertex| diagram.vertices()[vertex]));
        let tesselation = tesselate(&mut points, resolution);

        let base = vertex_data.len() / FLOATS_PER_VERTEX;
        let color = color_mapper.map_color(cell);
        for point in &points {
            vertex_data.extend_from_slice(&[point.x, point.y, point.z]);
            vertex_data.extend_from_slice(&color);
        }

        let outline_start = outlines.len();
        outlines.extend(tesselation.outline.iter().map(|&local| base + local));
        if tesselation.outline.len() >= OUTLINE_PADDING {
            outlines.extend(tesselation.outline[..OUTLINE_PADDING].iter().map(|&local| base + local));
        }

        centers.push(base);

        let fill_start = fill.len();
        fill.extend(tesselation.fill.iter().map(|&local| base + local));

        cells.push(CellRanges {
            outline: outline_start..outlines.len(),
            fill: fill_start..fill.len(),
            segments: tesselation.segments,
        });
    }

    let vertex_count = vertex_data.len() / FLOATS_PER_VERTEX;
    let centers_offset = outlines.len();
    let fill_offset = centers_offset + centers.len();
    for ranges in &mut cells {
        ranges.fill = ranges.fill.start + fill_offset..ranges.fill.end + fill_offset;
    }

    let indices = outlines
        .into_iter()
        .chain(centers)
        .chain(fill)
        .map(|index| {
            I::try_from(index).map_err(|_| VoronoiError::IndexOverflow {
                vertices: vertex_count,
            })
        })
        .collect::<Result<Vec<I>>>()?;

    debug!(
        "Assembled mesh: {} vertices, {} indices ({} fill triangles)",
        vertex_count,
        indices.len(),
        (indices.len() - fill_offset) / 3
    );

    Ok(MeshBuffers {
        vertex_data,
        indices,
        centers_offset,
        fill_offset,
        cells,
    })
}
