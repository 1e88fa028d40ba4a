//! VoronoiMap main structure

use glam::Vec3;
use log::info;
use std::collections::{HashSet, VecDeque};

use crate::cell::Cell;
use crate::config::{check_resolution, MapConfig};
use crate::error::{Result, VoronoiError};
use crate::mesh::{assemble_mesh, CellColorMapper, CellRanges, MeshBuffers, RandomColorMapper};
use crate::voronoi::SphericalVoronoi;

#[cfg(feature = "spatial-index")]
use crate::spatial::SpatialIndex;

/// A spherical Voronoi diagram together with its render mesh
///
/// Generic over the index type `I` of the mesh buffers. `u32` suits most engines;
/// `u16` halves the index buffer for small maps, and generation fails with
/// `IndexOverflow` if the mesh outgrows it.
///
/// # Examples
///
/// ```
/// use sphere_voronoi::*;
///
/// let points = [
///     Vec3::new(0.0, 0.0, 1.0),
///     Vec3::new(0.9, 0.1, -0.3),
///     Vec3::new(-0.4, 0.8, -0.3),
///     Vec3::new(-0.5, -0.8, -0.3),
///     Vec3::new(0.2, -0.1, -1.0),
/// ];
/// let map: VoronoiMap = VoronoiMap::generate(&points, MapConfig::default()).unwrap();
/// println!("Generated {} cells", map.cell_count());
///
/// if let Some(cell) = map.get_cell(0) {
///     println!("Cell 0 has {} neighbors", cell.edge_count());
/// }
/// ```
#[derive(Debug, Clone)]
pub struct VoronoiMap<I = u32> {
    /// Configuration used to generate this map
    config: MapConfig,

    diagram: SphericalVoronoi,

    mesh: MeshBuffers<I>,

    /// Spatial index for fast position-to-cell lookups (optional, requires spatial-index feature)
    #[cfg(feature = "spatial-index")]
    spatial_index: SpatialIndex,
}

impl<I> VoronoiMap<I>
where
    I: TryFrom<usize> + Copy,
{
    /// Generate a map with seeded random cell colors
    ///
    /// The colors come from a [`RandomColorMapper`] seeded with `config.color_seed`.
    ///
    /// # Errors
    ///
    /// - `InvalidSite`, `NotNormalized` or `CoincidentSites` for unusable points
    /// - `InvalidConfig` if the configured resolution is not positive and finite
    /// - `IndexOverflow` if `I` cannot address the mesh
    ///
    /// # Example
    ///
    /// ```
    /// use sphere_voronoi::*;
    ///
    /// let points = [
    ///     Vec3::new(0.0, 0.0, 1.0),
    ///     Vec3::new(0.9, 0.1, -0.3),
    ///     Vec3::new(-0.4, 0.8, -0.3),
    ///     Vec3::new(-0.5, -0.8, -0.3),
    /// ];
    /// let config = MapConfigBuilder::new()
    ///     .detail(MeshDetail::Coarse)
    ///     .color_seed(12345)
    ///     .build()
    ///     .unwrap();
    ///
    /// let map: VoronoiMap<u16> = VoronoiMap::generate(&points, config).unwrap();
    /// assert_eq!(map.cell_count(), 4);
    /// ```
    pub fn generate(points: &[Vec3], config: MapConfig) -> Result<Self> {
        let mapper = RandomColorMapper::new(config.color_seed);
        Self::generate_with_colors(points, config, &mapper)
    }

    /// Generate a map with a custom color mapper
    ///
    /// The mapper is called once per cell; `config.color_seed` is ignored.
    ///
    /// # Example
    ///
    /// ```
    /// use sphere_voronoi::*;
    ///
    /// let points = [
    ///     Vec3::new(0.0, 0.0, 1.0),
    ///     Vec3::new(0.9, 0.1, -0.3),
    ///     Vec3::new(-0.4, 0.8, -0.3),
    ///     Vec3::new(-0.5, -0.8, -0.3),
    /// ];
    /// let map: VoronoiMap =
    ///     VoronoiMap::generate_with_colors(&points, MapConfig::default(), &PositionColorMapper).unwrap();
    /// assert!(map.mesh().triangle_count() > 0);
    /// ```
    pub fn generate_with_colors<C>(points: &[Vec3], config: MapConfig, color_mapper: &C) -> Result<Self>
    where
        C: CellColorMapper + ?Sized,
    {
        let resolution = config.resolution();
        check_resolution(resolution)?;

        let diagram = SphericalVoronoi::generate_with_policy(points, config.site_policy)?;
        let mesh = assemble_mesh(&diagram, resolution, color_mapper)?;

        info!(
            "Generated Voronoi map: {} cells, {} vertices, {} triangles ({} detail)",
            diagram.cell_count(),
            mesh.vertex_count(),
            mesh.triangle_count(),
            config.detail.name()
        );

        // Build spatial index (requires spatial-index feature)
        #[cfg(feature = "spatial-index")]
        let spatial_index = {
            let centers: Vec<Vec3> = diagram.cells().iter().map(|c| c.center).collect();
            SpatialIndex::new(&centers)
        };

        Ok(Self {
            config,
            diagram,
            mesh,
            #[cfg(feature = "spatial-index")]
            spatial_index,
        })
    }
}

impl<I> VoronoiMap<I> {
    /// Get the configuration used to generate this map
    #[inline]
    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    /// The underlying Voronoi diagram
    #[inline]
    pub fn diagram(&self) -> &SphericalVoronoi {
        &self.diagram
    }

    /// Render buffers for the whole map
    #[inline]
    pub fn mesh(&self) -> &MeshBuffers<I> {
        &self.mesh
    }

    /// Get the number of cells on this map
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.diagram.cell_count()
    }

    /// Get all cells as a slice
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        self.diagram.cells()
    }

    /// Get a cell by ID
    ///
    /// Returns `None` if the cell ID is out of bounds.
    #[inline]
    pub fn get_cell(&self, id: usize) -> Option<&Cell> {
        self.diagram.cells().get(id)
    }

    /// Where a cell's outline and fill live in the mesh's index buffer
    ///
    /// # Errors
    ///
    /// Returns `CellNotFound` if the ID is out of range
    pub fn cell_ranges(&self, id: usize) -> Result<&CellRanges> {
        self.mesh.cells.get(id).ok_or(VoronoiError::CellNotFound(id))
    }

    /// Get neighbor IDs for a cell, in boundary order
    ///
    /// Returns an empty vec if the cell ID is invalid.
    ///
    /// # Example
    ///
    /// ```
    /// # use sphere_voronoi::*;
    /// # let points = [Vec3::new(0.0, 0.0, 1.0), Vec3::new(0.9, 0.1, -0.3), Vec3::new(-0.4, 0.8, -0.3), Vec3::new(-0.5, -0.8, -0.3)];
    /// # let map: VoronoiMap = VoronoiMap::generate(&points, MapConfig::default()).unwrap();
    /// let neighbors = map.get_neighbors(0);
    /// assert_eq!(neighbors.len(), 3);
    /// ```
    pub fn get_neighbors(&self, cell_id: usize) -> Vec<usize> {
        self.get_cell(cell_id)
            .map(|cell| cell.neighbors().collect())
            .unwrap_or_default()
    }

    /// Find the cell containing a position (requires spatial-index feature)
    ///
    /// Only the direction of `position` matters. Returns `None` for an empty map.
    ///
    /// # Example
    ///
    /// ```
    /// # use sphere_voronoi::*;
    /// # #[cfg(feature = "spatial-index")]
    /// # {
    /// # let points = [Vec3::new(0.0, 0.0, 1.0), Vec3::new(0.9, 0.1, -0.3), Vec3::new(-0.4, 0.8, -0.3), Vec3::new(-0.5, -0.8, -0.3)];
    /// # let map: VoronoiMap = VoronoiMap::generate(&points, MapConfig::default()).unwrap();
    /// let cell_id = map.find_cell_at(Vec3::new(1.8, 0.2, -0.6));
    /// assert_eq!(cell_id, Some(1));
    /// # }
    /// ```
    #[cfg(feature = "spatial-index")]
    pub fn find_cell_at(&self, position: Vec3) -> Option<usize> {
        self.spatial_index.find_nearest(position)
    }

    /// Find cells within a given hop count from a center cell (BFS)
    ///
    /// # Arguments
    ///
    /// * `center_id` - Starting cell ID
    /// * `hops` - Maximum number of cell hops (0 = just the center cell)
    ///
    /// # Returns
    ///
    /// Cell IDs within range in breadth-first order, starting with the center cell.
    /// Returns an empty vec if center_id is invalid.
    pub fn find_cells_within_radius(&self, center_id: usize, hops: usize) -> Vec<usize> {
        if center_id >= self.cell_count() {
            return vec![];
        }

        let mut visited = HashSet::from([center_id]);
        let mut found = vec![center_id];
        let mut queue = VecDeque::from([(center_id, 0)]);

        while let Some((cell_id, distance)) = queue.pop_front() {
            if distance == hops {
                continue;
            }
            for neighbor in self.diagram.cells()[cell_id].neighbors() {
                if visited.insert(neighbor) {
                    found.push(neighbor);
                    queue.push_back((neighbor, distance + 1));
                }
            }
        }

        found
    }

    /// Take the diagram and mesh out of the map
    pub fn into_buffers(self) -> (SphericalVoronoi, MeshBuffers<I>) {
        (self.diagram, self.mesh)
    }
}
