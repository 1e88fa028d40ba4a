//! Spherical Voronoi diagrams with render-ready meshes
//!
//! Computes the Voronoi diagram of points on the unit sphere with Fortune's sweep
//! and turns every cell into a flat-shaded, adaptively subdivided triangle fan,
//! suitable for use with any game engine (Bevy, Godot, etc.)
//!
//! # Quick Start
//!
//! ```rust
//! use sphere_voronoi::*;
//!
//! let points = [
//!     Vec3::new(0.0, 0.0, 1.0),
//!     Vec3::new(0.9, 0.1, -0.3),
//!     Vec3::new(-0.4, 0.8, -0.3),
//!     Vec3::new(-0.5, -0.8, -0.3),
//!     Vec3::new(0.2, -0.1, -1.0),
//! ];
//!
//! let config = MapConfigBuilder::new()
//!     .detail(MeshDetail::Coarse)
//!     .color_seed(42)
//!     .build().unwrap();
//!
//! let map: VoronoiMap = VoronoiMap::generate(&points, config).unwrap();
//!
//! // Upload these to the GPU
//! let mesh = map.mesh();
//! println!("Generated {} triangles", mesh.triangle_count());
//! ```
//!
//! The diagram alone is available through [`SphericalVoronoi::generate`], and the
//! mesh through [`assemble_mesh`].
//!
//! # Features
//!
//! - `spatial-index` (default): Enables O(log n) position-to-cell lookups using KD-tree
//! - `serde`: Enables serialization support for configuration, cells and diagrams

// Modules
pub mod error;
pub mod config;
pub mod cell;
pub mod tree;
pub mod sphere;
pub mod voronoi;
pub mod tesselate;
pub mod mesh;
pub mod map;

#[cfg(feature = "spatial-index")]
pub mod spatial;

// Re-export core types for convenience
pub use error::{VoronoiError, Result};
pub use config::{MapConfig, MapConfigBuilder, MeshDetail, SitePolicy, DEFAULT_COLOR_SEED};
pub use cell::{Cell, Edge};
pub use tree::{NodeKey, OrderedTree};
pub use voronoi::SphericalVoronoi;
pub use tesselate::{tesselate, tesselate_triangle, Tesselation};
pub use mesh::{
    assemble_mesh, CellColor, CellColorMapper, CellRanges, MeshBuffers, PositionColorMapper,
    RandomColorMapper, UniformColorMapper, FLOATS_PER_VERTEX, OUTLINE_PADDING,
};
pub use map::VoronoiMap;

#[cfg(feature = "spatial-index")]
pub use spatial::SpatialIndex;

// Re-export glam::Vec3 for convenience
pub use glam::Vec3;
