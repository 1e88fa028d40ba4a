//! Voronoi Map Configuration and Builder
//!
//! This module provides configuration types for deterministic mesh generation.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, VoronoiError};

/// Default seed for per-cell colors, so default maps are reproducible
pub const DEFAULT_COLOR_SEED: u64 = 1389;

/// Largest deviation from unit length a site may have under [`SitePolicy::Strict`]
pub const UNIT_LENGTH_TOLERANCE: f64 = 1e-4;

/// Mesh detail presets
///
/// Each preset maps to a tesselation resolution: the maximum length of any edge in
/// a cell's fill mesh, on the unit sphere.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum MeshDetail {
    /// Edges up to 0.2 units: a handful of triangles per cell on dense maps
    Coarse,
    /// Edges up to 0.08 units (default)
    #[default]
    Medium,
    /// Edges up to 0.03 units
    Fine,
    /// Custom maximum edge length
    Custom {
        /// Maximum mesh edge length, strictly positive
        resolution: f32,
    },
}

impl MeshDetail {
    /// Get the maximum mesh edge length for this preset
    pub fn resolution(self) -> f32 {
        match self {
            MeshDetail::Coarse => 0.2,
            MeshDetail::Medium => 0.08,
            MeshDetail::Fine => 0.03,
            MeshDetail::Custom { resolution } => resolution,
        }
    }

    /// Get a human-readable name for this preset
    pub fn name(self) -> &'static str {
        match self {
            MeshDetail::Coarse => "Coarse",
            MeshDetail::Medium => "Medium",
            MeshDetail::Fine => "Fine",
            MeshDetail::Custom { .. } => "Custom",
        }
    }
}

/// How site vectors that are not exactly unit length are treated
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SitePolicy {
    /// Rescale every site onto the unit sphere (default)
    #[default]
    Normalize,
    /// Reject sites whose length is off by more than [`UNIT_LENGTH_TOLERANCE`]
    Strict,
}

/// Configuration for deterministic Voronoi map generation
///
/// The same configuration and the same input points always produce byte-identical
/// mesh buffers.
///
/// # Example
///
/// ```rust
/// use sphere_voronoi::*;
///
/// let config = MapConfigBuilder::new()
///     .detail(MeshDetail::Fine)
///     .color_seed(7)
///     .build()
///     .unwrap();
///
/// // Config is serializable (with "serde" feature)
/// # #[cfg(feature = "serde")]
/// # {
/// let json = serde_json::to_string(&config).unwrap();
/// let restored: MapConfig = serde_json::from_str(&json).unwrap();
/// assert_eq!(config, restored);
/// # }
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapConfig {
    /// Mesh detail preset (determines the tesselation resolution)
    pub detail: MeshDetail,

    /// Seed for the per-cell random colors
    ///
    /// Colors only affect the vertex buffer, never the topology.
    pub color_seed: u64,

    /// Treatment of non-unit site vectors
    pub site_policy: SitePolicy,

    /// Override the resolution from the detail preset
    pub resolution_override: Option<f32>,
}

impl MapConfig {
    /// Get the tesselation resolution for this configuration
    ///
    /// Returns the resolution_override if set, otherwise the detail preset's value.
    #[inline]
    pub fn resolution(&self) -> f32 {
        self.resolution_override
            .unwrap_or_else(|| self.detail.resolution())
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            detail: MeshDetail::default(),
            color_seed: DEFAULT_COLOR_SEED,
            site_policy: SitePolicy::default(),
            resolution_override: None,
        }
    }
}

/// Builder for creating MapConfig with validation
///
/// # Example
///
/// ```rust
/// use sphere_voronoi::*;
///
/// // Use defaults
/// let config = MapConfigBuilder::new().build().unwrap();
/// assert_eq!(config.color_seed, DEFAULT_COLOR_SEED);
///
/// // Customize
/// let config = MapConfigBuilder::new()
///     .detail(MeshDetail::Coarse)
///     .site_policy(SitePolicy::Strict)
///     .resolution_override(0.15)
///     .unwrap()
///     .build()
///     .unwrap();
/// assert_eq!(config.resolution(), 0.15);
/// ```
#[derive(Debug, Clone)]
pub struct MapConfigBuilder {
    detail: MeshDetail,
    color_seed: u64,
    site_policy: SitePolicy,
    resolution_override: Option<f32>,
}

impl MapConfigBuilder {
    /// Create a new builder with default values
    ///
    /// Defaults:
    /// - detail: Medium
    /// - color_seed: [`DEFAULT_COLOR_SEED`]
    /// - site_policy: Normalize
    /// - resolution_override: None
    pub fn new() -> Self {
        let defaults = MapConfig::default();
        Self {
            detail: defaults.detail,
            color_seed: defaults.color_seed,
            site_policy: defaults.site_policy,
            resolution_override: defaults.resolution_override,
        }
    }

    /// Set the mesh detail preset
    pub fn detail(mut self, detail: MeshDetail) -> Self {
        self.detail = detail;
        self
    }

    /// Set the seed for per-cell colors
    pub fn color_seed(mut self, seed: u64) -> Self {
        self.color_seed = seed;
        self
    }

    /// Set how non-unit site vectors are treated
    pub fn site_policy(mut self, policy: SitePolicy) -> Self {
        self.site_policy = policy;
        self
    }

    /// Override the tesselation resolution
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the resolution is not a positive finite number
    pub fn resolution_override(mut self, resolution: f32) -> Result<Self> {
        check_resolution(resolution)?;
        self.resolution_override = Some(resolution);
        Ok(self)
    }

    /// Build the configuration
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if a custom detail preset carries an unusable
    /// resolution
    pub fn build(self) -> Result<MapConfig> {
        check_resolution(self.detail.resolution())?;

        Ok(MapConfig {
            detail: self.detail,
            color_seed: self.color_seed,
            site_policy: self.site_policy,
            resolution_override: self.resolution_override,
        })
    }
}

impl Default for MapConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Reject resolutions that are not a positive finite number
pub(crate) fn check_resolution(resolution: f32) -> Result<()> {
    if !(resolution.is_finite() && resolution > 0.0) {
        return Err(VoronoiError::InvalidConfig(format!(
            "Resolution must be positive and finite (got {})",
            resolution
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mesh_detail_resolutions() {
        assert_eq!(MeshDetail::Coarse.resolution(), 0.2);
        assert_eq!(MeshDetail::Medium.resolution(), 0.08);
        assert_eq!(MeshDetail::Fine.resolution(), 0.03);
        assert!(MeshDetail::Fine.resolution() < MeshDetail::Coarse.resolution());
    }

    #[test]
    fn test_mesh_detail_custom() {
        let custom = MeshDetail::Custom { resolution: 0.5 };
        assert_eq!(custom.resolution(), 0.5);
        assert_eq!(custom.name(), "Custom");
    }

    #[test]
    fn test_builder_defaults() {
        let config = MapConfigBuilder::new().build().unwrap();
        assert_eq!(config, MapConfig::default());
        assert_eq!(config.detail, MeshDetail::Medium);
        assert_eq!(config.color_seed, DEFAULT_COLOR_SEED);
        assert_eq!(config.site_policy, SitePolicy::Normalize);
        assert_eq!(config.resolution(), 0.08);
    }

    #[test]
    fn test_builder_custom() {
        let config = MapConfigBuilder::new()
            .detail(MeshDetail::Coarse)
            .color_seed(99)
            .site_policy(SitePolicy::Strict)
            .build()
            .unwrap();

        assert_eq!(config.detail, MeshDetail::Coarse);
        assert_eq!(config.color_seed, 99);
        assert_eq!(config.site_policy, SitePolicy::Strict);
    }

    #[test]
    fn test_resolution_override() {
        let config = MapConfigBuilder::new()
            .detail(MeshDetail::Fine)
            .resolution_override(0.25)
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(config.resolution(), 0.25);
    }

    #[test]
    fn test_validation() {
        assert!(MapConfigBuilder::new().resolution_override(0.0).is_err());
        assert!(MapConfigBuilder::new().resolution_override(-1.0).is_err());
        assert!(MapConfigBuilder::new().resolution_override(f32::NAN).is_err());
        assert!(MapConfigBuilder::new()
            .resolution_override(f32::INFINITY)
            .is_err());

        let result = MapConfigBuilder::new()
            .detail(MeshDetail::Custom { resolution: 0.0 })
            .build();
        assert!(matches!(result, Err(VoronoiError::InvalidConfig(_))));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_round_trip() {
        let config = MapConfigBuilder::new()
            .detail(MeshDetail::Custom { resolution: 0.12 })
            .color_seed(5)
            .build()
            .unwrap();

        let json = serde_json::to_string(&config).unwrap();
        let restored: MapConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, restored);
    }
}
