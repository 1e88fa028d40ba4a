#![allow(dead_code)]

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sphere_voronoi::Vec3;
use std::f32::consts::PI;

/// Generate random points uniformly distributed on the unit sphere.
pub fn random_sphere_points(n: usize, seed: u64) -> Vec<Vec3> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            let z: f32 = rng.gen_range(-1.0..1.0);
            let theta: f32 = rng.gen_range(0.0..2.0 * PI);
            let r = (1.0 - z * z).sqrt();
            Vec3::new(r * theta.cos(), r * theta.sin(), z)
        })
        .collect()
}

/// Generate Fibonacci sphere points with tangential jitter.
///
/// `jitter` is a fraction of the average spacing between points.
pub fn fibonacci_sphere_points(n: usize, jitter: f32, seed: u64) -> Vec<Vec3> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let golden_angle = PI * (3.0 - 5.0f32.sqrt());
    let spacing = (4.0 * PI / n as f32).sqrt();

    (0..n)
        .map(|i| {
            let z = 1.0 - (2.0 * i as f32 + 1.0) / n as f32;
            let radius = (1.0 - z * z).sqrt();
            let theta = golden_angle * i as f32;
            let base = Vec3::new(radius * theta.cos(), radius * theta.sin(), z);

            let (tangent, bitangent) = base.any_orthonormal_pair();
            let angle: f32 = rng.gen_range(0.0..2.0 * PI);
            let magnitude: f32 = rng.gen_range(0.0..=jitter * spacing);

            (base + (tangent * angle.cos() + bitangent * angle.sin()) * magnitude).normalize()
        })
        .collect()
}

/// Vertices of a regular tetrahedron, turned so no two share a latitude.
pub fn rotated_tetrahedron() -> Vec<Vec3> {
    let rotation = glam::Quat::from_euler(glam::EulerRot::XYZ, 0.37, 1.21, -0.58);
    [
        Vec3::new(1.0, 1.0, 1.0),
        Vec3::new(1.0, -1.0, -1.0),
        Vec3::new(-1.0, 1.0, -1.0),
        Vec3::new(-1.0, -1.0, 1.0),
    ]
    .iter()
    .map(|&corner| rotation * corner.normalize())
    .collect()
}
