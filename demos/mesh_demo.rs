//! Demonstration of diagram and mesh generation

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sphere_voronoi::*;

/// Random points on the unit sphere
fn sphere_points(count: usize, seed: u64) -> Vec<Vec3> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let z: f32 = rng.gen_range(-1.0..1.0);
            let angle: f32 = rng.gen_range(0.0..std::f32::consts::TAU);
            let radius = (1.0 - z * z).sqrt();
            Vec3::new(radius * angle.cos(), radius * angle.sin(), z)
        })
        .collect()
}

fn main() -> Result<()> {
    println!("Generating diagram...");

    let points = sphere_points(2000, 42);
    let config = MapConfigBuilder::new()
        .detail(MeshDetail::Medium)
        .color_seed(42)
        .build()?;

    let map: VoronoiMap = VoronoiMap::generate(&points, config)?;
    let diagram = map.diagram();
    println!(
        "Generated {} cells, {} vertices, {} edges",
        diagram.cell_count(),
        diagram.vertex_count(),
        diagram.edge_count()
    );

    let mesh = map.mesh();
    println!("\nMesh statistics:");
    println!("  Vertices: {}", mesh.vertex_count());
    println!("  Triangles: {}", mesh.triangle_count());
    println!("  Outline indices: {}", mesh.outlines().len());

    // Memory estimate
    let mem_vertices = mesh.vertex_data.len() * 4;
    let mem_indices = mesh.indices.len() * 4;
    let total = mem_vertices + mem_indices;
    println!("\nMemory usage:");
    println!("  Vertex data: {} bytes", mem_vertices);
    println!("  Indices: {} bytes", mem_indices);
    println!("  Total: {} bytes ({:.2} MB)", total, total as f32 / 1024.0 / 1024.0);

    // Custom colors from a closure
    let banded = |cell: &Cell| -> CellColor {
        if cell.center.z > 0.0 {
            [0.9, 0.6, 0.2]
        } else {
            [0.2, 0.4, 0.8]
        }
    };
    let custom: VoronoiMap = VoronoiMap::generate_with_colors(&points, config, &banded)?;
    println!("\nCustom color mapper: {} vertices", custom.mesh().vertex_count());

    #[cfg(feature = "spatial-index")]
    {
        let position = Vec3::new(0.3, -0.5, 0.8);
        if let Some(cell_id) = map.find_cell_at(position) {
            let nearby = map.find_cells_within_radius(cell_id, 2);
            println!("Position {:?} -> cell {} ({} cells within 2 hops)", position, cell_id, nearby.len());
        }
    }

    // Test all detail presets
    println!("\n=== Testing all detail presets ===");
    for detail in [MeshDetail::Coarse, MeshDetail::Medium, MeshDetail::Fine] {
        let config = MapConfigBuilder::new().detail(detail).build()?;
        let map: VoronoiMap = VoronoiMap::generate(&points, config)?;
        let mesh = map.mesh();

        let mem = mesh.vertex_data.len() * 4 + mesh.indices.len() * 4;
        println!(
            "{}: {} vertices, {} triangles, {:.2} MB",
            detail.name(),
            mesh.vertex_count(),
            mesh.triangle_count(),
            mem as f32 / 1024.0 / 1024.0
        );
    }

    Ok(())
}
