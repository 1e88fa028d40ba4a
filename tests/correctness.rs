//! Geometric and topological correctness of generated diagrams.
//!
//! These tests verify invariants that hold for any valid spherical Voronoi
//! diagram of points in general position.

mod support;

use sphere_voronoi::{SitePolicy, SphericalVoronoi, Vec3, VoronoiError};
use support::points::{fibonacci_sphere_points, random_sphere_points, rotated_tetrahedron};

fn diagrams() -> Vec<(String, SphericalVoronoi)> {
    [
        ("fibonacci 200", fibonacci_sphere_points(200, 0.3, 11)),
        ("fibonacci 1000", fibonacci_sphere_points(1000, 0.4, 12345)),
        ("random 50", random_sphere_points(50, 3)),
        ("random 600", random_sphere_points(600, 777)),
    ]
    .into_iter()
    .map(|(name, points)| (name.to_string(), SphericalVoronoi::generate(&points).unwrap()))
    .collect()
}

/// Cells meeting at each vertex
fn vertex_cells(diagram: &SphericalVoronoi) -> Vec<Vec<usize>> {
    let mut incident = vec![Vec::new(); diagram.vertex_count()];
    for cell in diagram.cells() {
        for vertex in cell.vertex_indices() {
            incident[vertex].push(cell.id);
        }
    }
    incident
}

#[test]
fn test_cell_count_equals_input() {
    for n in [4, 10, 100, 500] {
        let points = fibonacci_sphere_points(n, 0.2, 42);
        let diagram = SphericalVoronoi::generate(&points).unwrap();
        assert_eq!(diagram.cell_count(), n);
        for (id, cell) in diagram.cells().iter().enumerate() {
            assert_eq!(cell.id, id);
            assert!(cell.center.distance(points[id]) < 1e-6);
        }
    }
}

#[test]
fn test_euler_characteristic() {
    for (name, diagram) in diagrams() {
        let v = diagram.vertex_count() as i64;
        let e = diagram.edge_count() as i64;
        let f = diagram.cell_count() as i64;
        assert_eq!(v - e + f, 2, "{name}: V={v} E={e} F={f}");
    }
}

#[test]
fn test_vertex_degree() {
    // every vertex is shared by exactly three cells
    for (name, diagram) in diagrams() {
        let degree_sum: usize = diagram.cells().iter().map(|cell| cell.edge_count()).sum();
        assert_eq!(degree_sum, 3 * diagram.vertex_count(), "{name}");

        for (vertex, cells) in vertex_cells(&diagram).iter().enumerate() {
            assert_eq!(cells.len(), 3, "{name}: vertex {vertex} has cells {cells:?}");
        }
    }
}

#[test]
fn test_vertices_on_unit_sphere() {
    for (name, diagram) in diagrams() {
        for (i, vertex) in diagram.vertices().iter().enumerate() {
            assert!(
                (vertex.length() - 1.0).abs() < 1e-5,
                "{name}: vertex {i} has length {}",
                vertex.length()
            );
        }
    }
}

#[test]
fn test_divergent_and_twin_consistency() {
    for (name, diagram) in diagrams() {
        let cells = diagram.cells();
        for cell in cells {
            assert!(cell.edge_count() >= 3, "{name}: cell {} is open", cell.id);
            for (index, edge) in cell.edges.iter().enumerate() {
                // the divergent edge leaves the same vertex in the neighbor
                let divergent = cells[edge.neighbor].edges[edge.divergent];
                assert_eq!(divergent.vertex, edge.vertex, "{name}: cell {} edge {index}", cell.id);

                // the twin separates the same pair of cells, running the other way
                let (neighbor, twin) = diagram.twin(cell.id, index).unwrap();
                let twin = cells[neighbor].edges[twin];
                let next = cell.edges[(index + 1) % cell.edge_count()];
                assert_eq!(twin.neighbor, cell.id, "{name}");
                assert_eq!(twin.vertex, next.vertex, "{name}");
                assert!(cells[neighbor].is_neighbor_of(cell.id));
            }
        }
    }
}

#[test]
fn test_boundaries_counter_clockwise() {
    for (name, diagram) in diagrams() {
        let vertices = diagram.vertices();
        for cell in diagram.cells() {
            let center = cell.center;
            let mut signed_area = 0.0;
            for (index, edge) in cell.edges.iter().enumerate() {
                let next = cell.edges[(index + 1) % cell.edge_count()];
                let a = vertices[edge.vertex] - center;
                let b = vertices[next.vertex] - center;
                let turn = a.cross(b).dot(center);
                assert!(turn > 0.0, "{name}: cell {} turns clockwise at edge {index}", cell.id);
                signed_area += turn * 0.5;
            }
            assert!(signed_area > 0.0);
            assert!(cell.approximate_area(vertices) >= signed_area - 1e-6);
        }
    }
}

#[test]
fn test_vertices_equidistant_and_empty() {
    for (name, diagram) in diagrams() {
        let centers: Vec<Vec3> = diagram.cells().iter().map(|cell| cell.center).collect();

        for (vertex, cells) in vertex_cells(&diagram).iter().enumerate() {
            let position = diagram.vertices()[vertex];
            let similarities: Vec<f32> = cells.iter().map(|&id| position.dot(centers[id])).collect();
            let nearest = similarities.iter().copied().fold(f32::MIN, f32::max);

            for similarity in &similarities {
                assert!(
                    (similarity - nearest).abs() < 1e-4,
                    "{name}: vertex {vertex} is not equidistant from {cells:?}"
                );
            }

            // no site is closer than the three that define the vertex
            for (id, center) in centers.iter().enumerate() {
                assert!(
                    position.dot(*center) <= nearest + 1e-4,
                    "{name}: site {id} lies inside the circle of vertex {vertex}"
                );
            }
        }
    }
}

#[test]
fn test_neighbors_are_symmetric() {
    for (name, diagram) in diagrams() {
        for cell in diagram.cells() {
            for neighbor in cell.neighbors() {
                assert_ne!(neighbor, cell.id, "{name}");
                assert!(diagram.cells()[neighbor].is_neighbor_of(cell.id), "{name}");
            }
        }
    }
}

#[test]
fn test_tetrahedron() {
    let sites = rotated_tetrahedron();
    let diagram = SphericalVoronoi::generate(&sites).unwrap();

    assert_eq!(diagram.cell_count(), 4);
    assert_eq!(diagram.vertex_count(), 4);
    assert_eq!(diagram.edge_count(), 6);

    // the diagram of a regular tetrahedron is the dual tetrahedron
    for vertex in diagram.vertices() {
        let closest = sites
            .iter()
            .map(|site| vertex.distance(-*site))
            .fold(f32::MAX, f32::min);
        assert!(closest < 1e-4, "vertex {vertex:?} is not opposite a site");
    }
    for cell in diagram.cells() {
        assert_eq!(cell.edge_count(), 3);
        let mut neighbors: Vec<usize> = cell.neighbors().collect();
        neighbors.sort();
        let expected: Vec<usize> = (0..4).filter(|&id| id != cell.id).collect();
        assert_eq!(neighbors, expected);
    }
}

#[test]
fn test_three_sites() {
    let sites = [
        Vec3::new(0.0, 0.3, 1.0),
        Vec3::new(0.8, -0.2, 0.1),
        Vec3::new(-0.6, -0.5, -0.4),
    ];
    let diagram = SphericalVoronoi::generate(&sites).unwrap();

    // two vertices at the poles of the sites' plane
    assert_eq!(diagram.vertex_count(), 2);
    assert_eq!(diagram.edge_count(), 3);
    let [a, b, c] = sites.map(Vec3::normalize);
    let normal = (b - a).cross(c - a).normalize();
    for vertex in diagram.vertices() {
        assert!(vertex.dot(normal).abs() > 1.0 - 1e-4);
    }
    for cell in diagram.cells() {
        assert_eq!(cell.edge_count(), 2);
    }
}

#[test]
fn test_trivial_inputs() {
    let empty = SphericalVoronoi::generate(&[]).unwrap();
    assert_eq!(empty.cell_count(), 0);
    assert_eq!(empty.vertex_count(), 0);

    let single = SphericalVoronoi::generate(&[Vec3::new(0.3, -0.4, 0.2)]).unwrap();
    assert_eq!(single.cell_count(), 1);
    assert_eq!(single.vertex_count(), 0);
    assert!(single.cells()[0].edges.is_empty());

    let antipodal = SphericalVoronoi::generate(&[Vec3::Z, -Vec3::Z]).unwrap();
    assert_eq!(antipodal.cell_count(), 2);
    assert_eq!(antipodal.vertex_count(), 0);
    assert!(antipodal.cells().iter().all(|cell| cell.edges.is_empty()));
}

/// Closed cells, Euler characteristic and empty circumcircles
fn assert_valid(name: &str, diagram: &SphericalVoronoi) {
    let v = diagram.vertex_count() as i64;
    let e = diagram.edge_count() as i64;
    let f = diagram.cell_count() as i64;
    assert_eq!(v - e + f, 2, "{name}: V={v} E={e} F={f}");

    for cell in diagram.cells() {
        assert!(cell.edge_count() >= 3, "{name}: cell {} has {} edges", cell.id, cell.edge_count());
    }

    for (vertex, cells) in vertex_cells(diagram).iter().enumerate() {
        let position = diagram.vertices()[vertex];
        let nearest = position.dot(diagram.cells()[cells[0]].center);
        for cell in diagram.cells() {
            assert!(
                position.dot(cell.center) <= nearest + 1e-4,
                "{name}: site {} lies inside the circle of vertex {vertex}",
                cell.id
            );
        }
    }
}

#[test]
fn test_sites_at_the_poles() {
    for seed in 0..20 {
        let mut points = random_sphere_points(50, 3000 + seed);
        points[5] = -Vec3::Z;
        let diagram = SphericalVoronoi::generate(&points).unwrap();
        assert_valid(&format!("south pole, seed {seed}"), &diagram);

        points[1] = Vec3::Z;
        let diagram = SphericalVoronoi::generate(&points).unwrap();
        assert_valid(&format!("both poles, seed {seed}"), &diagram);
    }

    // axis-aligned sites mixed into random ones
    let mut points = vec![Vec3::X, -Vec3::Y, Vec3::Z, -Vec3::Z];
    points.extend(random_sphere_points(20, 41));
    let diagram = SphericalVoronoi::generate(&points).unwrap();
    assert_valid("axis sites", &diagram);
}

#[test]
fn test_determinism() {
    let points = random_sphere_points(300, 5);
    let first = SphericalVoronoi::generate(&points).unwrap();
    let second = SphericalVoronoi::generate(&points).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_input_validation() {
    let mut points = random_sphere_points(10, 1);

    points[4] = Vec3::new(0.0, f32::INFINITY, 0.0);
    assert_eq!(
        SphericalVoronoi::generate(&points),
        Err(VoronoiError::InvalidSite { index: 4 })
    );

    points[4] = Vec3::ZERO;
    assert_eq!(
        SphericalVoronoi::generate(&points),
        Err(VoronoiError::InvalidSite { index: 4 })
    );

    points[4] = points[7] * 2.0;
    assert_eq!(
        SphericalVoronoi::generate(&points),
        Err(VoronoiError::CoincidentSites { first: 4, second: 7 })
    );
    assert!(matches!(
        SphericalVoronoi::generate_with_policy(&points, SitePolicy::Strict),
        Err(VoronoiError::NotNormalized { index: 4, .. })
    ));
}
