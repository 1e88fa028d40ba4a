//! Adaptive tesselation of cell fans
//!
//! A cell is filled as a fan of triangles around its center. Every fan triangle is
//! cut into strips by *bridges*: segments from the ray with more subdivision points
//! to the ray with fewer. Each strip is then zipped into triangles, always taking
//! the shorter diagonal. No edge of the result is much longer than the requested
//! resolution, and the triangles sharing a boundary ray agree on its points, so the
//! fill is watertight.
//!
//! Synthesized points are placed by linear interpolation between existing points,
//! so they lie slightly inside the sphere. At mesh resolutions that is invisible.

use glam::Vec3;

/// Index lists produced by [`tesselate`], local to the point buffer it was given
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tesselation {
    /// Triangle list, counter-clockwise as seen from outside
    pub fill: Vec<usize>,
    /// Subdivided boundary loop, counter-clockwise, without repeating its start
    pub outline: Vec<usize>,
    /// Offsets into `outline` where each unsubdivided boundary edge begins
    pub segments: Vec<usize>,
}

impl Tesselation {
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.fill.len() / 3
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fill.is_empty() && self.outline.is_empty()
    }
}

/// Tesselate a fan of points
///
/// `points[0]` is the fan's center and `points[1..]` its boundary, counter-clockwise
/// and implicitly closed. Points created by subdivision are appended to `points`.
/// A fan with fewer than three boundary points has no interior and produces an
/// empty [`Tesselation`].
///
/// # Arguments
///
/// * `points` - Fan center followed by its boundary
/// * `resolution` - Maximum edge length, strictly positive
///
/// # Example
///
/// ```rust
/// use sphere_voronoi::{tesselate, Vec3};
///
/// let mut points = vec![
///     Vec3::new(0.0, 0.0, 1.0),
///     Vec3::new(0.3, 0.0, 1.0),
///     Vec3::new(0.0, 0.3, 1.0),
///     Vec3::new(-0.3, 0.0, 1.0),
///     Vec3::new(0.0, -0.3, 1.0),
/// ];
/// let tesselation = tesselate(&mut points, 0.1);
///
/// assert_eq!(tesselation.segments, vec![0, 5, 10, 15]);
/// assert!(points.len() > 5);
/// ```
pub fn tesselate(points: &mut Vec<Vec3>, resolution: f32) -> Tesselation {
    let Some(boundary) = points.len().checked_sub(1) else {
        return Tesselation::default();
    };
    if boundary < 3 {
        return Tesselation::default();
    }

    let rays: Vec<Vec<usize>> = (1..=boundary)
        .map(|vertex| subdivide(points, 0, vertex, resolution))
        .collect();
    let edges: Vec<Vec<usize>> = (1..=boundary)
        .map(|vertex| subdivide(points, vertex, vertex % boundary + 1, resolution))
        .collect();

    let mut tesselation = Tesselation::default();
    for (i, edge) in edges.iter().enumerate() {
        tesselation.segments.push(tesselation.outline.len());
        tesselation.outline.extend_from_slice(&edge[..edge.len() - 1]);

        let next = (i + 1) % boundary;
        bridge_triangle(points, &rays[i], &rays[next], edge, resolution, &mut tesselation.fill);
    }

    tesselation
}

/// Tesselate the single triangle `a`, `b`, `c` of `points`
///
/// The triangle must be counter-clockwise; the outline runs `a`, `b`, `c` and the
/// segments mark where each of the three sides begins.
pub fn tesselate_triangle(points: &mut Vec<Vec3>, [a, b, c]: [usize; 3], resolution: f32) -> Tesselation {
    let ab = subdivide(points, a, b, resolution);
    let ac = subdivide(points, a, c, resolution);
    let bc = subdivide(points, b, c, resolution);

    let mut tesselation = Tesselation::default();
    bridge_triangle(points, &ab, &ac, &bc, resolution, &mut tesselation.fill);

    tesselation.segments.push(0);
    tesselation.outline.extend_from_slice(&ab[..ab.len() - 1]);
    tesselation.segments.push(tesselation.outline.len());
    tesselation.outline.extend_from_slice(&bc[..bc.len() - 1]);
    tesselation.segments.push(tesselation.outline.len());
    tesselation.outline.extend(ac[1..].iter().rev());

    tesselation
}

/// Split the segment `a`-`b` into pieces no longer than `resolution`
///
/// Returns the indices of all points along the segment, `a` and `b` included.
/// Interior points are appended to `points`.
fn subdivide(points: &mut Vec<Vec3>, a: usize, b: usize, resolution: f32) -> Vec<usize> {
    let (start, end) = (points[a], points[b]);
    let count = ((start.distance(end) / resolution).ceil() as usize).max(1);

    let mut indices = Vec::with_capacity(count + 1);
    indices.push(a);
    for step in 1..count {
        indices.push(points.len());
        points.push(start.lerp(end, step as f32 / count as f32));
    }
    indices.push(b);
    indices
}

/// Point on a ray of `to` segments that step `i` of a ray of `from` segments
/// bridges to
///
/// Rounds to the nearest step and never returns the apex (`0`).
#[inline]
fn bridge(i: usize, from: usize, to: usize) -> usize {
    ((2 * i * to + from) / (2 * from)).clamp(1, to)
}

/// Mesh the triangle spanned by two rays from a shared apex and the edge between
/// their far ends
///
/// `left` and `right` run from the apex outwards, and `base` runs from the end of
/// `left` to the end of `right`. The triangle apex, left end, right end must be
/// counter-clockwise.
fn bridge_triangle(
    points: &mut Vec<Vec3>,
    left: &[usize],
    right: &[usize],
    base: &[usize],
    resolution: f32,
    fill: &mut Vec<usize>,
) {
    // bridges start on the denser ray, so no two land on the same far point
    let (far, near, open, flip) = if left.len() >= right.len() {
        (left, right, base.to_vec(), true)
    } else {
        let reversed: Vec<usize> = base.iter().rev().copied().collect();
        (right, left, reversed, false)
    };

    let m = far.len() - 1;
    let n = near.len() - 1;

    let mut previous = vec![far[0]];
    let mut previous_target = 0;
    for k in 1..=m {
        let target = bridge(k, m, n);
        let current = if k == m {
            open.clone()
        } else {
            subdivide(points, far[k], near[target], resolution)
        };

        let mut rail = previous;
        rail.extend_from_slice(&near[previous_target + 1..=target]);
        zip(points, &rail, &current, flip, fill);

        previous = current;
        previous_target = target;
    }
}

/// Triangulate the strip between two chains of points
///
/// Both chains start on the same side of the strip. When they end on the same
/// point the strip is closed there, otherwise the gap between their ends is the
/// strip's last rung. Each step advances the chain whose next point gives the
/// shorter diagonal.
fn zip(points: &[Vec3], p: &[usize], q: &[usize], flip: bool, fill: &mut Vec<usize>) {
    let (p_last, q_last) = (p.len() - 1, q.len() - 1);
    let closed = p[p_last] == q[q_last];

    let (mut i, mut j) = (0, 0);
    while i < p_last || j < q_last {
        let advance_p = if i == p_last {
            false
        } else if j == q_last {
            true
        } else if closed && i + 1 == p_last && j + 1 < q_last {
            // stepping onto the shared end early would leave a flat fan behind
            false
        } else if closed && j + 1 == q_last && i + 1 < p_last {
            true
        } else {
            let p_step = points[p[i + 1]].distance_squared(points[q[j]]);
            let q_step = points[p[i]].distance_squared(points[q[j + 1]]);
            p_step <= q_step
        };

        let triangle = if advance_p {
            i += 1;
            [p[i - 1], p[i], q[j]]
        } else {
            j += 1;
            [p[i], q[j], q[j - 1]]
        };

        let [a, b, c] = triangle;
        if a == b || b == c || a == c {
            continue;
        }
        if flip {
            fill.extend_from_slice(&[a, c, b]);
        } else {
            fill.extend_from_slice(&[a, b, c]);
        }
    }
}
