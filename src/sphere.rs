//! Spherical coordinate helpers for the sweep
//!
//! The sweep circle expands from the north pole (+Z). Colatitude `theta` plays the
//! role of the sweep line's position and longitude `phi` is the circular dimension
//! the beach line is ordered by.

use glam::DVec3;
use std::f64::consts::TAU;

/// A point on the unit sphere in colatitude/longitude form
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spherical {
    /// Angle from the +Z pole, in `[0, π]`
    pub theta: f64,
    /// Angle around the +Z axis, in `(-π, π]`
    pub phi: f64,
}

impl Spherical {
    /// Convert a unit vector to spherical coordinates
    pub fn from_cartesian(point: DVec3) -> Self {
        Self {
            theta: point.z.clamp(-1.0, 1.0).acos(),
            phi: point.y.atan2(point.x),
        }
    }

    /// Convert back to a unit vector
    pub fn to_cartesian(self) -> DVec3 {
        let (sin_theta, cos_theta) = self.theta.sin_cos();
        let (sin_phi, cos_phi) = self.phi.sin_cos();
        DVec3::new(sin_theta * cos_phi, sin_theta * sin_phi, cos_theta)
    }
}

/// Reduce an angle into `[0, 2π)`
///
/// The result is periodic in `2π`, and both `0` and `2π` map to `0`.
#[inline]
pub fn wrap_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid of a tiny negative angle rounds up to exactly TAU
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Longitude where the arcs of `p1` (on the left) and `p2` (on the right) meet
/// when the sweep circle is at colatitude `xi`
///
/// A site sitting exactly on the sweep circle has a zero-width arc, so the meeting
/// point is that site's own longitude. The result is not wrapped and can fall
/// anywhere in roughly `[-3π/2, 7π/2]`.
pub fn arc_intersection(p1: Spherical, p2: Spherical, xi: f64) -> f64 {
    if p1.theta >= xi {
        return if p2.theta >= xi { 0.0 } else { p1.phi };
    }
    if p2.theta >= xi {
        return p2.phi;
    }

    // rotate so that p1 sits at longitude 0
    let dphi = p2.phi - p1.phi;
    let (sin_dphi, cos_dphi) = dphi.sin_cos();
    let (sin_xi, cos_xi) = xi.sin_cos();
    let (sin_t1, cos_t1) = p1.theta.sin_cos();
    let (sin_t2, cos_t2) = p2.theta.sin_cos();

    let a = (cos_xi - cos_t2) * sin_t1 - (cos_xi - cos_t1) * sin_t2 * cos_dphi;
    let b = -(cos_xi - cos_t1) * sin_t2 * sin_dphi;
    let c = (cos_t1 - cos_t2) * sin_xi;

    let length = a.hypot(b);
    if length == 0.0 {
        return p1.phi;
    }

    // plain atan loses the quadrant
    (c / length).clamp(-1.0, 1.0).asin() - a.atan2(b) + p1.phi
}

/// Center of the circle through three sites, on the side where they run
/// clockwise when seen from outside
///
/// Returns `None` when the sites are coincident or otherwise span no circle.
pub fn circumcenter(predecessor: DVec3, middle: DVec3, successor: DVec3) -> Option<DVec3> {
    (predecessor - middle)
        .cross(successor - middle)
        .try_normalize()
}

/// Colatitude at which the sweep circle reaches the far side of the circle
/// centered at `center` through `site`
///
/// This is the sum of the center's colatitude and the circle's angular radius.
pub fn circle_priority(center: DVec3, site: DVec3) -> f64 {
    center.z.clamp(-1.0, 1.0).acos() + center.dot(site).clamp(-1.0, 1.0).acos()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_wrap_angle_boundaries() {
        assert_eq!(wrap_angle(0.0), 0.0);
        assert_eq!(wrap_angle(TAU), 0.0);
        assert_eq!(wrap_angle(-TAU), 0.0);
        assert_eq!(wrap_angle(-1e-18), 0.0);
        assert_relative_eq!(wrap_angle(-FRAC_PI_2), 3.0 * FRAC_PI_2);
        assert_relative_eq!(wrap_angle(3.0 * PI), PI);
    }

    #[test]
    fn test_spherical_round_trip() {
        let point = DVec3::new(0.3, -0.5, 0.7).normalize();
        let spherical = Spherical::from_cartesian(point);
        assert!(spherical.theta >= 0.0 && spherical.theta <= PI);
        let back = spherical.to_cartesian();
        assert_relative_eq!(back.x, point.x, epsilon = 1e-12);
        assert_relative_eq!(back.y, point.y, epsilon = 1e-12);
        assert_relative_eq!(back.z, point.z, epsilon = 1e-12);
    }

    #[test]
    fn test_degenerate_arcs() {
        let on_circle = Spherical { theta: 1.0, phi: 0.4 };
        let above = Spherical { theta: 0.5, phi: -2.0 };

        assert_eq!(arc_intersection(on_circle, above, 1.0), 0.4);
        assert_eq!(arc_intersection(above, on_circle, 1.0), 0.4);
        assert_eq!(arc_intersection(on_circle, on_circle, 1.0), 0.0);
    }

    #[test]
    fn test_arc_intersection_is_equidistant() {
        let p1 = Spherical { theta: 0.6, phi: 0.2 };
        let p2 = Spherical { theta: 0.9, phi: 1.4 };
        let xi = 1.3;

        // the breakpoint lies on the beach line, equidistant from both sites
        // and from the sweep circle
        let phi = arc_intersection(p1, p2, xi);
        let a = p1.to_cartesian();
        let b = p2.to_cartesian();
        let (mut lo, mut hi) = (0.0, xi);
        for _ in 0..200 {
            let mid = 0.5 * (lo + hi);
            let q = Spherical { theta: mid, phi }.to_cartesian();
            let to_site = q.dot(a).clamp(-1.0, 1.0).acos();
            if to_site < xi - mid {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        let q = Spherical { theta: lo, phi }.to_cartesian();
        assert_relative_eq!(
            q.dot(a).clamp(-1.0, 1.0).acos(),
            q.dot(b).clamp(-1.0, 1.0).acos(),
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_circumcenter() {
        let a = DVec3::X;
        let b = DVec3::Y;
        let c = DVec3::Z;
        let center = circumcenter(a, b, c).unwrap();
        assert_relative_eq!(center.dot(a), center.dot(b), epsilon = 1e-12);
        assert_relative_eq!(center.dot(b), center.dot(c), epsilon = 1e-12);

        // reversing the orientation picks the antipodal center
        let flipped = circumcenter(c, b, a).unwrap();
        assert_relative_eq!((center + flipped).length(), 0.0, epsilon = 1e-12);

        assert_eq!(circumcenter(a, a, c), None);
    }

    #[test]
    fn test_circle_priority() {
        // circle around the pole with angular radius π/4 is fully swept at π/4
        let center = DVec3::Z;
        let site = Spherical { theta: PI / 4.0, phi: 1.0 }.to_cartesian();
        assert_relative_eq!(circle_priority(center, site), PI / 4.0, epsilon = 1e-12);
    }

    proptest! {
        #[test]
        fn wrap_angle_in_range(angle in -100.0f64..100.0) {
            let wrapped = wrap_angle(angle);
            prop_assert!((0.0..TAU).contains(&wrapped));
        }

        #[test]
        fn wrap_angle_is_periodic(angle in -20.0f64..20.0, turns in -5i32..5) {
            let shifted = wrap_angle(angle + f64::from(turns) * TAU);
            let base = wrap_angle(angle);
            // identical up to rounding, modulo the seam at 0
            let diff = (shifted - base).abs();
            prop_assert!(diff < 1e-9 || (TAU - diff) < 1e-9);
        }

        #[test]
        fn wrap_angle_is_idempotent(angle in -50.0f64..50.0) {
            let once = wrap_angle(angle);
            prop_assert_eq!(wrap_angle(once), once);
        }
    }
}
