//! Fortune's sweep generalized to the sphere
//!
//! A circle centered on the +Z pole expands in colatitude and sweeps the whole
//! sphere. Sites enter the beach line when the circle reaches them, and a Voronoi
//! vertex appears wherever an arc is squeezed out between its two neighbors.

use glam::{DQuat, DVec3, EulerRot};
use log::{debug, trace};
use std::f64::consts::PI;

use super::events::{CircleEvent, Event, EventQueue};
use super::wavefront::{Arc, ArcKey, Wavefront};
use crate::cell::Edge;
use crate::sphere::{circle_priority, circumcenter, Spherical};

/// Minimum colatitude distance between any site and the far pole of the sweep
///
/// The sweep circle collapses to a point at the far pole, where breakpoints stop
/// being defined.
const POLE_CLEARANCE: f64 = 1e-4;

/// Euler angles of the frames tried, in order, until every site clears the far pole
const SWEEP_FRAMES: [(f64, f64, f64); 4] = [
    (0.0, 0.0, 0.0),
    (0.61, -0.37, 0.19),
    (-1.13, 0.83, 0.47),
    (0.29, 1.41, -0.77),
];

/// Pick the rotation to sweep in, or `None` if the sites clear the far pole as given
///
/// Falls back to the frame with the most clearance if none has enough.
fn sweep_frame(sites: &[DVec3]) -> Option<DQuat> {
    let clearance = |rotation: DQuat| {
        sites
            .iter()
            .map(|&site| PI - Spherical::from_cartesian(rotation * site).theta)
            .fold(PI, f64::min)
    };

    let mut best = (DQuat::IDENTITY, f64::NEG_INFINITY);
    for (a, b, c) in SWEEP_FRAMES {
        let rotation = DQuat::from_euler(EulerRot::XYZ, a, b, c);
        let room = clearance(rotation);
        if room > POLE_CLEARANCE {
            best = (rotation, room);
            break;
        }
        if room > best.1 {
            best = (rotation, room);
        }
    }

    let (rotation, room) = best;
    if rotation == DQuat::IDENTITY {
        return None;
    }
    debug!("sweeping in a rotated frame, {room:.2e} rad of pole clearance");
    Some(rotation)
}

/// Raw sweep output: vertices plus each site's edge records in discovery order
#[derive(Debug, Default)]
pub(crate) struct SweepOutput {
    pub vertices: Vec<DVec3>,
    pub edges: Vec<Vec<Edge>>,
    pub events: usize,
}

pub(crate) struct Sweep {
    /// Sites in the sweep frame
    sites: Vec<DVec3>,
    frame: Option<DQuat>,
    locations: Vec<Spherical>,
    wavefront: Wavefront,
    queue: EventQueue,
    vertices: Vec<DVec3>,
    edges: Vec<Vec<Edge>>,
    events: usize,
}

impl Sweep {
    /// Prepare a sweep over unit-length, pairwise distinct sites
    ///
    /// If a site lies at the far pole, the sweep runs over rotated copies of the
    /// sites and [`run`](Self::run) turns the vertices back.
    pub fn new(sites: &[DVec3]) -> Self {
        let frame = sweep_frame(sites);
        let sites: Vec<DVec3> = match frame {
            Some(rotation) => sites.iter().map(|&site| rotation * site).collect(),
            None => sites.to_vec(),
        };
        let locations: Vec<Spherical> = sites.iter().copied().map(Spherical::from_cartesian).collect();

        // a diagram over n sites has about 2n vertices
        let mut queue = EventQueue::with_capacity(sites.len() * 2);
        for (site, location) in locations.iter().enumerate() {
            queue.push(Event::Site {
                site,
                priority: location.theta,
            });
        }

        Self {
            vertices: Vec::with_capacity(sites.len() * 2),
            edges: vec![Vec::new(); sites.len()],
            sites,
            frame,
            locations,
            wavefront: Wavefront::new(),
            queue,
            events: 0,
        }
    }

    /// Process events until the queue runs dry
    pub fn run(mut self) -> SweepOutput {
        while let Some(event) = self.queue.pop() {
            self.events += 1;
            match event {
                Event::Site { site, .. } => self.handle_site(site),
                Event::Circle(circle) => self.handle_circle(circle),
            }
        }
        debug_assert!(self.wavefront.verify(), "beach line tree out of balance");
        debug_assert!(self.queue.verify(), "event queue tree out of balance");

        if let Some(rotation) = self.frame {
            let back = rotation.inverse();
            for vertex in &mut self.vertices {
                *vertex = back * *vertex;
            }
        }

        SweepOutput {
            vertices: self.vertices,
            edges: self.edges,
            events: self.events,
        }
    }

    fn handle_site(&mut self, site: usize) {
        let location = self.locations[site];
        trace!("site event {site} at colatitude {:.6}", location.theta);

        let Some((left, arc, right)) = self.wavefront.find_arcs(&self.locations, location) else {
            self.wavefront.append(Arc::new(site));
            return;
        };

        self.wavefront.clear_circle_event(arc, &mut self.queue);

        // [ left ][ arc ][ new ][ copy ][ right ]
        let split = self.wavefront.site_of(arc);
        let copy = self.wavefront.insert_after(Arc::new(split), arc);
        let new = self.wavefront.insert_after(Arc::new(site), arc);

        self.schedule(left, arc, new);
        self.schedule(new, copy, right);
    }

    fn handle_circle(&mut self, event: CircleEvent) {
        let Some(arc) = self.wavefront.get_mut(event.arc) else {
            debug_assert!(false, "circle event fired for an arc that is gone");
            return;
        };
        // the event has already left the queue
        debug_assert!(arc.circle_event.is_some());
        arc.circle_event = None;
        let middle = arc.site;

        trace!(
            "circle event ({}, {middle}, {}) at colatitude {:.6}",
            event.predecessor,
            event.successor,
            event.priority
        );

        let vertex = self.vertices.len();
        self.vertices.push(event.center);
        self.record_edges(vertex, event.predecessor, middle, event.successor);

        let (Some(left), Some(right)) = (self.wavefront.before(event.arc), self.wavefront.after(event.arc))
        else {
            return;
        };
        self.wavefront.remove(event.arc);

        self.wavefront.clear_circle_event(left, &mut self.queue);
        self.wavefront.clear_circle_event(right, &mut self.queue);

        if self.wavefront.len() < 3 {
            return;
        }

        let (Some(far_left), Some(far_right)) = (self.wavefront.before(left), self.wavefront.after(right))
        else {
            return;
        };
        self.schedule(far_left, left, right);
        self.schedule(left, right, far_right);
    }

    /// Append one edge record per site meeting at `vertex`
    ///
    /// Seen from outside, the sites lie counter-clockwise around the vertex in the
    /// order (middle, predecessor, successor). Each site records the edge that
    /// leaves the vertex counter-clockwise around itself, and points `divergent` at
    /// the slot its neighbor's record for this vertex is about to take.
    fn record_edges(&mut self, vertex: usize, predecessor: usize, middle: usize, successor: usize) {
        let slot = |site: usize| self.edges[site].len();
        let (predecessor_slot, middle_slot, successor_slot) =
            (slot(predecessor), slot(middle), slot(successor));

        self.edges[middle].push(Edge {
            vertex,
            neighbor: successor,
            divergent: successor_slot,
        });
        self.edges[predecessor].push(Edge {
            vertex,
            neighbor: middle,
            divergent: middle_slot,
        });
        self.edges[successor].push(Edge {
            vertex,
            neighbor: predecessor,
            divergent: predecessor_slot,
        });
    }

    /// Queue the circle event for `arc` squeezed between its two neighbors
    ///
    /// Nothing is queued unless the three sites are pairwise distinct. Events that
    /// would fire behind the sweep circle are queued anyway; they fire next and are
    /// cancelled like any other if their arcs change first.
    fn schedule(&mut self, predecessor: ArcKey, arc: ArcKey, successor: ArcKey) {
        let left = self.wavefront.site_of(predecessor);
        let middle = self.wavefront.site_of(arc);
        let right = self.wavefront.site_of(successor);
        if left == middle || middle == right || left == right {
            return;
        }

        let Some(center) = circumcenter(self.sites[left], self.sites[middle], self.sites[right]) else {
            return;
        };
        let priority = circle_priority(center, self.sites[middle]);

        let key = self.queue.push(Event::Circle(CircleEvent {
            arc,
            predecessor: left,
            successor: right,
            center,
            priority,
        }));

        if let Some(arc) = self.wavefront.get_mut(arc) {
            debug_assert!(arc.circle_event.is_none(), "arc already owns a circle event");
            arc.circle_event = Some(key);
        }
    }
}
