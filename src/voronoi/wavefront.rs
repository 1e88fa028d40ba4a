//! Beach line of the spherical sweep
//!
//! The wavefront holds one [`Arc`] per active stretch of the beach line, ordered
//! by longitude around the sweep pole. The order is circular: the last arc's right
//! neighbor is the first arc.

use slotmap::new_key_type;

use super::events::{EventKey, EventQueue};
use crate::sphere::{arc_intersection, wrap_angle, Spherical};
use crate::tree::OrderedTree;

new_key_type! {
    /// Handle to an arc on the beach line
    pub struct ArcKey;
}

/// One site's active stretch of the beach line
///
/// An arc must not be dropped while it still owns a circle event: clear it from
/// the queue first with [`Wavefront::clear_circle_event`].
#[derive(Debug)]
pub struct Arc {
    pub site: usize,
    pub circle_event: Option<EventKey>,
}

impl Arc {
    pub fn new(site: usize) -> Self {
        Self {
            site,
            circle_event: None,
        }
    }
}

impl Drop for Arc {
    fn drop(&mut self) {
        debug_assert!(
            self.circle_event.is_none() || std::thread::panicking(),
            "arc of site {} dropped with a pending circle event",
            self.site
        );
    }
}

#[derive(Debug, Default)]
pub struct Wavefront {
    arcs: OrderedTree<Arc, ArcKey>,
}

impl Wavefront {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.arcs.len()
    }

    #[cfg(test)]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.arcs.is_empty()
    }

    pub fn append(&mut self, arc: Arc) -> ArcKey {
        self.arcs.append(arc)
    }

    pub fn insert_after(&mut self, arc: Arc, predecessor: ArcKey) -> ArcKey {
        self.arcs.insert_after(arc, predecessor)
    }

    pub fn remove(&mut self, key: ArcKey) -> Option<Arc> {
        self.arcs.remove(key)
    }

    #[cfg(test)]
    pub fn get(&self, key: ArcKey) -> Option<&Arc> {
        self.arcs.get(key)
    }

    pub fn get_mut(&mut self, key: ArcKey) -> Option<&mut Arc> {
        self.arcs.get_mut(key)
    }

    /// Site index of the arc at `key`
    ///
    /// # Panics
    ///
    /// Panics if `key` is not on the wavefront.
    #[inline]
    pub fn site_of(&self, key: ArcKey) -> usize {
        self.arcs[key].site
    }

    /// Left neighbor of an arc, wrapping around
    pub fn before(&self, key: ArcKey) -> Option<ArcKey> {
        self.arcs.predecessor(key).or_else(|| self.arcs.last())
    }

    /// Right neighbor of an arc, wrapping around
    pub fn after(&self, key: ArcKey) -> Option<ArcKey> {
        self.arcs.successor(key).or_else(|| self.arcs.first())
    }

    /// Cancel the arc's pending circle event, if any
    pub fn clear_circle_event(&mut self, key: ArcKey, queue: &mut EventQueue) {
        if let Some(event) = self.arcs.get_mut(key).and_then(|arc| arc.circle_event.take()) {
            queue.cancel(event);
        }
    }

    #[cfg(test)]
    /// Site indices of the arcs in order
    pub fn sites(&self) -> impl Iterator<Item = usize> + '_ {
        self.arcs.iter().map(|(_, arc)| arc.site)
    }

    pub fn verify(&self) -> bool {
        self.arcs.verify()
    }

    /// Find the arc under a new site along with its left and right neighbors
    ///
    /// The sweep circle sits at the site's colatitude. Breakpoint longitudes are
    /// measured relative to the breakpoint between the last and the first arc, which
    /// turns the circular order into a linear one the tree can be searched by.
    /// Returns `None` if the wavefront holds fewer than two arcs.
    pub fn find_arcs(
        &self,
        sites: &[Spherical],
        location: Spherical,
    ) -> Option<(ArcKey, ArcKey, ArcKey)> {
        let mut node = self.arcs.root()?;
        let first = self.arcs.first()?;
        let last = self.arcs.last()?;
        if first == last {
            return None;
        }

        let xi = location.theta;
        let breakpoint = |left: ArcKey, right: ArcKey| {
            arc_intersection(sites[self.site_of(left)], sites[self.site_of(right)], xi)
        };

        // the seam between the last and first arc maps to 0
        let shift = -breakpoint(last, first);
        let beta = |phi: f64| wrap_angle(phi + shift);

        let beta_site = beta(location.phi);
        loop {
            let predecessor = self.arcs.predecessor(node);
            let successor = self.arcs.successor(node);

            if let (Some(pred), Some(left)) = (predecessor, self.arcs.left(node)) {
                if beta_site < beta(breakpoint(pred, node)) {
                    node = left;
                    continue;
                }
            }
            if let (Some(succ), Some(right)) = (successor, self.arcs.right(node)) {
                if beta_site > beta(breakpoint(node, succ)) {
                    node = right;
                    continue;
                }
            }

            return Some((
                predecessor.unwrap_or(last),
                node,
                successor.unwrap_or(first),
            ));
        }
    }
}
