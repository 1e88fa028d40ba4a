//! Sweep event queue
//!
//! Events are kept in an [`OrderedTree`] sorted by the colatitude at which they
//! fire. Circle events can be cancelled through the [`EventKey`] the owning arc holds.

use glam::DVec3;
use slotmap::new_key_type;
use std::cmp::Ordering;

use super::wavefront::ArcKey;
use crate::tree::OrderedTree;

new_key_type! {
    /// Handle to a queued event
    pub struct EventKey;
}

/// A predicted Voronoi vertex, valid while its three arcs stay adjacent
#[derive(Debug, Clone, Copy)]
pub struct CircleEvent {
    /// The arc that vanishes when the event fires
    pub arc: ArcKey,
    /// Site of the arc to the left of `arc`
    pub predecessor: usize,
    /// Site of the arc to the right of `arc`
    pub successor: usize,
    /// The Voronoi vertex this event would emit
    pub center: DVec3,
    pub priority: f64,
}

#[derive(Debug, Clone, Copy)]
pub enum Event {
    Site { site: usize, priority: f64 },
    Circle(CircleEvent),
}

impl Event {
    /// Colatitude of the sweep circle when this event fires
    #[inline]
    pub fn priority(&self) -> f64 {
        match self {
            Event::Site { priority, .. } => *priority,
            Event::Circle(circle) => circle.priority,
        }
    }
}

// Events compare by priority alone; ties fire in insertion order.
impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.priority() == other.priority()
    }
}

impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.priority().partial_cmp(&other.priority())
    }
}

/// Priority queue of pending sweep events
#[derive(Debug, Default)]
pub struct EventQueue {
    events: OrderedTree<Event, EventKey>,
}

impl EventQueue {
    #[cfg(test)]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: OrderedTree::with_capacity(capacity),
        }
    }

    #[cfg(test)]
    #[inline]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[cfg(test)]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Queue an event behind all events of lower or equal priority
    pub fn push(&mut self, event: Event) -> EventKey {
        self.events.insort(event)
    }

    /// Remove and return the event with the lowest priority
    pub fn pop(&mut self) -> Option<Event> {
        let first = self.events.first()?;
        self.events.remove(first)
    }

    /// Drop a queued event; returns `false` if it already fired or was cancelled
    pub fn cancel(&mut self, key: EventKey) -> bool {
        self.events.remove(key).is_some()
    }

    #[cfg(test)]
    pub fn get(&self, key: EventKey) -> Option<&Event> {
        self.events.get(key)
    }

    /// Check the underlying tree's balance invariants
    pub fn verify(&self) -> bool {
        self.events.verify()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pop_in_priority_order() {
        let mut queue = EventQueue::new();
        for (site, priority) in [(0, 1.5), (1, 0.2), (2, 3.0), (3, 0.2)] {
            queue.push(Event::Site { site, priority });
        }

        let mut order = Vec::new();
        while let Some(event) = queue.pop() {
            if let Event::Site { site, .. } = event {
                order.push(site);
            }
        }
        assert_eq!(order, vec![1, 3, 0, 2]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_cancel() {
        let mut queue = EventQueue::new();
        queue.push(Event::Site { site: 0, priority: 1.0 });
        let circle = queue.push(Event::Circle(CircleEvent {
            arc: ArcKey::default(),
            predecessor: 1,
            successor: 2,
            center: DVec3::Z,
            priority: 0.5,
        }));

        assert!(queue.get(circle).is_some());
        assert!(queue.cancel(circle));
        assert!(!queue.cancel(circle));
        assert_eq!(queue.len(), 1);
        assert!(matches!(queue.pop(), Some(Event::Site { site: 0, .. })));
    }
}
