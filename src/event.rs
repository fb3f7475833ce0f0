//! Points and indexed events.
//!
//! Every location the planner knows about is turned into an [`Event`] before a
//! route is built. The index of an event encodes its category and its original
//! order: the depot is 0, deliveries follow as `1..=D` and pickups as
//! `D+1..=D+P`.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{PlannerError, Result};

/// A 2D location
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    /// Euclidean distance, `sqrt(dx² + dy²)`.
    #[inline]
    pub fn distance(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Point { x, y }
    }
}

/// Category of an event
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Depot,
    Delivery,
    Pickup,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EventKind::Depot => "depot",
            EventKind::Delivery => "delivery",
            EventKind::Pickup => "pickup",
        };
        f.pad(name)
    }
}

/// An indexed point taking part in route construction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub point: Point,
    /// 0 for the depot, `1..=D` for deliveries, `D+1..=D+P` for pickups
    pub index: usize,
    pub kind: EventKind,
}

impl Event {
    pub fn new(point: Point, index: usize, kind: EventKind) -> Self {
        Event { point, index, kind }
    }

    #[inline]
    pub fn distance(&self, other: &Event) -> f64 {
        self.point.distance(&other.point)
    }

    pub fn is_depot(&self) -> bool {
        self.kind == EventKind::Depot
    }

    pub fn is_delivery(&self) -> bool {
        self.kind == EventKind::Delivery
    }

    pub fn is_pickup(&self) -> bool {
        self.kind == EventKind::Pickup
    }
}

/// The full event set of one planning run.
///
/// Ordered depot first, then deliveries and pickups in insertion order. This
/// order is also the iteration order of the pending set, which the
/// nearest-neighbour tie-break depends on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventList {
    events: Vec<Event>,
    num_deliveries: usize,
    num_pickups: usize,
}

impl EventList {
    /// Build the event set from a depot and the ordered delivery and pickup points.
    ///
    /// Fails with [`PlannerError::InvalidInput`] on the first non-finite point.
    pub fn build(depot: Point, deliveries: &[Point], pickups: &[Point]) -> Result<Self> {
        let mut events = Vec::with_capacity(1 + deliveries.len() + pickups.len());
        events.push(checked(depot, 0, EventKind::Depot)?);

        for (i, p) in deliveries.iter().enumerate() {
            events.push(checked(*p, i + 1, EventKind::Delivery)?);
        }

        let offset = deliveries.len() + 1;
        for (i, p) in pickups.iter().enumerate() {
            events.push(checked(*p, offset + i, EventKind::Pickup)?);
        }

        Ok(EventList {
            events,
            num_deliveries: deliveries.len(),
            num_pickups: pickups.len(),
        })
    }

    pub fn depot(&self) -> &Event {
        // `build` always pushes the depot first
        &self.events[0]
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn deliveries(&self) -> &[Event] {
        &self.events[1..=self.num_deliveries]
    }

    pub fn pickups(&self) -> &[Event] {
        &self.events[self.num_deliveries + 1..]
    }

    pub fn num_deliveries(&self) -> usize {
        self.num_deliveries
    }

    pub fn num_pickups(&self) -> usize {
        self.num_pickups
    }

    /// Category implied by an index under this list's D/P split.
    pub fn kind_of(&self, index: usize) -> Option<EventKind> {
        match index {
            0 => Some(EventKind::Depot),
            i if i <= self.num_deliveries => Some(EventKind::Delivery),
            i if i <= self.num_deliveries + self.num_pickups => Some(EventKind::Pickup),
            _ => None,
        }
    }
}

fn checked(point: Point, index: usize, kind: EventKind) -> Result<Event> {
    if !point.is_finite() {
        return Err(PlannerError::InvalidInput { kind, x: point.x, y: point.y });
    }
    Ok(Event::new(point, index, kind))
}
