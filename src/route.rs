//! Route representation for a planned tour.
//!
//! A [`Route`] is the closed sequence of events produced by one planning run,
//! starting and ending at the depot, together with its total length.

use crate::event::{Event, EventKind, EventList, Point};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Absolute tolerance used when comparing recomputed lengths
const LENGTH_TOLERANCE: f64 = 1e-9;

/// A closed tour over an event set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Route {
    /// Visited events, depot first and last
    pub events: Vec<Event>,
    /// Sum of Euclidean leg lengths, closing leg included
    pub total_length: f64,
    /// Algorithm that generated this route
    pub algorithm: String,
    /// Computation time in seconds
    pub computation_time: f64,
}

impl Route {
    pub fn new(events: Vec<Event>, total_length: f64, algorithm: &str) -> Self {
        Route {
            events,
            total_length,
            algorithm: algorithm.to_string(),
            computation_time: 0.0,
        }
    }

    /// Build a route from its events, computing the length from the legs
    pub fn from_events(events: Vec<Event>, algorithm: &str) -> Self {
        let total_length = leg_sum(&events);
        Route::new(events, total_length, algorithm)
    }

    /// Ordered (x, y) coordinates of the tour
    pub fn coordinates(&self) -> Vec<Point> {
        self.events.iter().map(|e| e.point).collect()
    }

    pub fn xs(&self) -> Vec<f64> {
        self.events.iter().map(|e| e.point.x).collect()
    }

    pub fn ys(&self) -> Vec<f64> {
        self.events.iter().map(|e| e.point.y).collect()
    }

    /// Length of each leg, in visiting order
    pub fn leg_lengths(&self) -> Vec<f64> {
        self.events.windows(2).map(|w| w[0].distance(&w[1])).collect()
    }

    /// Length recomputed from the coordinate sequence alone
    pub fn recomputed_length(&self) -> f64 {
        leg_sum(&self.events)
    }

    /// Number of stops between the two depot visits
    pub fn num_stops(&self) -> usize {
        self.events.len().saturating_sub(2)
    }

    pub fn delivery_count(&self) -> usize {
        self.events.iter().filter(|e| e.is_delivery()).count()
    }

    /// The pickup visited by this route, if any
    pub fn pickup(&self) -> Option<&Event> {
        self.events.iter().find(|e| e.is_pickup())
    }

    /// Legend label used when plotting successive plans
    pub fn legend(&self, plan_number: usize) -> String {
        format!("Plan {}; Length: {:.2}", plan_number, self.total_length)
    }

    /// Check that this route is a well-formed tour over `list`.
    ///
    /// The depot opens and closes the route, every delivery appears exactly
    /// once, exactly one pickup appears when any exist, and `total_length`
    /// matches the legs.
    pub fn is_valid_for(&self, list: &EventList) -> bool {
        let depot = list.depot();
        match (self.events.first(), self.events.last()) {
            (Some(first), Some(last))
                if first == depot && last == depot && self.events.len() >= 2 => {}
            _ => return false,
        }

        let inner = &self.events[1..self.events.len() - 1];
        let mut seen: HashMap<usize, usize> = HashMap::new();
        for e in inner {
            if list.kind_of(e.index) != Some(e.kind) || e.kind == EventKind::Depot {
                return false;
            }
            *seen.entry(e.index).or_insert(0) += 1;
        }

        let deliveries_ok = list
            .deliveries()
            .iter()
            .all(|d| seen.get(&d.index) == Some(&1));
        let expected_pickups = usize::from(list.num_pickups() > 0);
        let pickups = inner.iter().filter(|e| e.is_pickup()).count();

        deliveries_ok
            && pickups == expected_pickups
            && inner.len() == list.num_deliveries() + expected_pickups
            && (self.recomputed_length() - self.total_length).abs()
                <= LENGTH_TOLERANCE * (1.0 + self.total_length)
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Route ({})", self.algorithm)?;
        writeln!(f, "  Length: {:.5}", self.total_length)?;
        writeln!(f, "  Stops: {}", self.num_stops())?;
        writeln!(f, "  Time: {:.6}s", self.computation_time)?;
        for (step, e) in self.events.iter().enumerate() {
            writeln!(
                f,
                "  {:>3}. {:<8} #{:<3} ({:.3}, {:.3})",
                step, e.kind, e.index, e.point.x, e.point.y
            )?;
        }
        Ok(())
    }
}

fn leg_sum(events: &[Event]) -> f64 {
    events.windows(2).map(|w| w[0].distance(&w[1])).sum()
}
