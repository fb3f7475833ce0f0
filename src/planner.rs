//! Stateful planner that accumulates points and computes routes.
//!
//! A [`DeliveryPlanner`] owns the delivery and pickup coordinates entered so
//! far, the depot definition and the most recent route. Each call to
//! [`DeliveryPlanner::compute_route`] builds a fresh event set and replaces the
//! previous route; the accumulated points are left untouched.

use log::info;

use crate::error::{PlannerError, Result};
use crate::event::{EventKind, EventList, Point};
use crate::heuristics::construction::{ConstructionHeuristic, NearestNeighborHeuristic};
use crate::route::Route;

pub struct DeliveryPlanner {
    depot: Point,
    deliveries: Vec<Point>,
    pickups: Vec<Point>,
    route: Option<Route>,
    plans_computed: usize,
    heuristic: Box<dyn ConstructionHeuristic + Send + Sync>,
}

impl DeliveryPlanner {
    /// Planner with the depot at the origin
    pub fn new() -> Self {
        Self::with_depot(Point::ORIGIN)
    }

    pub fn with_depot(depot: Point) -> Self {
        DeliveryPlanner {
            depot,
            deliveries: Vec::new(),
            pickups: Vec::new(),
            route: None,
            plans_computed: 0,
            heuristic: Box::new(NearestNeighborHeuristic::new()),
        }
    }

    /// Replace the construction heuristic used by `compute_route`
    pub fn with_heuristic<H>(mut self, h: H) -> Self
    where
        H: ConstructionHeuristic + Send + Sync + 'static,
    {
        self.heuristic = Box::new(h);
        self
    }

    pub fn add_delivery_point(&mut self, x: f64, y: f64) -> Result<()> {
        let p = finite(EventKind::Delivery, x, y)?;
        self.deliveries.push(p);
        Ok(())
    }

    pub fn add_pickup_point(&mut self, x: f64, y: f64) -> Result<()> {
        let p = finite(EventKind::Pickup, x, y)?;
        self.pickups.push(p);
        Ok(())
    }

    /// Clear all points and the last route. The depot is kept.
    pub fn reset(&mut self) {
        self.deliveries.clear();
        self.pickups.clear();
        self.route = None;
        self.plans_computed = 0;
    }

    /// Run the construction heuristic over the current points.
    ///
    /// With no points the result is the depot-to-depot route of length 0.
    pub fn compute_route(&mut self) -> Result<&Route> {
        // Drop the previous route before building the next one
        self.route = None;

        let events = EventList::build(self.depot, &self.deliveries, &self.pickups)?;
        let route = self.heuristic.construct(&events);
        self.plans_computed += 1;

        info!(
            "plan {}: {} deliveries, {} pickups -> {} stops, length {:.5} ({})",
            self.plans_computed,
            events.num_deliveries(),
            events.num_pickups(),
            route.num_stops(),
            route.total_length,
            route.algorithm
        );

        let route: &Route = self.route.insert(route);
        Ok(route)
    }

    pub fn depot(&self) -> Point {
        self.depot
    }

    pub fn deliveries(&self) -> &[Point] {
        &self.deliveries
    }

    pub fn pickups(&self) -> &[Point] {
        &self.pickups
    }

    pub fn last_route(&self) -> Option<&Route> {
        self.route.as_ref()
    }

    /// Plans computed since construction or the last reset
    pub fn plans_computed(&self) -> usize {
        self.plans_computed
    }

    pub fn heuristic_name(&self) -> &str {
        self.heuristic.name()
    }
}

impl Default for DeliveryPlanner {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DeliveryPlanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeliveryPlanner")
            .field("depot", &self.depot)
            .field("deliveries", &self.deliveries)
            .field("pickups", &self.pickups)
            .field("route", &self.route)
            .field("plans_computed", &self.plans_computed)
            .field("heuristic", &self.heuristic.name())
            .finish()
    }
}

fn finite(kind: EventKind, x: f64, y: f64) -> Result<Point> {
    let p = Point::new(x, y);
    if !p.is_finite() {
        return Err(PlannerError::InvalidInput { kind, x, y });
    }
    Ok(p)
}
