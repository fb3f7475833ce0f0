use crate::event::{Event, EventList};
use crate::route::Route;
use log::debug;
use ordered_float::OrderedFloat;

pub trait ConstructionHeuristic {
    fn construct(&self, events: &EventList) -> Route;
    fn name(&self) -> &str;
}

/// Nearest Neighbor Heuristic with a single pickup stop
///
/// Builds a closed tour by repeatedly visiting the pending event nearest to
/// the last visited one. The first time a pickup is chosen, every other
/// pickup is dropped from the pending set, so the tour visits all deliveries
/// and at most one pickup.
///
/// Ties go to the candidate that comes first in pending order (depot,
/// deliveries, pickups, each in insertion order).
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestNeighborHeuristic;

impl NearestNeighborHeuristic {
    pub fn new() -> Self {
        NearestNeighborHeuristic
    }

    /// Position and distance of the pending event closest to `anchor`.
    ///
    /// `min_by_key` keeps the first of several equal minima.
    fn find_nearest(&self, anchor: &Event, pending: &[Event]) -> Option<(usize, f64)> {
        pending
            .iter()
            .enumerate()
            .map(|(pos, e)| (pos, anchor.distance(e)))
            .min_by_key(|&(_, d)| OrderedFloat(d))
    }
}

impl ConstructionHeuristic for NearestNeighborHeuristic {
    fn construct(&self, events: &EventList) -> Route {
        let start = std::time::Instant::now();

        let depot = *events.depot();
        let mut pending: Vec<Event> = events
            .events()
            .iter()
            .filter(|e| !e.is_depot())
            .copied()
            .collect();

        let mut tour = Vec::with_capacity(events.num_deliveries() + 3);
        tour.push(depot); // Start at depot
        let mut anchor = depot;
        let mut total_length = 0.0;

        while let Some((pos, dist)) = self.find_nearest(&anchor, &pending) {
            let next = pending[pos];
            debug!("visit {} #{} at distance {:.5}", next.kind, next.index, dist);

            total_length += dist;
            tour.push(next);
            anchor = next;

            if next.is_pickup() {
                // Pickup quota met: drop every remaining pickup at once
                let before = pending.len();
                pending.retain(|e| !e.is_pickup());
                debug!(
                    "pickup #{} chosen, discarded {} other pickup(s)",
                    next.index,
                    before - pending.len() - 1
                );
            } else {
                pending.remove(pos);
            }
        }

        total_length += anchor.distance(&depot);
        tour.push(depot);

        let mut route = Route::new(tour, total_length, self.name());
        route.computation_time = start.elapsed().as_secs_f64();
        route
    }

    fn name(&self) -> &str {
        "NearestNeighbor"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{EventKind, Point};

    fn build(deliveries: &[(f64, f64)], pickups: &[(f64, f64)]) -> EventList {
        let d: Vec<Point> = deliveries.iter().map(|&p| p.into()).collect();
        let p: Vec<Point> = pickups.iter().map(|&p| p.into()).collect();
        EventList::build(Point::ORIGIN, &d, &p).unwrap()
    }

    fn indices(route: &Route) -> Vec<usize> {
        route.events.iter().map(|e| e.index).collect()
    }

    #[test]
    fn test_nearest_neighbor_mixed() {
        let list = build(&[(1.0, 0.0), (0.0, 1.0)], &[(5.0, 0.0), (0.0, 5.0)]);
        let route = NearestNeighborHeuristic::new().construct(&list);

        assert_eq!(indices(&route), vec![0, 1, 2, 4, 0]);
        assert_eq!(
            route.coordinates(),
            vec![
                Point::new(0.0, 0.0),
                Point::new(1.0, 0.0),
                Point::new(0.0, 1.0),
                Point::new(0.0, 5.0),
                Point::new(0.0, 0.0),
            ]
        );
        assert!((route.total_length - (10.0 + 2f64.sqrt())).abs() < 1e-9);
        assert!(route.is_valid_for(&list));
    }

    #[test]
    fn test_single_pickup_only() {
        let list = build(&[], &[(2.0, 0.0)]);
        let route = NearestNeighborHeuristic::new().construct(&list);

        assert_eq!(indices(&route), vec![0, 1, 0]);
        assert!((route.total_length - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_event_set() {
        let list = build(&[], &[]);
        let route = NearestNeighborHeuristic::new().construct(&list);

        assert_eq!(indices(&route), vec![0, 0]);
        assert_eq!(route.total_length, 0.0);
        assert!(route.is_valid_for(&list));
    }

    #[test]
    fn test_deliveries_only_line() {
        let list = build(&[(3.0, 0.0), (1.0, 0.0), (2.0, 0.0)], &[]);
        let route = NearestNeighborHeuristic::new().construct(&list);

        assert_eq!(indices(&route), vec![0, 2, 3, 1, 0]);
        assert!((route.total_length - 6.0).abs() < 1e-12);
        assert!(route.pickup().is_none());
    }

    #[test]
    fn test_early_pickup_discards_the_rest() {
        // The nearest pickup is reached before the far delivery
        let list = build(&[(10.0, 0.0)], &[(1.0, 0.0), (2.0, 0.0)]);
        let route = NearestNeighborHeuristic::new().construct(&list);

        assert_eq!(indices(&route), vec![0, 2, 1, 0]);
        assert!((route.total_length - 20.0).abs() < 1e-12);
        assert_eq!(route.pickup().map(|e| e.point), Some(Point::new(1.0, 0.0)));
        assert!(route.is_valid_for(&list));
    }

    #[test]
    fn test_tie_prefers_earlier_delivery() {
        let list = build(&[(0.0, 1.0), (1.0, 0.0)], &[]);
        let route = NearestNeighborHeuristic::new().construct(&list);
        assert_eq!(indices(&route), vec![0, 1, 2, 0]);
    }

    #[test]
    fn test_tie_prefers_delivery_over_pickup() {
        let list = build(&[(2.0, 0.0)], &[(0.0, 2.0)]);
        let route = NearestNeighborHeuristic::new().construct(&list);

        assert_eq!(route.events[1].kind, EventKind::Delivery);
        assert_eq!(indices(&route), vec![0, 1, 2, 0]);
    }

    #[test]
    fn test_tie_between_pickups() {
        let list = build(&[], &[(0.0, 3.0), (3.0, 0.0), (0.0, -3.0)]);
        let route = NearestNeighborHeuristic::new().construct(&list);

        assert_eq!(indices(&route), vec![0, 1, 0]);
        assert!((route.total_length - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_coincident_points() {
        let list = build(&[(0.0, 0.0), (1.0, 1.0)], &[(1.0, 1.0)]);
        let route = NearestNeighborHeuristic::new().construct(&list);

        // Zero-length legs are valid; the delivery at (1,1) precedes the pickup there
        assert_eq!(indices(&route), vec![0, 1, 2, 3, 0]);
        assert!((route.total_length - 2.0 * 2f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_repeatable() {
        let list = build(&[(1.0, 1.0), (-1.0, 1.0), (1.0, -1.0)], &[(-1.0, -1.0), (2.0, 2.0)]);
        let h = NearestNeighborHeuristic::new();
        assert_eq!(indices(&h.construct(&list)), indices(&h.construct(&list)));
    }

    #[test]
    fn test_non_origin_depot() {
        let list =
            EventList::build(Point::new(10.0, 10.0), &[Point::new(11.0, 10.0)], &[]).unwrap();
        let route = NearestNeighborHeuristic::new().construct(&list);

        assert_eq!(route.events.first().map(|e| e.point), Some(Point::new(10.0, 10.0)));
        assert_eq!(route.events.last().map(|e| e.point), Some(Point::new(10.0, 10.0)));
        assert!((route.total_length - 2.0).abs() < 1e-12);
    }
}
