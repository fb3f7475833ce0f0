//! Delivery Planner Library
//!
//! Plans a single closed delivery tour from a fixed depot.
//!
//! # Features
//!
//! - Indexed event model for the depot, delivery points and pickup points
//! - Nearest Neighbor route construction visiting every delivery and at most one pickup
//! - Stateful planner that accumulates points between runs
//! - CSV/JSON scenario files, random scenario generation and route export
//!
//! # Example
//!
//! ```
//! use delivery_planner::planner::DeliveryPlanner;
//!
//! let mut planner = DeliveryPlanner::new();
//! planner.add_delivery_point(1.0, 0.0).unwrap();
//! planner.add_delivery_point(0.0, 1.0).unwrap();
//! planner.add_pickup_point(5.0, 0.0).unwrap();
//! planner.add_pickup_point(0.0, 5.0).unwrap();
//!
//! let route = planner.compute_route().unwrap();
//! assert_eq!(route.coordinates().len(), 5);
//! println!("Route length: {:.5}", route.total_length);
//! ```

pub mod error;
pub mod event;
pub mod route;
pub mod heuristics;
pub mod planner;
pub mod scenario;

pub use error::PlannerError;
pub use event::{Event, EventKind, EventList, Point};
pub use planner::DeliveryPlanner;
pub use route::Route;
pub use scenario::Scenario;
