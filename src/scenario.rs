//! Scenario files and route export.
//!
//! A scenario is the raw input of a planning run: a depot plus ordered
//! delivery and pickup coordinates. Two file formats are supported:
//!
//! - CSV, one `kind,x,y` row per point, where `kind` is `depot`, `delivery`
//!   or `pickup`. Lines starting with `#` are ignored. Row order is kept.
//! - JSON, `{"depot": {"x":..,"y":..}, "deliveries": [..], "pickups": [..]}`.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use log::debug;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};
use crate::event::{EventKind, EventList, Point};
use crate::planner::DeliveryPlanner;
use crate::route::Route;

/// Depot, deliveries and pickups of one planning problem
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub depot: Point,
    #[serde(default)]
    pub deliveries: Vec<Point>,
    #[serde(default)]
    pub pickups: Vec<Point>,
}

#[derive(Debug, Deserialize)]
struct PointRow {
    kind: EventKind,
    x: f64,
    y: f64,
}

#[derive(Debug, Serialize)]
struct RouteRow {
    step: usize,
    kind: EventKind,
    index: usize,
    x: f64,
    y: f64,
    /// Distance from the previous step, 0 for the first
    leg: f64,
}

impl Scenario {
    pub fn new(depot: Point) -> Self {
        Scenario { depot, ..Default::default() }
    }

    /// Load a scenario, choosing the format from the file extension (`.json` or CSV otherwise)
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let is_json = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let file = File::open(path)?;
        if is_json {
            Self::from_json_reader(file)
        } else {
            Self::from_csv_reader(file)
        }
    }

    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Parse `kind,x,y` rows, with an optional `kind,x,y` header as the first row.
    ///
    /// At most one `depot` row is accepted; without one the depot is the origin.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .comment(Some(b'#'))
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut scenario = Scenario::default();
        let mut depot_line = None;

        for (n, record) in rdr.records().enumerate() {
            let record = record?;
            let line = record.position().map(|p| p.line() as usize).unwrap_or(0);

            // Tolerate a `kind,x,y` header as the first row
            let is_header = record.get(0).map(|k| k.eq_ignore_ascii_case("kind")).unwrap_or(false);
            if n == 0 && is_header {
                continue;
            }

            let row: PointRow = record.deserialize(None)?;
            let point = Point::new(row.x, row.y);
            match row.kind {
                EventKind::Depot => {
                    if let Some(first) = depot_line {
                        return Err(PlannerError::Parse {
                            line,
                            message: format!(
                                "duplicate depot row (first defined on line {})",
                                first
                            ),
                        });
                    }
                    depot_line = Some(line);
                    scenario.depot = point;
                }
                EventKind::Delivery => scenario.deliveries.push(point),
                EventKind::Pickup => scenario.pickups.push(point),
            }
        }

        debug!(
            "parsed scenario: {} deliveries, {} pickups",
            scenario.deliveries.len(),
            scenario.pickups.len()
        );
        Ok(scenario)
    }

    /// Generate `num_deliveries` and `num_pickups` points uniformly in
    /// `[-extent, extent]²`. Deterministic for a given seed.
    ///
    /// Fails with [`PlannerError::InvalidExtent`] when `2 * extent` is not finite.
    pub fn random(
        seed: u64,
        num_deliveries: usize,
        num_pickups: usize,
        extent: f64,
    ) -> Result<Self> {
        if !(2.0 * extent).is_finite() {
            return Err(PlannerError::InvalidExtent(extent));
        }
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let extent = extent.abs().max(f64::EPSILON);

        let mut sample = |n: usize| -> Vec<Point> {
            (0..n)
                .map(|_| {
                    Point::new(rng.gen_range(-extent..=extent), rng.gen_range(-extent..=extent))
                })
                .collect()
        };

        let deliveries = sample(num_deliveries);
        let pickups = sample(num_pickups);

        Ok(Scenario { depot: Point::ORIGIN, deliveries, pickups })
    }

    pub fn event_list(&self) -> Result<EventList> {
        EventList::build(self.depot, &self.deliveries, &self.pickups)
    }

    /// A planner preloaded with this scenario's points
    pub fn to_planner(&self) -> Result<DeliveryPlanner> {
        let mut planner = DeliveryPlanner::with_depot(self.depot);
        for p in &self.deliveries {
            planner.add_delivery_point(p.x, p.y)?;
        }
        for p in &self.pickups {
            planner.add_pickup_point(p.x, p.y)?;
        }
        Ok(planner)
    }

    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(["kind", "x", "y"])?;

        let rows = std::iter::once((EventKind::Depot, &self.depot))
            .chain(self.deliveries.iter().map(|p| (EventKind::Delivery, p)))
            .chain(self.pickups.iter().map(|p| (EventKind::Pickup, p)));
        for (kind, p) in rows {
            wtr.write_record([kind.to_string(), p.x.to_string(), p.y.to_string()])?;
        }

        wtr.flush()?;
        Ok(())
    }

    pub fn write_json<W: Write>(&self, writer: W) -> Result<()> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }
}

/// Export a route as `step,kind,index,x,y,leg` rows
pub fn write_route_csv<W: Write>(route: &Route, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    let mut prev = None;
    for (step, e) in route.events.iter().enumerate() {
        let leg = prev.map(|p: Point| p.distance(&e.point)).unwrap_or(0.0);
        wtr.serialize(RouteRow {
            step,
            kind: e.kind,
            index: e.index,
            x: e.point.x,
            y: e.point.y,
            leg,
        })?;
        prev = Some(e.point);
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_csv() {
        let data = "\
# sample scenario
kind,x,y
delivery, 1, 0
pickup, 5, 0
delivery, 0, 1
pickup, 0, 5
";
        let scenario = Scenario::from_csv_reader(data.as_bytes()).unwrap();
        assert_eq!(scenario.depot, Point::ORIGIN);
        assert_eq!(scenario.deliveries, vec![Point::new(1.0, 0.0), Point::new(0.0, 1.0)]);
        assert_eq!(scenario.pickups, vec![Point::new(5.0, 0.0), Point::new(0.0, 5.0)]);
    }

    #[test]
    fn test_parse_csv_with_depot() {
        let data = "depot,2.5,-1\ndelivery,3,3\n";
        let scenario = Scenario::from_csv_reader(data.as_bytes()).unwrap();
        assert_eq!(scenario.depot, Point::new(2.5, -1.0));
        assert_eq!(scenario.deliveries.len(), 1);
    }

    #[test]
    fn test_duplicate_depot_rejected() {
        let data = "depot,0,0\ndepot,1,1\n";
        let err = Scenario::from_csv_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(err, PlannerError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_header_only_as_first_row() {
        let data = "delivery,1,0\nkind,x,y\n";
        assert!(matches!(
            Scenario::from_csv_reader(data.as_bytes()),
            Err(PlannerError::Csv(_))
        ));
    }

    #[test]
    fn test_bad_kind_rejected() {
        let data = "warehouse,0,0\n";
        assert!(matches!(
            Scenario::from_csv_reader(data.as_bytes()),
            Err(PlannerError::Csv(_))
        ));
    }

    #[test]
    fn test_json_roundtrip_and_partial_fields() {
        let json = r#"{"pickups": [{"x": 2.0, "y": 0.0}]}"#;
        let scenario = Scenario::from_json_reader(json.as_bytes()).unwrap();
        assert_eq!(scenario.depot, Point::ORIGIN);
        assert!(scenario.deliveries.is_empty());

        let mut buf = Vec::new();
        scenario.write_json(&mut buf).unwrap();
        assert_eq!(Scenario::from_json_reader(buf.as_slice()).unwrap(), scenario);
    }

    #[test]
    fn test_csv_written_scenario_reads_back() {
        let scenario = Scenario {
            depot: Point::new(1.0, 1.0),
            deliveries: vec![Point::new(2.0, 3.0)],
            pickups: vec![Point::new(-4.5, 0.25)],
        };
        let mut buf = Vec::new();
        scenario.write_csv(&mut buf).unwrap();
        assert_eq!(Scenario::from_csv_reader(buf.as_slice()).unwrap(), scenario);
    }

    #[test]
    fn test_random_is_deterministic() {
        let a = Scenario::random(7, 5, 3, 10.0).unwrap();
        let b = Scenario::random(7, 5, 3, 10.0).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.deliveries.len(), 5);
        assert_eq!(a.pickups.len(), 3);
        assert!(a
            .deliveries
            .iter()
            .chain(&a.pickups)
            .all(|p| p.x.abs() <= 10.0 && p.y.abs() <= 10.0));
        assert_ne!(a, Scenario::random(8, 5, 3, 10.0).unwrap());
    }

    #[test]
    fn test_random_rejects_unbounded_extent() {
        for extent in [f64::INFINITY, f64::NEG_INFINITY, f64::NAN, 1e308, -1e308] {
            assert!(matches!(
                Scenario::random(42, 2, 1, extent),
                Err(PlannerError::InvalidExtent(_))
            ));
        }

        // Very large but bounded extents are accepted
        let s = Scenario::random(42, 2, 1, 1e300).unwrap();
        assert!(s.deliveries.iter().chain(&s.pickups).all(Point::is_finite));
        assert!(Scenario::random(42, 1, 0, 0.0).is_ok());
    }

    #[test]
    fn test_route_csv_export() {
        let scenario = Scenario {
            depot: Point::ORIGIN,
            deliveries: vec![],
            pickups: vec![Point::new(2.0, 0.0)],
        };
        let mut planner = scenario.to_planner().unwrap();
        let route = planner.compute_route().unwrap();

        let mut buf = Vec::new();
        write_route_csv(route, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "step,kind,index,x,y,leg");
        assert_eq!(lines[1], "0,depot,0,0.0,0.0,0.0");
        assert_eq!(lines[2], "1,pickup,1,2.0,0.0,2.0");
        assert_eq!(lines[3], "2,depot,0,0.0,0.0,2.0");
    }
}
