use fxhash::FxHashMap;

use crate::{
    json::types::{SolveRequest, SolveResponse, Stop, Trip},
    problem::node::NodeIdx,
    solver::solve_outcome::{SolveOutcome, VehicleRoute},
    utils::time::{TimeCodecError, to_hhmm},
};

/// Turns solver output back into request terms.
///
/// Virtual vehicle `v` belongs to driver `v / max_trips_per_driver`. A driver's
/// trips are numbered 1, 2, ... in vehicle order and the drivers appear in the
/// order their first trip was met.
pub struct RouteAssembler<'a> {
    request: &'a SolveRequest,
    max_trips_per_driver: usize,
}

impl<'a> RouteAssembler<'a> {
    pub fn new(request: &'a SolveRequest, max_trips_per_driver: usize) -> Self {
        RouteAssembler {
            request,
            max_trips_per_driver: max_trips_per_driver.max(1),
        }
    }

    fn request_id(&self, node: NodeIdx) -> i64 {
        self.request.requests[node.get() - 1].request_id
    }

    pub fn assemble(&self, outcome: &SolveOutcome) -> Result<SolveResponse, TimeCodecError> {
        let mut driver_order: Vec<usize> = vec![];
        let mut trips_by_driver: FxHashMap<usize, Vec<Trip>> = FxHashMap::default();

        for route in &outcome.routes {
            let driver_index = route.vehicle_id.get() / self.max_trips_per_driver;
            let trips = trips_by_driver.entry(driver_index).or_insert_with(|| {
                driver_order.push(driver_index);
                vec![]
            });

            trips.push(Trip {
                driver_id: self.request.drivers[driver_index],
                trip_number: trips.len() + 1,
                stops: self.assemble_stops(route)?,
            });
        }

        let routes = driver_order
            .into_iter()
            .flat_map(|driver_index| {
                trips_by_driver
                    .remove(&driver_index)
                    .unwrap_or_default()
            })
            .collect();

        Ok(SolveResponse {
            routes,
            unserved: outcome
                .dropped
                .iter()
                .map(|&node| self.request_id(node))
                .collect(),
        })
    }

    fn assemble_stops(&self, route: &VehicleRoute) -> Result<Vec<Stop>, TimeCodecError> {
        route
            .stops
            .iter()
            .enumerate()
            .map(|(index, stop)| {
                let delivery = &self.request.requests[stop.node.get() - 1];

                Ok(Stop {
                    order: index + 1,
                    request_id: delivery.request_id,
                    lat: delivery.lat,
                    lon: delivery.lon,
                    arrival: to_hhmm(stop.arrival, &self.request.shift_start)?,
                })
            })
            .collect()
    }
}
