use thiserror::Error;

use crate::utils::enumerate_idx::EnumerateIdx;

use super::{
    node::{DEFAULT_PRIORITY, DEPOT, Node, NodeIdx},
    time_window::TimeWindow,
    travel_matrix::TravelMatrix,
    vehicle::{VehicleIdx, VirtualVehicle},
};

/// Seconds spent at every delivery before leaving it.
pub const SERVICE_DURATION_SECS: i64 = 120;

pub const MAX_TRIPS_PER_DRIVER: usize = 1;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("duration matrix row {row} has {actual} entries, expected {expected}")]
    NonSquareMatrix {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("duration from node {from} to node {to} is negative")]
    NegativeDuration { from: usize, to: usize },

    #[error("demands has {actual} entries but the matrix has {expected} nodes")]
    DemandsLength { expected: usize, actual: usize },

    #[error("time_windows has {actual} entries but the matrix has {expected} nodes")]
    TimeWindowsLength { expected: usize, actual: usize },

    #[error("vehicle_capacities has {actual} entries but there are {expected} drivers")]
    CapacitiesLength { expected: usize, actual: usize },

    #[error("priorities has {actual} entries but the matrix has {expected} nodes")]
    PrioritiesLength { expected: usize, actual: usize },
}

/// Capacitated routing problem with time windows over nodes `0..n`, node 0
/// being the depot.
///
/// Moving from `a` to `b` costs the travel duration plus the service duration
/// when `b` is a delivery. The same quantity drives the time dimension, so the
/// objective is the total transit time of all trips.
#[derive(Debug)]
pub struct RoutingModel {
    matrix: TravelMatrix,
    nodes: Vec<Node>,
    vehicles: Vec<VirtualVehicle>,
    shift_length: i64,
    service_duration: i64,
}

impl RoutingModel {
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_vehicles(&self) -> usize {
        self.vehicles.len()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, node: NodeIdx) -> &Node {
        &self.nodes[node]
    }

    /// Every node except the depot.
    pub fn deliveries_iter(&self) -> impl Iterator<Item = NodeIdx> + use<> {
        (1..self.nodes.len()).map(NodeIdx::new)
    }

    pub fn vehicles(&self) -> &[VirtualVehicle] {
        &self.vehicles
    }

    pub fn vehicle(&self, vehicle_id: VehicleIdx) -> &VirtualVehicle {
        &self.vehicles[vehicle_id]
    }

    pub fn shift_length(&self) -> i64 {
        self.shift_length
    }

    pub fn service_duration(&self) -> i64 {
        self.service_duration
    }

    pub fn travel_duration(&self, from: NodeIdx, to: NodeIdx) -> i64 {
        self.matrix.travel_duration(from, to)
    }

    /// Time and cost of the arc `from -> to`.
    #[inline]
    pub fn transit(&self, from: NodeIdx, to: NodeIdx) -> i64 {
        let service = if to == DEPOT {
            0
        } else {
            self.service_duration
        };

        self.matrix.travel_duration(from, to) + service
    }

    /// Load picked up when entering `to`.
    #[inline]
    pub fn demand_transit(&self, to: NodeIdx) -> i64 {
        self.nodes[to].demand()
    }

    pub fn drop_penalty(&self, node: NodeIdx) -> i64 {
        self.nodes[node].drop_penalty()
    }
}

pub struct RoutingModelBuilder {
    duration_matrix: Vec<Vec<i64>>,
    demands: Vec<i64>,
    time_windows: Vec<TimeWindow>,
    num_drivers: usize,
    vehicle_capacity: i64,
    vehicle_capacities: Option<Vec<i64>>,
    priorities: Option<Vec<i64>>,
    max_trips_per_driver: usize,
    service_duration: i64,
}

impl Default for RoutingModelBuilder {
    fn default() -> Self {
        RoutingModelBuilder {
            duration_matrix: vec![],
            demands: vec![],
            time_windows: vec![],
            num_drivers: 1,
            vehicle_capacity: 0,
            vehicle_capacities: None,
            priorities: None,
            max_trips_per_driver: MAX_TRIPS_PER_DRIVER,
            service_duration: SERVICE_DURATION_SECS,
        }
    }
}

impl RoutingModelBuilder {
    pub fn set_duration_matrix(&mut self, duration_matrix: Vec<Vec<i64>>) -> &mut Self {
        self.duration_matrix = duration_matrix;
        self
    }

    pub fn set_demands(&mut self, demands: Vec<i64>) -> &mut Self {
        self.demands = demands;
        self
    }

    pub fn set_time_windows(&mut self, time_windows: Vec<TimeWindow>) -> &mut Self {
        self.time_windows = time_windows;
        self
    }

    pub fn set_num_drivers(&mut self, num_drivers: usize) -> &mut Self {
        self.num_drivers = num_drivers;
        self
    }

    pub fn set_vehicle_capacity(&mut self, vehicle_capacity: i64) -> &mut Self {
        self.vehicle_capacity = vehicle_capacity;
        self
    }

    pub fn set_vehicle_capacities(&mut self, vehicle_capacities: Option<Vec<i64>>) -> &mut Self {
        self.vehicle_capacities = vehicle_capacities;
        self
    }

    pub fn set_priorities(&mut self, priorities: Option<Vec<i64>>) -> &mut Self {
        self.priorities = priorities;
        self
    }

    pub fn set_max_trips_per_driver(&mut self, max_trips_per_driver: usize) -> &mut Self {
        self.max_trips_per_driver = max_trips_per_driver;
        self
    }

    pub fn set_service_duration(&mut self, service_duration: i64) -> &mut Self {
        self.service_duration = service_duration;
        self
    }

    pub fn build(self) -> Result<RoutingModel, ModelError> {
        let matrix = TravelMatrix::from_rows(self.duration_matrix)?;
        let num_nodes = matrix.num_nodes();

        if self.demands.len() != num_nodes {
            return Err(ModelError::DemandsLength {
                expected: num_nodes,
                actual: self.demands.len(),
            });
        }

        if self.time_windows.len() != num_nodes {
            return Err(ModelError::TimeWindowsLength {
                expected: num_nodes,
                actual: self.time_windows.len(),
            });
        }

        let capacities = match self.vehicle_capacities {
            Some(capacities) if capacities.len() != self.num_drivers => {
                return Err(ModelError::CapacitiesLength {
                    expected: self.num_drivers,
                    actual: capacities.len(),
                });
            }
            Some(capacities) => capacities,
            None => vec![self.vehicle_capacity; self.num_drivers],
        };

        if let Some(priorities) = &self.priorities
            && priorities.len() != num_nodes
        {
            return Err(ModelError::PrioritiesLength {
                expected: num_nodes,
                actual: priorities.len(),
            });
        }

        let shift_length = self.time_windows.first().map_or(0, |window| window.end());

        let nodes = self
            .demands
            .iter()
            .zip(&self.time_windows)
            .enumerate_idx()
            .map(|(index, (&demand, &time_window)): (NodeIdx, _)| {
                let priority = self
                    .priorities
                    .as_ref()
                    .map_or(DEFAULT_PRIORITY, |priorities| priorities[index.get()]);

                if index == DEPOT {
                    Node::new(demand, TimeWindow::shift(shift_length), priority)
                } else {
                    Node::new(demand, time_window, priority)
                }
            })
            .collect();

        let max_trips_per_driver = self.max_trips_per_driver.max(1);
        let vehicles = capacities
            .iter()
            .enumerate()
            .flat_map(|(driver_index, &capacity)| {
                (0..max_trips_per_driver)
                    .map(move |trip_slot| VirtualVehicle::new(driver_index, trip_slot, capacity))
            })
            .collect();

        Ok(RoutingModel {
            matrix,
            nodes,
            vehicles,
            shift_length,
            service_duration: self.service_duration,
        })
    }
}
