use crate::define_index_newtype;

define_index_newtype!(VehicleIdx, VirtualVehicle);

/// One trip slot of a driver. A driver owns `max_trips_per_driver`
/// consecutive virtual vehicles.
#[derive(Debug, Clone)]
pub struct VirtualVehicle {
    driver_index: usize,
    trip_slot: usize,
    capacity: i64,
}

impl VirtualVehicle {
    pub fn new(driver_index: usize, trip_slot: usize, capacity: i64) -> Self {
        VirtualVehicle {
            driver_index,
            trip_slot,
            capacity,
        }
    }

    pub fn driver_index(&self) -> usize {
        self.driver_index
    }

    pub fn trip_slot(&self) -> usize {
        self.trip_slot
    }

    pub fn capacity(&self) -> i64 {
        self.capacity
    }
}
