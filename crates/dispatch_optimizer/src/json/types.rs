use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const DEFAULT_SHIFT_START: &str = "08:00";
pub const DEFAULT_SHIFT_END: &str = "18:00";
pub const DEFAULT_VEHICLE_CAPACITY: i64 = 5;

fn default_shift_start() -> String {
    String::from(DEFAULT_SHIFT_START)
}

fn default_shift_end() -> String {
    String::from(DEFAULT_SHIFT_END)
}

fn default_vehicle_capacity() -> i64 {
    DEFAULT_VEHICLE_CAPACITY
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, Copy, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    /// x = lon, y = lat
    pub fn to_point(self) -> geo_types::Point {
        geo_types::Point::new(self.lon, self.lat)
    }
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WindowKind {
    /// Must be served inside `[window_start, window_end]`
    Hard,
    /// Any time during the shift
    #[default]
    Asap,
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DeliveryRequest {
    pub request_id: i64,
    pub lat: f64,
    pub lon: f64,
    /// Units loaded on the vehicle, at least 1
    pub demand: i64,
    #[serde(default)]
    pub window_kind: WindowKind,
    /// "HH:MM"
    pub window_start: Option<String>,
    /// "HH:MM"
    pub window_end: Option<String>,
    /// Lower is more urgent, 2 when absent
    pub priority: Option<i64>,
}

impl DeliveryRequest {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates {
            lat: self.lat,
            lon: self.lon,
        }
    }

    /// Window bounds when the request carries a usable hard window.
    pub fn hard_window(&self) -> Option<(&str, &str)> {
        match (self.window_kind, &self.window_start, &self.window_end) {
            (WindowKind::Hard, Some(start), Some(end)) => Some((start.as_str(), end.as_str())),
            _ => None,
        }
    }
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SolveRequest {
    pub job_id: Option<String>,
    pub plan_version: Option<i64>,
    pub depot: Coordinates,
    /// "HH:MM", reference for every time of the request and the response
    #[serde(default = "default_shift_start")]
    pub shift_start: String,
    /// "HH:MM"
    #[serde(default = "default_shift_end")]
    pub shift_end: String,
    /// Ids of the drivers on shift
    pub drivers: Vec<i64>,
    #[serde(default = "default_vehicle_capacity")]
    pub vehicle_capacity: i64,
    /// One capacity per driver, overrides `vehicle_capacity`
    pub vehicle_capacities: Option<Vec<i64>>,
    pub requests: Vec<DeliveryRequest>,
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq)]
pub struct Stop {
    /// 1-based position in the trip
    pub order: usize,
    pub request_id: i64,
    pub lat: f64,
    pub lon: f64,
    /// "HH:MM"
    pub arrival: String,
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq)]
pub struct Trip {
    pub driver_id: i64,
    /// 1-based trip number of the driver
    pub trip_number: usize,
    pub stops: Vec<Stop>,
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq, Default)]
pub struct SolveResponse {
    pub routes: Vec<Trip>,
    /// Ids of the requests no trip can serve
    pub unserved: Vec<i64>,
}

impl SolveResponse {
    /// Response for a solve that served nothing.
    pub fn all_unserved(request: &SolveRequest) -> Self {
        SolveResponse {
            routes: vec![],
            unserved: request
                .requests
                .iter()
                .map(|delivery| delivery.request_id)
                .collect(),
        }
    }
}
