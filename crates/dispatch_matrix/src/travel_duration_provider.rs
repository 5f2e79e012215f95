use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::travel_durations::TravelDurations;

#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone)]
#[serde(rename_all = "snake_case")]
pub enum TravelDurationProvider {
    /// http://project-osrm.org/docs/v5.24.0/api/#table-service
    Osrm {
        url: String,
    },

    AsTheCrowFlies {
        speed_kmh: f64,
    },

    Custom {
        durations: TravelDurations,
    },
}
