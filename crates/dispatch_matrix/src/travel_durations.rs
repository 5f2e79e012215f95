use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Travel durations in whole seconds between every pair of points.
/// Stored as a flat row-major vector: `index = from * num_locations + to`.
#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone, PartialEq, Eq)]
pub struct TravelDurations {
    pub durations: Vec<i64>,
    pub num_locations: usize,
}

impl TravelDurations {
    pub fn from_rows(rows: Vec<Vec<i64>>) -> Self {
        let num_locations = rows.len();
        TravelDurations {
            durations: rows.into_iter().flatten().collect(),
            num_locations,
        }
    }

    #[inline(always)]
    pub fn get(&self, from: usize, to: usize) -> i64 {
        self.durations[from * self.num_locations + to]
    }

    pub fn is_square(&self) -> bool {
        self.durations.len() == self.num_locations * self.num_locations
    }

    pub fn to_rows(&self) -> Vec<Vec<i64>> {
        if self.num_locations == 0 {
            return vec![];
        }

        self.durations
            .chunks(self.num_locations)
            .map(|row| row.to_vec())
            .collect()
    }
}
