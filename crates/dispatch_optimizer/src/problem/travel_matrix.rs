use dispatch_matrix::travel_durations::TravelDurations;

use super::{node::NodeIdx, routing_model::ModelError};

/// Square matrix of travel durations in seconds between nodes.
#[derive(Debug, Clone)]
pub struct TravelMatrix {
    durations: Vec<i64>,
    num_nodes: usize,
}

impl TravelMatrix {
    pub fn from_rows(rows: Vec<Vec<i64>>) -> Result<Self, ModelError> {
        let num_nodes = rows.len();
        let mut durations = Vec::with_capacity(num_nodes * num_nodes);

        for (from, row) in rows.into_iter().enumerate() {
            if row.len() != num_nodes {
                return Err(ModelError::NonSquareMatrix {
                    row: from,
                    expected: num_nodes,
                    actual: row.len(),
                });
            }

            for (to, duration) in row.into_iter().enumerate() {
                if duration < 0 {
                    return Err(ModelError::NegativeDuration { from, to });
                }
                durations.push(duration);
            }
        }

        Ok(TravelMatrix {
            durations,
            num_nodes,
        })
    }

    pub fn from_travel_durations(travel_durations: TravelDurations) -> Result<Self, ModelError> {
        Self::from_rows(travel_durations.to_rows())
    }

    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    #[inline(always)]
    pub fn travel_duration(&self, from: NodeIdx, to: NodeIdx) -> i64 {
        if from == to {
            return 0;
        }

        self.durations[from.get() * self.num_nodes + to.get()]
    }

    pub fn max_duration(&self) -> i64 {
        self.durations.iter().copied().max().unwrap_or(0)
    }
}
