use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::travel_durations::TravelDurations;

#[derive(Debug, Error)]
pub enum OsrmError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {code} - {message}")]
    Api { code: String, message: String },

    #[error("Incomplete response")]
    IncompleteResponse,

    #[error("Deserialization error: {0}")]
    Deserialize(#[from] serde_json::Error),
}

#[derive(Deserialize)]
struct TableResponse {
    code: String,
    message: Option<String>,
    /// Travel times in seconds, `null` when a pair is unreachable
    durations: Option<Vec<Vec<Option<f64>>>>,
}

pub struct OsrmMatrixClientParams {
    pub osrm_url: String,
    pub timeout: Duration,
}

impl OsrmMatrixClientParams {
    pub fn new(osrm_url: impl Into<String>) -> Self {
        Self {
            osrm_url: osrm_url.into(),
            timeout: Duration::from_secs(10),
        }
    }
}

pub const OSRM_TABLE_API_PATH: &str = "/table/v1/driving/";

pub struct OsrmMatrixClient {
    params: OsrmMatrixClientParams,
    client: reqwest::blocking::Client,
}

impl OsrmMatrixClient {
    pub fn new(params: OsrmMatrixClientParams) -> Result<Self, OsrmError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(params.timeout)
            .build()?;

        Ok(Self { params, client })
    }

    pub fn table_url(&self, points: &[geo_types::Point]) -> String {
        let mut url = self.params.osrm_url.trim_end_matches('/').to_owned();
        url.push_str(OSRM_TABLE_API_PATH);

        for (i, point) in points.iter().enumerate() {
            url.push_str(&format!("{},{}", point.x(), point.y()));

            if i < points.len() - 1 {
                url.push(';');
            }
        }

        url
    }

    pub fn fetch_durations(
        &self,
        points: &[geo_types::Point],
    ) -> Result<TravelDurations, OsrmError> {
        let url = self.table_url(points);
        debug!("OSRM: requesting table for {} points", points.len());

        let response = self
            .client
            .get(url)
            .query(&[("annotations", "duration")])
            .send()?;

        let body = response.text()?;

        parse_table_response(&body, points.len())
    }
}

/// Parses an OSRM table body. Any cell that is missing or `null` makes the whole
/// response unusable, durations are truncated to whole seconds.
pub fn parse_table_response(body: &str, num_points: usize) -> Result<TravelDurations, OsrmError> {
    let response: TableResponse = serde_json::from_str(body)?;

    if response.code != "Ok" {
        return Err(OsrmError::Api {
            message: response
                .message
                .unwrap_or_else(|| String::from("OSRM error")),
            code: response.code,
        });
    }

    let rows = response.durations.ok_or(OsrmError::IncompleteResponse)?;

    if rows.len() != num_points {
        return Err(OsrmError::IncompleteResponse);
    }

    let mut durations = Vec::with_capacity(num_points * num_points);
    for row in rows {
        if row.len() != num_points {
            return Err(OsrmError::IncompleteResponse);
        }

        for cell in row {
            let seconds = cell.ok_or(OsrmError::IncompleteResponse)?;
            durations.push(seconds as i64);
        }
    }

    Ok(TravelDurations {
        durations,
        num_locations: num_points,
    })
}
