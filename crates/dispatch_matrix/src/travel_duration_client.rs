use tracing::{debug, warn};

use crate::{
    as_the_crow_flies::as_the_crow_flies_durations,
    osrm::{OsrmError, OsrmMatrixClient, OsrmMatrixClientParams},
    travel_duration_provider::TravelDurationProvider,
    travel_durations::TravelDurations,
};

/// Speed assumed by the geometric fallback
pub const FALLBACK_SPEED_KMH: f64 = 30.0;

/// Anything able to produce a square matrix of travel durations for an ordered
/// list of points (x = lon, y = lat). Implementations never fail: lookup
/// problems are absorbed by a deterministic estimate.
pub trait TravelDurationSource: Send + Sync {
    fn travel_durations(&self, points: &[geo_types::Point]) -> TravelDurations;
}

pub struct TravelDurationClient {
    provider: TravelDurationProvider,
    osrm_client: Option<OsrmMatrixClient>,
}

impl TravelDurationClient {
    pub fn new(provider: TravelDurationProvider) -> Result<Self, OsrmError> {
        let osrm_client = match &provider {
            TravelDurationProvider::Osrm { url } => {
                Some(OsrmMatrixClient::new(OsrmMatrixClientParams::new(url.as_str()))?)
            }
            _ => None,
        };

        Ok(Self {
            provider,
            osrm_client,
        })
    }

    pub fn with_osrm_client(osrm_client: OsrmMatrixClient, url: String) -> Self {
        Self {
            provider: TravelDurationProvider::Osrm { url },
            osrm_client: Some(osrm_client),
        }
    }

    pub fn provider(&self) -> &TravelDurationProvider {
        &self.provider
    }

    pub fn fetch_durations(&self, points: &[geo_types::Point]) -> TravelDurations {
        match &self.provider {
            TravelDurationProvider::Osrm { url } => {
                let result = match &self.osrm_client {
                    Some(client) => client.fetch_durations(points),
                    None => Err(OsrmError::IncompleteResponse),
                };

                match result {
                    Ok(durations) => durations,
                    Err(err) => {
                        warn!("OSRM lookup on {url} failed, using haversine estimate: {err}");
                        as_the_crow_flies_durations(points, FALLBACK_SPEED_KMH)
                    }
                }
            }
            TravelDurationProvider::AsTheCrowFlies { speed_kmh } => {
                as_the_crow_flies_durations(points, *speed_kmh)
            }
            TravelDurationProvider::Custom { durations } => {
                if durations.num_locations == points.len() && durations.is_square() {
                    durations.clone()
                } else {
                    warn!(
                        "Custom durations cover {} points but {} were requested, using haversine estimate",
                        durations.num_locations,
                        points.len()
                    );
                    as_the_crow_flies_durations(points, FALLBACK_SPEED_KMH)
                }
            }
        }
    }
}

impl TravelDurationSource for TravelDurationClient {
    fn travel_durations(&self, points: &[geo_types::Point]) -> TravelDurations {
        debug!("Fetching travel durations for {} points", points.len());
        self.fetch_durations(points)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use geo_types::Point;

    use super::*;

    fn points() -> Vec<Point> {
        vec![
            Point::new(-43.8772, -16.7344),
            Point::new(-43.8610, -16.7210),
            Point::new(-43.8600, -16.7050),
        ]
    }

    #[test]
    fn test_unreachable_osrm_falls_back_to_haversine() {
        let osrm_client = OsrmMatrixClient::new(OsrmMatrixClientParams {
            osrm_url: String::from("http://127.0.0.1:9"),
            timeout: Duration::from_millis(500),
        })
        .unwrap();
        let client = TravelDurationClient::with_osrm_client(
            osrm_client,
            String::from("http://127.0.0.1:9"),
        );

        let durations = client.travel_durations(&points());

        assert_eq!(
            durations,
            as_the_crow_flies_durations(&points(), FALLBACK_SPEED_KMH)
        );
    }

    #[test]
    fn test_custom_durations_are_returned_as_is() {
        let custom = TravelDurations::from_rows(vec![
            vec![0, 100, 200],
            vec![100, 0, 50],
            vec![200, 50, 0],
        ]);
        let client = TravelDurationClient::new(TravelDurationProvider::Custom {
            durations: custom.clone(),
        })
        .unwrap();

        assert_eq!(client.travel_durations(&points()), custom);
    }

    #[test]
    fn test_custom_durations_with_wrong_size_fall_back() {
        let client = TravelDurationClient::new(TravelDurationProvider::Custom {
            durations: TravelDurations::from_rows(vec![vec![0]]),
        })
        .unwrap();

        assert_eq!(
            client.travel_durations(&points()),
            as_the_crow_flies_durations(&points(), FALLBACK_SPEED_KMH)
        );
    }

    #[test]
    fn test_as_the_crow_flies_uses_configured_speed() {
        let client =
            TravelDurationClient::new(TravelDurationProvider::AsTheCrowFlies { speed_kmh: 60.0 })
                .unwrap();

        assert_eq!(
            client.travel_durations(&points()),
            as_the_crow_flies_durations(&points(), 60.0)
        );
    }
}
