use std::env;

use dispatch_matrix::{
    travel_duration_client::FALLBACK_SPEED_KMH, travel_duration_provider::TravelDurationProvider,
};
use tracing::debug;

pub const OSRM_URL_ENV_VAR: &str = "DISPATCH_OSRM_URL";
pub const DEFAULT_OSRM_URL: &str = "http://osrm:5000";

/// Loads `.env.local` if present. Variables already set win.
pub fn load_env() {
    match dotenvy::from_filename("./.env.local") {
        Ok(path) => debug!("Loaded environment from {}", path.display()),
        Err(err) if err.not_found() => {}
        Err(err) => debug!("Ignoring .env.local: {err}"),
    }
}

pub fn osrm_url() -> String {
    env::var(OSRM_URL_ENV_VAR).unwrap_or_else(|_| String::from(DEFAULT_OSRM_URL))
}

/// OSRM unless `crow_flies` asks for the geometric estimate only.
pub fn travel_duration_provider(crow_flies: bool) -> TravelDurationProvider {
    if crow_flies {
        TravelDurationProvider::AsTheCrowFlies {
            speed_kmh: FALLBACK_SPEED_KMH,
        }
    } else {
        TravelDurationProvider::Osrm { url: osrm_url() }
    }
}
