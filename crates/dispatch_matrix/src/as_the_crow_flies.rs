use geo::{Distance, Haversine};

use crate::travel_durations::TravelDurations;

/// Durations at a constant speed, truncated to whole seconds.
pub fn as_the_crow_flies_durations(points: &[geo_types::Point], speed_kmh: f64) -> TravelDurations {
    let num_points = points.len();
    let meters_per_second = speed_kmh * 1000.0 / 3600.0;
    let mut durations: Vec<i64> = vec![0; num_points * num_points];

    for (i, &from) in points.iter().enumerate() {
        for (j, &to) in points.iter().enumerate() {
            if i == j {
                continue;
            }

            let distance = Haversine.distance(from, to);
            durations[i * num_points + j] = (distance / meters_per_second) as i64;
        }
    }

    TravelDurations {
        durations,
        num_locations: num_points,
    }
}
