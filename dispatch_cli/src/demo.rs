use dispatch_optimizer::json::types::{
    Coordinates, DEFAULT_SHIFT_END, DEFAULT_SHIFT_START, DeliveryRequest, SolveRequest,
    WindowKind,
};

fn asap(request_id: i64, lat: f64, lon: f64, demand: i64) -> DeliveryRequest {
    DeliveryRequest {
        request_id,
        lat,
        lon,
        demand,
        window_kind: WindowKind::Asap,
        window_start: None,
        window_end: None,
        priority: None,
    }
}

fn urgent(
    request_id: i64,
    lat: f64,
    lon: f64,
    demand: i64,
    start: &str,
    end: &str,
) -> DeliveryRequest {
    DeliveryRequest {
        window_kind: WindowKind::Hard,
        window_start: Some(start.to_owned()),
        window_end: Some(end.to_owned()),
        priority: Some(1),
        ..asap(request_id, lat, lon, demand)
    }
}

/// Twelve orders spread over Montes Claros, three drivers carrying five units.
pub fn demo_request() -> SolveRequest {
    SolveRequest {
        job_id: None,
        plan_version: None,
        depot: Coordinates {
            lat: -16.734440968489228,
            lon: -43.877211192130325,
        },
        shift_start: String::from(DEFAULT_SHIFT_START),
        shift_end: String::from(DEFAULT_SHIFT_END),
        drivers: vec![1, 2, 3],
        vehicle_capacity: 5,
        vehicle_capacities: None,
        requests: vec![
            // downtown
            urgent(101, -16.7210, -43.8610, 2, "09:00", "11:00"),
            asap(102, -16.7265, -43.8590, 1),
            // north
            asap(103, -16.7050, -43.8600, 3),
            urgent(104, -16.7080, -43.8550, 2, "10:00", "12:00"),
            // south
            asap(105, -16.7400, -43.8700, 1),
            asap(106, -16.7380, -43.8650, 2),
            // east
            urgent(107, -16.7150, -43.8450, 1, "08:30", "10:00"),
            asap(108, -16.7180, -43.8480, 2),
            // west
            asap(109, -16.7200, -43.8800, 3),
            asap(110, -16.7230, -43.8750, 1),
            // far north
            urgent(111, -16.6950, -43.8550, 2, "14:00", "16:00"),
            asap(112, -16.6980, -43.8520, 1),
        ],
    }
}
