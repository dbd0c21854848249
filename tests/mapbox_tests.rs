use geo::{Distance, Haversine, Point};
use loopwalk::config::LoopGeneratorConfig;
use loopwalk::models::{Coordinates, TransportMode};
use loopwalk::services::loop_generator::{LoopRouteGenerator, LoopRouteParams};
use loopwalk::services::mapbox::{MapboxClient, RoutingProvider};
use std::sync::Arc;

mod common;

fn client() -> MapboxClient {
    let api_key =
        std::env::var("MAPBOX_API_KEY").expect("MAPBOX_API_KEY must be set for integration tests");
    MapboxClient::new(api_key)
}

#[tokio::test]
async fn test_mapbox_loop_returns_to_start() {
    if common::should_skip_real_api_tests() {
        println!("Skipping real API test");
        return;
    }

    let start = common::nyc();
    let waypoints = vec![
        start,
        Coordinates::new(40.7180, -74.0000).unwrap(),
        Coordinates::new(40.7080, -73.9980).unwrap(),
        start,
    ];

    let directions = client()
        .get_directions(&waypoints, &TransportMode::Walk)
        .await
        .expect("Loop route should succeed");

    assert!(directions.distance_meters > 0.0);
    assert!(!directions.steps.is_empty(), "Steps were requested");

    let coords = directions.to_coordinates();
    let first = coords.first().unwrap();
    let last = coords.last().unwrap();
    let gap_m = Haversine.distance(
        Point::new(first.lng, first.lat),
        Point::new(last.lng, last.lat),
    );
    assert!(gap_m < 100.0, "Loop should return to start");
}

#[tokio::test]
async fn test_mapbox_refinement_run() {
    if common::should_skip_real_api_tests() {
        println!("Skipping real API test");
        return;
    }

    let generator = LoopRouteGenerator::new(Arc::new(client()), LoopGeneratorConfig::default());
    let mode = TransportMode::Walk;

    let route = generator
        .generate_loop_route(
            LoopRouteParams {
                start: common::nyc(),
                target_miles: 3.0,
                mode: &mode,
                boundary: None,
                radius_override_m: None,
            },
            Some(7),
        )
        .await
        .expect("Refinement run should succeed");

    assert!(route.attempts >= 1 && route.attempts <= 4);
    assert_eq!(route.waypoints.len(), 4);
    assert!(route.distance_miles > 0.0);
}
