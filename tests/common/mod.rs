use async_trait::async_trait;
use loopwalk::config::LoopGeneratorConfig;
use loopwalk::error::{AppError, Result};
use loopwalk::models::{Coordinates, TransportMode};
use loopwalk::services::loop_generator::LoopRouteGenerator;
use loopwalk::services::mapbox::{DirectionsResponse, RoutingProvider};
use loopwalk::AppState;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// What the scripted provider should do on its next call
#[allow(dead_code)]
pub enum Reply {
    Distance(f64),
    NoRoute,
    Transport(&'static str),
}

/// Routing provider that replays a fixed script and records every request
#[derive(Default)]
pub struct ScriptedRoutingProvider {
    replies: Mutex<VecDeque<Reply>>,
    calls: Mutex<Vec<Vec<Coordinates>>>,
}

#[allow(dead_code)]
impl ScriptedRoutingProvider {
    pub fn new(replies: Vec<Reply>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<Vec<Coordinates>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl RoutingProvider for ScriptedRoutingProvider {
    async fn get_directions(
        &self,
        waypoints: &[Coordinates],
        _mode: &TransportMode,
    ) -> Result<DirectionsResponse> {
        self.calls.lock().unwrap().push(waypoints.to_vec());
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .expect("scripted provider ran out of replies");

        match reply {
            Reply::Distance(distance_meters) => Ok(DirectionsResponse {
                distance_meters,
                duration_seconds: distance_meters / 1.4,
                geometry: waypoints.iter().map(|c| [c.lng, c.lat]).collect(),
                steps: vec![],
            }),
            Reply::NoRoute => Err(AppError::no_route_found()),
            Reply::Transport(msg) => Err(AppError::RoutingApi(msg.to_string())),
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

#[allow(dead_code)]
pub fn nyc() -> Coordinates {
    Coordinates::new(40.7128, -74.0060).unwrap()
}

#[allow(dead_code)]
pub fn square_boundary() -> Vec<Coordinates> {
    vec![
        Coordinates::new(40.710, -74.010).unwrap(),
        Coordinates::new(40.710, -74.002).unwrap(),
        Coordinates::new(40.716, -74.002).unwrap(),
        Coordinates::new(40.716, -74.010).unwrap(),
    ]
}

#[allow(dead_code)]
pub fn generator(provider: Arc<ScriptedRoutingProvider>) -> LoopRouteGenerator {
    LoopRouteGenerator::new(provider, LoopGeneratorConfig::default())
}

#[allow(dead_code)]
pub fn app_state(provider: Arc<ScriptedRoutingProvider>) -> Arc<AppState> {
    Arc::new(AppState {
        loop_generator: generator(provider),
    })
}

/// Check if we should skip real API tests
#[allow(dead_code)]
pub fn should_skip_real_api_tests() -> bool {
    std::env::var("SKIP_REAL_API_TESTS").is_ok() || std::env::var("MAPBOX_API_KEY").is_err()
}
