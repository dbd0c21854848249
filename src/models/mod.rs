pub mod coordinates;
pub mod distance;
pub mod route;

pub use coordinates::Coordinates;
pub use distance::{DistanceMeters, DistanceMiles, RadiusMeters};
pub use route::{
    DirectionsRequest, LoopRoute, LoopRouteRequest, LoopRouteResponse, RouteStep, TransportMode,
};
