pub mod loop_generator;
pub mod mapbox;
