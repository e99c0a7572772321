pub mod client;

pub use client::ApiClient;

/// Logical data streams selectable via the `project` query parameter.
pub const PROJECT_LOAD_CELL: &str = "Load Cell";
pub const PROJECT_WEATHER_STATION: &str = "Weather Station";
