pub mod params;
pub mod query;
pub mod sink;
