pub mod integrate;
pub mod params;
