pub mod debug;
pub mod latest;
pub mod station_image;
pub mod trends;
