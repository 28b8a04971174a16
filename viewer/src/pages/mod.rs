pub mod about;
pub mod debug;
pub mod latest;
pub mod trends;
