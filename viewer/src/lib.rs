pub mod chart;
pub mod errors;
pub mod http;
pub mod model;
pub mod pages;
pub mod render;
pub mod services;
