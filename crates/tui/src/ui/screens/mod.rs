pub mod browse;
pub mod detail;
pub mod stats;
pub mod submit;
