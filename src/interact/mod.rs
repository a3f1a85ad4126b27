pub mod engine;
pub mod magnet;
