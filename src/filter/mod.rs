pub mod kernels;
pub mod params;
pub mod pipeline;
