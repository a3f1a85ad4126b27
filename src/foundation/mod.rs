pub mod error;
pub mod math;
pub mod pixel;
pub mod time;
