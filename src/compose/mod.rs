pub mod align;
pub mod frame;
pub mod geometry;
pub mod overlay;
pub mod plan;
pub mod text;
