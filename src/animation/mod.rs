pub mod sampler;
pub mod track;
