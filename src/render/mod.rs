pub mod composite;
pub mod raster;
