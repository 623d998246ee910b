pub mod color;
pub mod ease;
pub mod interpolate;
pub mod spring;
