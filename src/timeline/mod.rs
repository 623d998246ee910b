pub mod resolve;
pub mod sequence;
