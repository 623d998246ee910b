pub mod cue;
pub mod manifest;
