//! CLI library components for the `mwb` binary.

pub mod logging;
pub mod render;
