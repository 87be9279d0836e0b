//! Data sources that are not read from disk.

pub mod sample;

pub use sample::{generate_demo_fares, generate_reference_points, reference_rng};
