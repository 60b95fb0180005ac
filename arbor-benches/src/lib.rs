//! Benchmark support crate for arbor.
//!
//! Generates seeded synthetic neurons and carries the parameter types used by
//! the Criterion benchmarks for tree topology operations and synapse-flow
//! clustering.

pub mod error;
pub mod params;
pub mod synthetic;
