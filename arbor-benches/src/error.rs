//! Benchmark setup error type.

use arbor_core::ArborError;

use crate::synthetic::SyntheticError;

/// Errors that may occur while preparing benchmark inputs.
#[derive(Debug, thiserror::Error)]
pub enum BenchSetupError {
    /// Synthetic neuron generation failed.
    #[error("synthetic neuron generation failed: {0}")]
    Synthetic(#[from] SyntheticError),
    /// The engine rejected the generated input.
    #[error("arbor operation failed: {0}")]
    Arbor(#[from] ArborError),
}
