//! Builder utilities for configuring [`SynapseFlow`] runs.
//!
//! Exposes the execution strategy selection surface and the bandwidth
//! validation performed before a [`SynapseFlow`] is constructed.

use crate::{Result, error::ArgumentError};

use super::{ExecutionStrategy, SynapseFlow};

/// Configures and constructs [`SynapseFlow`] instances.
///
/// # Examples
/// ```
/// use arbor_core::{ExecutionStrategy, SynapseFlowBuilder};
///
/// let flow = SynapseFlowBuilder::new()
///     .with_bandwidths([2_000.0, 8_000.0])
///     .with_execution_strategy(ExecutionStrategy::Sequential)
///     .build()
///     .expect("builder configuration is valid");
/// assert_eq!(flow.bandwidths(), &[2_000.0, 8_000.0]);
/// assert_eq!(flow.execution_strategy(), ExecutionStrategy::Sequential);
/// ```
#[derive(Debug, Clone)]
pub struct SynapseFlowBuilder {
    bandwidths: Vec<f64>,
    execution_strategy: ExecutionStrategy,
}

impl Default for SynapseFlowBuilder {
    fn default() -> Self {
        Self {
            bandwidths: Vec::new(),
            execution_strategy: ExecutionStrategy::Auto,
        }
    }
}

impl SynapseFlowBuilder {
    /// Creates a builder with no bandwidths and [`ExecutionStrategy::Auto`].
    ///
    /// # Examples
    /// ```
    /// use arbor_core::{ExecutionStrategy, SynapseFlowBuilder};
    ///
    /// let builder = SynapseFlowBuilder::new();
    /// assert!(builder.bandwidths().is_empty());
    /// assert_eq!(builder.execution_strategy(), ExecutionStrategy::Auto);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the smoothing bandwidths, in the units of the node locations.
    ///
    /// Results are reported in the order given here.
    #[must_use]
    pub fn with_bandwidths(mut self, bandwidths: impl IntoIterator<Item = f64>) -> Self {
        self.bandwidths = bandwidths.into_iter().collect();
        self
    }

    /// Returns the configured bandwidths.
    #[must_use]
    pub fn bandwidths(&self) -> &[f64] {
        &self.bandwidths
    }

    /// Sets how per-bandwidth work is scheduled.
    #[must_use]
    pub fn with_execution_strategy(mut self, strategy: ExecutionStrategy) -> Self {
        self.execution_strategy = strategy;
        self
    }

    /// Returns the currently configured execution strategy.
    #[must_use]
    pub fn execution_strategy(&self) -> ExecutionStrategy {
        self.execution_strategy
    }

    /// Validates the configuration and constructs a [`SynapseFlow`].
    ///
    /// # Errors
    /// Returns [`ArgumentError::EmptyBandwidths`] when no bandwidth was given
    /// and [`ArgumentError::InvalidBandwidth`] for the first bandwidth that is
    /// zero, negative or not finite.
    ///
    /// # Examples
    /// ```
    /// use arbor_core::{ArgumentErrorCode, SynapseFlowBuilder};
    ///
    /// let err = SynapseFlowBuilder::new()
    ///     .with_bandwidths([1.0, -3.0])
    ///     .build()
    ///     .expect_err("negative bandwidth is rejected");
    /// assert_eq!(err.argument_code(), Some(ArgumentErrorCode::InvalidBandwidth));
    /// ```
    pub fn build(self) -> Result<SynapseFlow> {
        if self.bandwidths.is_empty() {
            return Err(ArgumentError::EmptyBandwidths.into());
        }
        if let Some(&value) = self
            .bandwidths
            .iter()
            .find(|value| !value.is_finite() || **value <= 0.0)
        {
            return Err(ArgumentError::InvalidBandwidth { value }.into());
        }
        Ok(SynapseFlow::new(self.bandwidths, self.execution_strategy))
    }
}
