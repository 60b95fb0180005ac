//! Entropy-based segregation of synaptic inputs and outputs.

use std::collections::HashMap;

use crate::{
    ArborError, Result,
    error::ArgumentError,
    skeleton::{ConnectorId, SynapseRole, SynapseRow},
};

use super::result::SynapseGroup;

/// Downstream partner counts per presynaptic connector.
///
/// # Examples
/// ```
/// use arbor_core::{SynapseRow, TargetCounts};
///
/// let counts = TargetCounts::from_links([
///     SynapseRow::presynaptic(1, 500),
///     SynapseRow::postsynaptic(8, 500),
///     SynapseRow::postsynaptic(9, 500),
/// ]);
/// assert_eq!(counts.get(500), Some(2));
/// assert_eq!(counts.get(501), None);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TargetCounts {
    counts: HashMap<ConnectorId, usize>,
}

impl TargetCounts {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts postsynaptic links per connector across every skeleton's
    /// connector links.
    pub fn from_links(links: impl IntoIterator<Item = SynapseRow>) -> Self {
        let mut counts = HashMap::new();
        for link in links {
            match link.role {
                SynapseRole::Postsynaptic => *counts.entry(link.connector).or_insert(0) += 1,
                SynapseRole::Presynaptic => {
                    counts.entry(link.connector).or_insert(0);
                }
            }
        }
        Self { counts }
    }

    /// Sets the count for `connector`, returning the previous one.
    pub fn insert(&mut self, connector: ConnectorId, targets: usize) -> Option<usize> {
        self.counts.insert(connector, targets)
    }

    /// Count for `connector`, if known.
    #[must_use]
    pub fn get(&self, connector: ConnectorId) -> Option<usize> {
        self.counts.get(&connector).copied()
    }

    /// Number of connectors with a count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Returns `true` when no counts are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

impl FromIterator<(ConnectorId, usize)> for TargetCounts {
    fn from_iter<I: IntoIterator<Item = (ConnectorId, usize)>>(iter: I) -> Self {
        Self {
            counts: iter.into_iter().collect(),
        }
    }
}

/// How synapse rows are weighted when scoring segregation.
#[derive(Clone, Copy, Debug)]
pub enum SegregationWeights<'a> {
    /// Every row counts once.
    Uniform,
    /// Presynaptic rows count once per downstream partner of their
    /// connector; postsynaptic rows count once.
    TargetCounts(&'a TargetCounts),
}

#[derive(Clone, Copy, Debug, Default)]
struct Tally {
    outputs: f64,
    total: f64,
}

impl Tally {
    #[expect(
        clippy::float_arithmetic,
        reason = "Weighted tallies accumulate floating-point counts."
    )]
    fn add(&mut self, role: SynapseRole, weight: f64) {
        if role == SynapseRole::Presynaptic {
            self.outputs += weight;
        }
        self.total += weight;
    }

    #[expect(
        clippy::float_arithmetic,
        reason = "Merging tallies sums floating-point counts."
    )]
    fn merge(self, other: Self) -> Self {
        Self {
            outputs: self.outputs + other.outputs,
            total: self.total + other.total,
        }
    }

    #[expect(
        clippy::float_arithmetic,
        reason = "The fraction of outputs is a floating-point ratio."
    )]
    fn fraction(self) -> f64 {
        self.outputs / self.total
    }

    /// `n · (p ln p + (1 − p) ln(1 − p))`, taken as zero for pure or empty
    /// tallies.
    #[expect(
        clippy::float_arithmetic,
        reason = "Binary entropy requires floating-point arithmetic."
    )]
    fn entropy(self) -> f64 {
        if self.total <= 0.0 {
            return 0.0;
        }
        let p = self.fraction();
        if p <= 0.0 || p >= 1.0 {
            return 0.0;
        }
        let q = 1.0 - p;
        self.total * p.mul_add(p.ln(), q * q.ln())
    }
}

/// Scores how cleanly `groups` separate presynaptic from postsynaptic sites.
///
/// Returns `1 − ΣH(g) / H_unseg`: `1.0` when every group is purely input or
/// purely output, `0.0` when the groups are no better than the whole-arbor
/// ratio, and negative values when they are worse.
///
/// # Errors
/// Returns [`ArgumentError::MissingTargetCount`] when weighting by target
/// counts and a presynaptic connector has no entry, and
/// [`ArborError::DegenerateSegregation`] when the whole arbor carries a single
/// role, so the score is undefined.
///
/// # Examples
/// ```
/// use arbor_core::{SegregationWeights, SynapseGroup, SynapseMember, SynapseRole, segregation_index};
///
/// let member = |node, role| SynapseMember { node, connector: node * 10, role };
/// let groups = [
///     SynapseGroup::new(1, vec![member(1, SynapseRole::Presynaptic)]),
///     SynapseGroup::new(2, vec![member(2, SynapseRole::Postsynaptic)]),
/// ];
/// assert_eq!(segregation_index(&groups, SegregationWeights::Uniform)?, 1.0);
/// # Ok::<(), arbor_core::ArborError>(())
/// ```
#[expect(
    clippy::float_arithmetic,
    reason = "The index is a ratio of floating-point entropies."
)]
pub fn segregation_index(groups: &[SynapseGroup], weights: SegregationWeights<'_>) -> Result<f64> {
    let mut tallies = Vec::with_capacity(groups.len());
    for group in groups {
        let mut tally = Tally::default();
        for member in group.members() {
            let weight = match (weights, member.role) {
                (SegregationWeights::TargetCounts(counts), SynapseRole::Presynaptic) => {
                    counts
                        .get(member.connector)
                        .ok_or(ArgumentError::MissingTargetCount {
                            connector: member.connector,
                        })? as f64
                }
                _ => 1.0,
            };
            tally.add(member.role, weight);
        }
        tallies.push(tally);
    }

    let whole = tallies.iter().copied().fold(Tally::default(), Tally::merge);
    let unsegregated = whole.entropy();
    if unsegregated == 0.0 {
        return Err(ArborError::DegenerateSegregation {
            synapses: groups.iter().map(SynapseGroup::len).sum(),
            fraction: whole.fraction(),
        });
    }
    let partial: f64 = tallies.iter().map(|tally| tally.entropy()).sum();
    Ok(1.0 - partial / unsegregated)
}
