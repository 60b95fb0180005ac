//! JSON input documents.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use arbor_core::{Skeleton, SynapseRow, TargetCounts};
use serde::Deserialize;
use tracing::{Span, field, instrument};

use super::CliError;

/// One skeleton as exported by the tracing platform.
///
/// ```json
/// {
///   "nodes": [{"id": 1, "parent": null, "location": {"x": 0.0, "y": 0.0, "z": 0.0}}],
///   "synapses": [{"node": 1, "connector": 7, "role": "presynaptic_to"}],
///   "connector_links": [{"node": 90, "connector": 7, "role": "postsynaptic_to"}]
/// }
/// ```
///
/// `connector_links` lists every link of the connectors this skeleton touches,
/// including links to other skeletons. It is only needed for weighted
/// segregation.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct SkeletonDocument {
    /// Node and synapse rows of the skeleton.
    #[serde(flatten)]
    pub skeleton: Skeleton,
    /// All links of the connectors referenced by `skeleton.synapses`.
    #[serde(default)]
    pub connector_links: Vec<SynapseRow>,
}

impl SkeletonDocument {
    /// Downstream partner counts per connector, taken from `connector_links`.
    #[must_use]
    pub fn target_counts(&self) -> TargetCounts {
        TargetCounts::from_links(self.connector_links.iter().copied())
    }
}

#[instrument(name = "cli.load_document", err, fields(path = field::Empty))]
pub(super) fn load_document(path: &Path) -> Result<SkeletonDocument, CliError> {
    Span::current().record("path", field::display(path.display()));
    let file = File::open(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| CliError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
