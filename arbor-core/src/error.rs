//! Error types for the arbor core library.
//!
//! Tree construction failures, caller argument failures and degenerate
//! numeric results are kept in separate enums so callers can match on the
//! class of problem; [`ArborError`] wraps them for the public API.

use std::fmt;

use thiserror::Error;

use crate::{flow::ExecutionStrategy, skeleton::ConnectorId, tree::NodeId};

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// The node/parent rows do not describe a single rooted tree.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum TreeError {
    /// No rows were supplied.
    #[error("tree contains no nodes")]
    Empty,
    /// The same node id appeared in more than one row.
    #[error("node {node} appears more than once")]
    DuplicateNode {
        /// The repeated node id.
        node: NodeId,
    },
    /// A row referenced a parent that is not part of the tree.
    #[error("node {node} references unknown parent {parent}")]
    UnknownParent {
        /// The child whose parent is missing.
        node: NodeId,
        /// The missing parent id.
        parent: NodeId,
    },
    /// Every node has a parent.
    #[error("tree has no root node")]
    NoRoot,
    /// More than one node lacks a parent.
    #[error("tree has more than one root (found {first} and {second})")]
    MultipleRoots {
        /// The first parentless node encountered.
        first: NodeId,
        /// The second parentless node encountered.
        second: NodeId,
    },
    /// A node is not reachable from the root, so its parent chain loops.
    #[error("node {node} lies on a parent cycle")]
    Cycle {
        /// A node that could not be reached from the root.
        node: NodeId,
    },
    /// A node carried a NaN or infinite coordinate.
    #[error("node {node} has a non-finite location")]
    NonFiniteLocation {
        /// The node with the invalid coordinate.
        node: NodeId,
    },
}

define_error_codes! {
    /// Stable codes describing [`TreeError`] variants.
    enum TreeErrorCode for TreeError {
        /// No rows were supplied.
        Empty => Empty => "ARBOR_TREE_EMPTY",
        /// The same node id appeared in more than one row.
        DuplicateNode => DuplicateNode { .. } => "ARBOR_TREE_DUPLICATE_NODE",
        /// A row referenced a parent that is not part of the tree.
        UnknownParent => UnknownParent { .. } => "ARBOR_TREE_UNKNOWN_PARENT",
        /// Every node has a parent.
        NoRoot => NoRoot => "ARBOR_TREE_NO_ROOT",
        /// More than one node lacks a parent.
        MultipleRoots => MultipleRoots { .. } => "ARBOR_TREE_MULTIPLE_ROOTS",
        /// A node is not reachable from the root.
        Cycle => Cycle { .. } => "ARBOR_TREE_CYCLE",
        /// A node carried a NaN or infinite coordinate.
        NonFiniteLocation => NonFiniteLocation { .. } => "ARBOR_TREE_NON_FINITE_LOCATION",
    }
}

/// A caller-supplied argument is unusable for the requested operation.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ArgumentError {
    /// An operation that needs at least one node received none.
    #[error("`{operation}` requires at least one node")]
    EmptyNodeSet {
        /// Name of the operation that rejected the input.
        operation: &'static str,
    },
    /// A node id is not part of the tree.
    #[error("node {node} is not part of the tree")]
    UnknownNode {
        /// The missing node id.
        node: NodeId,
    },
    /// A node supplied as the root is not the root of the tree.
    #[error("node {node} is not the root of the tree")]
    NotRoot {
        /// The node that was supplied as root.
        node: NodeId,
    },
    /// Precomputed root distances disagree with the parent links of the tree.
    #[error("precomputed root distances are inconsistent with the tree at node {node}")]
    InconsistentDistances {
        /// The node at which the parent walk ran out before the distances did.
        node: NodeId,
    },
    /// A synapse row references a node that is not part of the tree.
    #[error("synapse on connector {connector} references node {node}, which is not part of the tree")]
    UnknownSynapseNode {
        /// The missing node id.
        node: NodeId,
        /// Connector of the offending synapse row.
        connector: ConnectorId,
    },
    /// A smoothing bandwidth was zero, negative or non-finite.
    #[error("bandwidth must be finite and positive (got {value})")]
    InvalidBandwidth {
        /// The rejected bandwidth.
        value: f64,
    },
    /// No smoothing bandwidths were configured.
    #[error("at least one bandwidth is required")]
    EmptyBandwidths,
    /// Weighted segregation was requested but a presynaptic connector has no
    /// target count.
    #[error("no target count is known for presynaptic connector {connector}")]
    MissingTargetCount {
        /// The connector lacking a count.
        connector: ConnectorId,
    },
}

define_error_codes! {
    /// Stable codes describing [`ArgumentError`] variants.
    enum ArgumentErrorCode for ArgumentError {
        /// An operation that needs at least one node received none.
        EmptyNodeSet => EmptyNodeSet { .. } => "ARBOR_ARGUMENT_EMPTY_NODE_SET",
        /// A node id is not part of the tree.
        UnknownNode => UnknownNode { .. } => "ARBOR_ARGUMENT_UNKNOWN_NODE",
        /// A node supplied as the root is not the root of the tree.
        NotRoot => NotRoot { .. } => "ARBOR_ARGUMENT_NOT_ROOT",
        /// Precomputed root distances disagree with the parent links of the tree.
        InconsistentDistances => InconsistentDistances { .. } => "ARBOR_ARGUMENT_INCONSISTENT_DISTANCES",
        /// A synapse row references a node that is not part of the tree.
        UnknownSynapseNode => UnknownSynapseNode { .. } => "ARBOR_ARGUMENT_UNKNOWN_SYNAPSE_NODE",
        /// A smoothing bandwidth was zero, negative or non-finite.
        InvalidBandwidth => InvalidBandwidth { .. } => "ARBOR_ARGUMENT_INVALID_BANDWIDTH",
        /// No smoothing bandwidths were configured.
        EmptyBandwidths => EmptyBandwidths => "ARBOR_ARGUMENT_EMPTY_BANDWIDTHS",
        /// A presynaptic connector has no target count.
        MissingTargetCount => MissingTargetCount { .. } => "ARBOR_ARGUMENT_MISSING_TARGET_COUNT",
    }
}

/// Error type returned by the public arbor API.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ArborError {
    /// The input does not form a valid rooted tree.
    #[error(transparent)]
    Tree(#[from] TreeError),
    /// A caller-supplied argument was rejected.
    #[error(transparent)]
    Argument(#[from] ArgumentError),
    /// The whole arbor carries a single synapse role, so the segregation
    /// index has a zero denominator.
    #[error(
        "segregation index is undefined: all {synapses} synapses share one role (presynaptic fraction {fraction})"
    )]
    DegenerateSegregation {
        /// Number of synapse entries that were scored.
        synapses: usize,
        /// Presynaptic fraction of the whole arbor (0 or 1, or NaN when empty).
        fraction: f64,
    },
    /// The requested execution strategy is unavailable in the current build.
    #[error("the requested execution strategy {requested:?} is not available in this build")]
    BackendUnavailable {
        /// Strategy that could not be satisfied by the current build.
        requested: ExecutionStrategy,
    },
}

define_error_codes! {
    /// Stable codes describing [`ArborError`] variants.
    enum ArborErrorCode for ArborError {
        /// The input does not form a valid rooted tree.
        InvalidTree => Tree { .. } => "ARBOR_INVALID_TREE",
        /// A caller-supplied argument was rejected.
        InvalidArgument => Argument { .. } => "ARBOR_INVALID_ARGUMENT",
        /// The segregation index has a zero denominator.
        DegenerateResult => DegenerateSegregation { .. } => "ARBOR_DEGENERATE_RESULT",
        /// The requested execution strategy is unavailable in the current build.
        BackendUnavailable => BackendUnavailable { .. } => "ARBOR_BACKEND_UNAVAILABLE",
    }
}

impl ArborError {
    /// Retrieve the inner [`TreeErrorCode`] when the error describes an invalid tree.
    #[must_use]
    pub const fn tree_code(&self) -> Option<TreeErrorCode> {
        match self {
            Self::Tree(error) => Some(error.code()),
            _ => None,
        }
    }

    /// Retrieve the inner [`ArgumentErrorCode`] when the error describes a
    /// rejected argument.
    #[must_use]
    pub const fn argument_code(&self) -> Option<ArgumentErrorCode> {
        match self {
            Self::Argument(error) => Some(error.code()),
            _ => None,
        }
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, ArborError>;
