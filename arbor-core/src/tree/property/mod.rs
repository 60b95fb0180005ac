//! Property-based tests for the tree topology toolkit.
//!
//! Random trees of several shapes are generated from seeded `SmallRng`
//! streams, with their rows shuffled so that iteration order never matches
//! depth order by accident. The properties cover re-rooting, hop counts,
//! common ancestors, partitioning and spanning subtrees.

mod strategies;
