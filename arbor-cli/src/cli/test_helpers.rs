//! Small helpers shared across CLI tests.

use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use tempfile::TempDir;

use super::{Cli, CliError, run_cli};

pub(super) fn temp_dir() -> TempDir {
    match TempDir::new() {
        Ok(dir) => dir,
        Err(err) => panic!("failed to create temp dir: {err}"),
    }
}

pub(super) fn write_document(dir: &TempDir, name: &str, contents: &str) -> io::Result<PathBuf> {
    let path = dir.path().join(name);
    let mut file = File::create(&path)?;
    file.write_all(contents.as_bytes())?;
    Ok(path)
}

pub(super) fn run_cli_expecting_error(cli: Cli, panic_msg: &str) -> CliError {
    match run_cli(cli) {
        Ok(_) => panic!("{panic_msg}"),
        Err(err) => err,
    }
}

/// Five-node fork with an output on node 3 and two inputs on node 5:
///
/// ```text
/// 1 - 2 - 3
///     |
///     4 - 5
/// ```
///
/// Connector 30 has two downstream partners in other skeletons.
pub(super) const FORK_DOCUMENT: &str = r#"{
  "nodes": [
    {"id": 1, "parent": null, "location": {"x": 0.0, "y": 0.0, "z": 0.0}},
    {"id": 2, "parent": 1, "location": {"x": 1000.0, "y": 0.0, "z": 0.0}},
    {"id": 3, "parent": 2, "location": {"x": 2000.0, "y": 0.0, "z": 0.0}},
    {"id": 4, "parent": 2, "location": {"x": 1000.0, "y": 1000.0, "z": 0.0}},
    {"id": 5, "parent": 4, "location": {"x": 1000.0, "y": 2000.0, "z": 0.0}}
  ],
  "synapses": [
    {"node": 3, "connector": 30, "role": "presynaptic_to"},
    {"node": 5, "connector": 50, "role": "postsynaptic_to"},
    {"node": 5, "connector": 51, "role": "postsynaptic_to"}
  ],
  "connector_links": [
    {"node": 3, "connector": 30, "role": "presynaptic_to"},
    {"node": 900, "connector": 30, "role": "postsynaptic_to"},
    {"node": 901, "connector": 30, "role": "postsynaptic_to"}
  ]
}"#;
