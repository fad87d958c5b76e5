//! Error types for nearmiss-core

use thiserror::Error;

use crate::Strategy;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Malformed address: {0}")]
    MalformedAddress(String),

    #[error("Index holds no targets")]
    EmptyTargetSet,

    #[error("The {strategy} index cannot be extended after construction; rebuild it instead")]
    UnsupportedExtend { strategy: Strategy },

    #[error("Query is below every stored target")]
    NoPredecessor,

    #[error("Unknown strategy: {0} (expected trie, nearest or bisect)")]
    UnknownStrategy(String),

    #[error("Trie node capacity exceeded ({nodes} nodes)")]
    TrieCapacityExceeded { nodes: usize },
}
