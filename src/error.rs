//! Error types of the crate.

use thiserror::Error;

use crate::graphs::Vertex;

/// Errors while reading or writing a graph file.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("failed to access graph file: {0}")]
    Io(#[from] std::io::Error),

    #[error("unsupported graph file extension {0:?}")]
    UnsupportedExtension(String),

    /// The file ended before the named section was complete.
    #[error("graph file ended while reading {0}")]
    UnexpectedEnd(&'static str),

    #[error("line {line}: {message}")]
    Malformed { line: usize, message: String },

    #[error("bincode error: {0}")]
    Bincode(#[from] bincode::Error),
}

/// Errors returned to the caller of a search.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("vertex {vertex} is out of range, graph has {number_of_vertices} vertices")]
    VertexOutOfRange {
        vertex: Vertex,
        number_of_vertices: u32,
    },

    /// Both directions ran out of vertices without meeting.
    #[error("no path from {from} to {target}")]
    NoPathFound { from: Vertex, target: Vertex },

    #[error("search worker {name} panicked")]
    WorkerPanicked { name: String },

    #[error("failed to spawn search worker: {0}")]
    Spawn(#[from] std::io::Error),
}
