//! Concurrent bidirectional goal directed path search on road graphs.
//!
//! The entry point is [`search::bidirectional::BidirectionalSearch`]. Graphs
//! are read with [`graphs::graph_factory::GraphFactory`].

pub mod error;
pub mod graphs;
pub mod search;
pub mod utility;
