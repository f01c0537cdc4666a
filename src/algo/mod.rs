//! Algorithms on polygon objects.
//!
//! - **Neighbors**: per-vertex sets of vertices sharing a polygon
//! - **Statistics**: counts, degrees and Euler characteristic

pub mod neighbors;
pub mod stats;

pub use neighbors::{neighbor_graph, NeighborGraph, NeighborOptions};
pub use stats::MeshStats;
