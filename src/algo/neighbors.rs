//! Vertex neighbor graph.
//!
//! Two vertices are neighbors when they appear together in at least one
//! polygon. For triangle meshes this is the usual edge graph; for other
//! polygons every pair of vertices in the polygon is connected, not only
//! consecutive ones.
//!
//! # Example
//!
//! ```
//! use bicpl::algo::neighbors::{neighbor_graph, NeighborOptions};
//! use bicpl::mesh::build_from_triangles;
//! use nalgebra::Point3;
//!
//! let points = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//! ];
//! let obj = build_from_triangles(&points, &[[0, 1, 2], [1, 2, 3]]).unwrap();
//!
//! let graph = neighbor_graph(&obj, &NeighborOptions::default()).unwrap();
//! assert_eq!(graph.sorted(1), vec![0, 2, 3]);
//! assert_eq!(graph.num_edges(), 5);
//! ```

use std::collections::HashSet;
use std::ops::Index;

use log::debug;
use rayon::prelude::*;

use crate::error::{Result, ShapeError};
use crate::mesh::PolygonObj;

/// Options for building a neighbor graph.
#[derive(Debug, Clone)]
pub struct NeighborOptions {
    /// Fail if any polygon is not a triangle (default: true).
    pub triangles_only: bool,

    /// Whether to use parallel execution (default: false).
    ///
    /// Vertex ids are split into one range per rayon thread and each thread
    /// scans all polygons for its range, so memory stays at one set per
    /// vertex while the polygon scan is repeated once per thread.
    pub parallel: bool,
}

impl Default for NeighborOptions {
    fn default() -> Self {
        Self {
            triangles_only: true,
            parallel: false,
        }
    }
}

impl NeighborOptions {
    /// Set whether non-triangular polygons are an error.
    pub fn with_triangles_only(mut self, triangles_only: bool) -> Self {
        self.triangles_only = triangles_only;
        self
    }

    /// Accept polygons of any size.
    pub fn any_polygon(mut self) -> Self {
        self.triangles_only = false;
        self
    }

    /// Set whether to use parallel execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

/// For each vertex, the set of vertices sharing a polygon with it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NeighborGraph {
    neighbors: Vec<HashSet<usize>>,
}

impl NeighborGraph {
    /// Number of vertices.
    #[inline]
    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    /// Whether the graph has no vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    /// Neighbors of vertex `v`.
    ///
    /// # Panics
    ///
    /// Panics if `v >= self.len()`.
    #[inline]
    pub fn neighbors(&self, v: usize) -> &HashSet<usize> {
        &self.neighbors[v]
    }

    /// Neighbors of vertex `v` in ascending order.
    pub fn sorted(&self, v: usize) -> Vec<usize> {
        let mut sorted: Vec<usize> = self.neighbors[v].iter().copied().collect();
        sorted.sort_unstable();
        sorted
    }

    /// Number of neighbors of vertex `v`.
    #[inline]
    pub fn degree(&self, v: usize) -> usize {
        self.neighbors[v].len()
    }

    /// Number of undirected edges.
    pub fn num_edges(&self) -> usize {
        self.neighbors.iter().map(HashSet::len).sum::<usize>() / 2
    }

    /// Iterate over the neighbor sets in vertex order.
    pub fn iter(&self) -> std::slice::Iter<'_, HashSet<usize>> {
        self.neighbors.iter()
    }

    /// The neighbor sets, indexed by vertex.
    pub fn into_inner(self) -> Vec<HashSet<usize>> {
        self.neighbors
    }
}

impl Index<usize> for NeighborGraph {
    type Output = HashSet<usize>;

    fn index(&self, v: usize) -> &Self::Output {
        &self.neighbors[v]
    }
}

impl<'a> IntoIterator for &'a NeighborGraph {
    type Item = &'a HashSet<usize>;
    type IntoIter = std::slice::Iter<'a, HashSet<usize>>;

    fn into_iter(self) -> Self::IntoIter {
        self.neighbors.iter()
    }
}

/// Build the neighbor graph of a polygon object.
///
/// The result has one entry per point. With
/// [`triangles_only`](NeighborOptions::triangles_only) set, a polygon that
/// is not a triangle fails the whole computation with [`ShapeError`].
pub fn neighbor_graph(obj: &PolygonObj, options: &NeighborOptions) -> Result<NeighborGraph> {
    if options.triangles_only {
        if let Some((item, vertices)) = obj
            .polygon_sizes()
            .enumerate()
            .find(|&(_, size)| size != 3)
        {
            return Err(ShapeError::NotATriangle { item, vertices }.into());
        }
    }

    let n = obj.num_points();
    let mut neighbors = vec![HashSet::new(); n];
    if options.parallel {
        // Each task owns a contiguous range of vertex ids and scans every
        // polygon, inserting only into the sets it owns.
        let chunk_len = n.div_ceil(rayon::current_num_threads()).max(1);
        neighbors
            .par_chunks_mut(chunk_len)
            .enumerate()
            .for_each(|(chunk, sets)| {
                let start = chunk * chunk_len;
                let owned = start..start + sets.len();
                for polygon in obj.polygons() {
                    for &v in polygon.iter().filter(|v| owned.contains(v)) {
                        insert_neighbors(&mut sets[v - start], v, polygon);
                    }
                }
            });
    } else {
        for polygon in obj.polygons() {
            for &v in polygon {
                insert_neighbors(&mut neighbors[v], v, polygon);
            }
        }
    }

    let graph = NeighborGraph { neighbors };
    debug!(
        "neighbor graph: {} vertices, {} edges",
        graph.len(),
        graph.num_edges()
    );
    Ok(graph)
}

/// Add every other vertex of `polygon` to the neighbors of `v`.
fn insert_neighbors(set: &mut HashSet<usize>, v: usize, polygon: &[usize]) {
    set.extend(polygon.iter().copied().filter(|&u| u != v));
}
