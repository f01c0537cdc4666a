//! # bicpl
//!
//! Read, write and analyze polygonal surfaces in the MNI `.obj` format used
//! by the MNI BIC neuroimaging tools (surface extraction pipelines such as
//! CIVET produce cortical surfaces in this format).
//!
//! ## Features
//!
//! - **Polygon objects**: an immutable, always-valid [`PolygonObj`](mesh::PolygonObj)
//!   mirroring the file layout
//! - **Exact round trip**: parsing a written object gives back the same object
//! - **Neighbor graph**: per-vertex sets of vertices sharing a polygon
//! - **Batch loading**: many files loaded in parallel
//!
//! Only polygon objects with a single colour are supported. Line, quadmesh
//! and other object kinds, and per-polygon or per-vertex colours, are
//! rejected with an error.
//!
//! ## Quick Start
//!
//! ```no_run
//! use bicpl::prelude::*;
//!
//! // Load an object
//! let obj: PolygonObj = bicpl::io::load("surf.obj").unwrap();
//!
//! println!("Points: {}", obj.num_points());
//! println!("Polygons: {}", obj.num_items());
//!
//! // Vertex neighbors (fails unless every polygon is a triangle)
//! let graph = obj.neighbor_graph(true).unwrap();
//! println!("Neighbors of vertex 0: {:?}", graph.sorted(0));
//!
//! // Save it again
//! bicpl::io::save(&obj, "copy.obj").unwrap();
//! ```
//!
//! ## Building Objects Programmatically
//!
//! ```
//! use bicpl::prelude::*;
//! use nalgebra::Point3;
//!
//! let points = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//!     Point3::new(0.5, 0.5, 1.0),
//! ];
//! let faces = vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]];
//!
//! let obj = build_from_triangles(&points, &faces).unwrap();
//! let text = bicpl::io::serialize(&obj);
//! assert_eq!(bicpl::io::parse(&text).unwrap(), obj);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod io;
pub mod mesh;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use bicpl::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algo::{neighbor_graph, NeighborGraph, NeighborOptions};
    pub use crate::error::{MeshError, Result};
    pub use crate::mesh::{
        build_from_triangles, Colour, ColourFlag, PolygonObj, PolygonObjData, SurfaceProperties,
    };
}

// Re-export nalgebra types for convenience
pub use nalgebra;

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use nalgebra::Point3;

    #[test]
    fn test_tetrahedron() {
        let points = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, 0.5, 1.0),
        ];

        let faces = vec![
            [0, 2, 1], // bottom
            [0, 1, 3], // front
            [1, 2, 3], // right
            [2, 0, 3], // left
        ];

        let obj = build_from_triangles(&points, &faces).unwrap();
        let text = crate::io::serialize(&obj);
        let parsed: PolygonObj = text.parse().unwrap();
        assert_eq!(parsed, obj);

        // Closed tetrahedron: every vertex neighbors the other three
        let graph = parsed.neighbor_graph(true).unwrap();
        assert_eq!(graph.len(), 4);
        for v in 0..4 {
            assert_eq!(graph.degree(v), 3);
            assert!(!graph.neighbors(v).contains(&v));
        }
    }
}
