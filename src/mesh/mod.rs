//! Core mesh data structures.
//!
//! This module provides [`PolygonObj`], the in-memory form of a polygonal
//! MNI object, together with its surface properties and colour types.
//!
//! # Overview
//!
//! A [`PolygonObj`] holds a list of points, one normal per point, and a set of
//! polygons. Polygons are stored exactly as in the file: a flat list of vertex
//! ids plus one exclusive end index per polygon. The object is immutable and
//! always satisfies its invariants; invalid parts are rejected when the object
//! is created.
//!
//! # Construction
//!
//! Objects are typically read from a file with [`crate::io`], or built from a
//! face-vertex triangle list:
//!
//! ```
//! use bicpl::mesh::{build_from_triangles, PolygonObj};
//! use nalgebra::Point3;
//!
//! let points = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//! ];
//! let faces = vec![[0, 1, 2]];
//!
//! let obj: PolygonObj = build_from_triangles(&points, &faces).unwrap();
//! ```

mod builder;
mod polygon;
mod types;

pub use builder::{build_from_triangles, build_from_triangles_with, to_triangles, vertex_normals};
pub use polygon::{PolygonObj, PolygonObjData};
pub use types::{Colour, ColourFlag, SurfaceProperties};
