//! Summary statistics of a polygon object.

use std::collections::HashSet;
use std::fmt;

use nalgebra::Point3;

use super::neighbors::{neighbor_graph, NeighborOptions};
use crate::error::Result;
use crate::mesh::PolygonObj;

/// Counts and topology summary of a polygon object.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshStats {
    /// Number of points.
    pub num_points: usize,
    /// Number of polygons.
    pub num_items: usize,
    /// Number of distinct polygon boundary edges.
    pub num_edges: usize,
    /// `V - E + F`.
    pub euler_characteristic: i64,
    /// Whether every polygon is a triangle.
    pub is_triangle_mesh: bool,
    /// Smallest number of neighbors of any point.
    pub min_degree: usize,
    /// Largest number of neighbors of any point.
    pub max_degree: usize,
    /// Average number of neighbors per point.
    pub mean_degree: f64,
    /// Points that belong to no polygon.
    pub isolated_points: usize,
    /// Axis-aligned bounding box of the points.
    pub bounding_box: Option<(Point3<f32>, Point3<f32>)>,
}

impl MeshStats {
    /// Compute statistics for `obj`.
    ///
    /// Degrees come from the neighbor graph built with `options`, so they
    /// fail the same way [`neighbor_graph`] does.
    pub fn compute(obj: &PolygonObj, options: &NeighborOptions) -> Result<Self> {
        let graph = neighbor_graph(obj, options)?;

        let degrees: Vec<usize> = (0..graph.len()).map(|v| graph.degree(v)).collect();
        let min_degree = degrees.iter().copied().min().unwrap_or(0);
        let max_degree = degrees.iter().copied().max().unwrap_or(0);
        let mean_degree = if degrees.is_empty() {
            0.0
        } else {
            degrees.iter().sum::<usize>() as f64 / degrees.len() as f64
        };

        let num_edges = boundary_edges(obj).len();
        let euler_characteristic =
            obj.num_points() as i64 - num_edges as i64 + obj.num_items() as i64;

        Ok(Self {
            num_points: obj.num_points(),
            num_items: obj.num_items(),
            num_edges,
            euler_characteristic,
            is_triangle_mesh: obj.is_triangle_mesh(),
            min_degree,
            max_degree,
            mean_degree,
            isolated_points: degrees.iter().filter(|&&d| d == 0).count(),
            bounding_box: obj.bounding_box(),
        })
    }
}

impl fmt::Display for MeshStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Points: {}", self.num_points)?;
        writeln!(f, "Polygons: {}", self.num_items)?;
        writeln!(f, "Edges: {}", self.num_edges)?;
        writeln!(f, "Euler characteristic: {}", self.euler_characteristic)?;
        writeln!(
            f,
            "Mesh type: {}",
            if self.is_triangle_mesh {
                "Triangle mesh"
            } else {
                "Mixed polygon mesh"
            }
        )?;
        writeln!(
            f,
            "Neighbors per point: min={}, max={}, avg={:.3}",
            self.min_degree, self.max_degree, self.mean_degree
        )?;
        if self.isolated_points > 0 {
            writeln!(f, "Isolated points: {}", self.isolated_points)?;
        }
        if let Some((min, max)) = self.bounding_box {
            writeln!(
                f,
                "Bounding box: ({:.3}, {:.3}, {:.3}) to ({:.3}, {:.3}, {:.3})",
                min.x, min.y, min.z, max.x, max.y, max.z
            )?;
        }
        Ok(())
    }
}

/// Distinct undirected edges between consecutive polygon vertices.
fn boundary_edges(obj: &PolygonObj) -> HashSet<(usize, usize)> {
    let mut edges = HashSet::new();
    for polygon in obj.polygons() {
        let next = polygon.iter().cycle().skip(1);
        for (&a, &b) in polygon.iter().zip(next) {
            if a != b {
                edges.insert((a.min(b), a.max(b)));
            }
        }
    }
    edges
}
