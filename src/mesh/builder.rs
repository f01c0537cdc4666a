//! Polygon object construction utilities.
//!
//! This module builds [`PolygonObj`]s from face-vertex triangle lists, as
//! produced by other mesh libraries, and converts them back.

use nalgebra::{Point3, Vector3};

use super::polygon::{PolygonObj, PolygonObjData};
use super::types::{Colour, ColourFlag, SurfaceProperties};
use crate::error::{Result, ShapeError, ValidationError};

/// Build a polygon object from points and triangle faces.
///
/// Normals are computed as the area-weighted average of the incident face
/// normals. Surface properties and colour take their default values.
///
/// # Example
/// ```
/// use bicpl::mesh::build_from_triangles;
/// use nalgebra::Point3;
///
/// let points = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// ];
/// let obj = build_from_triangles(&points, &[[0, 1, 2]]).unwrap();
///
/// assert_eq!(obj.num_items(), 1);
/// assert_eq!(obj.end_indices(), &[3]);
/// assert!((obj.normals()[0].z - 1.0).abs() < 1e-6);
/// ```
pub fn build_from_triangles(points: &[Point3<f32>], faces: &[[usize; 3]]) -> Result<PolygonObj> {
    check_faces(points.len(), faces)?;
    let normals = vertex_normals(points, faces);
    build_from_triangles_with(
        points,
        &normals,
        faces,
        SurfaceProperties::default(),
        Colour::default(),
    )
}

/// Build a polygon object from points, normals, triangle faces, surface
/// properties and a colour.
pub fn build_from_triangles_with(
    points: &[Point3<f32>],
    normals: &[Vector3<f32>],
    faces: &[[usize; 3]],
    surfprop: SurfaceProperties,
    colour: Colour,
) -> Result<PolygonObj> {
    let obj = PolygonObj::new(PolygonObjData {
        surfprop,
        n_points: points.len(),
        points: points.to_vec(),
        normals: normals.to_vec(),
        n_items: faces.len(),
        colour_flag: ColourFlag::PerObject,
        colour_table: vec![colour],
        end_indices: (1..=faces.len()).map(|i| 3 * i).collect(),
        indices: faces.iter().flatten().copied().collect(),
    })?;
    Ok(obj)
}

/// Convert a polygon object to a face-vertex triangle list.
///
/// Fails with [`ShapeError`] if any polygon is not a triangle.
pub fn to_triangles(obj: &PolygonObj) -> Result<Vec<[usize; 3]>> {
    let triangles = obj
        .polygons()
        .enumerate()
        .map(|(item, polygon)| match *polygon {
            [a, b, c] => Ok([a, b, c]),
            _ => Err(ShapeError::NotATriangle {
                item,
                vertices: polygon.len(),
            }),
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(triangles)
}

/// Area-weighted vertex normals of a triangle mesh.
///
/// Vertices not used by any face get a zero normal.
///
/// # Panics
///
/// Panics if a face refers to a vertex outside `points`.
pub fn vertex_normals(points: &[Point3<f32>], faces: &[[usize; 3]]) -> Vec<Vector3<f32>> {
    let mut normals = vec![Vector3::zeros(); points.len()];

    for &[a, b, c] in faces {
        // Unnormalized cross product: its length is twice the face area
        let n = (points[b] - points[a]).cross(&(points[c] - points[a]));
        normals[a] += n;
        normals[b] += n;
        normals[c] += n;
    }

    for n in &mut normals {
        if let Some(unit) = n.try_normalize(f32::EPSILON) {
            *n = unit;
        }
    }

    normals
}

fn check_faces(n_points: usize, faces: &[[usize; 3]]) -> std::result::Result<(), ValidationError> {
    let out_of_range = faces
        .iter()
        .flatten()
        .enumerate()
        .find(|&(_, &v)| v >= n_points);

    match out_of_range {
        Some((position, &vertex)) => Err(ValidationError::InvalidVertexIndex {
            position,
            vertex,
            n_points,
        }),
        None => Ok(()),
    }
}
