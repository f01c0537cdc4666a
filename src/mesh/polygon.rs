//! The polygon object value type.

use std::ops::Range;

use nalgebra::{Point3, Vector3};

use super::types::{Colour, ColourFlag, SurfaceProperties};
use crate::algo::neighbors::{neighbor_graph, NeighborGraph, NeighborOptions};
use crate::error::{Result, ValidationError};

/// The unvalidated parts of a polygon object.
///
/// Fields mirror the file layout one to one. Turn them into a
/// [`PolygonObj`] with [`PolygonObj::new`], which checks every invariant.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PolygonObjData {
    /// Surface rendering properties.
    pub surfprop: SurfaceProperties,
    /// Declared number of points.
    pub n_points: usize,
    /// Point coordinates; the position in this list is the vertex id.
    pub points: Vec<Point3<f32>>,
    /// Per-point normals, aligned with `points`.
    pub normals: Vec<Vector3<f32>>,
    /// Declared number of polygons.
    pub n_items: usize,
    /// Colour flag.
    pub colour_flag: ColourFlag,
    /// Colour table.
    pub colour_table: Vec<Colour>,
    /// Exclusive end of each polygon within `indices`.
    pub end_indices: Vec<usize>,
    /// Vertex ids of all polygons, concatenated.
    pub indices: Vec<usize>,
}

/// A polygonal surface in MNI `.obj` form.
///
/// Polygons are stored with the end-offset encoding of the file format:
/// polygon `i` occupies `indices[end_indices[i - 1]..end_indices[i]]`, where
/// the start of polygon 0 is 0.
///
/// A `PolygonObj` is always valid. It can only be created through
/// [`PolygonObj::new`] (or the parser and builders, which call it) and has no
/// mutating methods; use [`PolygonObj::into_data`] to edit the parts and
/// validate again.
///
/// # Example
///
/// ```
/// use bicpl::mesh::{PolygonObj, PolygonObjData, Colour};
/// use nalgebra::{Point3, Vector3};
///
/// let obj = PolygonObj::new(PolygonObjData {
///     n_points: 3,
///     points: vec![
///         Point3::new(0.0, 0.0, 0.0),
///         Point3::new(1.0, 0.0, 0.0),
///         Point3::new(0.0, 1.0, 0.0),
///     ],
///     normals: vec![Vector3::z(); 3],
///     n_items: 1,
///     colour_table: vec![Colour::WHITE],
///     end_indices: vec![3],
///     indices: vec![0, 1, 2],
///     ..Default::default()
/// })
/// .unwrap();
///
/// assert_eq!(obj.num_points(), 3);
/// assert_eq!(obj.polygon(0), &[0, 1, 2]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonObj {
    surfprop: SurfaceProperties,
    points: Vec<Point3<f32>>,
    normals: Vec<Vector3<f32>>,
    colour_flag: ColourFlag,
    colour_table: Vec<Colour>,
    end_indices: Vec<usize>,
    indices: Vec<usize>,
}

impl PolygonObj {
    /// Validate `data` and wrap it as a polygon object.
    pub fn new(data: PolygonObjData) -> std::result::Result<Self, ValidationError> {
        validate(&data)?;

        let PolygonObjData {
            surfprop,
            points,
            normals,
            colour_flag,
            colour_table,
            end_indices,
            indices,
            ..
        } = data;

        Ok(Self {
            surfprop,
            points,
            normals,
            colour_flag,
            colour_table,
            end_indices,
            indices,
        })
    }

    /// Give back the parts of this object.
    pub fn into_data(self) -> PolygonObjData {
        PolygonObjData {
            surfprop: self.surfprop,
            n_points: self.points.len(),
            points: self.points,
            normals: self.normals,
            n_items: self.end_indices.len(),
            colour_flag: self.colour_flag,
            colour_table: self.colour_table,
            end_indices: self.end_indices,
            indices: self.indices,
        }
    }

    /// Surface rendering properties.
    #[inline]
    pub fn surfprop(&self) -> &SurfaceProperties {
        &self.surfprop
    }

    /// Number of points.
    #[inline]
    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    /// Point coordinates, indexed by vertex id.
    #[inline]
    pub fn points(&self) -> &[Point3<f32>] {
        &self.points
    }

    /// Per-point normals, indexed by vertex id.
    #[inline]
    pub fn normals(&self) -> &[Vector3<f32>] {
        &self.normals
    }

    /// Number of polygons.
    #[inline]
    pub fn num_items(&self) -> usize {
        self.end_indices.len()
    }

    /// The colour flag. Always [`ColourFlag::PerObject`].
    #[inline]
    pub fn colour_flag(&self) -> ColourFlag {
        self.colour_flag
    }

    /// The colour table.
    #[inline]
    pub fn colour_table(&self) -> &[Colour] {
        &self.colour_table
    }

    /// The colour of the whole object.
    #[inline]
    pub fn colour(&self) -> Colour {
        self.colour_table[0]
    }

    /// Exclusive end of each polygon within [`indices`](Self::indices).
    #[inline]
    pub fn end_indices(&self) -> &[usize] {
        &self.end_indices
    }

    /// Vertex ids of all polygons, concatenated.
    #[inline]
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Range of polygon `item` within [`indices`](Self::indices).
    ///
    /// # Panics
    ///
    /// Panics if `item >= self.num_items()`.
    pub fn polygon_range(&self, item: usize) -> Range<usize> {
        let start = if item == 0 { 0 } else { self.end_indices[item - 1] };
        start..self.end_indices[item]
    }

    /// Vertex ids of polygon `item`.
    ///
    /// # Panics
    ///
    /// Panics if `item >= self.num_items()`.
    pub fn polygon(&self, item: usize) -> &[usize] {
        &self.indices[self.polygon_range(item)]
    }

    /// Iterate over the vertex ids of every polygon, in order.
    pub fn polygons(&self) -> impl ExactSizeIterator<Item = &[usize]> + '_ {
        (0..self.num_items()).map(move |item| self.polygon(item))
    }

    /// Number of vertices of every polygon.
    pub fn polygon_sizes(&self) -> impl ExactSizeIterator<Item = usize> + '_ {
        (0..self.num_items()).map(move |item| self.polygon_range(item).len())
    }

    /// Whether every polygon is a triangle.
    pub fn is_triangle_mesh(&self) -> bool {
        self.polygon_sizes().all(|n| n == 3)
    }

    /// Axis-aligned bounding box of the points, or `None` if there are none.
    pub fn bounding_box(&self) -> Option<(Point3<f32>, Point3<f32>)> {
        let first = *self.points.first()?;
        Some(self.points.iter().fold((first, first), |(min, max), p| {
            (min.inf(p), max.sup(p))
        }))
    }

    /// Sets of vertices sharing a polygon with each vertex.
    ///
    /// With `triangles_only`, any polygon that is not a triangle is an error.
    /// See [`neighbor_graph`] for more control.
    pub fn neighbor_graph(&self, triangles_only: bool) -> Result<NeighborGraph> {
        neighbor_graph(self, &NeighborOptions::default().with_triangles_only(triangles_only))
    }
}

impl TryFrom<PolygonObjData> for PolygonObj {
    type Error = ValidationError;

    fn try_from(data: PolygonObjData) -> std::result::Result<Self, Self::Error> {
        PolygonObj::new(data)
    }
}

impl From<PolygonObj> for PolygonObjData {
    fn from(obj: PolygonObj) -> Self {
        obj.into_data()
    }
}

fn validate(data: &PolygonObjData) -> std::result::Result<(), ValidationError> {
    if data.colour_flag != ColourFlag::PerObject {
        return Err(ValidationError::UnsupportedColourFlag {
            flag: data.colour_flag,
        });
    }
    if data.colour_table.len() != 1 {
        return Err(ValidationError::ColourTableLength {
            expected: 1,
            found: data.colour_table.len(),
        });
    }

    if data.points.len() != data.n_points {
        return Err(ValidationError::PointCount {
            expected: data.n_points,
            found: data.points.len(),
        });
    }
    if data.normals.len() != data.n_points {
        return Err(ValidationError::NormalCount {
            expected: data.n_points,
            found: data.normals.len(),
        });
    }

    if data.end_indices.len() != data.n_items {
        return Err(ValidationError::ItemCount {
            expected: data.n_items,
            found: data.end_indices.len(),
        });
    }

    let mut previous = 0;
    for (item, &end) in data.end_indices.iter().enumerate() {
        if end <= previous {
            return Err(ValidationError::EmptyPolygon {
                item,
                previous,
                end,
            });
        }
        previous = end;
    }

    if data.indices.len() != previous {
        return Err(ValidationError::IndexCount {
            expected: previous,
            found: data.indices.len(),
        });
    }

    if let Some((position, &vertex)) = data
        .indices
        .iter()
        .enumerate()
        .find(|&(_, &v)| v >= data.n_points)
    {
        return Err(ValidationError::InvalidVertexIndex {
            position,
            vertex,
            n_points: data.n_points,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad_and_triangle() -> PolygonObjData {
        PolygonObjData {
            n_points: 5,
            points: vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(1.0, 1.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
                Point3::new(2.0, 0.5, -1.0),
            ],
            normals: vec![Vector3::z(); 5],
            n_items: 2,
            colour_table: vec![Colour::WHITE],
            end_indices: vec![4, 7],
            indices: vec![0, 1, 2, 3, 1, 4, 2],
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_object() {
        let obj = PolygonObj::new(quad_and_triangle()).unwrap();

        assert_eq!(obj.num_points(), 5);
        assert_eq!(obj.num_items(), 2);
        assert_eq!(obj.polygon(0), &[0, 1, 2, 3]);
        assert_eq!(obj.polygon(1), &[1, 4, 2]);
        assert_eq!(obj.polygon_sizes().collect::<Vec<_>>(), vec![4, 3]);
        assert!(!obj.is_triangle_mesh());
        assert_eq!(obj.colour(), Colour::WHITE);

        let (min, max) = obj.bounding_box().unwrap();
        assert_eq!(min, Point3::new(0.0, 0.0, -1.0));
        assert_eq!(max, Point3::new(2.0, 1.0, 0.0));
    }

    #[test]
    fn test_into_data_roundtrip() {
        let data = quad_and_triangle();
        let obj = PolygonObj::new(data.clone()).unwrap();
        assert_eq!(obj.into_data(), data);
    }

    #[test]
    fn test_empty_object() {
        let obj = PolygonObj::new(PolygonObjData {
            colour_table: vec![Colour::WHITE],
            ..Default::default()
        })
        .unwrap();

        assert_eq!(obj.num_points(), 0);
        assert_eq!(obj.num_items(), 0);
        assert_eq!(obj.polygons().count(), 0);
        assert!(obj.bounding_box().is_none());
    }

    #[test]
    fn test_rejects_colour_flags() {
        for flag in [ColourFlag::PerItem, ColourFlag::PerVertex] {
            let data = PolygonObjData {
                colour_flag: flag,
                ..quad_and_triangle()
            };
            assert_eq!(
                PolygonObj::new(data),
                Err(ValidationError::UnsupportedColourFlag { flag })
            );
        }
    }

    #[test]
    fn test_rejects_colour_table_length() {
        let data = PolygonObjData {
            colour_table: vec![Colour::WHITE, Colour::WHITE],
            ..quad_and_triangle()
        };
        assert_eq!(
            PolygonObj::new(data),
            Err(ValidationError::ColourTableLength { expected: 1, found: 2 })
        );
    }

    #[test]
    fn test_rejects_mismatched_lengths() {
        let mut data = quad_and_triangle();
        data.normals.pop();
        assert_eq!(
            PolygonObj::new(data),
            Err(ValidationError::NormalCount { expected: 5, found: 4 })
        );

        let data = PolygonObjData {
            n_points: 6,
            ..quad_and_triangle()
        };
        assert_eq!(
            PolygonObj::new(data),
            Err(ValidationError::PointCount { expected: 6, found: 5 })
        );

        let data = PolygonObjData {
            n_items: 3,
            ..quad_and_triangle()
        };
        assert_eq!(
            PolygonObj::new(data),
            Err(ValidationError::ItemCount { expected: 3, found: 2 })
        );

        let mut data = quad_and_triangle();
        data.indices.push(0);
        assert_eq!(
            PolygonObj::new(data),
            Err(ValidationError::IndexCount { expected: 7, found: 8 })
        );
    }

    #[test]
    fn test_rejects_non_increasing_end_indices() {
        let data = PolygonObjData {
            end_indices: vec![4, 4],
            indices: vec![0, 1, 2, 3],
            ..quad_and_triangle()
        };
        assert_eq!(
            PolygonObj::new(data),
            Err(ValidationError::EmptyPolygon {
                item: 1,
                previous: 4,
                end: 4
            })
        );

        let data = PolygonObjData {
            end_indices: vec![0, 7],
            ..quad_and_triangle()
        };
        assert!(matches!(
            PolygonObj::new(data),
            Err(ValidationError::EmptyPolygon { item: 0, .. })
        ));
    }

    #[test]
    fn test_rejects_out_of_range_index() {
        let mut data = quad_and_triangle();
        data.indices[5] = 5;
        assert_eq!(
            PolygonObj::new(data),
            Err(ValidationError::InvalidVertexIndex {
                position: 5,
                vertex: 5,
                n_points: 5
            })
        );
    }
}
