//! Error types for bicpl.
//!
//! Each failure kind has its own enum so callers can match on exactly the
//! stage that failed:
//!
//! - [`FormatError`]: the text is not a polygon object this crate can read.
//! - [`ValidationError`]: assembled parts violate a [`PolygonObj`] invariant.
//! - [`ShapeError`]: an algorithm needs triangles and got something else.
//!
//! [`MeshError`] aggregates them together with I/O failures.
//!
//! [`PolygonObj`]: crate::mesh::PolygonObj

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::mesh::ColourFlag;

/// Result type alias using [`MeshError`].
pub type Result<T> = std::result::Result<T, MeshError>;

/// A section of the polygon object wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    /// The leading object kind tag.
    Kind,
    /// Ambient, diffuse, specular, specular exponent and transparency.
    SurfaceProperties,
    /// Number of points.
    PointCount,
    /// Point coordinates.
    Points,
    /// Per-point normals.
    Normals,
    /// Number of polygons.
    ItemCount,
    /// The colour flag.
    ColourFlag,
    /// The colour table.
    ColourTable,
    /// Polygon end indices.
    EndIndices,
    /// Polygon vertex indices.
    Indices,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Section::Kind => "object kind",
            Section::SurfaceProperties => "surface properties",
            Section::PointCount => "point count",
            Section::Points => "points",
            Section::Normals => "normals",
            Section::ItemCount => "polygon count",
            Section::ColourFlag => "colour flag",
            Section::ColourTable => "colour table",
            Section::EndIndices => "end indices",
            Section::Indices => "indices",
        };
        f.write_str(name)
    }
}

/// Malformed or unsupported object file text.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormatError {
    /// The object is not a polygon object.
    #[error("unsupported mesh kind {tag:?} (only polygon objects \"P\" are supported)")]
    UnsupportedMeshKind {
        /// The leading tag that was found.
        tag: String,
    },

    /// The colour flag selects per-item or per-vertex colours.
    #[error("unsupported colour mode {flag} (only a single uniform colour, 0, is supported)")]
    UnsupportedColourMode {
        /// The colour flag that was found.
        flag: i64,
    },

    /// The token stream ended inside a section.
    #[error("unexpected end of input in {section}: expected {expected} tokens, found {found}")]
    UnexpectedEof {
        /// The section being read.
        section: Section,
        /// Number of tokens the section needs.
        expected: usize,
        /// Number of tokens that were left.
        found: usize,
    },

    /// A token is not a number of the required type.
    #[error("invalid number {token:?} in {section} (token {position})")]
    InvalidNumber {
        /// The section being read.
        section: Section,
        /// Zero-based position of the token in the stream.
        position: usize,
        /// The offending token.
        token: String,
    },

    /// A whole number does not fit its field.
    #[error("value {token:?} in {section} is out of range (token {position})")]
    OutOfRange {
        /// The section being read.
        section: Section,
        /// Zero-based position of the token in the stream.
        position: usize,
        /// The offending token.
        token: String,
    },

    /// An integer field was written as NaN or infinity.
    #[error("non-finite value {token:?} in {section} (token {position})")]
    NonFinite {
        /// The section being read.
        section: Section,
        /// Zero-based position of the token in the stream.
        position: usize,
        /// The offending token.
        token: String,
    },
}

/// A [`PolygonObj`](crate::mesh::PolygonObj) invariant does not hold.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Only [`ColourFlag::PerObject`] is supported.
    #[error("colour flag must be 0 (per-object), got {flag}")]
    UnsupportedColourFlag {
        /// The rejected flag.
        flag: ColourFlag,
    },

    /// A per-object colour table holds exactly one colour.
    #[error("colour table must have {expected} entry, got {found}")]
    ColourTableLength {
        /// Required table length.
        expected: usize,
        /// Actual table length.
        found: usize,
    },

    /// The point array does not match the declared point count.
    #[error("expected {expected} points, got {found}")]
    PointCount {
        /// Declared point count.
        expected: usize,
        /// Actual number of points.
        found: usize,
    },

    /// The normal array does not match the declared point count.
    #[error("expected {expected} normals, got {found}")]
    NormalCount {
        /// Declared point count.
        expected: usize,
        /// Actual number of normals.
        found: usize,
    },

    /// The end index array does not match the declared polygon count.
    #[error("expected {expected} end indices, got {found}")]
    ItemCount {
        /// Declared polygon count.
        expected: usize,
        /// Actual number of end indices.
        found: usize,
    },

    /// End indices must be strictly increasing, starting above zero.
    #[error("polygon {item} is empty: end index {end} does not exceed previous end {previous}")]
    EmptyPolygon {
        /// The polygon position.
        item: usize,
        /// End index of the previous polygon (0 for the first).
        previous: usize,
        /// End index of this polygon.
        end: usize,
    },

    /// The index list length must equal the last end index.
    #[error("expected {expected} polygon indices, got {found}")]
    IndexCount {
        /// The last end index.
        expected: usize,
        /// Actual number of indices.
        found: usize,
    },

    /// A polygon index refers to a point that does not exist.
    #[error("index {position} refers to vertex {vertex}, but there are only {n_points} points")]
    InvalidVertexIndex {
        /// Position in the index list.
        position: usize,
        /// The out-of-range vertex.
        vertex: usize,
        /// Number of points in the object.
        n_points: usize,
    },
}

/// An operation that requires triangles found another polygon.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    /// The polygon does not have exactly three vertices.
    #[error("polygon {item} has {vertices} vertices, expected a triangle")]
    NotATriangle {
        /// The polygon position.
        item: usize,
        /// Its vertex count.
        vertices: usize,
    },
}

/// Errors that can occur while reading, writing or analyzing objects.
#[derive(Error, Debug)]
pub enum MeshError {
    /// Malformed or unsupported input text.
    #[error("format error: {0}")]
    Format(#[from] FormatError),

    /// Invalid object parts.
    #[error("invalid polygon object: {0}")]
    Validation(#[from] ValidationError),

    /// Unsupported polygon shape.
    #[error("shape error: {0}")]
    Shape(#[from] ShapeError),

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error loading an object from a file.
    #[error("failed to load {path}: {source}")]
    Load {
        /// The file path.
        path: PathBuf,
        /// The underlying failure.
        #[source]
        source: Box<MeshError>,
    },

    /// Error saving an object to a file.
    #[error("failed to save {path}: {source}")]
    Save {
        /// The file path.
        path: PathBuf,
        /// The underlying failure.
        #[source]
        source: Box<MeshError>,
    },
}

impl MeshError {
    /// The innermost error, looking through [`MeshError::Load`] and
    /// [`MeshError::Save`] wrappers.
    pub fn root(&self) -> &MeshError {
        match self {
            MeshError::Load { source, .. } | MeshError::Save { source, .. } => source.root(),
            other => other,
        }
    }

    pub(crate) fn load(path: impl Into<PathBuf>, source: MeshError) -> Self {
        MeshError::Load {
            path: path.into(),
            source: Box::new(source),
        }
    }

    pub(crate) fn save(path: impl Into<PathBuf>, source: MeshError) -> Self {
        MeshError::Save {
            path: path.into(),
            source: Box::new(source),
        }
    }
}
