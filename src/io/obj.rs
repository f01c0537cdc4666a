//! MNI polygon object (`.obj`) format support.
//!
//! This module reads and writes polygonal objects in the text format used by
//! the MNI BIC tools (`bicpl`). Despite the shared extension, this is not the
//! Wavefront OBJ format.
//!
//! The file is a single whitespace-separated token stream; line breaks only
//! make it readable. Fields are identified by position:
//!
//! ```text
//! P  ambient diffuse specular specular_exponent transparency  n_points
//!    x y z            (n_points times)
//!    nx ny nz         (n_points times)
//!    n_items
//!    colour_flag r g b a
//!    end_indices      (n_items values)
//!    indices          (last end index values)
//! ```

use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;
use std::str::{FromStr, SplitWhitespace};

use log::{debug, warn};
use nalgebra::{Point3, Vector3};

use crate::error::{FormatError, MeshError, Result, Section};
use crate::mesh::{Colour, ColourFlag, PolygonObj, PolygonObjData, SurfaceProperties};

/// Tag of a polygon object.
pub const POLYGON_TAG: &str = "P";

/// Number of colour table tokens following the colour flag.
const COLOUR_TOKENS: usize = 4;

/// Options controlling the text layout of written objects.
///
/// Layout never changes the meaning of a file, only its line breaks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOptions {
    /// Number of end indices or indices per line (default: 8).
    pub values_per_line: usize,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self { values_per_line: 8 }
    }
}

impl WriteOptions {
    /// Set the number of end indices or indices per line (at least 1).
    pub fn with_values_per_line(mut self, values_per_line: usize) -> Self {
        self.values_per_line = values_per_line.max(1);
        self
    }
}

/// Cursor over the whitespace-separated tokens of an object file.
struct Tokens<'a> {
    inner: SplitWhitespace<'a>,
    position: usize,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            inner: text.split_whitespace(),
            position: 0,
        }
    }

    /// Next token, or `None` at the end of the stream.
    fn next_token(&mut self) -> Option<&'a str> {
        let token = self.inner.next()?;
        self.position += 1;
        Some(token)
    }

    fn expect(&mut self, section: Section) -> std::result::Result<&'a str, FormatError> {
        self.next_token().ok_or(FormatError::UnexpectedEof {
            section,
            expected: 1,
            found: 0,
        })
    }

    fn parse<T: FromStr>(&mut self, section: Section) -> std::result::Result<T, FormatError> {
        let token = self.expect(section)?;
        self.convert(section, token)
    }

    /// Parse exactly `count` tokens.
    fn parse_n<T: FromStr>(
        &mut self,
        section: Section,
        count: usize,
    ) -> std::result::Result<Vec<T>, FormatError> {
        let mut values = Vec::new();
        for found in 0..count {
            let token = self.next_token().ok_or(FormatError::UnexpectedEof {
                section,
                expected: count,
                found,
            })?;
            values.push(self.convert(section, token)?);
        }
        Ok(values)
    }

    /// Parse a whole number that may be written with a fractional part.
    /// The value is truncated toward zero.
    fn parse_whole(&mut self, section: Section) -> std::result::Result<i32, FormatError> {
        let token = self.expect(section)?;
        let value: f64 = self.convert(section, token)?;
        if !value.is_finite() {
            return Err(FormatError::NonFinite {
                section,
                position: self.position - 1,
                token: token.to_string(),
            });
        }
        let value = value.trunc();
        if value < i32::MIN as f64 || value > i32::MAX as f64 {
            return Err(FormatError::OutOfRange {
                section,
                position: self.position - 1,
                token: token.to_string(),
            });
        }
        Ok(value as i32)
    }

    fn convert<T: FromStr>(
        &self,
        section: Section,
        token: &str,
    ) -> std::result::Result<T, FormatError> {
        token.parse().map_err(|_| FormatError::InvalidNumber {
            section,
            position: self.position - 1,
            token: token.to_string(),
        })
    }

    fn remaining(self) -> usize {
        self.inner.count()
    }
}

/// Parse polygon object text.
///
/// Fails with [`MeshError::Format`] if the text is malformed or describes
/// something other than a single-colour polygon object, and with
/// [`MeshError::Validation`] if the parsed parts are inconsistent (for
/// example an index refers to a missing point).
///
/// # Example
///
/// ```
/// use bicpl::io::obj;
///
/// let text = "P 0.3 0.3 0.4 10 1 3
///     0 0 0  1 0 0  0 1 0
///     0 0 1  0 0 1  0 0 1
///     1
///     0 1 1 1 1
///     3
///     0 1 2";
///
/// let obj = obj::parse(text).unwrap();
/// assert_eq!(obj.num_points(), 3);
/// assert_eq!(obj.polygon(0), &[0, 1, 2]);
/// ```
pub fn parse(text: &str) -> Result<PolygonObj> {
    let mut tokens = Tokens::new(text);

    let tag = tokens.expect(Section::Kind)?;
    if tag != POLYGON_TAG {
        return Err(FormatError::UnsupportedMeshKind {
            tag: tag.to_string(),
        }
        .into());
    }

    let ambient = tokens.parse(Section::SurfaceProperties)?;
    let diffuse = tokens.parse(Section::SurfaceProperties)?;
    let specular = tokens.parse(Section::SurfaceProperties)?;
    let specular_exponent = tokens.parse_whole(Section::SurfaceProperties)?;
    let transparency = tokens.parse_whole(Section::SurfaceProperties)?;
    let surfprop = SurfaceProperties::new(
        ambient,
        diffuse,
        specular,
        specular_exponent,
        transparency,
    );

    let n_points: usize = tokens.parse(Section::PointCount)?;
    let points: Vec<Point3<f32>> = tokens
        .parse_n::<f32>(Section::Points, n_points.saturating_mul(3))?
        .chunks_exact(3)
        .map(|c| Point3::new(c[0], c[1], c[2]))
        .collect();
    let normals: Vec<Vector3<f32>> = tokens
        .parse_n::<f32>(Section::Normals, n_points.saturating_mul(3))?
        .chunks_exact(3)
        .map(|c| Vector3::new(c[0], c[1], c[2]))
        .collect();
    debug!("read {} points and normals", n_points);

    let n_items: usize = tokens.parse(Section::ItemCount)?;

    let flag: i64 = tokens.parse(Section::ColourFlag)?;
    if flag != ColourFlag::PerObject.as_i64() {
        return Err(FormatError::UnsupportedColourMode { flag }.into());
    }
    let colour = tokens.parse_n::<f32>(Section::ColourTable, COLOUR_TOKENS)?;
    let colour = Colour::new(colour[0], colour[1], colour[2], colour[3]);

    let end_indices: Vec<usize> = tokens.parse_n(Section::EndIndices, n_items)?;

    // The index section has no count of its own: it spans a window of
    // `last end index + 1` tokens, of which the last is a reserved slot.
    let last_end = end_indices.last().copied().unwrap_or(0);
    let indices: Vec<usize> = tokens.parse_n(Section::Indices, last_end)?;
    if let Some(reserved) = tokens.next_token() {
        if reserved.parse::<usize>().is_ok() {
            debug!("ignoring reserved index slot {:?}", reserved);
        } else {
            warn!(
                "ignoring non-numeric token {:?} in reserved index slot (token {})",
                reserved,
                tokens.position - 1
            );
        }
    }
    let trailing = tokens.remaining();
    if trailing > 0 {
        warn!("ignoring {} trailing tokens after polygon indices", trailing);
    }
    debug!("read {} polygons with {} indices", n_items, indices.len());

    let obj = PolygonObj::new(PolygonObjData {
        surfprop,
        n_points,
        points,
        normals,
        n_items,
        colour_flag: ColourFlag::PerObject,
        colour_table: vec![colour],
        end_indices,
        indices,
    })?;
    Ok(obj)
}

/// Render an object as text with the default layout.
pub fn serialize(obj: &PolygonObj) -> String {
    serialize_with(obj, &WriteOptions::default())
}

/// Render an object as text.
pub fn serialize_with(obj: &PolygonObj, options: &WriteOptions) -> String {
    ObjText { obj, options }.to_string()
}

/// Read an object from a reader.
pub fn read<R: Read>(mut reader: R) -> Result<PolygonObj> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    parse(&text)
}

/// Write an object to a writer.
pub fn write<W: Write>(obj: &PolygonObj, mut writer: W, options: &WriteOptions) -> Result<()> {
    write!(writer, "{}", ObjText { obj, options })?;
    writer.flush()?;
    Ok(())
}

/// Load an object from a file.
///
/// # Example
///
/// ```no_run
/// use bicpl::io::obj;
///
/// let obj = obj::load("surf_81920.obj").unwrap();
/// ```
pub fn load<P: AsRef<Path>>(path: P) -> Result<PolygonObj> {
    let path = path.as_ref();
    File::open(path)
        .map_err(MeshError::from)
        .and_then(read)
        .map_err(|e| MeshError::load(path, e))
}

/// Save an object to a file with the default layout.
///
/// # Example
///
/// ```no_run
/// use bicpl::io::obj;
///
/// let obj = obj::load("surf_81920.obj").unwrap();
/// obj::save(&obj, "copy.obj").unwrap();
/// ```
pub fn save<P: AsRef<Path>>(obj: &PolygonObj, path: P) -> Result<()> {
    save_with(obj, path, &WriteOptions::default())
}

/// Save an object to a file.
pub fn save_with<P: AsRef<Path>>(obj: &PolygonObj, path: P, options: &WriteOptions) -> Result<()> {
    let path = path.as_ref();
    File::create(path)
        .map_err(MeshError::from)
        .and_then(|file| write(obj, BufWriter::new(file), options))
        .map_err(|e| MeshError::save(path, e))
}

/// Text rendering of an object.
struct ObjText<'a> {
    obj: &'a PolygonObj,
    options: &'a WriteOptions,
}

impl fmt::Display for ObjText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let obj = self.obj;
        let sp = obj.surfprop();

        writeln!(
            f,
            "{} {} {} {} {} {} {}",
            POLYGON_TAG,
            sp.ambient,
            sp.diffuse,
            sp.specular,
            sp.specular_exponent,
            sp.transparency,
            obj.num_points()
        )?;

        for p in obj.points() {
            writeln!(f, " {} {} {}", p.x, p.y, p.z)?;
        }
        for n in obj.normals() {
            writeln!(f, " {} {} {}", n.x, n.y, n.z)?;
        }

        writeln!(f)?;
        writeln!(f, " {}", obj.num_items())?;
        let c = obj.colour();
        writeln!(f, " {} {} {} {} {}", obj.colour_flag(), c.r, c.g, c.b, c.a)?;
        writeln!(f)?;

        let per_line = self.options.values_per_line.max(1);
        write_wrapped(f, obj.end_indices(), per_line)?;
        write_wrapped(f, obj.indices(), per_line)
    }
}

fn write_wrapped(f: &mut fmt::Formatter<'_>, values: &[usize], per_line: usize) -> fmt::Result {
    for line in values.chunks(per_line) {
        for value in line {
            write!(f, " {}", value)?;
        }
        writeln!(f)?;
    }
    Ok(())
}

impl fmt::Display for PolygonObj {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let options = WriteOptions::default();
        fmt::Display::fmt(&ObjText { obj: self, options: &options }, f)
    }
}

impl FromStr for PolygonObj {
    type Err = MeshError;

    fn from_str(s: &str) -> Result<Self> {
        parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::mesh::build_from_triangles;

    const TETRAHEDRON: &str = "P 0.3 0.3 0.4 10 1 4
 0 0 0
 1 0 0
 0 1 0
 0 0 1
 -0.57735 -0.57735 -0.57735
 0 -0.5 0.5
 0.5 0 -0.5
 0.57735 0.57735 0.57735

 4
 0 1 0.5 0.25 1

 3 6 9 12
 0 2 1 0 1 3 0 3 2 1
 2 3
";

    fn grid(n: usize) -> PolygonObj {
        let mut points = Vec::new();
        let mut faces = Vec::new();
        for j in 0..=n {
            for i in 0..=n {
                points.push(Point3::new(i as f32 * 0.1, j as f32 * 0.3, (i * j) as f32 / 7.0));
            }
        }
        for j in 0..n {
            for i in 0..n {
                let v00 = j * (n + 1) + i;
                let v10 = v00 + 1;
                let v01 = v00 + n + 1;
                faces.push([v00, v10, v01 + 1]);
                faces.push([v00, v01 + 1, v01]);
            }
        }
        build_from_triangles(&points, &faces).unwrap()
    }

    fn format_err(text: &str) -> FormatError {
        match parse(text) {
            Err(MeshError::Format(e)) => e,
            other => panic!("expected format error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_tetrahedron() {
        let obj = parse(TETRAHEDRON).unwrap();

        assert_eq!(*obj.surfprop(), SurfaceProperties::new(0.3, 0.3, 0.4, 10, 1));
        assert_eq!(obj.num_points(), 4);
        assert_eq!(obj.points()[3], Point3::new(0.0, 0.0, 1.0));
        assert_eq!(obj.normals()[1], Vector3::new(0.0, -0.5, 0.5));
        assert_eq!(obj.num_items(), 4);
        assert_eq!(obj.colour(), Colour::new(1.0, 0.5, 0.25, 1.0));
        assert_eq!(obj.end_indices(), &[3, 6, 9, 12]);
        assert_eq!(obj.polygon(3), &[1, 2, 3]);
    }

    #[test]
    fn test_whitespace_is_not_significant() {
        let flat = TETRAHEDRON.split_whitespace().collect::<Vec<_>>().join(" ");
        let tabbed = TETRAHEDRON.replace(' ', "\t\n");
        let expected = parse(TETRAHEDRON).unwrap();

        assert_eq!(parse(&flat).unwrap(), expected);
        assert_eq!(parse(&tabbed).unwrap(), expected);
    }

    #[test]
    fn test_roundtrip() {
        let obj = parse(TETRAHEDRON).unwrap();
        assert_eq!(parse(&serialize(&obj)).unwrap(), obj);

        let obj = grid(7);
        assert_eq!(parse(&serialize(&obj)).unwrap(), obj);
        assert_eq!(obj.to_string().parse::<PolygonObj>().unwrap(), obj);
    }

    #[test]
    fn test_roundtrip_with_layout_options() {
        let obj = grid(3);
        for per_line in [1, 3, 8, 1000] {
            let options = WriteOptions::default().with_values_per_line(per_line);
            assert_eq!(parse(&serialize_with(&obj, &options)).unwrap(), obj);
        }
    }

    #[test]
    fn test_serialized_layout() {
        let text = serialize(&parse(TETRAHEDRON).unwrap());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "P 0.3 0.3 0.4 10 1 4");
        assert_eq!(lines[1], " 0 0 0");
        assert_eq!(lines[6], " 0 -0.5 0.5");
        assert_eq!(lines[9], "");
        assert_eq!(lines[10], " 4");
        assert_eq!(lines[11], " 0 1 0.5 0.25 1");
        assert_eq!(lines[12], "");
        assert_eq!(lines[13], " 3 6 9 12");
        assert_eq!(lines[14], " 0 2 1 0 1 3 0 3");
        assert_eq!(lines[15], " 2 1 2 3");
        assert_eq!(lines.len(), 16);
    }

    #[test]
    fn test_non_finite_values_pass_through() {
        let points = vec![
            Point3::new(f32::NAN, 0.0, 0.0),
            Point3::new(f32::INFINITY, 0.0, 0.0),
            Point3::new(f32::NEG_INFINITY, 0.0, 0.0),
        ];
        let obj = build_from_triangles(&points, &[[0, 1, 2]]).unwrap();
        let parsed = parse(&serialize(&obj)).unwrap();

        assert!(parsed.points()[0].x.is_nan());
        assert_eq!(parsed.points()[1].x, f32::INFINITY);
        assert_eq!(parsed.points()[2].x, f32::NEG_INFINITY);
    }

    #[test]
    fn test_rejects_other_object_kinds() {
        let text = TETRAHEDRON.replacen('P', "L", 1);
        assert_eq!(
            format_err(&text),
            FormatError::UnsupportedMeshKind {
                tag: "L".to_string()
            }
        );
        assert!(matches!(
            format_err(&TETRAHEDRON.replacen('P', "p", 1)),
            FormatError::UnsupportedMeshKind { .. }
        ));
    }

    #[test]
    fn test_rejects_colour_modes() {
        for flag in [1, 2, 7] {
            let text = TETRAHEDRON.replace(" 0 1 0.5 0.25 1", &format!(" {} 1 0.5 0.25 1", flag));
            assert_eq!(format_err(&text), FormatError::UnsupportedColourMode { flag });
        }
    }

    #[test]
    fn test_minimal_object() {
        let obj = parse("P 0.3 0.3 0.4 10 1 0 0 0 1 1 1 1").unwrap();

        assert_eq!(obj.num_points(), 0);
        assert_eq!(obj.num_items(), 0);
        assert!(obj.indices().is_empty());
        assert_eq!(parse(&serialize(&obj)).unwrap(), obj);
    }

    #[test]
    fn test_whole_numbers_with_fraction() {
        let text = TETRAHEDRON.replacen("10 1 4", "2.0 1.75 4", 1);
        let obj = parse(&text).unwrap();

        assert_eq!(obj.surfprop().specular_exponent, 2);
        assert_eq!(obj.surfprop().transparency, 1);

        let text = TETRAHEDRON.replacen("10 1 4", "10 1e12 4", 1);
        assert_eq!(
            format_err(&text),
            FormatError::OutOfRange {
                section: Section::SurfaceProperties,
                position: 5,
                token: "1e12".to_string()
            }
        );

        let text = TETRAHEDRON.replacen("10 1 4", "-2147483648.9 1 4", 1);
        assert_eq!(parse(&text).unwrap().surfprop().specular_exponent, i32::MIN);

        let text = TETRAHEDRON.replacen("10 1 4", "inf 1 4", 1);
        assert_eq!(
            format_err(&text),
            FormatError::NonFinite {
                section: Section::SurfaceProperties,
                position: 4,
                token: "inf".to_string()
            }
        );
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(
            format_err("  \n "),
            FormatError::UnexpectedEof {
                section: Section::Kind,
                expected: 1,
                found: 0
            }
        );
    }

    #[test]
    fn test_truncated_sections() {
        let tokens: Vec<&str> = TETRAHEDRON.split_whitespace().collect();
        let truncated = |n: usize| format_err(&tokens[..n].join(" "));

        assert!(matches!(
            truncated(4),
            FormatError::UnexpectedEof { section: Section::SurfaceProperties, .. }
        ));
        assert!(matches!(
            truncated(6),
            FormatError::UnexpectedEof { section: Section::PointCount, .. }
        ));
        assert_eq!(
            truncated(12),
            FormatError::UnexpectedEof {
                section: Section::Points,
                expected: 12,
                found: 5
            }
        );
        assert!(matches!(
            truncated(20),
            FormatError::UnexpectedEof { section: Section::Normals, .. }
        ));
        assert!(matches!(
            truncated(31),
            FormatError::UnexpectedEof { section: Section::ItemCount, .. }
        ));
        assert!(matches!(
            truncated(32),
            FormatError::UnexpectedEof { section: Section::ColourFlag, .. }
        ));
        assert!(matches!(
            truncated(35),
            FormatError::UnexpectedEof { section: Section::ColourTable, .. }
        ));
        assert!(matches!(
            truncated(39),
            FormatError::UnexpectedEof { section: Section::EndIndices, .. }
        ));
        assert_eq!(
            truncated(tokens.len() - 1),
            FormatError::UnexpectedEof {
                section: Section::Indices,
                expected: 12,
                found: 11
            }
        );
    }

    #[test]
    fn test_invalid_numbers() {
        let text = TETRAHEDRON.replacen(" 1 0 0", " 1 zero 0", 1);
        assert_eq!(
            format_err(&text),
            FormatError::InvalidNumber {
                section: Section::Points,
                position: 11,
                token: "zero".to_string()
            }
        );

        let text = TETRAHEDRON.replacen(" 3 6 9 12", " 3 6 9.0 12", 1);
        assert!(matches!(
            format_err(&text),
            FormatError::InvalidNumber { section: Section::EndIndices, .. }
        ));

        let text = TETRAHEDRON.replacen("10 1 4", "10 1 -4", 1);
        assert!(matches!(
            format_err(&text),
            FormatError::InvalidNumber { section: Section::PointCount, .. }
        ));
    }

    #[test]
    fn test_reserved_slot_and_trailing_tokens_are_ignored() {
        let expected = parse(TETRAHEDRON).unwrap();

        let with_slot = format!("{} 0", TETRAHEDRON);
        assert_eq!(parse(&with_slot).unwrap(), expected);

        let with_trailing = format!("{} 0 junk tokens", TETRAHEDRON);
        assert_eq!(parse(&with_trailing).unwrap(), expected);

        let with_junk_slot = format!("{} junk", TETRAHEDRON);
        assert_eq!(parse(&with_junk_slot).unwrap(), expected);
    }

    #[test]
    fn test_out_of_range_index_is_a_validation_error() {
        let text = TETRAHEDRON.replacen(" 2 3\n", " 2 4\n", 1);
        assert!(matches!(
            parse(&text),
            Err(MeshError::Validation(ValidationError::InvalidVertexIndex {
                position: 11,
                vertex: 4,
                n_points: 4
            }))
        ));
    }

    #[test]
    fn test_non_increasing_end_indices_are_a_validation_error() {
        let text = TETRAHEDRON.replacen(" 3 6 9 12", " 3 9 6 12", 1);
        assert!(matches!(
            parse(&text),
            Err(MeshError::Validation(ValidationError::EmptyPolygon { item: 2, .. }))
        ));
    }

    #[test]
    fn test_file_roundtrip() {
        let path = std::env::temp_dir().join(format!("bicpl_obj_roundtrip_{}.obj", std::process::id()));
        let obj = grid(4);

        save(&obj, &path).unwrap();
        let loaded = load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(loaded, obj);
    }

    #[test]
    fn test_read_write() {
        let obj = parse(TETRAHEDRON).unwrap();
        let mut buffer = Vec::new();
        write(&obj, &mut buffer, &WriteOptions::default()).unwrap();

        assert_eq!(read(buffer.as_slice()).unwrap(), obj);
    }

    #[test]
    fn test_load_missing_file() {
        let path = std::env::temp_dir().join("bicpl_definitely_missing.obj");
        let err = load(&path).unwrap_err();

        assert!(matches!(&err, MeshError::Load { path: p, .. } if *p == path));
        assert!(matches!(err.root(), MeshError::Io(_)));
    }
}
