//! Value types shared by polygon objects.

use std::fmt;

/// Surface rendering properties of a polygon object.
///
/// The values are carried through unchanged; this crate does not interpret them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceProperties {
    /// Ambient reflectance.
    pub ambient: f32,
    /// Diffuse reflectance.
    pub diffuse: f32,
    /// Specular reflectance.
    pub specular: f32,
    /// Specular exponent.
    pub specular_exponent: i32,
    /// Transparency.
    pub transparency: i32,
}

impl SurfaceProperties {
    /// Create surface properties from their five components.
    pub fn new(
        ambient: f32,
        diffuse: f32,
        specular: f32,
        specular_exponent: i32,
        transparency: i32,
    ) -> Self {
        Self {
            ambient,
            diffuse,
            specular,
            specular_exponent,
            transparency,
        }
    }
}

impl Default for SurfaceProperties {
    fn default() -> Self {
        Self::new(0.3, 0.3, 0.4, 10, 1)
    }
}

/// An RGBA colour with components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Colour {
    /// Red.
    pub r: f32,
    /// Green.
    pub g: f32,
    /// Blue.
    pub b: f32,
    /// Alpha (opacity).
    pub a: f32,
}

impl Colour {
    /// Create a colour from its components.
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque white.
    pub const WHITE: Colour = Colour::new(1.0, 1.0, 1.0, 1.0);

    /// The components as `[r, g, b, a]`.
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Colour {
    fn default() -> Self {
        Colour::WHITE
    }
}

impl From<[f32; 4]> for Colour {
    fn from([r, g, b, a]: [f32; 4]) -> Self {
        Colour::new(r, g, b, a)
    }
}

/// How many colours an object stores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ColourFlag {
    /// One colour for the whole object.
    #[default]
    PerObject = 0,
    /// One colour per polygon.
    PerItem = 1,
    /// One colour per point.
    PerVertex = 2,
}

impl ColourFlag {
    /// The integer written in the file.
    pub fn as_i64(self) -> i64 {
        self as i64
    }
}

impl TryFrom<i64> for ColourFlag {
    type Error = i64;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ColourFlag::PerObject),
            1 => Ok(ColourFlag::PerItem),
            2 => Ok(ColourFlag::PerVertex),
            other => Err(other),
        }
    }
}

impl fmt::Display for ColourFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_i64())
    }
}
