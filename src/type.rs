use std::fmt;
use nalgebra::{Vector3, UnitQuaternion};

pub type Coord = f64;
pub type Vector = Vector3<Coord>;
pub type Rotation = UnitQuaternion<Coord>;

pub type Mass = Coord;
pub type Distance = Coord;
pub type GravityCoeff = Coord;
pub type RelativeTime = Coord;

/// Angle in degrees.
pub type Degrees = Coord;

pub type Layer = u32;
pub type LayerMask = u32;

pub type AttractorId = usize;
pub type BodyId = usize;
pub type SatelliteId = usize;

pub type AttractorName = String;
pub type BodyName = String;
pub type SatelliteName = String;

pub const ALL_LAYERS: LayerMask = LayerMask::MAX;

pub fn layer_bit(layer: Layer) -> LayerMask {
    1u32.checked_shl(layer).unwrap_or(0)
}

pub enum VectorFormat<'v> {
    Short(&'v Vector),
    Precise(&'v Vector),
}

impl<'v> fmt::Display for VectorFormat<'v> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VectorFormat::Short(v) => write!(f, "({:.2}, {:.2}, {:.2})", v[0], v[1], v[2]),
            VectorFormat::Precise(v) => write!(f, "({:.6}, {:.6}, {:.6})", v[0], v[1], v[2]),
        }
    }
}
