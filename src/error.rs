use super::r#type::{
    Vector,
    Coord,
    AttractorName,
    BodyName,
    VectorFormat,
};
use std::fmt;

pub type Description = String;

#[macro_export]
macro_rules! make_error {
    ($($path:ident)::+$(($value:expr))?) => {
        $crate::make_error![@_impl $($path)::+$(($value))?]
    };

    (@_impl $err_enum:ident::$case:ident$(($value:expr))?) => {
        $crate::error::$err_enum::$case$(($value))?
    };

    (@_impl $err_enum:ident::$sub_err_enum:ident::$($err_tail:ident)::+$(($value:expr))?) => {
        $crate::error::$err_enum::$sub_err_enum(
            $crate::make_error![@_impl $sub_err_enum::$($err_tail)::+$(($value))?]
        )
    };
}

#[derive(Debug)]
pub enum Error {
    Sync(Description),
    Io(std::io::Error),
    Yaml(serde_yaml::Error),
    Csv(csv::Error),
    InvalidConfiguration(InvalidConfiguration),
    DegenerateGeometry(Degenerate),
    Scene(Scene),
}

#[derive(Debug, Clone, PartialEq)]
pub enum InvalidConfiguration {
    NoAttractors,
    NonPositiveTimeStep(Coord),
    ZeroMaxSteps,
    ZeroDecimationInterval,
    NegativeTolerance(Coord),
    NegativePullRadius(Coord),
    VectorDimension(usize),
}

/// Integration reached a state with no defined direction or a non-finite value.
#[derive(Debug, Clone, PartialEq)]
pub struct Degenerate {
    pub step: usize,
    pub location: Vector,
}

#[derive(Debug)]
pub enum Scene {
    AttractorAlreadyExists(AttractorName),
    AttractorNotFound(AttractorName),
    BodyNotFound(BodyName),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Yaml(err)
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<InvalidConfiguration> for Error {
    fn from(err: InvalidConfiguration) -> Self {
        Self::InvalidConfiguration(err)
    }
}

impl From<Degenerate> for Error {
    fn from(err: Degenerate) -> Self {
        Self::DegenerateGeometry(err)
    }
}

impl From<Scene> for Error {
    fn from(err: Scene) -> Self {
        Self::Scene(err)
    }
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Sync(desc) => write!(f, "[sync] {}", desc),
            Error::Io(err) => write!(f, "[io] {}", err),
            Error::Yaml(err) => write!(f, "[yaml] {}", err),
            Error::Csv(err) => write!(f, "[csv] {}", err),
            Error::InvalidConfiguration(err) => write!(f, "[invalid configuration] {}", err),
            Error::DegenerateGeometry(err) => write!(f, "[degenerate geometry] {}", err),
            Error::Scene(err) => write!(f, "[scene] {}", err),
        }
    }
}

impl fmt::Display for InvalidConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoAttractors => write!(
                f,
                "no attractors given\nHINT: set `allow_freefall` to integrate without gravity"
            ),
            Self::NonPositiveTimeStep(dt) => write!(f, "distance time step must be positive, got {}", dt),
            Self::ZeroMaxSteps => write!(f, "max steps must be positive"),
            Self::ZeroDecimationInterval => write!(f, "decimation interval must be at least 1"),
            Self::NegativeTolerance(tolerance) => {
                write!(f, "tolerance distance must not be negative, got {}", tolerance)
            }
            Self::NegativePullRadius(radius) => {
                write!(f, "pull radius must not be negative, got {}", radius)
            }
            Self::VectorDimension(len) => write!(
                f,
                "expected 3-dimensional vector, got {} components\nHINT: vector format is [x, y, z]",
                len
            ),
        }
    }
}

impl fmt::Display for Degenerate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "step #{}: undefined direction at {}",
            self.step,
            VectorFormat::Precise(&self.location)
        )
    }
}

impl fmt::Display for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AttractorAlreadyExists(name) => write!(f, "`{}`: attractor already exists", name),
            Self::AttractorNotFound(name) => write!(f, "`{}`: attractor not found", name),
            Self::BodyNotFound(name) => write!(f, "`{}`: body not found", name),
        }
    }
}
