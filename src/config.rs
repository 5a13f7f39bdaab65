//! Scenario configuration loaded from YAML.
//!
//! ```yaml
//! attractors:
//!   - name: sun
//!     location: [0.0, 0.0, 0.0]
//!     gravity: 1.0
//!     pull_radius: 5.0          # GravityField cutoff
//!     center_offset: [0.0, 0.5, 0.0]
//!     pull_mask: 0xFFFFFFFF     # layers pulled by this attractor
//!     center_of_mass: [crate]   # pull sphere follows these bodies
//!
//! bodies:
//!   - name: crate
//!     location: [2.0, 0.0, 0.0]
//!     mass: 1.0
//!     layer: 0
//!   - name: player
//!     location: [0.0, 1.2, 0.0]
//!     mass: 1.0
//!     layer: 8
//!     anchored:
//!       status: [on_ground]
//!       surface_normal: [0.0, 1.0, 0.0]
//!
//! satellites:
//!   - name: moon
//!     origin: [1.0, 0.0, 0.0]
//!     velocity: [0.0, 1.0, 0.0]
//!     attractors: [sun]
//!     orbit:
//!       distance_time_step: 0.001
//!       max_steps: 20000
//!       decimation_interval: 10
//!       tolerance_distance: 0.02
//! ```

use {
    std::{
        fs::File,
        io::BufReader,
        path::Path,
    },
    serde::Deserialize,
    crate::{
        make_error,
        r#type::{
            Vector,
            Coord,
            Mass,
            Distance,
            GravityCoeff,
            Layer,
            LayerMask,
            AttractorName,
            BodyName,
            SatelliteName,
            ALL_LAYERS,
        },
        scene::gravity::StickStatus,
        Result,
    },
};

/// Integration parameters of one trajectory computation.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct OrbitConfig {
    pub distance_time_step: Coord, // fixed integration step, smaller is more accurate
    pub max_steps: usize,          // hard ceiling on integration iterations
    pub decimation_interval: usize, // record a point every N raw steps, higher = less points
    pub tolerance_distance: Distance, // closure threshold between the last and the first point
    pub allow_freefall: bool,      // integrate without any attractor
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            distance_time_step: 0.02,
            max_steps: 10000,
            decimation_interval: 100,
            tolerance_distance: 0.05,
            allow_freefall: false,
        }
    }
}

impl OrbitConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.distance_time_step > 0.0) || !self.distance_time_step.is_finite() {
            return Err(make_error![
                Error::InvalidConfiguration::NonPositiveTimeStep(self.distance_time_step)
            ]);
        }

        if self.max_steps == 0 {
            return Err(make_error![Error::InvalidConfiguration::ZeroMaxSteps]);
        }

        if self.decimation_interval == 0 {
            return Err(make_error![Error::InvalidConfiguration::ZeroDecimationInterval]);
        }

        if !(self.tolerance_distance >= 0.0) {
            return Err(make_error![
                Error::InvalidConfiguration::NegativeTolerance(self.tolerance_distance)
            ]);
        }

        Ok(())
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct AttractorConfig {
    pub name: AttractorName,
    pub location: Vec<Coord>,
    pub gravity: GravityCoeff,
    #[serde(default = "default_pull_radius")]
    pub pull_radius: Distance,
    #[serde(default)]
    pub center_offset: Option<Vec<Coord>>,
    #[serde(default = "default_pull_mask")]
    pub pull_mask: LayerMask,
    #[serde(default)]
    pub center_of_mass: Vec<BodyName>, // bodies whose mass-weighted mean moves the pull sphere
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StickFlag {
    Stranded,
    OnGround,
    Flying,
    ChangingPlanet,
}

#[derive(Deserialize, Debug, Clone)]
pub struct AnchoredConfig {
    #[serde(default)]
    pub status: Vec<StickFlag>,
    #[serde(default)]
    pub surface_normal: Option<Vec<Coord>>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct BodyConfig {
    pub name: BodyName,
    pub location: Vec<Coord>,
    #[serde(default)]
    pub velocity: Option<Vec<Coord>>,
    pub mass: Mass,
    #[serde(default)]
    pub layer: Layer,
    #[serde(default)]
    pub kinematic: bool,
    #[serde(default)]
    pub anchored: Option<AnchoredConfig>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct SatelliteConfig {
    pub name: SatelliteName,
    pub origin: Vec<Coord>,
    #[serde(default = "default_starting_velocity")]
    pub velocity: Vec<Coord>,
    #[serde(default = "default_one")]
    pub mass: Mass,
    #[serde(default = "default_one")]
    pub speed_factor: Coord,
    pub attractors: Vec<AttractorName>,
    #[serde(default)]
    pub orbit: OrbitConfig,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub attractors: Vec<AttractorConfig>,
    #[serde(default)]
    pub bodies: Vec<BodyConfig>,
    #[serde(default)]
    pub satellites: Vec<SatelliteConfig>,
}

impl ScenarioConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let scenario = serde_yaml::from_reader(reader)?;

        Ok(scenario)
    }

    pub fn parse(src: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(src)?)
    }
}

impl AnchoredConfig {
    pub fn status(&self) -> StickStatus {
        self.status.iter().fold(StickStatus::empty(), |status, flag| {
            status | match flag {
                StickFlag::Stranded => StickStatus::STRANDED,
                StickFlag::OnGround => StickStatus::ON_GROUND,
                StickFlag::Flying => StickStatus::FLYING,
                StickFlag::ChangingPlanet => StickStatus::CHANGING_PLANET,
            }
        })
    }
}

pub fn vector(components: &[Coord]) -> Result<Vector> {
    if components.len() != 3 {
        return Err(make_error![Error::InvalidConfiguration::VectorDimension(components.len())]);
    }

    Ok(Vector::from_row_slice(components))
}

fn default_pull_radius() -> Distance {
    5.0
}

fn default_pull_mask() -> LayerMask {
    ALL_LAYERS
}

fn default_starting_velocity() -> Vec<Coord> {
    vec![0.0, 1.0, 0.0]
}

fn default_one() -> Coord {
    1.0
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{Error, error::InvalidConfiguration},
    };

    #[test]
    fn test_orbit_defaults() {
        let config = OrbitConfig::default();

        assert_eq!(config.distance_time_step, 0.02);
        assert_eq!(config.max_steps, 10000);
        assert_eq!(config.decimation_interval, 100);
        assert_eq!(config.tolerance_distance, 0.05);
        assert!(!config.allow_freefall);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_orbit_validation() {
        let mut config = OrbitConfig::default();
        config.distance_time_step = 0.0;
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidConfiguration(InvalidConfiguration::NonPositiveTimeStep(_)))
        ));

        config.distance_time_step = -1.0;
        assert!(config.validate().is_err());

        let mut config = OrbitConfig::default();
        config.decimation_interval = 0;
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidConfiguration(InvalidConfiguration::ZeroDecimationInterval))
        ));

        let mut config = OrbitConfig::default();
        config.max_steps = 0;
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidConfiguration(InvalidConfiguration::ZeroMaxSteps))
        ));

        let mut config = OrbitConfig::default();
        config.tolerance_distance = -0.1;
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidConfiguration(InvalidConfiguration::NegativeTolerance(_)))
        ));

        config.tolerance_distance = 0.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_scenario() {
        let scenario = ScenarioConfig::parse(
            r#"
attractors:
  - name: sun
    location: [0.0, 0.0, 0.0]
    gravity: 2.5
bodies:
  - name: player
    location: [0.0, 1.0, 0.0]
    mass: 1.0
    layer: 8
    anchored:
      status: [on_ground, flying]
      surface_normal: [0.0, 1.0, 0.0]
satellites:
  - name: moon
    origin: [1.0, 0.0, 0.0]
    attractors: [sun]
    orbit:
      decimation_interval: 10
"#,
        ).unwrap();

        let sun = &scenario.attractors[0];
        assert_eq!(sun.pull_radius, 5.0);
        assert_eq!(sun.pull_mask, ALL_LAYERS);
        assert!(sun.center_offset.is_none());
        assert!(sun.center_of_mass.is_empty());

        let anchored = scenario.bodies[0].anchored.as_ref().unwrap();
        assert_eq!(anchored.status(), StickStatus::ON_GROUND | StickStatus::FLYING);

        let moon = &scenario.satellites[0];
        assert_eq!(moon.velocity, vec![0.0, 1.0, 0.0]);
        assert_eq!(moon.speed_factor, 1.0);
        assert_eq!(moon.orbit.decimation_interval, 10);
        assert_eq!(moon.orbit.max_steps, 10000);
    }

    #[test]
    fn test_vector_dimension() {
        assert_eq!(vector(&[1.0, 2.0, 3.0]).unwrap(), Vector::new(1.0, 2.0, 3.0));
        assert!(matches!(
            vector(&[1.0, 2.0]),
            Err(Error::InvalidConfiguration(InvalidConfiguration::VectorDimension(2)))
        ));
    }
}
