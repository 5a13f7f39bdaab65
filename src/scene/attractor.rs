use {
    crate::{
        config::{self, AttractorConfig},
        make_error,
        r#type::{
            Vector,
            Mass,
            Distance,
            GravityCoeff,
            LayerMask,
            Layer,
            layer_bit,
            ALL_LAYERS,
        },
        Result,
    }
};

/// A point source of gravity.
///
/// `gravity_coeff` is the tuned product used directly as acceleration
/// numerator, it is not multiplied by any mass.
#[derive(Debug, Clone, PartialEq)]
pub struct Attractor {
    location: Vector,
    gravity_coeff: GravityCoeff,
    pull_radius: Distance,
    center_offset: Vector,
    pull_mask: LayerMask,
    mass_samples: Vec<(Vector, Mass)>,
}

impl Attractor {
    pub fn new(location: Vector, gravity_coeff: GravityCoeff) -> Self {
        Self {
            location,
            gravity_coeff,
            pull_radius: Distance::INFINITY,
            center_offset: Vector::zeros(),
            pull_mask: ALL_LAYERS,
            mass_samples: vec![],
        }
    }

    pub fn from_config(cfg: &AttractorConfig) -> Result<Self> {
        let mut attractor = Self::new(config::vector(&cfg.location)?, cfg.gravity)
            .with_pull_radius(cfg.pull_radius)?
            .with_pull_mask(cfg.pull_mask);

        if let Some(offset) = &cfg.center_offset {
            attractor = attractor.with_center_offset(config::vector(offset)?);
        }

        Ok(attractor)
    }

    pub fn with_pull_radius(mut self, pull_radius: Distance) -> Result<Self> {
        if !(pull_radius >= 0.0) {
            return Err(make_error![Error::InvalidConfiguration::NegativePullRadius(pull_radius)]);
        }

        self.pull_radius = pull_radius;
        Ok(self)
    }

    pub fn with_center_offset(mut self, offset: Vector) -> Self {
        self.center_offset = offset;
        self
    }

    pub fn with_pull_mask(mut self, mask: LayerMask) -> Self {
        self.pull_mask = mask;
        self
    }

    pub fn location(&self) -> &Vector {
        &self.location
    }

    pub fn set_location(&mut self, location: Vector) {
        self.location = location;
    }

    pub fn gravity_coeff(&self) -> GravityCoeff {
        self.gravity_coeff
    }

    pub fn set_gravity_coeff(&mut self, gravity_coeff: GravityCoeff) {
        self.gravity_coeff = gravity_coeff;
    }

    pub fn pull_radius(&self) -> Distance {
        self.pull_radius
    }

    pub fn pull_mask(&self) -> LayerMask {
        self.pull_mask
    }

    pub fn pulls_layer(&self, layer: Layer) -> bool {
        self.pull_mask & layer_bit(layer) != 0
    }

    /// Switches the center to the mass-weighted mean of the given samples.
    /// An empty sample set restores the plain location.
    pub fn set_mass_samples(&mut self, samples: Vec<(Vector, Mass)>) {
        self.mass_samples = samples;
    }

    /// Location the attractor pulls toward, offset included.
    pub fn center(&self) -> Vector {
        let base = if self.mass_samples.is_empty() {
            self.location
        } else {
            center_of_mass(&self.mass_samples).unwrap_or(self.location)
        };

        base + self.center_offset
    }

    pub fn contains(&self, location: &Vector) -> bool {
        (location - self.center()).norm() <= self.pull_radius
    }
}

/// `None` when the total mass is not positive.
pub fn center_of_mass(samples: &[(Vector, Mass)]) -> Option<Vector> {
    let (weighted, total) = samples.iter().fold(
        (Vector::zeros(), 0.0),
        |(weighted, total), (location, mass)| (weighted + location.scale(*mass), total + mass)
    );

    if total > 0.0 {
        Some(weighted.unscale(total))
    } else {
        None
    }
}
