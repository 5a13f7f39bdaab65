use {
    log::{
        debug,
        error,
    },
    crate::{
        shared_access,
        shared::SharedWeak,
        config::{self, OrbitConfig, SatelliteConfig},
        math::slerp,
        scene::{
            Attractor,
            physics::compute_trajectory,
            track::{OrbitPath, sample_at},
        },
        r#type::{
            Vector,
            Coord,
            Mass,
            Distance,
            GravityCoeff,
            RelativeTime,
            SatelliteId,
            SatelliteName,
            VectorFormat,
        },
        Result,
    },
};

const LOG_TARGET: &'static str = "satellite";

/// Body moving on a precomputed orbit.
///
/// The orbit is computed from a snapshot of the attractors; the satellite
/// only observes them and never keeps them alive.
#[derive(Debug)]
pub struct Satellite {
    id: SatelliteId,
    name: SatelliteName,
    origin: Vector,
    starting_velocity: Vector,
    mass: Mass,
    speed_factor: Coord,
    orbit: OrbitConfig,
    attractors: Vec<SharedWeak<Attractor>>,
    path: Option<OrbitPath>,
    location: Vector,
    timer: RelativeTime,
    recalculate: bool,
}

impl Satellite {
    pub fn new(
        name: SatelliteName,
        origin: Vector,
        starting_velocity: Vector,
        orbit: OrbitConfig,
        attractors: Vec<SharedWeak<Attractor>>,
    ) -> Self {
        Self {
            id: 0,
            name,
            origin,
            starting_velocity,
            mass: 1.0,
            speed_factor: 1.0,
            orbit,
            attractors,
            path: None,
            location: origin,
            timer: 0.0,
            recalculate: false,
        }
    }

    pub fn from_config(cfg: &SatelliteConfig, attractors: Vec<SharedWeak<Attractor>>) -> Result<Self> {
        let mut satellite = Self::new(
            cfg.name.clone(),
            config::vector(&cfg.origin)?,
            config::vector(&cfg.velocity)?,
            cfg.orbit.clone(),
            attractors,
        );

        satellite.mass = cfg.mass;
        satellite.speed_factor = cfg.speed_factor;

        Ok(satellite)
    }

    pub fn id(&self) -> SatelliteId {
        self.id
    }

    pub fn set_id(&mut self, id: SatelliteId) {
        self.id = id;
    }

    pub fn name(&self) -> &SatelliteName {
        &self.name
    }

    pub fn location(&self) -> &Vector {
        &self.location
    }

    pub fn timer(&self) -> RelativeTime {
        self.timer
    }

    pub fn set_speed_factor(&mut self, speed_factor: Coord) {
        self.speed_factor = speed_factor;
    }

    /// Last computed orbit, `None` before the first successful computation.
    pub fn path(&self) -> Option<&OrbitPath> {
        self.path.as_ref()
    }

    pub fn request_recompute(&mut self) {
        self.recalculate = true;
    }

    pub fn is_recompute_requested(&self) -> bool {
        self.recalculate
    }

    /// Serves a pending recompute request, if any.
    pub fn update(&mut self) -> Result<()> {
        if self.recalculate {
            self.recalculate = false;
            self.compute()
        } else {
            Ok(())
        }
    }

    /// Recomputes the orbit right away. The previous path is dropped even
    /// if the new computation fails.
    pub fn compute(&mut self) -> Result<()> {
        self.path = None;

        let attractors = self.attractors_snapshot()?;
        let path = compute_trajectory(&self.origin, &self.starting_velocity, &attractors, &self.orbit)
            .map_err(|err| {
                error! {
                    target: LOG_TARGET,
                    "satellite `{}`: {}", self.name, err
                };

                err
            })?;

        debug! {
            target: LOG_TARGET,
            "satellite `{}` orbit: {} points around {} attractors",
            self.name,
            path.len(),
            attractors.len()
        };

        self.path = Some(path);
        Ok(())
    }

    /// Advances the playback timer and eases `current` toward the orbit
    /// sample at the new timer. The timer wraps into `[0, 1)` both ways, a
    /// negative speed factor plays the orbit backwards. Without an orbit
    /// `current` is kept.
    pub fn fixed_update(&mut self, dt: Coord, current: &Vector) -> Vector {
        self.timer = (self.timer + dt * self.speed_factor).rem_euclid(1.0);

        match &self.path {
            Some(path) if !path.is_empty() => {
                let target = sample_at(path, self.timer);
                slerp(current, &target, dt.max(0.0).min(1.0))
            }
            _ => *current,
        }
    }

    /// [`fixed_update`](Self::fixed_update) applied to the satellite own location.
    pub fn advance(&mut self, dt: Coord) -> &Vector {
        let current = self.location;
        self.location = self.fixed_update(dt, &current);

        &self.location
    }

    /// Distance to the nearest live attractor, infinite if there is none.
    pub fn closest_puller(&self, position: &Vector) -> Result<Distance> {
        let closest = self.attractors_snapshot()?
            .iter()
            .map(|attractor| (attractor.location() - position).norm())
            .fold(Distance::INFINITY, Distance::min);

        Ok(closest)
    }

    /// Rough circular speed around the nearest attractor.
    pub fn orbital_speed(&self, position: &Vector, gravity: GravityCoeff) -> Result<Coord> {
        let closest = self.closest_puller(position)?;
        Ok((gravity * self.mass / closest).sqrt())
    }

    fn attractors_snapshot(&self) -> Result<Vec<Attractor>> {
        let mut snapshot = Vec::with_capacity(self.attractors.len());

        for attractor in self.attractors.iter() {
            match attractor.upgrade() {
                Some(attractor) => snapshot.push(shared_access![attractor].clone()),
                None => debug! {
                    target: LOG_TARGET,
                    "satellite `{}` at {}: skipping dropped attractor",
                    self.name,
                    VectorFormat::Short(&self.location)
                },
            }
        }

        Ok(snapshot)
    }
}
