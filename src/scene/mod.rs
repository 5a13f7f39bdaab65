use {
    std::collections::{
        HashMap,
        hash_map::Entry,
    },
    log::{
        info,
        error,
    },
    crate::{
        Result,
        make_error,
        shared_access,
        shared::Shared,
        config::ScenarioConfig,
        r#type::{
            AttractorId,
            AttractorName,
            BodyId,
            BodyName,
            SatelliteId,
            Coord,
        },
    }
};

mod attractor;
pub mod track;
pub mod physics;
pub mod gravity;
pub mod satellite;
pub mod detect;

pub use attractor::{Attractor, center_of_mass};
pub use gravity::{GravityField, RigidBody, DynamicBody};
pub use satellite::Satellite;

const LOG_TARGET: &'static str = "scene";

#[derive(Debug)]
struct AttractorEntry {
    id: AttractorId,
    attractor: Shared<Attractor>,
    field: GravityField,

    /// Bodies the pull sphere center is averaged over, refreshed every tick.
    mass_bodies: Vec<BodyId>,
}

/// Registry driving attractor fields, free bodies and satellites in fixed ticks.
#[derive(Debug, Default)]
pub struct Scene {
    attractors: HashMap<AttractorName, AttractorEntry>,
    bodies: Vec<RigidBody>,
    satellites: Vec<Satellite>,
    last_attractor_id: AttractorId,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers everything in `scenario`. Satellites get their orbit
    /// computed right away.
    pub fn from_config(scenario: &ScenarioConfig) -> Result<Self> {
        let mut scene = Self::new();

        for cfg in scenario.attractors.iter() {
            scene.add_attractor(cfg.name.clone(), Attractor::from_config(cfg)?)?;
        }

        for cfg in scenario.bodies.iter() {
            scene.add_body(RigidBody::from_config(cfg)?);
        }

        for cfg in scenario.attractors.iter() {
            if !cfg.center_of_mass.is_empty() {
                scene.set_center_of_mass_bodies(&cfg.name, &cfg.center_of_mass)?;
            }
        }
        scene.refresh_centers()?;

        for cfg in scenario.satellites.iter() {
            let attractors = cfg.attractors
                .iter()
                .map(|name| scene.attractor(name).map(|attractor| attractor.downgrade()))
                .collect::<Result<Vec<_>>>()?;

            let mut satellite = Satellite::from_config(cfg, attractors)?;
            satellite.compute()?;
            scene.add_satellite(satellite);
        }

        info! {
            target: LOG_TARGET,
            "scene ready: {} attractors, {} bodies, {} satellites",
            scene.attractors.len(),
            scene.bodies.len(),
            scene.satellites.len()
        };

        Ok(scene)
    }

    pub fn add_attractor(&mut self, name: AttractorName, attractor: Attractor) -> Result<AttractorId> {
        match self.attractors.entry(name.clone()) {
            Entry::Occupied(_) => Err(make_error![Error::Scene::AttractorAlreadyExists(name)]),
            Entry::Vacant(entry) => {
                let id = self.last_attractor_id;
                self.last_attractor_id += 1;

                entry.insert(AttractorEntry {
                    id,
                    attractor: Shared::from(attractor),
                    field: GravityField::new(),
                    mass_bodies: vec![],
                });
                Ok(id)
            }
        }
    }

    /// Drops the scene handle. Satellites observing it skip it on their
    /// next computation.
    pub fn remove_attractor(&mut self, name: &str) -> Result<Shared<Attractor>> {
        self.attractors.remove(name)
            .map(|entry| entry.attractor)
            .ok_or(make_error![Error::Scene::AttractorNotFound(name.into())])
    }

    pub fn attractor(&self, name: &str) -> Result<&Shared<Attractor>> {
        self.entry(name).map(|entry| &entry.attractor)
    }

    pub fn attractor_id(&self, name: &str) -> Result<AttractorId> {
        self.entry(name).map(|entry| entry.id)
    }

    pub fn field(&self, name: &str) -> Result<&GravityField> {
        self.entry(name).map(|entry| &entry.field)
    }

    /// Makes the pull sphere of `name` follow the mass-weighted mean of
    /// `bodies`. An empty list restores the plain location.
    pub fn set_center_of_mass_bodies(&mut self, name: &str, bodies: &[BodyName]) -> Result<()> {
        let ids = bodies
            .iter()
            .map(|body_name| {
                self.bodies
                    .iter()
                    .position(|body| body.name() == body_name)
                    .ok_or(make_error![Error::Scene::BodyNotFound(body_name.clone())])
            })
            .collect::<Result<Vec<_>>>()?;

        let entry = self.attractors.get_mut(name)
            .ok_or(make_error![Error::Scene::AttractorNotFound(name.into())])?;

        entry.mass_bodies = ids;
        if entry.mass_bodies.is_empty() {
            let mut attractor = shared_access![mut entry.attractor];
            attractor.set_mass_samples(vec![]);
        }

        Ok(())
    }

    pub fn add_body(&mut self, mut body: RigidBody) -> BodyId {
        let id = self.bodies.len();
        body.set_id(id);
        self.bodies.push(body);

        id
    }

    pub fn add_satellite(&mut self, mut satellite: Satellite) -> SatelliteId {
        let id = self.satellites.len();
        satellite.set_id(id);
        self.satellites.push(satellite);

        id
    }

    pub fn bodies(&self) -> &[RigidBody] {
        &self.bodies
    }

    pub fn satellites(&self) -> &[Satellite] {
        &self.satellites
    }

    pub fn satellites_mut(&mut self) -> &mut [Satellite] {
        &mut self.satellites
    }

    /// One fixed tick: pull sphere centers follow their bodies, attractor
    /// fields push the bodies, bodies integrate, satellites serve pending
    /// recomputes and advance along their orbits.
    ///
    /// A satellite failing to recompute is logged and keeps moving without
    /// an orbit.
    pub fn fixed_step(&mut self, dt: Coord) -> Result<()> {
        self.refresh_centers()?;

        let bodies = &mut self.bodies;
        for entry in self.attractors.values_mut() {
            let attractor = shared_access![entry.attractor];
            entry.field.apply_step(&*attractor, bodies.iter_mut());
        }

        for body in self.bodies.iter_mut() {
            body.integrate(dt);
        }

        for satellite in self.satellites.iter_mut() {
            if let Err(err) = satellite.update() {
                error! {
                    target: LOG_TARGET,
                    "satellite `{}` lost its orbit: {}", satellite.name(), err
                };
            }

            satellite.advance(dt);
        }

        Ok(())
    }

    fn refresh_centers(&mut self) -> Result<()> {
        let bodies = &self.bodies;
        for entry in self.attractors.values_mut() {
            if entry.mass_bodies.is_empty() {
                continue;
            }

            let samples = entry.mass_bodies
                .iter()
                .filter_map(|id| bodies.get(*id))
                .map(|body| (*body.location(), body.mass()))
                .collect();

            let mut attractor = shared_access![mut entry.attractor];
            attractor.set_mass_samples(samples);
        }

        Ok(())
    }

    fn entry(&self, name: &str) -> Result<&AttractorEntry> {
        self.attractors.get(name)
            .ok_or(make_error![Error::Scene::AttractorNotFound(name.into())])
    }
}
