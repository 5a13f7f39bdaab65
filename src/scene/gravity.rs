use {
    std::ops::{BitOr, BitOrAssign},
    log::trace,
    crate::{
        config::{self, BodyConfig},
        scene::Attractor,
        r#type::{
            Vector,
            Coord,
            Mass,
            Layer,
            BodyId,
            BodyName,
            VectorFormat,
        },
        Result,
    },
};

const LOG_TARGET: &'static str = "gravity";

/// Contact flags of a body resting on a planet.
///
/// `STRANDED` never comes together with the other flags, whoever sets the
/// status is responsible for that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StickStatus(u8);

impl StickStatus {
    pub const STRANDED: Self = Self(1 << 0);
    pub const ON_GROUND: Self = Self(1 << 1);
    pub const FLYING: Self = Self(1 << 2);
    pub const CHANGING_PLANET: Self = Self(1 << 3);

    pub fn empty() -> Self {
        Self(0)
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn contains(&self, other: Self) -> bool {
        other.0 != 0 && self.0 & other.0 == other.0
    }

    pub fn bits(&self) -> u8 {
        self.0
    }
}

impl BitOr for StickStatus {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for StickStatus {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnchoredInfo {
    pub status: StickStatus,
    pub surface_normal: Option<Vector>,
}

impl AnchoredInfo {
    /// Normal the gravity override pushes against, if the override applies.
    pub fn override_normal(&self) -> Option<&Vector> {
        if self.status.contains(StickStatus::STRANDED) {
            None
        } else {
            self.surface_normal.as_ref()
        }
    }
}

/// Anything a [`GravityField`] can push.
pub trait DynamicBody {
    fn position(&self) -> Vector;

    fn apply_force(&mut self, force: &Vector);

    fn layer(&self) -> Layer {
        0
    }

    fn receives_forces(&self) -> bool {
        true
    }

    fn anchored(&self) -> Option<&AnchoredInfo> {
        None
    }
}

/// Point-mass body with an additive force accumulator.
#[derive(Debug, Clone)]
pub struct RigidBody {
    id: BodyId,
    name: BodyName,
    location: Vector,
    velocity: Vector,
    mass: Mass,
    layer: Layer,
    kinematic: bool,
    anchored: Option<AnchoredInfo>,
    force: Vector,
}

impl RigidBody {
    pub fn new(name: BodyName, location: Vector, mass: Mass) -> Self {
        Self {
            id: 0,
            name,
            location,
            velocity: Vector::zeros(),
            mass,
            layer: 0,
            kinematic: false,
            anchored: None,
            force: Vector::zeros(),
        }
    }

    pub fn from_config(cfg: &BodyConfig) -> Result<Self> {
        let mut body = Self::new(cfg.name.clone(), config::vector(&cfg.location)?, cfg.mass);
        body.layer = cfg.layer;
        body.kinematic = cfg.kinematic;

        if let Some(velocity) = &cfg.velocity {
            body.velocity = config::vector(velocity)?;
        }

        if let Some(anchored) = &cfg.anchored {
            let surface_normal = match &anchored.surface_normal {
                Some(normal) => Some(config::vector(normal)?),
                None => None,
            };

            body.anchored = Some(AnchoredInfo {
                status: anchored.status(),
                surface_normal,
            });
        }

        Ok(body)
    }

    pub fn id(&self) -> BodyId {
        self.id
    }

    pub fn set_id(&mut self, id: BodyId) {
        self.id = id;
    }

    pub fn name(&self) -> &BodyName {
        &self.name
    }

    pub fn location(&self) -> &Vector {
        &self.location
    }

    pub fn velocity(&self) -> &Vector {
        &self.velocity
    }

    pub fn set_velocity(&mut self, velocity: Vector) {
        self.velocity = velocity;
    }

    pub fn mass(&self) -> Mass {
        self.mass
    }

    pub fn set_layer(&mut self, layer: Layer) {
        self.layer = layer;
    }

    pub fn set_kinematic(&mut self, kinematic: bool) {
        self.kinematic = kinematic;
    }

    pub fn set_anchored(&mut self, anchored: Option<AnchoredInfo>) {
        self.anchored = anchored;
    }

    /// Force accumulated since the last [`integrate`](Self::integrate).
    pub fn pending_force(&self) -> &Vector {
        &self.force
    }

    /// Semi-implicit Euler over the accumulated force, then clears it.
    pub fn integrate(&mut self, dt: Coord) {
        if self.receives_forces() {
            self.velocity += self.force.unscale(self.mass).scale(dt);
        }

        self.location += self.velocity.scale(dt);
        self.force = Vector::zeros();
    }
}

impl DynamicBody for RigidBody {
    fn position(&self) -> Vector {
        self.location
    }

    fn apply_force(&mut self, force: &Vector) {
        self.force += force;
    }

    fn layer(&self) -> Layer {
        self.layer
    }

    fn receives_forces(&self) -> bool {
        !self.kinematic && self.mass > 0.0
    }

    fn anchored(&self) -> Option<&AnchoredInfo> {
        self.anchored.as_ref()
    }
}

/// One force handed out during the last [`GravityField::apply_step`].
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedForce {
    /// Position of the body in the candidate sequence.
    pub body: usize,
    pub force: Vector,
    pub anchored: bool,
}

/// Per-attractor force accumulator.
#[derive(Debug, Default)]
pub struct GravityField {
    last_forces: Vec<AppliedForce>,
}

impl GravityField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes every qualifying body toward `attractor` (or against its
    /// surface normal when anchored) and returns how many were pushed.
    pub fn apply_step<'a, B, I>(&mut self, attractor: &Attractor, bodies: I) -> usize
    where
        B: DynamicBody + ?Sized + 'a,
        I: IntoIterator<Item = &'a mut B>,
    {
        self.last_forces.clear();

        for (index, body) in bodies.into_iter().enumerate() {
            if let Some((force, anchored)) = field_force(attractor, &*body) {
                body.apply_force(&force);
                self.last_forces.push(AppliedForce {
                    body: index,
                    force,
                    anchored,
                });
            }
        }

        trace! {
            target: LOG_TARGET,
            "attractor at {} pushed {} bodies",
            VectorFormat::Short(&attractor.center()),
            self.last_forces.len()
        };

        self.last_forces.len()
    }

    pub fn last_forces(&self) -> &[AppliedForce] {
        &self.last_forces
    }
}

/// Force `attractor` puts on `body` this step, flagged when the anchored
/// override was used.
///
/// The pull sphere is measured from [`Attractor::center`], the radial force
/// points at [`Attractor::location`]. `None` when the body is filtered out,
/// or when it sits exactly on the location and the direction is undefined.
pub fn field_force<B>(attractor: &Attractor, body: &B) -> Option<(Vector, bool)>
where
    B: DynamicBody + ?Sized,
{
    let position = body.position();

    if !body.receives_forces()
        || !attractor.pulls_layer(body.layer())
        || !attractor.contains(&position) {
        return None;
    }

    let gravity = attractor.gravity_coeff();

    if let Some(normal) = body.anchored().and_then(AnchoredInfo::override_normal) {
        return Some((-normal.scale(gravity), true));
    }

    let direction = (attractor.location() - position).try_normalize(0.0)?;
    Some((direction.scale(gravity), false))
}
