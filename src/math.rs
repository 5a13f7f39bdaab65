use {
    serde::Deserialize,
    super::r#type::{
        Vector,
        Coord,
        Degrees,
        Distance,
        GravityCoeff,
        Rotation,
    }
};

const EPS: Coord = 1e-12;

/// How a distance is reported to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMetric {
    ExactDistance,
    SquaredDistance,
}

impl Default for DistanceMetric {
    fn default() -> Self {
        DistanceMetric::ExactDistance
    }
}

impl DistanceMetric {
    pub fn between(&self, lhs: &Vector, rhs: &Vector) -> Distance {
        let diff = lhs - rhs;
        match self {
            DistanceMetric::ExactDistance => diff.norm(),
            DistanceMetric::SquaredDistance => diff.norm_squared(),
        }
    }
}

/// Unsigned angle between two vectors in degrees.
///
/// Zero when either vector has no length.
pub fn angle_deg(lhs: &Vector, rhs: &Vector) -> Degrees {
    if lhs.norm_squared() < EPS || rhs.norm_squared() < EPS {
        return 0.0;
    }

    let sin = lhs.cross(rhs).norm();
    let cos = lhs.dot(rhs);

    sin.atan2(cos).to_degrees()
}

/// Spherical interpolation of two vectors seen as directions from the origin.
///
/// Direction follows the great circle, magnitude is interpolated linearly.
/// `t` is not clamped.
pub fn slerp(from: &Vector, to: &Vector, t: Coord) -> Vector {
    let from_len = from.norm();
    let to_len = to.norm();

    if from_len < EPS || to_len < EPS {
        return from.lerp(to, t);
    }

    let from_dir = from / from_len;
    let to_dir = to / to_len;
    let length = from_len + (to_len - from_len) * t;

    let cos = from_dir.dot(&to_dir).max(-1.0).min(1.0);
    let theta = cos.acos();

    let dir = if theta < 1e-9 {
        from_dir.lerp(&to_dir, t)
    } else if (std::f64::consts::PI - theta) < 1e-9 {
        // Antipodal: every great circle works, rotate around any perpendicular.
        let axis = any_perpendicular(&from_dir);
        let rotation = Rotation::from_axis_angle(
            &nalgebra::Unit::new_normalize(axis),
            theta * t
        );
        rotation * from_dir
    } else {
        let sin = theta.sin();
        let from_coeff = ((1.0 - t) * theta).sin() / sin;
        let to_coeff = (t * theta).sin() / sin;
        from_dir.scale(from_coeff) + to_dir.scale(to_coeff)
    };

    match dir.try_normalize(EPS) {
        Some(dir) => dir.scale(length),
        None => from.lerp(to, t),
    }
}

/// Acceleration contributed by one point source at `source` on a point at `location`.
///
/// `None` when both points coincide.
pub fn inverse_square(source: &Vector, gravity: GravityCoeff, location: &Vector) -> Option<Vector> {
    let dir = source - location;
    let distance2 = dir.norm_squared();

    if distance2 == 0.0 || !distance2.is_finite() {
        return None;
    }

    let distance = distance2.sqrt();
    Some(dir.unscale(distance).scale(gravity / distance2))
}

/// Shortest distance from `point` to the segment `[start, end]`.
pub fn segment_distance(point: &Vector, start: &Vector, end: &Vector) -> Distance {
    let segment = end - start;
    let length2 = segment.norm_squared();

    if length2 < EPS {
        return (point - start).norm();
    }

    let t = ((point - start).dot(&segment) / length2).max(0.0).min(1.0);
    let closest = start + segment.scale(t);

    (point - closest).norm()
}

/// Rotation taking `from` onto `to`.
pub fn from_to_rotation(from: &Vector, to: &Vector) -> Rotation {
    match Rotation::rotation_between(from, to) {
        Some(rotation) => rotation,
        None if from.dot(to) < 0.0 => {
            let axis = nalgebra::Unit::new_normalize(any_perpendicular(from));
            Rotation::from_axis_angle(&axis, std::f64::consts::PI)
        }
        None => Rotation::identity(),
    }
}

fn any_perpendicular(v: &Vector) -> Vector {
    let candidate = if v.x.abs() < 0.9 { Vector::x() } else { Vector::y() };
    v.cross(&candidate)
}
