use {
    std::{
        io,
        ops::Index,
    },
    serde::Serialize,
    crate::{
        math::slerp,
        r#type::{
            Vector,
            Coord,
            Distance,
            RelativeTime,
        },
        Result,
    },
};

/// Why a trajectory computation stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// A recorded point came back within tolerance of the first one.
    Closed,

    /// The traversed angle reached a full revolution (single attractor only).
    FullRevolution,

    /// The step budget ran out first. The path is partial but usable.
    BudgetExceeded,
}

/// Decimated closed trajectory, traversal order.
///
/// The last point conceptually precedes the first one on re-loop.
#[derive(Debug, Clone)]
pub struct OrbitPath {
    points: Vec<Vector>,
    termination: Termination,
    steps: usize,
}

impl OrbitPath {
    pub fn new(points: Vec<Vector>, termination: Termination, steps: usize) -> Self {
        Self {
            points,
            termination,
            steps,
        }
    }

    pub fn points(&self) -> &[Vector] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&Vector> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&Vector> {
        self.points.last()
    }

    pub fn termination(&self) -> Termination {
        self.termination
    }

    pub fn is_closed(&self) -> bool {
        self.termination == Termination::Closed
    }

    pub fn budget_exceeded(&self) -> bool {
        self.termination == Termination::BudgetExceeded
    }

    /// Raw integration steps spent building the path.
    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn max_chord(&self) -> Distance {
        self.points
            .windows(2)
            .map(|pair| (pair[1] - pair[0]).norm())
            .fold(0.0, Distance::max)
    }

    /// Distance between the last recorded point and the first one.
    pub fn closure_gap(&self) -> Option<Distance> {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => Some((last - first).norm()),
            _ => None,
        }
    }

    /// Position at `t` in `[0, 1]`, see [`sample_at`].
    pub fn sample(&self, t: RelativeTime) -> Vector {
        sample_at(self, t)
    }
}

impl Index<usize> for OrbitPath {
    type Output = Vector;

    fn index(&self, index: usize) -> &Self::Output {
        &self.points[index]
    }
}

/// Continuous position on the path.
///
/// `t` is spread linearly over the point indices and neighbouring points are
/// slerped as directions from the coordinate origin, so orbits that are not
/// centered on the origin bend toward it between points (see
/// [`sample_at_centered`]). Outside `[0, 1]`, or on an empty path, the zero
/// vector is returned.
pub fn sample_at(path: &OrbitPath, t: RelativeTime) -> Vector {
    sample_at_centered(path, t, &Vector::zeros())
}

/// Same as [`sample_at`] but slerps around `center`.
pub fn sample_at_centered(path: &OrbitPath, t: RelativeTime, center: &Vector) -> Vector {
    if !(0.0..=1.0).contains(&t) || path.is_empty() {
        return Vector::zeros();
    }

    let last = path.len() - 1;
    let scaled = t * last as RelativeTime;
    let index = (scaled as usize).min(last);
    let fraction = scaled - index as RelativeTime;

    let from = path[index] - center;
    let to = path[(index + 1).min(last)] - center;

    center + slerp(&from, &to, fraction)
}

#[derive(Serialize)]
struct PathRow {
    index: usize,
    x: Coord,
    y: Coord,
    z: Coord,
}

/// Writes the path as `index,x,y,z` rows with a header.
pub fn write_csv<W: io::Write>(path: &OrbitPath, writer: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);

    for (index, point) in path.points().iter().enumerate() {
        writer.serialize(PathRow {
            index,
            x: point.x,
            y: point.y,
            z: point.z,
        })?;
    }

    writer.flush()?;
    Ok(())
}
