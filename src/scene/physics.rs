use {
    log::{
        debug,
        warn,
        error,
    },
    crate::{
        make_error,
        config::OrbitConfig,
        math::{angle_deg, inverse_square},
        scene::{
            Attractor,
            track::{OrbitPath, Termination},
        },
        r#type::{
            Vector,
            Coord,
            Degrees,
            VectorFormat,
        },
        error::Degenerate,
        Result,
    },
};

const LOG_TARGET: &'static str = "physics";

const FULL_REVOLUTION: Degrees = 360.0;

/// Integration state of one trajectory computation.
#[derive(Debug, Clone)]
pub struct SimulationState {
    pub location: Vector,
    pub velocity: Vector,
    pub last_location: Vector,
    pub traversed_angle: Degrees,
    pub window_angle: Degrees,
    pub step: usize,
}

impl SimulationState {
    pub fn new(origin: Vector, velocity: Vector) -> Self {
        Self {
            location: origin,
            velocity,
            last_location: origin,
            traversed_angle: 0.0,
            window_angle: 0.0,
            step: 0,
        }
    }

    /// Semi-implicit Euler: velocity first, then location with the new velocity.
    pub fn advance(&mut self, acceleration: &Vector, dt: Coord) {
        self.velocity += acceleration.scale(dt);
        self.location += self.velocity.scale(dt);
    }

    pub fn is_finite(&self) -> bool {
        self.location.iter().chain(self.velocity.iter()).all(|c| c.is_finite())
    }

    fn degenerate(&self) -> Degenerate {
        Degenerate {
            step: self.step,
            location: self.location,
        }
    }
}

/// Inverse-square superposition of every attractor at `location`.
///
/// Attractors pull from their plain location, the center offset only shapes
/// their pull sphere. `None` if `location` coincides with an attractor or the
/// sum is not finite.
pub fn acceleration(location: &Vector, attractors: &[Attractor]) -> Option<Vector> {
    let mut acceleration = Vector::zeros();
    for attractor in attractors.iter() {
        acceleration += inverse_square(attractor.location(), attractor.gravity_coeff(), location)?;
    }

    if acceleration.iter().all(|c| c.is_finite()) {
        Some(acceleration)
    } else {
        None
    }
}

/// Integrates a closed orbit from `origin` and decimates it into an [`OrbitPath`].
///
/// A point is recorded every `decimation_interval` steps. The loop stops when
/// a recorded point returns within `tolerance_distance` of the first one,
/// when a single attractor has been swept by a full revolution, or when
/// `max_steps` is spent. The last recorded point is dropped on exit.
///
/// The revolution sweep is only measured with exactly one attractor; with
/// several of them only the closure distance and the step budget stop the loop.
///
/// # Errors
/// - `InvalidConfiguration` for a bad `config` or no attractors without `allow_freefall`.
/// - `DegenerateGeometry` when the simulated point hits an attractor or
///   the state stops being finite. The partial path is discarded.
pub fn compute_trajectory(
    origin: &Vector,
    velocity: &Vector,
    attractors: &[Attractor],
    config: &OrbitConfig,
) -> Result<OrbitPath> {
    config.validate()?;

    if attractors.is_empty() && !config.allow_freefall {
        return Err(make_error![Error::InvalidConfiguration::NoAttractors]);
    }

    let dt = config.distance_time_step;
    let measure_sweep = attractors.len() == 1;

    let mut state = SimulationState::new(*origin, *velocity);
    let mut points = vec![];
    let mut closed = false;

    while state.traversed_angle < FULL_REVOLUTION && state.step < config.max_steps {
        if state.step % config.decimation_interval == 0 {
            points.push(state.location);
            state.traversed_angle += state.window_angle;
            state.window_angle = 0.0;

            let distance = (state.location - points[0]).norm();
            if points.len() > 1 && distance < config.tolerance_distance {
                closed = true;
                break;
            }
        }

        let acceleration = match acceleration(&state.location, attractors) {
            Some(acceleration) => acceleration,
            None => return Err(log_degenerate(state.degenerate())),
        };

        state.advance(&acceleration, dt);
        if !state.is_finite() {
            return Err(log_degenerate(state.degenerate()));
        }

        if measure_sweep {
            state.window_angle += angle_deg(&state.location, &state.last_location);
        }

        state.last_location = state.location;
        state.step += 1;
    }

    let termination = if closed {
        Termination::Closed
    } else if state.traversed_angle >= FULL_REVOLUTION {
        Termination::FullRevolution
    } else {
        Termination::BudgetExceeded
    };

    points.pop();

    match termination {
        Termination::BudgetExceeded => warn! {
            target: LOG_TARGET,
            "step budget of {} spent before closure, keeping {} points",
            config.max_steps,
            points.len()
        },
        _ => debug! {
            target: LOG_TARGET,
            "trajectory from {}: {} points in {} steps ({:?}, {:.1} deg swept)",
            VectorFormat::Short(origin),
            points.len(),
            state.step,
            termination,
            state.traversed_angle
        },
    }

    Ok(OrbitPath::new(points, termination, state.step))
}

fn log_degenerate(err: Degenerate) -> crate::Error {
    error! {
        target: LOG_TARGET,
        "unable to compute trajectory: {}", err
    };

    err.into()
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{Error, error::InvalidConfiguration},
        approx::abs_diff_eq,
    };

    fn circular_config(tolerance_distance: Coord) -> OrbitConfig {
        OrbitConfig {
            distance_time_step: 0.001,
            max_steps: 20000,
            decimation_interval: 50,
            tolerance_distance,
            allow_freefall: false,
        }
    }

    fn unit_orbit(tolerance_distance: Coord) -> Result<OrbitPath> {
        let sun = Attractor::new(Vector::zeros(), 1.0);
        compute_trajectory(
            &Vector::new(1.0, 0.0, 0.0),
            &Vector::new(0.0, 1.0, 0.0),
            &[sun],
            &circular_config(tolerance_distance),
        )
    }

    fn freefall_config(max_steps: usize, decimation_interval: usize) -> OrbitConfig {
        OrbitConfig {
            distance_time_step: 0.01,
            max_steps,
            decimation_interval,
            tolerance_distance: 0.0,
            allow_freefall: true,
        }
    }

    #[test]
    fn test_circular_orbit_closes() {
        let tolerance = 0.04;
        let path = unit_orbit(tolerance).unwrap();

        assert_eq!(path.termination(), Termination::Closed);
        assert!(path.len() > 100);

        for point in path.points() {
            assert!((point.norm() - 1.0).abs() < tolerance);
        }

        // The closing point itself is dropped, so the kept end sits at most
        // one chord further away than the tolerance.
        let gap = path.closure_gap().unwrap();
        assert!(gap < tolerance + path.max_chord());
    }

    #[test]
    fn test_point_spacing() {
        let path = unit_orbit(0.04).unwrap();

        // decimation_interval * distance_time_step * |v|
        let expected = 50.0 * 0.001 * 1.0;
        for pair in path.points().windows(2) {
            assert!(abs_diff_eq!((pair[1] - pair[0]).norm(), expected, epsilon = 1e-3));
        }
    }

    #[test]
    fn test_closure_monotonicity() {
        let tolerances = [0.045, 0.04, 0.03, 0.02, 0.01, 0.0];
        let lens = tolerances
            .iter()
            .map(|tolerance| unit_orbit(*tolerance).unwrap().len())
            .collect::<Vec<_>>();

        for pair in lens.windows(2) {
            assert!(pair[1] >= pair[0], "tighter tolerance lost points: {:?}", lens);
            assert!(pair[1] <= 2 * pair[0], "tighter tolerance exploded: {:?}", lens);
        }
    }

    #[test]
    fn test_zero_tolerance_stops_on_revolution() {
        let path = unit_orbit(0.0).unwrap();

        assert_eq!(path.termination(), Termination::FullRevolution);
        assert!(path.steps() < 20000);
    }

    #[test]
    fn test_decimation_count() {
        let velocity = Vector::new(1.0, 0.0, 0.0);
        let count = |max_steps, decimation_interval| {
            compute_trajectory(
                &Vector::zeros(),
                &velocity,
                &[],
                &freefall_config(max_steps, decimation_interval),
            ).unwrap()
        };

        let d = 10;
        assert_eq!(count(d, d).len(), 0);
        assert_eq!(count(2 * d - 1, d).len(), 1);
        assert_eq!(count(2 * d, d).len(), 1);
        assert_eq!(count(2 * d + 1, d).len(), 2);
        assert_eq!(count(1000, d).len(), 99);

        let path = count(1000, d);
        assert!(path.budget_exceeded());
        assert_eq!(path.steps(), 1000);
        assert!(abs_diff_eq!(path[1].x, 0.1, epsilon = 1e-12));
    }

    #[test]
    fn test_budget_exceeded_is_partial() {
        let sun = Attractor::new(Vector::zeros(), 1.0);
        let mut config = circular_config(0.04);
        config.max_steps = 1000;

        let path = compute_trajectory(
            &Vector::new(1.0, 0.0, 0.0),
            &Vector::new(0.0, 1.0, 0.0),
            &[sun],
            &config,
        ).unwrap();

        assert!(path.budget_exceeded());
        assert_eq!(path.len(), 19);
    }

    #[test]
    fn test_several_attractors_skip_revolution_sweep() {
        let halves = [
            Attractor::new(Vector::zeros(), 0.5),
            Attractor::new(Vector::zeros(), 0.5),
        ];
        let origin = Vector::new(1.0, 0.0, 0.0);
        let velocity = Vector::new(0.0, 1.0, 0.0);

        let closed = compute_trajectory(&origin, &velocity, &halves, &circular_config(0.04)).unwrap();
        assert_eq!(closed.termination(), Termination::Closed);
        assert_eq!(closed.len(), unit_orbit(0.04).unwrap().len());

        let open = compute_trajectory(&origin, &velocity, &halves, &circular_config(0.0)).unwrap();
        assert_eq!(open.termination(), Termination::BudgetExceeded);
        assert_eq!(open.len(), 20000 / 50 - 1);
    }

    #[test]
    fn test_no_attractors() {
        let mut config = circular_config(0.04);
        let result = compute_trajectory(&Vector::zeros(), &Vector::x(), &[], &config);
        assert!(matches!(
            result,
            Err(Error::InvalidConfiguration(InvalidConfiguration::NoAttractors))
        ));

        config.allow_freefall = true;
        let path = compute_trajectory(&Vector::zeros(), &Vector::x(), &[], &config).unwrap();
        assert!(path.points().iter().all(|p| p.y == 0.0 && p.z == 0.0));
    }

    #[test]
    fn test_invalid_time_step() {
        let sun = Attractor::new(Vector::zeros(), 1.0);
        let mut config = circular_config(0.04);
        config.distance_time_step = 0.0;

        let result = compute_trajectory(&Vector::x(), &Vector::y(), &[sun], &config);
        assert!(matches!(
            result,
            Err(Error::InvalidConfiguration(InvalidConfiguration::NonPositiveTimeStep(_)))
        ));
    }

    #[test]
    fn test_degenerate_geometry() {
        let sun = Attractor::new(Vector::new(1.0, 0.0, 0.0), 1.0);
        let result = compute_trajectory(
            &Vector::new(1.0, 0.0, 0.0),
            &Vector::y(),
            &[sun],
            &circular_config(0.04),
        );

        match result {
            Err(Error::DegenerateGeometry(degenerate)) => {
                assert_eq!(degenerate.step, 0);
                assert_eq!(degenerate.location, Vector::new(1.0, 0.0, 0.0));
            }
            other => panic!("expected degenerate geometry, got {:?}", other),
        }
    }

    #[test]
    fn test_non_finite_state() {
        let sun = Attractor::new(Vector::zeros(), Coord::INFINITY);
        let result = compute_trajectory(
            &Vector::new(1.0, 0.0, 0.0),
            &Vector::y(),
            &[sun],
            &circular_config(0.04),
        );

        assert!(matches!(result, Err(Error::DegenerateGeometry(_))));
    }

    #[test]
    fn test_acceleration_superposition() {
        let attractors = [
            Attractor::new(Vector::new(0.0, 0.0, 0.0), 10.0),
            Attractor::new(Vector::new(10.0, 0.0, 0.0), 10.0),
        ];

        let net = acceleration(&Vector::new(5.0, 0.0, 0.0), &attractors).unwrap();
        assert!(abs_diff_eq!(net.norm(), 0.0, epsilon = 1e-12));

        let single = acceleration(&Vector::new(5.0, 0.0, 0.0), &attractors[..1]).unwrap();
        assert!(abs_diff_eq!(single.x, -10.0 / 25.0, epsilon = 1e-12));
    }

    #[test]
    fn test_acceleration_ignores_center_offset() {
        let plain = Attractor::new(Vector::zeros(), 4.0);
        let shifted = Attractor::new(Vector::zeros(), 4.0)
            .with_center_offset(Vector::new(0.0, 5.0, 0.0));
        let location = Vector::new(2.0, 0.0, 0.0);

        let expected = acceleration(&location, &[plain]).unwrap();
        let actual = acceleration(&location, &[shifted]).unwrap();

        assert!(abs_diff_eq!((actual - expected).norm(), 0.0, epsilon = 1e-12));
        assert!(abs_diff_eq!(actual.x, -1.0, epsilon = 1e-12));
    }

    #[test]
    fn test_closure_wins_over_full_revolution() {
        // The second recorded point lies a bit more than one revolution
        // ahead (6.4 rad) and inside the tolerance, so both criteria fire
        // at the same point.
        let sun = Attractor::new(Vector::zeros(), 1.0);
        let config = OrbitConfig {
            distance_time_step: 0.001,
            max_steps: 20000,
            decimation_interval: 6400,
            tolerance_distance: 0.2,
            allow_freefall: false,
        };

        let path = compute_trajectory(
            &Vector::new(1.0, 0.0, 0.0),
            &Vector::new(0.0, 1.0, 0.0),
            &[sun],
            &config,
        ).unwrap();

        assert_eq!(path.termination(), Termination::Closed);
        assert_eq!(path.steps(), 6400);

        // Only the first point survives the trailing drop.
        assert_eq!(path.len(), 1);
        assert_eq!(path[0], Vector::new(1.0, 0.0, 0.0));
    }
}
