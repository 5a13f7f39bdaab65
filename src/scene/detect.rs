use {
    log::trace,
    crate::{
        math::{DistanceMetric, segment_distance, from_to_rotation},
        r#type::{
            Vector,
            Distance,
        },
    },
};

const LOG_TARGET: &'static str = "detect";

/// Shape of the capsule an observer standing on a planet looks through.
///
/// Both variants orient the capsule along the planet normal at the observer,
/// `(observer - planet_center)`. An observer sitting on the planet center
/// falls back to world up.
#[derive(Debug, Clone, PartialEq)]
pub enum DetectionStrategy {
    /// Capsule given in the observer frame with world up as the normal.
    FixedCapsuleOffsets {
        begin: Vector,
        end: Vector,
        radius: Distance,
    },

    /// Capsule from the surface point under the observer up to `reach`
    /// above the observer.
    PlanetRadiusDerivedCapsule {
        planet_radius: Distance,
        reach: Distance,
        radius: Distance,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    pub in_range: bool,

    /// Observer to target, infinite when out of range.
    pub distance: Distance,
}

impl DetectionStrategy {
    /// Capsule segment and radius in world coordinates.
    pub fn capsule(&self, observer: &Vector, planet_center: &Vector) -> (Vector, Vector, Distance) {
        let normal = (observer - planet_center)
            .try_normalize(0.0)
            .unwrap_or_else(|| Vector::y());

        match self {
            Self::FixedCapsuleOffsets { begin, end, radius } => {
                let rotation = from_to_rotation(&Vector::y(), &normal);
                (observer + rotation * begin, observer + rotation * end, *radius)
            }
            Self::PlanetRadiusDerivedCapsule { planet_radius, reach, radius } => (
                planet_center + normal.scale(*planet_radius),
                observer + normal.scale(*reach),
                *radius,
            ),
        }
    }

    pub fn detect(
        &self,
        observer: &Vector,
        planet_center: &Vector,
        target: &Vector,
        metric: DistanceMetric,
    ) -> Detection {
        let (start, end, radius) = self.capsule(observer, planet_center);
        let in_range = segment_distance(target, &start, &end) <= radius;

        let distance = if in_range {
            metric.between(observer, target)
        } else {
            Distance::INFINITY
        };

        trace! {
            target: LOG_TARGET,
            "in range: {}, distance: {}", in_range, distance
        };

        Detection { in_range, distance }
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        approx::abs_diff_eq,
    };

    fn vertical_capsule() -> DetectionStrategy {
        DetectionStrategy::FixedCapsuleOffsets {
            begin: Vector::zeros(),
            end: Vector::new(0.0, 3.0, 0.0),
            radius: 1.0,
        }
    }

    #[test]
    fn test_fixed_offsets_follow_normal() {
        let observer = Vector::new(0.0, 0.0, 5.0);
        let (start, end, _) = vertical_capsule().capsule(&observer, &Vector::zeros());

        assert!(abs_diff_eq!((start - observer).norm(), 0.0, epsilon = 1e-9));
        assert!(abs_diff_eq!((end - Vector::new(0.0, 0.0, 8.0)).norm(), 0.0, epsilon = 1e-9));
    }

    #[test]
    fn test_distance_metric() {
        let observer = Vector::new(0.0, 0.0, 5.0);
        let target = Vector::new(0.0, 0.0, 7.0);
        let strategy = vertical_capsule();

        let exact = strategy.detect(&observer, &Vector::zeros(), &target, DistanceMetric::ExactDistance);
        assert!(exact.in_range);
        assert!(abs_diff_eq!(exact.distance, 2.0, epsilon = 1e-9));

        let squared = strategy.detect(&observer, &Vector::zeros(), &target, DistanceMetric::SquaredDistance);
        assert!(abs_diff_eq!(squared.distance, 4.0, epsilon = 1e-9));
    }

    #[test]
    fn test_out_of_range() {
        let observer = Vector::new(0.0, 0.0, 5.0);
        let target = Vector::new(0.0, 2.0, 5.0);

        let detection = vertical_capsule().detect(
            &observer,
            &Vector::zeros(),
            &target,
            DistanceMetric::default(),
        );

        assert!(!detection.in_range);
        assert_eq!(detection.distance, Distance::INFINITY);
    }

    #[test]
    fn test_planet_radius_capsule() {
        let strategy = DetectionStrategy::PlanetRadiusDerivedCapsule {
            planet_radius: 4.0,
            reach: 2.0,
            radius: 0.6,
        };
        let observer = Vector::new(0.0, 0.0, 5.0);

        let (start, end, _) = strategy.capsule(&observer, &Vector::zeros());
        assert!(abs_diff_eq!((start - Vector::new(0.0, 0.0, 4.0)).norm(), 0.0, epsilon = 1e-9));
        assert!(abs_diff_eq!((end - Vector::new(0.0, 0.0, 7.0)).norm(), 0.0, epsilon = 1e-9));

        let below = Vector::new(0.5, 0.0, 4.2);
        assert!(strategy.detect(&observer, &Vector::zeros(), &below, DistanceMetric::default()).in_range);

        let aside = Vector::new(1.0, 0.0, 6.0);
        assert!(!strategy.detect(&observer, &Vector::zeros(), &aside, DistanceMetric::default()).in_range);
    }

    #[test]
    fn test_observer_on_center_uses_world_up() {
        let (_, end, _) = vertical_capsule().capsule(&Vector::zeros(), &Vector::zeros());

        assert!(abs_diff_eq!((end - Vector::new(0.0, 3.0, 0.0)).norm(), 0.0, epsilon = 1e-9));
    }
}
