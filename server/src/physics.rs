//! Sub-step motion integration with collision response.
//!
//! Motion is decomposed into sub-steps small enough that a one-unit-thick
//! wall can never be tunnelled: `n = round(|v|)` unit-length steps when
//! `n >= 4`, otherwise `10·n` steps of `0.1·v`. Each sub-step tests the
//! hypothetical translated box against every rigid collider and, on
//! contact, zeroes the offending axis of both the step and the speed
//! (both axes on a pure diagonal corner hit), retries once, then
//! advances.

use shared::{CollisionBox, Vec2};

/// What a moving object ran into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    /// A rigid map object. Being hit does nothing to it.
    Obstacle,
    /// Another live player, identified for damage hand-off.
    Player(u32),
}

/// A stationary box the integrator tests against.
#[derive(Debug, Clone, Copy)]
pub struct Collider {
    pub bounds: CollisionBox,
    pub hit: Hit,
}

/// Outcome of integrating one object for one tick.
#[derive(Debug, Clone, Copy)]
pub struct Motion {
    /// Final bottom-left corner, to be written back as the position.
    pub position: Vec2,
    /// Speed after collision response, to be written back.
    pub speed: Vec2,
    /// The last collider contacted during the motion, if any.
    pub hit: Option<Hit>,
}

fn first_intersection<'a>(probe: &CollisionBox, colliders: &'a [Collider]) -> Option<&'a Collider> {
    colliders
        .iter()
        .filter(|c| c.bounds.rigid)
        .find(|c| probe.intersects(&c.bounds))
}

/// Moves `start` through `colliders` according to `speed`.
///
/// Callers exclude the moving object itself from `colliders`; everything
/// here is tested exactly as given.
pub fn integrate(start: CollisionBox, speed: Vec2, colliders: &[Collider]) -> Motion {
    let rounded = speed.length().round();
    if rounded == 0.0 {
        return Motion {
            position: start.bottom_left,
            speed,
            hit: None,
        };
    }

    let (steps, mut step) = if rounded >= 4.0 {
        (rounded as u32, speed.unit())
    } else {
        (rounded as u32 * 10, speed * 0.1)
    };

    let mut current = start;
    let mut speed = speed;
    let mut hit = None;

    for _ in 0..steps {
        // Test, respond, retry once; a second contact always resolves to a
        // zero step because at most one axis survived the first response.
        for _ in 0..2 {
            let probe = current.translate(step);
            let Some(collider) = first_intersection(&probe, colliders) else {
                break;
            };
            hit = Some(collider.hit);

            if current.overlaps_on_x(&collider.bounds) {
                // Already aligned horizontally: the offending motion is vertical.
                speed.y = 0.0;
                step.y = 0.0;
            } else if current.overlaps_on_y(&collider.bounds) {
                speed.x = 0.0;
                step.x = 0.0;
            } else {
                // Pure diagonal corner contact.
                speed = Vec2::ZERO;
                step = Vec2::ZERO;
            }
        }

        if step == Vec2::ZERO {
            break;
        }
        current = current.translate(step);
    }

    Motion {
        position: current.bottom_left,
        speed,
        hit,
    }
}

/// True when `bounds` rests on something rigid: a probe one tenth of a
/// unit below it intersects a collider.
pub fn grounded(bounds: CollisionBox, colliders: &[Collider]) -> bool {
    let probe = bounds.translate(Vec2::new(0.0, -0.1));
    first_intersection(&probe, colliders).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use shared::CollisionArea;

    fn player_box(x: f64, y: f64) -> CollisionBox {
        CollisionBox::from_area(Vec2::new(x, y), CollisionArea::new(0.9, 0.9), true)
    }

    fn obstacle(x: f64, y: f64, w: f64, h: f64) -> Collider {
        Collider {
            bounds: CollisionBox::from_area(Vec2::new(x, y), CollisionArea::new(w, h), true),
            hit: Hit::Obstacle,
        }
    }

    #[test]
    fn test_zero_speed_is_a_no_op() {
        let motion = integrate(player_box(10.0, 10.0), Vec2::ZERO, &[]);
        assert_eq!(motion.position, Vec2::new(10.0, 10.0));
        assert!(motion.hit.is_none());
    }

    #[test]
    fn test_speed_rounding_to_zero_is_a_no_op() {
        let motion = integrate(player_box(10.0, 10.0), Vec2::new(0.2, 0.0), &[]);
        assert_eq!(motion.position, Vec2::new(10.0, 10.0));
    }

    #[test]
    fn test_slow_motion_takes_ten_substeps_per_unit() {
        // |v| = 0.7 rounds to 1: ten steps of 0.1·v, i.e. exactly v.
        let motion = integrate(player_box(10.0, 10.0), Vec2::new(0.0, -0.7), &[]);
        assert_approx_eq!(motion.position.y, 9.3, 1e-9);
        assert_approx_eq!(motion.position.x, 10.0, 1e-9);
    }

    #[test]
    fn test_fast_motion_takes_unit_substeps() {
        // |v| = 5 rounds to 5: five unit-length steps along v.
        let motion = integrate(player_box(0.0, 10.0), Vec2::new(5.0, 0.0), &[]);
        assert_approx_eq!(motion.position.x, 5.0, 1e-9);
    }

    #[test]
    fn test_wall_stop_flush() {
        // Wall face at x = 15; approach at top speed from x = 9.9.
        let wall = obstacle(15.0, 0.0, 5.0, 10.0);
        let motion = integrate(player_box(9.9, 1.0), Vec2::new(2.3, 0.0), &[wall]);

        assert_eq!(motion.speed.x, 0.0);
        // 18 whole steps of 0.23 fit before the probe touches the wall.
        assert_approx_eq!(motion.position.x, 9.9 + 18.0 * 0.23, 1e-9);
        assert!(motion.position.x + 0.9 <= 15.0);
        assert_eq!(motion.hit, Some(Hit::Obstacle));
    }

    #[test]
    fn test_vertical_landing_zeroes_y_only() {
        let floor = obstacle(-10.0, -1.0, 100.0, 1.0);
        let motion = integrate(player_box(5.0, 0.5), Vec2::new(0.0, -2.0), &[floor]);

        assert_eq!(motion.speed.y, 0.0);
        assert!(motion.position.y >= 0.0);
        assert_eq!(motion.hit, Some(Hit::Obstacle));
    }

    #[test]
    fn test_diagonal_corner_zeroes_both_axes() {
        // The probe first intersects the block without the current box
        // overlapping it on either axis.
        let block = obstacle(1.0, 1.0, 5.0, 5.0);
        let motion = integrate(player_box(0.0, 0.0), Vec2::new(1.0, 1.0), &[block]);

        assert_eq!(motion.speed, Vec2::ZERO);
        assert_eq!(motion.hit, Some(Hit::Obstacle));
        // Stopped at the last corner-free position.
        assert_approx_eq!(motion.position.x, 0.1, 1e-9);
        assert_approx_eq!(motion.position.y, 0.1, 1e-9);
    }

    #[test]
    fn test_sliding_along_a_wall_keeps_the_free_axis() {
        // Moving up-right against a wall on the right: x stops, y continues.
        let wall = obstacle(1.0, -10.0, 1.0, 100.0);
        let motion = integrate(player_box(0.0, 0.0), Vec2::new(1.0, 1.0), &[wall]);

        assert_eq!(motion.speed.x, 0.0);
        assert!(motion.speed.y > 0.0);
        assert!(motion.position.y > 0.5);
        assert!(motion.position.x + 0.9 <= 1.0 + 1e-9);
    }

    #[test]
    fn test_player_collider_reports_identity() {
        let other = Collider {
            bounds: player_box(3.0, 10.0),
            hit: Hit::Player(42),
        };
        let motion = integrate(player_box(0.0, 10.0), Vec2::new(4.0, 0.0), &[other]);
        assert_eq!(motion.hit, Some(Hit::Player(42)));
        assert_eq!(motion.speed.x, 0.0);
    }

    #[test]
    fn test_non_rigid_colliders_are_ignored() {
        let ghost = Collider {
            bounds: CollisionBox::from_area(
                Vec2::new(2.0, 10.0),
                CollisionArea::new(1.0, 1.0),
                false,
            ),
            hit: Hit::Obstacle,
        };
        let motion = integrate(player_box(0.0, 10.0), Vec2::new(4.0, 0.0), &[ghost]);
        assert!(motion.hit.is_none());
        assert_approx_eq!(motion.position.x, 4.0, 1e-9);
    }

    #[test]
    fn test_grounded_probe() {
        let floor = obstacle(-10.0, -1.0, 100.0, 1.0);
        assert!(grounded(player_box(0.0, 0.0), &[floor]));
        assert!(!grounded(player_box(0.0, 0.5), &[floor]));
        assert!(!grounded(player_box(0.0, 0.0), &[]));
    }
}
