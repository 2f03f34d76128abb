//! Planar two-link inverse kinematics.

use thiserror::Error;

/// Link lengths, inches. This mechanism has no other configuration for
/// link geometry.
pub const L1: f64 = 8.75;
pub const L2: f64 = 8.75;

#[derive(Debug, Error, PartialEq)]
#[error("target ({x}, {y}) is outside the reachable annulus [{min_reach}, {max_reach}]")]
pub struct KinematicsError {
    pub x: f64,
    pub y: f64,
    pub min_reach: f64,
    pub max_reach: f64,
}

/// Joint angles in radians, elbow-up branch. Elbow-down is not addressed by
/// this mechanism.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointAngles {
    pub theta1: f64,
    pub theta2: f64,
}

/// Solves for the elbow-up joint angles reaching `(x, y)`.
///
/// Returns [`KinematicsError`] when `r` falls outside `[-1, 1]`, i.e. the
/// target lies outside the annulus `[|L1-L2|, L1+L2]` the mechanism can
/// reach.
pub fn solve(x: f64, y: f64) -> Result<JointAngles, KinematicsError> {
    let r = (x * x + y * y - L1 * L1 - L2 * L2) / (2.0 * L1 * L2);

    if !(-1.0..=1.0).contains(&r) {
        return Err(KinematicsError {
            x,
            y,
            min_reach: (L1 - L2).abs(),
            max_reach: L1 + L2,
        });
    }

    let theta2 = (1.0 - r * r).sqrt().atan2(r);
    let theta1 = y.atan2(x) - (L2 * theta2.sin()).atan2(L1 + L2 * theta2.cos());

    Ok(JointAngles { theta1, theta2 })
}

/// Forward kinematics, used only by tests to validate [`solve`].
#[cfg(test)]
fn forward(angles: JointAngles) -> (f64, f64) {
    let x = L1 * angles.theta1.cos() + L2 * (angles.theta1 + angles.theta2).cos();
    let y = L1 * angles.theta1.sin() + L2 * (angles.theta1 + angles.theta2).sin();
    (x, y)
}
