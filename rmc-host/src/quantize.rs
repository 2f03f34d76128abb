//! Quantization of real-valued joint angles and actuator depth into the
//! signed 16-bit wire representation.

use thiserror::Error;

use crate::kinematics::JointAngles;

/// Radians-to-wire scale factor: `2π × 2^16 / (4·2π)`, i.e. tenths-of-
/// milliradian scaling, rounded to nearest.
pub const THETA_SCALE: f64 = 437.04;

#[derive(Debug, Error, PartialEq)]
#[error("value {value} out of i16 range after scaling (field: {field})")]
pub struct QuantizeError {
    pub field: &'static str,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotorAngleSample {
    pub theta1: i16,
    pub theta2: i16,
    pub d3: i16,
}

fn saturate_to_i16(field: &'static str, value: f64) -> Result<i16, QuantizeError> {
    let rounded = value.round();
    if rounded < i16::MIN as f64 || rounded > i16::MAX as f64 {
        return Err(QuantizeError { field, value });
    }
    Ok(rounded as i16)
}

/// Quantizes joint angles (radians) and actuator depth (already in the
/// controller's integer units) into a [`MotorAngleSample`].
///
/// Out-of-range values are an error, not a wraparound: the pipeline
/// rejects the sample rather than silently producing a wrapped,
/// physically wrong angle.
pub fn quantize(angles: JointAngles, depth: f64) -> Result<MotorAngleSample, QuantizeError> {
    let theta1 = saturate_to_i16("theta1", angles.theta1 * THETA_SCALE)?;
    let theta2 = saturate_to_i16("theta2", angles.theta2 * THETA_SCALE)?;
    let d3 = saturate_to_i16("d3", depth)?;
    Ok(MotorAngleSample { theta1, theta2, d3 })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantizes_small_angles() {
        let angles = JointAngles {
            theta1: 1.0,
            theta2: -0.5,
        };
        let sample = quantize(angles, -200.0).unwrap();
        assert_eq!(sample.theta1, (1.0 * THETA_SCALE).round() as i16);
        assert_eq!(sample.theta2, (-0.5 * THETA_SCALE).round() as i16);
        assert_eq!(sample.d3, -200);
    }

    #[test]
    fn out_of_range_angle_is_an_error_not_a_wrap() {
        let angles = JointAngles {
            theta1: 1000.0,
            theta2: 0.0,
        };
        let err = quantize(angles, 0.0).unwrap_err();
        assert_eq!(err.field, "theta1");
    }

    #[test]
    fn rounds_to_nearest() {
        assert_eq!(saturate_to_i16("x", 1.4), Ok(1));
        assert_eq!(saturate_to_i16("x", 1.5), Ok(2));
        assert_eq!(saturate_to_i16("x", -1.5), Ok(-2));
    }
}
