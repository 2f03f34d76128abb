//! Ties the motion pipeline together: tool-path text in, packed V02 frames
//! out.

use std::io::BufRead;

use thiserror::Error;

use crate::frame::FrameV02;
use crate::kinematics::{self, KinematicsError};
use crate::quantize::{self, QuantizeError};
use crate::spline::{sample_by_arc_length, ClampedBSpline, Waypoint};
use crate::toolpath::{parse_tool_paths, ParseError};
use crate::zplan::{plan_transitions, PlannedWaypoint, ZCalibration};

#[derive(Debug, Error)]
pub enum PlanError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("sample {index}: {source}")]
    Kinematics {
        index: usize,
        #[source]
        source: KinematicsError,
    },
    #[error("sample {index}: {source}")]
    Quantize {
        index: usize,
        #[source]
        source: QuantizeError,
    },
}

/// The nominal sampling increment passed to the arc-length re-parameterizer,
/// in inches.
pub const DEFAULT_SAMPLE_INCREMENT_IN: f64 = 0.1;

/// Runs the full pipeline: parse -> build splines -> sample -> plan
/// transitions -> solve IK -> compensate Z -> quantize -> pack V02 frames.
///
/// `nominal_increment_in` is the sampling step passed to
/// [`sample_by_arc_length`]; pass [`DEFAULT_SAMPLE_INCREMENT_IN`] absent a
/// reason to use something else.
pub fn plan<R: BufRead>(
    reader: R,
    calibration: &ZCalibration,
    nominal_increment_in: f64,
) -> Result<Vec<FrameV02>, PlanError> {
    let records = parse_tool_paths(reader)?;

    let paths: Vec<Vec<Waypoint>> = records
        .into_iter()
        .map(|record| {
            let spline = ClampedBSpline::from_control_points(record.points);
            sample_by_arc_length(&spline, nominal_increment_in)
        })
        .collect();

    let mut planned: Vec<PlannedWaypoint> = Vec::new();
    plan_transitions(&paths, &mut planned);

    let mut frames = Vec::with_capacity(planned.len());
    for (index, wp) in planned.iter().enumerate() {
        let z = if wp.pen_up {
            calibration.retract_depth()
        } else {
            calibration.draw_depth_at(wp.x, wp.y)
        };

        let angles = kinematics::solve(wp.x, wp.y).map_err(|source| PlanError::Kinematics {
            index,
            source,
        })?;

        let sample =
            quantize::quantize(angles, z).map_err(|source| PlanError::Quantize { index, source })?;

        frames.push(FrameV02 {
            code: 0,
            theta1: sample.theta1,
            theta2: sample.theta2,
            d3: sample.d3,
        });
    }

    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn trivial_line_produces_expected_frame_count_and_header() {
        let input = "1;0,0,72,0\n";
        let cal = ZCalibration::default();
        let frames = plan(Cursor::new(input), &cal, 1.0).unwrap();
        assert_eq!(frames.len(), 2);

        let bytes = frames[0].pack();
        assert_eq!(&bytes[0..3], &[0xAB, 0x02, 0x00]);
        assert_eq!(*bytes.last().unwrap(), 0xCD);
    }

    #[test]
    fn two_disjoint_paths_insert_exactly_two_transits() {
        let input = "1;0,0,72,0\n2;144,72,216,72\n";
        let cal = ZCalibration::default();
        let frames = plan(Cursor::new(input), &cal, 1.0).unwrap();
        // path 1: 2 drawing, transit: 2, path 2: 2 drawing = 6
        assert_eq!(frames.len(), 6);

        let retract = cal.retract_depth().round() as i16;
        assert_eq!(frames[2].d3, retract);
        assert_eq!(frames[3].d3, retract);

        let draw = cal.z_draw.round() as i16;
        assert_eq!(frames[0].d3, draw);
        assert_eq!(frames[1].d3, draw);
    }

    #[test]
    fn malformed_path_fails_before_any_frame_is_produced() {
        let input = "1;0,0,72\n";
        let cal = ZCalibration::default();
        let err = plan(Cursor::new(input), &cal, 1.0).unwrap_err();
        assert!(matches!(err, PlanError::Parse(_)));
    }
}
