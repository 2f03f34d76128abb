//! Spline building and arc-length-proportional sampling.
//!
//! The evaluator is deliberately kept behind a narrow interface:
//! [`Spline`] is a trait with one method, and [`ClampedBSpline`] is the one
//! production implementation, built from a control-point record by the
//! spline builder. Everything downstream (arc-length estimation,
//! re-parameterized sampling, the unit/axis conversion into workspace
//! inches) only ever calls `Spline::eval`.

/// A parametric curve evaluable at `u ∈ [0, 1]`.
pub trait Spline {
    fn eval(&self, u: f64) -> (f64, f64);
}

/// A clamped B-spline of degree 1 or 3, dimension 2.
///
/// Degree 1 is used for exactly two control points (a straight line);
/// degree 3 otherwise.
pub struct ClampedBSpline {
    degree: usize,
    control_points: Vec<(f64, f64)>,
    knots: Vec<f64>,
}

impl ClampedBSpline {
    /// Builds a clamped B-spline from an ordered sequence of control points.
    /// Degree is selected per the data model: 1 for two points, 3 otherwise.
    ///
    /// Panics if fewer than two control points are given — the tool-path
    /// parser already enforces at least two points per record, so this is
    /// an internal invariant, not a user-facing error path.
    pub fn from_control_points(control_points: Vec<(f64, f64)>) -> Self {
        assert!(
            control_points.len() >= 2,
            "a spline needs at least two control points"
        );
        let degree = if control_points.len() == 2 { 1 } else { 3 };
        let degree = degree.min(control_points.len() - 1);
        let knots = clamped_knot_vector(control_points.len(), degree);
        ClampedBSpline {
            degree,
            control_points,
            knots,
        }
    }
}

/// Builds a clamped knot vector: `degree + 1` repeated zeros, uniformly
/// spaced interior knots, `degree + 1` repeated ones.
fn clamped_knot_vector(n_control: usize, degree: usize) -> Vec<f64> {
    let n_knots = n_control + degree + 1;
    let n_interior = n_knots.saturating_sub(2 * (degree + 1));
    let mut knots = Vec::with_capacity(n_knots);
    knots.extend(std::iter::repeat(0.0).take(degree + 1));
    for i in 1..=n_interior {
        knots.push(i as f64 / (n_interior + 1) as f64);
    }
    knots.extend(std::iter::repeat(1.0).take(degree + 1));
    knots
}

impl Spline for ClampedBSpline {
    fn eval(&self, u: f64) -> (f64, f64) {
        let u = u.clamp(0.0, 1.0);
        let n = self.control_points.len();
        let degree = self.degree;

        // Find the knot span containing u (clamp at the right end so u=1.0
        // lands in the last valid span rather than one past it).
        let mut span = degree;
        while span < n - 1 && u >= self.knots[span + 1] {
            span += 1;
        }

        // De Boor's algorithm.
        let mut d: Vec<(f64, f64)> = (0..=degree)
            .map(|j| self.control_points[span - degree + j])
            .collect();

        for r in 1..=degree {
            for j in (r..=degree).rev() {
                let i = span - degree + j;
                let denom = self.knots[i + degree - r + 1] - self.knots[i];
                let alpha = if denom.abs() < f64::EPSILON {
                    0.0
                } else {
                    (u - self.knots[i]) / denom
                };
                d[j] = (
                    (1.0 - alpha) * d[j - 1].0 + alpha * d[j].0,
                    (1.0 - alpha) * d[j - 1].1 + alpha * d[j].1,
                );
            }
        }

        d[degree]
    }
}

fn dist((ax, ay): (f64, f64), (bx, by): (f64, f64)) -> f64 {
    ((bx - ax).powi(2) + (by - ay).powi(2)).sqrt()
}

const ARC_LENGTH_EPSILON: f64 = 1e-5;
const ARC_LENGTH_MIN_DEPTH: u32 = 5;

/// Estimates the arc length of `spline` over `[u0, u1]` by recursive
/// midpoint subdivision: recurse until the two-segment estimate agrees
/// with the chord length to within `ARC_LENGTH_EPSILON` *and* the
/// recursion depth is at least `ARC_LENGTH_MIN_DEPTH`.
pub fn estimate_arc_length(spline: &dyn Spline, u0: f64, u1: f64) -> f64 {
    estimate_segment(spline, u0, u1, spline.eval(u0), spline.eval(u1), 0)
}

fn estimate_segment(
    spline: &dyn Spline,
    u0: f64,
    u1: f64,
    p0: (f64, f64),
    p1: (f64, f64),
    depth: u32,
) -> f64 {
    let mid_u = (u0 + u1) / 2.0;
    let pm = spline.eval(mid_u);

    let chord = dist(p0, p1);
    let two_seg = dist(p0, pm) + dist(pm, p1);

    if depth >= ARC_LENGTH_MIN_DEPTH && (two_seg - chord).abs() < ARC_LENGTH_EPSILON {
        return two_seg;
    }

    estimate_segment(spline, u0, mid_u, p0, pm, depth + 1)
        + estimate_segment(spline, mid_u, u1, pm, p1, depth + 1)
}

/// A drawing-surface waypoint before IK/Z compensation: inches, y-flipped,
/// `z = 0.0` always (drawing waypoints only — pen-up transits are
/// synthesized separately by the Z-planner).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    pub x: f64,
    pub y: f64,
}

/// Source units are points at 72 PPI; flip y and translate to the
/// bottom-left-origin workspace.
fn to_workspace_inches(px: f64, py: f64) -> Waypoint {
    Waypoint {
        x: px / 72.0 - 8.5,
        y: 15.0 - py / 72.0,
    }
}

/// Samples `spline` at approximately equal arc-length spacing given a
/// nominal increment in inches: estimate total length, derive a `u`-step
/// from `nominal / length`, then sample `u = 0, Δ, 2Δ, ...` up to and
/// including `1.0`.
pub fn sample_by_arc_length(spline: &dyn Spline, nominal_increment_in: f64) -> Vec<Waypoint> {
    // `estimate_arc_length` measures in the spline's own coordinate space,
    // which is source points at 72 PPI (see `to_workspace_inches`); convert
    // to inches before comparing against `nominal_increment_in` so the two
    // quantities share a unit. The uniform /72 scale doesn't disturb the
    // shape of the estimate, only its magnitude.
    let length = estimate_arc_length(spline, 0.0, 1.0) / 72.0;
    let step = if length > f64::EPSILON {
        (nominal_increment_in / length).min(1.0)
    } else {
        1.0
    };

    let mut samples = Vec::new();
    let mut u = 0.0;
    loop {
        let (px, py) = spline.eval(u);
        samples.push(to_workspace_inches(px, py));
        if u >= 1.0 {
            break;
        }
        u = (u + step).min(1.0);
    }
    samples
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StraightLine {
        a: (f64, f64),
        b: (f64, f64),
    }

    impl Spline for StraightLine {
        fn eval(&self, u: f64) -> (f64, f64) {
            (
                self.a.0 + u * (self.b.0 - self.a.0),
                self.a.1 + u * (self.b.1 - self.a.1),
            )
        }
    }

    #[test]
    fn arc_length_of_straight_line_matches_euclidean_distance() {
        let line = StraightLine {
            a: (0.0, 0.0),
            b: (72.0, 0.0),
        };
        let length = estimate_arc_length(&line, 0.0, 1.0);
        assert!((length - 72.0).abs() < 1e-4);
    }

    #[test]
    fn degree_one_spline_interpolates_two_points() {
        let spline = ClampedBSpline::from_control_points(vec![(0.0, 0.0), (72.0, 0.0)]);
        let (x0, y0) = spline.eval(0.0);
        let (x1, y1) = spline.eval(1.0);
        assert!((x0 - 0.0).abs() < 1e-9 && (y0 - 0.0).abs() < 1e-9);
        assert!((x1 - 72.0).abs() < 1e-9 && (y1 - 0.0).abs() < 1e-9);
    }

    #[test]
    fn clamped_spline_hits_first_and_last_control_point() {
        let points = vec![(0.0, 0.0), (10.0, 20.0), (30.0, -5.0), (50.0, 0.0)];
        let spline = ClampedBSpline::from_control_points(points.clone());
        let first = spline.eval(0.0);
        let last = spline.eval(1.0);
        assert!((first.0 - points[0].0).abs() < 1e-9);
        assert!((first.1 - points[0].1).abs() < 1e-9);
        assert!((last.0 - points[3].0).abs() < 1e-9);
        assert!((last.1 - points[3].1).abs() < 1e-9);
    }

    #[test]
    fn trivial_line_samples_y_flipped_into_workspace() {
        // A tool-path `1;0,0,72,0`:
        // (0,0) -> (-8.5, 15); (72,0) -> (-7.5, 15).
        let spline = ClampedBSpline::from_control_points(vec![(0.0, 0.0), (72.0, 0.0)]);
        let samples = sample_by_arc_length(&spline, 1.0);
        assert_eq!(samples.len(), 2);
        assert!((samples[0].x - (-8.5)).abs() < 1e-9);
        assert!((samples[0].y - 15.0).abs() < 1e-9);
        assert!((samples[1].x - (-7.5)).abs() < 1e-9);
        assert!((samples[1].y - 15.0).abs() < 1e-9);
    }
}
