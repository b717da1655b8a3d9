//! Global Bezier fit through the deviating control points

use crate::core::Point2D;
use crate::math::{dedup_first, interp_clamped};

use super::control::ControlSet;
use super::waterline::Waterline;

/// Evaluate the Bezier curve of degree `control.len() - 1` at `t` in [0, 1].
///
/// De Casteljau's construction; equal to the Bernstein sum but stable for
/// the high degrees a long control set produces.
pub fn evaluate_bezier(control: &[Point2D], t: f32) -> Point2D {
    match control.len() {
        0 => Point2D::ZERO,
        1 => control[0],
        _ => {
            let mut work = control.to_vec();
            for level in (1..work.len()).rev() {
                for i in 0..level {
                    work[i] = work[i].lerp(work[i + 1], t);
                }
            }
            work[0]
        }
    }
}

/// Fit one Bezier curve through the deviating points of `control` and
/// resample it at the control set's own y-values.
///
/// With fewer than two deviations the input comes back unchanged: a
/// straight boundary is still a valid channel side. The curve parameter is
/// not linear in y, so each output x is read off the curve's (y -> x)
/// relation by linear interpolation; beyond the curve's y-span the nearest
/// end value is used.
pub fn fit_bezier(control: &ControlSet) -> Waterline {
    let points = control.points();
    let deviations: Vec<Point2D> = control.deviations().collect();
    if deviations.len() < 2 {
        log::debug!(
            "Bezier fit: {} deviation(s), keeping the straight input",
            deviations.len()
        );
        return Waterline::from_ordered(points.to_vec());
    }

    let n = points.len();
    let steps = (n - 1).max(1) as f32;
    let curve: Vec<Point2D> = (0..n)
        .map(|i| evaluate_bezier(&deviations, i as f32 / steps))
        .collect();

    let curve_y: Vec<f32> = curve.iter().map(|p| p.y).collect();
    let curve_x: Vec<f32> = curve.iter().map(|p| p.x).collect();
    let (ys, xs) = dedup_first(&curve_y, &curve_x);

    let fitted = points
        .iter()
        .map(|p| Point2D::new(interp_clamped(p.y, &ys, &xs), p.y))
        .collect();
    Waterline::from_ordered(fitted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::control::{generate_control_set, DeviationRanges};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn set(points: &[(f32, f32)]) -> ControlSet {
        ControlSet::new(points.iter().map(|&(x, y)| Point2D::new(x, y)).collect()).unwrap()
    }

    #[test]
    fn test_de_casteljau_matches_bernstein() {
        let ctrl = [
            Point2D::new(0.0, 0.0),
            Point2D::new(1.0, 2.0),
            Point2D::new(3.0, 3.0),
            Point2D::new(4.0, 0.0),
        ];
        let t = 0.3f32;
        let s = 1.0 - t;
        let bernstein = ctrl[0] * s * s * s
            + ctrl[1] * 3.0 * s * s * t
            + ctrl[2] * 3.0 * s * t * t
            + ctrl[3] * t * t * t;
        let p = evaluate_bezier(&ctrl, t);
        assert!((p - bernstein).length() < 1e-5);
        assert_eq!(evaluate_bezier(&ctrl, 0.0), ctrl[0]);
        assert!((evaluate_bezier(&ctrl, 1.0) - ctrl[3]).length() < 1e-6);
    }

    #[test]
    fn test_degenerate_returns_input() {
        let input = set(&[(0.0, -1.0), (2.0, 0.0), (0.0, 1.0)]);
        let out = fit_bezier(&input);
        assert_eq!(out.points(), input.points());
    }

    #[test]
    fn test_preserves_length_and_y() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let control = generate_control_set(&mut rng, 80, 40.0, 14, &DeviationRanges::for_width(20.0));
        let out = fit_bezier(&control);
        assert_eq!(out.len(), control.len());
        for (a, b) in out.points().iter().zip(control.points()) {
            assert!((a.y - b.y).abs() < 1e-5);
        }
    }

    #[test]
    fn test_stays_within_control_hull() {
        let input = set(&[(0.0, -3.0), (-2.0, -2.0), (0.0, -1.0), (3.0, 1.0), (-1.0, 2.0), (0.0, 3.0)]);
        let out = fit_bezier(&input);
        for p in out.points() {
            assert!(p.x >= -2.0 - 1e-5 && p.x <= 3.0 + 1e-5, "x {} escaped hull", p.x);
        }
        // Beyond the first deviation's y the first control x is held
        assert!((out.points()[0].x - -2.0).abs() < 1e-5);
    }

    #[test]
    fn test_deterministic() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let control = generate_control_set(&mut rng, 30, 20.0, 9, &DeviationRanges::for_width(10.0));
        assert_eq!(fit_bezier(&control), fit_bezier(&control));
    }
}
