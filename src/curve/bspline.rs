//! Clamped cubic spline fit that tapers to zero at both grid edges

use crate::core::Point2D;
use crate::math::{dedup_first, interp_clamped, CubicSpline};

use super::control::ControlSet;
use super::waterline::Waterline;

/// Fit a spline through the deviating points of `control`, pinned to
/// `x = 0` at the first and last y, and sample it at every control y.
///
/// Samples repeating an earlier y are dropped (the pinned ends win over a
/// deviation at the same y). Four or more unique samples use a cubic
/// spline, fewer use linear interpolation. Output x is clipped to
/// `±0.75 * width` to stop runaway overshoot near the ends. With fewer than
/// two deviations the input comes back unchanged.
pub fn fit_bspline(control: &ControlSet, width: f32) -> Waterline {
    let points = control.points();
    let deviations: Vec<Point2D> = control.deviations().collect();
    if deviations.len() < 2 {
        log::debug!(
            "B-spline fit: {} deviation(s), keeping the straight input",
            deviations.len()
        );
        return Waterline::from_ordered(points.to_vec());
    }

    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return Waterline::default();
    };

    let mut knot_y = Vec::with_capacity(deviations.len() + 2);
    let mut knot_x = Vec::with_capacity(deviations.len() + 2);
    knot_y.push(first.y);
    knot_x.push(0.0);
    for d in &deviations {
        knot_y.push(d.y);
        knot_x.push(d.x);
    }
    knot_y.push(last.y);
    knot_x.push(0.0);
    let (ys, xs) = dedup_first(&knot_y, &knot_x);

    let spline = if ys.len() >= 4 {
        let fitted = CubicSpline::not_a_knot(&ys, &xs);
        if fitted.is_none() {
            log::warn!("B-spline fit: cubic solve failed, falling back to linear");
        }
        fitted
    } else {
        None
    };

    let limit = 0.75 * width.abs();
    let fitted = points
        .iter()
        .map(|p| {
            let x = match &spline {
                Some(s) => s.evaluate(p.y),
                None => interp_clamped(p.y, &ys, &xs),
            };
            Point2D::new(x.clamp(-limit, limit), p.y)
        })
        .collect();
    Waterline::from_ordered(fitted)
}
