//! Boundary curve fitting from sparse random control deviations.
//!
//! [`generate_control_set`] is the only source of randomness; both fitters
//! are deterministic functions of the control set they are given.

pub mod bezier;
pub mod bspline;
pub mod control;
pub mod waterline;

pub use bezier::{evaluate_bezier, fit_bezier};
pub use bspline::fit_bspline;
pub use control::{generate_control_set, ControlSet, DeviationRanges};
pub use waterline::Waterline;

use serde::{Deserialize, Serialize};

/// Which fitter turns a control set into a waterline
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveKind {
    /// Single global Bezier curve
    #[default]
    Bezier,
    /// Cubic spline tapered to zero at the ends
    BSpline,
}

impl CurveKind {
    /// Fit `control`; `width` bounds the B-spline clip
    pub fn fit(self, control: &ControlSet, width: f32) -> Waterline {
        match self {
            CurveKind::Bezier => fit_bezier(control),
            CurveKind::BSpline => fit_bspline(control, width),
        }
    }
}
