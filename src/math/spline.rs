//! Interpolating cubic spline with not-a-knot end conditions.
//!
//! The third derivative is continuous across the second and the
//! second-to-last knots, so four samples of a cubic polynomial reproduce
//! that polynomial exactly. Coefficients are solved in f64.

/// Interpolating cubic spline through `(xs[i], ys[i])`
#[derive(Clone, Debug)]
pub struct CubicSpline {
    xs: Vec<f32>,
    ys: Vec<f32>,
    /// Second derivative at each knot
    moments: Vec<f64>,
}

impl CubicSpline {
    /// Build a not-a-knot spline.
    ///
    /// Returns `None` for fewer than 4 samples, mismatched lengths,
    /// abscissae that are not strictly increasing, or a singular system.
    pub fn not_a_knot(xs: &[f32], ys: &[f32]) -> Option<Self> {
        let n = xs.len();
        if n < 4 || ys.len() != n {
            return None;
        }
        if xs.windows(2).any(|w| w[1] <= w[0]) {
            return None;
        }

        let h: Vec<f64> = xs.windows(2).map(|w| (w[1] - w[0]) as f64).collect();
        let slope: Vec<f64> = (0..n - 1)
            .map(|i| (ys[i + 1] - ys[i]) as f64 / h[i])
            .collect();

        let mut a = vec![vec![0.0f64; n]; n];
        let mut b = vec![0.0f64; n];

        // Not-a-knot at x1: (M1 - M0) / h0 == (M2 - M1) / h1
        a[0][0] = h[1];
        a[0][1] = -(h[0] + h[1]);
        a[0][2] = h[0];

        for i in 1..n - 1 {
            a[i][i - 1] = h[i - 1];
            a[i][i] = 2.0 * (h[i - 1] + h[i]);
            a[i][i + 1] = h[i];
            b[i] = 6.0 * (slope[i] - slope[i - 1]);
        }

        // Not-a-knot at x[n-2]
        a[n - 1][n - 3] = h[n - 2];
        a[n - 1][n - 2] = -(h[n - 3] + h[n - 2]);
        a[n - 1][n - 1] = h[n - 3];

        let moments = solve_dense(a, b)?;
        Some(Self {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            moments,
        })
    }

    /// Evaluate at `x`; outside the knot range the end segments extrapolate.
    pub fn evaluate(&self, x: f32) -> f32 {
        let n = self.xs.len();
        let i = self
            .xs
            .partition_point(|&v| v <= x)
            .saturating_sub(1)
            .min(n - 2);

        let x = x as f64;
        let x0 = self.xs[i] as f64;
        let x1 = self.xs[i + 1] as f64;
        let y0 = self.ys[i] as f64;
        let y1 = self.ys[i + 1] as f64;
        let m0 = self.moments[i];
        let m1 = self.moments[i + 1];
        let h = x1 - x0;

        let a = x1 - x;
        let b = x - x0;
        let value = m0 * a * a * a / (6.0 * h)
            + m1 * b * b * b / (6.0 * h)
            + (y0 / h - m0 * h / 6.0) * a
            + (y1 / h - m1 * h / 6.0) * b;
        value as f32
    }
}

/// Gaussian elimination with partial pivoting
fn solve_dense(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Option<Vec<f64>> {
    let n = b.len();
    for col in 0..n {
        let pivot = (col..n).max_by(|&r, &s| a[r][col].abs().total_cmp(&a[s][col].abs()))?;
        if a[pivot][col].abs() < 1e-12 {
            return None;
        }
        a.swap(col, pivot);
        b.swap(col, pivot);

        for row in col + 1..n {
            let factor = a[row][col] / a[col][col];
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0.0f64; n];
    for row in (0..n).rev() {
        let tail: f64 = (row + 1..n).map(|k| a[row][k] * x[k]).sum();
        x[row] = (b[row] - tail) / a[row][row];
    }
    Some(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cubic(x: f32) -> f32 {
        0.5 * x * x * x - 2.0 * x * x + x - 3.0
    }

    #[test]
    fn test_passes_through_knots() {
        let xs = [-4.0, -1.5, 0.0, 2.0, 5.0];
        let ys = [0.0, 2.5, -1.0, 3.0, 0.0];
        let spline = CubicSpline::not_a_knot(&xs, &ys).unwrap();
        for (&x, &y) in xs.iter().zip(&ys) {
            assert!((spline.evaluate(x) - y).abs() < 1e-4, "knot {x} -> {}", spline.evaluate(x));
        }
    }

    #[test]
    fn test_reproduces_cubic_polynomial() {
        let xs = [0.0, 1.0, 2.5, 3.0, 4.5, 6.0];
        let ys: Vec<f32> = xs.iter().map(|&x| cubic(x)).collect();
        let spline = CubicSpline::not_a_knot(&xs, &ys).unwrap();
        for i in 0..=60 {
            let x = i as f32 * 0.1;
            let err = (spline.evaluate(x) - cubic(x)).abs();
            assert!(err < 1e-3, "x={x}: err {err}");
        }
    }

    #[test]
    fn test_four_points_is_single_cubic() {
        let xs = [0.0, 1.0, 2.0, 3.0];
        let ys: Vec<f32> = xs.iter().map(|&x| cubic(x)).collect();
        let spline = CubicSpline::not_a_knot(&xs, &ys).unwrap();
        assert!((spline.evaluate(1.5) - cubic(1.5)).abs() < 1e-4);
        assert!((spline.evaluate(-0.5) - cubic(-0.5)).abs() < 1e-3);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(CubicSpline::not_a_knot(&[0.0, 1.0, 2.0], &[0.0, 1.0, 0.0]).is_none());
        assert!(CubicSpline::not_a_knot(&[0.0, 1.0, 1.0, 2.0], &[0.0; 4]).is_none());
        assert!(CubicSpline::not_a_knot(&[0.0, 1.0, 2.0, 3.0], &[0.0; 3]).is_none());
    }
}
