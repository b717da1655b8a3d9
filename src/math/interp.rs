//! One-dimensional interpolation over sampled relations

/// Drop samples whose abscissa repeats an earlier one.
///
/// The first occurrence of each abscissa wins and the original order is kept.
pub fn dedup_first(xs: &[f32], ys: &[f32]) -> (Vec<f32>, Vec<f32>) {
    debug_assert_eq!(xs.len(), ys.len());
    let mut out_x: Vec<f32> = Vec::with_capacity(xs.len());
    let mut out_y: Vec<f32> = Vec::with_capacity(ys.len());
    for (&x, &y) in xs.iter().zip(ys) {
        if out_x.iter().any(|&seen| seen == x) {
            continue;
        }
        out_x.push(x);
        out_y.push(y);
    }
    (out_x, out_y)
}

/// Piecewise-linear interpolation of `(xp, fp)` at `x`.
///
/// `xp` must be increasing. Queries outside `[xp[0], xp[last]]` take the
/// value of the nearest end sample. Returns 0 for an empty table.
pub fn interp_clamped(x: f32, xp: &[f32], fp: &[f32]) -> f32 {
    debug_assert_eq!(xp.len(), fp.len());
    let n = xp.len();
    if n == 0 {
        return 0.0;
    }
    if x <= xp[0] {
        return fp[0];
    }
    if x >= xp[n - 1] {
        return fp[n - 1];
    }

    // xp[i] <= x < xp[i + 1]
    let i = xp.partition_point(|&v| v <= x) - 1;
    let span = xp[i + 1] - xp[i];
    if span <= 0.0 {
        return fp[i];
    }
    let t = (x - xp[i]) / span;
    fp[i] + (fp[i + 1] - fp[i]) * t
}

/// `count` evenly spaced values from `start` to `end` inclusive.
pub fn linspace(start: f32, end: f32, count: usize) -> Vec<f32> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (count - 1) as f32;
            (0..count)
                .map(|i| if i == count - 1 { end } else { start + step * i as f32 })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_keeps_first() {
        let (x, y) = dedup_first(&[0.0, 1.0, 1.0, 2.0, 0.0], &[10.0, 11.0, 99.0, 12.0, 98.0]);
        assert_eq!(x, vec![0.0, 1.0, 2.0]);
        assert_eq!(y, vec![10.0, 11.0, 12.0]);
    }

    #[test]
    fn test_interp_inside() {
        let xp = [0.0, 1.0, 3.0];
        let fp = [0.0, 2.0, 6.0];
        assert!((interp_clamped(0.5, &xp, &fp) - 1.0).abs() < 1e-6);
        assert!((interp_clamped(2.0, &xp, &fp) - 4.0).abs() < 1e-6);
        assert_eq!(interp_clamped(1.0, &xp, &fp), 2.0);
    }

    #[test]
    fn test_interp_clamps_outside() {
        let xp = [0.0, 1.0];
        let fp = [5.0, 7.0];
        assert_eq!(interp_clamped(-3.0, &xp, &fp), 5.0);
        assert_eq!(interp_clamped(4.0, &xp, &fp), 7.0);
        assert_eq!(interp_clamped(1.0, &[], &[]), 0.0);
    }

    #[test]
    fn test_linspace_endpoints() {
        let v = linspace(-10.0, 10.0, 5);
        assert_eq!(v, vec![-10.0, -5.0, 0.0, 5.0, 10.0]);
        assert_eq!(linspace(2.0, 3.0, 1), vec![2.0]);
        assert!(linspace(0.0, 1.0, 0).is_empty());
    }
}
