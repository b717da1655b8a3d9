//! Brightest-neighbourhood search over an environment map

use rayon::prelude::*;
use serde::Serialize;

use super::hdri::HdriBuffer;

/// Pixels excluded along every edge
pub const MARGIN: usize = 2;
/// Side of the square averaging window
pub const WINDOW: usize = 4;

/// Location and mean `R+G+B` of the brightest window
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct BrightestPoint {
    pub u: f32,
    pub v: f32,
    /// Winning pixel `(column, row)`; `None` for the fallback point
    pub pixel: Option<(usize, usize)>,
    pub brightness: f32,
}

impl BrightestPoint {
    /// Dome centre with zero brightness, used when nothing is lit
    pub fn fallback() -> Self {
        Self {
            u: 0.5,
            v: 0.5,
            pixel: None,
            brightness: 0.0,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.pixel.is_none()
    }
}

/// Find the pixel whose 4x4 window has the highest mean `R+G+B`.
///
/// The window for pixel `(u, v)` spans columns `u-2..=u+1` and rows
/// `v-2..=v+1`; candidates keep a 2-pixel margin on every side. The first
/// maximum in raster order wins. A buffer too small for one window, or one
/// whose best mean is not positive, yields [`BrightestPoint::fallback`].
pub fn find_brightest(buffer: &HdriBuffer) -> BrightestPoint {
    let (w, h) = (buffer.width(), buffer.height());
    if w <= 2 * MARGIN || h <= 2 * MARGIN {
        log::warn!("HDRI {}x{} is too small for a {}x{} window", w, h, WINDOW, WINDOW);
        return BrightestPoint::fallback();
    }
    log::debug!("Scanning {}x{} HDRI for the brightest window", w, h);

    // Horizontal window sums: entry (y, u) covers columns u-2..=u+1 of row y
    let mut row_sums = vec![0.0f64; w * h];
    row_sums
        .par_chunks_mut(w)
        .enumerate()
        .for_each(|(y, out)| {
            let lum: Vec<f64> = buffer
                .row(y)
                .iter()
                .map(|p| p[0] as f64 + p[1] as f64 + p[2] as f64)
                .collect();
            for u in MARGIN..w - MARGIN {
                out[u] = lum[u - 2] + lum[u - 1] + lum[u] + lum[u + 1];
            }
        });

    let area = (WINDOW * WINDOW) as f64;
    let best = (MARGIN..h - MARGIN)
        .into_par_iter()
        .filter_map(|v| {
            let mut row_best: Option<(f64, usize)> = None;
            for u in MARGIN..w - MARGIN {
                let sum = row_sums[(v - 2) * w + u]
                    + row_sums[(v - 1) * w + u]
                    + row_sums[v * w + u]
                    + row_sums[(v + 1) * w + u];
                let mean = sum / area;
                // NaN pixels poison every window over them; never let one lead
                if mean.is_nan() {
                    continue;
                }
                if row_best.is_none_or(|(b, _)| mean > b) {
                    row_best = Some((mean, v * w + u));
                }
            }
            row_best
        })
        .reduce_with(|a, b| earlier_on_tie(a, b));

    match best {
        Some((mean, index)) if mean > 0.0 => {
            let (u, v) = (index % w, index / w);
            let point = BrightestPoint {
                u: u as f32 / (w - 1) as f32,
                v: v as f32 / (h - 1) as f32,
                pixel: Some((u, v)),
                brightness: mean as f32,
            };
            log::info!(
                "Brightest HDRI window at pixel ({}, {}), UV ({:.4}, {:.4}), brightness {:.4}",
                u,
                v,
                point.u,
                point.v,
                point.brightness
            );
            point
        }
        _ => {
            log::warn!("No positive brightness in HDRI; using the dome centre");
            BrightestPoint::fallback()
        }
    }
}

/// Keep the larger mean; equal means go to the lower raster index
fn earlier_on_tie(a: (f64, usize), b: (f64, usize)) -> (f64, usize) {
    if b.0 > a.0 || (b.0 == a.0 && b.1 < a.1) || a.0.is_nan() {
        b
    } else {
        a
    }
}
