//! Cubic spline interpolation with root extraction
//!
//! [`CubicSpline`] fits a C2 piecewise cubic through `(time, value)`
//! samples and supports evaluation, analytic differentiation, and robust
//! zero finding. It backs the event detection in [`crate::almanac`] and
//! the trajectory interpolation in [`crate::trajectory`].
//!
//! End conditions are not-a-knot (the outermost pairs of segments share
//! one cubic), so the fit near the span edges tracks the data rather than
//! forcing the curvature to zero there; an extremum sitting on a span
//! boundary still produces a derivative root just inside the span.
//!
//! Out-of-span policy: evaluation strictly outside `[t_min, t_max]` fails
//! with [`AlmanacError::OutOfRange`]. A cubic extrapolates badly and a
//! silently extrapolated altitude produces phantom rise/set events, so
//! there is deliberately no opt-out.
//!
//! Root extraction never relies on a general polynomial solver: each cubic
//! segment is split into monotonic pieces at the roots of its derivative
//! (a quadratic, solved in the numerically stable q-form) and each piece
//! is bisected for its at-most-one sign change. Tangential touches that
//! do not change sign are not reported.

use crate::almanac::{AlmanacError, Result};

/// Bisection iterations for in-segment root refinement; 2^-90 of a segment
/// width is far below f64 resolution
const BISECT_ITERS: usize = 90;

/// Validate shared sample preconditions, returning the sample count
fn check_samples(times: &[f64], values: &[f64]) -> Result<usize> {
    if times.len() != values.len() {
        return Err(AlmanacError::LengthMismatch {
            times: times.len(),
            values: values.len(),
        });
    }
    if times.len() < 2 {
        return Err(AlmanacError::TooFewSamples { count: times.len() });
    }
    for (index, pair) in times.windows(2).enumerate() {
        if pair[1] <= pair[0] {
            return Err(AlmanacError::NonMonotonicSamples { index: index + 1 });
        }
    }
    Ok(times.len())
}

/// Cubic spline through strictly increasing time samples, not-a-knot ends
///
/// Construction fails immediately on unsorted input
/// ([`AlmanacError::NonMonotonicSamples`]), not at first evaluation.
#[derive(Debug, Clone)]
pub struct CubicSpline {
    /// Knot abscissae, strictly increasing
    knots: Vec<f64>,
    /// Local polynomial coefficients per segment: value =
    /// `c[0] + c[1]*x + c[2]*x^2 + c[3]*x^3` with `x = t - knots[i]`
    coeffs: Vec<[f64; 4]>,
}

impl CubicSpline {
    /// Fit a cubic spline to the samples
    ///
    /// Two samples degrade to a straight line and three to a single
    /// parabola; four or more get the full not-a-knot fit.
    pub fn fit(times: &[f64], values: &[f64]) -> Result<Self> {
        let n = check_samples(times, values)?;
        let second = Self::second_derivatives(times, values, n);

        let mut coeffs = Vec::with_capacity(n - 1);
        for i in 0..n - 1 {
            let h = times[i + 1] - times[i];
            let (m0, m1) = (second[i], second[i + 1]);
            coeffs.push([
                values[i],
                (values[i + 1] - values[i]) / h - h * (2.0 * m0 + m1) / 6.0,
                m0 / 2.0,
                (m1 - m0) / (6.0 * h),
            ]);
        }

        Ok(Self {
            knots: times.to_vec(),
            coeffs,
        })
    }

    /// Second derivatives at the knots for the not-a-knot spline
    fn second_derivatives(times: &[f64], values: &[f64], n: usize) -> Vec<f64> {
        let slope = |a: usize, b: usize| (values[b] - values[a]) / (times[b] - times[a]);

        match n {
            2 => vec![0.0; 2],
            3 => {
                // A single parabola through all three points
                let curvature = 2.0 * (slope(1, 2) - slope(0, 1)) / (times[2] - times[0]);
                vec![curvature; 3]
            }
            _ => Self::solve_not_a_knot(times, values, n),
        }
    }

    /// Tridiagonal (Thomas) solve for the interior second derivatives,
    /// with the not-a-knot conditions folded into the first and last rows
    fn solve_not_a_knot(times: &[f64], values: &[f64], n: usize) -> Vec<f64> {
        let h = |i: usize| times[i + 1] - times[i];
        let slope = |i: usize| (values[i + 1] - values[i]) / h(i);

        // Unknowns are m[1]..m[n-2]; the end values follow from third-
        // derivative continuity across the first and last interior knots:
        //   (m1 - m0)/h0 = (m2 - m1)/h1  (and mirrored at the far end)
        let k = n - 2;
        let mut sub = vec![0.0; k];
        let mut diag = vec![0.0; k];
        let mut sup = vec![0.0; k];
        let mut rhs = vec![0.0; k];

        for j in 0..k {
            let i = j + 1;
            rhs[j] = 6.0 * (slope(i) - slope(i - 1));
            if j == 0 {
                let (h0, h1) = (h(0), h(1));
                diag[j] = h0 * (h0 + h1) / h1 + 2.0 * (h0 + h1);
                sup[j] = (h1 * h1 - h0 * h0) / h1;
            } else if j == k - 1 {
                let (ha, hb) = (h(n - 3), h(n - 2));
                diag[j] = 2.0 * (ha + hb) + hb * (ha + hb) / ha;
                sub[j] = (ha * ha - hb * hb) / ha;
            } else {
                sub[j] = h(i - 1);
                diag[j] = 2.0 * (h(i - 1) + h(i));
                sup[j] = h(i);
            }
        }

        for j in 1..k {
            let w = sub[j] / diag[j - 1];
            diag[j] -= w * sup[j - 1];
            rhs[j] -= w * rhs[j - 1];
        }

        let mut m = vec![0.0; n];
        m[n - 2] = rhs[k - 1] / diag[k - 1];
        for j in (0..k - 1).rev() {
            m[j + 1] = (rhs[j] - sup[j] * m[j + 2]) / diag[j];
        }

        let (h0, h1) = (h(0), h(1));
        m[0] = (m[1] * (h0 + h1) - m[2] * h0) / h1;
        let (ha, hb) = (h(n - 3), h(n - 2));
        m[n - 1] = (m[n - 2] * (ha + hb) - m[n - 3] * hb) / ha;
        m
    }

    /// The fitted span `(t_min, t_max)`
    pub fn span(&self) -> (f64, f64) {
        (self.knots[0], self.knots[self.knots.len() - 1])
    }

    /// Index of the segment containing `t`, which must be inside the span
    fn segment_index(&self, t: f64) -> usize {
        self.knots
            .partition_point(|&k| k <= t)
            .clamp(1, self.knots.len() - 1)
            - 1
    }

    fn check_span(&self, t: f64) -> Result<()> {
        let (t_min, t_max) = self.span();
        if t < t_min || t > t_max {
            return Err(AlmanacError::OutOfRange { t, t_min, t_max });
        }
        Ok(())
    }

    /// Interpolated value at `t`
    ///
    /// Fails with [`AlmanacError::OutOfRange`] outside the fitted span.
    pub fn evaluate(&self, t: f64) -> Result<f64> {
        self.check_span(t)?;
        let i = self.segment_index(t);
        let x = t - self.knots[i];
        let c = &self.coeffs[i];
        Ok(((c[3] * x + c[2]) * x + c[1]) * x + c[0])
    }

    /// The derivative as a new, independent piecewise-quadratic interpolant
    ///
    /// Pure construction; the spline itself is left untouched and the two
    /// may be used concurrently.
    pub fn derivative(&self) -> SplineDerivative {
        SplineDerivative {
            knots: self.knots.clone(),
            coeffs: self
                .coeffs
                .iter()
                .map(|c| [c[1], 2.0 * c[2], 3.0 * c[3]])
                .collect(),
        }
    }

    /// Every time in the span where the spline crosses zero, increasing
    ///
    /// Sign changes are bracketed per monotonic piece and bisected; knot
    /// values that are exactly zero are reported once.
    pub fn roots(&self) -> Vec<f64> {
        let mut roots = Vec::new();

        for (i, c) in self.coeffs.iter().enumerate() {
            let h = self.knots[i + 1] - self.knots[i];
            let eval = |x: f64| ((c[3] * x + c[2]) * x + c[1]) * x + c[0];

            // Split the segment at the derivative's quadratic roots so each
            // piece is monotonic and holds at most one sign change.
            let mut cuts = vec![0.0];
            for x in quadratic_roots(c[1], 2.0 * c[2], 3.0 * c[3]) {
                if x > 0.0 && x < h {
                    cuts.push(x);
                }
            }
            cuts.push(h);

            for w in cuts.windows(2) {
                let (lo, hi) = (w[0], w[1]);
                let (f_lo, f_hi) = (eval(lo), eval(hi));

                if f_lo == 0.0 {
                    roots.push(self.knots[i] + lo);
                } else if f_lo * f_hi < 0.0 {
                    let mut a = lo;
                    let mut b = hi;
                    for _ in 0..BISECT_ITERS {
                        let mid = 0.5 * (a + b);
                        if eval(mid) * f_lo <= 0.0 {
                            b = mid;
                        } else {
                            a = mid;
                        }
                    }
                    roots.push(self.knots[i] + 0.5 * (a + b));
                }
            }
            // The right end of the final segment is nobody's left end
            if i == self.coeffs.len() - 1 && eval(h) == 0.0 {
                roots.push(self.knots[i] + h);
            }
        }

        roots
    }
}

/// Piecewise-quadratic derivative of a [`CubicSpline`]
///
/// Supports evaluation and root extraction; roots come from the stable
/// quadratic formula per segment, never a higher-degree solver.
#[derive(Debug, Clone)]
pub struct SplineDerivative {
    knots: Vec<f64>,
    /// Per-segment `c[0] + c[1]*x + c[2]*x^2`
    coeffs: Vec<[f64; 3]>,
}

impl SplineDerivative {
    /// The span inherited from the parent spline
    pub fn span(&self) -> (f64, f64) {
        (self.knots[0], self.knots[self.knots.len() - 1])
    }

    /// Derivative value at `t`; same out-of-span policy as the spline
    pub fn evaluate(&self, t: f64) -> Result<f64> {
        let (t_min, t_max) = self.span();
        if t < t_min || t > t_max {
            return Err(AlmanacError::OutOfRange { t, t_min, t_max });
        }
        let i = self
            .knots
            .partition_point(|&k| k <= t)
            .clamp(1, self.knots.len() - 1)
            - 1;
        let x = t - self.knots[i];
        let c = &self.coeffs[i];
        Ok((c[2] * x + c[1]) * x + c[0])
    }

    /// Every zero of the derivative inside the span, increasing
    pub fn roots(&self) -> Vec<f64> {
        let mut roots: Vec<f64> = Vec::new();

        for (i, c) in self.coeffs.iter().enumerate() {
            let h = self.knots[i + 1] - self.knots[i];
            let include_right = i == self.coeffs.len() - 1;
            for x in quadratic_roots(c[0], c[1], c[2]) {
                let in_segment = x >= 0.0 && (x < h || (include_right && x <= h));
                if in_segment {
                    let t = self.knots[i] + x;
                    // Segment-boundary roots would otherwise appear twice
                    if roots
                        .last()
                        .map_or(true, |&prev| t - prev > 1e-9 * h.max(1.0))
                    {
                        roots.push(t);
                    }
                }
            }
        }

        roots
    }
}

/// Real roots of `c0 + c1*x + c2*x^2`, ascending
///
/// Uses the q-form of the quadratic formula to avoid catastrophic
/// cancellation when `c1^2 >> c0*c2`; degrades gracefully to the linear
/// case.
fn quadratic_roots(c0: f64, c1: f64, c2: f64) -> Vec<f64> {
    if c2 == 0.0 {
        if c1 == 0.0 {
            return Vec::new();
        }
        return vec![-c0 / c1];
    }

    let disc = c1 * c1 - 4.0 * c2 * c0;
    if disc < 0.0 {
        return Vec::new();
    }

    let sqrt_disc = disc.sqrt();
    let q = -0.5 * (c1 + c1.signum() * sqrt_disc);
    let mut roots = Vec::with_capacity(2);
    if q != 0.0 {
        roots.push(q / c2);
        roots.push(c0 / q);
    } else {
        // c1 == 0 and disc == -4*c2*c0 >= 0
        let r = (-c0 / c2).max(0.0).sqrt();
        roots.push(-r);
        roots.push(r);
    }
    roots.sort_by(|a, b| a.partial_cmp(b).unwrap());
    roots.dedup();
    roots
}
