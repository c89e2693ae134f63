//! Trajectory interpolation over propagated state samples
//!
//! Propagators are expensive to call densely. This module fits one
//! [`CubicSpline`] per position axis to a coarse, time-ordered run of
//! [`StateVector`] samples and serves interpolated positions (and, via
//! the derivative splines, velocities) at arbitrary instants inside the
//! sampled span. A few-minute sampling step keeps LEO interpolation
//! errors at the meter level.
//!
//! All samples must share one frame; interpolating across a frame change
//! makes no geometric sense and is rejected up front. Sample velocities
//! are ignored: the velocity reported here is the derivative of the
//! fitted position, which keeps position and velocity mutually
//! consistent.

use crate::almanac::{AlmanacError, CubicSpline, SplineDerivative};
use crate::coordinates::Cartesian3;
use crate::framelib::{Frame, StateVector};
use crate::time::Time;
use thiserror::Error;

/// Error type for trajectory interpolation
#[derive(Debug, Error)]
pub enum TrajectoryError {
    /// A sample is not in the same frame as the first sample
    #[error("State sample {index} is in {found}, expected {expected}")]
    MixedFrames {
        /// Index of the offending sample
        index: usize,
        /// Frame of the first sample
        expected: Frame,
        /// Frame actually found
        found: Frame,
    },

    /// The underlying spline fit or evaluation failed
    #[error(transparent)]
    Spline(#[from] AlmanacError),
}

/// Result type for trajectory interpolation
pub type Result<T> = std::result::Result<T, TrajectoryError>;

/// Per-axis cubic-spline interpolant over a sampled trajectory
#[derive(Debug, Clone)]
pub struct TrajectoryInterpolator {
    frame: Frame,
    x: CubicSpline,
    y: CubicSpline,
    z: CubicSpline,
    dx: SplineDerivative,
    dy: SplineDerivative,
    dz: SplineDerivative,
}

impl TrajectoryInterpolator {
    /// Fit per-axis splines to time-ordered, single-frame samples
    ///
    /// The interpolation axis is lossy unix epoch seconds (see
    /// [`Time::to_epoch_seconds`]); out-of-order or duplicate instants
    /// surface as [`AlmanacError::NonMonotonicSamples`].
    pub fn fit(samples: &[StateVector]) -> Result<Self> {
        let frame = match samples.first() {
            Some(first) => first.frame,
            None => return Err(AlmanacError::TooFewSamples { count: 0 }.into()),
        };
        for (index, sample) in samples.iter().enumerate() {
            if sample.frame != frame {
                return Err(TrajectoryError::MixedFrames {
                    index,
                    expected: frame,
                    found: sample.frame,
                });
            }
        }

        let times: Vec<f64> = samples.iter().map(|s| s.time.to_epoch_seconds()).collect();
        let axis = |pick: fn(&Cartesian3) -> f64| -> Vec<f64> {
            samples.iter().map(|s| pick(&s.position)).collect()
        };

        let x = CubicSpline::fit(&times, &axis(|p| p.x))?;
        let y = CubicSpline::fit(&times, &axis(|p| p.y))?;
        let z = CubicSpline::fit(&times, &axis(|p| p.z))?;
        let (dx, dy, dz) = (x.derivative(), y.derivative(), z.derivative());

        Ok(Self {
            frame,
            x,
            y,
            z,
            dx,
            dy,
            dz,
        })
    }

    /// Frame every interpolated state is expressed in
    pub fn frame(&self) -> Frame {
        self.frame
    }

    /// The fitted span in unix epoch seconds
    pub fn span(&self) -> (f64, f64) {
        self.x.span()
    }

    /// Interpolated position in km at an instant inside the span
    pub fn position(&self, time: &Time) -> Result<Cartesian3> {
        let t = time.to_epoch_seconds();
        Ok(Cartesian3::new(
            self.x.evaluate(t)?,
            self.y.evaluate(t)?,
            self.z.evaluate(t)?,
        ))
    }

    /// Interpolated velocity in km/s, from the derivative splines
    pub fn velocity(&self, time: &Time) -> Result<Cartesian3> {
        let t = time.to_epoch_seconds();
        Ok(Cartesian3::new(
            self.dx.evaluate(t)?,
            self.dy.evaluate(t)?,
            self.dz.evaluate(t)?,
        ))
    }

    /// Full interpolated state (position + velocity) at an instant
    pub fn state_at(&self, time: &Time) -> Result<StateVector> {
        Ok(StateVector::new(self.frame, *time, self.position(time)?)
            .with_velocity(self.velocity(time)?))
    }
}
