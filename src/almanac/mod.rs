//! Rise, set and culmination events from sampled angular data
//!
//! A discretely sampled angle (typically the altitude of a satellite or
//! the Sun above the horizon, in degrees) is fitted with a
//! [`CubicSpline`]; zero crossings of the spline are rise/set events and
//! zeros of its derivative are culminations. [`find_events`] runs both
//! extractions and classifies the results:
//!
//! - value root, positive slope -> [`EventKind::RisingCrossing`]
//! - value root, negative slope -> [`EventKind::FallingCrossing`]
//! - slope root, positive value -> [`EventKind::LocalMax`]
//! - slope root, negative value -> [`EventKind::LocalMin`]
//!
//! The time axis is a plain `f64`; by convention the crate feeds unix
//! epoch seconds from [`crate::time::Time::to_epoch_seconds`], but any
//! strictly increasing axis works.
//!
//! # Known limitation
//!
//! A span in which the tracked quantity never crosses zero (the
//! circumpolar case: an object that stays above or below the horizon for
//! the whole window) yields no crossing events at all. Derivative-sign
//! classification cannot tell "always above" from "always below"; callers
//! must compare the sampled values themselves to disambiguate. Likewise,
//! short spans may contain zero or several rise/set pairs; no
//! one-pair-per-span assumption is made.

pub mod spline;

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use spline::{CubicSpline, SplineDerivative};

/// Error type for interpolation and event extraction
#[derive(Debug, Error)]
pub enum AlmanacError {
    /// Sample arrays have different lengths
    #[error("Sample count mismatch: {times} times vs {values} values")]
    LengthMismatch {
        /// Number of time samples
        times: usize,
        /// Number of value samples
        values: usize,
    },

    /// Not enough samples to fit an interpolant
    #[error("Need at least 2 samples to interpolate, got {count}")]
    TooFewSamples {
        /// Number of samples supplied
        count: usize,
    },

    /// Time samples are not strictly increasing
    #[error("Time samples must be strictly increasing (violation at index {index})")]
    NonMonotonicSamples {
        /// Index of the first sample that does not increase
        index: usize,
    },

    /// Evaluation requested outside the fitted span
    #[error("Time {t} is outside the fitted span ({t_min}..{t_max})")]
    OutOfRange {
        /// The requested time
        t: f64,
        /// Start of the fitted span
        t_min: f64,
        /// End of the fitted span
        t_max: f64,
    },
}

/// Result type for interpolation and event extraction
pub type Result<T> = std::result::Result<T, AlmanacError>;

/// Classification of a detected event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// The quantity crossed zero going up (rise)
    RisingCrossing,
    /// The quantity crossed zero going down (set)
    FallingCrossing,
    /// Local maximum of the quantity (upper culmination)
    LocalMax,
    /// Local minimum of the quantity (lower culmination)
    LocalMin,
}

/// One detected event
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Event time, on the axis the spline was fitted over
    pub time: f64,
    /// What happened
    pub kind: EventKind,
    /// Interpolated value at the event time (near zero for crossings)
    pub value: f64,
}

/// Extract and classify every crossing and extremum of a fitted spline
///
/// Returns events ordered by time. Consumers treat the sequence as
/// read-only output; re-running on the same spline reproduces it exactly.
///
/// See the module documentation for the circumpolar limitation.
pub fn find_events(spline: &CubicSpline) -> Result<Vec<Event>> {
    let deriv = spline.derivative();
    let mut events = Vec::new();

    for t in spline.roots() {
        let slope = deriv.evaluate(t)?;
        events.push(Event {
            time: t,
            kind: if slope >= 0.0 {
                EventKind::RisingCrossing
            } else {
                EventKind::FallingCrossing
            },
            value: spline.evaluate(t)?,
        });
    }

    for t in deriv.roots() {
        let value = spline.evaluate(t)?;
        events.push(Event {
            time: t,
            kind: if value >= 0.0 {
                EventKind::LocalMax
            } else {
                EventKind::LocalMin
            },
            value,
        });
    }

    events.sort_by(|a, b| a.time.partial_cmp(&b.time).unwrap_or(std::cmp::Ordering::Equal));
    debug!(
        "{} crossings, {} extrema in span {:?}",
        events
            .iter()
            .filter(|e| matches!(e.kind, EventKind::RisingCrossing | EventKind::FallingCrossing))
            .count(),
        events
            .iter()
            .filter(|e| matches!(e.kind, EventKind::LocalMax | EventKind::LocalMin))
            .count(),
        spline.span(),
    );
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;
    use std::f64::consts::PI;

    fn sample(f: impl Fn(f64) -> f64, t0: f64, t1: f64, n: usize) -> CubicSpline {
        let times: Vec<f64> = (0..n)
            .map(|i| t0 + (t1 - t0) * i as f64 / (n - 1) as f64)
            .collect();
        let values: Vec<f64> = times.iter().map(|&t| f(t)).collect();
        CubicSpline::fit(&times, &values).unwrap()
    }

    #[test]
    fn test_sine_crossings_classified() {
        let spline = sample(f64::sin, 0.0, 2.0 * PI, 100);
        let events = find_events(&spline).unwrap();

        let rising: Vec<_> = events
            .iter()
            .filter(|e| e.kind == EventKind::RisingCrossing)
            .collect();
        let falling: Vec<_> = events
            .iter()
            .filter(|e| e.kind == EventKind::FallingCrossing)
            .collect();

        // sin rises through zero at 0 and falls through zero at pi
        assert!(rising.iter().any(|e| e.time.abs() < 1e-3));
        assert!(falling.iter().any(|e| (e.time - PI).abs() < 1e-3));

        // Crossing values are zero to interpolation accuracy
        for e in rising.iter().chain(falling.iter()) {
            assert!(e.value.abs() < 1e-6, "crossing value {} at {}", e.value, e.time);
        }
    }

    #[test]
    fn test_cosine_extrema_classified() {
        let spline = sample(f64::cos, 0.0, 2.0 * PI, 100);
        let events = find_events(&spline).unwrap();

        let max = events
            .iter()
            .find(|e| e.kind == EventKind::LocalMax)
            .expect("no local max found");
        let min = events
            .iter()
            .find(|e| e.kind == EventKind::LocalMin)
            .expect("no local min found");

        // cos peaks at 0 with value 1 and bottoms at pi with value -1.
        // The peak sits on the span boundary; the not-a-knot fit keeps its
        // derivative root a hair inside the span.
        assert!(max.time.abs() < 1e-2, "max at {}", max.time);
        assert_relative_eq!(max.value, 1.0, epsilon = 1e-3);

        assert!((min.time - PI).abs() < 1e-3, "min at {}", min.time);
        assert_relative_eq!(min.value, -1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_events_are_time_ordered() {
        let spline = sample(|t| (1.3 * t).sin() + 0.1, 0.0, 15.0, 200);
        let events = find_events(&spline).unwrap();
        assert!(events.len() > 4);
        for w in events.windows(2) {
            assert!(w[0].time <= w[1].time);
        }
    }

    #[rstest]
    #[case(30.0)]
    #[case(-30.0)]
    fn test_circumpolar_span_has_no_crossings(#[case] offset: f64) {
        // Altitude-like series that never crosses the horizon: crossing
        // events are absent and the caller tells above from below by
        // looking at the values, not at the events.
        let spline = sample(|t| offset + 5.0 * (0.2 * t).sin(), 0.0, 40.0, 120);
        let events = find_events(&spline).unwrap();

        assert!(events.iter().all(|e| matches!(
            e.kind,
            EventKind::LocalMax | EventKind::LocalMin
        )));

        // The extremum classification follows the sign of the value
        if offset > 0.0 {
            assert!(events.iter().all(|e| e.kind == EventKind::LocalMax));
        } else {
            assert!(events.iter().all(|e| e.kind == EventKind::LocalMin));
        }
    }

    #[test]
    fn test_event_serialization_shape() {
        let event = Event {
            time: 12.5,
            kind: EventKind::RisingCrossing,
            value: 0.0,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"rising_crossing\""));

        let back: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
