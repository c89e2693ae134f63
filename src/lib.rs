//! Satpass: satellite frame transformations and pass event detection,
//! inspired by Python's skyfield
//!
//! The crate covers two coupled jobs:
//!
//! 1. Moving a satellite position/velocity state from the propagator's
//!    quasi-inertial TEME frame into better-defined Earth frames (TIRS,
//!    ITRS), including the rotating-frame velocity correction, via an
//!    explicit transform graph.
//! 2. Turning a discretely sampled angular quantity (say, altitude above
//!    the horizon) into labeled rise/set/culmination events by spline
//!    interpolation and root finding.
//!
//! Everything is synchronous and free of shared mutable state; a
//! [`FrameGraph`] and its Earth-orientation provider can be shared across
//! worker threads processing disjoint time samples.
//!
//! ```rust
//! use satpass::earthlib::BundledEop;
//! use satpass::{Cartesian3, Frame, FrameGraph, StateVector, Timescale};
//!
//! let ts = Timescale::default();
//! let t = ts.parse_utc("2020-04-12T00:00:00Z").unwrap();
//!
//! // Propagator output, TEME, km and km/s
//! let state = StateVector::new(Frame::Teme, t, Cartesian3::new(-4437.95, 2662.40, 4396.67))
//!     .with_velocity(Cartesian3::new(-3.68, -5.62, 0.63));
//!
//! let graph = FrameGraph::standard(BundledEop::bundled());
//! let itrs = graph.transform(&state, Frame::Itrs).unwrap();
//! assert_eq!(itrs.frame, Frame::Itrs);
//! ```

use thiserror::Error;

pub mod almanac;
pub mod constants;
pub mod coordinates;
pub mod earthlib;
pub mod framelib;
pub mod time;
pub mod trajectory;

// Re-export commonly used types
pub use almanac::{find_events, CubicSpline, Event, EventKind};
pub use coordinates::Cartesian3;
pub use earthlib::{BundledEop, EarthOrientationProvider};
pub use framelib::{Frame, FrameGraph, StateVector, TransformEdge};
pub use time::{Time, Timescale};
pub use trajectory::TrajectoryInterpolator;

/// Main error type for the satpass library
#[derive(Debug, Error)]
pub enum SatpassError {
    #[error(transparent)]
    Frame(#[from] framelib::FrameError),

    #[error(transparent)]
    Almanac(#[from] almanac::AlmanacError),

    #[error(transparent)]
    Eop(#[from] earthlib::EopError),

    #[error(transparent)]
    Time(#[from] time::TimeError),

    #[error(transparent)]
    Trajectory(#[from] trajectory::TrajectoryError),
}

/// Result type for satpass operations
pub type Result<T> = std::result::Result<T, SatpassError>;
