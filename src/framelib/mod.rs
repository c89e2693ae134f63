//! Reference frames and the transforms between them
//!
//! Frames are plain named tags ([`Frame`]); the state they scope is a
//! [`StateVector`] carrying a position, an optional velocity, and the
//! instant at which both are valid. The directed transforms between frames
//! live in an explicit [`graph::FrameGraph`] registry that is built once
//! and passed around; there is no process-global graph.
//!
//! The three frames this crate defines:
//!
//! - **TEME** — the quasi-inertial frame the SGP4 propagator reports in.
//!   Use it only at that boundary.
//! - **TIRS** — Earth-rotating intermediate frame, reached from TEME by
//!   the sidereal rotation plus a rotating-frame velocity correction.
//! - **ITRS** — Earth-fixed terrestrial frame, reached from TIRS by the
//!   polar-motion rotation.
//!
//! The transform semantics follow IERS Conventions 2010 chapter 5 and
//! Vallado section 3.7.

pub mod graph;
pub mod terrestrial;

use crate::coordinates::Cartesian3;
use crate::earthlib::EopError;
use crate::time::Time;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub use graph::{FrameGraph, TransformEdge};

/// Error type for frame transformations
#[derive(Debug, Error)]
pub enum FrameError {
    /// No chain of registered edges connects the two frames
    #[error("No transform path registered from {from} to {to}")]
    NoPath {
        /// Frame of the input state
        from: Frame,
        /// Requested target frame
        to: Frame,
    },

    /// The edge cannot handle a quantity carried by the state
    #[error("Transform {from} -> {to} does not support {quantity}")]
    UnsupportedQuantity {
        /// Source frame of the offending edge
        from: Frame,
        /// Target frame of the offending edge
        to: Frame,
        /// The quantity the edge cannot handle
        quantity: &'static str,
    },

    /// A frame name failed to parse
    #[error("Unknown frame name: {0:?}")]
    UnknownFrame(String),

    /// The Earth-orientation provider could not answer for the instant
    #[error(transparent)]
    Eop(#[from] EopError),
}

/// Result type for frame transformations
pub type Result<T> = std::result::Result<T, FrameError>;

/// Named reference frame tag
///
/// Frames at different instants are not distinct values of this type; the
/// instant lives on the [`StateVector`], and every edge reads it from
/// there.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Frame {
    /// True Equator Mean Equinox (SGP4 output frame)
    Teme,
    /// Terrestrial Intermediate Reference System
    Tirs,
    /// International Terrestrial Reference System
    Itrs,
}

impl Frame {
    /// Canonical upper-case name
    pub fn name(&self) -> &'static str {
        match self {
            Frame::Teme => "TEME",
            Frame::Tirs => "TIRS",
            Frame::Itrs => "ITRS",
        }
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Frame {
    type Err = FrameError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "TEME" => Ok(Frame::Teme),
            "TIRS" => Ok(Frame::Tirs),
            "ITRS" => Ok(Frame::Itrs),
            _ => Err(FrameError::UnknownFrame(s.to_string())),
        }
    }
}

/// A position (and optionally velocity) scoped to one frame at one instant
///
/// Positions are conventionally kilometers and velocities
/// kilometers/second; the crate performs no unit conversion or
/// enforcement. Transforms never mutate their input: each edge produces a
/// fresh value.
///
/// An acceleration vector may be attached by callers for bookkeeping, but
/// no registered edge can propagate one; transforming such a state fails
/// with [`FrameError::UnsupportedQuantity`] rather than silently dropping
/// the vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateVector {
    /// Frame both vectors are expressed in
    pub frame: Frame,
    /// Instant at which the state is valid
    pub time: Time,
    /// Position, conventionally km
    pub position: Cartesian3,
    /// Velocity, conventionally km/s
    pub velocity: Option<Cartesian3>,
    /// Acceleration; carried for callers but not transformable
    pub acceleration: Option<Cartesian3>,
}

impl StateVector {
    /// Create a position-only state
    pub fn new(frame: Frame, time: Time, position: Cartesian3) -> Self {
        Self {
            frame,
            time,
            position,
            velocity: None,
            acceleration: None,
        }
    }

    /// Attach a velocity vector
    pub fn with_velocity(mut self, velocity: Cartesian3) -> Self {
        self.velocity = Some(velocity);
        self
    }

    /// Attach an acceleration vector
    pub fn with_acceleration(mut self, acceleration: Cartesian3) -> Self {
        self.acceleration = Some(acceleration);
        self
    }
}

impl fmt::Display for StateVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] r = ({:.3}, {:.3}, {:.3}) km",
            self.frame, self.position.x, self.position.y, self.position.z
        )?;
        if let Some(v) = self.velocity {
            write!(f, ", v = ({:.6}, {:.6}, {:.6}) km/s", v.x, v.y, v.z)?;
        }
        Ok(())
    }
}
