//! Transform edges between TEME, TIRS and ITRS
//!
//! Two edge pairs are defined here:
//!
//! - TIRS <-> ITRS is a pure polar-motion rotation
//!   ([`TransformEdge::Rotation`]); polar motion is quasi-static over
//!   satellite-pass timescales, so position and velocity rotate
//!   identically and the reverse edge is the transpose.
//! - TEME <-> TIRS is a full function edge
//!   ([`TransformEdge::Function`]) because the two frames differ by a
//!   rotation *rate*, not just an orientation: after the sidereal rotation
//!   the velocity picks up the rotating-frame term `omega x r`.
//!
//! Conversions follow Vallado, Fundamentals of Astrodynamics and
//! Applications 4th Ed. section 3.7, and IERS Conventions 2010 chapter 5.

use crate::constants::EARTH_ANGVEL;
use crate::coordinates::rotation::{rot_x, rot_y, rot_z};
use crate::coordinates::Cartesian3;
use crate::earthlib::{EarthOrientationProvider, PolarMotion};
use crate::framelib::{Frame, FrameError, Result, StateVector, TransformEdge};
use nalgebra::Matrix3;
use std::sync::Arc;

/// Earth's mean angular velocity vector in TIRS, rad/s
fn earth_angvel_vector() -> Cartesian3 {
    Cartesian3::new(0.0, 0.0, EARTH_ANGVEL)
}

/// Polar motion matrix, IAU 2000 (the `pom00` construction)
///
/// Operates in the sense `v_itrs = matrix * v_tirs`.
pub fn polar_motion_matrix(pm: &PolarMotion) -> Matrix3<f64> {
    rot_x(-pm.yp) * rot_y(-pm.xp) * rot_z(pm.s_prime)
}

/// TIRS -> ITRS polar-motion edge
pub fn tirs_to_itrs_edge(provider: Arc<dyn EarthOrientationProvider>) -> TransformEdge {
    TransformEdge::rotation(move |time| {
        Ok(polar_motion_matrix(&provider.polar_motion(time)?))
    })
}

/// ITRS -> TIRS polar-motion edge (transpose of the forward matrix)
pub fn itrs_to_tirs_edge(provider: Arc<dyn EarthOrientationProvider>) -> TransformEdge {
    TransformEdge::rotation(move |time| {
        Ok(polar_motion_matrix(&provider.polar_motion(time)?).transpose())
    })
}

fn reject_acceleration(state: &StateVector, from: Frame, to: Frame) -> Result<()> {
    if state.acceleration.is_some() {
        return Err(FrameError::UnsupportedQuantity {
            from,
            to,
            quantity: "acceleration",
        });
    }
    Ok(())
}

/// TEME -> TIRS sidereal edge with rotating-frame velocity correction
///
/// Position: `r_tirs = R_z(gmst) * r_teme`. Velocity:
/// `v_tirs = R_z(gmst) * v_teme - omega x r_tirs`; the subtraction removes
/// the apparent velocity induced by the rotating frame. A state without
/// velocity transforms position-only.
pub fn teme_to_tirs_edge(provider: Arc<dyn EarthOrientationProvider>) -> TransformEdge {
    TransformEdge::function(move |state| {
        reject_acceleration(state, Frame::Teme, Frame::Tirs)?;

        let rotation = rot_z(provider.gmst_angle(&state.time)?);
        let position = state.position.transform(&rotation);
        let velocity = state
            .velocity
            .map(|v| v.transform(&rotation) - earth_angvel_vector().cross(&position));

        Ok(StateVector {
            frame: Frame::Tirs,
            time: state.time,
            position,
            velocity,
            acceleration: None,
        })
    })
}

/// TIRS -> TEME sidereal edge, mirroring the forward correction
///
/// The `omega x r` term is added back *before* rotating, so the edge is
/// the exact inverse of [`teme_to_tirs_edge`].
pub fn tirs_to_teme_edge(provider: Arc<dyn EarthOrientationProvider>) -> TransformEdge {
    TransformEdge::function(move |state| {
        reject_acceleration(state, Frame::Tirs, Frame::Teme)?;

        let rotation = rot_z(-provider.gmst_angle(&state.time)?);
        let position = state.position.transform(&rotation);
        let velocity = state
            .velocity
            .map(|v| (v + earth_angvel_vector().cross(&state.position)).transform(&rotation));

        Ok(StateVector {
            frame: Frame::Teme,
            time: state.time,
            position,
            velocity,
            acceleration: None,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MJD_OFFSET;
    use crate::coordinates::rotation::orthogonality_defect;
    use crate::earthlib::BundledEop;
    use crate::time::{Time, Timescale};
    use approx::assert_relative_eq;

    fn covered_time() -> Time {
        Timescale::default().tt_jd(59_000.0 + MJD_OFFSET, None)
    }

    #[test]
    fn test_polar_motion_matrix_is_near_identity() {
        // Pole offsets are sub-arcsecond, so the matrix is within ~2.5e-6
        // of the identity but measurably different from it.
        let pm = BundledEop::bundled().polar_motion(&covered_time()).unwrap();
        let matrix = polar_motion_matrix(&pm);

        assert!(orthogonality_defect(&matrix) < 1e-12);
        assert_relative_eq!(matrix[(0, 0)], 1.0, epsilon = 1e-9);
        assert!(matrix[(0, 2)].abs() > 1e-8);
        assert!((matrix[(0, 2)] + matrix[(2, 0)]).abs() < 1e-12);
    }

    #[test]
    fn test_sidereal_edge_preserves_magnitudes() {
        let provider: Arc<dyn EarthOrientationProvider> = BundledEop::bundled();
        let edge = teme_to_tirs_edge(Arc::clone(&provider));

        let state = StateVector::new(
            Frame::Teme,
            covered_time(),
            Cartesian3::new(5_094.18, 6_127.64, 6_380.34),
        );
        let out = match &edge {
            TransformEdge::Function(f) => f(&state).unwrap(),
            _ => unreachable!(),
        };

        assert_eq!(out.frame, Frame::Tirs);
        assert_relative_eq!(
            out.position.magnitude(),
            state.position.magnitude(),
            max_relative = 1e-12
        );
        // Pure z-rotation leaves the z component alone
        assert_relative_eq!(out.position.z, state.position.z, epsilon = 1e-9);
    }

    #[test]
    fn test_velocity_correction_magnitude() {
        // For a geostationary-like state (r along x, v matching the frame
        // rotation), the TIRS velocity should be near zero: the satellite
        // co-rotates with the Earth.
        let provider = BundledEop::bundled();
        let time = covered_time();
        let theta = provider.gmst_angle(&time).unwrap();

        // Position fixed over the Greenwich meridian in TIRS terms,
        // expressed back in TEME
        let r_geo = 42_164.0;
        let r_tirs = Cartesian3::new(r_geo, 0.0, 0.0);
        let r_teme = r_tirs.transform(&rot_z(-theta));

        // Inertial velocity of a co-rotating point: omega x r
        let v_teme = earth_angvel_vector().cross(&r_teme);

        let edge = teme_to_tirs_edge(provider);
        let state = StateVector::new(Frame::Teme, time, r_teme).with_velocity(v_teme);
        let out = match &edge {
            TransformEdge::Function(f) => f(&state).unwrap(),
            _ => unreachable!(),
        };

        // |v| = omega * r ~ 3.07 km/s in TEME; essentially zero in TIRS
        assert!(v_teme.magnitude() > 3.0);
        assert!(out.velocity.unwrap().magnitude() < 1e-9);
    }

    #[test]
    fn test_function_edges_invert_each_other() {
        let provider: Arc<dyn EarthOrientationProvider> = BundledEop::bundled();
        let forward = teme_to_tirs_edge(Arc::clone(&provider));
        let reverse = tirs_to_teme_edge(provider);

        let state = StateVector::new(
            Frame::Teme,
            covered_time(),
            Cartesian3::new(-2_349.89, 6_231.77, -1_349.11),
        )
        .with_velocity(Cartesian3::new(5.33, 2.55, -4.92));

        let apply = |edge: &TransformEdge, s: &StateVector| match edge {
            TransformEdge::Function(f) => f(s).unwrap(),
            _ => unreachable!(),
        };

        let back = apply(&reverse, &apply(&forward, &state));
        let v0 = state.velocity.unwrap();
        let v1 = back.velocity.unwrap();

        assert_relative_eq!(back.position.x, state.position.x, max_relative = 1e-12);
        assert_relative_eq!(back.position.y, state.position.y, max_relative = 1e-12);
        assert_relative_eq!(back.position.z, state.position.z, max_relative = 1e-12);
        assert_relative_eq!(v1.x, v0.x, max_relative = 1e-12);
        assert_relative_eq!(v1.y, v0.y, max_relative = 1e-12);
        assert_relative_eq!(v1.z, v0.z, max_relative = 1e-12);
    }
}
