//! Earth orientation parameters
//!
//! Supplies the time-varying quantities the frame engine needs to relate
//! quasi-inertial and Earth-fixed frames: polar motion offsets (xp, yp),
//! the s' frame-bias term, and the Greenwich mean sidereal angle.
//!
//! The [`EarthOrientationProvider`] trait is the narrow interface the rest
//! of the crate consumes; [`BundledEop`] is a self-contained implementation
//! backed by a compact embedded table. Providers are read-only and safe to
//! share across worker threads.

use crate::constants::{ASEC2RAD, DAY_S, J2000, JULIAN_CENTURY_D, TAU};
use crate::time::Time;
use once_cell::sync::Lazy;
use std::sync::Arc;
use thiserror::Error;

/// Error type for Earth-orientation lookups
#[derive(Debug, Error)]
pub enum EopError {
    /// The requested instant falls outside the provider's covered range
    #[error("No Earth orientation data for MJD {mjd:.3} (covered: {start_mjd:.1}..{end_mjd:.1})")]
    Unavailable {
        /// The Modified Julian date that was requested
        mjd: f64,
        /// First covered MJD
        start_mjd: f64,
        /// Last covered MJD
        end_mjd: f64,
    },
}

/// Result type for Earth-orientation lookups
pub type Result<T> = std::result::Result<T, EopError>;

/// Polar motion offsets and frame-bias term at one instant, in radians
#[derive(Debug, Clone, Copy)]
pub struct PolarMotion {
    /// Pole x offset
    pub xp: f64,
    /// Pole y offset
    pub yp: f64,
    /// TIO locator s'
    pub s_prime: f64,
}

/// Source of Earth-orientation parameters
///
/// Implementations must be pure functions of the instant: same input, same
/// output, no interior mutability. Both queries fail with
/// [`EopError::Unavailable`] outside the implementation's covered range.
pub trait EarthOrientationProvider: Send + Sync {
    /// Polar motion offsets (xp, yp) and s' at the given instant
    fn polar_motion(&self, time: &Time) -> Result<PolarMotion>;

    /// Greenwich mean sidereal angle in radians, [0, 2*PI)
    fn gmst_angle(&self, time: &Time) -> Result<f64>;
}

/// Greenwich Mean Sidereal Time, IAU 1982 model
///
/// Takes UT1 as a two-part Julian date so the day fraction keeps full
/// precision. Returns radians in [0, 2*PI).
///
/// The polynomial is the GMST formula from AIAA 2006-6753 / Vallado; the
/// leading constant folds in the half-day offset between the Julian day
/// origin (noon) and the civil day.
pub fn gmst82(jd_ut1: f64, frac_ut1: f64) -> f64 {
    let t = (jd_ut1 - J2000 + frac_ut1) / JULIAN_CENTURY_D;

    // GMST polynomial, in seconds of time
    let g = 67_310.548_41 + (8_640_184.812_866 + (0.093_104 - 6.2e-6 * t) * t) * t;

    ((jd_ut1 % 1.0 + frac_ut1 + g / DAY_S).rem_euclid(1.0)) * TAU
}

/// TIO locator s', IAU 2000 approximation: -47 microarcseconds per century
fn s_prime(centuries_tt: f64) -> f64 {
    -47.0e-6 * centuries_tt * ASEC2RAD
}

/// One embedded polar-motion sample (offsets in arcseconds)
#[derive(Debug, Clone, Copy)]
struct EopSample {
    mjd: f64,
    xp_asec: f64,
    yp_asec: f64,
}

// Sparse IERS-style pole track, sampled twice a year. The pole wanders a
// few tenths of an arcsecond on the ~433-day Chandler period, so linear
// interpolation between these knots stays within a few mas of the daily
// series.
const BUNDLED_SAMPLES: &[EopSample] = &[
    EopSample { mjd: 58_119.0, xp_asec: 0.0593, yp_asec: 0.2843 }, // 2018-01-01
    EopSample { mjd: 58_300.0, xp_asec: 0.2021, yp_asec: 0.4301 }, // 2018-07-01
    EopSample { mjd: 58_484.0, xp_asec: 0.1165, yp_asec: 0.2823 }, // 2019-01-01
    EopSample { mjd: 58_665.0, xp_asec: 0.2256, yp_asec: 0.3684 }, // 2019-07-01
    EopSample { mjd: 58_849.0, xp_asec: 0.0773, yp_asec: 0.2843 }, // 2020-01-01
    EopSample { mjd: 59_031.0, xp_asec: 0.1760, yp_asec: 0.4302 }, // 2020-07-01
    EopSample { mjd: 59_215.0, xp_asec: 0.0761, yp_asec: 0.3474 }, // 2021-01-01
    EopSample { mjd: 59_396.0, xp_asec: 0.1909, yp_asec: 0.4406 }, // 2021-07-01
    EopSample { mjd: 59_580.0, xp_asec: 0.0554, yp_asec: 0.2763 }, // 2022-01-01
    EopSample { mjd: 59_761.0, xp_asec: 0.2615, yp_asec: 0.3727 }, // 2022-07-01
    EopSample { mjd: 59_945.0, xp_asec: 0.1317, yp_asec: 0.2468 }, // 2023-01-01
    EopSample { mjd: 60_126.0, xp_asec: 0.2406, yp_asec: 0.4326 }, // 2023-07-01
    EopSample { mjd: 60_310.0, xp_asec: 0.0567, yp_asec: 0.3406 }, // 2024-01-01
    EopSample { mjd: 60_492.0, xp_asec: 0.1968, yp_asec: 0.4623 }, // 2024-07-01
    EopSample { mjd: 60_676.0, xp_asec: 0.0658, yp_asec: 0.3386 }, // 2025-01-01
    EopSample { mjd: 60_857.0, xp_asec: 0.2184, yp_asec: 0.4067 }, // 2025-07-01
    EopSample { mjd: 61_041.0, xp_asec: 0.1002, yp_asec: 0.2852 }, // 2026-01-01
    EopSample { mjd: 61_222.0, xp_asec: 0.2357, yp_asec: 0.3889 }, // 2026-07-01
];

static BUNDLED: Lazy<Arc<BundledEop>> = Lazy::new(|| Arc::new(BundledEop::new()));

/// Earth-orientation provider backed by the embedded sample table
///
/// Covers 2018 through mid-2026. Polar motion is linearly interpolated
/// between the embedded knots; the sidereal angle uses the IAU 1982
/// polynomial and is gated on the same covered range so that "outside the
/// table" fails uniformly for both queries.
#[derive(Debug, Clone)]
pub struct BundledEop {
    samples: Vec<EopSample>,
}

impl BundledEop {
    /// Build a provider from the embedded table
    pub fn new() -> Self {
        Self {
            samples: BUNDLED_SAMPLES.to_vec(),
        }
    }

    /// Shared instance of the bundled provider
    pub fn bundled() -> Arc<Self> {
        Arc::clone(&BUNDLED)
    }

    fn covered(&self) -> (f64, f64) {
        (
            self.samples.first().map(|s| s.mjd).unwrap_or(f64::NAN),
            self.samples.last().map(|s| s.mjd).unwrap_or(f64::NAN),
        )
    }

    fn check_range(&self, mjd: f64) -> Result<()> {
        let (start_mjd, end_mjd) = self.covered();
        if mjd < start_mjd || mjd > end_mjd {
            return Err(EopError::Unavailable {
                mjd,
                start_mjd,
                end_mjd,
            });
        }
        Ok(())
    }

    /// Linearly interpolated (xp, yp) in arcseconds at an MJD inside the span
    fn interpolate_pole(&self, mjd: f64) -> (f64, f64) {
        let idx = self
            .samples
            .partition_point(|s| s.mjd <= mjd)
            .clamp(1, self.samples.len() - 1);
        let lo = self.samples[idx - 1];
        let hi = self.samples[idx];
        let s = (mjd - lo.mjd) / (hi.mjd - lo.mjd);
        (
            lo.xp_asec + s * (hi.xp_asec - lo.xp_asec),
            lo.yp_asec + s * (hi.yp_asec - lo.yp_asec),
        )
    }
}

impl Default for BundledEop {
    fn default() -> Self {
        Self::new()
    }
}

impl EarthOrientationProvider for BundledEop {
    fn polar_motion(&self, time: &Time) -> Result<PolarMotion> {
        let mjd = time.mjd_tt();
        self.check_range(mjd)?;

        let (xp_asec, yp_asec) = self.interpolate_pole(mjd);
        Ok(PolarMotion {
            xp: xp_asec * ASEC2RAD,
            yp: yp_asec * ASEC2RAD,
            s_prime: s_prime(time.centuries_since_j2000()),
        })
    }

    fn gmst_angle(&self, time: &Time) -> Result<f64> {
        self.check_range(time.mjd_tt())?;

        let (whole, frac) = time.ut1_parts();
        Ok(gmst82(whole, frac))
    }
}
