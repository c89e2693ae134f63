//! Time module for astronomical time calculations
//!
//! This module provides the two-part Julian-date instant used by the frame
//! transformation engine, together with the handful of time-scale
//! conversions the crate actually needs: UTC in, TT for Earth-orientation
//! lookups, UT1 for the sidereal angle. It is inspired by the Python
//! Skyfield library's time handling.
//!
//! Instants also convert to and from unix epoch seconds as a single `f64`.
//! That conversion is lossy (sub-microsecond truncation over current
//! dates) and exists only so instants can serve as the abscissa of the
//! event interpolator in [`crate::almanac`]; the frame engine never goes
//! through it.

use crate::constants::{DAY_S, J2000, JULIAN_CENTURY_D, MJD_OFFSET, TT_MINUS_TAI, UNIX_EPOCH_JD};
use chrono::{DateTime, Utc};
use std::fmt;
use std::ops::{Add, Sub};
use thiserror::Error;

/// Error type for time operations
#[derive(Debug, Error)]
pub enum TimeError {
    #[error("Invalid calendar date: {0}")]
    InvalidCalendar(String),
}

/// Result type for time operations
pub type Result<T> = std::result::Result<T, TimeError>;

/// Factory for [`Time`] instants
///
/// Owns the leap-second table needed to bring UTC input onto the uniform
/// TT scale that [`Time`] carries internally. A default instance covers
/// leap seconds from 1999 on, which spans every date the bundled
/// Earth-orientation table can answer for anyway.
#[derive(Debug, Clone)]
pub struct Timescale {
    /// (UTC Julian date, TAI-UTC offset in seconds) at each leap insertion
    leap_table: Vec<(f64, f64)>,
}

impl Default for Timescale {
    fn default() -> Self {
        Self {
            // Leap insertions since 1999; earlier entries would only matter
            // for dates the rest of the crate cannot serve.
            leap_table: vec![
                (2_451_179.5, 32.0), // 1999-01-01
                (2_453_736.5, 33.0), // 2006-01-01
                (2_454_832.5, 34.0), // 2009-01-01
                (2_456_109.5, 35.0), // 2012-07-01
                (2_457_204.5, 36.0), // 2015-07-01
                (2_457_754.5, 37.0), // 2017-01-01
            ],
        }
    }
}

impl Timescale {
    /// TAI-UTC in seconds for a given UTC Julian date
    fn leap_offset(&self, utc_jd: f64) -> f64 {
        let mut offset = self.leap_table.first().map(|e| e.1).unwrap_or(0.0);
        for &(date, secs) in &self.leap_table {
            if utc_jd >= date {
                offset = secs;
            } else {
                break;
            }
        }
        offset
    }

    /// Create a time from a chrono UTC datetime
    pub fn from_datetime(&self, dt: DateTime<Utc>) -> Time {
        let unix = dt.timestamp() as f64 + dt.timestamp_subsec_nanos() as f64 / 1e9;
        self.from_epoch_seconds(unix)
    }

    /// Create a time from an ISO 8601 UTC string (e.g. `2020-04-12T00:00:00Z`)
    pub fn parse_utc(&self, iso: &str) -> Result<Time> {
        let dt = iso
            .parse::<DateTime<Utc>>()
            .map_err(|e| TimeError::InvalidCalendar(format!("{iso}: {e}")))?;
        Ok(self.from_datetime(dt))
    }

    /// Create a time from lossy unix epoch seconds (UTC scale)
    pub fn from_epoch_seconds(&self, seconds: f64) -> Time {
        let utc_jd = UNIX_EPOCH_JD + seconds / DAY_S;
        let tai_minus_utc = self.leap_offset(utc_jd);
        let tt_jd = utc_jd + (tai_minus_utc / DAY_S) + TT_MINUS_TAI;

        let whole = tt_jd.floor();
        Time {
            whole,
            tt_fraction: tt_jd - whole,
            tai_minus_utc,
        }
    }

    /// Create a time from a TT Julian date, optionally split in two parts
    pub fn tt_jd(&self, jd: f64, fraction: Option<f64>) -> Time {
        let (whole, frac) = match fraction {
            Some(f) => (jd, f),
            None => {
                let whole = jd.floor();
                (whole, jd - whole)
            }
        };
        // Leap offset is constant between insertions, so resolving it once
        // at construction is exact.
        let utc_estimate = whole + frac - TT_MINUS_TAI;
        Time {
            whole,
            tt_fraction: frac,
            tai_minus_utc: self.leap_offset(utc_estimate),
        }
    }

    /// Create a sequence of times equally spaced between two times
    pub fn linspace(&self, t0: &Time, t1: &Time, num: usize) -> Vec<Time> {
        if num < 2 {
            return vec![*t0];
        }

        let mut result = Vec::with_capacity(num);
        for i in 0..num {
            let s = i as f64 / (num - 1) as f64;
            result.push(Time {
                whole: t0.whole + s * (t1.whole - t0.whole),
                tt_fraction: t0.tt_fraction + s * (t1.tt_fraction - t0.tt_fraction),
                tai_minus_utc: t0.tai_minus_utc,
            });
        }
        result
    }
}

/// An instant, carried internally as a two-part Terrestrial Time Julian date
///
/// Keeping the whole day and the day fraction separate preserves
/// sub-microsecond resolution over the full Julian date range; all
/// same-instant scale views (UT1, UTC) are derived on access, so any two
/// `Time` values are directly comparable and subtractable.
#[derive(Debug, Clone, Copy)]
pub struct Time {
    /// Whole Julian day number (TT)
    whole: f64,
    /// TT fraction of day
    tt_fraction: f64,
    /// TAI-UTC in seconds, resolved when the instant was created
    tai_minus_utc: f64,
}

impl Time {
    /// The TT (Terrestrial Time) Julian date
    pub fn tt(&self) -> f64 {
        self.whole + self.tt_fraction
    }

    /// The TT Modified Julian date
    pub fn mjd_tt(&self) -> f64 {
        self.tt() - MJD_OFFSET
    }

    /// Delta-T in seconds (TT - UT1)
    ///
    /// Polynomial approximation; adequate for the sidereal angle, where a
    /// full second of Delta-T error moves the rotation by under 0.005
    /// arcseconds of longitude.
    pub fn delta_t(&self) -> f64 {
        let year = (self.tt() - 1_721_045.0) / 365.25;
        if year < 2005.0 {
            let t = year - 2000.0;
            63.86 + 0.3345 * t - 0.060374 * t * t
                + 0.0017275 * t.powi(3)
                + 0.000651814 * t.powi(4)
                + 0.00002373599 * t.powi(5)
        } else if year < 2050.0 {
            let t = year - 2000.0;
            62.92 + 0.32217 * t + 0.005589 * t * t
        } else {
            let u = (year - 1820.0) / 100.0;
            -20.0 + 32.0 * u * u
        }
    }

    /// The UT1 (Universal Time) Julian date
    pub fn ut1(&self) -> f64 {
        self.tt() - self.delta_t() / DAY_S
    }

    /// UT1 as (whole day, day fraction); used by the sidereal angle, which
    /// needs the day fraction at full precision
    pub(crate) fn ut1_parts(&self) -> (f64, f64) {
        (self.whole, self.tt_fraction - self.delta_t() / DAY_S)
    }

    /// Julian centuries of TT since J2000.0
    pub fn centuries_since_j2000(&self) -> f64 {
        ((self.whole - J2000) + self.tt_fraction) / JULIAN_CENTURY_D
    }

    /// Lossy conversion to unix epoch seconds (UTC scale)
    pub fn to_epoch_seconds(&self) -> f64 {
        let utc_jd = self.tt() - TT_MINUS_TAI - self.tai_minus_utc / DAY_S;
        (utc_jd - UNIX_EPOCH_JD) * DAY_S
    }

    /// Seconds elapsed since another instant (negative if `other` is later)
    pub fn seconds_since(&self, other: &Time) -> f64 {
        ((self.whole - other.whole) + (self.tt_fraction - other.tt_fraction)) * DAY_S
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Time tt={:.9}>", self.tt())
    }
}

impl Add<f64> for Time {
    type Output = Time;

    /// Advance the instant by a number of days
    fn add(self, days: f64) -> Self::Output {
        let whole_days = days.floor();
        Time {
            whole: self.whole + whole_days,
            tt_fraction: self.tt_fraction + (days - whole_days),
            tai_minus_utc: self.tai_minus_utc,
        }
    }
}

impl Sub<Time> for Time {
    type Output = f64;

    /// Difference in days
    fn sub(self, other: Time) -> Self::Output {
        (self.whole - other.whole) + (self.tt_fraction - other.tt_fraction)
    }
}

impl PartialEq for Time {
    fn eq(&self, other: &Self) -> bool {
        self.whole == other.whole && self.tt_fraction == other.tt_fraction
    }
}

impl PartialOrd for Time {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.tt().partial_cmp(&other.tt())
    }
}
