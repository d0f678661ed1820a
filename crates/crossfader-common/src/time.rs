//! Exact rational media time.
//!
//! [`MediaTime`] stores `value / timescale` seconds in reduced form, so two
//! times that denote the same instant compare (and hash) equal no matter which
//! timescale produced them. Intermediate arithmetic runs in `i128`.
//!
//! A sum or difference whose reduced fraction does not fit in `i64` has no
//! exact representation. [`MediaTime::checked_add`] and
//! [`MediaTime::checked_sub`] report that as an error; the `+` and `-`
//! operators instead round it to the nearest nanosecond.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};

use crate::error::{Error, Result};

/// Timescale used when converting user-facing seconds into media time.
pub const DEFAULT_TIMESCALE: i64 = 600;

/// Timescale of the rounded result when an operator overflows.
const FALLBACK_TIMESCALE: i64 = 1_000_000_000;

/// A point in time or a duration, in seconds, as an exact fraction.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawMediaTime", into = "RawMediaTime")]
pub struct MediaTime {
    value: i64,
    /// Always positive; the fraction is kept reduced.
    timescale: i64,
}

#[derive(Serialize, Deserialize)]
struct RawMediaTime {
    value: i64,
    timescale: i64,
}

impl MediaTime {
    /// Time zero.
    pub const ZERO: Self = Self {
        value: 0,
        timescale: 1,
    };

    /// Create a time of `value / timescale` seconds.
    pub fn new(value: i64, timescale: i64) -> Result<Self> {
        if timescale <= 0 {
            return Err(Error::invalid_time(format!(
                "timescale must be positive, got {timescale}"
            )));
        }
        Ok(Self::from_i128(value as i128, timescale as i128))
    }

    /// Create a time from whole seconds.
    pub const fn from_secs(secs: i64) -> Self {
        Self {
            value: secs,
            timescale: 1,
        }
    }

    /// Duration of one frame at `fps` frames per second.
    pub const fn from_frame_rate(fps: u32) -> Option<Self> {
        if fps == 0 {
            return None;
        }
        Some(Self {
            value: 1,
            timescale: fps as i64,
        })
    }

    /// Create a time from floating seconds, rounded onto `timescale`.
    pub fn from_secs_f64(secs: f64, timescale: i64) -> Result<Self> {
        if !secs.is_finite() {
            return Err(Error::invalid_time(format!("{secs} is not a finite number of seconds")));
        }
        if timescale <= 0 {
            return Err(Error::invalid_time(format!(
                "timescale must be positive, got {timescale}"
            )));
        }
        let ticks = (secs * timescale as f64).round();
        if ticks.abs() >= i64::MAX as f64 {
            return Err(Error::invalid_time(format!(
                "{secs}s does not fit timescale {timescale}"
            )));
        }
        Self::new(ticks as i64, timescale)
    }

    /// Numerator of the reduced fraction.
    pub fn value(&self) -> i64 {
        self.value
    }

    /// Denominator of the reduced fraction.
    pub fn timescale(&self) -> i64 {
        self.timescale
    }

    /// Approximate value in seconds.
    pub fn as_secs_f64(&self) -> f64 {
        self.value as f64 / self.timescale as f64
    }

    pub fn is_zero(&self) -> bool {
        self.value == 0
    }

    pub fn is_negative(&self) -> bool {
        self.value < 0
    }

    pub fn is_positive(&self) -> bool {
        self.value > 0
    }

    /// Exactly half of this time.
    pub fn half(self) -> Self {
        Self::from_i128(self.value as i128, self.timescale as i128 * 2)
    }

    /// Exact `self + rhs`, or an error when the result is not representable.
    pub fn checked_add(self, rhs: Self) -> Result<Self> {
        let (num, den) = self.sum_parts(rhs, false);
        Self::reduce(num, den).ok_or_else(|| {
            Error::invalid_time(format!("{self:?} + {rhs:?} does not fit a 64-bit fraction"))
        })
    }

    /// Exact `self - rhs`, or an error when the result is not representable.
    pub fn checked_sub(self, rhs: Self) -> Result<Self> {
        let (num, den) = self.sum_parts(rhs, true);
        Self::reduce(num, den).ok_or_else(|| {
            Error::invalid_time(format!("{self:?} - {rhs:?} does not fit a 64-bit fraction"))
        })
    }

    fn sum_parts(self, rhs: Self, negate: bool) -> (i128, i128) {
        let lhs = self.value as i128 * rhs.timescale as i128;
        let rhs_num = rhs.value as i128 * self.timescale as i128;
        let num = if negate { lhs - rhs_num } else { lhs + rhs_num };
        (num, self.timescale as i128 * rhs.timescale as i128)
    }

    /// Reduce `num / den` (den > 0), or `None` if it does not fit `i64`.
    fn reduce(num: i128, den: i128) -> Option<Self> {
        if num == 0 {
            return Some(Self::ZERO);
        }
        let g = gcd(num.unsigned_abs(), den.unsigned_abs()) as i128;
        let value = i64::try_from(num / g).ok()?;
        let timescale = i64::try_from(den / g).ok()?;
        Some(Self { value, timescale })
    }

    /// Reduce `num / den`, rounding to nanoseconds when it does not fit.
    fn from_i128(num: i128, den: i128) -> Self {
        Self::reduce(num, den).unwrap_or_else(|| {
            let ticks = (num as f64 / den as f64 * FALLBACK_TIMESCALE as f64).round();
            // `as` saturates at the i64 bounds
            let value = ticks as i64;
            Self::reduce(value as i128, FALLBACK_TIMESCALE as i128).unwrap_or(Self {
                value,
                timescale: FALLBACK_TIMESCALE,
            })
        })
    }
}

fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        let t = b;
        b = a % b;
        a = t;
    }
    a
}

impl Default for MediaTime {
    fn default() -> Self {
        Self::ZERO
    }
}

impl TryFrom<RawMediaTime> for MediaTime {
    type Error = Error;

    fn try_from(raw: RawMediaTime) -> Result<Self> {
        Self::new(raw.value, raw.timescale)
    }
}

impl From<MediaTime> for RawMediaTime {
    fn from(t: MediaTime) -> Self {
        Self {
            value: t.value,
            timescale: t.timescale,
        }
    }
}

impl PartialOrd for MediaTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MediaTime {
    fn cmp(&self, other: &Self) -> Ordering {
        let lhs = self.value as i128 * other.timescale as i128;
        let rhs = other.value as i128 * self.timescale as i128;
        lhs.cmp(&rhs)
    }
}

impl Add for MediaTime {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        let (num, den) = self.sum_parts(rhs, false);
        Self::from_i128(num, den)
    }
}

impl Sub for MediaTime {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        let (num, den) = self.sum_parts(rhs, true);
        Self::from_i128(num, den)
    }
}

impl AddAssign for MediaTime {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for MediaTime {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl fmt::Debug for MediaTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MediaTime({}/{})", self.value, self.timescale)
    }
}

impl fmt::Display for MediaTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.timescale == 1 {
            write!(f, "{}s", self.value)
        } else {
            write!(f, "{:.3}s", self.as_secs_f64())
        }
    }
}

/// A half-open interval `[start, start + duration)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: MediaTime,
    pub duration: MediaTime,
}

impl TimeRange {
    pub fn new(start: MediaTime, duration: MediaTime) -> Self {
        Self { start, duration }
    }

    /// Range covering `[start, end)`.
    pub fn from_start_end(start: MediaTime, end: MediaTime) -> Self {
        Self {
            start,
            duration: end - start,
        }
    }

    /// Range covering `[start, end)`, failing if the length is not representable.
    pub fn try_from_start_end(start: MediaTime, end: MediaTime) -> Result<Self> {
        Ok(Self {
            start,
            duration: end.checked_sub(start)?,
        })
    }

    /// Exclusive end of the range.
    pub fn end(&self) -> MediaTime {
        self.start + self.duration
    }

    /// Exclusive end, failing if it is not representable.
    pub fn checked_end(&self) -> Result<MediaTime> {
        self.start.checked_add(self.duration)
    }

    /// True when the range covers no time at all.
    pub fn is_empty(&self) -> bool {
        self.duration <= MediaTime::ZERO
    }

    /// True when `t` lies in `[start, end)`.
    pub fn contains(&self, t: MediaTime) -> bool {
        t >= self.start && t < self.end()
    }

    /// True when both ranges share a non-empty interval.
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.start < other.end()
            && other.start < self.end()
    }

    /// The shared interval, if any.
    pub fn intersection(&self, other: &TimeRange) -> Option<TimeRange> {
        if !self.overlaps(other) {
            return None;
        }
        let start = self.start.max(other.start);
        let end = self.end().min(other.end());
        Some(TimeRange::from_start_end(start, end))
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end())
    }
}
