use crate::duration::Duration;
use crate::gregorian::divmod;
use crate::options::{
    round_to_increment, DifferenceOptions, RoundingOptions, Unit, NANOS_PER_DAY,
};
use crate::Error;

/// An exact moment on the UTC timeline, with no zone or calendar attached.
///
/// Stored as a signed 64-bit count of nanoseconds since
/// 1970-01-01T00:00:00Z, which covers roughly ±292 years around the epoch.
/// UTC is treated as smooth; leap seconds do not exist here.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Instant {
    nanoseconds: i64,
}

impl Instant {
    /// The unix epoch, 1970-01-01T00:00:00Z.
    pub const UNIX_EPOCH: Self = Self { nanoseconds: 0 };

    /// The earliest representable instant.
    pub const MIN: Self = Self { nanoseconds: i64::MIN };

    /// The latest representable instant.
    pub const MAX: Self = Self { nanoseconds: i64::MAX };

    /// Creates an [`Instant`] from nanoseconds since the epoch.
    #[inline]
    pub const fn from_epoch_nanoseconds(nanoseconds: i64) -> Self {
        Self { nanoseconds }
    }

    /// Creates an [`Instant`] from microseconds since the epoch.
    pub const fn from_epoch_microseconds(microseconds: i64) -> Result<Self, Error> {
        match microseconds.checked_mul(1_000) {
            Some(nanoseconds) => Ok(Self { nanoseconds }),
            None => Err(Error::OutOfRange),
        }
    }

    /// Creates an [`Instant`] from milliseconds since the epoch.
    pub const fn from_epoch_milliseconds(milliseconds: i64) -> Result<Self, Error> {
        match milliseconds.checked_mul(1_000_000) {
            Some(nanoseconds) => Ok(Self { nanoseconds }),
            None => Err(Error::OutOfRange),
        }
    }

    /// Creates an [`Instant`] from seconds since the epoch.
    pub const fn from_epoch_seconds(seconds: i64) -> Result<Self, Error> {
        match seconds.checked_mul(1_000_000_000) {
            Some(nanoseconds) => Ok(Self { nanoseconds }),
            None => Err(Error::OutOfRange),
        }
    }

    /// Returns the number of nanoseconds since the epoch.
    #[inline]
    pub const fn epoch_nanoseconds(&self) -> i64 {
        self.nanoseconds
    }

    /// Returns the number of whole microseconds since the epoch, rounding
    /// towards negative infinity.
    #[inline]
    pub const fn epoch_microseconds(&self) -> i64 {
        self.nanoseconds.div_euclid(1_000)
    }

    /// Returns the number of whole milliseconds since the epoch, rounding
    /// towards negative infinity.
    #[inline]
    pub const fn epoch_milliseconds(&self) -> i64 {
        self.nanoseconds.div_euclid(1_000_000)
    }

    /// Returns the number of whole seconds since the epoch, rounding
    /// towards negative infinity.
    #[inline]
    pub const fn epoch_seconds(&self) -> i64 {
        self.nanoseconds.div_euclid(1_000_000_000)
    }

    /// Adds a duration to this instant.
    ///
    /// Only time units participate: an instant has no zone, so the length
    /// of a day, week, month, or year at this moment is undefined and such
    /// durations fail with [`Error::InvalidDuration`].
    ///
    /// # Examples
    ///
    /// ```
    /// use tempora::{Duration, Instant};
    /// let epoch = Instant::UNIX_EPOCH;
    /// assert_eq!(epoch.add(&Duration::from_hours(1))?.epoch_seconds(), 3600);
    /// assert!(epoch.add(&Duration::from_days(1)).is_err());
    /// # Ok::<_, tempora::Error>(())
    /// ```
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub fn add(&self, duration: &Duration) -> Result<Self, Error> {
        if duration.date_part().sign() != 0 {
            return Err(Error::InvalidDuration);
        }
        let total = self.nanoseconds as i128 + duration.time_nanoseconds();
        match i64::try_from(total) {
            Ok(nanoseconds) => Ok(Self { nanoseconds }),
            Err(_) => Err(Error::Arithmetic),
        }
    }

    /// Subtracts a duration from this instant.
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub fn subtract(&self, duration: &Duration) -> Result<Self, Error> {
        self.add(&duration.negated())
    }

    /// Returns the duration from this instant until `other`.
    ///
    /// The result carries no calendar components; the default largest unit
    /// is [`Unit::Second`].
    pub fn until(&self, other: &Self, options: impl Into<DifferenceOptions>) -> Result<Duration, Error> {
        let options = options.into();
        let (largest, smallest) = options.resolve(Unit::Second)?;
        if largest > Unit::Hour || smallest > Unit::Hour {
            return Err(Error::InvalidOption("unit"));
        }
        let mut nanos = other.nanoseconds as i128 - self.nanoseconds as i128;
        if smallest > Unit::Nanosecond || options.increment > 1 {
            // Unwrap is fine: smallest is Hour or below here.
            let step = smallest.nanoseconds().unwrap() as i128 * options.increment as i128;
            nanos = round_to_increment(nanos, step, options.mode);
        }
        Duration::from_total_nanoseconds(nanos, largest)
    }

    /// Returns the duration from `other` until this instant.
    pub fn since(&self, other: &Self, options: impl Into<DifferenceOptions>) -> Result<Duration, Error> {
        other.until(self, options)
    }

    /// Rounds this instant to the given unit.
    ///
    /// The increment, scaled by the unit, must divide a 24-hour day evenly.
    ///
    /// ```rust
    /// use tempora::{Instant, Unit};
    /// let i: Instant = "2025-03-14T09:32:47Z".parse()?;
    /// assert_eq!(i.round(Unit::Minute)?.to_string(), "2025-03-14T09:33:00Z");
    /// # Ok::<_, tempora::Error>(())
    /// ```
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub fn round(&self, options: impl Into<RoundingOptions>) -> Result<Self, Error> {
        let options = options.into();
        let step = match options.smallest_unit.nanoseconds() {
            Some(length) if options.smallest_unit <= Unit::Hour => length as i128 * options.increment as i128,
            _ => return Err(Error::InvalidOption("smallestUnit")),
        };
        if options.increment == 0 || NANOS_PER_DAY as i128 % step != 0 {
            return Err(Error::InvalidOption("roundingIncrement"));
        }
        let rounded = round_to_increment(self.nanoseconds as i128, step, options.mode);
        match i64::try_from(rounded) {
            Ok(nanoseconds) => Ok(Self { nanoseconds }),
            Err(_) => Err(Error::Arithmetic),
        }
    }

    /// Splits into epoch seconds and a non-negative nanosecond remainder.
    pub(crate) const fn to_seconds_and_subsec(self) -> (i64, u32) {
        let (seconds, subsec) = divmod!(self.nanoseconds, 1_000_000_000);
        (seconds, subsec as u32)
    }
}

impl core::fmt::Display for Instant {
    /// Formats the instant as a UTC datetime with a `Z` suffix, e.g.
    /// `2025-03-14T09:33:00Z`.
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let (seconds, subsec) = self.to_seconds_and_subsec();
        let (days, second_of_day) = divmod!(seconds, 86_400);
        let (year, month, day) = crate::gregorian::date_from_epoch_days(days);
        crate::fmt::write_year(f, year)?;
        write!(
            f,
            "-{:02}-{:02}T{:02}:{:02}:{:02}",
            month,
            day,
            second_of_day / 3600,
            second_of_day / 60 % 60,
            second_of_day % 60
        )?;
        crate::fmt::write_subseconds(
            f,
            (subsec / 1_000_000) as u16,
            (subsec / 1_000 % 1_000) as u16,
            (subsec % 1_000) as u16,
        )?;
        f.write_str("Z")
    }
}
