use crate::duration::Duration;
use crate::gregorian::{divmod, ensure_in_range};
use crate::options::{
    round_to_increment, DifferenceOptions, RoundingOptions, Unit, NANOS_PER_DAY, NANOS_PER_HOUR, NANOS_PER_MIN,
    NANOS_PER_SEC,
};
use crate::Error;

/// A wall-clock time with nanosecond precision.
///
/// This type is not aware of any particular calendar, date, or time zone.
/// The sub-second fields are stored as three separate components rather
/// than one cumulative nanosecond value, so `.001002003` decomposes into
/// one millisecond, two microseconds, and three nanoseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PlainTime {
    pub(crate) hour: u8,
    pub(crate) minute: u8,
    pub(crate) second: u8,
    pub(crate) millisecond: u16,
    pub(crate) microsecond: u16,
    pub(crate) nanosecond: u16,
}

impl PlainTime {
    /// The minimum valid time.
    pub const MIN: Self = Self {
        hour: 0,
        minute: 0,
        second: 0,
        millisecond: 0,
        microsecond: 0,
        nanosecond: 0,
    };

    /// The time at midnight.
    pub const MIDNIGHT: Self = Self::MIN;

    /// The maximum valid time.
    pub const MAX: Self = Self {
        hour: 23,
        minute: 59,
        second: 59,
        millisecond: 999,
        microsecond: 999,
        nanosecond: 999,
    };

    #[doc(hidden)]
    #[inline]
    pub const fn __new_unchecked_from_macro(hour: u8, minute: u8, second: u8) -> Self {
        Self {
            hour,
            minute,
            second,
            millisecond: 0,
            microsecond: 0,
            nanosecond: 0,
        }
    }

    /// Creates a new [`PlainTime`] from all six components.
    ///
    /// The `hour` must be within `0..24`, `minute` and `second` within
    /// `0..60`, and each sub-second component within `0..1000`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use tempora::PlainTime;
    /// let time = PlainTime::new(23, 10, 0, 0, 0, 0)?;
    /// assert_eq!(time.hour(), 23);
    /// assert!(PlainTime::new(24, 0, 0, 0, 0, 0).is_err());
    /// assert!(PlainTime::new(23, 59, 60, 0, 0, 0).is_err());
    /// # Ok::<_, tempora::Error>(())
    /// ```
    #[inline]
    pub const fn new(
        hour: u8,
        minute: u8,
        second: u8,
        millisecond: u16,
        microsecond: u16,
        nanosecond: u16,
    ) -> Result<Self, Error> {
        ensure_in_range!(hour, 23);
        ensure_in_range!(minute, 59);
        ensure_in_range!(second, 59);
        ensure_in_range!(millisecond, 999);
        ensure_in_range!(microsecond, 999);
        ensure_in_range!(nanosecond, 999);
        Ok(Self {
            hour,
            minute,
            second,
            millisecond,
            microsecond,
            nanosecond,
        })
    }

    /// Creates a new [`PlainTime`] from an hour, minute, and second.
    #[inline]
    pub const fn from_hms(hour: u8, minute: u8, second: u8) -> Result<Self, Error> {
        Self::new(hour, minute, second, 0, 0, 0)
    }

    /// Returns the hour. This value will always be within `0..24`.
    #[inline]
    #[must_use]
    pub const fn hour(&self) -> u8 {
        self.hour
    }

    /// Returns the minute within the hour. This value will always be within `0..60`.
    #[inline]
    #[must_use]
    pub const fn minute(&self) -> u8 {
        self.minute
    }

    /// Returns the second within the minute. This value will always be within `0..60`.
    #[inline]
    #[must_use]
    pub const fn second(&self) -> u8 {
        self.second
    }

    /// Returns the millisecond within the second. This value will always be within `0..1000`.
    #[inline]
    #[must_use]
    pub const fn millisecond(&self) -> u16 {
        self.millisecond
    }

    /// Returns the microsecond within the millisecond. This value will always be within `0..1000`.
    #[inline]
    #[must_use]
    pub const fn microsecond(&self) -> u16 {
        self.microsecond
    }

    /// Returns the nanosecond within the microsecond. This value will always be within `0..1000`.
    #[inline]
    #[must_use]
    pub const fn nanosecond(&self) -> u16 {
        self.nanosecond
    }

    /// Returns a new [`PlainTime`] that points to the given hour.
    /// If the hour is out of bounds (`0..24`) then [`Error`] is returned.
    #[inline]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub fn with_hour(mut self, hour: u8) -> Result<Self, Error> {
        ensure_in_range!(hour, 23);
        self.hour = hour;
        Ok(self)
    }

    /// Returns a new [`PlainTime`] that points to the given minute.
    /// If the minute is out of bounds (`0..60`) then [`Error`] is returned.
    #[inline]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub fn with_minute(mut self, minute: u8) -> Result<Self, Error> {
        ensure_in_range!(minute, 59);
        self.minute = minute;
        Ok(self)
    }

    /// Returns a new [`PlainTime`] that points to the given second.
    /// If the second is out of bounds (`0..60`) then [`Error`] is returned.
    #[inline]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub fn with_second(mut self, second: u8) -> Result<Self, Error> {
        ensure_in_range!(second, 59);
        self.second = second;
        Ok(self)
    }

    /// Returns a new [`PlainTime`] that points to the given millisecond.
    /// If the millisecond is out of bounds (`0..1000`) then [`Error`] is returned.
    #[inline]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub fn with_millisecond(mut self, millisecond: u16) -> Result<Self, Error> {
        ensure_in_range!(millisecond, 999);
        self.millisecond = millisecond;
        Ok(self)
    }

    /// Returns a new [`PlainTime`] that points to the given microsecond.
    /// If the microsecond is out of bounds (`0..1000`) then [`Error`] is returned.
    #[inline]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub fn with_microsecond(mut self, microsecond: u16) -> Result<Self, Error> {
        ensure_in_range!(microsecond, 999);
        self.microsecond = microsecond;
        Ok(self)
    }

    /// Returns a new [`PlainTime`] that points to the given nanosecond.
    /// If the nanosecond is out of bounds (`0..1000`) then [`Error`] is returned.
    #[inline]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub fn with_nanosecond(mut self, nanosecond: u16) -> Result<Self, Error> {
        ensure_in_range!(nanosecond, 999);
        self.nanosecond = nanosecond;
        Ok(self)
    }

    /// Total number of nanoseconds elapsed since midnight.
    #[inline]
    pub(crate) const fn nanosecond_of_day(&self) -> i64 {
        self.hour as i64 * NANOS_PER_HOUR
            + self.minute as i64 * NANOS_PER_MIN
            + self.second as i64 * NANOS_PER_SEC
            + self.millisecond as i64 * 1_000_000
            + self.microsecond as i64 * 1_000
            + self.nanosecond as i64
    }

    /// Builds a time from a nanosecond-of-day value in `0..86_400_000_000_000_000`.
    pub(crate) const fn from_nanosecond_of_day(nanos: i64) -> Self {
        debug_assert!(nanos >= 0 && nanos < NANOS_PER_DAY);
        let (hour, nanos) = divmod!(nanos, NANOS_PER_HOUR);
        let (minute, nanos) = divmod!(nanos, NANOS_PER_MIN);
        let (second, nanos) = divmod!(nanos, NANOS_PER_SEC);
        Self {
            hour: hour as u8,
            minute: minute as u8,
            second: second as u8,
            millisecond: (nanos / 1_000_000) as u16,
            microsecond: (nanos / 1_000 % 1_000) as u16,
            nanosecond: (nanos % 1_000) as u16,
        }
    }

    /// Adds a nanosecond delta and returns the number of whole days carried
    /// alongside the wrapped time.
    pub(crate) fn add_nanoseconds(self, delta: i128) -> (i64, Self) {
        let total = self.nanosecond_of_day() as i128 + delta;
        let (days, nanos) = divmod!(total, NANOS_PER_DAY as i128);
        (days as i64, Self::from_nanosecond_of_day(nanos as i64))
    }

    /// Adds a duration to this time, wrapping around midnight.
    ///
    /// Only the time components of the duration participate; a duration
    /// carrying years, months, weeks, or days fails with
    /// [`Error::InvalidDuration`].
    ///
    /// ```rust
    /// use tempora::{PlainTime, Duration};
    /// let time = PlainTime::from_hms(23, 30, 0)?;
    /// assert_eq!(time.add(&Duration::from_hours(2))?, PlainTime::from_hms(1, 30, 0)?);
    /// # Ok::<_, tempora::Error>(())
    /// ```
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub fn add(&self, duration: &Duration) -> Result<Self, Error> {
        if duration.date_part().sign() != 0 {
            return Err(Error::InvalidDuration);
        }
        Ok(self.add_nanoseconds(duration.time_nanoseconds()).1)
    }

    /// Subtracts a duration from this time, wrapping around midnight.
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub fn subtract(&self, duration: &Duration) -> Result<Self, Error> {
        self.add(&duration.negated())
    }

    /// Returns the duration from this time until `other`.
    ///
    /// The default largest unit is [`Unit::Hour`]; only time units are
    /// accepted.
    pub fn until(&self, other: &Self, options: impl Into<DifferenceOptions>) -> Result<Duration, Error> {
        let options = options.into();
        let (largest, smallest) = options.resolve(Unit::Hour)?;
        if largest.is_date_unit() || smallest.is_date_unit() {
            return Err(Error::InvalidOption("unit"));
        }
        let mut nanos = (other.nanosecond_of_day() - self.nanosecond_of_day()) as i128;
        if smallest > Unit::Nanosecond || options.increment > 1 {
            // Unwrap is fine: smallest is a time unit here.
            let step = smallest.nanoseconds().unwrap() as i128 * options.increment as i128;
            nanos = round_to_increment(nanos, step, options.mode);
        }
        Duration::from_total_nanoseconds(nanos, largest)
    }

    /// Returns the duration from `other` until this time.
    pub fn since(&self, other: &Self, options: impl Into<DifferenceOptions>) -> Result<Duration, Error> {
        other.until(self, options)
    }

    /// Rounds this time to the given unit, wrapping around midnight.
    ///
    /// ```rust
    /// use tempora::{PlainTime, Unit};
    /// let time = PlainTime::new(11, 29, 37, 500, 0, 0)?;
    /// assert_eq!(time.round(Unit::Minute)?, PlainTime::from_hms(11, 30, 0)?);
    /// # Ok::<_, tempora::Error>(())
    /// ```
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub fn round(&self, options: impl Into<RoundingOptions>) -> Result<Self, Error> {
        let options = options.into();
        if options.smallest_unit.is_date_unit() {
            return Err(Error::InvalidOption("smallestUnit"));
        }
        options.validate_increment()?;
        let step = options.smallest_unit.nanoseconds().unwrap() as i128 * options.increment as i128;
        let rounded = round_to_increment(self.nanosecond_of_day() as i128, step, options.mode);
        let wrapped = rounded.rem_euclid(NANOS_PER_DAY as i128);
        Ok(Self::from_nanosecond_of_day(wrapped as i64))
    }
}

impl core::fmt::Display for PlainTime {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hour, self.minute, self.second)?;
        crate::fmt::write_subseconds(f, self.millisecond, self.microsecond, self.nanosecond)
    }
}
