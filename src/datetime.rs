use core::cmp::Ordering;

use crate::calendar::DateFields;
use crate::duration::Duration;
use crate::gregorian::divmod;
use crate::options::{
    round_to_increment, DifferenceOptions, Overflow, RoundingOptions, Unit, NANOS_PER_DAY,
};
use crate::{Calendar, Error, PlainDate, PlainTime, Weekday};

/// An ISO 8601 combined date and time without a time zone.
///
/// For convenience, the accessors of [`PlainTime`] and [`PlainDate`] are
/// flattened into inherent methods of this struct, so methods such as
/// [`second`] or [`month`] work as expected.
///
/// A datetime carries a [`Calendar`] tag, which only affects era-sensitive
/// projections and the `[u-ca=..]` annotation in its string form; ordering
/// and arithmetic always run on the ISO fields.
///
/// [`second`]: PlainDateTime::second
/// [`month`]: PlainDateTime::month
#[derive(Debug, Clone, Copy)]
pub struct PlainDateTime {
    pub(crate) date: PlainDate,
    pub(crate) time: PlainTime,
    pub(crate) calendar: Calendar,
}

impl PlainDateTime {
    /// A [`PlainDateTime`] at the unix epoch (January 1st, 1970 00:00:00).
    pub const UNIX_EPOCH: Self = Self {
        date: PlainDate::UNIX_EPOCH,
        time: PlainTime::MIDNIGHT,
        calendar: Calendar::Iso8601,
    };

    #[doc(hidden)]
    #[inline]
    pub const fn __new_unchecked_from_macro(date: PlainDate, time: PlainTime) -> Self {
        Self {
            date,
            time,
            calendar: Calendar::Iso8601,
        }
    }

    /// Creates a new [`PlainDateTime`] from each component.
    ///
    /// # Examples
    ///
    /// ```
    /// # use tempora::PlainDateTime;
    /// let dt = PlainDateTime::new(2003, 4, 19, 20, 30, 0)?;
    /// assert_eq!(dt.year(), 2003);
    /// assert_eq!(dt.hour(), 20);
    /// # Ok::<_, tempora::Error>(())
    /// ```
    pub fn new(year: i32, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Result<Self, Error> {
        Ok(Self {
            date: PlainDate::new(year, month, day)?,
            time: PlainTime::from_hms(hour, minute, second)?,
            calendar: Calendar::Iso8601,
        })
    }

    /// Combines a [`PlainDate`] and a [`PlainTime`] in the ISO calendar.
    #[inline]
    pub const fn from_parts(date: PlainDate, time: PlainTime) -> Self {
        Self {
            date,
            time,
            calendar: Calendar::Iso8601,
        }
    }

    /// Returns the date component.
    #[inline]
    pub const fn date(&self) -> PlainDate {
        self.date
    }

    /// Returns the time component.
    #[inline]
    pub const fn time(&self) -> PlainTime {
        self.time
    }

    /// Returns the calendar tag.
    #[inline]
    pub const fn calendar(&self) -> Calendar {
        self.calendar
    }

    /// Returns a copy of this datetime with a different calendar tag.
    ///
    /// The underlying ISO fields are unchanged.
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn with_calendar(mut self, calendar: Calendar) -> Self {
        self.calendar = calendar;
        self
    }

    /// Returns the year.
    #[inline]
    pub const fn year(&self) -> i32 {
        self.date.year()
    }

    /// Returns the month. This value will always be within `1..=12`.
    #[inline]
    pub const fn month(&self) -> u8 {
        self.date.month()
    }

    /// Returns the day. This value will always be within `1..=31`.
    #[inline]
    pub const fn day(&self) -> u8 {
        self.date.day()
    }

    /// Returns the hour. This value will always be within `0..24`.
    #[inline]
    pub const fn hour(&self) -> u8 {
        self.time.hour()
    }

    /// Returns the minute. This value will always be within `0..60`.
    #[inline]
    pub const fn minute(&self) -> u8 {
        self.time.minute()
    }

    /// Returns the second. This value will always be within `0..60`.
    #[inline]
    pub const fn second(&self) -> u8 {
        self.time.second()
    }

    /// Returns the millisecond. This value will always be within `0..1000`.
    #[inline]
    pub const fn millisecond(&self) -> u16 {
        self.time.millisecond()
    }

    /// Returns the microsecond. This value will always be within `0..1000`.
    #[inline]
    pub const fn microsecond(&self) -> u16 {
        self.time.microsecond()
    }

    /// Returns the nanosecond. This value will always be within `0..1000`.
    #[inline]
    pub const fn nanosecond(&self) -> u16 {
        self.time.nanosecond()
    }

    /// Returns the weekday.
    #[inline]
    pub const fn day_of_week(&self) -> Weekday {
        self.date.day_of_week()
    }

    /// Returns the day of the year.
    #[inline]
    pub const fn day_of_year(&self) -> u16 {
        self.date.day_of_year()
    }

    /// Returns the ISO week of the year.
    #[inline]
    pub const fn week_of_year(&self) -> u8 {
        self.date.week_of_year()
    }

    /// Returns the year the ISO week belongs to.
    #[inline]
    pub const fn year_of_week(&self) -> i32 {
        self.date.year_of_week()
    }

    /// Returns the era under this datetime's calendar.
    #[inline]
    pub fn era(&self) -> Option<&'static str> {
        self.calendar.era(&self.date)
    }

    /// Returns the year within the era under this datetime's calendar.
    #[inline]
    pub fn era_year(&self) -> Option<i32> {
        self.calendar.era_year(&self.date)
    }

    /// Returns a copy pointing at the given date, keeping the time and calendar.
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn with_date(mut self, date: PlainDate) -> Self {
        self.date = date;
        self
    }

    /// Returns a copy pointing at the given time, keeping the date and calendar.
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn with_time(mut self, time: PlainTime) -> Self {
        self.time = time;
        self
    }

    /// Returns a copy with the given date fields replaced, resolved under
    /// this datetime's calendar.
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub fn with(&self, fields: &DateFields, overflow: Overflow) -> Result<Self, Error> {
        let base = self.calendar.date_fields(&self.date);
        let merged = self.calendar.merge_fields(&base, fields)?;
        let date = self.calendar.date_from_fields(&merged, overflow)?;
        Ok(Self { date, ..*self })
    }

    /// Nanoseconds since the epoch as if this local datetime were UTC.
    pub(crate) fn epoch_nanoseconds_naive(&self) -> i128 {
        self.date.epoch_days() as i128 * NANOS_PER_DAY as i128 + self.time.nanosecond_of_day() as i128
    }

    /// Rebuilds a datetime from a naive nanosecond count.
    pub(crate) fn from_epoch_nanoseconds_naive(nanos: i128, calendar: Calendar) -> Result<Self, Error> {
        let (days, time_nanos) = divmod!(nanos, NANOS_PER_DAY as i128);
        let days = i64::try_from(days).map_err(|_| Error::OutOfRange)?;
        Ok(Self {
            date: PlainDate::from_epoch_days(days)?,
            time: PlainTime::from_nanosecond_of_day(time_nanos as i64),
            calendar,
        })
    }

    /// Adds a duration to this datetime.
    ///
    /// The date components are applied first under the `overflow` policy,
    /// then the time components with whole days carried into the date.
    ///
    /// # Examples
    ///
    /// ```
    /// use tempora::{Duration, Overflow, PlainDateTime};
    /// let dt = PlainDateTime::new(2020, 1, 31, 23, 0, 0)?;
    /// let later = dt.add(&Duration::from_hours(2), Overflow::Constrain)?;
    /// assert_eq!((later.day(), later.hour()), (1, 1));
    /// assert_eq!(later.month(), 2);
    /// # Ok::<_, tempora::Error>(())
    /// ```
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub fn add(&self, duration: &Duration, overflow: Overflow) -> Result<Self, Error> {
        let date = self.date.add(&duration.date_part(), overflow)?;
        let (carry, time) = self.time.add_nanoseconds(duration.time_nanoseconds());
        let date = date.add_days(carry)?;
        Ok(Self { date, time, ..*self })
    }

    /// Subtracts a duration from this datetime. This is equivalent to adding
    /// the negated duration.
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub fn subtract(&self, duration: &Duration, overflow: Overflow) -> Result<Self, Error> {
        self.add(&duration.negated(), overflow)
    }

    /// Returns the duration from this datetime until `other`.
    ///
    /// The default largest unit is [`Unit::Day`].
    pub fn until(&self, other: &Self, options: impl Into<DifferenceOptions>) -> Result<Duration, Error> {
        let options = options.into();
        let (largest, smallest) = options.resolve(Unit::Day)?;
        let exact = self.until_in(other, largest)?;
        if smallest == Unit::Nanosecond && options.increment == 1 {
            return Ok(exact);
        }
        exact.round_relative(
            crate::duration::DurationRoundOptions {
                largest_unit: Some(largest),
                smallest_unit: Some(smallest),
                increment: options.increment,
                mode: options.mode,
            },
            &crate::RelativeTo::from(*self),
        )
    }

    /// Returns the duration from `other` until this datetime.
    pub fn since(&self, other: &Self, options: impl Into<DifferenceOptions>) -> Result<Duration, Error> {
        other.until(self, options)
    }

    /// The exact difference decomposed into units up to `largest`.
    pub(crate) fn until_in(&self, other: &Self, largest: Unit) -> Result<Duration, Error> {
        if largest <= Unit::Hour {
            let nanos = other.epoch_nanoseconds_naive() - self.epoch_nanoseconds_naive();
            return Duration::from_total_nanoseconds(nanos, largest);
        }
        // Borrow a day when the time-of-day difference opposes the date
        // difference, so every component shares the overall sign.
        let mut time_nanos = other.time.nanosecond_of_day() - self.time.nanosecond_of_day();
        let mut end_date = other.date;
        match self.date.cmp(&other.date) {
            Ordering::Less if time_nanos < 0 => {
                end_date = other.date.add_days(-1)?;
                time_nanos += NANOS_PER_DAY;
            }
            Ordering::Greater if time_nanos > 0 => {
                end_date = other.date.add_days(1)?;
                time_nanos -= NANOS_PER_DAY;
            }
            _ => {}
        }
        let date_part = self.date.until_in(&end_date, largest)?;
        let time_part = Duration::from_total_nanoseconds(time_nanos as i128, Unit::Hour)?;
        Duration::new(
            date_part.years(),
            date_part.months(),
            date_part.weeks(),
            date_part.days(),
            time_part.hours(),
            time_part.minutes(),
            time_part.seconds(),
            time_part.milliseconds(),
            time_part.microseconds(),
            time_part.nanoseconds(),
        )
    }

    /// Rounds this datetime to the given unit, carrying whole days into the
    /// date.
    ///
    /// ```rust
    /// use tempora::{PlainDateTime, Unit};
    /// let dt = PlainDateTime::new(2025, 3, 14, 23, 45, 0)?;
    /// let rounded = dt.round(Unit::Day)?;
    /// assert_eq!((rounded.day(), rounded.hour()), (15, 0));
    /// # Ok::<_, tempora::Error>(())
    /// ```
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub fn round(&self, options: impl Into<RoundingOptions>) -> Result<Self, Error> {
        let options = options.into();
        match options.smallest_unit {
            Unit::Day => {
                if options.increment != 1 {
                    return Err(Error::InvalidOption("roundingIncrement"));
                }
            }
            unit if unit.is_calendar_unit() => return Err(Error::InvalidOption("smallestUnit")),
            _ => options.validate_increment()?,
        }
        // Unwrap is fine: Day and below all have fixed lengths.
        let step = options.smallest_unit.nanoseconds().unwrap() as i128 * options.increment as i128;
        let rounded = round_to_increment(self.time.nanosecond_of_day() as i128, step, options.mode);
        let (carry, time_nanos) = divmod!(rounded, NANOS_PER_DAY as i128);
        let date = self.date.add_days(carry as i64)?;
        Ok(Self {
            date,
            time: PlainTime::from_nanosecond_of_day(time_nanos as i64),
            ..*self
        })
    }

    /// Returns `true` when both the ISO fields and the calendars match.
    ///
    /// The comparison traits ignore the calendar tag; this method does not.
    pub fn equals(&self, other: &Self) -> bool {
        self == other && self.calendar == other.calendar
    }
}

// The calendar tag is excluded from comparisons so that ordering stays
// consistent across calendars, matching the spec's lexicographic ISO
// comparison. Calendar-sensitive equality is `equals`.
impl PartialEq for PlainDateTime {
    fn eq(&self, other: &Self) -> bool {
        self.date == other.date && self.time == other.time
    }
}

impl Eq for PlainDateTime {}

impl core::hash::Hash for PlainDateTime {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.date.hash(state);
        self.time.hash(state);
    }
}

impl PartialOrd for PlainDateTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PlainDateTime {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.date.cmp(&other.date) {
            Ordering::Equal => self.time.cmp(&other.time),
            ord => ord,
        }
    }
}

impl core::fmt::Display for PlainDateTime {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}T{}", self.date, self.time)?;
        if !self.calendar.is_iso() {
            write!(f, "[u-ca={}]", self.calendar)?;
        }
        Ok(())
    }
}
