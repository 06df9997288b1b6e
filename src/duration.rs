use core::cmp::Ordering;
use core::ops::Neg;

use crate::options::{round_to_increment, RoundingMode, RoundingOptions, Unit, NANOS_PER_DAY};
use crate::{Disambiguation, Error, Overflow, PlainDate, PlainDateTime, ZonedDateTime};

/// A signed span of time, such as 2 years or 30 minutes.
///
/// A duration keeps its ten components separate: adding one month is not the
/// same operation as adding 30 days. Components are not implicitly balanced,
/// so 90 minutes stays 90 minutes until [`Duration::balance`] is asked for.
///
/// The one invariant every duration upholds is that all non-zero components
/// share a sign. Construction and arithmetic fail with
/// [`Error::InvalidDuration`] when that would not hold.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Duration {
    years: i64,
    months: i64,
    weeks: i64,
    days: i64,
    hours: i64,
    minutes: i64,
    seconds: i64,
    milliseconds: i64,
    microseconds: i64,
    nanoseconds: i64,
}

/// Options for [`Duration::round`] and [`Duration::round_relative`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationRoundOptions {
    /// The largest unit in the result. Defaults to the larger of the
    /// duration's own largest unit and `smallest_unit`.
    pub largest_unit: Option<Unit>,
    /// The unit to round to. Defaults to [`Unit::Nanosecond`].
    pub smallest_unit: Option<Unit>,
    pub increment: u32,
    pub mode: RoundingMode,
}

impl Default for DurationRoundOptions {
    fn default() -> Self {
        Self {
            largest_unit: None,
            smallest_unit: None,
            increment: 1,
            mode: RoundingMode::HalfExpand,
        }
    }
}

impl DurationRoundOptions {
    /// Returns a copy with the given largest unit.
    #[must_use]
    pub fn with_largest_unit(mut self, unit: Unit) -> Self {
        self.largest_unit = Some(unit);
        self
    }

    /// Returns a copy with the given smallest unit.
    #[must_use]
    pub fn with_smallest_unit(mut self, unit: Unit) -> Self {
        self.smallest_unit = Some(unit);
        self
    }

    /// Returns a copy with the given rounding increment.
    #[must_use]
    pub fn with_increment(mut self, increment: u32) -> Self {
        self.increment = increment;
        self
    }

    /// Returns a copy with the given rounding mode.
    #[must_use]
    pub fn with_mode(mut self, mode: RoundingMode) -> Self {
        self.mode = mode;
        self
    }

    fn resolve(&self, duration: &Duration) -> Result<(Unit, Unit), Error> {
        let smallest = self.smallest_unit.unwrap_or(Unit::Nanosecond);
        let natural = duration.default_largest_unit();
        let largest = match self.largest_unit {
            Some(unit) => unit,
            None => {
                if smallest > natural {
                    smallest
                } else {
                    natural
                }
            }
        };
        if smallest > largest {
            return Err(Error::InvalidOption("smallestUnit"));
        }
        RoundingOptions {
            smallest_unit: smallest,
            increment: self.increment,
            mode: self.mode,
        }
        .validate_increment()?;
        Ok((largest, smallest))
    }
}

impl From<Unit> for DurationRoundOptions {
    fn from(unit: Unit) -> Self {
        Self::default().with_smallest_unit(unit)
    }
}

/// The reference point that gives calendar units a concrete length.
///
/// Balancing, rounding, totalling, and comparing durations that carry years,
/// months, or weeks needs to know *where* those units are measured, because
/// a month has no fixed nanosecond length. A plain date anchors them on the
/// calendar line; a [`ZonedDateTime`] additionally accounts for days of
/// unusual length around DST transitions.
#[derive(Debug, Clone)]
pub enum RelativeTo {
    Plain(PlainDateTime),
    Zoned(ZonedDateTime),
}

impl From<PlainDate> for RelativeTo {
    fn from(date: PlainDate) -> Self {
        Self::Plain(date.at(crate::PlainTime::MIDNIGHT))
    }
}

impl From<PlainDateTime> for RelativeTo {
    fn from(dt: PlainDateTime) -> Self {
        Self::Plain(dt)
    }
}

impl From<ZonedDateTime> for RelativeTo {
    fn from(zdt: ZonedDateTime) -> Self {
        Self::Zoned(zdt)
    }
}

impl RelativeTo {
    fn checked_add(&self, duration: &Duration) -> Result<Self, Error> {
        match self {
            Self::Plain(dt) => Ok(Self::Plain(dt.add(duration, Overflow::Constrain)?)),
            Self::Zoned(zdt) => Ok(Self::Zoned(zdt.add_with(
                duration,
                Overflow::Constrain,
                Disambiguation::Compatible,
            )?)),
        }
    }

    fn until(&self, other: &Self, largest: Unit) -> Result<Duration, Error> {
        match (self, other) {
            (Self::Plain(a), Self::Plain(b)) => a.until_in(b, largest),
            (Self::Zoned(a), Self::Zoned(b)) => a.until_in(b, largest),
            _ => Err(Error::InvalidOption("relativeTo")),
        }
    }

    fn nanoseconds_until(&self, other: &Self) -> Result<i128, Error> {
        match (self, other) {
            (Self::Plain(a), Self::Plain(b)) => Ok(b.epoch_nanoseconds_naive() - a.epoch_nanoseconds_naive()),
            (Self::Zoned(a), Self::Zoned(b)) => {
                Ok(b.epoch_nanoseconds() as i128 - a.epoch_nanoseconds() as i128)
            }
            _ => Err(Error::InvalidOption("relativeTo")),
        }
    }
}

impl Duration {
    /// A duration with every component set to zero.
    pub const ZERO: Self = Self {
        years: 0,
        months: 0,
        weeks: 0,
        days: 0,
        hours: 0,
        minutes: 0,
        seconds: 0,
        milliseconds: 0,
        microseconds: 0,
        nanoseconds: 0,
    };

    /// Creates a new [`Duration`] from all ten components.
    ///
    /// Fails with [`Error::InvalidDuration`] if the non-zero components do
    /// not share a sign.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use tempora::Duration;
    /// assert!(Duration::new(1, 2, 0, 0, 3, 0, 0, 0, 0, 0).is_ok());
    /// assert!(Duration::new(1, -2, 0, 0, 0, 0, 0, 0, 0, 0).is_err());
    /// # Ok::<_, tempora::Error>(())
    /// ```
    #[allow(clippy::too_many_arguments)]
    pub const fn new(
        years: i64,
        months: i64,
        weeks: i64,
        days: i64,
        hours: i64,
        minutes: i64,
        seconds: i64,
        milliseconds: i64,
        microseconds: i64,
        nanoseconds: i64,
    ) -> Result<Self, Error> {
        let out = Self {
            years,
            months,
            weeks,
            days,
            hours,
            minutes,
            seconds,
            milliseconds,
            microseconds,
            nanoseconds,
        };
        if out.is_sign_coherent() {
            Ok(out)
        } else {
            Err(Error::InvalidDuration)
        }
    }

    const fn components(&self) -> [i64; 10] {
        [
            self.years,
            self.months,
            self.weeks,
            self.days,
            self.hours,
            self.minutes,
            self.seconds,
            self.milliseconds,
            self.microseconds,
            self.nanoseconds,
        ]
    }

    const fn is_sign_coherent(&self) -> bool {
        let mut sign = 0i8;
        let components = self.components();
        let mut i = 0;
        while i < components.len() {
            let c = components[i];
            // i64::MIN cannot be negated, which negation and formatting rely on.
            if c == i64::MIN {
                return false;
            }
            if c != 0 {
                let s = if c > 0 { 1 } else { -1 };
                if sign == 0 {
                    sign = s;
                } else if sign != s {
                    return false;
                }
            }
            i += 1;
        }
        true
    }

    /// Creates a [`Duration`] representing the specified number of years.
    #[inline]
    pub const fn from_years(years: i64) -> Self {
        Self { years, ..Self::ZERO }
    }

    /// Creates a [`Duration`] representing the specified number of months.
    #[inline]
    pub const fn from_months(months: i64) -> Self {
        Self { months, ..Self::ZERO }
    }

    /// Creates a [`Duration`] representing the specified number of weeks.
    #[inline]
    pub const fn from_weeks(weeks: i64) -> Self {
        Self { weeks, ..Self::ZERO }
    }

    /// Creates a [`Duration`] representing the specified number of days.
    #[inline]
    pub const fn from_days(days: i64) -> Self {
        Self { days, ..Self::ZERO }
    }

    /// Creates a [`Duration`] representing the specified number of hours.
    #[inline]
    pub const fn from_hours(hours: i64) -> Self {
        Self { hours, ..Self::ZERO }
    }

    /// Creates a [`Duration`] representing the specified number of minutes.
    #[inline]
    pub const fn from_minutes(minutes: i64) -> Self {
        Self { minutes, ..Self::ZERO }
    }

    /// Creates a [`Duration`] representing the specified number of seconds.
    #[inline]
    pub const fn from_seconds(seconds: i64) -> Self {
        Self { seconds, ..Self::ZERO }
    }

    /// Creates a [`Duration`] representing the specified number of milliseconds.
    #[inline]
    pub const fn from_milliseconds(milliseconds: i64) -> Self {
        Self {
            milliseconds,
            ..Self::ZERO
        }
    }

    /// Creates a [`Duration`] representing the specified number of microseconds.
    #[inline]
    pub const fn from_microseconds(microseconds: i64) -> Self {
        Self {
            microseconds,
            ..Self::ZERO
        }
    }

    /// Creates a [`Duration`] representing the specified number of nanoseconds.
    #[inline]
    pub const fn from_nanoseconds(nanoseconds: i64) -> Self {
        Self {
            nanoseconds,
            ..Self::ZERO
        }
    }

    /// Returns the number of years within this duration.
    #[inline]
    pub const fn years(&self) -> i64 {
        self.years
    }

    /// Returns the number of months within this duration.
    #[inline]
    pub const fn months(&self) -> i64 {
        self.months
    }

    /// Returns the number of weeks within this duration.
    #[inline]
    pub const fn weeks(&self) -> i64 {
        self.weeks
    }

    /// Returns the number of days within this duration.
    #[inline]
    pub const fn days(&self) -> i64 {
        self.days
    }

    /// Returns the number of hours within this duration.
    #[inline]
    pub const fn hours(&self) -> i64 {
        self.hours
    }

    /// Returns the number of minutes within this duration.
    #[inline]
    pub const fn minutes(&self) -> i64 {
        self.minutes
    }

    /// Returns the number of seconds within this duration.
    #[inline]
    pub const fn seconds(&self) -> i64 {
        self.seconds
    }

    /// Returns the number of milliseconds within this duration.
    #[inline]
    pub const fn milliseconds(&self) -> i64 {
        self.milliseconds
    }

    /// Returns the number of microseconds within this duration.
    #[inline]
    pub const fn microseconds(&self) -> i64 {
        self.microseconds
    }

    /// Returns the number of nanoseconds within this duration.
    #[inline]
    pub const fn nanoseconds(&self) -> i64 {
        self.nanoseconds
    }

    /// Returns the sign of this duration: -1, 0, or 1.
    pub const fn sign(&self) -> i8 {
        let components = self.components();
        let mut i = 0;
        while i < components.len() {
            if components[i] > 0 {
                return 1;
            }
            if components[i] < 0 {
                return -1;
            }
            i += 1;
        }
        0
    }

    /// Returns `true` if every component is zero.
    #[inline]
    pub const fn is_blank(&self) -> bool {
        self.sign() == 0
    }

    /// Returns this duration with every component negated.
    ///
    /// ```rust
    /// # use tempora::Duration;
    /// let d = Duration::from_hours(5);
    /// assert_eq!(d.negated().hours(), -5);
    /// assert_eq!(d.negated().negated(), d);
    /// ```
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn negated(&self) -> Self {
        Self {
            years: -self.years,
            months: -self.months,
            weeks: -self.weeks,
            days: -self.days,
            hours: -self.hours,
            minutes: -self.minutes,
            seconds: -self.seconds,
            milliseconds: -self.milliseconds,
            microseconds: -self.microseconds,
            nanoseconds: -self.nanoseconds,
        }
    }

    /// Returns this duration with every component made non-negative.
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn abs(&self) -> Self {
        if self.sign() < 0 {
            self.negated()
        } else {
            *self
        }
    }

    /// The calendar-and-day components of this duration, with all time
    /// components zeroed.
    #[must_use]
    pub(crate) const fn date_part(&self) -> Self {
        Self {
            years: self.years,
            months: self.months,
            weeks: self.weeks,
            days: self.days,
            ..Self::ZERO
        }
    }

    /// Whether any of the year, month, or week components is in use.
    #[inline]
    pub(crate) const fn has_calendar_units(&self) -> bool {
        self.years != 0 || self.months != 0 || self.weeks != 0
    }

    /// The total of the time components (hours and below) in nanoseconds.
    pub(crate) const fn time_nanoseconds(&self) -> i128 {
        self.hours as i128 * 3_600_000_000_000
            + self.minutes as i128 * 60_000_000_000
            + self.seconds as i128 * 1_000_000_000
            + self.milliseconds as i128 * 1_000_000
            + self.microseconds as i128 * 1_000
            + self.nanoseconds as i128
    }

    /// The total in nanoseconds, treating days as exactly 24 hours.
    ///
    /// Fails when the duration has year, month, or week components.
    pub(crate) const fn fixed_nanoseconds(&self) -> Result<i128, Error> {
        if self.has_calendar_units() {
            return Err(Error::InvalidDuration);
        }
        Ok(self.days as i128 * NANOS_PER_DAY as i128 + self.time_nanoseconds())
    }

    /// The unit of the largest non-zero component, or [`Unit::Nanosecond`]
    /// for a blank duration.
    pub(crate) const fn default_largest_unit(&self) -> Unit {
        if self.years != 0 {
            Unit::Year
        } else if self.months != 0 {
            Unit::Month
        } else if self.weeks != 0 {
            Unit::Week
        } else if self.days != 0 {
            Unit::Day
        } else if self.hours != 0 {
            Unit::Hour
        } else if self.minutes != 0 {
            Unit::Minute
        } else if self.seconds != 0 {
            Unit::Second
        } else if self.milliseconds != 0 {
            Unit::Millisecond
        } else if self.microseconds != 0 {
            Unit::Microsecond
        } else {
            Unit::Nanosecond
        }
    }

    /// Reads the component corresponding to a date unit.
    pub(crate) const fn date_component(&self, unit: Unit) -> i64 {
        match unit {
            Unit::Year => self.years,
            Unit::Month => self.months,
            Unit::Week => self.weeks,
            _ => self.days,
        }
    }

    /// Zeroes every component strictly smaller than `unit`.
    pub(crate) const fn truncated_to(&self, unit: Unit) -> Self {
        let mut out = Self::ZERO;
        if (unit as u8) <= Unit::Year as u8 {
            out.years = self.years;
        }
        if (unit as u8) <= Unit::Month as u8 {
            out.months = self.months;
        }
        if (unit as u8) <= Unit::Week as u8 {
            out.weeks = self.weeks;
        }
        if (unit as u8) <= Unit::Day as u8 {
            out.days = self.days;
        }
        if (unit as u8) <= Unit::Hour as u8 {
            out.hours = self.hours;
        }
        if (unit as u8) <= Unit::Minute as u8 {
            out.minutes = self.minutes;
        }
        if (unit as u8) <= Unit::Second as u8 {
            out.seconds = self.seconds;
        }
        if (unit as u8) <= Unit::Millisecond as u8 {
            out.milliseconds = self.milliseconds;
        }
        if (unit as u8) <= Unit::Microsecond as u8 {
            out.microseconds = self.microseconds;
        }
        out.nanoseconds = 0;
        if (unit as u8) == Unit::Nanosecond as u8 {
            out.nanoseconds = self.nanoseconds;
        }
        out
    }

    /// Replaces the component for a date unit.
    pub(crate) fn with_date_component(&self, unit: Unit, value: i64) -> Result<Self, Error> {
        let mut out = *self;
        match unit {
            Unit::Year => out.years = value,
            Unit::Month => out.months = value,
            Unit::Week => out.weeks = value,
            Unit::Day => out.days = value,
            _ => return Err(Error::InvalidOption("unit")),
        }
        if out.is_sign_coherent() {
            Ok(out)
        } else {
            Err(Error::InvalidDuration)
        }
    }

    /// Decomposes a nanosecond total into components from `largest` (capped
    /// at [`Unit::Day`], treated as 24 hours) down to nanoseconds.
    pub(crate) fn from_total_nanoseconds(total: i128, largest: Unit) -> Result<Self, Error> {
        let start = if largest > Unit::Day { Unit::Day } else { largest };
        let mut out = Self::ZERO;
        let mut rest = total;
        for unit in [
            Unit::Day,
            Unit::Hour,
            Unit::Minute,
            Unit::Second,
            Unit::Millisecond,
            Unit::Microsecond,
        ] {
            if unit > start {
                continue;
            }
            // Unwrap is fine: every unit in the list has a fixed length.
            let length = unit.nanoseconds().unwrap() as i128;
            let count = rest / length;
            rest %= length;
            let count = i64::try_from(count).map_err(|_| Error::Arithmetic)?;
            match unit {
                Unit::Day => out.days = count,
                Unit::Hour => out.hours = count,
                Unit::Minute => out.minutes = count,
                Unit::Second => out.seconds = count,
                Unit::Millisecond => out.milliseconds = count,
                Unit::Microsecond => out.microseconds = count,
                _ => unreachable!(),
            }
        }
        out.nanoseconds = i64::try_from(rest).map_err(|_| Error::Arithmetic)?;
        Ok(out)
    }

    /// Adds two durations together.
    ///
    /// Neither operand may carry year, month, or week components: those
    /// have no context-free sum. The result is balanced up to the larger of
    /// the two operands' largest units.
    pub fn add(&self, other: &Self) -> Result<Self, Error> {
        if self.has_calendar_units() || other.has_calendar_units() {
            return Err(Error::InvalidDuration);
        }
        let total = self.fixed_nanoseconds()? + other.fixed_nanoseconds()?;
        let largest = self.default_largest_unit().max(other.default_largest_unit());
        Self::from_total_nanoseconds(total, largest)
    }

    /// Subtracts a duration from this one. This is equivalent to adding the
    /// negated duration.
    pub fn subtract(&self, other: &Self) -> Result<Self, Error> {
        self.add(&other.negated())
    }

    /// Rebalances the duration so each component sits within its natural
    /// range, promoting overflow upward up to `largest_unit`.
    ///
    /// Days are treated as exactly 24 hours, so this form is closed over
    /// the time components. Durations carrying years, months, or weeks and
    /// targets above [`Unit::Day`] need [`Duration::balance_relative`].
    ///
    /// ```rust
    /// use tempora::{Duration, Unit};
    /// let d = Duration::from_hours(25).balance(Unit::Day)?;
    /// assert_eq!((d.days(), d.hours()), (1, 1));
    /// # Ok::<_, tempora::Error>(())
    /// ```
    pub fn balance(&self, largest_unit: Unit) -> Result<Self, Error> {
        if largest_unit.is_calendar_unit() {
            return Err(Error::InvalidDuration);
        }
        let total = self.fixed_nanoseconds()?;
        Self::from_total_nanoseconds(total, largest_unit)
    }

    /// Rebalances the duration against a reference point, so calendar units
    /// take their actual lengths.
    pub fn balance_relative(&self, largest_unit: Unit, relative_to: &RelativeTo) -> Result<Self, Error> {
        let end = relative_to.checked_add(self)?;
        relative_to.until(&end, largest_unit)
    }

    /// Rounds this duration without a reference point.
    ///
    /// Only durations free of year, month, and week components can be
    /// rounded this way; days are treated as exactly 24 hours.
    ///
    /// ```rust
    /// use tempora::{Duration, DurationRoundOptions, Unit};
    /// let d = Duration::from_minutes(90);
    /// let opts = DurationRoundOptions::default()
    ///     .with_smallest_unit(Unit::Minute)
    ///     .with_largest_unit(Unit::Hour);
    /// let rounded = d.round(opts)?;
    /// assert_eq!((rounded.hours(), rounded.minutes()), (1, 30));
    /// # Ok::<_, tempora::Error>(())
    /// ```
    pub fn round(&self, options: impl Into<DurationRoundOptions>) -> Result<Self, Error> {
        let options = options.into();
        let (largest, smallest) = options.resolve(self)?;
        if largest.is_calendar_unit() || smallest.is_calendar_unit() {
            return Err(Error::InvalidDuration);
        }
        let total = self.fixed_nanoseconds()?;
        // Unwrap is fine: smallest is Day or below here.
        let step = smallest.nanoseconds().unwrap() as i128 * options.increment as i128;
        let rounded = round_to_increment(total, step, options.mode);
        Self::from_total_nanoseconds(rounded, largest)
    }

    /// Rounds this duration against a reference point.
    ///
    /// The duration is first measured from `relative_to`, rounded at
    /// `smallest_unit`, and rebalanced up to `largest_unit`; carries
    /// propagate upward, so 11.6 months round to one year when years are in
    /// range.
    pub fn round_relative(
        &self,
        options: impl Into<DurationRoundOptions>,
        relative_to: &RelativeTo,
    ) -> Result<Self, Error> {
        let options = options.into();
        let (largest, smallest) = options.resolve(self)?;
        let end = relative_to.checked_add(self)?;
        let exact = relative_to.until(&end, largest)?;
        if exact.is_blank() {
            return Ok(exact);
        }

        if smallest.is_time_unit() {
            let time_nanos = exact.time_nanoseconds();
            // Unwrap is fine: smallest is a time unit here.
            let step = smallest.nanoseconds().unwrap() as i128 * options.increment as i128;
            let rounded = round_to_increment(time_nanos, step, options.mode);
            if rounded == time_nanos {
                return Ok(exact);
            }
            let base = relative_to.checked_add(&exact.truncated_to(Unit::Day))?;
            let rounded_time = Self::from_total_nanoseconds(rounded, Unit::Hour)?;
            let end = base.checked_add(&rounded_time)?;
            return relative_to.until(&end, largest);
        }

        // Rounding at a date unit: express the remainder below `smallest` as
        // a fraction of one more step of `smallest`, then round the total.
        let sign = exact.sign() as i64;
        let truncated = exact.truncated_to(smallest);
        let count = truncated.date_component(smallest);
        let base = relative_to.checked_add(&truncated)?;
        let step = Self::ZERO.with_date_component(smallest, sign)?;
        let next = base.checked_add(&step)?;
        let numerator = base.nanoseconds_until(&end)?;
        let denominator = base.nanoseconds_until(&next)?;
        debug_assert!(denominator != 0);
        let scaled = count.unsigned_abs() as i128 * denominator.unsigned_abs() as i128
            + numerator.unsigned_abs() as i128;
        let scaled = scaled * sign as i128;
        let step_scale = options.increment as i128 * denominator.unsigned_abs() as i128;
        let rounded_count = round_to_increment(scaled, step_scale, options.mode) / denominator.unsigned_abs() as i128;
        let rounded_count = i64::try_from(rounded_count).map_err(|_| Error::Arithmetic)?;
        let adjusted = truncated.with_date_component(smallest, rounded_count)?;
        let end = relative_to.checked_add(&adjusted)?;
        relative_to.until(&end, largest)
    }

    /// Returns the total length of this duration expressed in `unit`,
    /// without a reference point.
    ///
    /// ```rust
    /// use tempora::{Duration, Unit};
    /// assert_eq!(Duration::from_minutes(90).total(Unit::Hour)?, 1.5);
    /// # Ok::<_, tempora::Error>(())
    /// ```
    pub fn total(&self, unit: Unit) -> Result<f64, Error> {
        if unit.is_calendar_unit() {
            return Err(Error::InvalidDuration);
        }
        let total = self.fixed_nanoseconds()?;
        // Unwrap is fine: the unit is Day or below here.
        let length = unit.nanoseconds().unwrap() as i128;
        Ok(ratio_to_f64(total, length))
    }

    /// Returns the total length of this duration expressed in `unit`,
    /// measured from a reference point.
    pub fn total_relative(&self, unit: Unit, relative_to: &RelativeTo) -> Result<f64, Error> {
        let end = relative_to.checked_add(self)?;
        if unit.is_time_unit() {
            let nanos = relative_to.nanoseconds_until(&end)?;
            // Unwrap is fine: the unit is a time unit here.
            return Ok(ratio_to_f64(nanos, unit.nanoseconds().unwrap() as i128));
        }
        let exact = relative_to.until(&end, unit)?;
        if exact.is_blank() {
            return Ok(0.0);
        }
        let sign = exact.sign() as i64;
        let truncated = exact.truncated_to(unit);
        let count = truncated.date_component(unit);
        let base = relative_to.checked_add(&truncated)?;
        let step = Self::ZERO.with_date_component(unit, sign)?;
        let next = base.checked_add(&step)?;
        let numerator = base.nanoseconds_until(&end)?;
        let denominator = base.nanoseconds_until(&next)?;
        debug_assert!(denominator != 0);
        let fraction = ratio_to_f64(numerator.unsigned_abs() as i128, denominator.unsigned_abs() as i128);
        Ok(sign as f64 * (count.unsigned_abs() as f64 + fraction))
    }

    /// Compares two durations by their actual lengths.
    ///
    /// Calendar-free durations compare by their exact nanosecond value with
    /// days treated as 24 hours. If either carries years, months, or weeks
    /// a `relative_to` anchor is required.
    ///
    /// ```rust
    /// use core::cmp::Ordering;
    /// use tempora::Duration;
    /// let a = Duration::from_hours(25);
    /// let b = Duration::from_days(1);
    /// assert_eq!(Duration::compare(&a, &b, None)?, Ordering::Greater);
    /// # Ok::<_, tempora::Error>(())
    /// ```
    pub fn compare(a: &Self, b: &Self, relative_to: Option<&RelativeTo>) -> Result<Ordering, Error> {
        if !a.has_calendar_units() && !b.has_calendar_units() {
            return Ok(a.fixed_nanoseconds()?.cmp(&b.fixed_nanoseconds()?));
        }
        let relative_to = relative_to.ok_or(Error::InvalidDuration)?;
        let end_a = relative_to.checked_add(a)?;
        let end_b = relative_to.checked_add(b)?;
        Ok(relative_to
            .nanoseconds_until(&end_a)?
            .cmp(&relative_to.nanoseconds_until(&end_b)?))
    }
}

fn ratio_to_f64(numerator: i128, denominator: i128) -> f64 {
    let (quotient, remainder) = (numerator / denominator, numerator % denominator);
    quotient as f64 + remainder as f64 / denominator as f64
}

impl Neg for Duration {
    type Output = Self;

    fn neg(self) -> Self::Output {
        self.negated()
    }
}

impl core::fmt::Display for Duration {
    /// Formats the duration in the ISO 8601 duration format, e.g. `P1Y2DT3H`.
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if self.is_blank() {
            return f.write_str("PT0S");
        }
        if self.sign() < 0 {
            f.write_str("-")?;
        }
        let d = self.abs();
        f.write_str("P")?;
        if d.years != 0 {
            write!(f, "{}Y", d.years)?;
        }
        if d.months != 0 {
            write!(f, "{}M", d.months)?;
        }
        if d.weeks != 0 {
            write!(f, "{}W", d.weeks)?;
        }
        if d.days != 0 {
            write!(f, "{}D", d.days)?;
        }
        // Sub-second components fold into the seconds fraction.
        let subsec_total = d.milliseconds as i128 * 1_000_000 + d.microseconds as i128 * 1_000 + d.nanoseconds as i128;
        let seconds = d.seconds as i128 + subsec_total / 1_000_000_000;
        let fraction = (subsec_total % 1_000_000_000) as u32;
        let has_time = d.hours != 0 || d.minutes != 0 || seconds != 0 || fraction != 0;
        if has_time {
            f.write_str("T")?;
            if d.hours != 0 {
                write!(f, "{}H", d.hours)?;
            }
            if d.minutes != 0 {
                write!(f, "{}M", d.minutes)?;
            }
            if seconds != 0 || fraction != 0 {
                write!(f, "{seconds}")?;
                crate::fmt::write_subseconds(
                    f,
                    (fraction / 1_000_000) as u16,
                    (fraction / 1_000 % 1_000) as u16,
                    (fraction % 1_000) as u16,
                )?;
                f.write_str("S")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minutes(n: i64) -> Duration {
        Duration::from_minutes(n)
    }

    #[test]
    fn test_sign_invariant() {
        assert!(Duration::new(1, 0, 0, -1, 0, 0, 0, 0, 0, 0).is_err());
        assert_eq!(Duration::from_hours(-3).sign(), -1);
        assert_eq!(Duration::ZERO.sign(), 0);
        assert!(Duration::ZERO.is_blank());
    }

    #[test]
    fn test_balance_closed_form() {
        let d = Duration::from_hours(25).balance(Unit::Day).unwrap();
        assert_eq!((d.days(), d.hours()), (1, 1));
        let d = minutes(90).balance(Unit::Hour).unwrap();
        assert_eq!((d.hours(), d.minutes()), (1, 30));
        let d = Duration::from_nanoseconds(1_002_003_004).balance(Unit::Second).unwrap();
        assert_eq!(
            (d.seconds(), d.milliseconds(), d.microseconds(), d.nanoseconds()),
            (1, 2, 3, 4)
        );
        assert!(Duration::from_months(1).balance(Unit::Day).is_err());
    }

    #[test]
    fn test_round_without_relative() {
        let opts = DurationRoundOptions::default()
            .with_smallest_unit(Unit::Minute)
            .with_largest_unit(Unit::Hour);
        let d = minutes(90).round(opts).unwrap();
        assert_eq!((d.hours(), d.minutes()), (1, 30));

        let d = Duration::from_seconds(89).round(Unit::Minute).unwrap();
        assert_eq!((d.minutes(), d.seconds()), (1, 0));

        let d = Duration::from_seconds(-89).round(Unit::Minute).unwrap();
        assert_eq!((d.minutes(), d.seconds()), (-1, 0));
    }

    #[test]
    fn test_round_relative_months() {
        // 2.5 months from the start of a 31-day month.
        let anchor = RelativeTo::from(crate::PlainDate::new(2025, 1, 1).unwrap());
        let d = Duration::new(0, 2, 0, 14, 0, 0, 0, 0, 0, 0).unwrap();
        let rounded = d.round_relative(Unit::Month, &anchor).unwrap();
        assert_eq!((rounded.months(), rounded.days()), (3, 0));

        // Carry propagates upward into years.
        let d = Duration::new(0, 11, 0, 20, 0, 0, 0, 0, 0, 0).unwrap();
        let opts = DurationRoundOptions::default()
            .with_smallest_unit(Unit::Month)
            .with_largest_unit(Unit::Year);
        let rounded = d.round_relative(opts, &anchor).unwrap();
        assert_eq!((rounded.years(), rounded.months()), (1, 0));
    }

    #[test]
    fn test_total() {
        assert_eq!(minutes(90).total(Unit::Hour).unwrap(), 1.5);
        assert_eq!(Duration::from_hours(36).total(Unit::Day).unwrap(), 1.5);
        assert!(Duration::from_months(1).total(Unit::Day).is_err());

        let anchor = RelativeTo::from(crate::PlainDate::new(2025, 1, 1).unwrap());
        // January 2025 has 31 days.
        let total = Duration::from_days(31).total_relative(Unit::Month, &anchor).unwrap();
        assert_eq!(total, 1.0);
    }

    #[test]
    fn test_compare() {
        assert_eq!(
            Duration::compare(&Duration::from_hours(25), &Duration::from_days(1), None).unwrap(),
            Ordering::Greater
        );
        assert!(Duration::compare(&Duration::from_months(1), &Duration::from_days(30), None).is_err());

        let anchor = RelativeTo::from(crate::PlainDate::new(2025, 2, 1).unwrap());
        assert_eq!(
            Duration::compare(&Duration::from_months(1), &Duration::from_days(28), Some(&anchor)).unwrap(),
            Ordering::Equal
        );
        let anchor = RelativeTo::from(crate::PlainDate::new(2025, 1, 1).unwrap());
        assert_eq!(
            Duration::compare(&Duration::from_months(1), &Duration::from_days(28), Some(&anchor)).unwrap(),
            Ordering::Greater
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Duration::ZERO.to_string(), "PT0S");
        assert_eq!(Duration::new(1, 2, 0, 4, 5, 0, 6, 0, 0, 0).unwrap().to_string(), "P1Y2M4DT5H6S");
        assert_eq!(Duration::from_milliseconds(1500).to_string(), "PT1.500S");
        assert_eq!(minutes(-90).to_string(), "-PT90M");
    }
}
