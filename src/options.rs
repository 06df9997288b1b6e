//! Option enumerations accepted by arithmetic, difference, and rounding
//! operations.
//!
//! Every enumeration here is *closed*: parsing an unknown value fails with
//! [`Error::InvalidOption`] rather than being ignored.

use crate::Error;

pub(crate) const NANOS_PER_SEC: i64 = 1_000_000_000;
pub(crate) const NANOS_PER_MIN: i64 = 60 * NANOS_PER_SEC;
pub(crate) const NANOS_PER_HOUR: i64 = 60 * NANOS_PER_MIN;
pub(crate) const NANOS_PER_DAY: i64 = 24 * NANOS_PER_HOUR;

/// A unit of temporal measurement.
///
/// The ordering follows magnitude, i.e. `Unit::Year > Unit::Nanosecond`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Unit {
    Nanosecond,
    Microsecond,
    Millisecond,
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl Unit {
    /// Returns `true` for `Year`, `Month`, `Week`, and `Day`.
    #[inline]
    pub const fn is_date_unit(self) -> bool {
        matches!(self, Unit::Year | Unit::Month | Unit::Week | Unit::Day)
    }

    /// Returns `true` for `Hour` and below.
    #[inline]
    pub const fn is_time_unit(self) -> bool {
        !self.is_date_unit()
    }

    /// Returns `true` for the units whose length depends on a reference
    /// point: `Year`, `Month`, and `Week`.
    #[inline]
    pub const fn is_calendar_unit(self) -> bool {
        matches!(self, Unit::Year | Unit::Month | Unit::Week)
    }

    /// The length of this unit in nanoseconds, treating days as exactly
    /// 24 hours. Calendar units have no fixed length.
    #[inline]
    pub(crate) const fn nanoseconds(self) -> Option<i64> {
        match self {
            Unit::Nanosecond => Some(1),
            Unit::Microsecond => Some(1_000),
            Unit::Millisecond => Some(1_000_000),
            Unit::Second => Some(NANOS_PER_SEC),
            Unit::Minute => Some(NANOS_PER_MIN),
            Unit::Hour => Some(NANOS_PER_HOUR),
            Unit::Day => Some(NANOS_PER_DAY),
            _ => None,
        }
    }

    /// How many of this unit make up the next larger one, where that count
    /// is fixed. Used to validate rounding increments.
    #[inline]
    pub(crate) const fn increment_limit(self) -> Option<u32> {
        match self {
            Unit::Hour => Some(24),
            Unit::Minute | Unit::Second => Some(60),
            Unit::Millisecond | Unit::Microsecond | Unit::Nanosecond => Some(1000),
            _ => None,
        }
    }

    /// The option-bag spelling of the unit.
    pub const fn as_str(self) -> &'static str {
        match self {
            Unit::Year => "year",
            Unit::Month => "month",
            Unit::Week => "week",
            Unit::Day => "day",
            Unit::Hour => "hour",
            Unit::Minute => "minute",
            Unit::Second => "second",
            Unit::Millisecond => "millisecond",
            Unit::Microsecond => "microsecond",
            Unit::Nanosecond => "nanosecond",
        }
    }
}

impl core::str::FromStr for Unit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "year" => Ok(Unit::Year),
            "month" => Ok(Unit::Month),
            "week" => Ok(Unit::Week),
            "day" => Ok(Unit::Day),
            "hour" => Ok(Unit::Hour),
            "minute" => Ok(Unit::Minute),
            "second" => Ok(Unit::Second),
            "millisecond" => Ok(Unit::Millisecond),
            "microsecond" => Ok(Unit::Microsecond),
            "nanosecond" => Ok(Unit::Nanosecond),
            _ => Err(Error::InvalidOption("unit")),
        }
    }
}

/// Policy for out-of-range calendar fields produced by `with` or arithmetic.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Overflow {
    /// Clamp the day to the last valid day of the resulting month.
    #[default]
    Constrain,
    /// Fail with [`Error::Arithmetic`] instead of clamping.
    Reject,
}

impl core::str::FromStr for Overflow {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "constrain" => Ok(Overflow::Constrain),
            "reject" => Ok(Overflow::Reject),
            _ => Err(Error::InvalidOption("overflow")),
        }
    }
}

/// Policy for choosing among the candidate instants of a local time that
/// falls inside a DST fold or gap.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Disambiguation {
    /// In a fold take the earlier instant; in a gap move past it.
    #[default]
    Compatible,
    Earlier,
    Later,
    /// Fail with [`Error::AmbiguousDateTime`] or [`Error::SkippedDateTime`].
    Reject,
}

impl core::str::FromStr for Disambiguation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "compatible" => Ok(Disambiguation::Compatible),
            "earlier" => Ok(Disambiguation::Earlier),
            "later" => Ok(Disambiguation::Later),
            "reject" => Ok(Disambiguation::Reject),
            _ => Err(Error::InvalidOption("disambiguation")),
        }
    }
}

/// How to round a quantity that is not an exact multiple of the increment.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoundingMode {
    /// Round to the nearest increment; ties away from zero.
    #[default]
    HalfExpand,
    /// Round towards positive infinity.
    Ceil,
    /// Round towards negative infinity.
    Floor,
    /// Round towards zero.
    Trunc,
}

impl core::str::FromStr for RoundingMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "halfExpand" => Ok(RoundingMode::HalfExpand),
            "ceil" => Ok(RoundingMode::Ceil),
            "floor" => Ok(RoundingMode::Floor),
            "trunc" => Ok(RoundingMode::Trunc),
            _ => Err(Error::InvalidOption("roundingMode")),
        }
    }
}

/// Options for the `round` family of operations.
///
/// A bare [`Unit`] converts into the default options for that unit:
///
/// ```rust
/// use tempora::{Instant, Unit};
/// let i: Instant = "2025-03-14T09:32:47Z".parse()?;
/// assert_eq!(i.round(Unit::Minute)?.to_string(), "2025-03-14T09:33:00Z");
/// # Ok::<_, tempora::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundingOptions {
    pub smallest_unit: Unit,
    pub increment: u32,
    pub mode: RoundingMode,
}

impl RoundingOptions {
    /// Creates options that round to the nearest `smallest_unit`.
    pub const fn new(smallest_unit: Unit) -> Self {
        Self {
            smallest_unit,
            increment: 1,
            mode: RoundingMode::HalfExpand,
        }
    }

    /// Returns a copy with the given rounding increment.
    #[must_use]
    pub const fn with_increment(mut self, increment: u32) -> Self {
        self.increment = increment;
        self
    }

    /// Returns a copy with the given rounding mode.
    #[must_use]
    pub const fn with_mode(mut self, mode: RoundingMode) -> Self {
        self.mode = mode;
        self
    }

    /// Validates the increment against the smallest unit's natural range.
    ///
    /// For time units the increment must evenly divide, and not equal, the
    /// number of that unit in the next larger one.
    pub(crate) fn validate_increment(&self) -> Result<(), Error> {
        if self.increment == 0 {
            return Err(Error::InvalidOption("roundingIncrement"));
        }
        if let Some(limit) = self.smallest_unit.increment_limit() {
            if self.increment >= limit || limit % self.increment != 0 {
                return Err(Error::InvalidOption("roundingIncrement"));
            }
        }
        Ok(())
    }
}

impl From<Unit> for RoundingOptions {
    fn from(unit: Unit) -> Self {
        Self::new(unit)
    }
}

/// Options for the `until`/`since` family of operations.
///
/// A bare [`Unit`] converts into "difference expressed up to this unit":
///
/// ```rust
/// use tempora::{PlainDate, Unit};
/// let a = PlainDate::new(2020, 1, 1)?;
/// let b = PlainDate::new(2023, 3, 15)?;
/// let d = a.until(&b, Unit::Year)?;
/// assert_eq!((d.years(), d.months(), d.days()), (3, 2, 14));
/// # Ok::<_, tempora::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DifferenceOptions {
    /// The largest unit to balance the result into. `None` uses the
    /// type's default.
    pub largest_unit: Option<Unit>,
    /// The smallest unit to round the result to. `None` means exact.
    pub smallest_unit: Option<Unit>,
    pub increment: u32,
    /// Differences default to truncation so that they are exact.
    pub mode: RoundingMode,
}

impl Default for DifferenceOptions {
    fn default() -> Self {
        Self {
            largest_unit: None,
            smallest_unit: None,
            increment: 1,
            mode: RoundingMode::Trunc,
        }
    }
}

impl DifferenceOptions {
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

    /// Resolves the effective largest and smallest units given the type's
    /// default largest unit, then checks their consistency.
    pub(crate) fn resolve(&self, default_largest: Unit) -> Result<(Unit, Unit), Error> {
        let smallest = self.smallest_unit.unwrap_or(Unit::Nanosecond);
        let largest = match self.largest_unit {
            Some(unit) => unit,
            // The default never shrinks below the requested precision.
            None => {
                if smallest > default_largest {
                    smallest
                } else {
                    default_largest
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

impl From<Unit> for DifferenceOptions {
    fn from(unit: Unit) -> Self {
        Self::default().with_largest_unit(unit)
    }
}

/// Rounds `quantity` to a multiple of `increment` using the given mode.
///
/// `increment` must be positive.
pub(crate) fn round_to_increment(quantity: i128, increment: i128, mode: RoundingMode) -> i128 {
    debug_assert!(increment > 0);
    let quotient = quantity.div_euclid(increment);
    let remainder = quantity.rem_euclid(increment);
    if remainder == 0 {
        return quantity;
    }
    let floored = quotient * increment;
    match mode {
        RoundingMode::Floor => floored,
        RoundingMode::Ceil => floored + increment,
        RoundingMode::Trunc => {
            if quantity < 0 {
                floored + increment
            } else {
                floored
            }
        }
        RoundingMode::HalfExpand => {
            if 2 * remainder > increment {
                floored + increment
            } else if 2 * remainder < increment {
                floored
            } else if quantity >= 0 {
                // Ties away from zero.
                floored + increment
            } else {
                floored
            }
        }
    }
}
