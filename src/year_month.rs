use crate::calendar::{DateFields, MonthCode};
use crate::duration::Duration;
use crate::gregorian::{days_in_month, days_in_year, is_leap_year};
use crate::options::{DifferenceOptions, Overflow, Unit};
use crate::{Error, PlainDate};

/// A year and month without a day, such as `2025-03`.
///
/// For ordering and arithmetic the value behaves like the first day of its
/// month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PlainYearMonth {
    year: i32,
    month: u8,
}

impl PlainYearMonth {
    /// Creates a new [`PlainYearMonth`] from a year and month.
    ///
    /// # Examples
    ///
    /// ```
    /// # use tempora::PlainYearMonth;
    /// let ym = PlainYearMonth::new(2025, 3)?;
    /// assert_eq!(ym.year(), 2025);
    /// assert_eq!(ym.month(), 3);
    /// assert!(PlainYearMonth::new(2025, 13).is_err());
    /// # Ok::<_, tempora::Error>(())
    /// ```
    pub fn new(year: i32, month: u8) -> Result<Self, Error> {
        // Delegate the range checks to the reference day.
        let date = PlainDate::new(year, month, 1)?;
        Ok(Self {
            year: date.year(),
            month: date.month(),
        })
    }

    /// Returns the year.
    #[inline]
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// Returns the month. This value will always be within `1..=12`.
    #[inline]
    pub const fn month(&self) -> u8 {
        self.month
    }

    /// Returns the month code.
    #[inline]
    pub fn month_code(&self) -> MonthCode {
        // Unwrap is fine: the month was validated at construction.
        MonthCode::new(self.month).unwrap()
    }

    /// Returns the number of days in this month.
    #[inline]
    pub const fn days_in_month(&self) -> u8 {
        days_in_month(self.year, self.month)
    }

    /// Returns the number of days in this year, either 365 or 366.
    #[inline]
    pub const fn days_in_year(&self) -> u16 {
        days_in_year(self.year)
    }

    /// Returns the number of months in this year.
    #[inline]
    pub const fn months_in_year(&self) -> u8 {
        12
    }

    /// Returns `true` if this value falls in a leap year.
    #[inline]
    pub const fn in_leap_year(&self) -> bool {
        is_leap_year(self.year)
    }

    /// Combines this value with a day to make a full [`PlainDate`].
    ///
    /// ```rust
    /// # use tempora::{PlainDate, PlainYearMonth};
    /// let ym = PlainYearMonth::new(2024, 2)?;
    /// assert_eq!(ym.to_plain_date(29)?, PlainDate::new(2024, 2, 29)?);
    /// assert!(PlainYearMonth::new(2023, 2)?.to_plain_date(29).is_err());
    /// # Ok::<_, tempora::Error>(())
    /// ```
    pub fn to_plain_date(&self, day: u8) -> Result<PlainDate, Error> {
        PlainDate::new(self.year, self.month, day)
    }

    /// Returns a new [`PlainYearMonth`] with the given fields replaced.
    ///
    /// ```rust
    /// use tempora::{DateFields, Overflow, PlainYearMonth};
    /// let ym = PlainYearMonth::new(2025, 3)?;
    /// let shifted = ym.with(&DateFields::default().with_month(12), Overflow::Reject)?;
    /// assert_eq!(shifted, PlainYearMonth::new(2025, 12)?);
    /// # Ok::<_, tempora::Error>(())
    /// ```
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub fn with(&self, fields: &DateFields, overflow: Overflow) -> Result<Self, Error> {
        let base = DateFields::default().with_year(self.year).with_month(self.month);
        let merged = base.merge(fields)?;
        crate::Calendar::Iso8601.year_month_from_fields(&merged, overflow)
    }

    /// The first of the month, used as the anchor for arithmetic.
    pub(crate) fn first_day(&self) -> PlainDate {
        PlainDate {
            year: self.year,
            month: self.month,
            day: 1,
        }
    }

    /// Adds a duration to this value, anchored at the first of the month.
    ///
    /// ```rust
    /// use tempora::{Duration, Overflow, PlainYearMonth};
    /// let ym = PlainYearMonth::new(2024, 11)?;
    /// assert_eq!(
    ///     ym.add(&Duration::from_months(3), Overflow::Constrain)?,
    ///     PlainYearMonth::new(2025, 2)?,
    /// );
    /// # Ok::<_, tempora::Error>(())
    /// ```
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub fn add(&self, duration: &Duration, overflow: Overflow) -> Result<Self, Error> {
        let date = self.first_day().add(duration, overflow)?;
        Ok(Self {
            year: date.year(),
            month: date.month(),
        })
    }

    /// Subtracts a duration from this value.
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub fn subtract(&self, duration: &Duration, overflow: Overflow) -> Result<Self, Error> {
        self.add(&duration.negated(), overflow)
    }

    /// Returns the duration from this value until `other` in whole months
    /// and years. The default largest unit is [`Unit::Year`].
    pub fn until(&self, other: &Self, options: impl Into<DifferenceOptions>) -> Result<Duration, Error> {
        let options = options.into();
        let (largest, smallest) = options.resolve(Unit::Year)?;
        if !matches!(largest, Unit::Year | Unit::Month) || !matches!(smallest, Unit::Year | Unit::Month | Unit::Nanosecond)
        {
            return Err(Error::InvalidOption("unit"));
        }
        let smallest = if smallest == Unit::Nanosecond { Unit::Month } else { smallest };
        let exact = self.first_day().until_in(&other.first_day(), largest)?;
        if smallest == Unit::Month && options.increment == 1 {
            return Ok(exact);
        }
        exact.round_relative(
            crate::duration::DurationRoundOptions {
                largest_unit: Some(largest),
                smallest_unit: Some(smallest),
                increment: options.increment,
                mode: options.mode,
            },
            &crate::RelativeTo::from(self.first_day()),
        )
    }

    /// Returns the duration from `other` until this value.
    pub fn since(&self, other: &Self, options: impl Into<DifferenceOptions>) -> Result<Duration, Error> {
        other.until(self, options)
    }
}

impl core::fmt::Display for PlainYearMonth {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        crate::fmt::write_year(f, self.year)?;
        write!(f, "-{:02}", self.month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_until_whole_months() {
        let a = PlainYearMonth::new(2023, 11).unwrap();
        let b = PlainYearMonth::new(2025, 2).unwrap();
        let d = a.until(&b, Unit::Year).unwrap();
        assert_eq!((d.years(), d.months(), d.days()), (1, 3, 0));
        let d = a.until(&b, Unit::Month).unwrap();
        assert_eq!(d.months(), 15);
        let d = b.until(&a, Unit::Year).unwrap();
        assert_eq!((d.years(), d.months()), (-1, -3));
    }

    #[test]
    fn test_add_trims_day() {
        let ym = PlainYearMonth::new(2024, 1).unwrap();
        let shifted = ym.add(&Duration::from_months(1), Overflow::Constrain).unwrap();
        assert_eq!(shifted, PlainYearMonth::new(2024, 2).unwrap());
        let shifted = ym.add(&Duration::from_years(-5), Overflow::Constrain).unwrap();
        assert_eq!(shifted, PlainYearMonth::new(2019, 1).unwrap());
    }

    #[test]
    fn test_display() {
        assert_eq!(PlainYearMonth::new(2025, 3).unwrap().to_string(), "2025-03");
    }
}
