use crate::calendar::{DateFields, MonthCode};
use crate::gregorian::{days_in_month, ensure_in_range};
use crate::options::Overflow;
use crate::{Error, PlainDate};

/// A month and day without a year, such as a birthday or `--02-29`.
///
/// The value is internally anchored to a reference leap year so that
/// February 29th is representable; projecting onto a concrete year with
/// [`PlainMonthDay::to_plain_date`] re-validates the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlainMonthDay {
    month: u8,
    day: u8,
}

impl PlainMonthDay {
    /// The leap year anchoring days that do not exist in every year.
    pub(crate) const REFERENCE_YEAR: i32 = 1972;

    /// Creates a new [`PlainMonthDay`] from a month and day.
    ///
    /// The day is validated against the reference leap year, so February
    /// 29th is accepted.
    ///
    /// # Examples
    ///
    /// ```
    /// # use tempora::PlainMonthDay;
    /// assert!(PlainMonthDay::new(2, 29).is_ok());
    /// assert!(PlainMonthDay::new(2, 30).is_err());
    /// assert!(PlainMonthDay::new(13, 1).is_err());
    /// # Ok::<_, tempora::Error>(())
    /// ```
    pub const fn new(month: u8, day: u8) -> Result<Self, Error> {
        ensure_in_range!(month, 1 => 12);
        ensure_in_range!(day, 1 => days_in_month(Self::REFERENCE_YEAR, month));
        Ok(Self { month, day })
    }

    /// Returns the month. This value will always be within `1..=12`.
    #[inline]
    pub const fn month(&self) -> u8 {
        self.month
    }

    /// Returns the day. This value will always be within `1..=31`.
    #[inline]
    pub const fn day(&self) -> u8 {
        self.day
    }

    /// Returns the month code.
    #[inline]
    pub fn month_code(&self) -> MonthCode {
        // Unwrap is fine: the month was validated at construction.
        MonthCode::new(self.month).unwrap()
    }

    /// Returns a new [`PlainMonthDay`] with the given fields replaced.
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub fn with(&self, fields: &DateFields, overflow: Overflow) -> Result<Self, Error> {
        let base = DateFields::default().with_month(self.month).with_day(self.day);
        let merged = base.merge(fields)?;
        crate::Calendar::Iso8601.month_day_from_fields(&merged, overflow)
    }

    /// Projects this value onto a concrete year.
    ///
    /// February 29th is re-validated against the requested year:
    ///
    /// ```rust
    /// # use tempora::PlainMonthDay;
    /// let leap_day: PlainMonthDay = "--02-29".parse()?;
    /// assert!(leap_day.to_plain_date(2024).is_ok());
    /// assert!(leap_day.to_plain_date(2023).is_err());
    /// # Ok::<_, tempora::Error>(())
    /// ```
    pub fn to_plain_date(&self, year: i32) -> Result<PlainDate, Error> {
        PlainDate::new(year, self.month, self.day)
    }
}

impl core::fmt::Display for PlainMonthDay {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "--{:02}-{:02}", self.month, self.day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leap_day_projection() {
        let md = PlainMonthDay::new(2, 29).unwrap();
        assert_eq!(md.to_plain_date(2024).unwrap(), PlainDate::new(2024, 2, 29).unwrap());
        assert_eq!(md.to_plain_date(2023), Err(Error::OutOfRange));
    }

    #[test]
    fn test_display() {
        assert_eq!(PlainMonthDay::new(12, 25).unwrap().to_string(), "--12-25");
    }
}
