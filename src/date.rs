use crate::calendar::DateFields;
use crate::duration::Duration;
use crate::gregorian::{
    date_from_epoch_days, date_to_epoch_days, date_to_ordinal, days_in_month, days_in_year, divrem, ensure_in_range,
    find_iso_week_start_epoch, is_leap_year, iso_week_start_epoch_from_year, iso_weeks_in_year, weekday_from_days,
    MAX_EPOCH_DAYS, MIN_EPOCH_DAYS,
};
use crate::options::{DifferenceOptions, Overflow, Unit};
use crate::{Error, PlainDateTime, PlainTime};

/// An enum representing the different weekdays.
///
/// Due to different orderings of weekdays, this type does not implement
/// `PartialOrd` or `Ord`. Some cultures place either Friday, Saturday,
/// Sunday, or Monday as the first day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Weekday {
    Monday = 1,
    Tuesday = 2,
    Wednesday = 3,
    Thursday = 4,
    Friday = 5,
    Saturday = 6,
    Sunday = 7,
}

impl Weekday {
    /// Returns the next weekday, wrapping from Sunday to Monday.
    #[inline]
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Monday => Self::Tuesday,
            Self::Tuesday => Self::Wednesday,
            Self::Wednesday => Self::Thursday,
            Self::Thursday => Self::Friday,
            Self::Friday => Self::Saturday,
            Self::Saturday => Self::Sunday,
            Self::Sunday => Self::Monday,
        }
    }

    /// Returns the previous weekday, wrapping from Monday to Sunday.
    #[inline]
    #[must_use]
    pub const fn prev(self) -> Self {
        match self {
            Self::Monday => Self::Sunday,
            Self::Tuesday => Self::Monday,
            Self::Wednesday => Self::Tuesday,
            Self::Thursday => Self::Wednesday,
            Self::Friday => Self::Thursday,
            Self::Saturday => Self::Friday,
            Self::Sunday => Self::Saturday,
        }
    }

    /// Returns the day of the week number starting from Monday. This is also
    /// known as the ISO weekday.
    ///
    /// Current | `Monday` | `Tuesday` | `Wednesday` | `Thursday` | `Friday` | `Saturday` | `Sunday`
    /// --------|----------|-----------|-------------|------------|----------|------------|---------
    /// Number  | 1        | 2         | 3           | 4          | 5        | 6          | 7
    ///
    #[inline]
    #[must_use]
    pub const fn number_from_monday(self) -> u8 {
        self as u8
    }

    /// Returns the number of days from Monday.
    #[inline]
    #[must_use]
    pub const fn days_from_monday(self) -> u8 {
        self as u8 - 1
    }

    pub(crate) const fn from_sunday_index(d: u8) -> Self {
        match d {
            0 => Weekday::Sunday,
            1 => Weekday::Monday,
            2 => Weekday::Tuesday,
            3 => Weekday::Wednesday,
            4 => Weekday::Thursday,
            5 => Weekday::Friday,
            6 => Weekday::Saturday,
            _ => unreachable!(),
        }
    }
}

/// A date in the [ISO 8601 week date system].
///
/// The ISO year is made up of either 52 or 53 weeks, where a week always
/// starts on Monday and ends on Sunday even if that boundary would not make
/// sense in the traditional calendar. The first week of an ISO year is the
/// week containing the year's first Thursday, with the year being the same
/// year as that Thursday.
///
/// [ISO 8601 week date system]: https://en.wikipedia.org/wiki/ISO_week_date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IsoWeekDate {
    year: i32,
    week: u8,
    weekday: Weekday,
}

impl IsoWeekDate {
    /// Creates a new [`IsoWeekDate`] from the given year, week, and weekday.
    ///
    /// If the week is out of bounds for the given year then [`Error`] is
    /// returned.
    #[inline]
    pub const fn new(year: i32, week: u8, weekday: Weekday) -> Result<Self, Error> {
        ensure_in_range!(week, 1 => iso_weeks_in_year(year));
        Ok(Self { year, week, weekday })
    }

    /// Returns the ISO year.
    ///
    /// Note that the ISO year might be different from the Gregorian year.
    #[inline]
    #[must_use]
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// Returns the ISO week. This value will always be within `1..=53`.
    #[inline]
    #[must_use]
    pub const fn week(&self) -> u8 {
        self.week
    }

    /// Returns the ISO weekday.
    #[inline]
    #[must_use]
    pub const fn weekday(&self) -> Weekday {
        self.weekday
    }
}

impl core::fmt::Display for IsoWeekDate {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:04}-W{:02}-{}", self.year, self.week, self.weekday.number_from_monday())
    }
}

/// A calendar date in the proleptic Gregorian calendar.
///
/// Year 0 exists and corresponds to 1 BCE. The representable range covers
/// epoch days -100,000,001 through 100,000,000, i.e. roughly the years
/// -271821 through 275760.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PlainDate {
    pub(crate) year: i32,
    pub(crate) month: u8,
    pub(crate) day: u8,
}

impl PlainDate {
    /// A [`PlainDate`] at the unix epoch (January 1st, 1970).
    pub const UNIX_EPOCH: Self = Self {
        year: 1970,
        month: 1,
        day: 1,
    };

    /// The minimum valid date.
    pub const MIN: Self = Self {
        year: -271821,
        month: 4,
        day: 19,
    };

    /// The maximum valid date.
    pub const MAX: Self = Self {
        year: 275760,
        month: 9,
        day: 13,
    };

    #[doc(hidden)]
    #[inline]
    pub const fn __new_unchecked_from_macro(year: i32, month: u8, day: u8) -> Self {
        Self { year, month, day }
    }

    /// Creates a new [`PlainDate`] from a given year, month, and day.
    ///
    /// The month must be between `1..=12` and the day must be valid for the
    /// specified month, i.e. February must be either 28 or 29 days
    /// depending on the year.
    ///
    /// # Examples
    ///
    /// ```
    /// # use tempora::PlainDate;
    /// let date = PlainDate::new(2003, 4, 19)?;
    /// assert_eq!(date.year(), 2003);
    /// assert_eq!(date.month(), 4);
    /// assert_eq!(date.day(), 19);
    /// assert!(PlainDate::new(2013, 2, 29).is_err());
    /// # Ok::<_, tempora::Error>(())
    /// ```
    #[inline]
    pub const fn new(year: i32, month: u8, day: u8) -> Result<Self, Error> {
        ensure_in_range!(month, 1 => 12);
        ensure_in_range!(day, 1 => days_in_month(year, month));
        let epoch = date_to_epoch_days(year, month, day);
        ensure_in_range!(epoch, MIN_EPOCH_DAYS => MAX_EPOCH_DAYS);
        Ok(Self { year, month, day })
    }

    /// Creates a date from the number of days since the unix epoch.
    pub const fn from_epoch_days(days: i64) -> Result<Self, Error> {
        ensure_in_range!(days, MIN_EPOCH_DAYS => MAX_EPOCH_DAYS);
        let (year, month, day) = date_from_epoch_days(days);
        Ok(Self { year, month, day })
    }

    /// Creates a date from the given year and ordinal day of year.
    ///
    /// If the ordinal is out of bounds (`1..=366`) then [`Error`] is
    /// returned. Note that 366 is also invalid if the year is not a leap
    /// year.
    ///
    /// # Examples
    ///
    /// ```
    /// # use tempora::PlainDate;
    /// assert_eq!(PlainDate::from_ordinal(1992, 62)?, PlainDate::new(1992, 3, 2)?); // leap year
    /// assert!(PlainDate::from_ordinal(2013, 366).is_err()); // not a leap year
    /// assert_eq!(PlainDate::from_ordinal(2012, 366)?, PlainDate::new(2012, 12, 31)?);
    /// # Ok::<_, tempora::Error>(())
    /// ```
    pub const fn from_ordinal(year: i32, ordinal: u16) -> Result<Self, Error> {
        ensure_in_range!(ordinal, 1 => days_in_year(year));
        let epoch = date_to_epoch_days(year, 1, 1) - 1 + ordinal as i64;
        Self::from_epoch_days(epoch)
    }

    /// Returns the year.
    ///
    /// Note that year 0 is equivalent to 1 BC (or BCE) and year 1 is
    /// equivalent to 1 AD (or CE).
    #[inline]
    #[must_use]
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// Returns the month. This value will always be within `1..=12`.
    #[inline]
    #[must_use]
    pub const fn month(&self) -> u8 {
        self.month
    }

    /// Returns the day. This value will always be within `1..=31`.
    #[inline]
    #[must_use]
    pub const fn day(&self) -> u8 {
        self.day
    }

    /// Returns the calendar identifier of this date, which is always
    /// `"iso8601"`. Era-based projections go through [`crate::Calendar`].
    #[inline]
    #[must_use]
    pub const fn calendar_id(&self) -> &'static str {
        "iso8601"
    }

    /// Returns the day of the year.
    ///
    /// January 1st is 1 and December 31st is either 365 or 366 depending on
    /// leap year.
    #[inline]
    #[must_use]
    pub const fn day_of_year(&self) -> u16 {
        date_to_ordinal(self.year, self.month, self.day)
    }

    /// Returns the number of days since the unix epoch (1970-01-01).
    #[inline]
    #[must_use]
    pub const fn epoch_days(&self) -> i64 {
        date_to_epoch_days(self.year, self.month, self.day)
    }

    /// Returns the weekday.
    ///
    /// # Examples
    ///
    /// ```
    /// # use tempora::{PlainDate, Weekday};
    /// assert_eq!(PlainDate::new(2021, 12, 25)?.day_of_week(), Weekday::Saturday);
    /// assert_eq!(PlainDate::new(2012, 2, 29)?.day_of_week(), Weekday::Wednesday);
    /// # Ok::<_, tempora::Error>(())
    /// ```
    #[inline]
    #[must_use]
    pub const fn day_of_week(&self) -> Weekday {
        Weekday::from_sunday_index(weekday_from_days(self.epoch_days()))
    }

    /// Returns the number of days in this date's month.
    #[inline]
    #[must_use]
    pub const fn days_in_month(&self) -> u8 {
        days_in_month(self.year, self.month)
    }

    /// Returns the number of days in this date's year, either 365 or 366.
    #[inline]
    #[must_use]
    pub const fn days_in_year(&self) -> u16 {
        days_in_year(self.year)
    }

    /// Returns the number of months in this date's year.
    #[inline]
    #[must_use]
    pub const fn months_in_year(&self) -> u8 {
        12
    }

    /// Returns `true` if this date falls in a leap year.
    #[inline]
    #[must_use]
    pub const fn in_leap_year(&self) -> bool {
        is_leap_year(self.year)
    }

    /// Returns the ISO week date for this date.
    ///
    /// Note that the familiar notion of a year is different under the ISO
    /// week date.
    ///
    /// ```
    /// use tempora::{PlainDate, Weekday};
    ///
    /// // January 1st 1995 is a Sunday
    /// let iso = PlainDate::new(1995, 1, 1)?.iso_week();
    /// assert_eq!(iso.weekday(), Weekday::Sunday);
    /// // Despite being 1995 in Gregorian it is the 52nd week of 1994
    /// assert_eq!(iso.year(), 1994);
    /// assert_eq!(iso.week(), 52);
    ///
    /// // Despite December 31st 1996 being in 1996, it's the 1st week of ISO year 1997.
    /// let iso = PlainDate::new(1996, 12, 31)?.iso_week();
    /// assert_eq!(iso.year(), 1997);
    /// assert_eq!(iso.week(), 1);
    /// # Ok::<_, tempora::Error>(())
    /// ```
    #[must_use]
    pub const fn iso_week(&self) -> IsoWeekDate {
        let epoch = self.epoch_days();
        let start_epoch = find_iso_week_start_epoch(self.year, epoch);
        let week = (epoch - start_epoch) / 7 + 1; // range: [1, 53]
        let (year, _, _) = date_from_epoch_days(start_epoch + 3); // Thursday - Monday = 3
        IsoWeekDate {
            year,
            week: week as u8,
            weekday: Weekday::from_sunday_index(weekday_from_days(epoch)),
        }
    }

    /// Returns the ISO week number, within `1..=53`.
    #[inline]
    #[must_use]
    pub const fn week_of_year(&self) -> u8 {
        self.iso_week().week
    }

    /// Returns the year the ISO week belongs to.
    #[inline]
    #[must_use]
    pub const fn year_of_week(&self) -> i32 {
        self.iso_week().year
    }

    /// Combines this date with a [`PlainTime`] to make a [`PlainDateTime`].
    #[inline]
    #[must_use]
    pub fn at(&self, time: PlainTime) -> PlainDateTime {
        PlainDateTime::from_parts(*self, time)
    }

    /// Returns a new [`PlainDate`] that points to the given year.
    ///
    /// If the year would make the date invalid, such as moving February 29th
    /// to a non-leap year, then [`Error`] is returned.
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub fn with_year(self, year: i32) -> Result<Self, Error> {
        Self::new(year, self.month, self.day)
    }

    /// Returns a new [`PlainDate`] that points to the given month.
    ///
    /// If the month is out of bounds (`1..=12`) or if the month does not
    /// have as many days as is currently specified then [`Error`] is
    /// returned.
    ///
    /// # Examples
    ///
    /// ```
    /// # use tempora::PlainDate;
    /// assert!(PlainDate::new(2012, 3, 30)?.with_month(2).is_err());
    /// assert!(PlainDate::new(2014, 12, 31)?.with_month(1).is_ok());
    /// assert!(PlainDate::new(2019, 4, 28)?.with_month(2).is_ok());
    /// # Ok::<_, tempora::Error>(())
    /// ```
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub fn with_month(self, month: u8) -> Result<Self, Error> {
        Self::new(self.year, month, self.day)
    }

    /// Returns a new [`PlainDate`] that points to the given day.
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub fn with_day(self, day: u8) -> Result<Self, Error> {
        Self::new(self.year, self.month, day)
    }

    /// Returns a new [`PlainDate`] with the given fields replaced.
    ///
    /// The `overflow` policy only applies to the day; any other
    /// out-of-range field is rejected unconditionally.
    ///
    /// ```rust
    /// use tempora::{DateFields, Overflow, PlainDate};
    /// let date = PlainDate::new(2024, 2, 29)?;
    /// let fields = DateFields::default().with_year(2023);
    /// assert_eq!(date.with(&fields, Overflow::Constrain)?, PlainDate::new(2023, 2, 28)?);
    /// # Ok::<_, tempora::Error>(())
    /// ```
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub fn with(&self, fields: &DateFields, overflow: Overflow) -> Result<Self, Error> {
        let merged = self.fields().merge(fields)?;
        crate::Calendar::Iso8601.date_from_fields(&merged, overflow)
    }

    /// Returns this date as a [`DateFields`] record.
    ///
    /// `date.with(&date.fields(), ..)` returns the date unchanged.
    #[must_use]
    pub fn fields(&self) -> DateFields {
        DateFields::default()
            .with_year(self.year)
            .with_month(self.month)
            .with_day(self.day)
    }

    pub(crate) fn add_days(&self, days: i64) -> Result<Self, Error> {
        if days == 0 {
            return Ok(*self);
        }
        match self.epoch_days().checked_add(days) {
            Some(epoch) if (MIN_EPOCH_DAYS..=MAX_EPOCH_DAYS).contains(&epoch) => Self::from_epoch_days(epoch),
            _ => Err(Error::Arithmetic),
        }
    }

    /// Adds months to the date, clamping the day to the end of the target
    /// month when it does not exist.
    pub(crate) fn add_months_clamped(&self, months: i64) -> Result<Self, Error> {
        if months == 0 {
            return Ok(*self);
        }
        let total = (self.year as i64 * 12 + self.month as i64 - 1)
            .checked_add(months)
            .ok_or(Error::Arithmetic)?;
        let year = total.div_euclid(12);
        let month = (total.rem_euclid(12) + 1) as u8;
        if !(i32::MIN as i64..=i32::MAX as i64).contains(&year) {
            return Err(Error::Arithmetic);
        }
        let year = year as i32;
        let day = self.day.min(days_in_month(year, month));
        Self::new(year, month, day).map_err(|_| Error::Arithmetic)
    }

    pub(crate) fn add_years_clamped(&self, years: i64) -> Result<Self, Error> {
        self.add_months_clamped(years.checked_mul(12).ok_or(Error::Arithmetic)?)
    }

    /// Adds a duration to this date.
    ///
    /// Years and months are added first with the day clamped or rejected
    /// according to `overflow`, then weeks and days are added in epoch-day
    /// space. Time components of the duration are ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use tempora::{Duration, Overflow, PlainDate};
    ///
    /// let date = PlainDate::new(2025, 1, 31)?;
    /// assert_eq!(
    ///     date.add(&Duration::from_months(1), Overflow::Constrain)?,
    ///     PlainDate::new(2025, 2, 28)?,
    /// );
    /// assert!(date.add(&Duration::from_months(1), Overflow::Reject).is_err());
    /// assert_eq!(
    ///     PlainDate::new(2024, 1, 31)?.add(&Duration::from_months(1), Overflow::Constrain)?,
    ///     PlainDate::new(2024, 2, 29)?,
    /// );
    /// # Ok::<_, tempora::Error>(())
    /// ```
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub fn add(&self, duration: &Duration, overflow: Overflow) -> Result<Self, Error> {
        let months = duration
            .years()
            .checked_mul(12)
            .and_then(|m| m.checked_add(duration.months()))
            .ok_or(Error::Arithmetic)?;
        let shifted = if months != 0 {
            let with_months = self.add_months_clamped(months)?;
            if matches!(overflow, Overflow::Reject) && with_months.day != self.day {
                return Err(Error::Arithmetic);
            }
            with_months
        } else {
            *self
        };
        let days = duration
            .weeks()
            .checked_mul(7)
            .and_then(|d| d.checked_add(duration.days()))
            .ok_or(Error::Arithmetic)?;
        shifted.add_days(days)
    }

    /// Subtracts a duration from this date. This is equivalent to adding the
    /// negated duration.
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub fn subtract(&self, duration: &Duration, overflow: Overflow) -> Result<Self, Error> {
        self.add(&duration.negated(), overflow)
    }

    /// Returns the duration from this date until `other`.
    ///
    /// The default largest unit is [`Unit::Day`]; larger units must be
    /// requested explicitly. The result, added back to this date with
    /// [`Overflow::Constrain`], lands exactly on `other`.
    ///
    /// ```rust
    /// use tempora::{PlainDate, Unit};
    /// let a = PlainDate::new(2012, 3, 29)?;
    /// let b = PlainDate::new(2012, 4, 30)?;
    /// let d = a.until(&b, Unit::Month)?;
    /// assert_eq!((d.months(), d.days()), (1, 1));
    /// # Ok::<_, tempora::Error>(())
    /// ```
    pub fn until(&self, other: &Self, options: impl Into<DifferenceOptions>) -> Result<Duration, Error> {
        let options = options.into();
        let (largest, smallest) = options.resolve(Unit::Day)?;
        let smallest = if smallest == Unit::Nanosecond { Unit::Day } else { smallest };
        if !largest.is_date_unit() || !smallest.is_date_unit() {
            return Err(Error::InvalidOption("unit"));
        }
        let result = self.until_in(other, largest)?;
        if smallest == Unit::Day && options.increment == 1 {
            return Ok(result);
        }
        result.round_relative(
            crate::duration::DurationRoundOptions {
                largest_unit: Some(largest),
                smallest_unit: Some(smallest),
                increment: options.increment,
                mode: options.mode,
            },
            &crate::RelativeTo::from(*self),
        )
    }

    /// Returns the duration from `other` until this date.
    pub fn since(&self, other: &Self, options: impl Into<DifferenceOptions>) -> Result<Duration, Error> {
        other.until(self, options)
    }

    /// The exact difference decomposed into units up to `largest`.
    pub(crate) fn until_in(&self, other: &Self, largest: Unit) -> Result<Duration, Error> {
        let mut years = 0i64;
        let mut months = 0i64;
        let mut anchor = *self;
        if largest == Unit::Year {
            years = years_between(&anchor, other)?;
            anchor = anchor.add_years_clamped(years)?;
        }
        if largest >= Unit::Month {
            months = months_between(&anchor, other)?;
            anchor = anchor.add_months_clamped(months)?;
        }
        let mut days = other.epoch_days() - anchor.epoch_days();
        let mut weeks = 0i64;
        if largest == Unit::Week {
            (weeks, days) = divrem!(days, 7);
        }
        Duration::new(years, months, weeks, days, 0, 0, 0, 0, 0, 0)
    }
}

// Lower level stepping algorithms to compute differences.
//
// The whole-unit count is found by probing with a clamped addition and
// backing off by one when the probe overshoots, which makes the resulting
// duration round-trip under `Overflow::Constrain`.
fn years_between(start: &PlainDate, end: &PlainDate) -> Result<i64, Error> {
    let diff = end.year as i64 - start.year as i64;
    let probe = start.add_years_clamped(diff)?;
    Ok(if start <= end {
        if &probe <= end {
            diff
        } else {
            diff - 1
        }
    } else if &probe >= end {
        diff
    } else {
        diff + 1
    })
}

fn months_between(start: &PlainDate, end: &PlainDate) -> Result<i64, Error> {
    let diff = (end.year as i64 - start.year as i64) * 12 + end.month as i64 - start.month as i64;
    let probe = start.add_months_clamped(diff)?;
    Ok(if start <= end {
        if &probe <= end {
            diff
        } else {
            diff - 1
        }
    } else if &probe >= end {
        diff
    } else {
        diff + 1
    })
}

impl From<IsoWeekDate> for PlainDate {
    fn from(iso: IsoWeekDate) -> Self {
        let epoch = iso_week_start_epoch_from_year(iso.year)
            + (iso.week as i64 - 1) * 7
            + iso.weekday.days_from_monday() as i64;
        let (year, month, day) = date_from_epoch_days(epoch);
        Self { year, month, day }
    }
}

impl core::fmt::Display for PlainDate {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        crate::fmt::write_year(f, self.year)?;
        write!(f, "-{:02}-{:02}", self.month, self.day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date;

    #[test]
    fn test_iso_week() {
        let iso = date!(2008 - 12 - 29).iso_week();
        assert_eq!((iso.year(), iso.week(), iso.weekday()), (2009, 1, Weekday::Monday));
        assert_eq!(PlainDate::from(iso), date!(2008 - 12 - 29));
    }

    #[test]
    fn test_month_stepping() {
        assert_eq!(date!(2020 - 1 - 31).add_months_clamped(1).unwrap(), date!(2020 - 2 - 29));
        assert_eq!(date!(2020 - 1 - 31).add_months_clamped(-2).unwrap(), date!(2019 - 11 - 30));
        assert_eq!(date!(2020 - 12 - 15).add_months_clamped(1).unwrap(), date!(2021 - 1 - 15));
        assert_eq!(date!(2020 - 1 - 15).add_months_clamped(-1).unwrap(), date!(2019 - 12 - 15));
    }

    #[test]
    fn test_until_round_trips_with_constrain() {
        let cases = [
            (date!(2019 - 1 - 30), date!(2021 - 2 - 14)),
            (date!(2020 - 2 - 29), date!(2021 - 3 - 1)),
            (date!(2021 - 3 - 1), date!(2020 - 2 - 29)),
            (date!(2020 - 1 - 31), date!(2020 - 3 - 30)),
        ];
        for (a, b) in cases {
            for largest in [Unit::Day, Unit::Week, Unit::Month, Unit::Year] {
                let d = a.until(&b, largest).unwrap();
                assert_eq!(a.add(&d, Overflow::Constrain).unwrap(), b, "{a} -> {b} via {largest:?}");
            }
        }
    }

    #[test]
    fn test_until_components() {
        let d = date!(2019 - 1 - 30).until(&date!(2021 - 2 - 14), Unit::Year).unwrap();
        assert_eq!((d.years(), d.months(), d.days()), (2, 0, 15));
        let d = date!(2021 - 2 - 14).until(&date!(2019 - 1 - 30), Unit::Year).unwrap();
        assert_eq!((d.years(), d.months(), d.days()), (-2, 0, -15));
    }

    #[test]
    fn test_ordinal_round_trip() {
        assert_eq!(date!(2012 - 2 - 29).day_of_year(), 60);
        assert_eq!(PlainDate::from_ordinal(2012, 60).unwrap(), date!(2012 - 2 - 29));
        assert_eq!(date!(2001 - 9 - 3).day_of_year(), 246);
    }
}
