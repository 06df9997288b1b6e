//! The calendar façade.
//!
//! Every supported calendar shares the ISO 8601 month structure; the
//! variants only remap year numbering into eras. That makes a tagged enum
//! with per-variant era tables the right shape here, rather than a trait
//! object hierarchy.

use crate::duration::Duration;
use crate::gregorian::days_in_month;
use crate::options::{Overflow, Unit};
use crate::{Error, IsoWeekDate, PlainDate, PlainMonthDay, PlainYearMonth, Weekday};

/// A month identifier independent of any year, `M01` through `M12`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthCode(u8);

impl MonthCode {
    /// Creates a month code from a month number within `1..=12`.
    pub const fn new(month: u8) -> Result<Self, Error> {
        if month >= 1 && month <= 12 {
            Ok(Self(month))
        } else {
            Err(Error::OutOfRange)
        }
    }

    /// Returns the month number within `1..=12`.
    #[inline]
    pub const fn month(self) -> u8 {
        self.0
    }
}

impl core::fmt::Display for MonthCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "M{:02}", self.0)
    }
}

impl core::str::FromStr for MonthCode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        if bytes.len() != 3 || bytes[0] != b'M' || !bytes[1].is_ascii_digit() || !bytes[2].is_ascii_digit() {
            return Err(Error::Parse("month code of the form M01"));
        }
        Self::new((bytes[1] - b'0') * 10 + (bytes[2] - b'0'))
    }
}

/// A partial record of calendar fields, used by `with` and the
/// `*_from_fields` constructors.
///
/// The year can be given either directly or as an era/eraYear pair for the
/// era-based calendars; the month either as a number or a [`MonthCode`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateFields {
    pub era: Option<String>,
    pub era_year: Option<i32>,
    pub year: Option<i32>,
    pub month: Option<u8>,
    pub month_code: Option<MonthCode>,
    pub day: Option<u8>,
}

impl DateFields {
    /// Returns a copy with the year set.
    #[must_use]
    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    /// Returns a copy with the month set.
    #[must_use]
    pub fn with_month(mut self, month: u8) -> Self {
        self.month = Some(month);
        self
    }

    /// Returns a copy with the month code set.
    #[must_use]
    pub fn with_month_code(mut self, month_code: MonthCode) -> Self {
        self.month_code = Some(month_code);
        self
    }

    /// Returns a copy with the day set.
    #[must_use]
    pub fn with_day(mut self, day: u8) -> Self {
        self.day = Some(day);
        self
    }

    /// Returns a copy with the era name set.
    #[must_use]
    pub fn with_era(mut self, era: impl Into<String>) -> Self {
        self.era = Some(era.into());
        self
    }

    /// Returns a copy with the year within the era set.
    #[must_use]
    pub fn with_era_year(mut self, era_year: i32) -> Self {
        self.era_year = Some(era_year);
        self
    }

    const fn has_year_group(&self) -> bool {
        self.year.is_some() || self.era.is_some() || self.era_year.is_some()
    }

    const fn has_month_group(&self) -> bool {
        self.month.is_some() || self.month_code.is_some()
    }

    /// Merges `other` on top of these fields.
    ///
    /// Fields that designate the same quantity form a group: supplying any
    /// member of the year group (`year`, `era`, `eraYear`) or the month
    /// group (`month`, `monthCode`) replaces that whole group, so stale
    /// halves cannot leak through.
    pub fn merge(&self, other: &Self) -> Result<Self, Error> {
        let mut merged = self.clone();
        if other.has_year_group() {
            merged.year = other.year;
            merged.era = other.era.clone();
            merged.era_year = other.era_year;
        }
        if other.has_month_group() {
            merged.month = other.month;
            merged.month_code = other.month_code;
        }
        if other.day.is_some() {
            merged.day = other.day;
        }
        Ok(merged)
    }

    fn resolve_month(&self) -> Result<u8, Error> {
        match (self.month, self.month_code) {
            (Some(month), Some(code)) => {
                if code.month() != month {
                    return Err(Error::OutOfRange);
                }
                Ok(month)
            }
            (Some(month), None) => Ok(month),
            (None, Some(code)) => Ok(code.month()),
            (None, None) => Err(Error::MissingField("month")),
        }
    }
}

const JAPANESE_ERAS: [(&str, i32, u8, u8); 5] = [
    ("meiji", 1868, 10, 23),
    ("taisho", 1912, 7, 30),
    ("showa", 1926, 12, 25),
    ("heisei", 1989, 1, 8),
    ("reiwa", 2019, 5, 1),
];

/// A calendar system.
///
/// All variants share the ISO month structure; only year numbering, era
/// assignment, and era-year computation differ. Lunisolar month structures
/// are out of scope.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Calendar {
    #[default]
    Iso8601,
    Gregory,
    Buddhist,
    Roc,
    Japanese,
}

impl Calendar {
    /// Returns the calendar identifier, e.g. `"iso8601"`.
    pub const fn identifier(&self) -> &'static str {
        match self {
            Calendar::Iso8601 => "iso8601",
            Calendar::Gregory => "gregory",
            Calendar::Buddhist => "buddhist",
            Calendar::Roc => "roc",
            Calendar::Japanese => "japanese",
        }
    }

    /// Returns `true` for the ISO 8601 calendar.
    #[inline]
    pub const fn is_iso(&self) -> bool {
        matches!(self, Calendar::Iso8601)
    }

    /// Returns the era the date falls in, or `None` for the ISO calendar.
    ///
    /// # Examples
    ///
    /// ```
    /// # use tempora::{Calendar, PlainDate};
    /// let date = PlainDate::new(2025, 3, 14)?;
    /// assert_eq!(Calendar::Gregory.era(&date), Some("ce"));
    /// assert_eq!(Calendar::Japanese.era(&date), Some("reiwa"));
    /// assert_eq!(Calendar::Iso8601.era(&date), None);
    /// # Ok::<_, tempora::Error>(())
    /// ```
    pub fn era(&self, date: &PlainDate) -> Option<&'static str> {
        match self {
            Calendar::Iso8601 => None,
            Calendar::Gregory => Some(if date.year() >= 1 { "ce" } else { "bce" }),
            Calendar::Buddhist => Some("be"),
            Calendar::Roc => Some(if date.year() >= 1912 { "roc" } else { "before-roc" }),
            Calendar::Japanese => Some(match japanese_era_index(date) {
                Some(idx) => JAPANESE_ERAS[idx].0,
                None => "japanese",
            }),
        }
    }

    /// Returns the year within the date's era, or `None` for the ISO calendar.
    ///
    /// ```
    /// # use tempora::{Calendar, PlainDate};
    /// let date = PlainDate::new(2025, 3, 14)?;
    /// assert_eq!(Calendar::Buddhist.era_year(&date), Some(2568));
    /// assert_eq!(Calendar::Roc.era_year(&date), Some(114));
    /// assert_eq!(Calendar::Japanese.era_year(&date), Some(7)); // Reiwa 7
    /// # Ok::<_, tempora::Error>(())
    /// ```
    pub fn era_year(&self, date: &PlainDate) -> Option<i32> {
        let year = date.year();
        match self {
            Calendar::Iso8601 => None,
            Calendar::Gregory => Some(if year >= 1 { year } else { 1 - year }),
            Calendar::Buddhist => Some(year + 543),
            Calendar::Roc => Some(if year >= 1912 { year - 1911 } else { 1912 - year }),
            Calendar::Japanese => Some(match japanese_era_index(date) {
                Some(idx) => year - JAPANESE_ERAS[idx].1 + 1,
                None => year,
            }),
        }
    }

    /// Returns the display year of the date under this calendar.
    ///
    /// For the ISO and Gregorian calendars this is the ISO year itself.
    pub fn year(&self, date: &PlainDate) -> i32 {
        let year = date.year();
        match self {
            Calendar::Iso8601 | Calendar::Gregory => year,
            Calendar::Buddhist => year + 543,
            Calendar::Roc => year - 1911,
            Calendar::Japanese => match japanese_era_index(date) {
                Some(idx) => year - JAPANESE_ERAS[idx].1 + 1,
                None => year,
            },
        }
    }

    /// Returns the month number. Identical to ISO for every supported calendar.
    pub fn month(&self, date: &PlainDate) -> u8 {
        date.month()
    }

    /// Returns the month code.
    pub fn month_code(&self, date: &PlainDate) -> MonthCode {
        MonthCode(date.month())
    }

    /// Returns the day of the month.
    pub fn day(&self, date: &PlainDate) -> u8 {
        date.day()
    }

    /// Returns the day of the week.
    pub fn day_of_week(&self, date: &PlainDate) -> Weekday {
        date.day_of_week()
    }

    /// Returns the day of the year.
    pub fn day_of_year(&self, date: &PlainDate) -> u16 {
        date.day_of_year()
    }

    /// Returns the ISO week of the year.
    pub fn week_of_year(&self, date: &PlainDate) -> u8 {
        date.week_of_year()
    }

    /// Returns the year the ISO week belongs to.
    pub fn year_of_week(&self, date: &PlainDate) -> i32 {
        date.year_of_week()
    }

    /// Returns the ISO week date.
    pub fn iso_week(&self, date: &PlainDate) -> IsoWeekDate {
        date.iso_week()
    }

    /// Returns the number of days in the date's month.
    pub fn days_in_month(&self, date: &PlainDate) -> u8 {
        date.days_in_month()
    }

    /// Returns the number of days in the date's year.
    pub fn days_in_year(&self, date: &PlainDate) -> u16 {
        date.days_in_year()
    }

    /// Returns the number of months in the date's year, always 12.
    pub fn months_in_year(&self, date: &PlainDate) -> u8 {
        date.months_in_year()
    }

    /// Returns `true` if the date falls in an ISO leap year.
    pub fn in_leap_year(&self, date: &PlainDate) -> bool {
        date.in_leap_year()
    }

    /// Adds a duration to a date under this calendar.
    ///
    /// Month structure is ISO for every supported calendar, so this
    /// delegates to the ISO date arithmetic.
    pub fn date_add(&self, date: &PlainDate, duration: &Duration, overflow: Overflow) -> Result<PlainDate, Error> {
        date.add(duration, overflow)
    }

    /// Computes the difference between two dates under this calendar.
    pub fn date_until(&self, start: &PlainDate, end: &PlainDate, largest_unit: Unit) -> Result<Duration, Error> {
        if !largest_unit.is_date_unit() {
            return Err(Error::InvalidOption("largestUnit"));
        }
        start.until_in(end, largest_unit)
    }

    /// Resolves a field record into a [`PlainDate`].
    ///
    /// The year may be given as an era/eraYear pair for era calendars; the
    /// month as a number or code. `overflow` only governs the day: a day
    /// past the end of the month clamps under [`Overflow::Constrain`] and
    /// fails otherwise.
    ///
    /// ```rust
    /// use tempora::{Calendar, DateFields, Overflow, PlainDate};
    /// let fields = DateFields::default().with_era("reiwa").with_era_year(7).with_month(3).with_day(14);
    /// let date = Calendar::Japanese.date_from_fields(&fields, Overflow::Constrain)?;
    /// assert_eq!(date, PlainDate::new(2025, 3, 14)?);
    /// # Ok::<_, tempora::Error>(())
    /// ```
    pub fn date_from_fields(&self, fields: &DateFields, overflow: Overflow) -> Result<PlainDate, Error> {
        let year = self.resolve_year(fields)?;
        let month = fields.resolve_month()?;
        let day = fields.day.ok_or(Error::MissingField("day"))?;
        build_date(year, month, day, overflow)
    }

    /// Resolves a field record into a [`PlainYearMonth`]. The day is ignored.
    pub fn year_month_from_fields(&self, fields: &DateFields, _overflow: Overflow) -> Result<PlainYearMonth, Error> {
        let year = self.resolve_year(fields)?;
        let month = fields.resolve_month()?;
        PlainYearMonth::new(year, month)
    }

    /// Resolves a field record into a [`PlainMonthDay`].
    ///
    /// Without a year, Feb 29 is anchored against the reference leap year.
    pub fn month_day_from_fields(&self, fields: &DateFields, overflow: Overflow) -> Result<PlainMonthDay, Error> {
        let month = fields.resolve_month()?;
        let day = fields.day.ok_or(Error::MissingField("day"))?;
        let year = match fields.year {
            Some(year) => year,
            None => PlainMonthDay::REFERENCE_YEAR,
        };
        let date = build_date(year, month, day, overflow)?;
        PlainMonthDay::new(date.month(), date.day())
    }

    /// Filters and augments a list of field names for this calendar.
    ///
    /// Era calendars express years as era/eraYear pairs, so requesting
    /// `"year"` from them additionally yields those two fields.
    pub fn fields(&self, names: &[&str]) -> Result<Vec<&'static str>, Error> {
        let mut out = Vec::with_capacity(names.len() + 2);
        for name in names {
            let canonical = match *name {
                "year" => "year",
                "month" => "month",
                "monthCode" => "monthCode",
                "day" => "day",
                _ => return Err(Error::InvalidOption("fields")),
            };
            out.push(canonical);
            if canonical == "year" && !self.is_iso() {
                out.push("era");
                out.push("eraYear");
            }
        }
        Ok(out)
    }

    /// Merges two field records under this calendar's grouping rules.
    pub fn merge_fields(&self, base: &DateFields, additional: &DateFields) -> Result<DateFields, Error> {
        base.merge(additional)
    }

    /// Projects a date into a complete [`DateFields`] record under this
    /// calendar, suitable for merging and resolving back.
    pub fn date_fields(&self, date: &PlainDate) -> DateFields {
        let fields = DateFields::default().with_month(date.month()).with_day(date.day());
        match (self.era(date), self.era_year(date)) {
            (Some(era), Some(era_year)) => fields.with_era(era).with_era_year(era_year),
            _ => fields.with_year(date.year()),
        }
    }

    fn resolve_year(&self, fields: &DateFields) -> Result<i32, Error> {
        if let Some(year) = fields.year {
            // A bare year is the calendar's display year. The Japanese
            // calendar has no era-free display year, so the absolute ISO
            // year applies there, mirroring the pre-Meiji fallback.
            return Ok(match self {
                Calendar::Iso8601 | Calendar::Gregory | Calendar::Japanese => year,
                Calendar::Buddhist => year - 543,
                Calendar::Roc => year + 1911,
            });
        }
        let (era, era_year) = match (&fields.era, fields.era_year) {
            (Some(era), Some(era_year)) => (era.as_str(), era_year),
            (None, None) => return Err(Error::MissingField("year")),
            _ => return Err(Error::MissingField("eraYear")),
        };
        match self {
            Calendar::Iso8601 => Err(Error::InvalidOption("era")),
            Calendar::Gregory => match era {
                "ce" => Ok(era_year),
                "bce" => Ok(1 - era_year),
                _ => Err(Error::InvalidOption("era")),
            },
            Calendar::Buddhist => match era {
                "be" => Ok(era_year - 543),
                _ => Err(Error::InvalidOption("era")),
            },
            Calendar::Roc => match era {
                "roc" => Ok(era_year + 1911),
                "before-roc" => Ok(1912 - era_year),
                _ => Err(Error::InvalidOption("era")),
            },
            Calendar::Japanese => {
                if era == "japanese" {
                    return Ok(era_year);
                }
                for (name, start_year, _, _) in JAPANESE_ERAS {
                    if era == name {
                        return Ok(start_year + era_year - 1);
                    }
                }
                Err(Error::InvalidOption("era"))
            }
        }
    }
}

impl core::str::FromStr for Calendar {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "iso8601" => Ok(Calendar::Iso8601),
            "gregory" => Ok(Calendar::Gregory),
            "buddhist" => Ok(Calendar::Buddhist),
            "roc" => Ok(Calendar::Roc),
            "japanese" => Ok(Calendar::Japanese),
            _ => Err(Error::UnsupportedCalendar),
        }
    }
}

impl core::fmt::Display for Calendar {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.identifier())
    }
}

/// The index of the emperor reign the date falls in, or `None` before Meiji.
fn japanese_era_index(date: &PlainDate) -> Option<usize> {
    let key = (date.year(), date.month(), date.day());
    JAPANESE_ERAS
        .iter()
        .rposition(|&(_, year, month, day)| key >= (year, month, day))
}

fn build_date(year: i32, month: u8, day: u8, overflow: Overflow) -> Result<PlainDate, Error> {
    if !(1..=12).contains(&month) || day == 0 {
        return Err(Error::OutOfRange);
    }
    let last = days_in_month(year, month);
    if day > last {
        return match overflow {
            Overflow::Constrain => PlainDate::new(year, month, last),
            Overflow::Reject => Err(Error::OutOfRange),
        };
    }
    PlainDate::new(year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date;

    #[test]
    fn test_buddhist_projection() {
        let d = date!(2025 - 3 - 14);
        assert_eq!(Calendar::Buddhist.year(&d), 2568);
        assert_eq!(Calendar::Buddhist.era_year(&d), Some(2568));
        assert_eq!(Calendar::Buddhist.era(&d), Some("be"));
    }

    #[test]
    fn test_gregory_bce() {
        // ISO year 0 is 1 BCE.
        let d = date!(0 - 6 - 1);
        assert_eq!(Calendar::Gregory.era(&d), Some("bce"));
        assert_eq!(Calendar::Gregory.era_year(&d), Some(1));
        let d = date!(-10 - 6 - 1);
        assert_eq!(Calendar::Gregory.era_year(&d), Some(11));
    }

    #[test]
    fn test_roc() {
        let d = date!(2025 - 3 - 14);
        assert_eq!(Calendar::Roc.era(&d), Some("roc"));
        assert_eq!(Calendar::Roc.era_year(&d), Some(114));
        assert_eq!(Calendar::Roc.year(&d), 114);
        let d = date!(1900 - 1 - 1);
        assert_eq!(Calendar::Roc.era(&d), Some("before-roc"));
        assert_eq!(Calendar::Roc.era_year(&d), Some(12));
    }

    #[test]
    fn test_japanese_reign_boundaries() {
        // Heisei ended April 30th 2019; Reiwa began May 1st.
        let d = date!(2019 - 4 - 30);
        assert_eq!(Calendar::Japanese.era(&d), Some("heisei"));
        assert_eq!(Calendar::Japanese.era_year(&d), Some(31));
        let d = date!(2019 - 5 - 1);
        assert_eq!(Calendar::Japanese.era(&d), Some("reiwa"));
        assert_eq!(Calendar::Japanese.era_year(&d), Some(1));
        // Before Meiji the absolute year is used.
        let d = date!(1850 - 1 - 1);
        assert_eq!(Calendar::Japanese.era(&d), Some("japanese"));
        assert_eq!(Calendar::Japanese.era_year(&d), Some(1850));
    }

    #[test]
    fn test_era_round_trip_from_fields() {
        for calendar in [Calendar::Gregory, Calendar::Buddhist, Calendar::Roc, Calendar::Japanese] {
            for date in [date!(2025 - 3 - 14), date!(1907 - 2 - 1), date!(1989 - 1 - 7)] {
                let fields = DateFields::default()
                    .with_era(calendar.era(&date).unwrap())
                    .with_era_year(calendar.era_year(&date).unwrap())
                    .with_month(date.month())
                    .with_day(date.day());
                let resolved = calendar.date_from_fields(&fields, Overflow::Reject).unwrap();
                assert_eq!(resolved, date, "{calendar:?} {date}");
            }
        }
    }

    #[test]
    fn test_unknown_calendar() {
        assert_eq!("hebrew".parse::<Calendar>(), Err(Error::UnsupportedCalendar));
    }

    #[test]
    fn test_month_code() {
        assert_eq!("M04".parse::<MonthCode>().unwrap().month(), 4);
        assert_eq!(MonthCode::new(12).unwrap().to_string(), "M12");
        assert!("M13".parse::<MonthCode>().is_err());
        assert!("4".parse::<MonthCode>().is_err());
    }
}
