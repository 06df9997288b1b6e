//! Parsing to and from the ISO 8601 based string formats.
//!
//! Every value type has exactly one grammar, implemented through [`FromStr`]
//! and mirrored by its `Display` implementation, with a round-trip
//! guarantee between the two. The grammars are strict: structurally
//! malformed input fails with [`Error::Parse`], while well-formed input
//! carrying out-of-range fields surfaces the constructor's own error.
//!
//! [`FromStr`]: core::str::FromStr

use core::str::FromStr;

use crate::duration::Duration;
use crate::options::Disambiguation;
use crate::{
    Calendar, Error, Instant, PlainDate, PlainDateTime, PlainMonthDay, PlainTime, PlainYearMonth, TimeZone,
    UtcOffset, ZonedDateTime,
};

/// Writes a year as four digits, or sign plus six digits outside 0..=9999.
pub(crate) fn write_year(f: &mut core::fmt::Formatter<'_>, year: i32) -> core::fmt::Result {
    if (0..=9999).contains(&year) {
        write!(f, "{year:04}")
    } else {
        // The sign is part of the seven-character width.
        write!(f, "{year:+07}")
    }
}

/// Writes a fractional-second suffix, trimming trailing all-zero components.
pub(crate) fn write_subseconds(
    f: &mut core::fmt::Formatter<'_>,
    millisecond: u16,
    microsecond: u16,
    nanosecond: u16,
) -> core::fmt::Result {
    if nanosecond != 0 {
        write!(f, ".{millisecond:03}{microsecond:03}{nanosecond:03}")
    } else if microsecond != 0 {
        write!(f, ".{millisecond:03}{microsecond:03}")
    } else if millisecond != 0 {
        write!(f, ".{millisecond:03}")
    } else {
        Ok(())
    }
}

struct Parser<'a> {
    data: &'a [u8],
}

impl<'a> Parser<'a> {
    fn new(s: &'a str) -> Self {
        Self { data: s.as_bytes() }
    }

    fn peek(&self) -> Option<u8> {
        self.data.first().copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let (&first, rest) = self.data.split_first()?;
        self.data = rest;
        Some(first)
    }

    fn advance_if(&mut self, expected: u8) -> bool {
        if self.peek() == Some(expected) {
            self.data = &self.data[1..];
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: u8, message: &'static str) -> Result<(), Error> {
        if self.advance_if(expected) {
            Ok(())
        } else {
            Err(Error::Parse(message))
        }
    }

    fn expect_end(&self) -> Result<(), Error> {
        if self.data.is_empty() {
            Ok(())
        } else {
            Err(Error::Parse("end of input"))
        }
    }

    fn parse_digit(&mut self) -> Result<u8, Error> {
        match self.peek() {
            Some(b) if b.is_ascii_digit() => {
                self.data = &self.data[1..];
                Ok(b - b'0')
            }
            _ => Err(Error::Parse("a digit")),
        }
    }

    fn parse_two_digits(&mut self) -> Result<u8, Error> {
        Ok(self.parse_digit()? * 10 + self.parse_digit()?)
    }

    /// `YYYY`, or a sign followed by exactly six digits for extended years.
    fn parse_year(&mut self) -> Result<i32, Error> {
        let sign = match self.peek() {
            Some(b'+') => {
                self.data = &self.data[1..];
                Some(1)
            }
            Some(b'-') => {
                self.data = &self.data[1..];
                Some(-1)
            }
            _ => None,
        };
        match sign {
            Some(sign) => {
                let mut year = 0i32;
                for _ in 0..6 {
                    year = year * 10 + self.parse_digit()? as i32;
                }
                if sign < 0 && year == 0 {
                    return Err(Error::Parse("a non-negative zero year"));
                }
                Ok(sign * year)
            }
            None => {
                let mut year = 0i32;
                for _ in 0..4 {
                    year = year * 10 + self.parse_digit()? as i32;
                }
                Ok(year)
            }
        }
    }

    /// `.fraction` with one to nine digits, split into sub-second components.
    fn parse_fraction(&mut self) -> Result<(u16, u16, u16), Error> {
        let mut nanos = 0u32;
        let mut digits = 0;
        while let Some(b) = self.peek() {
            if !b.is_ascii_digit() {
                break;
            }
            if digits == 9 {
                return Err(Error::Parse("at most nine fractional digits"));
            }
            nanos = nanos * 10 + (b - b'0') as u32;
            digits += 1;
            self.data = &self.data[1..];
        }
        if digits == 0 {
            return Err(Error::Parse("a fractional digit"));
        }
        for _ in digits..9 {
            nanos *= 10;
        }
        Ok((
            (nanos / 1_000_000) as u16,
            (nanos / 1_000 % 1_000) as u16,
            (nanos % 1_000) as u16,
        ))
    }

    /// `YYYY-MM-DD` with optional extended years.
    fn parse_date(&mut self) -> Result<PlainDate, Error> {
        let year = self.parse_year()?;
        self.expect(b'-', "`-` after the year")?;
        let month = self.parse_two_digits()?;
        self.expect(b'-', "`-` after the month")?;
        let day = self.parse_two_digits()?;
        PlainDate::new(year, month, day)
    }

    /// `HH:MM:SS` with an optional fraction.
    fn parse_time(&mut self) -> Result<PlainTime, Error> {
        let hour = self.parse_two_digits()?;
        self.expect(b':', "`:` after the hour")?;
        let minute = self.parse_two_digits()?;
        self.expect(b':', "`:` after the minute")?;
        let second = self.parse_two_digits()?;
        let (millisecond, microsecond, nanosecond) = if self.advance_if(b'.') {
            self.parse_fraction()?
        } else {
            (0, 0, 0)
        };
        PlainTime::new(hour, minute, second, millisecond, microsecond, nanosecond)
    }

    /// `±HH:MM`, tolerating a `:SS` tail for sub-minute historical offsets.
    fn parse_utc_offset(&mut self) -> Result<UtcOffset, Error> {
        let sign = match self.advance() {
            Some(b'+') => 1,
            Some(b'-') => -1,
            _ => return Err(Error::Parse("`+` or `-` starting an offset")),
        };
        let hours = self.parse_two_digits()? as i32;
        self.expect(b':', "`:` within an offset")?;
        let minutes = self.parse_two_digits()? as i32;
        let seconds = if self.advance_if(b':') {
            self.parse_two_digits()? as i32
        } else {
            0
        };
        if minutes > 59 || seconds > 59 {
            return Err(Error::OutOfRange);
        }
        UtcOffset::from_seconds(sign * (hours * 3600 + minutes * 60 + seconds))
    }

    /// `Z` or `±HH:MM`.
    fn parse_offset_or_utc(&mut self) -> Result<UtcOffset, Error> {
        if self.advance_if(b'Z') || self.advance_if(b'z') {
            Ok(UtcOffset::UTC)
        } else {
            self.parse_utc_offset()
        }
    }

    /// `[<id>]` naming a time zone: an IANA identifier or a fixed offset.
    fn parse_time_zone_annotation(&mut self) -> Result<TimeZone, Error> {
        self.expect(b'[', "`[` starting a timezone annotation")?;
        let end = self
            .data
            .iter()
            .position(|&b| b == b']')
            .ok_or(Error::Parse("`]` closing a timezone annotation"))?;
        let id = core::str::from_utf8(&self.data[..end]).map_err(|_| Error::Parse("a UTF-8 zone identifier"))?;
        self.data = &self.data[end + 1..];
        match id.as_bytes().first() {
            Some(b'+' | b'-') => {
                let mut offset_parser = Parser::new(id);
                let offset = offset_parser.parse_utc_offset()?;
                offset_parser.expect_end()?;
                Ok(TimeZone::fixed(offset))
            }
            _ => TimeZone::named(id),
        }
    }

    /// `[u-ca=<id>]`.
    fn parse_calendar_annotation(&mut self) -> Result<Calendar, Error> {
        for &b in b"[u-ca=" {
            self.expect(b, "`[u-ca=` starting a calendar annotation")?;
        }
        let end = self
            .data
            .iter()
            .position(|&b| b == b']')
            .ok_or(Error::Parse("`]` closing a calendar annotation"))?;
        let id = core::str::from_utf8(&self.data[..end]).map_err(|_| Error::UnsupportedCalendar)?;
        self.data = &self.data[end + 1..];
        id.parse()
    }

    /// An unsigned integer for a duration component.
    fn parse_component(&mut self) -> Result<i64, Error> {
        let mut value = 0i64;
        let mut any = false;
        while let Some(b) = self.peek() {
            if !b.is_ascii_digit() {
                break;
            }
            value = value
                .checked_mul(10)
                .and_then(|v| v.checked_add((b - b'0') as i64))
                .ok_or(Error::OutOfRange)?;
            any = true;
            self.data = &self.data[1..];
        }
        if any {
            Ok(value)
        } else {
            Err(Error::Parse("a digit"))
        }
    }

    fn parse_duration(&mut self) -> Result<Duration, Error> {
        let sign: i64 = if self.advance_if(b'-') { -1 } else { 1 };
        self.expect(b'P', "`P` starting a duration")?;

        let mut components = [0i64; 4]; // years, months, weeks, days
        let designators = [b'Y', b'M', b'W', b'D'];
        let mut slot = 0;
        let mut seen = false;
        while slot < 4 && self.peek().map_or(false, |b| b.is_ascii_digit()) {
            let value = self.parse_component()?;
            let designator = self.advance().ok_or(Error::Parse("a unit designator"))?;
            let Some(idx) = designators[slot..].iter().position(|&d| d == designator) else {
                return Err(Error::Parse("a date unit designator"));
            };
            components[slot + idx] = value;
            slot += idx + 1;
            seen = true;
        }
        let [years, months, weeks, days] = components;

        let mut hours = 0;
        let mut minutes = 0;
        let mut seconds = 0;
        let mut fraction = (0u16, 0u16, 0u16);
        if self.advance_if(b'T') {
            let designators = [b'H', b'M', b'S'];
            let mut slot = 0;
            let mut time_seen = false;
            while slot < 3 && self.peek().map_or(false, |b| b.is_ascii_digit()) {
                let value = self.parse_component()?;
                let with_fraction = self.advance_if(b'.');
                if with_fraction {
                    fraction = self.parse_fraction()?;
                    self.expect(b'S', "`S` after fractional seconds")?;
                    seconds = value;
                    slot = 3;
                    time_seen = true;
                    break;
                }
                let designator = self.advance().ok_or(Error::Parse("a unit designator"))?;
                let Some(idx) = designators[slot..].iter().position(|&d| d == designator) else {
                    return Err(Error::Parse("a time unit designator"));
                };
                match slot + idx {
                    0 => hours = value,
                    1 => minutes = value,
                    _ => seconds = value,
                }
                slot += idx + 1;
                time_seen = true;
            }
            if !time_seen {
                return Err(Error::Parse("a time component after `T`"));
            }
            seen = true;
        }
        if !seen {
            return Err(Error::Parse("at least one duration component"));
        }

        Duration::new(
            sign * years,
            sign * months,
            sign * weeks,
            sign * days,
            sign * hours,
            sign * minutes,
            sign * seconds,
            sign * fraction.0 as i64,
            sign * fraction.1 as i64,
            sign * fraction.2 as i64,
        )
    }
}

impl FromStr for PlainDate {
    type Err = Error;

    /// Parses `YYYY-MM-DD`, with extended years written as a sign and six
    /// digits (e.g. `-271821-04-19`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parser = Parser::new(s);
        let date = parser.parse_date()?;
        parser.expect_end()?;
        Ok(date)
    }
}

impl FromStr for PlainTime {
    type Err = Error;

    /// Parses `HH:MM:SS` with an optional fraction of one to nine digits,
    /// e.g. `09:32:47.0005`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parser = Parser::new(s);
        let time = parser.parse_time()?;
        parser.expect_end()?;
        Ok(time)
    }
}

impl FromStr for PlainDateTime {
    type Err = Error;

    /// Parses `<date>T<time>` with an optional `[u-ca=<id>]` annotation.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parser = Parser::new(s);
        let date = parser.parse_date()?;
        parser.expect(b'T', "`T` between date and time")?;
        let time = parser.parse_time()?;
        let calendar = if parser.peek() == Some(b'[') {
            parser.parse_calendar_annotation()?
        } else {
            Calendar::Iso8601
        };
        parser.expect_end()?;
        Ok(PlainDateTime::from_parts(date, time).with_calendar(calendar))
    }
}

impl FromStr for PlainYearMonth {
    type Err = Error;

    /// Parses `YYYY-MM`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parser = Parser::new(s);
        let year = parser.parse_year()?;
        parser.expect(b'-', "`-` after the year")?;
        let month = parser.parse_two_digits()?;
        parser.expect_end()?;
        PlainYearMonth::new(year, month)
    }
}

impl FromStr for PlainMonthDay {
    type Err = Error;

    /// Parses `--MM-DD`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parser = Parser::new(s);
        parser.expect(b'-', "`--` starting a month-day")?;
        parser.expect(b'-', "`--` starting a month-day")?;
        let month = parser.parse_two_digits()?;
        parser.expect(b'-', "`-` after the month")?;
        let day = parser.parse_two_digits()?;
        parser.expect_end()?;
        PlainMonthDay::new(month, day)
    }
}

impl FromStr for Instant {
    type Err = Error;

    /// Parses `<date>T<time>` followed by `Z` or a UTC offset, e.g.
    /// `2025-03-14T09:32:47Z` or `2025-03-14T10:32:47+01:00`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parser = Parser::new(s);
        let date = parser.parse_date()?;
        parser.expect(b'T', "`T` between date and time")?;
        let time = parser.parse_time()?;
        let offset = parser.parse_offset_or_utc()?;
        parser.expect_end()?;
        let local = PlainDateTime::from_parts(date, time);
        let nanos = local.epoch_nanoseconds_naive() - offset.total_nanoseconds() as i128;
        match i64::try_from(nanos) {
            Ok(nanos) => Ok(Instant::from_epoch_nanoseconds(nanos)),
            Err(_) => Err(Error::OutOfRange),
        }
    }
}

impl FromStr for ZonedDateTime {
    type Err = Error;

    /// Parses `<date>T<time><offset>[<zone>]` with an optional
    /// `[u-ca=<id>]` annotation, e.g.
    /// `2025-03-29T12:00:00+01:00[Europe/Amsterdam]`.
    ///
    /// The offset must agree with what the zone's rules produce for the
    /// instant; in a fold it selects between the two candidate instants.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parser = Parser::new(s);
        let date = parser.parse_date()?;
        parser.expect(b'T', "`T` between date and time")?;
        let time = parser.parse_time()?;
        let is_utc = parser.peek() == Some(b'Z') || parser.peek() == Some(b'z');
        let offset = parser.parse_offset_or_utc()?;
        let timezone = parser.parse_time_zone_annotation()?;
        let calendar = if parser.peek() == Some(b'[') {
            parser.parse_calendar_annotation()?
        } else {
            Calendar::Iso8601
        };
        parser.expect_end()?;

        let local = PlainDateTime::from_parts(date, time);
        let nanos = local.epoch_nanoseconds_naive() - offset.total_nanoseconds() as i128;
        let nanos = i64::try_from(nanos).map_err(|_| Error::OutOfRange)?;
        let instant = Instant::from_epoch_nanoseconds(nanos);
        // `Z` pins the exact instant; an explicit offset must agree with
        // the zone's rules for that instant.
        if !is_utc && timezone.offset_at(instant) != offset {
            return Err(Error::OutOfRange);
        }
        Ok(ZonedDateTime::new(instant, timezone).with_calendar(calendar))
    }
}

impl FromStr for Duration {
    type Err = Error;

    /// Parses the ISO 8601 duration format, e.g. `-P1Y2M3W4DT5H6M7.5S`.
    ///
    /// A fraction is only accepted on the seconds component and decomposes
    /// into the three sub-second components.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parser = Parser::new(s);
        let duration = parser.parse_duration()?;
        parser.expect_end()?;
        Ok(duration)
    }
}

impl FromStr for UtcOffset {
    type Err = Error;

    /// Parses `±HH:MM` with an optional `:SS` tail.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parser = Parser::new(s);
        let offset = parser.parse_utc_offset()?;
        parser.expect_end()?;
        Ok(offset)
    }
}

/// Parses a zoned datetime while applying an explicit disambiguation
/// policy instead of trusting the string's offset.
///
/// This is the escape hatch for strings whose offset has gone stale
/// against an updated zone database.
pub fn parse_zoned_lenient(s: &str, disambiguation: Disambiguation) -> Result<ZonedDateTime, Error> {
    match s.parse::<ZonedDateTime>() {
        Ok(zoned) => Ok(zoned),
        Err(Error::OutOfRange) => {
            // Re-parse structurally, then resolve by local time alone.
            let mut parser = Parser::new(s);
            let date = parser.parse_date()?;
            parser.expect(b'T', "`T` between date and time")?;
            let time = parser.parse_time()?;
            let _ = parser.parse_offset_or_utc()?;
            let timezone = parser.parse_time_zone_annotation()?;
            let calendar = if parser.peek() == Some(b'[') {
                parser.parse_calendar_annotation()?
            } else {
                Calendar::Iso8601
            };
            parser.expect_end()?;
            let local = PlainDateTime::from_parts(date, time).with_calendar(calendar);
            ZonedDateTime::from_local(&local, timezone, disambiguation)
        }
        Err(error) => Err(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!("2012-02-13".parse::<PlainDate>().unwrap(), PlainDate::new(2012, 2, 13).unwrap());
        assert_eq!("+275760-09-13".parse::<PlainDate>().unwrap(), PlainDate::MAX);
        assert_eq!("-271821-04-19".parse::<PlainDate>().unwrap(), PlainDate::MIN);
        assert_eq!("2013-02-29".parse::<PlainDate>(), Err(Error::OutOfRange));
        assert!("2012-2-13".parse::<PlainDate>().is_err());
        assert!("2012-02-13T".parse::<PlainDate>().is_err());
        assert!("12345-01-01".parse::<PlainDate>().is_err());
    }

    #[test]
    fn test_parse_time_fraction_components() {
        let time = "10:24:30.001002003".parse::<PlainTime>().unwrap();
        assert_eq!(
            (time.millisecond(), time.microsecond(), time.nanosecond()),
            (1, 2, 3)
        );
        let time = "10:24:30.5".parse::<PlainTime>().unwrap();
        assert_eq!(time.millisecond(), 500);
        assert!("10:24".parse::<PlainTime>().is_err());
        assert!("10:24:30.".parse::<PlainTime>().is_err());
        assert!("10:24:30.1234567890".parse::<PlainTime>().is_err());
        assert!("24:00:00".parse::<PlainTime>().is_err());
    }

    #[test]
    fn test_parse_datetime_with_calendar() {
        let dt = "2025-03-14T09:30:00[u-ca=buddhist]".parse::<PlainDateTime>().unwrap();
        assert_eq!(dt.calendar(), Calendar::Buddhist);
        assert_eq!(dt.to_string(), "2025-03-14T09:30:00[u-ca=buddhist]");
        assert_eq!(
            "2025-03-14T09:30:00[u-ca=hebrew]".parse::<PlainDateTime>(),
            Err(Error::UnsupportedCalendar)
        );
    }

    #[test]
    fn test_parse_instant_normalises_offset() {
        let a = "2025-03-14T09:32:47Z".parse::<Instant>().unwrap();
        let b = "2025-03-14T10:32:47+01:00".parse::<Instant>().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "2025-03-14T09:32:47Z");
    }

    #[test]
    fn test_parse_duration() {
        let d = "P1Y2M3W4DT5H6M7.5S".parse::<Duration>().unwrap();
        assert_eq!((d.years(), d.months(), d.weeks(), d.days()), (1, 2, 3, 4));
        assert_eq!((d.hours(), d.minutes(), d.seconds(), d.milliseconds()), (5, 6, 7, 500));
        let d = "-PT90M".parse::<Duration>().unwrap();
        assert_eq!(d.minutes(), -90);
        assert_eq!("PT0S".parse::<Duration>().unwrap(), Duration::ZERO);
        assert_eq!("P0D".parse::<Duration>().unwrap(), Duration::ZERO);
        assert!("P".parse::<Duration>().is_err());
        assert!("PT".parse::<Duration>().is_err());
        assert!("P1S".parse::<Duration>().is_err());
        assert!("PT1Y".parse::<Duration>().is_err());
        assert!("P1M2Y".parse::<Duration>().is_err());
        assert!("PT1.5H".parse::<Duration>().is_err());
    }

    #[test]
    fn test_duration_round_trip() {
        for s in ["P1Y", "P2M", "P3W", "P4D", "PT5H", "PT6M", "PT7S", "PT0.500S", "PT0S", "-P1Y2DT3H", "PT1.000000001S"] {
            assert_eq!(s.parse::<Duration>().unwrap().to_string(), s, "{s}");
        }
    }

    #[test]
    fn test_parse_zoned_fixed_offset_annotation() {
        let zdt = "2025-06-01T12:00:00+05:30[+05:30]".parse::<ZonedDateTime>().unwrap();
        assert_eq!(zdt.offset(), UtcOffset::from_hms(5, 30, 0).unwrap());
        assert_eq!(zdt.to_string(), "2025-06-01T12:00:00+05:30[+05:30]");
        // Mismatched offset for a fixed zone is rejected.
        assert!("2025-06-01T12:00:00+01:00[+05:30]".parse::<ZonedDateTime>().is_err());
    }

    #[test]
    fn test_parse_zoned_requires_annotation() {
        assert!("2025-06-01T12:00:00+05:30".parse::<ZonedDateTime>().is_err());
    }

    #[test]
    fn test_lenient_parse_recovers_from_stale_offsets() {
        // Strict parsing refuses the mismatched offset; the lenient form
        // re-resolves the local time through the zone instead.
        let input = "2025-06-01T12:00:00+01:00[+05:30]";
        assert!(input.parse::<ZonedDateTime>().is_err());
        let zdt = parse_zoned_lenient(input, Disambiguation::Compatible).unwrap();
        assert_eq!(zdt.to_string(), "2025-06-01T12:00:00+05:30[+05:30]");
    }

    #[test]
    fn test_parse_month_day() {
        let md = "--02-29".parse::<PlainMonthDay>().unwrap();
        assert_eq!((md.month(), md.day()), (2, 29));
        assert!("--13-01".parse::<PlainMonthDay>().is_err());
        assert!("02-29".parse::<PlainMonthDay>().is_err());
    }

    #[test]
    fn test_parse_year_month() {
        let ym = "2025-03".parse::<PlainYearMonth>().unwrap();
        assert_eq!((ym.year(), ym.month()), (2025, 3));
        assert!("2025-13".parse::<PlainYearMonth>().is_err());
    }
}
