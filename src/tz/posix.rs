//! POSIX TZ rule strings, as found in the `TZ` environment variable and in
//! the footer of version 2+ TZif files.

use std::iter::Peekable;
use std::str::Chars;

use crate::gregorian::{
    date_from_epoch_days, date_to_epoch_days, days_in_month, is_leap_year, weekday_difference, weekday_from_days,
};
use crate::Error;

/// When during the year a DST switch happens, in local time.
///
/// The `seconds` field is the time of day of the switch in seconds from
/// local midnight; TZif version 3 extends it to ±167 hours.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
enum TransitionRule {
    /// `Jn`: day of a 365-day year, February 29th never counted.
    JulianDay { day: u16, seconds: i64 },
    /// `n`: zero-based day of year, February 29th counted in leap years.
    ZeroBasedDay { day: u16, seconds: i64 },
    /// `Mm.n.d`: the `n`-th `d` weekday of month `m`, where the fifth week
    /// means "last".
    MonthWeekday { month: u8, nth: u8, weekday: u8, seconds: i64 },
}

impl TransitionRule {
    /// The local epoch second this rule fires at in the given year.
    fn local_epoch_seconds(&self, year: i32) -> i64 {
        match *self {
            Self::JulianDay { day, seconds } => {
                let day = if day >= 60 && is_leap_year(year) { day + 1 } else { day };
                let epoch = date_to_epoch_days(year, 1, 1);
                (epoch - 1 + day as i64) * 86_400 + seconds
            }
            Self::ZeroBasedDay { day, seconds } => {
                let epoch = date_to_epoch_days(year, 1, 1);
                (epoch + day as i64) * 86_400 + seconds
            }
            Self::MonthWeekday {
                month,
                nth,
                weekday,
                seconds,
            } => {
                let first_weekday = weekday_from_days(date_to_epoch_days(year, month, 1));
                let days_in_month = days_in_month(year, month);
                let mut day = weekday_difference(weekday, first_weekday) + 1 + (nth - 1) * 7;
                if day > days_in_month {
                    day -= 7;
                }
                date_to_epoch_days(year, month, day) * 86_400 + seconds
            }
        }
    }
}

impl std::fmt::Display for TransitionRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Self::JulianDay { day, seconds } => {
                write!(f, "J{day}")?;
                display_rule_time(f, seconds)
            }
            Self::ZeroBasedDay { day, seconds } => {
                write!(f, "{day}")?;
                display_rule_time(f, seconds)
            }
            Self::MonthWeekday {
                month,
                nth,
                weekday,
                seconds,
            } => {
                write!(f, "M{month}.{nth}.{weekday}")?;
                display_rule_time(f, seconds)
            }
        }
    }
}

fn display_rule_time(f: &mut std::fmt::Formatter<'_>, seconds: i64) -> std::fmt::Result {
    if seconds == 7200 {
        // The default is omitted on output.
        return Ok(());
    }
    let sign = if seconds < 0 { "-" } else { "" };
    let seconds = seconds.abs();
    let (hours, rest) = (seconds / 3600, seconds % 3600);
    let (minutes, seconds) = (rest / 60, rest % 60);
    if seconds != 0 {
        write!(f, "/{sign}{hours}:{minutes:02}:{seconds:02}")
    } else if minutes != 0 {
        write!(f, "/{sign}{hours}:{minutes:02}")
    } else {
        write!(f, "/{sign}{hours}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct DstInfo {
    abbreviation: String,
    /// DST offset in seconds east of UTC.
    offset: i32,
    start: TransitionRule,
    end: TransitionRule,
}

/// A POSIX-string specified time zone rule.
///
/// The details of this format are specified under the POSIX TZ rules in
/// [Section 8.3]. These mainly show up either in the `TZ` environment
/// variable or at the end of a TZif footer as specified by [RFC 8536].
///
/// ```
/// use tempora::tz::PosixTimeZone;
/// let tz: PosixTimeZone = "EST5EDT,M3.2.0/2,M11.1.0/2".parse()?;
/// # Ok::<_, tempora::Error>(())
/// ```
///
/// [Section 8.3]: https://pubs.opengroup.org/onlinepubs/9699919799/
/// [RFC 8536]: https://datatracker.ietf.org/doc/html/rfc8536#section-3.3
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PosixTimeZone {
    std_abbreviation: String,
    /// Standard offset in seconds east of UTC. Note that the POSIX string
    /// spells this with the opposite sign.
    std_offset: i32,
    dst: Option<DstInfo>,
}

impl PosixTimeZone {
    /// Parses a [`PosixTimeZone`] from a TZ string.
    pub fn new(tz: &str) -> Result<Self, Error> {
        // std offset [dst [offset] , start [/time] , end [/time]]
        let mut parser = tz.chars().peekable();
        let std_abbreviation = parse_abbreviation(&mut parser)?;
        let std_offset = -parse_offset(&mut parser)?;
        let dst = match parser.peek() {
            None => None,
            Some(_) => {
                let abbreviation = parse_abbreviation(&mut parser)?;
                let offset = match parser.peek() {
                    Some(',') => std_offset + 3600,
                    Some(_) => -parse_offset(&mut parser)?,
                    None => return Err(Error::Parse("DST transition rules")),
                };
                if parser.next_if_eq(&',').is_none() {
                    return Err(Error::Parse("`,` before DST start rule"));
                }
                let start = parse_transition_rule(&mut parser)?;
                if parser.next_if_eq(&',').is_none() {
                    return Err(Error::Parse("`,` before DST end rule"));
                }
                let end = parse_transition_rule(&mut parser)?;
                Some(DstInfo {
                    abbreviation,
                    offset,
                    start,
                    end,
                })
            }
        };
        if parser.peek().is_some() {
            return Err(Error::Parse("end of TZ string"));
        }
        Ok(Self {
            std_abbreviation,
            std_offset,
            dst,
        })
    }

    /// Returns `true` when this rule never observes DST.
    pub fn is_fixed(&self) -> bool {
        self.dst.is_none()
    }

    /// The two offset switches of the given year in UTC epoch seconds,
    /// ordered chronologically as `(at, offset_after)` pairs.
    fn switches_in_year(&self, year: i32) -> Option<[(i64, i32); 2]> {
        let dst = self.dst.as_ref()?;
        let dst_on = dst.start.local_epoch_seconds(year) - self.std_offset as i64;
        let dst_off = dst.end.local_epoch_seconds(year) - dst.offset as i64;
        let mut switches = [(dst_on, dst.offset), (dst_off, self.std_offset)];
        if switches[0].0 > switches[1].0 {
            // Southern hemisphere: DST spans the turn of the year.
            switches.swap(0, 1);
        }
        Some(switches)
    }

    fn switches_around(&self, epoch_seconds: i64) -> Vec<(i64, i32)> {
        let (year, _, _) = date_from_epoch_days(epoch_seconds.div_euclid(86_400));
        let mut switches = Vec::with_capacity(6);
        for y in [year - 1, year, year + 1] {
            if let Some(pair) = self.switches_in_year(y) {
                switches.extend(pair);
            }
        }
        switches
    }

    /// The offset in seconds in effect at the given UTC epoch second.
    pub(crate) fn offset_at(&self, epoch_seconds: i64) -> i32 {
        let switches = self.switches_around(epoch_seconds);
        match switches.iter().rev().find(|(at, _)| *at <= epoch_seconds) {
            Some(&(_, offset)) => offset,
            // Before the earliest generated switch the opposite phase of
            // the first switch applies.
            None => match switches.first() {
                Some(&(_, offset)) => {
                    let dst = self.dst.as_ref().expect("switches imply a DST rule");
                    if offset == dst.offset {
                        self.std_offset
                    } else {
                        dst.offset
                    }
                }
                None => self.std_offset,
            },
        }
    }

    /// The first rule switch strictly after the given UTC epoch second.
    pub(crate) fn next_transition(&self, epoch_seconds: i64) -> Option<i64> {
        self.dst.as_ref()?;
        self.switches_around(epoch_seconds)
            .into_iter()
            .map(|(at, _)| at)
            .find(|&at| at > epoch_seconds)
    }

    /// The last rule switch strictly before the given UTC epoch second.
    pub(crate) fn previous_transition(&self, epoch_seconds: i64) -> Option<i64> {
        self.dst.as_ref()?;
        self.switches_around(epoch_seconds)
            .into_iter()
            .map(|(at, _)| at)
            .rev()
            .find(|&at| at < epoch_seconds)
    }
}

impl std::str::FromStr for PosixTimeZone {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl std::fmt::Display for PosixTimeZone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        display_abbreviation(f, &self.std_abbreviation)?;
        display_offset(f, -self.std_offset)?;
        if let Some(dst) = &self.dst {
            display_abbreviation(f, &dst.abbreviation)?;
            if dst.offset != self.std_offset + 3600 {
                display_offset(f, -dst.offset)?;
            }
            write!(f, ",{},{}", dst.start, dst.end)?;
        }
        Ok(())
    }
}

fn display_abbreviation(f: &mut std::fmt::Formatter<'_>, abbreviation: &str) -> std::fmt::Result {
    if abbreviation.chars().all(|c| c.is_ascii_alphabetic()) {
        f.write_str(abbreviation)
    } else {
        write!(f, "<{abbreviation}>")
    }
}

fn display_offset(f: &mut std::fmt::Formatter<'_>, offset: i32) -> std::fmt::Result {
    let sign = if offset < 0 { "-" } else { "" };
    let offset = offset.abs();
    let (hours, rest) = (offset / 3600, offset % 3600);
    let (minutes, seconds) = (rest / 60, rest % 60);
    if seconds != 0 {
        write!(f, "{sign}{hours}:{minutes:02}:{seconds:02}")
    } else if minutes != 0 {
        write!(f, "{sign}{hours}:{minutes:02}")
    } else {
        write!(f, "{sign}{hours}")
    }
}

fn parse_abbreviation(parser: &mut Peekable<Chars<'_>>) -> Result<String, Error> {
    let mut abbreviation = String::with_capacity(4);
    match parser.peek() {
        Some('<') => {
            parser.next();
            for c in parser.by_ref() {
                if c == '>' {
                    return Ok(abbreviation);
                }
                abbreviation.push(c);
            }
            Err(Error::Parse("closing `>` in zone abbreviation"))
        }
        _ => {
            while let Some(&c) = parser.peek() {
                if c.is_ascii_alphabetic() {
                    abbreviation.push(c);
                    parser.next();
                } else {
                    break;
                }
            }
            if abbreviation.len() < 3 {
                Err(Error::Parse("zone abbreviation of at least 3 characters"))
            } else {
                Ok(abbreviation)
            }
        }
    }
}

fn parse_number(parser: &mut Peekable<Chars<'_>>) -> Result<i64, Error> {
    let mut value: i64 = 0;
    let mut any = false;
    while let Some(&c) = parser.peek() {
        match c.to_digit(10) {
            Some(digit) => {
                value = value * 10 + digit as i64;
                any = true;
                parser.next();
            }
            None => break,
        }
    }
    if any {
        Ok(value)
    } else {
        Err(Error::Parse("a digit"))
    }
}

/// Parses `[+-]hh[:mm[:ss]]` into seconds, with the POSIX sign convention
/// left to the caller. Hours up to 167 are accepted per TZif version 3.
fn parse_offset(parser: &mut Peekable<Chars<'_>>) -> Result<i32, Error> {
    let negative = match parser.peek() {
        Some('-') => {
            parser.next();
            true
        }
        Some('+') => {
            parser.next();
            false
        }
        _ => false,
    };
    let hours = parse_number(parser)?;
    if hours > 167 {
        return Err(Error::Parse("offset hours within ±167"));
    }
    let mut seconds = hours * 3600;
    if parser.next_if_eq(&':').is_some() {
        seconds += parse_number(parser)? * 60;
        if parser.next_if_eq(&':').is_some() {
            seconds += parse_number(parser)?;
        }
    }
    let seconds = if negative { -seconds } else { seconds };
    i32::try_from(seconds).map_err(|_| Error::Parse("offset in range"))
}

fn parse_rule_time(parser: &mut Peekable<Chars<'_>>) -> Result<i64, Error> {
    if parser.next_if_eq(&'/').is_none() {
        // The switch defaults to 02:00:00 local time.
        return Ok(7200);
    }
    Ok(parse_offset(parser)? as i64)
}

fn parse_transition_rule(parser: &mut Peekable<Chars<'_>>) -> Result<TransitionRule, Error> {
    match parser.peek() {
        Some('J') => {
            parser.next();
            let day = parse_number(parser)?;
            if !(1..=365).contains(&day) {
                return Err(Error::Parse("Julian day within 1..=365"));
            }
            Ok(TransitionRule::JulianDay {
                day: day as u16,
                seconds: parse_rule_time(parser)?,
            })
        }
        Some('M') => {
            parser.next();
            let month = parse_number(parser)?;
            if !(1..=12).contains(&month) {
                return Err(Error::Parse("month within 1..=12"));
            }
            if parser.next_if_eq(&'.').is_none() {
                return Err(Error::Parse("`.` in month rule"));
            }
            let nth = parse_number(parser)?;
            if !(1..=5).contains(&nth) {
                return Err(Error::Parse("week within 1..=5"));
            }
            if parser.next_if_eq(&'.').is_none() {
                return Err(Error::Parse("`.` in month rule"));
            }
            let weekday = parse_number(parser)?;
            if weekday > 6 {
                return Err(Error::Parse("weekday within 0..=6"));
            }
            Ok(TransitionRule::MonthWeekday {
                month: month as u8,
                nth: nth as u8,
                weekday: weekday as u8,
                seconds: parse_rule_time(parser)?,
            })
        }
        _ => {
            let day = parse_number(parser)?;
            if day > 365 {
                return Err(Error::Parse("day within 0..=365"));
            }
            Ok(TransitionRule::ZeroBasedDay {
                day: day as u16,
                seconds: parse_rule_time(parser)?,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone(s: &str) -> PosixTimeZone {
        s.parse().expect(s)
    }

    // 2021-03-14T07:00:00Z, the second Sunday of March at 2 AM EST.
    const US_SPRING_2021: i64 = 1615705200;
    // 2021-11-07T06:00:00Z, the first Sunday of November at 2 AM EDT.
    const US_FALL_2021: i64 = 1636264800;

    #[test]
    fn test_fixed_rule() {
        let tz = zone("UTC0");
        assert!(tz.is_fixed());
        assert_eq!(tz.offset_at(0), 0);
        assert_eq!(tz.next_transition(0), None);

        let tz = zone("<+0330>-3:30");
        assert_eq!(tz.offset_at(0), 12600);
    }

    #[test]
    fn test_us_eastern() {
        let tz = zone("EST5EDT,M3.2.0,M11.1.0");
        assert_eq!(tz.offset_at(US_SPRING_2021 - 1), -5 * 3600);
        assert_eq!(tz.offset_at(US_SPRING_2021), -4 * 3600);
        assert_eq!(tz.offset_at(US_FALL_2021 - 1), -4 * 3600);
        assert_eq!(tz.offset_at(US_FALL_2021), -5 * 3600);
        assert_eq!(tz.next_transition(US_SPRING_2021), Some(US_FALL_2021));
        assert_eq!(tz.previous_transition(US_FALL_2021), Some(US_SPRING_2021));
    }

    #[test]
    fn test_southern_hemisphere() {
        // Lord-of-the-year-boundary rules: DST from October to April.
        let tz = zone("AEST-10AEDT,M10.1.0,M4.1.0/3");
        // Mid-January is DST.
        assert_eq!(tz.offset_at(1610841600), 11 * 3600); // 2021-01-17T00:00:00Z
        // Mid-June is standard time.
        assert_eq!(tz.offset_at(1623888000), 10 * 3600); // 2021-06-17T00:00:00Z
    }

    #[test]
    fn test_display_round_trip() {
        for s in [
            "EST5EDT,M3.2.0,M11.1.0",
            "<+04>-4",
            "AEST-10AEDT,M10.1.0,M4.1.0/3",
            "IST-2IDT,M3.4.4/26,M10.5.0",
        ] {
            assert_eq!(zone(s).to_string(), s);
            assert_eq!(zone(&zone(s).to_string()), zone(s));
        }
    }

    #[test]
    fn test_invalid_rules() {
        assert!(PosixTimeZone::new("").is_err());
        assert!(PosixTimeZone::new("EST").is_err());
        assert!(PosixTimeZone::new("EST5EDT").is_err());
        assert!(PosixTimeZone::new("EST5EDT,M13.1.0,M11.1.0").is_err());
        assert!(PosixTimeZone::new("EST5EDT,M3.2.0,M11.1.0,extra").is_err());
    }
}
