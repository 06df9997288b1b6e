use core::cmp::Ordering;

use crate::calendar::DateFields;
use crate::duration::Duration;
use crate::options::{
    round_to_increment, DifferenceOptions, Disambiguation, Overflow, RoundingOptions, Unit,
};
use crate::{Calendar, Error, Instant, PlainDate, PlainDateTime, PlainTime, TimeZone, UtcOffset};

/// An instant paired with a time zone and a calendar: a moment in time as
/// seen on some wall clock.
///
/// Only the instant is stored; every local field is derived through the
/// zone's offset history on access. Arithmetic with calendar units runs on
/// the local clock and re-resolves through the zone, so adding one day
/// across a spring-forward transition advances the local clock by one civil
/// day rather than 24 hours.
#[derive(Debug, Clone)]
pub struct ZonedDateTime {
    instant: Instant,
    timezone: TimeZone,
    calendar: Calendar,
}

impl ZonedDateTime {
    /// Creates a [`ZonedDateTime`] from an instant and a time zone, in the
    /// ISO calendar.
    pub fn new(instant: Instant, timezone: TimeZone) -> Self {
        Self {
            instant,
            timezone,
            calendar: Calendar::Iso8601,
        }
    }

    /// Resolves a local date-time in a zone.
    ///
    /// The calendar tag of `local` is carried over.
    ///
    /// ```no_run
    /// use tempora::{Disambiguation, PlainDateTime, TimeZone, ZonedDateTime};
    /// let tz = TimeZone::named("Europe/Amsterdam")?;
    /// let local = PlainDateTime::new(2025, 3, 29, 12, 0, 0)?;
    /// let zdt = ZonedDateTime::from_local(&local, tz, Disambiguation::Compatible)?;
    /// assert_eq!(zdt.to_string(), "2025-03-29T12:00:00+01:00[Europe/Amsterdam]");
    /// # Ok::<_, tempora::Error>(())
    /// ```
    pub fn from_local(
        local: &PlainDateTime,
        timezone: TimeZone,
        disambiguation: Disambiguation,
    ) -> Result<Self, Error> {
        let instant = timezone.instant_for(local, disambiguation)?;
        Ok(Self {
            instant,
            timezone,
            calendar: local.calendar(),
        })
    }

    /// Returns the instant this value points at.
    #[inline]
    pub const fn to_instant(&self) -> Instant {
        self.instant
    }

    /// Returns the number of nanoseconds since the epoch.
    #[inline]
    pub const fn epoch_nanoseconds(&self) -> i64 {
        self.instant.epoch_nanoseconds()
    }

    /// Returns the time zone.
    #[inline]
    pub const fn time_zone(&self) -> &TimeZone {
        &self.timezone
    }

    /// Returns the calendar tag.
    #[inline]
    pub const fn calendar(&self) -> Calendar {
        self.calendar
    }

    /// Returns a copy with a different calendar tag.
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub fn with_calendar(mut self, calendar: Calendar) -> Self {
        self.calendar = calendar;
        self
    }

    /// Returns the same instant seen from another time zone.
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub fn with_time_zone(mut self, timezone: TimeZone) -> Self {
        self.timezone = timezone;
        self
    }

    /// Returns the UTC offset in effect at this moment.
    pub fn offset(&self) -> UtcOffset {
        self.timezone.offset_at(self.instant)
    }

    /// Projects this value into its local date-time.
    pub fn to_plain_datetime(&self) -> PlainDateTime {
        self.local()
    }

    /// Returns the local calendar date.
    pub fn date(&self) -> PlainDate {
        self.local().date()
    }

    /// Returns the local wall-clock time.
    pub fn time(&self) -> PlainTime {
        self.local().time()
    }

    fn local(&self) -> PlainDateTime {
        // An i64 instant offset by at most a day always lands inside the
        // plain date range, so the projection cannot fail.
        self.timezone
            .to_plain_datetime(self.instant)
            .expect("instant plus offset is always in range")
            .with_calendar(self.calendar)
    }

    /// Returns the local year.
    pub fn year(&self) -> i32 {
        self.local().year()
    }

    /// Returns the local month.
    pub fn month(&self) -> u8 {
        self.local().month()
    }

    /// Returns the local day.
    pub fn day(&self) -> u8 {
        self.local().day()
    }

    /// Returns the local hour.
    pub fn hour(&self) -> u8 {
        self.local().hour()
    }

    /// Returns the local minute.
    pub fn minute(&self) -> u8 {
        self.local().minute()
    }

    /// Returns the local second.
    pub fn second(&self) -> u8 {
        self.local().second()
    }

    /// Returns the local millisecond.
    pub fn millisecond(&self) -> u16 {
        self.local().millisecond()
    }

    /// Returns the local microsecond.
    pub fn microsecond(&self) -> u16 {
        self.local().microsecond()
    }

    /// Returns the local nanosecond.
    pub fn nanosecond(&self) -> u16 {
        self.local().nanosecond()
    }

    /// Returns the era of the local date under this value's calendar.
    pub fn era(&self) -> Option<&'static str> {
        self.calendar.era(&self.date())
    }

    /// Returns the year within the era of the local date.
    pub fn era_year(&self) -> Option<i32> {
        self.calendar.era_year(&self.date())
    }

    /// Returns a copy with the given date fields replaced on the local
    /// clock, re-resolved through the zone.
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub fn with(
        &self,
        fields: &DateFields,
        overflow: Overflow,
        disambiguation: Disambiguation,
    ) -> Result<Self, Error> {
        let local = self.local().with(fields, overflow)?;
        let instant = self.timezone.instant_for(&local, disambiguation)?;
        Ok(Self {
            instant,
            timezone: self.timezone.clone(),
            calendar: self.calendar,
        })
    }

    /// Returns a copy with the local wall-clock time replaced,
    /// re-resolved through the zone.
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub fn with_time(&self, time: PlainTime, disambiguation: Disambiguation) -> Result<Self, Error> {
        let local = self.local().with_time(time);
        let instant = self.timezone.instant_for(&local, disambiguation)?;
        Ok(Self {
            instant,
            timezone: self.timezone.clone(),
            calendar: self.calendar,
        })
    }

    /// Adds a duration with the default policies: day clamping and
    /// compatible disambiguation.
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub fn add(&self, duration: &Duration) -> Result<Self, Error> {
        self.add_with(duration, Overflow::Constrain, Disambiguation::Compatible)
    }

    /// Adds a duration to this value.
    ///
    /// Calendar components are applied to the local clock first and the
    /// result is re-resolved through the zone; time components then move
    /// the instant itself. This ordering means "add 1 day" across a DST
    /// transition keeps the local hour while "add 24 hours" does not.
    ///
    /// ```no_run
    /// use tempora::{Duration, TimeZone, ZonedDateTime};
    /// let zdt: ZonedDateTime = "2025-03-29T12:00:00+01:00[Europe/Amsterdam]".parse()?;
    /// let next = zdt.add(&Duration::from_days(1))?;
    /// assert_eq!(next.to_string(), "2025-03-30T12:00:00+02:00[Europe/Amsterdam]");
    /// # Ok::<_, tempora::Error>(())
    /// ```
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub fn add_with(
        &self,
        duration: &Duration,
        overflow: Overflow,
        disambiguation: Disambiguation,
    ) -> Result<Self, Error> {
        let date_part = duration.date_part();
        let instant = if date_part.sign() == 0 {
            self.instant
        } else {
            let shifted = self.local().add(&date_part, overflow)?;
            self.timezone.instant_for(&shifted, disambiguation)?
        };
        let total = instant.epoch_nanoseconds() as i128 + duration.time_nanoseconds();
        let nanos = i64::try_from(total).map_err(|_| Error::Arithmetic)?;
        Ok(Self {
            instant: Instant::from_epoch_nanoseconds(nanos),
            timezone: self.timezone.clone(),
            calendar: self.calendar,
        })
    }

    /// Subtracts a duration from this value.
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub fn subtract(&self, duration: &Duration) -> Result<Self, Error> {
        self.add(&duration.negated())
    }

    /// Returns the duration from this value until `other`.
    ///
    /// The default largest unit is [`Unit::Day`]. Differences in units of a
    /// day or larger track the local calendar and therefore require both
    /// values to share a time zone; hour-or-smaller differences are pure
    /// instant arithmetic and work across zones.
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
            &crate::RelativeTo::from(self.clone()),
        )
    }

    /// Returns the duration from `other` until this value.
    pub fn since(&self, other: &Self, options: impl Into<DifferenceOptions>) -> Result<Duration, Error> {
        other.until(self, options)
    }

    /// The exact difference decomposed into units up to `largest`.
    pub(crate) fn until_in(&self, other: &Self, largest: Unit) -> Result<Duration, Error> {
        let diff = other.instant.epoch_nanoseconds() as i128 - self.instant.epoch_nanoseconds() as i128;
        if largest <= Unit::Hour {
            return Duration::from_total_nanoseconds(diff, largest);
        }
        if self.timezone != other.timezone {
            return Err(Error::InvalidOption("largestUnit"));
        }
        if diff == 0 {
            return Ok(Duration::ZERO);
        }
        let sign: i64 = if diff > 0 { 1 } else { -1 };
        let start_local = self.local();
        let end_local = other.local();
        let mut days = end_local.date().epoch_days() - start_local.date().epoch_days();

        // Walk the candidate day count down until the leftover, measured
        // through actual zone offsets, shares the overall sign and spans
        // less than one local day.
        for _ in 0..3 {
            let intermediate_local = start_local.with_date(start_local.date().add_days(days)?);
            let intermediate = self.timezone.instant_for(&intermediate_local, Disambiguation::Compatible)?;
            let remainder = other.instant.epoch_nanoseconds() as i128 - intermediate.epoch_nanoseconds() as i128;
            if remainder == 0 || (remainder > 0) == (sign > 0) {
                let next_local = start_local.with_date(start_local.date().add_days(days + sign)?);
                let next = self.timezone.instant_for(&next_local, Disambiguation::Compatible)?;
                let day_span = (next.epoch_nanoseconds() as i128 - intermediate.epoch_nanoseconds() as i128).abs();
                if remainder.abs() < day_span {
                    let date_part = start_local.date().until_in(&intermediate_local.date(), largest)?;
                    let time_part = Duration::from_total_nanoseconds(remainder, Unit::Hour)?;
                    return Duration::new(
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
                    );
                }
                days += sign;
            } else {
                days -= sign;
            }
        }
        Err(Error::Arithmetic)
    }

    /// Rounds this value on its local clock.
    ///
    /// Rounding to [`Unit::Day`] snaps to the nearer boundary of the local
    /// day, accounting for days of unusual length around DST transitions.
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub fn round(&self, options: impl Into<RoundingOptions>) -> Result<Self, Error> {
        let options = options.into();
        if options.smallest_unit == Unit::Day {
            if options.increment != 1 {
                return Err(Error::InvalidOption("roundingIncrement"));
            }
            let date = self.date();
            let start = self.timezone.start_of_day(date)?;
            let length = self.timezone.day_length_nanoseconds(date)?;
            let position = self.instant.epoch_nanoseconds() as i128 - start.epoch_nanoseconds() as i128;
            let rounded = round_to_increment(position, length, options.mode);
            let nanos = i64::try_from(start.epoch_nanoseconds() as i128 + rounded).map_err(|_| Error::Arithmetic)?;
            return Ok(Self {
                instant: Instant::from_epoch_nanoseconds(nanos),
                timezone: self.timezone.clone(),
                calendar: self.calendar,
            });
        }
        let local = self.local().round(options)?;
        let instant = self.timezone.instant_for(&local, Disambiguation::Compatible)?;
        Ok(Self {
            instant,
            timezone: self.timezone.clone(),
            calendar: self.calendar,
        })
    }

    /// The first instant of this value's local calendar date.
    ///
    /// When midnight falls in a DST gap, this is the instant at the end of
    /// the gap.
    pub fn start_of_day(&self) -> Result<Self, Error> {
        let instant = self.timezone.start_of_day(self.date())?;
        Ok(Self {
            instant,
            timezone: self.timezone.clone(),
            calendar: self.calendar,
        })
    }

    /// The length of this value's local calendar day in hours: typically
    /// 24, but 23 or 25 on DST days.
    pub fn hours_in_day(&self) -> Result<f64, Error> {
        let length = self.timezone.day_length_nanoseconds(self.date())?;
        Ok(length as f64 / 3_600_000_000_000u64 as f64)
    }

    /// Returns `true` when the instant, zone, and calendar all match.
    ///
    /// The comparison traits order by instant alone; this method does not.
    pub fn equals(&self, other: &Self) -> bool {
        self.instant == other.instant && self.timezone == other.timezone && self.calendar == other.calendar
    }
}

// Comparisons follow the instant alone so that values in different zones
// order by the moment they denote. Zone- and calendar-sensitive equality
// is `equals`.
impl PartialEq for ZonedDateTime {
    fn eq(&self, other: &Self) -> bool {
        self.instant == other.instant
    }
}

impl Eq for ZonedDateTime {}

impl core::hash::Hash for ZonedDateTime {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.instant.hash(state);
    }
}

impl PartialOrd for ZonedDateTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ZonedDateTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.instant.cmp(&other.instant)
    }
}

impl core::fmt::Display for ZonedDateTime {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let local = self.local();
        write!(f, "{}T{}", local.date(), local.time())?;
        write!(f, "{}", self.offset())?;
        write!(f, "[{}]", self.timezone)?;
        if !self.calendar.is_iso() {
            write!(f, "[u-ca={}]", self.calendar)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datetime;

    fn cet() -> TimeZone {
        TimeZone::posix("CET-1CEST,M3.5.0,M10.5.0/3").unwrap()
    }

    fn at(local: PlainDateTime, tz: &TimeZone) -> ZonedDateTime {
        ZonedDateTime::from_local(&local, tz.clone(), Disambiguation::Compatible).unwrap()
    }

    #[test]
    fn test_add_day_across_spring_forward() {
        let zdt = at(datetime!(2025 - 3 - 29 12:00), &cet());
        assert_eq!(zdt.offset().total_seconds(), 3600);

        // One civil day later the wall clock reads the same even though
        // only 23 hours elapsed.
        let next = zdt.add(&Duration::from_days(1)).unwrap();
        assert_eq!(next.to_plain_datetime(), datetime!(2025 - 3 - 30 12:00));
        assert_eq!(next.offset().total_seconds(), 7200);
        assert_eq!(
            next.epoch_nanoseconds() - zdt.epoch_nanoseconds(),
            23 * 3_600_000_000_000
        );

        // Adding 24 hours instead lands at 13:00 local.
        let by_hours = zdt.add(&Duration::from_hours(24)).unwrap();
        assert_eq!(by_hours.to_plain_datetime(), datetime!(2025 - 3 - 30 13:00));
    }

    #[test]
    fn test_until_counts_calendar_days() {
        let tz = cet();
        let start = at(datetime!(2025 - 3 - 29 12:00), &tz);
        let end = at(datetime!(2025 - 3 - 30 12:00), &tz);
        let d = start.until(&end, Unit::Day).unwrap();
        assert_eq!((d.days(), d.hours()), (1, 0));
        let d = start.until(&end, Unit::Hour).unwrap();
        assert_eq!(d.hours(), 23);
        let d = end.until(&start, Unit::Day).unwrap();
        assert_eq!((d.days(), d.hours()), (-1, 0));
    }

    #[test]
    fn test_add_then_until_round_trips() {
        let tz = cet();
        let start = at(datetime!(2025 - 3 - 1 18:30), &tz);
        let step = Duration::new(0, 1, 0, 3, 5, 0, 0, 0, 0, 0).unwrap();
        let end = start.add(&step).unwrap();
        let d = start.until(&end, Unit::Month).unwrap();
        assert_eq!((d.months(), d.days(), d.hours()), (1, 3, 5));
        assert_eq!(start.add(&d).unwrap(), end);
    }

    #[test]
    fn test_start_of_day_in_gap() {
        // Chilean-style rules skip midnight itself: the first Saturday of
        // September at 24:00 jumps straight to 01:00 the next day.
        let tz = TimeZone::posix("<-04>4<-03>,M9.1.6/24,M4.1.6/24").unwrap();
        let noon = at(datetime!(2022 - 9 - 4 12:00), &tz);
        let start = noon.start_of_day().unwrap();
        assert_eq!(start.to_plain_datetime(), datetime!(2022 - 9 - 4 1:00));
    }

    #[test]
    fn test_hours_in_day() {
        let tz = cet();
        assert_eq!(at(datetime!(2025 - 3 - 30 12:00), &tz).hours_in_day().unwrap(), 23.0);
        assert_eq!(at(datetime!(2025 - 10 - 26 12:00), &tz).hours_in_day().unwrap(), 25.0);
        assert_eq!(at(datetime!(2025 - 6 - 1 12:00), &tz).hours_in_day().unwrap(), 24.0);
    }

    #[test]
    fn test_round_to_day_uses_local_length() {
        let tz = cet();
        // The day is 23 hours long, so its midpoint is 12:30 local time
        // rather than noon.
        let zdt = at(datetime!(2025 - 3 - 30 12:29), &tz);
        let rounded = zdt.round(Unit::Day).unwrap();
        assert_eq!(rounded.to_plain_datetime(), datetime!(2025 - 3 - 30 0:00));
        let zdt = at(datetime!(2025 - 3 - 30 12:31), &tz);
        let rounded = zdt.round(Unit::Day).unwrap();
        assert_eq!(rounded.to_plain_datetime(), datetime!(2025 - 3 - 31 0:00));
    }

    #[test]
    fn test_display_formats_offset_and_zone() {
        let zdt = at(datetime!(2025 - 3 - 29 12:00), &cet());
        assert_eq!(zdt.to_string(), "2025-03-29T12:00:00+01:00[CET-1CEST,M3.5.0,M10.5.0/3]");
    }
}
