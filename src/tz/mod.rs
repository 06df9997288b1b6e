//! Time zone resolution over the operating system's zoneinfo database.

mod cache;
pub(crate) mod posix;
mod reader;
pub(crate) mod transitions;

use std::io::{Read, Seek};
use std::sync::Arc;

pub use posix::PosixTimeZone;

use self::reader::parse_tzif;
use crate::options::Disambiguation;
use crate::tz::transitions::ZoneData;
use crate::{Error, Instant, PlainDateTime, UtcOffset};

const NANOS_PER_SEC: i128 = 1_000_000_000;

/// A time zone: either a named IANA zone backed by its transition table, a
/// fixed offset with no transitions, or a POSIX rule string.
///
/// Named zones are loaded lazily from the OS zoneinfo database and cached
/// process-wide, so cloning and re-resolving them is cheap.
#[derive(Debug, Clone)]
pub struct TimeZone {
    kind: TimeZoneKind,
}

#[derive(Debug, Clone)]
enum TimeZoneKind {
    Fixed(UtcOffset),
    Named { id: Arc<str>, data: Arc<ZoneData> },
    Posix { source: Arc<str>, rule: Arc<PosixTimeZone> },
}

/// How a local wall-clock time maps onto the UTC timeline in some zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalResolution {
    /// Exactly one instant has this local time.
    Unambiguous(UtcOffset),
    /// The local time falls in a fold and happens twice; the earlier
    /// offset yields the earlier instant.
    Ambiguous { earlier: UtcOffset, later: UtcOffset },
    /// The local time falls in a gap and never happens; `before` and
    /// `after` are the offsets on each side of the transition.
    Skipped { before: UtcOffset, after: UtcOffset },
}

impl TimeZone {
    /// Returns the UTC time zone.
    pub fn utc() -> Self {
        Self {
            kind: TimeZoneKind::Fixed(UtcOffset::UTC),
        }
    }

    /// Returns a fixed-offset time zone with no transitions.
    pub fn fixed(offset: UtcOffset) -> Self {
        Self {
            kind: TimeZoneKind::Fixed(offset),
        }
    }

    /// Loads a named IANA zone, e.g. `"Europe/Amsterdam"`, from the OS
    /// zoneinfo database.
    ///
    /// Fails with [`Error::UnknownTimeZone`] if the identifier is not
    /// present in the database and with [`Error::InvalidZoneData`] if the
    /// entry cannot be parsed. Parsed zones are cached for the life of the
    /// process.
    pub fn named(id: &str) -> Result<Self, Error> {
        let data = cache::lookup(id)?;
        Ok(Self {
            kind: TimeZoneKind::Named {
                id: Arc::from(id),
                data,
            },
        })
    }

    /// Creates a zone from a POSIX TZ rule string such as
    /// `"EST5EDT,M3.2.0,M11.1.0"`.
    pub fn posix(source: &str) -> Result<Self, Error> {
        let rule = PosixTimeZone::new(source)?;
        Ok(Self {
            kind: TimeZoneKind::Posix {
                source: Arc::from(source),
                rule: Arc::new(rule),
            },
        })
    }

    /// Loads a zone with the given identifier from a reader that points at
    /// TZif data, bypassing the OS database and the cache.
    ///
    /// When reading from a source against which short reads are not
    /// efficient, such as a [`std::fs::File`], you will want to apply your
    /// own buffering such as [`std::io::BufReader`] since the library will
    /// not buffer reads.
    pub fn load<R: Read + Seek>(reader: R, id: String) -> Result<Self, Error> {
        let data = parse_tzif(reader)?;
        Ok(Self {
            kind: TimeZoneKind::Named {
                id: Arc::from(id.as_str()),
                data: Arc::new(data),
            },
        })
    }

    /// Returns the zone's identifier: the IANA name, the POSIX rule
    /// string, or the formatted offset for fixed zones.
    pub fn id(&self) -> String {
        match &self.kind {
            TimeZoneKind::Fixed(offset) => offset.to_string(),
            TimeZoneKind::Named { id, .. } => id.to_string(),
            TimeZoneKind::Posix { source, .. } => source.to_string(),
        }
    }

    /// Returns `true` if this zone never changes its offset.
    pub fn is_fixed(&self) -> bool {
        match &self.kind {
            TimeZoneKind::Fixed(_) => true,
            TimeZoneKind::Named { data, .. } => data.transitions.is_empty() && data.posix.is_none(),
            TimeZoneKind::Posix { rule, .. } => rule.is_fixed(),
        }
    }

    fn offset_seconds_at(&self, epoch_seconds: i64) -> i32 {
        match &self.kind {
            TimeZoneKind::Fixed(offset) => offset.total_seconds(),
            TimeZoneKind::Named { data, .. } => data.offset_at(epoch_seconds),
            TimeZoneKind::Posix { rule, .. } => rule.offset_at(epoch_seconds),
        }
    }

    /// Returns the UTC offset in effect at the given instant.
    ///
    /// Uses binary search over the zone's transition table, falling back to
    /// the POSIX tail rule past its end.
    pub fn offset_at(&self, instant: Instant) -> UtcOffset {
        let (seconds, _) = instant.to_seconds_and_subsec();
        UtcOffset::from_seconds_unchecked(self.offset_seconds_at(seconds))
    }

    /// Maps a local date-time onto the UTC timeline.
    ///
    /// Offsets only ever change on whole-second boundaries, so sub-second
    /// local fields never influence the resolution.
    pub fn resolve_local(&self, local: &PlainDateTime) -> LocalResolution {
        if let TimeZoneKind::Fixed(offset) = &self.kind {
            return LocalResolution::Unambiguous(*offset);
        }
        let local_seconds = local.date().epoch_days() * 86_400 + local.time().nanosecond_of_day() / 1_000_000_000;
        // Offsets active shortly before and after cover every candidate:
        // real zones do not transition twice within 48 hours.
        let before = self.offset_seconds_at(local_seconds - 86_400);
        let after = self.offset_seconds_at(local_seconds + 86_400);
        let mut valid = [0i32; 2];
        let mut count = 0;
        for offset in [before.max(after), before.min(after)] {
            if count > 0 && valid[0] == offset {
                continue;
            }
            if self.offset_seconds_at(local_seconds - offset as i64) == offset {
                valid[count] = offset;
                count += 1;
            }
        }
        match count {
            // Both offsets map the local time back to itself: a fold. The
            // larger offset produces the earlier instant.
            2 => LocalResolution::Ambiguous {
                earlier: UtcOffset::from_seconds_unchecked(valid[0]),
                later: UtcOffset::from_seconds_unchecked(valid[1]),
            },
            1 => LocalResolution::Unambiguous(UtcOffset::from_seconds_unchecked(valid[0])),
            // No offset maps the local time back to itself: a gap.
            _ => LocalResolution::Skipped {
                before: UtcOffset::from_seconds_unchecked(before),
                after: UtcOffset::from_seconds_unchecked(after),
            },
        }
    }

    /// Every instant whose local time in this zone equals `local`:
    /// two in a fold, one in the common case, none in a gap.
    ///
    /// ```no_run
    /// use tempora::{PlainDateTime, TimeZone};
    /// let tz = TimeZone::named("Europe/Amsterdam")?;
    /// let spring_gap = PlainDateTime::new(2025, 3, 30, 2, 30, 0)?;
    /// assert!(tz.possible_instants_for(&spring_gap)?.is_empty());
    /// # Ok::<_, tempora::Error>(())
    /// ```
    pub fn possible_instants_for(&self, local: &PlainDateTime) -> Result<Vec<Instant>, Error> {
        match self.resolve_local(local) {
            LocalResolution::Unambiguous(offset) => Ok(vec![self.instant_with_offset(local, offset)?]),
            LocalResolution::Ambiguous { earlier, later } => Ok(vec![
                self.instant_with_offset(local, earlier)?,
                self.instant_with_offset(local, later)?,
            ]),
            LocalResolution::Skipped { .. } => Ok(Vec::new()),
        }
    }

    /// Resolves a local date-time to a single instant under the given
    /// disambiguation policy.
    ///
    /// In a fold, `Compatible` and `Earlier` pick the earlier instant and
    /// `Later` the later one. In a gap, `Compatible` and `Later` shift the
    /// local time forward by the gap's length and resolve it with the
    /// later offset; `Earlier` lands just before the gap. `Reject` fails
    /// in both cases.
    pub fn instant_for(&self, local: &PlainDateTime, disambiguation: Disambiguation) -> Result<Instant, Error> {
        match self.resolve_local(local) {
            LocalResolution::Unambiguous(offset) => self.instant_with_offset(local, offset),
            LocalResolution::Ambiguous { earlier, later } => match disambiguation {
                Disambiguation::Compatible | Disambiguation::Earlier => self.instant_with_offset(local, earlier),
                Disambiguation::Later => self.instant_with_offset(local, later),
                Disambiguation::Reject => Err(Error::AmbiguousDateTime),
            },
            LocalResolution::Skipped { before, after } => match disambiguation {
                // local - before = (local + gap) - after: the same instant
                // seen from both ends of the gap.
                Disambiguation::Compatible | Disambiguation::Later => self.instant_with_offset(local, before),
                Disambiguation::Earlier => self.instant_with_offset(local, after),
                Disambiguation::Reject => Err(Error::SkippedDateTime),
            },
        }
    }

    fn instant_with_offset(&self, local: &PlainDateTime, offset: UtcOffset) -> Result<Instant, Error> {
        let nanos = local.epoch_nanoseconds_naive() - offset.total_seconds() as i128 * NANOS_PER_SEC;
        match i64::try_from(nanos) {
            Ok(nanos) => Ok(Instant::from_epoch_nanoseconds(nanos)),
            Err(_) => Err(Error::OutOfRange),
        }
    }

    /// The first offset transition strictly after `instant`, or `None` for
    /// fixed zones and instants beyond the last known rule.
    pub fn next_transition(&self, instant: Instant) -> Option<Instant> {
        // Transitions sit on whole seconds; anything inside the current
        // second is already past its start.
        let (seconds, _) = instant.to_seconds_and_subsec();
        let at = match &self.kind {
            TimeZoneKind::Fixed(_) => None,
            TimeZoneKind::Named { data, .. } => data.next_transition(seconds),
            TimeZoneKind::Posix { rule, .. } => rule.next_transition(seconds),
        }?;
        at.checked_mul(1_000_000_000).map(Instant::from_epoch_nanoseconds)
    }

    /// The last offset transition strictly before `instant`, or `None`.
    pub fn previous_transition(&self, instant: Instant) -> Option<Instant> {
        let (seconds, subsec) = instant.to_seconds_and_subsec();
        // An instant inside a second is strictly after that second's start.
        let seconds = if subsec > 0 { seconds + 1 } else { seconds };
        let at = match &self.kind {
            TimeZoneKind::Fixed(_) => None,
            TimeZoneKind::Named { data, .. } => data.previous_transition(seconds),
            TimeZoneKind::Posix { rule, .. } => rule.previous_transition(seconds),
        }?;
        at.checked_mul(1_000_000_000).map(Instant::from_epoch_nanoseconds)
    }

    /// Projects an instant into this zone's local date-time.
    pub fn to_plain_datetime(&self, instant: Instant) -> Result<PlainDateTime, Error> {
        let offset = self.offset_at(instant);
        let nanos = instant.epoch_nanoseconds() as i128 + offset.total_seconds() as i128 * NANOS_PER_SEC;
        PlainDateTime::from_epoch_nanoseconds_naive(nanos, crate::Calendar::Iso8601)
    }

    /// The length of the local day starting at `start_of_day` in
    /// nanoseconds, usually 24 hours but 23 or 25 around DST transitions.
    pub(crate) fn day_length_nanoseconds(&self, local_date: crate::PlainDate) -> Result<i128, Error> {
        let start = self.start_of_day(local_date)?;
        let next_date = local_date.add_days(1)?;
        let end = self.start_of_day(next_date)?;
        Ok(end.epoch_nanoseconds() as i128 - start.epoch_nanoseconds() as i128)
    }

    /// The instant the given local calendar date begins in this zone.
    ///
    /// When midnight falls in a DST gap this is the instant at the gap's
    /// end rather than 00:00.
    pub(crate) fn start_of_day(&self, local_date: crate::PlainDate) -> Result<Instant, Error> {
        let midnight = local_date.at(crate::PlainTime::MIDNIGHT);
        self.instant_for(&midnight, Disambiguation::Compatible)
    }
}

impl PartialEq for TimeZone {
    fn eq(&self, other: &Self) -> bool {
        match (&self.kind, &other.kind) {
            (TimeZoneKind::Fixed(a), TimeZoneKind::Fixed(b)) => a == b,
            (TimeZoneKind::Named { id: a, .. }, TimeZoneKind::Named { id: b, .. }) => a == b,
            (TimeZoneKind::Posix { source: a, .. }, TimeZoneKind::Posix { source: b, .. }) => a == b,
            _ => false,
        }
    }
}

impl Eq for TimeZone {}

impl core::fmt::Display for TimeZone {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match &self.kind {
            TimeZoneKind::Fixed(offset) => offset.fmt(f),
            TimeZoneKind::Named { id, .. } => f.write_str(id),
            TimeZoneKind::Posix { source, .. } => f.write_str(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datetime;

    fn amsterdam_like() -> TimeZone {
        // Central European Time with the EU DST rule, as a POSIX zone so
        // the tests do not depend on host tzdata.
        TimeZone::posix("CET-1CEST,M3.5.0,M10.5.0/3").unwrap()
    }

    #[test]
    fn test_fixed_zone_is_trivial() {
        let tz = TimeZone::fixed(UtcOffset::from_hms(5, 30, 0).unwrap());
        let local = datetime!(2025 - 6 - 1 12:00);
        assert_eq!(
            tz.resolve_local(&local),
            LocalResolution::Unambiguous(UtcOffset::from_hms(5, 30, 0).unwrap())
        );
        assert_eq!(tz.next_transition(Instant::UNIX_EPOCH), None);
        assert_eq!(tz.previous_transition(Instant::UNIX_EPOCH), None);
    }

    #[test]
    fn test_spring_gap() {
        let tz = amsterdam_like();
        // 2025-03-30 02:30 never happens: clocks jump 02:00 -> 03:00.
        let local = datetime!(2025 - 3 - 30 2:30);
        assert!(tz.possible_instants_for(&local).unwrap().is_empty());
        assert!(matches!(tz.resolve_local(&local), LocalResolution::Skipped { .. }));

        let compatible = tz.instant_for(&local, Disambiguation::Compatible).unwrap();
        assert_eq!(tz.to_plain_datetime(compatible).unwrap(), datetime!(2025 - 3 - 30 3:30));
        let earlier = tz.instant_for(&local, Disambiguation::Earlier).unwrap();
        assert_eq!(tz.to_plain_datetime(earlier).unwrap(), datetime!(2025 - 3 - 30 1:30));
        assert_eq!(
            tz.instant_for(&local, Disambiguation::Reject),
            Err(Error::SkippedDateTime)
        );
    }

    #[test]
    fn test_autumn_fold() {
        let tz = amsterdam_like();
        // 2025-10-26 02:30 happens twice: clocks fall back 03:00 -> 02:00.
        let local = datetime!(2025 - 10 - 26 2:30);
        let possible = tz.possible_instants_for(&local).unwrap();
        assert_eq!(possible.len(), 2);
        assert!(possible[0] < possible[1]);
        assert_eq!(
            possible[1].epoch_nanoseconds() - possible[0].epoch_nanoseconds(),
            3_600_000_000_000
        );

        let earlier = tz.instant_for(&local, Disambiguation::Earlier).unwrap();
        let later = tz.instant_for(&local, Disambiguation::Later).unwrap();
        assert_eq!(earlier, possible[0]);
        assert_eq!(later, possible[1]);
        assert_eq!(
            tz.instant_for(&local, Disambiguation::Compatible).unwrap(),
            earlier
        );
        assert_eq!(
            tz.instant_for(&local, Disambiguation::Reject),
            Err(Error::AmbiguousDateTime)
        );
        // Earlier instant carries the pre-transition (summer) offset.
        assert_eq!(tz.offset_at(earlier).total_seconds(), 7200);
        assert_eq!(tz.offset_at(later).total_seconds(), 3600);
    }

    #[test]
    fn test_round_trip_off_transition() {
        let tz = amsterdam_like();
        for local in [
            datetime!(2025 - 1 - 15 12:00),
            datetime!(2025 - 7 - 15 23:59:59),
            datetime!(2025 - 3 - 30 1:59:59),
            datetime!(2025 - 3 - 30 3:00),
        ] {
            let instant = tz.instant_for(&local, Disambiguation::Reject).unwrap();
            assert_eq!(tz.to_plain_datetime(instant).unwrap(), local, "{local}");
        }
    }

    #[test]
    fn test_transition_search() {
        let tz = amsterdam_like();
        let winter = tz.instant_for(&datetime!(2025 - 1 - 15 12:00), Disambiguation::Reject).unwrap();
        let next = tz.next_transition(winter).unwrap();
        // 2025-03-30T01:00:00Z is the spring transition.
        assert_eq!(next.to_string(), "2025-03-30T01:00:00Z");
        let after = tz.next_transition(next).unwrap();
        assert_eq!(after.to_string(), "2025-10-26T01:00:00Z");
        assert_eq!(tz.previous_transition(next), tz.previous_transition(winter));
    }

    #[test]
    fn test_day_length() {
        let tz = amsterdam_like();
        let short = tz.day_length_nanoseconds(crate::date!(2025 - 3 - 30)).unwrap();
        assert_eq!(short, 23 * 3_600_000_000_000);
        let long = tz.day_length_nanoseconds(crate::date!(2025 - 10 - 26)).unwrap();
        assert_eq!(long, 25 * 3_600_000_000_000);
        let normal = tz.day_length_nanoseconds(crate::date!(2025 - 6 - 1)).unwrap();
        assert_eq!(normal, crate::options::NANOS_PER_DAY as i128);
    }
}
