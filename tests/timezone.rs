//! Timezone resolution against TZif data and POSIX rules.
//!
//! The TZif cases run against byte images assembled in memory, so they do
//! not depend on the host's tzdata. A few smoke tests at the end use the OS
//! database when it is present and skip quietly otherwise.

use std::io::Cursor;

use tempora::ext::DurationLiteral;
use tempora::{
    datetime, Disambiguation, Error, Instant, LocalResolution, PlainDateTime, TimeZone, UtcOffset, ZonedDateTime,
};

/// Builds a minimal version 2 TZif image: a list of `(offset, is_dst)`
/// types, `(at, type_index)` transitions, and a footer TZ string.
fn build_tzif(types: &[(i32, bool)], transitions: &[(i64, u8)], footer: &str) -> Vec<u8> {
    fn header(out: &mut Vec<u8>, timecnt: u32, typecnt: u32) {
        out.extend_from_slice(b"TZif2");
        out.extend_from_slice(&[0u8; 15]);
        out.extend_from_slice(&0u32.to_be_bytes()); // isutcnt
        out.extend_from_slice(&0u32.to_be_bytes()); // isstdcnt
        out.extend_from_slice(&0u32.to_be_bytes()); // leapcnt
        out.extend_from_slice(&timecnt.to_be_bytes());
        out.extend_from_slice(&typecnt.to_be_bytes());
        out.extend_from_slice(&4u32.to_be_bytes()); // charcnt
    }
    let mut out = Vec::new();
    // Empty legacy 32-bit block.
    header(&mut out, 0, types.len() as u32);
    for &(offset, dst) in types {
        out.extend_from_slice(&offset.to_be_bytes());
        out.push(dst as u8);
        out.push(0);
    }
    out.extend_from_slice(b"LMT\0");
    // The 64-bit block that actually matters.
    header(&mut out, transitions.len() as u32, types.len() as u32);
    for &(at, _) in transitions {
        out.extend_from_slice(&at.to_be_bytes());
    }
    for &(_, idx) in transitions {
        out.push(idx);
    }
    for &(offset, dst) in types {
        out.extend_from_slice(&offset.to_be_bytes());
        out.push(dst as u8);
        out.push(0);
    }
    out.extend_from_slice(b"LMT\0");
    out.push(b'\n');
    out.extend_from_slice(footer.as_bytes());
    out.push(b'\n');
    out
}

/// A Central European zone with explicit transitions for 2024 and a POSIX
/// footer covering everything after them.
fn synthetic_cet() -> TimeZone {
    // 2024-03-31T01:00:00Z and 2024-10-27T01:00:00Z.
    let bytes = build_tzif(
        &[(3600, false), (7200, true)],
        &[(1711846800, 1), (1729990800, 0)],
        "CET-1CEST,M3.5.0,M10.5.0/3",
    );
    TimeZone::load(Cursor::new(bytes), String::from("Europe/Synthetic")).unwrap()
}

fn resolve(tz: &TimeZone, local: PlainDateTime) -> ZonedDateTime {
    ZonedDateTime::from_local(&local, tz.clone(), Disambiguation::Compatible).unwrap()
}

#[test]
fn offsets_follow_the_transition_table() {
    let tz = synthetic_cet();
    let winter = resolve(&tz, datetime!(2024 - 2 - 1 12:00));
    assert_eq!(winter.offset(), UtcOffset::from_hms(1, 0, 0).unwrap());
    let summer = resolve(&tz, datetime!(2024 - 7 - 1 12:00));
    assert_eq!(summer.offset(), UtcOffset::from_hms(2, 0, 0).unwrap());
}

#[test]
fn posix_footer_extends_past_the_table() {
    let tz = synthetic_cet();
    // 2030 is far beyond the embedded table.
    let summer = resolve(&tz, datetime!(2030 - 7 - 1 12:00));
    assert_eq!(summer.offset(), UtcOffset::from_hms(2, 0, 0).unwrap());
    let winter = resolve(&tz, datetime!(2030 - 1 - 1 12:00));
    assert_eq!(winter.offset(), UtcOffset::from_hms(1, 0, 0).unwrap());
}

#[test]
fn gap_yields_no_instants() {
    let tz = synthetic_cet();
    let skipped = datetime!(2024 - 3 - 31 2:30);
    assert!(tz.possible_instants_for(&skipped).unwrap().is_empty());
    assert!(matches!(tz.resolve_local(&skipped), LocalResolution::Skipped { .. }));
    assert_eq!(tz.instant_for(&skipped, Disambiguation::Reject), Err(Error::SkippedDateTime));

    // Compatible pushes past the gap with the later offset.
    let resolved = tz.instant_for(&skipped, Disambiguation::Compatible).unwrap();
    assert_eq!(tz.to_plain_datetime(resolved).unwrap(), datetime!(2024 - 3 - 31 3:30));
}

#[test]
fn fold_yields_two_instants() {
    let tz = synthetic_cet();
    let repeated = datetime!(2024 - 10 - 27 2:30);
    let possible = tz.possible_instants_for(&repeated).unwrap();
    assert_eq!(possible.len(), 2);
    assert_eq!(
        possible[1].epoch_nanoseconds() - possible[0].epoch_nanoseconds(),
        3_600_000_000_000
    );
    assert_eq!(tz.instant_for(&repeated, Disambiguation::Earlier).unwrap(), possible[0]);
    assert_eq!(tz.instant_for(&repeated, Disambiguation::Later).unwrap(), possible[1]);
    assert_eq!(tz.instant_for(&repeated, Disambiguation::Compatible).unwrap(), possible[0]);
    assert_eq!(tz.instant_for(&repeated, Disambiguation::Reject), Err(Error::AmbiguousDateTime));
}

#[test]
fn local_to_instant_round_trips_off_transitions() {
    let tz = synthetic_cet();
    for local in [
        datetime!(2024 - 1 - 10 0:00),
        datetime!(2024 - 3 - 31 1:59),
        datetime!(2024 - 3 - 31 3:00),
        datetime!(2024 - 10 - 27 1:59),
        datetime!(2024 - 10 - 27 3:00),
        datetime!(2026 - 6 - 1 9:15),
    ] {
        let instant = tz.instant_for(&local, Disambiguation::Reject).unwrap();
        assert_eq!(tz.to_plain_datetime(instant).unwrap(), local, "{local}");
    }
}

#[test]
fn transition_search_crosses_into_the_posix_tail() {
    let tz = synthetic_cet();
    let start = tz.instant_for(&datetime!(2024 - 1 - 1 0:00), Disambiguation::Reject).unwrap();
    let spring = tz.next_transition(start).unwrap();
    assert_eq!(spring.to_string(), "2024-03-31T01:00:00Z");
    let fall = tz.next_transition(spring).unwrap();
    assert_eq!(fall.to_string(), "2024-10-27T01:00:00Z");
    // The next one comes from the POSIX footer, not the table.
    let rule_based = tz.next_transition(fall).unwrap();
    assert_eq!(rule_based.to_string(), "2025-03-30T01:00:00Z");
    assert_eq!(tz.previous_transition(rule_based), Some(fall));
    assert_eq!(tz.previous_transition(start), None);
}

#[test]
fn fixed_offset_zones_have_no_transitions() {
    let tz = TimeZone::fixed(UtcOffset::from_hms(-8, 0, 0).unwrap());
    assert!(tz.is_fixed());
    assert_eq!(tz.next_transition(Instant::UNIX_EPOCH), None);
    assert_eq!(tz.previous_transition(Instant::MAX), None);
    let local = datetime!(1999 - 12 - 31 16:00);
    let instant = tz.instant_for(&local, Disambiguation::Reject).unwrap();
    assert_eq!(instant.to_string(), "2000-01-01T00:00:00Z");
}

#[test]
fn zoned_string_offset_selects_the_fold_side() {
    let tz = synthetic_cet();
    let earlier = tz
        .instant_for(&datetime!(2024 - 10 - 27 2:30), Disambiguation::Earlier)
        .unwrap();
    let zdt = ZonedDateTime::new(earlier, tz);
    // The earlier side of the fold formats with the summer offset.
    assert_eq!(
        zdt.to_string(),
        "2024-10-27T02:30:00+02:00[Europe/Synthetic]"
    );
}

#[test]
fn zoned_arithmetic_follows_the_local_clock() {
    let tz = synthetic_cet();
    let before = resolve(&tz, datetime!(2024 - 3 - 30 12:00));
    let after = before.add(&1.days()).unwrap();
    assert_eq!(after.to_plain_datetime(), datetime!(2024 - 3 - 31 12:00));
    assert_eq!(after.to_instant().epoch_seconds() - before.to_instant().epoch_seconds(), 23 * 3600);

    // Mixed durations apply the calendar part first, then the time part on
    // the re-resolved instant.
    let day_and_hour = tempora::Duration::new(0, 0, 0, 1, 1, 0, 0, 0, 0, 0).unwrap();
    let mixed = before.add(&day_and_hour).unwrap();
    assert_eq!(mixed.to_plain_datetime(), datetime!(2024 - 3 - 31 13:00));
}

#[test]
fn hours_in_day_reflects_dst() {
    let tz = synthetic_cet();
    assert_eq!(resolve(&tz, datetime!(2024 - 3 - 31 12:00)).hours_in_day().unwrap(), 23.0);
    assert_eq!(resolve(&tz, datetime!(2024 - 10 - 27 12:00)).hours_in_day().unwrap(), 25.0);
    assert_eq!(resolve(&tz, datetime!(2024 - 6 - 15 12:00)).hours_in_day().unwrap(), 24.0);
}

#[test]
fn unknown_and_invalid_identifiers_fail() {
    assert_eq!(TimeZone::named("Nowhere/Atlantis"), Err(Error::UnknownTimeZone));
    assert_eq!(TimeZone::named("../secrets"), Err(Error::UnknownTimeZone));
    assert_eq!(
        TimeZone::load(Cursor::new(b"garbage".to_vec()), String::from("X")),
        Err(Error::InvalidZoneData)
    );
}

// The remaining tests exercise the OS database and skip on hosts without it.

fn os_zone(id: &str) -> Option<TimeZone> {
    TimeZone::named(id).ok()
}

#[test]
fn os_database_zones_resolve() {
    let Some(tz) = os_zone("Europe/Amsterdam") else {
        return;
    };
    let skipped = datetime!(2025 - 3 - 30 2:30);
    assert!(tz.possible_instants_for(&skipped).unwrap().is_empty());
    let zdt: ZonedDateTime = "2025-03-29T12:00:00+01:00[Europe/Amsterdam]".parse().unwrap();
    let next = zdt.add(&1.days()).unwrap();
    assert_eq!(next.to_string(), "2025-03-30T12:00:00+02:00[Europe/Amsterdam]");
}

#[test]
fn os_database_agrees_with_posix_tail() {
    let Some(tz) = os_zone("America/New_York") else {
        return;
    };
    let summer = tz
        .instant_for(&datetime!(2031 - 7 - 4 12:00), Disambiguation::Compatible)
        .unwrap();
    assert_eq!(tz.offset_at(summer), UtcOffset::from_hms(-4, 0, 0).unwrap());
}
