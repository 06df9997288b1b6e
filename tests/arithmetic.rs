//! End-to-end arithmetic behaviour across the value types.

use tempora::ext::DurationLiteral;
use tempora::{
    date, datetime, Calendar, Disambiguation, Duration, DurationRoundOptions, Error, Instant, Overflow, PlainDate,
    PlainDateTime, PlainMonthDay, TimeZone, Unit, ZonedDateTime,
};

#[test]
fn month_end_clamps_under_constrain() {
    let date = date!(2025 - 1 - 31);
    assert_eq!(date.add(&1.months(), Overflow::Constrain).unwrap(), date!(2025 - 2 - 28));
}

#[test]
fn month_end_rejects_under_reject() {
    let date = date!(2025 - 1 - 31);
    assert_eq!(date.add(&1.months(), Overflow::Reject), Err(Error::Arithmetic));
}

#[test]
fn month_end_clamps_to_leap_day() {
    let date = date!(2024 - 1 - 31);
    assert_eq!(date.add(&1.months(), Overflow::Constrain).unwrap(), date!(2024 - 2 - 29));
}

#[test]
fn hours_balance_into_days() {
    let balanced = 25.hours().balance(Unit::Day).unwrap();
    assert_eq!(balanced.to_string(), "P1DT1H");
}

#[test]
fn minutes_round_into_hours() {
    let options = DurationRoundOptions::default()
        .with_smallest_unit(Unit::Minute)
        .with_largest_unit(Unit::Hour);
    let rounded = 90.minutes().round(options).unwrap();
    assert_eq!(rounded.to_string(), "PT1H30M");
}

#[test]
fn instant_rounds_to_the_nearest_minute() {
    let instant: Instant = "2025-03-14T09:32:47Z".parse().unwrap();
    assert_eq!(instant.round(Unit::Minute).unwrap().to_string(), "2025-03-14T09:33:00Z");
}

#[test]
fn buddhist_year_of_a_plain_date() {
    let date = date!(2025 - 3 - 14);
    assert_eq!(Calendar::Buddhist.year(&date), 2568);
    assert_eq!(Calendar::Buddhist.era_year(&date), Some(2568));
    assert_eq!(Calendar::Buddhist.era(&date), Some("be"));
}

#[test]
fn leap_day_rejects_non_leap_years() {
    let leap_day: PlainMonthDay = "--02-29".parse().unwrap();
    assert_eq!(leap_day.to_plain_date(2023), Err(Error::OutOfRange));
    assert!(leap_day.to_plain_date(2024).is_ok());
}

#[test]
fn datetime_addition_carries_days() {
    let dt = datetime!(2024 - 2 - 28 23:30);
    let later = dt.add(&90.minutes(), Overflow::Constrain).unwrap();
    assert_eq!(later, datetime!(2024 - 2 - 29 1:00));
}

#[test]
fn add_and_subtract_time_invert() {
    let dt = datetime!(2021 - 7 - 16 9:45:30);
    for step in [90.minutes(), 12.hours(), 86_400.seconds(), 123.milliseconds()] {
        let there = dt.add(&step, Overflow::Constrain).unwrap();
        let back = there.subtract(&step, Overflow::Constrain).unwrap();
        assert_eq!(back, dt, "{step:?}");
    }
}

#[test]
fn until_inverts_add_for_dates() {
    let pairs = [
        (date!(2019 - 1 - 30), date!(2021 - 2 - 14)),
        (date!(2024 - 2 - 29), date!(2025 - 2 - 28)),
        (date!(2020 - 12 - 31), date!(2021 - 1 - 1)),
    ];
    for (a, b) in pairs {
        for largest in [Unit::Day, Unit::Week, Unit::Month, Unit::Year] {
            let forward = a.until(&b, largest).unwrap();
            assert_eq!(a.add(&forward, Overflow::Constrain).unwrap(), b);
            let backward = a.since(&b, largest).unwrap();
            assert_eq!(b.add(&backward, Overflow::Constrain).unwrap(), a);
        }
    }
}

#[test]
fn zoned_day_addition_preserves_local_noon() {
    // The EU DST rule as a POSIX zone keeps this independent of tzdata.
    let tz = TimeZone::posix("CET-1CEST,M3.5.0,M10.5.0/3").unwrap();
    let zdt = ZonedDateTime::from_local(&datetime!(2025 - 3 - 29 12:00), tz, Disambiguation::Compatible).unwrap();
    let next = zdt.add(&1.days()).unwrap();
    assert_eq!(next.to_plain_datetime(), datetime!(2025 - 3 - 30 12:00));
    assert_eq!(next.offset().total_seconds(), 7200);
    // Only 23 real hours passed.
    assert_eq!(next.to_instant().epoch_seconds() - zdt.to_instant().epoch_seconds(), 23 * 3600);
}

#[test]
fn year_month_until_is_calendar_aware() {
    let a: tempora::PlainYearMonth = "2023-11".parse().unwrap();
    let b: tempora::PlainYearMonth = "2025-02".parse().unwrap();
    let d = a.until(&b, Unit::Year).unwrap();
    assert_eq!((d.years(), d.months()), (1, 3));
}

#[test]
fn duration_compare_requires_anchor_for_calendar_units() {
    assert_eq!(
        Duration::compare(&1.months(), &30.days(), None),
        Err(Error::InvalidDuration)
    );
    let anchor = tempora::RelativeTo::from(date!(2025 - 2 - 1));
    assert_eq!(
        Duration::compare(&1.months(), &28.days(), Some(&anchor)).unwrap(),
        core::cmp::Ordering::Equal
    );
}

#[test]
fn plain_datetime_until_with_zone_matches_instants() {
    let tz = TimeZone::posix("EST5EDT,M3.2.0,M11.1.0").unwrap();
    let start = ZonedDateTime::from_local(&datetime!(2021 - 3 - 13 12:00), tz.clone(), Disambiguation::Compatible).unwrap();
    let end = ZonedDateTime::from_local(&datetime!(2021 - 3 - 14 12:00), tz, Disambiguation::Compatible).unwrap();
    // One civil day apart, 23 elapsed hours.
    assert_eq!(start.until(&end, Unit::Day).unwrap().days(), 1);
    assert_eq!(start.until(&end, Unit::Hour).unwrap().hours(), 23);
}

#[test]
fn rejected_overflow_is_not_a_parse_error() {
    // Structural and semantic failures stay distinct.
    assert_eq!("2025-02-30".parse::<PlainDate>(), Err(Error::OutOfRange));
    assert_eq!("2025-02-3x".parse::<PlainDate>(), Err(Error::Parse("a digit")));
    assert!(matches!("not a datetime".parse::<PlainDateTime>(), Err(Error::Parse(_))));
}
