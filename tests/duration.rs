//! Duration balancing, rounding, totalling, and comparison.

use core::cmp::Ordering;

use tempora::ext::DurationLiteral;
use tempora::{
    date, datetime, Duration, DurationRoundOptions, Error, RelativeTo, RoundingMode, Unit,
};

fn round_options(smallest: Unit) -> DurationRoundOptions {
    DurationRoundOptions::default().with_smallest_unit(smallest)
}

#[test]
fn sign_invariant_is_enforced_everywhere() {
    assert_eq!(Duration::new(1, 0, 0, 0, -1, 0, 0, 0, 0, 0), Err(Error::InvalidDuration));
    assert_eq!("P1YT-3H".parse::<Duration>(), Err(Error::Parse("a time component after `T`")));
    let d = Duration::new(-1, -2, 0, -3, 0, 0, 0, 0, 0, 0).unwrap();
    assert_eq!(d.sign(), -1);
    assert_eq!(d.negated().sign(), 1);
    assert!(Duration::ZERO.is_blank());
}

#[test]
fn time_balancing_is_closed_form() {
    let d = Duration::new(0, 0, 0, 0, 0, 0, 3_661, 0, 0, 0).unwrap();
    let balanced = d.balance(Unit::Hour).unwrap();
    assert_eq!((balanced.hours(), balanced.minutes(), balanced.seconds()), (1, 1, 1));

    let nanos = Duration::from_nanoseconds(86_400_000_000_000 + 61_000_000_001);
    let balanced = nanos.balance(Unit::Day).unwrap();
    assert_eq!((balanced.days(), balanced.minutes(), balanced.seconds()), (1, 1, 1));
    assert_eq!(balanced.nanoseconds(), 1);
}

#[test]
fn calendar_balancing_needs_an_anchor() {
    assert_eq!(400.days().balance(Unit::Year), Err(Error::InvalidDuration));

    let anchor = RelativeTo::from(date!(2023 - 1 - 1));
    let balanced = 400.days().balance_relative(Unit::Year, &anchor).unwrap();
    assert_eq!((balanced.years(), balanced.months(), balanced.days()), (1, 1, 4));

    // Anchoring at a leap year shifts the decomposition.
    let anchor = RelativeTo::from(date!(2024 - 1 - 1));
    let balanced = 400.days().balance_relative(Unit::Year, &anchor).unwrap();
    assert_eq!((balanced.years(), balanced.months(), balanced.days()), (1, 1, 3));
}

#[test]
fn rounding_modes_differ_on_ties_and_sign() {
    let d = Duration::from_seconds(90);
    let cases = [
        (RoundingMode::HalfExpand, 2),
        (RoundingMode::Ceil, 2),
        (RoundingMode::Floor, 1),
        (RoundingMode::Trunc, 1),
    ];
    for (mode, minutes) in cases {
        let rounded = d.round(round_options(Unit::Minute).with_mode(mode)).unwrap();
        assert_eq!(rounded.minutes(), minutes, "{mode:?}");
    }
    let d = Duration::from_seconds(-90);
    let cases = [
        (RoundingMode::HalfExpand, -2),
        (RoundingMode::Ceil, -1),
        (RoundingMode::Floor, -2),
        (RoundingMode::Trunc, -1),
    ];
    for (mode, minutes) in cases {
        let rounded = d.round(round_options(Unit::Minute).with_mode(mode)).unwrap();
        assert_eq!(rounded.minutes(), minutes, "{mode:?}");
    }
}

#[test]
fn rounding_increment_must_divide_the_next_unit() {
    assert!(Duration::from_seconds(45).round(round_options(Unit::Second).with_increment(15)).is_ok());
    assert_eq!(
        Duration::from_seconds(45).round(round_options(Unit::Second).with_increment(45)),
        Err(Error::InvalidOption("roundingIncrement"))
    );
    assert_eq!(
        Duration::from_seconds(45).round(round_options(Unit::Second).with_increment(60)),
        Err(Error::InvalidOption("roundingIncrement"))
    );
}

#[test]
fn calendar_rounding_carries_upward() {
    let anchor = RelativeTo::from(date!(2025 - 1 - 1));
    let d = Duration::new(0, 11, 0, 20, 0, 0, 0, 0, 0, 0).unwrap();
    let rounded = d
        .round_relative(
            round_options(Unit::Month).with_largest_unit(Unit::Year),
            &anchor,
        )
        .unwrap();
    assert_eq!((rounded.years(), rounded.months()), (1, 0));

    // Round down when under the midpoint of the next month.
    let d = Duration::new(0, 2, 0, 10, 0, 0, 0, 0, 0, 0).unwrap();
    let rounded = d.round_relative(round_options(Unit::Month), &anchor).unwrap();
    assert_eq!(rounded.months(), 2);
}

#[test]
fn negative_calendar_rounding_mirrors_positive() {
    let anchor = RelativeTo::from(date!(2025 - 6 - 15));
    let d = Duration::new(0, -2, 0, -20, 0, 0, 0, 0, 0, 0).unwrap();
    let rounded = d.round_relative(round_options(Unit::Month), &anchor).unwrap();
    assert_eq!(rounded.months(), -3);
    assert_eq!(rounded.days(), 0);
}

#[test]
fn rounding_relative_to_a_zoned_anchor_uses_real_day_lengths() {
    let tz = tempora::TimeZone::posix("CET-1CEST,M3.5.0,M10.5.0/3").unwrap();
    let anchor = tempora::ZonedDateTime::from_local(
        &datetime!(2025 - 3 - 30 0:00),
        tz,
        tempora::Disambiguation::Compatible,
    )
    .unwrap();
    // The anchor day is 23 hours long; 11.5 elapsed hours are already past
    // its midpoint.
    let rounded = Duration::new(0, 0, 0, 0, 11, 30, 0, 0, 0, 0)
        .unwrap()
        .round_relative(round_options(Unit::Day), &RelativeTo::from(anchor.clone()))
        .unwrap();
    assert_eq!(rounded.days(), 1);
    // Against a plain anchor the same span rounds down.
    let rounded = Duration::new(0, 0, 0, 0, 11, 30, 0, 0, 0, 0)
        .unwrap()
        .round_relative(round_options(Unit::Day), &RelativeTo::from(date!(2025 - 3 - 30)))
        .unwrap();
    assert_eq!(rounded.days(), 0);
}

#[test]
fn totals_are_fractional() {
    assert_eq!(90.minutes().total(Unit::Hour).unwrap(), 1.5);
    assert_eq!(36.hours().total(Unit::Day).unwrap(), 1.5);
    assert_eq!(1.days().total(Unit::Minute).unwrap(), 1440.0);
    assert_eq!(1.months().total(Unit::Hour), Err(Error::InvalidDuration));

    let anchor = RelativeTo::from(date!(2025 - 1 - 1));
    // 45 days past a 31-day January is 14 days into a 28-day February.
    let total = 45.days().total_relative(Unit::Month, &anchor).unwrap();
    assert!((total - (1.0 + 14.0 / 28.0)).abs() < 1e-12);
}

#[test]
fn comparison_is_length_based() {
    assert_eq!(Duration::compare(&25.hours(), &1.days(), None).unwrap(), Ordering::Greater);
    assert_eq!(Duration::compare(&24.hours(), &1.days(), None).unwrap(), Ordering::Equal);
    let anchor = RelativeTo::from(date!(2024 - 2 - 1));
    // February 2024 has 29 days.
    assert_eq!(
        Duration::compare(&1.months(), &29.days(), Some(&anchor)).unwrap(),
        Ordering::Equal
    );
    assert_eq!(
        Duration::compare(&1.months(), &30.days(), Some(&anchor)).unwrap(),
        Ordering::Less
    );
}

#[test]
fn duration_addition_balances() {
    let sum = 90.minutes().add(&45.minutes()).unwrap();
    assert_eq!(sum.minutes(), 135);
    let sum = 20.hours().add(&10.hours()).unwrap();
    assert_eq!((sum.hours(), sum.minutes()), (30, 0));
    assert_eq!(1.months().add(&1.days()), Err(Error::InvalidDuration));
    let diff = 1.hours().subtract(&90.minutes()).unwrap();
    assert_eq!(diff.minutes(), -30);
}
