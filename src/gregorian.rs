//! Low level algorithms pertaining to the proleptic Gregorian calendar.

/*

A vast majority of these algorithms came from sources far smarter than I.

Thanks to Howard Hinnant for his clear and easy to read algorithms
(http://howardhinnant.github.io/date_algorithms.html) and to the TC39
Temporal champions for pinning down the value-space semantics.

*/

// The first index is unused
pub(crate) const DAYS_IN_MONTH: [u8; 13] = [0, 31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
pub(crate) const DAYS_BEFORE_MONTH: [u16; 13] = [0, 0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];

/// The minimum allowed epoch days that this library supports.
pub const MIN_EPOCH_DAYS: i64 = -100_000_001;

/// The maximum allowed epoch days that this library supports.
pub const MAX_EPOCH_DAYS: i64 = 100_000_000;

/// Returns `true` if the year is a leap year or not.
#[inline]
pub const fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Returns the number of days in that given month and year.
#[inline]
pub const fn days_in_month(year: i32, month: u8) -> u8 {
    if month == 2 && is_leap_year(year) {
        29
    } else {
        DAYS_IN_MONTH[month as usize]
    }
}

/// Returns the number of days in the given year, either 365 or 366.
#[inline]
pub const fn days_in_year(year: i32) -> u16 {
    if is_leap_year(year) {
        366
    } else {
        365
    }
}

/// Returns how many days preceed the first day of the given month in the year.
#[inline]
pub const fn days_before_month(year: i32, month: u8) -> u16 {
    let offset = month > 2 && is_leap_year(year);
    DAYS_BEFORE_MONTH[month as usize] + offset as u16
}

/// Returns the ordinal date of a given year, month, and day.
///
/// # Panics
///
/// In debug mode, this panics if the day is out of range for the given month.
/// Note that in `const` contexts this becomes a compile time error.
#[inline]
pub const fn date_to_ordinal(year: i32, month: u8, day: u8) -> u16 {
    debug_assert!(day >= 1 && day <= days_in_month(year, month), "day is out of range");
    days_before_month(year, month) + day as u16
}

const ERA_DURATION: i64 = 400;
/// The number of days in a 400 year period
const DAYS_IN_ERA: i64 = 146097;
/// The number of days to go from 0000-03-01 to 1970-01-01
const DAYS_TO_EPOCH: i64 = 719468;

/// Returns the number of days from 1970-01-01 of a given year, month, and day.
///
/// Note that this method does *not* do any bound checking on `month` or `day` values.
/// Feeding the algorithm garbage values will return garbage output, a classic case of
/// garbage-in-garbage-out.
#[inline]
pub const fn date_to_epoch_days(year: i32, month: u8, day: u8) -> i64 {
    let y = year as i64 - (month <= 2) as i64;
    let era = y.div_euclid(ERA_DURATION);
    let year_of_era = y - era * ERA_DURATION; // [0, 399]
    let m = if month > 2 { month - 3 } else { month + 9 } as i64;
    let day_of_year = (153 * m + 2) / 5 + day as i64 - 1; // [0, 365]
    let day_of_era = 365 * year_of_era + year_of_era / 4 - year_of_era / 100 + day_of_year; // [0, 146096]
    era * DAYS_IN_ERA + day_of_era - DAYS_TO_EPOCH
}

/// Converts the number of days since 1970-01-01 into a (year, month, day) tuple.
#[inline]
pub const fn date_from_epoch_days(mut days: i64) -> (i32, u8, u8) {
    days += DAYS_TO_EPOCH;
    let era = days.div_euclid(DAYS_IN_ERA);
    let day_of_era = days - era * DAYS_IN_ERA; // [0, 146096]
    let year_of_era = (day_of_era - day_of_era / 1460 + day_of_era / 36524 - day_of_era / 146096) / 365; // [0, 399]
    let mut y = year_of_era + era * ERA_DURATION;
    let day_of_year = day_of_era - (365 * year_of_era + year_of_era / 4 - year_of_era / 100); // [0, 365]
    let mp = (5 * day_of_year + 2) / 153; // [0, 11]
    let d = day_of_year - (153 * mp + 2) / 5 + 1; // [1, 31]
    let m = if mp < 10 { mp + 3 } else { mp - 9 }; // [1, 12]
    y += (m <= 2) as i64;
    (y as i32, m as u8, d as u8)
}

/// Returns the weekday from the days after 1970-01-01.
///
/// Note that 0 is Sunday and 6 is Saturday.
#[inline]
pub const fn weekday_from_days(civil: i64) -> u8 {
    (civil + 4).rem_euclid(7) as u8
}

/// Returns the difference between two weekdays.
///
/// This returns a number between [0, 6] and assumes both x and y are <= 6.
///
/// Note that 0 is Sunday and 6 is Saturday.
#[inline]
pub const fn weekday_difference(x: u8, y: u8) -> u8 {
    let x = x.wrapping_sub(y);
    if x <= 6 {
        x
    } else {
        x.wrapping_add(7)
    }
}

/// Returns the number of ISO weeks in a given year.
#[inline]
pub const fn iso_weeks_in_year(year: i32) -> u8 {
    // A year has 53 weeks if it ends on a Thursday, or on a Friday
    // following a leap day.
    let dec31 = weekday_from_days(date_to_epoch_days(year, 12, 31));
    let prev_dec31 = weekday_from_days(date_to_epoch_days(year - 1, 12, 31));
    if dec31 == 4 || prev_dec31 == 3 {
        53
    } else {
        52
    }
}

/// Returns the epoch representing the Monday starting week 1 of an ISO year.
#[inline]
pub(crate) const fn iso_week_start_epoch_from_year(year: i32) -> i64 {
    // Week 1 contains January 4th.
    let epoch = date_to_epoch_days(year, 1, 4);
    let weekday = weekday_from_days(epoch);
    // difference from Monday
    epoch - weekday_difference(weekday, 1) as i64
}

/// Determines where the ISO week starts from a given year and epoch of date.
pub(crate) const fn find_iso_week_start_epoch(year: i32, epoch: i64) -> i64 {
    let start = iso_week_start_epoch_from_year(year);
    if epoch < start {
        return iso_week_start_epoch_from_year(year - 1);
    }
    let next_start = iso_week_start_epoch_from_year(year + 1);
    if epoch >= next_start {
        next_start
    } else {
        start
    }
}

/// Computes the quotient and remainder using truncating division.
///
/// Equivalent to `(lhs / rhs, lhs % rhs)`.
macro_rules! divrem {
    ($lhs:expr, $rhs:expr) => {{
        let lhs = $lhs;
        let rhs = $rhs;
        (lhs / rhs, lhs % rhs)
    }};
}

/// Returns the quotient and remainder using Euclidean division.
///
/// This is similar to Python's `divmod` function.
macro_rules! divmod {
    ($lhs:expr, $rhs:expr) => {{
        let (lhs, rhs) = ($lhs, $rhs);
        (lhs.div_euclid(rhs), lhs.rem_euclid(rhs))
    }};
}

macro_rules! ensure_in_range {
    ($value:expr, $min:expr => $max:expr) => {
        if $value < $min || $value > $max {
            return Err($crate::Error::OutOfRange);
        }
    };

    ($value:ident, $max:expr) => {
        if $value > $max {
            return Err($crate::Error::OutOfRange);
        }
    };
}

pub(crate) use divmod;
pub(crate) use divrem;
pub(crate) use ensure_in_range;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epoch_day_codec() {
        assert_eq!(date_to_epoch_days(1970, 1, 1), 0);
        assert_eq!(date_from_epoch_days(0), (1970, 1, 1));
        assert_eq!(weekday_from_days(0), 4); // 1970-01-01 was a Thursday
        assert_eq!(date_to_epoch_days(2000, 3, 1), 11017);
        assert_eq!(date_to_epoch_days(1969, 12, 31), -1);
        assert_eq!(date_from_epoch_days(-1), (1969, 12, 31));
        // Year zero exists and is a leap year.
        assert!(is_leap_year(0));
        assert_eq!(date_from_epoch_days(date_to_epoch_days(0, 2, 29)), (0, 2, 29));
    }

    #[test]
    fn test_codec_round_trip_across_era() {
        // Sweep a 400-year era day by day on both sides of the epoch.
        for &base in &[date_to_epoch_days(1600, 1, 1), date_to_epoch_days(-400, 1, 1)] {
            let mut prev = date_from_epoch_days(base - 1);
            for offset in 0..DAYS_IN_ERA {
                let z = base + offset;
                let (y, m, d) = date_from_epoch_days(z);
                assert_eq!(date_to_epoch_days(y, m, d), z);
                assert!((y, m, d) > prev);
                assert!(m >= 1 && m <= 12);
                assert!(d >= 1 && d <= days_in_month(y, m));
                prev = (y, m, d);
            }
        }
    }

    #[test]
    fn test_codec_extremes() {
        let (y, m, d) = date_from_epoch_days(MIN_EPOCH_DAYS);
        assert_eq!(date_to_epoch_days(y, m, d), MIN_EPOCH_DAYS);
        assert_eq!((y, m, d), (-271821, 4, 19));
        let (y, m, d) = date_from_epoch_days(MAX_EPOCH_DAYS);
        assert_eq!(date_to_epoch_days(y, m, d), MAX_EPOCH_DAYS);
        assert_eq!((y, m, d), (275760, 9, 13));
    }

    #[test]
    fn test_leap_years() {
        assert!(is_leap_year(2000));
        assert!(is_leap_year(2024));
        assert!(!is_leap_year(1900));
        assert!(!is_leap_year(2023));
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_year(2024), 366);
        assert_eq!(days_in_year(1900), 365);
    }

    #[test]
    fn test_iso_weeks() {
        assert_eq!(iso_weeks_in_year(2015), 53);
        assert_eq!(iso_weeks_in_year(2020), 53);
        assert_eq!(iso_weeks_in_year(2021), 52);
        assert_eq!(iso_weeks_in_year(2024), 52);
    }

    #[test]
    fn test_weekday_diff() {
        #[rustfmt::skip]
        const TESTS: [[u8; 7]; 7] =
            [// -    Sun Mon Tue Wed Thu Fri Sat
             /*Sun*/ [0,  6,  5,  4,  3,  2,  1],
             /*Mon*/ [1,  0,  6,  5,  4,  3,  2],
             /*Tue*/ [2,  1,  0,  6,  5,  4,  3],
             /*Wed*/ [3,  2,  1,  0,  6,  5,  4],
             /*Thu*/ [4,  3,  2,  1,  0,  6,  5],
             /*Fri*/ [5,  4,  3,  2,  1,  0,  6],
             /*Sat*/ [6,  5,  4,  3,  2,  1,  0],
            ];

        for x in 0..7 {
            for y in 0..7 {
                assert_eq!(weekday_difference(x, y), TESTS[x as usize][y as usize]);
            }
        }
    }
}
