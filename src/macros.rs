//! Compile-time validated literal macros for dates and times.

#[doc(hidden)]
#[macro_export]
macro_rules! const_assert {
    ($cond:expr) => {
        $crate::const_assert!($cond, concat!("compile time assertion failed: ", stringify!($cond)));
    };
    ($cond:expr, $($t:tt)+) => {
        const _: () = {
            if !$cond {
                core::panic!($($t)+)
            }
        };
    };
}

#[doc(hidden)]
pub use const_assert;

#[doc(hidden)]
#[macro_export]
#[rustfmt::skip]
macro_rules! __expand_or_zero {
    ($l:literal) => { $l };
    () => { 0 };
}

#[doc(hidden)]
pub use __expand_or_zero;

/// Creates a [`PlainTime`] with compile-time validation.
///
/// The resulting value can be used in both `static` and `const` contexts.
/// A compile time error triggers if any of the units are invalid.
/// There is no way to denote sub-second precision; use
/// [`PlainTime::new`] for that.
///
/// The syntax supported is `HH:MM` or `HH:MM:SS`.
///
/// # Examples
///
/// ```rust
/// use tempora::{time, PlainTime};
/// assert_eq!(time!(12:00), PlainTime::from_hms(12, 0, 0)?);
/// assert_eq!(time!(12:23:05), PlainTime::from_hms(12, 23, 5)?);
/// # Ok::<_, tempora::Error>(())
/// ```
///
/// [`PlainTime`]: crate::PlainTime
/// [`PlainTime::new`]: crate::PlainTime::new
#[macro_export]
macro_rules! time {
    ($hours:literal:$minutes:literal$(:$seconds:literal)?) => {{
        const HOURS: u8 = $hours;
        const MINUTES: u8 = $minutes;
        const SECONDS: u8 = $crate::macros::__expand_or_zero!($($seconds)?);
        $crate::macros::const_assert!(HOURS <= 23, "hours must be less than 24");
        $crate::macros::const_assert!(MINUTES <= 59, "minutes must be less than 60");
        $crate::macros::const_assert!(SECONDS <= 59, "seconds must be less than 60");
        $crate::PlainTime::__new_unchecked_from_macro(HOURS, MINUTES, SECONDS)
    }};
}

#[doc(hidden)]
#[macro_export]
macro_rules! __date_from_parts {
    ($year:expr, $month:literal, $day:literal) => {{
        const YEAR: i32 = $year;
        const MONTH: u8 = $month;
        const DAY: u8 = $day;
        $crate::macros::const_assert!(MONTH >= 1 && MONTH <= 12, "month must be within 1..=12");
        $crate::macros::const_assert!(
            DAY >= 1 && DAY <= $crate::gregorian::days_in_month(YEAR, MONTH),
            "day is out of range for the month"
        );
        $crate::PlainDate::__new_unchecked_from_macro(YEAR, MONTH, DAY)
    }};
}

#[doc(hidden)]
pub use __date_from_parts;

/// Creates a [`PlainDate`] with compile-time validation.
///
/// The resulting value can be used in both `static` and `const` contexts.
/// A compile time error triggers if any of the units are invalid.
///
/// The syntax supported is `YYYY-MM-DD`, with an optional leading `-` for
/// years before year zero.
///
/// # Examples
///
/// ```rust
/// use tempora::{date, PlainDate};
/// assert_eq!(date!(2012-2-29), PlainDate::new(2012, 2, 29)?);
/// assert_eq!(date!(2000-01-25), PlainDate::new(2000, 1, 25)?);
/// # Ok::<_, tempora::Error>(())
/// ```
///
/// [`PlainDate`]: crate::PlainDate
#[macro_export]
macro_rules! date {
    (-$year:literal-$month:literal-$day:literal) => {
        $crate::macros::__date_from_parts!(-$year, $month, $day)
    };
    ($year:literal-$month:literal-$day:literal) => {
        $crate::macros::__date_from_parts!($year, $month, $day)
    };
}

/// Creates a [`PlainDateTime`] with compile-time validation.
///
/// The syntax is a [`date!`] literal followed by a [`time!`] literal:
/// `YYYY-MM-DD HH:MM[:SS]`.
///
/// # Examples
///
/// ```rust
/// use tempora::{datetime, PlainDateTime};
/// assert_eq!(datetime!(2012-2-29 13:30), PlainDateTime::new(2012, 2, 29, 13, 30, 0)?);
/// # Ok::<_, tempora::Error>(())
/// ```
///
/// [`PlainDateTime`]: crate::PlainDateTime
#[macro_export]
macro_rules! datetime {
    (-$year:literal-$month:literal-$day:literal $($time:tt)+) => {
        $crate::PlainDateTime::__new_unchecked_from_macro($crate::date!(-$year-$month-$day), $crate::time!($($time)+))
    };
    ($year:literal-$month:literal-$day:literal $($time:tt)+) => {
        $crate::PlainDateTime::__new_unchecked_from_macro($crate::date!($year-$month-$day), $crate::time!($($time)+))
    };
}

pub use {date, datetime, time};
