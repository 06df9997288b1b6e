//! Extension traits to numeric types for [`Duration`] construction.

use crate::Duration;

mod private {
    pub trait Sealed {}
    impl Sealed for i64 {}
    impl Sealed for i32 {}
    impl Sealed for u32 {}
}

/// A trait that allows you to create [`Duration`] values from integer
/// literals.
///
/// This is merely syntax sugar.
///
/// # Examples
///
/// ```rust
/// use tempora::{ext::DurationLiteral, Duration};
/// assert_eq!(10.years(), Duration::from_years(10));
/// assert_eq!(10.hours(), Duration::from_hours(10));
/// assert_eq!((-90).minutes(), Duration::from_minutes(-90));
/// ```
pub trait DurationLiteral: private::Sealed {
    /// Creates a [`Duration`] representing the specified number of years.
    fn years(self) -> Duration;

    /// Creates a [`Duration`] representing the specified number of months.
    fn months(self) -> Duration;

    /// Creates a [`Duration`] representing the specified number of weeks.
    fn weeks(self) -> Duration;

    /// Creates a [`Duration`] representing the specified number of days.
    fn days(self) -> Duration;

    /// Creates a [`Duration`] representing the specified number of hours.
    fn hours(self) -> Duration;

    /// Creates a [`Duration`] representing the specified number of minutes.
    fn minutes(self) -> Duration;

    /// Creates a [`Duration`] representing the specified number of seconds.
    fn seconds(self) -> Duration;

    /// Creates a [`Duration`] representing the specified number of milliseconds.
    fn milliseconds(self) -> Duration;

    /// Creates a [`Duration`] representing the specified number of microseconds.
    fn microseconds(self) -> Duration;

    /// Creates a [`Duration`] representing the specified number of nanoseconds.
    fn nanoseconds(self) -> Duration;
}

macro_rules! impl_for_literal {
    ($($type:ty)+) => {
        $(
            impl DurationLiteral for $type {
                #[inline]
                fn years(self) -> Duration {
                    Duration::from_years(self as _)
                }

                #[inline]
                fn months(self) -> Duration {
                    Duration::from_months(self as _)
                }

                #[inline]
                fn weeks(self) -> Duration {
                    Duration::from_weeks(self as _)
                }

                #[inline]
                fn days(self) -> Duration {
                    Duration::from_days(self as _)
                }

                #[inline]
                fn hours(self) -> Duration {
                    Duration::from_hours(self as _)
                }

                #[inline]
                fn minutes(self) -> Duration {
                    Duration::from_minutes(self as _)
                }

                #[inline]
                fn seconds(self) -> Duration {
                    Duration::from_seconds(self as _)
                }

                #[inline]
                fn milliseconds(self) -> Duration {
                    Duration::from_milliseconds(self as _)
                }

                #[inline]
                fn microseconds(self) -> Duration {
                    Duration::from_microseconds(self as _)
                }

                #[inline]
                fn nanoseconds(self) -> Duration {
                    Duration::from_nanoseconds(self as _)
                }
            }
        )+
    };
}

impl_for_literal!(i64 i32 u32);
