//! Immutable date and time values modeled after the TC39 Temporal proposal.
//!
//! The library is a family of small value types, each naming one temporal
//! concept: [`PlainDate`], [`PlainTime`], [`PlainDateTime`],
//! [`PlainYearMonth`], [`PlainMonthDay`], [`Instant`], [`ZonedDateTime`],
//! [`Duration`], [`TimeZone`], and [`Calendar`]. Every value is constructed
//! through a validating factory and never mutates; all operations return
//! fresh values, which makes everything freely shareable across threads.
//!
//! Time zone data comes from the operating system's zoneinfo database and
//! is cached process-wide. UTC is treated as smooth: leap seconds do not
//! exist in this model.

pub mod ext;
pub mod fmt;
pub mod gregorian;
pub mod macros;

#[cfg(feature = "serde")]
pub mod serde;

mod calendar;
mod date;
mod datetime;
mod duration;
mod error;
mod instant;
mod month_day;
mod now;
mod offset;
mod options;
pub(crate) mod sys;
mod time;
pub mod tz;
mod year_month;
mod zoned;

pub use calendar::{Calendar, DateFields, MonthCode};
pub use date::{IsoWeekDate, PlainDate, Weekday};
pub use datetime::PlainDateTime;
pub use duration::{Duration, DurationRoundOptions, RelativeTo};
pub use error::Error;
pub use instant::Instant;
pub use month_day::PlainMonthDay;
pub use now::Now;
pub use offset::UtcOffset;
pub use options::{DifferenceOptions, Disambiguation, Overflow, RoundingMode, RoundingOptions, Unit};
pub use time::PlainTime;
pub use tz::{LocalResolution, PosixTimeZone, TimeZone};
pub use year_month::PlainYearMonth;
pub use zoned::ZonedDateTime;
