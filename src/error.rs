/// Represents all types of errors that can be encountered when using the library.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// Construction or modification of a value was out of range.
    OutOfRange,
    /// A string did not match the grammar of the type being parsed.
    ///
    /// The payload describes what the parser expected at the point of failure.
    Parse(&'static str),
    /// An option key or value was not part of its closed enumeration.
    InvalidOption(&'static str),
    /// A required field was absent from a field record.
    MissingField(&'static str),
    /// Duration components disagreed in sign, or calendar-unit arithmetic
    /// was attempted without a `relative_to` anchor.
    InvalidDuration,
    /// The calendar identifier is not one of the supported calendars.
    UnsupportedCalendar,
    /// The IANA identifier was not found in the zoneinfo database.
    UnknownTimeZone,
    /// The zoneinfo entry existed but could not be parsed as TZif data.
    InvalidZoneData,
    /// The local time falls twice in its time zone and disambiguation was `Reject`.
    AmbiguousDateTime,
    /// The local time does not exist in its time zone and disambiguation was `Reject`.
    SkippedDateTime,
    /// Arithmetic overflowed, or `Overflow::Reject` detected an out-of-range result.
    Arithmetic,
    /// Could not read the system clock or the default timezone.
    NoSystemTime,
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::OutOfRange => f.write_str("value out of range"),
            Error::Parse(expected) => write!(f, "parse error: expected {expected}"),
            Error::InvalidOption(name) => write!(f, "invalid option: {name}"),
            Error::MissingField(name) => write!(f, "missing required field: {name}"),
            Error::InvalidDuration => {
                f.write_str("duration components have mixed signs or lack a relative anchor")
            }
            Error::UnsupportedCalendar => f.write_str("unsupported calendar identifier"),
            Error::UnknownTimeZone => f.write_str("timezone not present in the zoneinfo database"),
            Error::InvalidZoneData => f.write_str("zoneinfo entry is not valid TZif data"),
            Error::AmbiguousDateTime => f.write_str("local time is ambiguous in this timezone"),
            Error::SkippedDateTime => f.write_str("local time is skipped in this timezone"),
            Error::Arithmetic => f.write_str("arithmetic out of range"),
            Error::NoSystemTime => f.write_str("could not fetch system time or timezone"),
        }
    }
}

impl std::error::Error for Error {}
