use crate::{sys, Error, Instant, PlainDate, PlainDateTime, PlainTime, TimeZone, ZonedDateTime};

/// Factories over the system clock and the process default timezone.
///
/// The clock has microsecond precision, so every value produced here has a
/// nanosecond count that is a multiple of 1000. Both the clock and the
/// default timezone are external state and may change between calls.
#[derive(Debug, Clone, Copy)]
pub struct Now;

impl Now {
    /// Reads the current moment from the system clock.
    pub fn instant() -> Result<Instant, Error> {
        Ok(Instant::from_epoch_nanoseconds(sys::realtime_nanoseconds()?))
    }

    /// Resolves the process default timezone.
    ///
    /// Reads the `TZ` environment variable, falling back to the
    /// `/etc/localtime` symlink. The value may name an IANA zone or carry a
    /// POSIX rule string.
    pub fn time_zone() -> Result<TimeZone, Error> {
        let id = sys::default_zone_identifier()?;
        TimeZone::named(&id).or_else(|_| TimeZone::posix(&id))
    }

    /// The current moment in the process default timezone.
    pub fn zoned_date_time() -> Result<ZonedDateTime, Error> {
        Ok(ZonedDateTime::new(Self::instant()?, Self::time_zone()?))
    }

    /// The current moment in the given timezone.
    pub fn zoned_date_time_in(timezone: TimeZone) -> Result<ZonedDateTime, Error> {
        Ok(ZonedDateTime::new(Self::instant()?, timezone))
    }

    /// The current local date and time in the process default timezone.
    pub fn plain_date_time() -> Result<PlainDateTime, Error> {
        Ok(Self::zoned_date_time()?.to_plain_datetime())
    }

    /// The current local calendar date in the process default timezone.
    pub fn plain_date() -> Result<PlainDate, Error> {
        Ok(Self::plain_date_time()?.date())
    }

    /// The current local wall-clock time in the process default timezone.
    pub fn plain_time() -> Result<PlainTime, Error> {
        Ok(Self::plain_date_time()?.time())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_is_microsecond_precise() {
        let instant = Now::instant().unwrap();
        assert_eq!(instant.epoch_nanoseconds() % 1_000, 0);
        // The clock should read some time after 2020.
        assert!(instant.epoch_seconds() > 1_577_836_800);
    }
}
