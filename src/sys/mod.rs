//! Access to the system clock and the process default timezone.

use crate::Error;

#[cfg(all(feature = "system", target_family = "unix"))]
mod unix;

/// Reads the wall clock as nanoseconds since the epoch.
///
/// The clock has microsecond precision, so the result is always a multiple
/// of 1000.
pub(crate) fn realtime_nanoseconds() -> Result<i64, Error> {
    #[cfg(all(feature = "system", target_family = "unix"))]
    {
        unix::clock_microseconds()?.checked_mul(1_000).ok_or(Error::NoSystemTime)
    }
    #[cfg(not(all(feature = "system", target_family = "unix")))]
    {
        use std::time::{SystemTime, UNIX_EPOCH};
        let micros = match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(elapsed) => i64::try_from(elapsed.as_micros()).map_err(|_| Error::NoSystemTime)?,
            Err(before) => -i64::try_from(before.duration().as_micros()).map_err(|_| Error::NoSystemTime)?,
        };
        micros.checked_mul(1_000).ok_or(Error::NoSystemTime)
    }
}

/// Determines the process default timezone identifier.
///
/// The `TZ` environment variable wins when set; otherwise the
/// `/etc/localtime` symlink names the zone relative to the zoneinfo root.
/// The returned string may be either an IANA identifier or a POSIX TZ rule.
pub(crate) fn default_zone_identifier() -> Result<String, Error> {
    if let Ok(tz) = std::env::var("TZ") {
        // A leading colon forces file interpretation per POSIX.
        let tz = tz.strip_prefix(':').unwrap_or(&tz);
        if !tz.is_empty() {
            return Ok(tz.to_owned());
        }
    }
    let target = std::fs::read_link("/etc/localtime").map_err(|_| Error::NoSystemTime)?;
    let target = target.to_str().ok_or(Error::NoSystemTime)?;
    match target.rsplit_once("zoneinfo/") {
        Some((_, id)) if !id.is_empty() => Ok(id.to_owned()),
        _ => Err(Error::NoSystemTime),
    }
}
