use core::mem::MaybeUninit;

use crate::Error;

/// Reads the wall clock in whole microseconds since the epoch.
pub(crate) fn clock_microseconds() -> Result<i64, Error> {
    let mut timeval = MaybeUninit::uninit();

    // SAFETY: gettimeofday writes the timeval on success and returns
    // non-zero on failure. Passing a null timezone pointer is the
    // documented way to ask for the time alone.
    let code = unsafe { libc::gettimeofday(timeval.as_mut_ptr(), core::ptr::null_mut()) };
    if code != 0 {
        return Err(Error::NoSystemTime);
    }

    // SAFETY: at this point there is no error
    let timeval = unsafe { timeval.assume_init() };
    (timeval.tv_sec as i64)
        .checked_mul(1_000_000)
        .and_then(|micros| micros.checked_add(timeval.tv_usec as i64))
        .ok_or(Error::NoSystemTime)
}
