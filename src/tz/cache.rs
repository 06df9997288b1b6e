//! The process-wide cache of parsed zoneinfo entries.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use once_cell::sync::Lazy;

use crate::tz::reader::parse_tzif;
use crate::tz::transitions::ZoneData;
use crate::Error;

static ZONE_CACHE: Lazy<RwLock<HashMap<String, Arc<ZoneData>>>> = Lazy::new(|| RwLock::new(HashMap::new()));

/// The root of the OS zoneinfo database.
pub(crate) fn zoneinfo_root() -> PathBuf {
    match std::env::var_os("TZDIR") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => PathBuf::from("/usr/share/zoneinfo"),
    }
}

/// Checks that an identifier looks like an IANA zone name before it is ever
/// joined to a filesystem path.
pub(crate) fn validate_identifier(id: &str) -> Result<(), Error> {
    if id.is_empty() || id.len() > 255 || id.starts_with('/') || id.ends_with('/') {
        return Err(Error::UnknownTimeZone);
    }
    for component in id.split('/') {
        if component.is_empty() || component.starts_with('.') {
            return Err(Error::UnknownTimeZone);
        }
        if !component
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'-' | b'_' | b'+'))
        {
            return Err(Error::UnknownTimeZone);
        }
    }
    Ok(())
}

/// Fetches a zone's data, loading and caching it on first use.
///
/// Reads take the shared lock; only a miss upgrades to the exclusive one.
/// Entries are never evicted.
pub(crate) fn lookup(id: &str) -> Result<Arc<ZoneData>, Error> {
    validate_identifier(id)?;
    if let Ok(cache) = ZONE_CACHE.read() {
        if let Some(data) = cache.get(id) {
            return Ok(data.clone());
        }
    }
    let data = Arc::new(load(id)?);
    if let Ok(mut cache) = ZONE_CACHE.write() {
        // A racing loader may have beaten us; keep the first entry so all
        // holders share one allocation.
        return Ok(cache.entry(id.to_owned()).or_insert(data).clone());
    }
    Ok(data)
}

fn load(id: &str) -> Result<ZoneData, Error> {
    let path = zoneinfo_root().join(id);
    let file = match File::open(path) {
        Ok(file) => file,
        Err(error) => {
            // The UTC zone must exist even on hosts without tzdata.
            if error.kind() == std::io::ErrorKind::NotFound {
                if id == "UTC" || id == "Etc/UTC" {
                    return Ok(ZoneData::fixed(0));
                }
                return Err(Error::UnknownTimeZone);
            }
            return Err(Error::UnknownTimeZone);
        }
    };
    parse_tzif(BufReader::new(file))
}
