//! A TZif parser for versions 1 to 3, per [RFC 8536].
//!
//! [RFC 8536]: https://datatracker.ietf.org/doc/html/rfc8536

use std::io::{Read, Seek, SeekFrom};

use crate::tz::posix::PosixTimeZone;
use crate::tz::transitions::{Transition, ZoneData};
use crate::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Header {
    /// The version of the TZif file.
    version: u8,
    /// The number of UTC/local indicators (`isutcnt`).
    utc_locals_count: u32,
    /// The number of standard/wall indicators (`isstdcnt`).
    std_count: u32,
    /// The number of leap second records (`leapcnt`).
    leaps: u32,
    /// The number of transition times (`timecnt`).
    transitions: u32,
    /// The number of local time types (`typecnt`). Cannot be zero.
    types: u32,
    /// The size of the abbreviation block (`charcnt`).
    abbreviation_size: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LocalTimeType {
    offset: i32,
    is_dst: bool,
}

impl Header {
    /// Byte length of a version 1 data block, used to skip to the 64-bit one.
    fn version_one_length(&self) -> i64 {
        self.transitions as i64 * 5
            + self.types as i64 * 6
            + self.abbreviation_size as i64
            + self.leaps as i64 * 8
            + self.std_count as i64
            + self.utc_locals_count as i64
    }

    fn from_reader<R: Read>(reader: &mut R) -> Result<Self, Error> {
        // magic (4) + version (1) + reserved (15) + 6 counts (24) = 44
        let mut buffer = [0u8; 44];
        reader.read_exact(&mut buffer).map_err(|_| Error::InvalidZoneData)?;
        if &buffer[0..4] != b"TZif" {
            return Err(Error::InvalidZoneData);
        }

        let version = match buffer[4] {
            0 => 1,
            b'2' => 2,
            // Future versions are data-compatible with 3 per RFC 8536 §4.
            b'3'..=b'9' => 3,
            _ => return Err(Error::InvalidZoneData),
        };

        let count = |idx: usize| u32::from_be_bytes([buffer[idx], buffer[idx + 1], buffer[idx + 2], buffer[idx + 3]]);
        let header = Self {
            version,
            utc_locals_count: count(20),
            std_count: count(24),
            leaps: count(28),
            transitions: count(32),
            types: count(36),
            abbreviation_size: count(40),
        };
        if header.types == 0 {
            return Err(Error::InvalidZoneData);
        }
        Ok(header)
    }

    fn read_transition_times<R: Read>(&self, reader: &mut R, wide: bool) -> Result<Vec<i64>, Error> {
        if self.transitions == 0 {
            return Ok(Vec::new());
        }
        let width = if wide { 8 } else { 4 };
        let mut buffer = vec![0u8; self.transitions as usize * width];
        reader.read_exact(&mut buffer).map_err(|_| Error::InvalidZoneData)?;
        let times = if wide {
            buffer
                .chunks_exact(8)
                .map(|chunk| i64::from_be_bytes(chunk.try_into().expect("chunk is 8 bytes")))
                .collect()
        } else {
            buffer
                .chunks_exact(4)
                .map(|chunk| i32::from_be_bytes(chunk.try_into().expect("chunk is 4 bytes")) as i64)
                .collect()
        };
        Ok(times)
    }

    fn read_type_indexes<R: Read>(&self, reader: &mut R) -> Result<Vec<u8>, Error> {
        let mut indexes = vec![0u8; self.transitions as usize];
        reader.read_exact(&mut indexes).map_err(|_| Error::InvalidZoneData)?;
        for &idx in &indexes {
            if idx as u32 >= self.types {
                return Err(Error::InvalidZoneData);
            }
        }
        Ok(indexes)
    }

    fn read_local_time_types<R: Read>(&self, reader: &mut R) -> Result<Vec<LocalTimeType>, Error> {
        // Each record is utoff (i32), dst (u8), and an abbreviation index
        // (u8) into the string block that follows. The abbreviations are
        // not part of the offset model, so the block is read and dropped.
        let mut buffer = vec![0u8; self.types as usize * 6];
        reader.read_exact(&mut buffer).map_err(|_| Error::InvalidZoneData)?;
        let mut strings = vec![0u8; self.abbreviation_size as usize];
        reader.read_exact(&mut strings).map_err(|_| Error::InvalidZoneData)?;

        let types = buffer
            .chunks_exact(6)
            .map(|chunk| LocalTimeType {
                offset: i32::from_be_bytes(chunk[0..4].try_into().expect("chunk is 6 bytes")),
                is_dst: chunk[4] == 1,
            })
            .collect();
        Ok(types)
    }

    fn read_data_block<R: Read + Seek>(&self, reader: &mut R) -> Result<ZoneData, Error> {
        let times = self.read_transition_times(reader, self.version > 1)?;
        let indexes = self.read_type_indexes(reader)?;
        let types = self.read_local_time_types(reader)?;

        // Leap second records and the standard/UT indicators do not
        // participate in offset resolution; UTC is treated as smooth.
        let leap_width = if self.version > 1 { 12 } else { 8 };
        reader
            .seek(SeekFrom::Current(
                self.leaps as i64 * leap_width + self.std_count as i64 + self.utc_locals_count as i64,
            ))
            .map_err(|_| Error::InvalidZoneData)?;

        let posix = if self.version >= 2 {
            let mut buffer = Vec::new();
            reader.read_to_end(&mut buffer).map_err(|_| Error::InvalidZoneData)?;
            let footer = std::str::from_utf8(&buffer).map_err(|_| Error::InvalidZoneData)?;
            let Some(inner) = footer.strip_prefix('\n').and_then(|s| s.strip_suffix('\n')) else {
                return Err(Error::InvalidZoneData);
            };
            if inner.is_empty() {
                None
            } else {
                Some(PosixTimeZone::new(inner)?)
            }
        } else {
            None
        };

        // The offset in force before the first transition: the first
        // standard-time type by convention, falling back to the first type.
        let initial_offset = types
            .iter()
            .find(|t| !t.is_dst)
            .unwrap_or(&types[0])
            .offset;

        let mut transitions: Vec<Transition> = Vec::with_capacity(times.len());
        let mut previous = initial_offset;
        for (&at, &idx) in times.iter().zip(indexes.iter()) {
            let offset = types[idx as usize].offset;
            transitions.push(Transition {
                at,
                offset_before: previous,
                offset_after: offset,
            });
            previous = offset;
        }
        if !transitions.windows(2).all(|pair| pair[0].at < pair[1].at) {
            return Err(Error::InvalidZoneData);
        }

        Ok(ZoneData {
            initial_offset,
            transitions,
            posix,
        })
    }
}

/// Parses a complete TZif stream into the zone's offset history.
pub(crate) fn parse_tzif<R: Read + Seek>(mut reader: R) -> Result<ZoneData, Error> {
    let mut header = Header::from_reader(&mut reader)?;
    if header.version > 1 {
        // Versions 2+ carry the legacy 32-bit block first; the 64-bit data
        // block follows behind its own copy of the header.
        reader
            .seek(SeekFrom::Current(header.version_one_length()))
            .map_err(|_| Error::InvalidZoneData)?;
        header = Header::from_reader(&mut reader)?;
    }
    header.read_data_block(&mut reader)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    pub(crate) fn build_tzif(
        types: &[(i32, bool)],
        transitions: &[(i64, u8)],
        footer: &str,
    ) -> Vec<u8> {
        let mut out = Vec::new();
        let header = |out: &mut Vec<u8>, timecnt: u32, typecnt: u32| {
            out.extend_from_slice(b"TZif2");
            out.extend_from_slice(&[0u8; 15]);
            out.extend_from_slice(&0u32.to_be_bytes()); // isutcnt
            out.extend_from_slice(&0u32.to_be_bytes()); // isstdcnt
            out.extend_from_slice(&0u32.to_be_bytes()); // leapcnt
            out.extend_from_slice(&timecnt.to_be_bytes());
            out.extend_from_slice(&typecnt.to_be_bytes());
            out.extend_from_slice(&4u32.to_be_bytes()); // charcnt
        };
        // Empty legacy block.
        header(&mut out, 0, types.len() as u32);
        for &(offset, dst) in types {
            out.extend_from_slice(&offset.to_be_bytes());
            out.push(dst as u8);
            out.push(0);
        }
        out.extend_from_slice(b"ABC\0");
        // 64-bit block.
        header(&mut out, transitions.len() as u32, types.len() as u32);
        for &(at, _) in transitions {
            out.extend_from_slice(&at.to_be_bytes());
        }
        for &(_, idx) in transitions {
            out.push(idx);
        }
        for &(offset, dst) in types {
            out.extend_from_slice(&offset.to_be_bytes());
            out.push(dst as u8);
            out.push(0);
        }
        out.extend_from_slice(b"ABC\0");
        out.push(b'\n');
        out.extend_from_slice(footer.as_bytes());
        out.push(b'\n');
        out
    }

    #[test]
    fn test_parse_synthetic_zone() {
        let bytes = build_tzif(
            &[(3600, false), (7200, true)],
            &[(1_000_000, 1), (2_000_000, 0)],
            "CET-1CEST,M3.5.0,M10.5.0/3",
        );
        let data = parse_tzif(Cursor::new(bytes)).unwrap();
        assert_eq!(data.initial_offset, 3600);
        assert_eq!(data.transitions.len(), 2);
        assert_eq!(data.transitions[0].offset_before, 3600);
        assert_eq!(data.transitions[0].offset_after, 7200);
        assert_eq!(data.offset_at(999_999), 3600);
        assert_eq!(data.offset_at(1_000_000), 7200);
        assert_eq!(data.offset_at(1_999_999), 7200);
        assert!(data.posix.is_some());
    }

    #[test]
    fn test_bad_magic() {
        assert_eq!(parse_tzif(Cursor::new(b"NotTZif".to_vec())), Err(Error::InvalidZoneData));
    }

    #[test]
    fn test_unordered_transitions_rejected() {
        let bytes = build_tzif(&[(0, false)], &[(100, 0), (50, 0)], "UTC0");
        assert_eq!(parse_tzif(Cursor::new(bytes)), Err(Error::InvalidZoneData));
    }
}
