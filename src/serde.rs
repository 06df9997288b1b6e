//! Serialization/Deserialization support for the library.
//!
//! Every type serializes as its ISO 8601 string form and deserializes
//! through the same strict parser, so the round-trip guarantee carries
//! over to serde formats.

use core::fmt;
use core::marker::PhantomData;
use core::str::FromStr;

use serde::de::{self, Deserialize, Visitor};
use serde::ser::Serialize;

use crate::{Duration, Instant, PlainDate, PlainDateTime, PlainMonthDay, PlainTime, PlainYearMonth, ZonedDateTime};

struct IsoVisitor<T> {
    expecting: &'static str,
    marker: PhantomData<T>,
}

impl<'de, T> Visitor<'de> for IsoVisitor<T>
where
    T: FromStr<Err = crate::Error>,
{
    type Value = T;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.expecting)
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        v.parse().map_err(E::custom)
    }
}

macro_rules! impl_iso_serde {
    ($($type:ty => $expecting:literal,)+) => {
        $(
            /// Serialize into an ISO 8601 string.
            impl Serialize for $type {
                fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
                where
                    S: serde::Serializer,
                {
                    serializer.collect_str(self)
                }
            }

            /// Deserialize from an ISO 8601 string.
            impl<'de> Deserialize<'de> for $type {
                fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
                where
                    D: serde::Deserializer<'de>,
                {
                    deserializer.deserialize_str(IsoVisitor {
                        expecting: $expecting,
                        marker: PhantomData,
                    })
                }
            }
        )+
    };
}

impl_iso_serde! {
    PlainDate => "an ISO 8601 date string",
    PlainTime => "an ISO 8601 time string",
    PlainDateTime => "an ISO 8601 date-time string",
    PlainYearMonth => "an ISO 8601 year-month string",
    PlainMonthDay => "an ISO 8601 month-day string",
    Instant => "an ISO 8601 date-time string with a UTC offset",
    ZonedDateTime => "an ISO 8601 date-time string with a timezone annotation",
    Duration => "an ISO 8601 duration string",
}
