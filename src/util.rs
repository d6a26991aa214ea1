use chrono::{Local, NaiveDateTime};

/// Sortable local date-time, no offset. This is also what the config file
/// stores on disk.
pub const SORTABLE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// (De)serializes an `Option<NaiveDateTime>` against the config file's
/// "never" sentinels: `None` is written as the empty string, and both the
/// empty string and the minimum-date value (what older revisions of the
/// config file wrote for "never") read back as `None`.
///
/// For example,
/// ```
/// JSON ""                    ---> None
/// JSON "0001-01-01T00:00:00" ---> None
/// JSON "2024-05-01T09:30:00" ---> Some(2024-05-01 09:30:00)
/// ```
pub(crate) mod opt_datetime {
    use chrono::NaiveDateTime;
    use serde::de::{Error, Visitor};
    use serde::{Deserializer, Serializer};

    use super::SORTABLE_FORMAT;

    const MIN_DATE_SENTINEL: &str = "0001-01-01T00:00:00";

    pub fn serialize<S>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(stamp) => serializer.serialize_str(&stamp.format(SORTABLE_FORMAT).to_string()),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct SentinelOrDateTime;

        impl<'de> Visitor<'de> for SentinelOrDateTime {
            type Value = Option<NaiveDateTime>;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a sortable date-time string or an empty string")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: Error,
            {
                if value.is_empty() || value.starts_with(MIN_DATE_SENTINEL) {
                    return Ok(None);
                }

                NaiveDateTime::parse_from_str(value, SORTABLE_FORMAT)
                    .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f"))
                    .map(Some)
                    .map_err(|e| E::custom(format!("invalid date-time {:?}: {}", value, e)))
            }
        }

        deserializer.deserialize_str(SentinelOrDateTime)
    }
}
