//! Serde adapters for the date and time formats spoken by the events backend.

/// `HH:MM` wall clock times, e.g. `09:30`.
pub mod hour_minute {
    use chrono::NaiveTime;
    use schemars::gen::SchemaGenerator;
    use schemars::schema::{InstanceType, Schema, SchemaObject};
    use serde::de::Error as DeError;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%H:%M";

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse(&s).map_err(D::Error::custom)
    }

    /// Accepts `HH:MM` and, leniently, `HH:MM:SS`.
    pub fn parse(s: &str) -> Result<NaiveTime, chrono::ParseError> {
        NaiveTime::parse_from_str(s.trim(), FORMAT)
            .or_else(|_| NaiveTime::parse_from_str(s.trim(), "%H:%M:%S"))
    }

    pub fn schema(_gen: &mut SchemaGenerator) -> Schema {
        SchemaObject {
            instance_type: Some(InstanceType::String.into()),
            format: Some("HH:MM".to_owned()),
            ..Default::default()
        }
        .into()
    }
}

/// Optional `HH:MM` times. The backend writes a missing value as an empty
/// string, so `""`, `null` and an absent field all read as `None`.
pub mod hour_minute_option {
    use chrono::NaiveTime;
    use serde::de::Error as DeError;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::hour_minute;

    pub fn serialize<S>(
        time: &Option<NaiveTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match time {
            Some(time) => hour_minute::serialize(time, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(s) if !s.trim().is_empty() => {
                hour_minute::parse(&s).map(Some).map_err(D::Error::custom)
            }
            _ => Ok(None),
        }
    }
}

/// `YYYY-MM-DD HH:MM:SS` timestamps as used for `created_at`.
pub mod timestamp {
    use chrono::NaiveDateTime;
    use schemars::gen::SchemaGenerator;
    use schemars::schema::{InstanceType, Schema, SchemaObject};
    use serde::de::Error as DeError;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S>(
        date_time: &NaiveDateTime,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date_time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&s, FORMAT).map_err(D::Error::custom)
    }

    pub fn schema(_gen: &mut SchemaGenerator) -> Schema {
        SchemaObject {
            instance_type: Some(InstanceType::String.into()),
            format: Some("YYYY-MM-DD HH:MM:SS".to_owned()),
            ..Default::default()
        }
        .into()
    }
}

/// `YYYY-MM-DDTHH:MM:SS` query parameters.
pub mod date_time {
    use chrono::NaiveDateTime;
    use serde::{de::Error, Deserialize as _, Deserializer};

    pub fn deserialize_option<'de, D>(
        deserializer: D,
    ) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(s) => NaiveDateTime::parse_from_str(&s, "%Y-%m-%dT%H:%M:%S")
                .map(Some)
                .map_err(Error::custom),
            None => Ok(None),
        }
    }
}
