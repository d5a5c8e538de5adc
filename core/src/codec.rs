//! JSON payload codec.
//!
//! # Design
//! Payloads are always pretty-printed so captured wire traffic stays
//! readable. Date fields opt into the wire format with
//! `#[serde(with = "gmt_date")]`: whole seconds, UTC, `Z` suffix. The
//! formatting is a pure function over a `&'static str` pattern, so there is
//! no shared formatter to guard.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::CodecError;

/// Serialize `value` to pretty-printed JSON.
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<String, CodecError> {
    serde_json::to_string_pretty(value).map_err(CodecError::Encode)
}

/// Parse `text` into the shape `T`.
///
/// Malformed JSON, a structure that does not fit `T`, and date strings not in
/// the wire format all surface as `CodecError::Syntax`.
pub fn decode<T: DeserializeOwned>(text: &str) -> Result<T, CodecError> {
    serde_json::from_str(text).map_err(CodecError::Syntax)
}

/// Parse `text` without a static shape.
pub fn decode_value(text: &str) -> Result<serde_json::Value, CodecError> {
    decode(text)
}

/// Serde adapter for `DateTime` fields using `yyyy-MM-ddTHH:mm:ssZ` in UTC.
///
/// ```
/// use chrono::{DateTime, Utc};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct Event {
///     #[serde(with = "json_transport::codec::gmt_date")]
///     at: DateTime<Utc>,
/// }
/// ```
pub mod gmt_date {
    use chrono::{DateTime, NaiveDateTime, ParseError, TimeZone, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

    /// Render `date` in UTC, dropping sub-second precision.
    pub fn format_gmt<Tz: TimeZone>(date: &DateTime<Tz>) -> String {
        date.with_timezone(&Utc).format(FORMAT).to_string()
    }

    pub fn parse_gmt(text: &str) -> Result<DateTime<Utc>, ParseError> {
        NaiveDateTime::parse_from_str(text, FORMAT).map(|naive| naive.and_utc())
    }

    pub fn serialize<Tz: TimeZone, S: Serializer>(
        date: &DateTime<Tz>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_gmt(date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let text = String::deserialize(deserializer)?;
        parse_gmt(&text).map_err(|e| de::Error::custom(format!("invalid date {text:?}: {e}")))
    }

    /// Same format for `Option<DateTime<Utc>>`; `null` maps to `None`.
    pub mod option {
        use chrono::{DateTime, Utc};
        use serde::{de, Deserialize, Deserializer, Serializer};

        use super::{format_gmt, parse_gmt};

        pub fn serialize<S: Serializer>(
            date: &Option<DateTime<Utc>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match date {
                Some(date) => serializer.serialize_some(&format_gmt(date)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<DateTime<Utc>>, D::Error> {
            match Option::<String>::deserialize(deserializer)? {
                Some(text) => parse_gmt(&text)
                    .map(Some)
                    .map_err(|e| de::Error::custom(format!("invalid date {text:?}: {e}"))),
                None => Ok(None),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::{DateTime, FixedOffset, TimeZone, Timelike, Utc};
    use serde::{Deserialize, Serialize};

    use super::gmt_date::{format_gmt, parse_gmt};
    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Stamp {
        name: String,
        #[serde(with = "gmt_date")]
        at: DateTime<Utc>,
        #[serde(with = "gmt_date::option", default)]
        until: Option<DateTime<Utc>>,
    }

    fn june_15() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2011, 6, 15, 10, 30, 0).unwrap()
    }

    #[test]
    fn parses_reference_instant() {
        assert_eq!(parse_gmt("2011-06-15T10:30:00Z").unwrap(), june_15());
    }

    #[test]
    fn formats_in_utc_regardless_of_offset() {
        let east = FixedOffset::east_opt(2 * 3600).unwrap();
        let local = east.with_ymd_and_hms(2011, 6, 15, 12, 30, 0).unwrap();
        assert_eq!(format_gmt(&local), "2011-06-15T10:30:00Z");

        let west = FixedOffset::west_opt(11 * 3600).unwrap();
        let local = west.with_ymd_and_hms(2011, 6, 14, 23, 30, 0).unwrap();
        assert_eq!(format_gmt(&local), "2011-06-15T10:30:00Z");
    }

    #[test]
    fn formatting_drops_fractional_seconds() {
        let precise = june_15().with_nanosecond(987_654_321).unwrap();
        assert_eq!(format_gmt(&precise), "2011-06-15T10:30:00Z");
    }

    #[test]
    fn encode_is_pretty_printed() {
        let stamp = Stamp {
            name: "release".to_string(),
            at: june_15(),
            until: None,
        };
        let text = encode(&stamp).unwrap();
        assert!(text.contains('\n'));
        assert!(text.contains(r#""at": "2011-06-15T10:30:00Z""#));
        assert!(text.contains(r#""until": null"#));
    }

    #[test]
    fn round_trip_at_second_precision() {
        let stamp = Stamp {
            name: "release".to_string(),
            at: june_15(),
            until: Some(Utc.with_ymd_and_hms(2012, 1, 1, 0, 0, 59).unwrap()),
        };
        let back: Stamp = decode(&encode(&stamp).unwrap()).unwrap();
        assert_eq!(back, stamp);
    }

    #[test]
    fn round_trip_truncates_sub_second_dates() {
        let stamp = Stamp {
            name: "precise".to_string(),
            at: june_15().with_nanosecond(500_000_000).unwrap(),
            until: None,
        };
        let back: Stamp = decode(&encode(&stamp).unwrap()).unwrap();
        assert_eq!(back.at, june_15());
    }

    #[test]
    fn malformed_date_is_a_syntax_error_naming_the_text() {
        let err = decode::<Stamp>(r#"{"name":"x","at":"15/06/2011 10:30"}"#).unwrap_err();
        assert!(matches!(err, CodecError::Syntax(_)));
        assert!(err.to_string().contains("15/06/2011 10:30"));
    }

    #[test]
    fn date_with_fraction_or_offset_is_rejected() {
        assert!(parse_gmt("2011-06-15T10:30:00.123Z").is_err());
        assert!(parse_gmt("2011-06-15T10:30:00+02:00").is_err());
    }

    #[test]
    fn malformed_json_is_a_syntax_error() {
        let err = decode::<Stamp>("{\"name\": ").unwrap_err();
        assert!(matches!(err, CodecError::Syntax(_)));
    }

    #[test]
    fn decode_generic_shapes() {
        let map: BTreeMap<String, Stamp> = decode(
            r#"{"a": {"name": "a", "at": "2011-06-15T10:30:00Z"}}"#,
        )
        .unwrap();
        assert_eq!(map["a"].at, june_15());
        assert!(map["a"].until.is_none());

        let list: Vec<Stamp> = decode(r#"[{"name": "b", "at": "2011-06-15T10:30:00Z"}]"#).unwrap();
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn decode_value_accepts_any_document() {
        let value = decode_value(r#"{"nested": [1, 2, {"k": "v"}]}"#).unwrap();
        assert_eq!(value["nested"][2]["k"], "v");
    }
}
