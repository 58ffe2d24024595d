use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{de, de::DeserializeOwned, Deserialize, Deserializer};
use serde_json::Value;

/// Parses the timestamp shapes PostgREST and Realtime hand out. Offset-less
/// values are taken as UTC.
pub fn parse_ts(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%#z") {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}

pub fn deserialize_ts<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_ts(&raw).ok_or_else(|| de::Error::custom(format!("invalid timestamp `{}`", raw)))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

/// An embedded relation may come back as `null`, an object, or a list holding
/// at most one object. All three collapse to an `Option`.
pub fn one_or_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let value = Option::<OneOrMany<T>>::deserialize(deserializer)?;

    Ok(match value {
        None => None,
        Some(OneOrMany::Many(items)) => items.into_iter().next(),
        Some(OneOrMany::One(item)) => Some(item),
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ListOrText {
    List(Vec<String>),
    Text(String),
}

pub fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<ListOrText>::deserialize(deserializer)?;

    Ok(match value {
        None => vec![],
        Some(ListOrText::List(items)) => items,
        Some(ListOrText::Text(text)) if text.trim().is_empty() => vec![],
        Some(ListOrText::Text(text)) => vec![text],
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TextOrNumber {
    Text(String),
    Number(serde_json::Number),
}

/// Identifiers may be text or numeric columns; both are kept as text.
pub fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match TextOrNumber::deserialize(deserializer)? {
        TextOrNumber::Text(text) => text,
        TextOrNumber::Number(number) => number.to_string(),
    })
}

/// Columns edited by hand may hold anything. A value of the wrong shape,
/// `""` included, reads as missing instead of failing the whole record.
pub fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Finite numbers, also when stored as text.
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let number = match Value::deserialize(deserializer)? {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };

    Ok(number.filter(|n| n.is_finite()))
}

/// A text array, or comma separated text. Non-text entries are dropped.
pub fn lenient_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => Some(
            items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(text) => Some(text),
                    _ => None,
                })
                .collect(),
        ),
        Value::String(text) => Some(
            text.split(',')
                .map(str::trim)
                .filter(|entry| !entry.is_empty())
                .map(str::to_string)
                .collect(),
        ),
        _ => None,
    })
}

pub fn lenient_ts<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(raw) => parse_ts(&raw),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rest_and_realtime_timestamps() {
        let expected = "2025-10-14T08:05:09Z";
        for raw in [
            "2025-10-14T08:05:09+00:00",
            "2025-10-14T10:05:09+02:00",
            "2025-10-14 08:05:09+00",
            "2025-10-14T08:05:09",
            "2025-10-14 08:05:09",
        ] {
            let parsed = parse_ts(raw).unwrap_or_else(|| panic!("failed on {}", raw));
            assert_eq!(parsed.to_rfc3339_opts(chrono::SecondsFormat::Secs, true), expected);
        }
    }

    #[test]
    fn rejects_garbage_timestamps() {
        assert!(parse_ts("yesterday").is_none());
    }

    #[derive(Debug, Deserialize)]
    struct Loose {
        #[serde(default, deserialize_with = "lenient_f64")]
        rate: Option<f64>,
        #[serde(default, deserialize_with = "lenient")]
        flag: Option<bool>,
        #[serde(default, deserialize_with = "lenient_list")]
        symbols: Option<Vec<String>>,
    }

    #[test]
    fn malformed_values_read_as_missing() {
        let loose: Loose =
            serde_json::from_value(serde_json::json!({"rate": "", "flag": "yes", "symbols": 7})).unwrap();
        assert_eq!(loose.rate, None);
        assert_eq!(loose.flag, None);
        assert_eq!(loose.symbols, None);

        let loose: Loose = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(loose.rate, None);
    }

    #[test]
    fn numbers_and_lists_accept_text() {
        let loose: Loose = serde_json::from_value(
            serde_json::json!({"rate": " 1.05 ", "flag": true, "symbols": "BTCEUR, ,ETHEUR"}),
        )
        .unwrap();
        assert_eq!(loose.rate, Some(1.05));
        assert_eq!(loose.flag, Some(true));
        assert_eq!(loose.symbols, Some(vec!["BTCEUR".to_string(), "ETHEUR".to_string()]));
    }
}
