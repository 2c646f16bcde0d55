use serde::{de::Error as _, Deserialize, Deserializer};
use time::{format_description::well_known::Rfc3339, macros::format_description, Date, OffsetDateTime};

/// A date accepted from clients as RFC 3339, `YYYY-MM-DD` or epoch milliseconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DateValue(pub bson::DateTime);

impl DateValue {
    pub fn into_bson(self) -> bson::DateTime {
        self.0
    }
}

impl From<DateValue> for bson::DateTime {
    fn from(value: DateValue) -> Self {
        value.0
    }
}

impl<'de> Deserialize<'de> for DateValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Millis(i64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Millis(ms) => Ok(DateValue(bson::DateTime::from_millis(ms))),
            Raw::Text(text) => parse_date(&text)
                .map(|dt| DateValue(bson::DateTime::from_time_0_3(dt)))
                .ok_or_else(|| D::Error::custom(format!("invalid date `{text}`"))),
        }
    }
}

pub fn parse_date(raw: &str) -> Option<OffsetDateTime> {
    let raw = raw.trim();

    if let Ok(dt) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(dt);
    }

    Date::parse(raw, format_description!("[year]-[month]-[day]"))
        .ok()
        .map(|d| d.midnight().assume_utc())
}

/// Distinguish an absent field from an explicit `null`
///
/// Use with `#[serde(default, deserialize_with = "nullable")]` on an
/// `Option<Option<T>>`: absent is `None`, `null` is `Some(None)`.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Payload {
        #[serde(default, deserialize_with = "nullable")]
        end: Option<Option<DateValue>>,
    }

    #[test]
    fn accepts_plain_and_rfc3339_dates() {
        let plain: DateValue = serde_json::from_value(json!("2021-03-01")).unwrap();
        let full: DateValue = serde_json::from_value(json!("2021-03-01T00:00:00Z")).unwrap();
        let millis: DateValue = serde_json::from_value(json!(1_614_556_800_000_i64)).unwrap();

        assert_eq!(plain, full);
        assert_eq!(plain, millis);
    }

    #[test]
    fn rejects_garbage() {
        assert!(serde_json::from_value::<DateValue>(json!("yesterday")).is_err());
    }

    #[test]
    fn nullable_distinguishes_absent_from_null() {
        let absent: Payload = serde_json::from_value(json!({})).unwrap();
        let null: Payload = serde_json::from_value(json!({ "end": null })).unwrap();
        let set: Payload = serde_json::from_value(json!({ "end": "2022-01-01" })).unwrap();

        assert_eq!(absent.end, None);
        assert_eq!(null.end, Some(None));
        assert!(matches!(set.end, Some(Some(_))));
    }
}
