use chrono::{DateTime, Duration, FixedOffset, NaiveDateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{AccountError, Result};

/// `timezone_type` value for a named zone such as `UTC`
const TIMEZONE_TYPE_NAME: u8 = 3;
/// `timezone_type` value for a plain UTC offset such as `+02:00`
const TIMEZONE_TYPE_OFFSET: u8 = 1;

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Token expiry instant together with the timezone name it was reported in.
///
/// The API (and the session cache) encode it as
/// `{"date": "2025-12-31 23:59:59.000000", "timezone_type": 3, "timezone": "UTC"}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expiry {
    instant: DateTime<FixedOffset>,
    timezone: String,
}

/// Wire representation of an [`Expiry`]
#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct ExpiryRecord {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone_type: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

impl Expiry {
    /// Create an expiry at the given UTC instant
    pub fn utc(instant: DateTime<Utc>) -> Self {
        Expiry {
            instant: instant.into(),
            timezone: "UTC".to_string(),
        }
    }

    /// The default used when a payload carries no expiry: one hour after `now`
    pub fn one_hour_after(now: DateTime<Utc>) -> Self {
        Self::utc(now + Duration::hours(1))
    }

    /// Parse a `Y-m-d H:i:s[.u]` local date in the named timezone.
    ///
    /// Accepts IANA zone names (`Europe/Berlin`), `UTC`/`GMT`/`Z` and
    /// offsets (`+02:00`). A local time repeated by a DST change resolves
    /// to its earlier instant.
    pub fn parse(date: &str, timezone: Option<&str>) -> Result<Self> {
        if let Ok(instant) = DateTime::parse_from_rfc3339(date.trim()) {
            return Ok(Expiry {
                instant,
                timezone: timezone.map(str::to_string).unwrap_or_else(|| offset_name(instant.offset())),
            });
        }

        let naive = DATE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(date.trim(), fmt).ok())
            .ok_or_else(|| AccountError::Parse(format!("invalid expiry date: {}", date)))?;

        let timezone = timezone.unwrap_or("UTC").trim().to_string();
        let instant = localize(&naive, &timezone)?.ok_or_else(|| {
            AccountError::Parse(format!("expiry date {} does not exist in {}", date, timezone))
        })?;

        Ok(Expiry { instant, timezone })
    }

    pub(crate) fn from_record(record: ExpiryRecord) -> Result<Self> {
        match record.date {
            Some(date) => Self::parse(&date, record.timezone.as_deref()),
            None => Err(AccountError::Parse("expiry has no date".to_string())),
        }
    }

    pub(crate) fn to_record(&self) -> ExpiryRecord {
        let timezone_type = if parse_offset(&self.timezone).is_some() {
            TIMEZONE_TYPE_OFFSET
        } else {
            TIMEZONE_TYPE_NAME
        };
        ExpiryRecord {
            date: Some(self.date()),
            timezone_type: Some(timezone_type),
            timezone: Some(self.timezone.clone()),
        }
    }

    /// The expiry instant
    pub fn instant(&self) -> DateTime<FixedOffset> {
        self.instant
    }

    /// Unix timestamp in seconds
    pub fn timestamp(&self) -> i64 {
        self.instant.timestamp()
    }

    /// Timezone name as reported by the API
    pub fn timezone(&self) -> &str {
        &self.timezone
    }

    /// Local date string in `Y-m-d H:i:s.u` form
    pub fn date(&self) -> String {
        self.instant.format("%Y-%m-%d %H:%M:%S%.6f").to_string()
    }
}

fn utc_offset() -> FixedOffset {
    Utc.fix()
}

fn resolve_offset(name: &str) -> Option<FixedOffset> {
    match name {
        "" | "UTC" | "utc" | "GMT" | "Z" => Some(utc_offset()),
        other => parse_offset(other),
    }
}

/// Place a wall-clock time in the named zone. `None` when the time falls in
/// a DST gap.
fn localize(naive: &NaiveDateTime, timezone: &str) -> Result<Option<DateTime<FixedOffset>>> {
    if let Some(offset) = resolve_offset(timezone) {
        return Ok(offset.from_local_datetime(naive).earliest());
    }

    let zone: Tz = timezone
        .parse()
        .map_err(|_| AccountError::Parse(format!("unknown timezone in expiry: {}", timezone)))?;
    Ok(zone
        .from_local_datetime(naive)
        .earliest()
        .map(|local| local.with_timezone(&local.offset().fix())))
}

/// Parse `+HH:MM`, `-HH:MM` or `+HHMM`
fn parse_offset(name: &str) -> Option<FixedOffset> {
    let sign = match name.as_bytes().first()? {
        b'+' => 1,
        b'-' => -1,
        _ => return None,
    };
    let digits: String = name[1..].chars().filter(|c| *c != ':').collect();
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let hours: i32 = digits[..2].parse().ok()?;
    let minutes: i32 = digits[2..].parse().ok()?;
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

fn offset_name(offset: &FixedOffset) -> String {
    if offset.local_minus_utc() == 0 {
        "UTC".to_string()
    } else {
        offset.to_string()
    }
}

impl Serialize for Expiry {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_record().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Expiry {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let record = ExpiryRecord::deserialize(deserializer)?;
        Expiry::from_record(record).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_without_timezone_is_utc() {
        let expiry = Expiry::parse("2025-12-31 23:59:59", None).unwrap();
        let expected = Utc.with_ymd_and_hms(2025, 12, 31, 23, 59, 59).unwrap();

        assert_eq!(expiry.timestamp(), expected.timestamp());
        assert_eq!(expiry.timezone(), "UTC");
    }

    #[test]
    fn test_parse_fractional_seconds_and_offset() {
        let expiry = Expiry::parse("2025-06-01 12:00:00.250000", Some("+02:00")).unwrap();
        let expected = Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap();

        assert_eq!(expiry.timestamp(), expected.timestamp());
        assert_eq!(expiry.to_record().timezone_type, Some(TIMEZONE_TYPE_OFFSET));
    }

    #[test]
    fn test_named_zone_winter_and_summer() {
        let winter = Expiry::parse("2025-01-15 12:00:00", Some("Europe/Berlin")).unwrap();
        let summer = Expiry::parse("2025-06-01 12:00:00", Some("Europe/Berlin")).unwrap();

        assert_eq!(
            winter.timestamp(),
            Utc.with_ymd_and_hms(2025, 1, 15, 11, 0, 0).unwrap().timestamp()
        );
        assert_eq!(
            summer.timestamp(),
            Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap().timestamp()
        );
        assert_eq!(summer.instant().offset().local_minus_utc(), 2 * 3600);
    }

    #[test]
    fn test_named_zone_keeps_name() {
        let expiry = Expiry::parse("2025-06-01 12:00:00", Some("Europe/Berlin")).unwrap();
        let json = serde_json::to_value(&expiry).unwrap();

        assert_eq!(json["timezone"], "Europe/Berlin");
        assert_eq!(json["timezone_type"], 3);
        assert_eq!(json["date"], "2025-06-01 12:00:00.000000");

        let back: Expiry = serde_json::from_value(json).unwrap();
        assert_eq!(back, expiry);
    }

    #[test]
    fn test_unknown_zone_and_dst_gap() {
        assert!(matches!(
            Expiry::parse("2025-06-01 12:00:00", Some("Mars/Olympus")),
            Err(AccountError::Parse(_))
        ));
        // clocks jump from 02:00 to 03:00 on this day
        assert!(matches!(
            Expiry::parse("2025-03-30 02:30:00", Some("Europe/Berlin")),
            Err(AccountError::Parse(_))
        ));
    }

    #[test]
    fn test_serialization_round_trip() {
        let expiry = Expiry::parse("2030-01-02 03:04:05", Some("-05:30")).unwrap();
        let json = serde_json::to_string(&expiry).unwrap();
        let back: Expiry = serde_json::from_str(&json).unwrap();

        assert_eq!(back, expiry);
    }

    #[test]
    fn test_invalid_date() {
        assert!(matches!(
            Expiry::parse("tomorrow", None),
            Err(AccountError::Parse(_))
        ));
        let missing: std::result::Result<Expiry, _> = serde_json::from_str(r#"{"timezone":"UTC"}"#);
        assert!(missing.is_err());
    }
}
