//! Payday configuration stored with a user's settings.

use std::fmt;

use serde::{de::Deserializer, Deserialize, Serialize};
use serde_json::Value;

/// Paydays assumed when a user has not configured any usable dates.
pub const DEFAULT_PAYDAY_DATES: [u32; 2] = [15, 30];

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
/// Descriptive label for how the user is paid. Only the dates drive computations.
pub enum PaydayKind {
    Monthly,
    #[default]
    Semimonthly,
    Custom,
    Unspecified,
}

impl PaydayKind {
    pub fn from_label(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "monthly" => PaydayKind::Monthly,
            "semimonthly" => PaydayKind::Semimonthly,
            "custom" => PaydayKind::Custom,
            _ => PaydayKind::Unspecified,
        }
    }
}

impl fmt::Display for PaydayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PaydayKind::Monthly => "monthly",
            PaydayKind::Semimonthly => "semimonthly",
            PaydayKind::Custom => "custom",
            PaydayKind::Unspecified => "unspecified",
        };
        f.write_str(label)
    }
}

impl<'de> Deserialize<'de> for PaydayKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(value
            .as_str()
            .map(PaydayKind::from_label)
            .unwrap_or(PaydayKind::Unspecified))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct PaydayConfig {
    #[serde(rename = "type", default)]
    pub kind: PaydayKind,
    #[serde(
        default,
        deserialize_with = "lenient_dates",
        skip_serializing_if = "Option::is_none"
    )]
    pub dates: Option<Vec<u32>>,
}

/// Keeps the integer entries within `1..=31`; any other shape reads as unset.
fn lenient_dates<'de, D>(deserializer: D) -> Result<Option<Vec<u32>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(None);
    };
    let days: Vec<u32> = items
        .iter()
        .filter_map(Value::as_u64)
        .filter_map(|day| u32::try_from(day).ok())
        .filter(|day| (1..=31).contains(day))
        .collect();
    Ok((!days.is_empty()).then_some(days))
}

impl PaydayConfig {
    pub fn new(kind: PaydayKind, dates: Vec<u32>) -> Self {
        Self {
            kind,
            dates: Some(dates),
        }
    }

    /// Configured day-of-month values, sorted and de-duplicated, with out-of-range values
    /// dropped. Falls back to [`DEFAULT_PAYDAY_DATES`] when nothing usable remains.
    pub fn resolved_dates(&self) -> Vec<u32> {
        sanitize_payday_dates(self.dates.as_deref().unwrap_or_default())
    }

    /// Returns `true` when the configuration had to fall back to the defaults.
    pub fn uses_default(&self) -> bool {
        let raw = self.dates.as_deref().unwrap_or_default();
        !raw.iter().any(|day| (1..=31).contains(day))
    }
}

/// Sorts, de-duplicates, and range-checks payday days of month.
pub fn sanitize_payday_dates(raw: &[u32]) -> Vec<u32> {
    let mut dates: Vec<u32> = raw
        .iter()
        .copied()
        .filter(|day| (1..=31).contains(day))
        .collect();
    dates.sort_unstable();
    dates.dedup();
    if dates.is_empty() {
        DEFAULT_PAYDAY_DATES.to_vec()
    } else {
        dates
    }
}

/// Per-user settings the finance views read.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    #[serde(default, deserialize_with = "lenient_payday_config")]
    pub payday_config: PaydayConfig,
}

fn lenient_payday_config<'de, D>(deserializer: D) -> Result<PaydayConfig, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolved_dates_sort_and_dedup() {
        let config = PaydayConfig::new(PaydayKind::Custom, vec![30, 1, 15, 15]);
        assert_eq!(config.resolved_dates(), vec![1, 15, 30]);
    }

    #[test]
    fn empty_or_malformed_dates_fall_back_to_default() {
        assert_eq!(PaydayConfig::default().resolved_dates(), vec![15, 30]);
        let bogus = PaydayConfig::new(PaydayKind::Custom, vec![0, 45]);
        assert_eq!(bogus.resolved_dates(), vec![15, 30]);
        assert!(bogus.uses_default());
    }

    #[test]
    fn payday_config_reads_wire_format() {
        let config: PaydayConfig =
            serde_json::from_str(r#"{"type":"biweekly-ish","dates":[5,20]}"#).unwrap();
        assert_eq!(config.kind, PaydayKind::Unspecified);
        assert_eq!(config.resolved_dates(), vec![5, 20]);

        let settings: UserSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings.payday_config.resolved_dates(), vec![15, 30]);
    }

    #[test]
    fn malformed_stored_dates_read_as_defaults() {
        for raw in [
            r#"{"type":"custom","dates":[-1,40]}"#,
            r#"{"type":"custom","dates":[15.5]}"#,
            r#"{"type":"custom","dates":"15,30"}"#,
            r#"{"type":7,"dates":null}"#,
        ] {
            let config: PaydayConfig = serde_json::from_str(raw).unwrap();
            assert_eq!(config.dates, None, "{raw}");
            assert_eq!(config.resolved_dates(), vec![15, 30], "{raw}");
        }

        let mixed: PaydayConfig =
            serde_json::from_str(r#"{"type":"custom","dates":[0,"x",10,25,99]}"#).unwrap();
        assert_eq!(mixed.resolved_dates(), vec![10, 25]);

        let settings: UserSettings =
            serde_json::from_str(r#"{"paydayConfig":"twice a month"}"#).unwrap();
        assert_eq!(settings.payday_config, PaydayConfig::default());
    }
}
