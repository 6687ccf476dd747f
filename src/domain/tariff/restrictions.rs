//! Conditions under which a tariff element applies

use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::support::enums::ocpi_enum;

ocpi_enum!(
    DayOfWeek, "day of week" {
        Monday => "MONDAY",
        Tuesday => "TUESDAY",
        Wednesday => "WEDNESDAY",
        Thursday => "THURSDAY",
        Friday => "FRIDAY",
        Saturday => "SATURDAY",
        Sunday => "SUNDAY",
    }
);

impl From<chrono::Weekday> for DayOfWeek {
    fn from(day: chrono::Weekday) -> Self {
        match day {
            chrono::Weekday::Mon => Self::Monday,
            chrono::Weekday::Tue => Self::Tuesday,
            chrono::Weekday::Wed => Self::Wednesday,
            chrono::Weekday::Thu => Self::Thursday,
            chrono::Weekday::Fri => Self::Friday,
            chrono::Weekday::Sat => Self::Saturday,
            chrono::Weekday::Sun => Self::Sunday,
        }
    }
}

ocpi_enum!(
    ReservationRestrictionType, "reservation restriction" {
        Reservation => "RESERVATION",
        ReservationExpires => "RESERVATION_EXPIRES",
    }
);

/// `HH:MM` local time of day.
mod hour_minute {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(value: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(time) => serializer.serialize_str(&time.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveTime>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(text) => NaiveTime::parse_from_str(text.trim(), FORMAT)
                .map(Some)
                .map_err(|e| serde::de::Error::custom(format!("invalid time '{}': {}", text, e))),
            None => Ok(None),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TariffRestrictions {
    #[serde(default, skip_serializing_if = "Option::is_none", with = "hour_minute")]
    pub start_time: Option<NaiveTime>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "hour_minute")]
    pub end_time: Option<NaiveTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub min_kwh: Option<Decimal>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub max_kwh: Option<Decimal>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub min_current: Option<Decimal>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub max_current: Option<Decimal>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub min_power: Option<Decimal>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub max_power: Option<Decimal>,
    /// Seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_duration: Option<u32>,
    /// Seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_duration: Option<u32>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub day_of_week: BTreeSet<DayOfWeek>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reservation: Option<ReservationRestrictionType>,
}

impl TariffRestrictions {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Whether a local time falls into the `start_time`..`end_time` window.
    /// Windows with `end_time` before `start_time` wrap past midnight.
    pub fn applies_at_time(&self, time: NaiveTime) -> bool {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) if end < start => time >= start || time < end,
            (start, end) => start.map_or(true, |s| time >= s) && end.map_or(true, |e| time < e),
        }
    }

    pub fn applies_on(&self, date: NaiveDate) -> bool {
        use chrono::Datelike;

        let in_range = self.start_date.map_or(true, |s| date >= s) && self.end_date.map_or(true, |e| date < e);
        let on_day = self.day_of_week.is_empty() || self.day_of_week.contains(&DayOfWeek::from(date.weekday()));
        in_range && on_day
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn wire_shape_round_trip() {
        let json = json!({
            "start_time": "13:30",
            "end_time": "15:30",
            "day_of_week": ["MONDAY", "SATURDAY"],
            "max_kwh": 20.5,
            "min_duration": 1800,
            "reservation": "RESERVATION"
        });
        let restrictions: TariffRestrictions = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(restrictions.start_time, Some(time(13, 30)));
        assert_eq!(restrictions.day_of_week.len(), 2);
        assert_eq!(serde_json::to_value(&restrictions).unwrap(), json);
    }

    #[test]
    fn rejects_bad_time() {
        assert!(serde_json::from_value::<TariffRestrictions>(json!({"start_time": "25:00"})).is_err());
    }

    #[test]
    fn empty_restrictions() {
        assert!(TariffRestrictions::default().is_empty());
        assert_eq!(serde_json::to_value(TariffRestrictions::default()).unwrap(), json!({}));
    }

    #[test]
    fn time_window_wraps_midnight() {
        let night = TariffRestrictions {
            start_time: Some(time(22, 0)),
            end_time: Some(time(6, 0)),
            ..Default::default()
        };
        assert!(night.applies_at_time(time(23, 15)));
        assert!(night.applies_at_time(time(5, 59)));
        assert!(!night.applies_at_time(time(12, 0)));

        let day = TariffRestrictions {
            start_time: Some(time(8, 0)),
            end_time: Some(time(18, 0)),
            ..Default::default()
        };
        assert!(day.applies_at_time(time(8, 0)));
        assert!(!day.applies_at_time(time(18, 0)));
    }

    #[test]
    fn day_of_week_filter() {
        let weekend = TariffRestrictions {
            day_of_week: [DayOfWeek::Saturday, DayOfWeek::Sunday].into_iter().collect(),
            ..Default::default()
        };
        // 2024-01-06 was a Saturday
        assert!(weekend.applies_on(NaiveDate::from_ymd_opt(2024, 1, 6).unwrap()));
        assert!(!weekend.applies_on(NaiveDate::from_ymd_opt(2024, 1, 8).unwrap()));
    }
}
