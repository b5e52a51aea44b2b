//! Schedule configuration value objects and `HH:mm` string helpers.
//!
//! These mirror the JSON configuration the ordering front-end holds: weekly
//! work-time rules keyed by day name, an optional lunch break, an optional
//! self-service (pickup) override, and per-business ordering limits. All
//! values are immutable; transforms build new objects.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::error::{Result, WorkTimeError};

/// Reserved wildcard in `dayOfWeek`, matched case-sensitively against the
/// literal string. Day names, by contrast, match case-insensitively.
pub const ALL_DAYS: &str = "all";

/// Which weekdays a rule applies to: one day name, a list of day names, or
/// the [`ALL_DAYS`] wildcard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DaySpec {
    One(String),
    Many(Vec<String>),
}

impl DaySpec {
    /// Whether this spec covers `weekday`.
    pub fn matches(&self, weekday: Weekday) -> bool {
        match self {
            DaySpec::One(name) => day_name_matches(name, weekday),
            DaySpec::Many(names) => names.iter().any(|n| day_name_matches(n, weekday)),
        }
    }
}

fn day_name_matches(name: &str, weekday: Weekday) -> bool {
    name == ALL_DAYS || name.eq_ignore_ascii_case(weekday_name(weekday))
}

/// The English name of `weekday`, lowercase.
pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

/// Alternate open/close/break window applying only to the pickup
/// (self-service) ordering flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelfServiceRule {
    pub start: String,
    pub stop: String,
    #[serde(rename = "break", default, skip_serializing_if = "Option::is_none")]
    pub break_time: Option<String>,
}

/// One weekly rule: open/close times (business-local `HH:mm`) for one or
/// more named weekdays or for all days, with an optional break and an
/// optional self-service override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkTimeRule {
    pub day_of_week: DaySpec,
    pub start: String,
    pub stop: String,
    #[serde(rename = "break", default, skip_serializing_if = "Option::is_none")]
    pub break_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub self_service: Option<SelfServiceRule>,
}

/// A business's full availability policy: its timezone plus an *ordered*
/// rule list. Order matters — when several rules cover the same day, the
/// first declared match wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restrictions {
    pub timezone: String,
    pub worktime: Vec<WorkTimeRule>,
}

/// [`Restrictions`] plus the ordering limits: minutes of lead time after
/// opening before the first delivery, and how far into the future an order
/// may be placed.
///
/// Both limits accept JSON numbers or numeric strings; the upstream
/// configuration source is permissive about numeric types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestrictionsOrder {
    #[serde(flatten)]
    pub restrictions: Restrictions,
    #[serde(deserialize_with = "minutes_lenient")]
    pub min_delivery_time_in_minutes: u32,
    #[serde(deserialize_with = "minutes_lenient")]
    pub possible_to_order_in_minutes: u32,
}

fn minutes_lenient<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    struct MinutesVisitor;

    impl serde::de::Visitor<'_> for MinutesVisitor {
        type Value = u32;

        fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("minutes as a non-negative number or numeric string")
        }

        fn visit_u64<E: serde::de::Error>(self, v: u64) -> std::result::Result<u32, E> {
            u32::try_from(v).map_err(|_| E::custom("minutes out of range"))
        }

        fn visit_i64<E: serde::de::Error>(self, v: i64) -> std::result::Result<u32, E> {
            u32::try_from(v).map_err(|_| E::custom("minutes out of range"))
        }

        fn visit_str<E: serde::de::Error>(self, v: &str) -> std::result::Result<u32, E> {
            v.trim()
                .parse()
                .map_err(|_| E::custom(format!("not a minutes value: '{v}'")))
        }
    }

    deserializer.deserialize_any(MinutesVisitor)
}

/// A parsed break window, tagged so "no break configured" can never be
/// confused with "break from midnight to midnight".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BreakSpec {
    /// No break: the field was absent, carried the `00:00-00:00` sentinel,
    /// or declared a window whose start is not before its stop. Reversed and
    /// empty windows fall through here on purpose — the configuration source
    /// treats them as "no break", and that policy lives only in this parse.
    None,
    /// A real break window, minutes from midnight, `start < stop`.
    Window { start: u32, stop: u32 },
}

impl BreakSpec {
    /// Parse an optional `HH:mm-HH:mm` break string.
    pub fn parse(raw: Option<&str>) -> Result<BreakSpec> {
        let Some(raw) = raw else {
            return Ok(BreakSpec::None);
        };
        let (start_str, stop_str) = raw.split_once('-').ok_or_else(|| {
            WorkTimeError::InvalidArgument(format!("malformed break '{raw}', expected HH:mm-HH:mm"))
        })?;
        let start = time_to_minutes(start_str)?;
        let stop = time_to_minutes(stop_str)?;
        if start < stop {
            Ok(BreakSpec::Window { start, stop })
        } else {
            Ok(BreakSpec::None)
        }
    }
}

/// Parse a zero-padded 24-hour `HH:mm` string into minutes from midnight.
pub fn time_to_minutes(time: &str) -> Result<u32> {
    let bad = || WorkTimeError::InvalidArgument(format!("malformed time '{time}', expected HH:mm"));
    let (hh, mm) = time.split_once(':').ok_or_else(bad)?;
    if hh.len() != 2 || mm.len() != 2 {
        return Err(bad());
    }
    let hours: u32 = hh.parse().map_err(|_| bad())?;
    let minutes: u32 = mm.parse().map_err(|_| bad())?;
    if hours > 23 || minutes > 59 {
        return Err(bad());
    }
    Ok(hours * 60 + minutes)
}

/// Format minutes from midnight as `HH:mm`. Values past a full day fold
/// back; exactly 1440 renders as `24:00`, matching the legacy minute
/// arithmetic downstream consumers compare against.
pub fn minutes_to_time(minutes: u32) -> String {
    let mut minutes = minutes;
    while minutes > 1440 {
        minutes -= 1440;
    }
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Minutes from midnight of a wall-clock time, ignoring seconds.
pub(crate) fn minutes_of_day(time: chrono::NaiveTime) -> u32 {
    use chrono::Timelike;
    time.hour() * 60 + time.minute()
}
