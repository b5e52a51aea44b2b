//! Business-facing availability checks.
//!
//! This is the legacy minute-of-day path: "is the business open at this
//! instant, and if not, when is the next valid moment?" It works directly
//! on the rule list rather than on a precompiled interval table, but day
//! resolution goes through the same [`rule_for_weekday`] the interval path
//! uses, so the two can never disagree about which rule governs a date.
//!
//! Open/close boundaries are strict-exclusive here: the exact opening and
//! closing minutes count as closed. (The interval path in
//! [`crate::validator`] is inclusive; both conventions are part of the
//! public contract.)

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate};
use serde::Serialize;

use crate::error::{Result, WorkTimeError};
use crate::rules::{
    minutes_of_day, minutes_to_time, time_to_minutes, Restrictions, RestrictionsOrder,
    WorkTimeRule,
};
use crate::tz::zone_offset_minutes;
use crate::week::rule_for_weekday;

const MINUTES_IN_DAY: i32 = 1440;

/// The outcome of an "open now" check. The trailing minute figures are
/// diagnostic but public: downstream code derives the next possible order
/// time from them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatorResult {
    pub work_now: bool,
    /// Set when the offset delta pushed the instant past midnight into the
    /// business's next calendar day.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_new_day: Option<bool>,
    /// Minutes from business-local midnight. Can be negative for a caller
    /// far east of the business; only the forward rollover is folded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_time: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day_start_time: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day_stop_time: Option<u32>,
}

/// Check whether the business is open at `now`.
///
/// `now` carries the caller's own UTC offset; the check combines "shift
/// into business-local time" and "undo the caller's local interpretation"
/// into one minute delta. An empty rule list means "no restriction" and is
/// always open.
///
/// # Errors
///
/// [`WorkTimeError::UnknownTimeZone`] for an unrecognized business zone,
/// [`WorkTimeError::NoScheduleForDay`] when no rule covers the resolved
/// weekday, [`WorkTimeError::InvalidArgument`] for malformed rule times.
pub fn is_work_now(restriction: &Restrictions, now: DateTime<FixedOffset>) -> Result<ValidatorResult> {
    if restriction.worktime.is_empty() {
        return Ok(ValidatorResult {
            work_now: true,
            is_new_day: None,
            current_time: None,
            day_start_time: None,
            day_stop_time: None,
        });
    }

    let business_offset = zone_offset_minutes(&restriction.timezone)?;
    let caller_offset = now.offset().local_minus_utc() / 60;
    let local_delta = business_offset - caller_offset;

    let mut current = minutes_of_day(now.time()) as i32 + local_delta;
    let mut is_new_day = false;
    if current > MINUTES_IN_DAY {
        current -= MINUTES_IN_DAY;
        is_new_day = true;
    }

    let schedule_date = if is_new_day {
        now.date_naive() + Duration::days(1)
    } else {
        now.date_naive()
    };
    let rule = current_work_time(restriction, schedule_date)?;
    let day_start = time_to_minutes(&rule.start)?;
    let day_stop = time_to_minutes(&rule.stop)?;

    Ok(ValidatorResult {
        work_now: (day_start as i32) < current && current < day_stop as i32,
        is_new_day: Some(is_new_day),
        current_time: Some(current),
        day_start_time: Some(day_start),
        day_stop_time: Some(day_stop),
    })
}

/// The work-time rule governing `date`'s weekday: first declared match
/// wins. Other operations resolve days only through here.
pub fn current_work_time(restriction: &Restrictions, date: NaiveDate) -> Result<&WorkTimeRule> {
    rule_for_weekday(&restriction.worktime, date.weekday())
}

/// The earliest possible delivery moment, `yyyy-MM-dd HH:mm`.
///
/// Open: the current business-local minute plus the delivery lead time,
/// on `now`'s calendar date. Closed: the applicable day's opening minute
/// plus the lead time plus the historical one-minute padding; the date
/// rolls to tomorrow when the day already rolled over or the closing time
/// has passed.
pub fn get_possible_delivery_order_date_time(
    order: &RestrictionsOrder,
    now: DateTime<FixedOffset>,
) -> Result<String> {
    possible_order_date_time(
        &order.restrictions,
        order.min_delivery_time_in_minutes,
        now,
    )
}

/// Same as [`get_possible_delivery_order_date_time`] but for the pickup
/// flow: every rule's open/close/break is first replaced by its
/// self-service override where present. The input is never mutated.
pub fn get_possible_self_service_order_date_time(
    order: &RestrictionsOrder,
    now: DateTime<FixedOffset>,
) -> Result<String> {
    let transformed = self_service_restrictions(&order.restrictions);
    possible_order_date_time(&transformed, order.min_delivery_time_in_minutes, now)
}

fn possible_order_date_time(
    restrictions: &Restrictions,
    min_delivery_minutes: u32,
    now: DateTime<FixedOffset>,
) -> Result<String> {
    let check = is_work_now(restrictions, now)?;

    if check.work_now {
        let current = check.current_time.ok_or_else(|| {
            WorkTimeError::InvalidArgument("current time could not be derived".to_string())
        })?;
        let possible = current + min_delivery_minutes as i32;
        return Ok(format!(
            "{} {}",
            now.format("%Y-%m-%d"),
            minutes_to_time(possible as u32)
        ));
    }

    let (Some(current), Some(day_stop)) = (check.current_time, check.day_stop_time) else {
        return Err(WorkTimeError::InvalidArgument(
            "current time and day stop time could not be derived".to_string(),
        ));
    };
    let is_new_day = check.is_new_day.unwrap_or(false);

    let schedule_date = if is_new_day {
        now.date_naive() + Duration::days(1)
    } else {
        now.date_naive()
    };
    let rule = current_work_time(restrictions, schedule_date)?;
    // Opening minute + lead time + the historical one-minute padding.
    let minutes = time_to_minutes(&rule.start)? + min_delivery_minutes + 1;

    let result_date = if is_new_day || current > day_stop as i32 {
        now.date_naive() + Duration::days(1)
    } else {
        now.date_naive()
    };
    Ok(format!(
        "{} {}",
        result_date.format("%Y-%m-%d"),
        minutes_to_time(minutes)
    ))
}

/// The start of the next open window, `yyyy-MM-dd HH:mm`, without any
/// delivery padding.
///
/// # Errors
///
/// Returns [`WorkTimeError::NotWorkingNow`] when the business is already
/// open — callers treat that as an expected condition, distinct from the
/// failure cases.
pub fn next_opening(restriction: &Restrictions, now: DateTime<FixedOffset>) -> Result<String> {
    let check = is_work_now(restriction, now)?;
    if check.work_now {
        return Err(WorkTimeError::NotWorkingNow);
    }
    let (Some(current), Some(day_stop)) = (check.current_time, check.day_stop_time) else {
        return Err(WorkTimeError::InvalidArgument(
            "current time and day stop time could not be derived".to_string(),
        ));
    };
    let is_new_day = check.is_new_day.unwrap_or(false);

    let schedule_date = if is_new_day {
        now.date_naive() + Duration::days(1)
    } else {
        now.date_naive()
    };
    let rule = current_work_time(restriction, schedule_date)?;
    let start = time_to_minutes(&rule.start)?;

    let result_date = if is_new_day || current > day_stop as i32 {
        now.date_naive() + Duration::days(1)
    } else {
        now.date_naive()
    };
    Ok(format!(
        "{} {}",
        result_date.format("%Y-%m-%d"),
        minutes_to_time(start)
    ))
}

/// The latest date an order may be placed for, `yyyy-MM-dd`.
///
/// # Errors
///
/// Returns [`WorkTimeError::InvalidArgument`] when the order horizon is
/// missing (zero).
pub fn get_max_order_date(order: &RestrictionsOrder, now: DateTime<FixedOffset>) -> Result<String> {
    if order.possible_to_order_in_minutes == 0 {
        return Err(WorkTimeError::InvalidArgument(
            "possibleToOrderInMinutes is missing or zero".to_string(),
        ));
    }
    let max = now + Duration::minutes(i64::from(order.possible_to_order_in_minutes));
    Ok(max.format("%Y-%m-%d").to_string())
}

/// Rewrite a restriction for the pickup flow: each rule's start/stop/break
/// is replaced by its self-service override when present. Pure transform —
/// the input is left untouched and the result carries no further overrides.
pub fn self_service_restrictions(restriction: &Restrictions) -> Restrictions {
    Restrictions {
        timezone: restriction.timezone.clone(),
        worktime: restriction
            .worktime
            .iter()
            .map(|rule| match &rule.self_service {
                Some(over) => WorkTimeRule {
                    day_of_week: rule.day_of_week.clone(),
                    start: over.start.clone(),
                    stop: over.stop.clone(),
                    break_time: over.break_time.clone(),
                    self_service: None,
                },
                None => rule.clone(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{DaySpec, SelfServiceRule};
    use chrono::TimeZone;

    fn utc_caller(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(y, m, d, h, min, 0)
            .unwrap()
    }

    fn all_days_10_to_20() -> Restrictions {
        Restrictions {
            timezone: "Asia/Yekaterinburg".to_string(),
            worktime: vec![WorkTimeRule {
                day_of_week: DaySpec::One("all".into()),
                start: "10:00".to_string(),
                stop: "20:00".to_string(),
                break_time: None,
                self_service: None,
            }],
        }
    }

    fn order(restrictions: Restrictions, min_delivery: u32, horizon: u32) -> RestrictionsOrder {
        RestrictionsOrder {
            restrictions,
            min_delivery_time_in_minutes: min_delivery,
            possible_to_order_in_minutes: horizon,
        }
    }

    #[test]
    fn test_open_mid_day() {
        // 06:00 UTC = 11:00 in Yekaterinburg (+05:00).
        let result = is_work_now(&all_days_10_to_20(), utc_caller(2026, 8, 3, 6, 0)).unwrap();
        assert!(result.work_now);
        assert_eq!(result.current_time, Some(660));
        assert_eq!(result.day_start_time, Some(600));
        assert_eq!(result.day_stop_time, Some(1200));
        assert_eq!(result.is_new_day, Some(false));
    }

    #[test]
    fn test_boundaries_are_exclusive() {
        // Exactly 10:00 business-local: closed.
        let at_open = is_work_now(&all_days_10_to_20(), utc_caller(2026, 8, 3, 5, 0)).unwrap();
        assert!(!at_open.work_now);
        // Exactly 20:00 business-local: closed.
        let at_close = is_work_now(&all_days_10_to_20(), utc_caller(2026, 8, 3, 15, 0)).unwrap();
        assert!(!at_close.work_now);
        // One minute inside each boundary: open.
        assert!(is_work_now(&all_days_10_to_20(), utc_caller(2026, 8, 3, 5, 1)).unwrap().work_now);
        assert!(is_work_now(&all_days_10_to_20(), utc_caller(2026, 8, 3, 14, 59)).unwrap().work_now);
    }

    #[test]
    fn test_same_instant_any_caller_offset() {
        // 06:00 UTC expressed from a +03:00 caller is the same instant.
        let from_moscow = FixedOffset::east_opt(3 * 3600)
            .unwrap()
            .with_ymd_and_hms(2026, 8, 3, 9, 0, 0)
            .unwrap();
        let a = is_work_now(&all_days_10_to_20(), utc_caller(2026, 8, 3, 6, 0)).unwrap();
        let b = is_work_now(&all_days_10_to_20(), from_moscow).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_day_rollover_past_business_midnight() {
        let mut restrictions = all_days_10_to_20();
        restrictions.worktime.insert(
            0,
            WorkTimeRule {
                day_of_week: DaySpec::One("tuesday".into()),
                start: "08:00".to_string(),
                stop: "16:00".to_string(),
                break_time: None,
                self_service: None,
            },
        );
        // Monday 23:00 UTC = Tuesday 04:00 in Yekaterinburg.
        let result = is_work_now(&restrictions, utc_caller(2026, 8, 3, 23, 0)).unwrap();
        assert_eq!(result.is_new_day, Some(true));
        assert_eq!(result.current_time, Some(240));
        // The Tuesday rule applies, not Monday's.
        assert_eq!(result.day_start_time, Some(480));
        assert_eq!(result.day_stop_time, Some(960));
        assert!(!result.work_now);
    }

    #[test]
    fn test_caller_east_of_business_stays_defined() {
        // Business in New York (-05:00), caller at +09:00: the delta pulls
        // the minute figure negative. Only the forward rollover folds, so
        // the figure stays negative and simply compares as closed.
        let restrictions = Restrictions {
            timezone: "America/New_York".to_string(),
            worktime: all_days_10_to_20().worktime,
        };
        let caller = FixedOffset::east_opt(9 * 3600)
            .unwrap()
            .with_ymd_and_hms(2026, 8, 3, 10, 0, 0)
            .unwrap();
        let result = is_work_now(&restrictions, caller).unwrap();
        assert!(!result.work_now);
        assert_eq!(result.current_time, Some(-240));
        assert_eq!(result.is_new_day, Some(false));
    }

    #[test]
    fn test_empty_worktime_is_always_open() {
        let restrictions = Restrictions {
            timezone: "UTC".to_string(),
            worktime: vec![],
        };
        let result = is_work_now(&restrictions, utc_caller(2026, 8, 3, 3, 0)).unwrap();
        assert!(result.work_now);
        assert_eq!(result.current_time, None);
        assert_eq!(result.day_start_time, None);
    }

    #[test]
    fn test_unknown_business_zone_fails() {
        let mut restrictions = all_days_10_to_20();
        restrictions.timezone = "Nowhere/Void".to_string();
        let err = is_work_now(&restrictions, utc_caller(2026, 8, 3, 6, 0)).unwrap_err();
        assert!(matches!(err, WorkTimeError::UnknownTimeZone(_)));
    }

    #[test]
    fn test_uncovered_weekday_fails() {
        let mut restrictions = all_days_10_to_20();
        restrictions.worktime[0].day_of_week = DaySpec::One("monday".into());
        // Aug 4 2026 is a Tuesday.
        let err = is_work_now(&restrictions, utc_caller(2026, 8, 4, 6, 0)).unwrap_err();
        assert!(matches!(err, WorkTimeError::NoScheduleForDay(_)));
    }

    #[test]
    fn test_delivery_time_while_open() {
        // 11:00 business-local, open: current minute + lead time.
        let result = get_possible_delivery_order_date_time(
            &order(all_days_10_to_20(), 60, 10080),
            utc_caller(2026, 8, 3, 6, 0),
        )
        .unwrap();
        assert_eq!(result, "2026-08-03 12:00");
    }

    #[test]
    fn test_delivery_time_before_opening() {
        // 09:00 business-local: closed, same day. Opening 10:00 + 60min
        // lead + the one-minute padding.
        let result = get_possible_delivery_order_date_time(
            &order(all_days_10_to_20(), 60, 10080),
            utc_caller(2026, 8, 3, 4, 0),
        )
        .unwrap();
        assert_eq!(result, "2026-08-03 11:01");
    }

    #[test]
    fn test_delivery_time_after_closing_rolls_to_tomorrow() {
        // 21:00 business-local: past closing, rolls to the next day.
        let result = get_possible_delivery_order_date_time(
            &order(all_days_10_to_20(), 60, 10080),
            utc_caller(2026, 8, 3, 16, 0),
        )
        .unwrap();
        assert_eq!(result, "2026-08-04 11:01");
    }

    #[test]
    fn test_delivery_time_after_business_midnight_rolls_to_tomorrow() {
        // Monday 23:30 UTC = Tuesday 04:30 business-local.
        let result = get_possible_delivery_order_date_time(
            &order(all_days_10_to_20(), 60, 10080),
            utc_caller(2026, 8, 3, 23, 30),
        )
        .unwrap();
        assert_eq!(result, "2026-08-04 11:01");
    }

    #[test]
    fn test_self_service_uses_override_and_mutates_nothing() {
        let mut restrictions = all_days_10_to_20();
        restrictions.worktime[0].self_service = Some(SelfServiceRule {
            start: "09:00".to_string(),
            stop: "19:00".to_string(),
            break_time: None,
        });
        let snapshot = restrictions.clone();
        let ord = order(restrictions, 60, 10080);

        // 08:00 business-local: before the 09:00 pickup opening.
        let pickup =
            get_possible_self_service_order_date_time(&ord, utc_caller(2026, 8, 3, 3, 0)).unwrap();
        assert_eq!(pickup, "2026-08-03 10:01");

        // Delivery still uses the 10:00 opening.
        let delivery =
            get_possible_delivery_order_date_time(&ord, utc_caller(2026, 8, 3, 3, 0)).unwrap();
        assert_eq!(delivery, "2026-08-03 11:01");

        // The caller's restriction object is untouched.
        assert_eq!(ord.restrictions, snapshot);
    }

    #[test]
    fn test_self_service_transform_is_pure() {
        let mut restrictions = all_days_10_to_20();
        restrictions.worktime[0].self_service = Some(SelfServiceRule {
            start: "09:00".to_string(),
            stop: "19:00".to_string(),
            break_time: Some("13:00-13:30".to_string()),
        });
        let transformed = self_service_restrictions(&restrictions);
        assert_eq!(transformed.worktime[0].start, "09:00");
        assert_eq!(transformed.worktime[0].stop, "19:00");
        assert_eq!(transformed.worktime[0].break_time.as_deref(), Some("13:00-13:30"));
        assert_eq!(transformed.worktime[0].self_service, None);
        // Original unchanged.
        assert_eq!(restrictions.worktime[0].start, "10:00");
        assert!(restrictions.worktime[0].self_service.is_some());
    }

    #[test]
    fn test_max_order_date() {
        let result =
            get_max_order_date(&order(all_days_10_to_20(), 60, 10080), utc_caller(2026, 8, 3, 12, 0))
                .unwrap();
        // 10080 minutes = 7 days.
        assert_eq!(result, "2026-08-10");
    }

    #[test]
    fn test_max_order_date_requires_horizon() {
        let err =
            get_max_order_date(&order(all_days_10_to_20(), 60, 0), utc_caller(2026, 8, 3, 12, 0))
                .unwrap_err();
        assert!(matches!(err, WorkTimeError::InvalidArgument(_)));
    }

    #[test]
    fn test_next_opening_when_closed() {
        let result = next_opening(&all_days_10_to_20(), utc_caller(2026, 8, 3, 4, 0)).unwrap();
        assert_eq!(result, "2026-08-03 10:00");

        let after_hours = next_opening(&all_days_10_to_20(), utc_caller(2026, 8, 3, 16, 0)).unwrap();
        assert_eq!(after_hours, "2026-08-04 10:00");
    }

    #[test]
    fn test_next_opening_while_open_is_distinct_condition() {
        let err = next_opening(&all_days_10_to_20(), utc_caller(2026, 8, 3, 6, 0)).unwrap_err();
        assert!(matches!(err, WorkTimeError::NotWorkingNow));
    }

    #[test]
    fn test_current_work_time_first_match_wins() {
        let mut restrictions = all_days_10_to_20();
        restrictions.worktime.push(WorkTimeRule {
            day_of_week: DaySpec::One("monday".into()),
            start: "12:00".to_string(),
            stop: "14:00".to_string(),
            break_time: None,
            self_service: None,
        });
        // The wildcard is declared first, so it wins even on Monday.
        let rule = current_work_time(
            &restrictions,
            NaiveDate::from_ymd_opt(2026, 8, 3).unwrap(),
        )
        .unwrap();
        assert_eq!(rule.start, "10:00");
    }
}
