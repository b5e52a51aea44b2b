//! Opt-in memoization decorator around the pure operations.
//!
//! Each instance keeps one cache per operation, keyed by a canonical JSON
//! serialization of the call's arguments. Entries never expire and are
//! never invalidated — sound only because every wrapped operation is a
//! pure function of its arguments. Methods take `&mut self`, so ownership
//! confines the caches to a single thread; share an instance across
//! threads only behind a lock.

use std::collections::HashMap;

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::Serialize;

use crate::error::{Result, WorkTimeError};
use crate::rules::{Restrictions, RestrictionsOrder, WorkTimeRule};
use crate::worktime::{self, ValidatorResult};

#[derive(Debug, Default)]
pub struct WorkTimeMemo {
    is_work_now: HashMap<String, ValidatorResult>,
    current_work_time: HashMap<String, WorkTimeRule>,
    delivery: HashMap<String, String>,
    self_service: HashMap<String, String>,
    max_order_date: HashMap<String, String>,
}

impl WorkTimeMemo {
    pub fn new() -> WorkTimeMemo {
        WorkTimeMemo::default()
    }

    /// Memoized [`worktime::is_work_now`].
    pub fn is_work_now(
        &mut self,
        restriction: &Restrictions,
        now: DateTime<FixedOffset>,
    ) -> Result<ValidatorResult> {
        let key = cache_key(&(restriction, now.to_rfc3339()))?;
        if let Some(hit) = self.is_work_now.get(&key) {
            return Ok(hit.clone());
        }
        let value = worktime::is_work_now(restriction, now)?;
        self.is_work_now.insert(key, value.clone());
        Ok(value)
    }

    /// Memoized [`worktime::current_work_time`]; returns an owned copy of
    /// the matching rule.
    pub fn current_work_time(
        &mut self,
        restriction: &Restrictions,
        date: NaiveDate,
    ) -> Result<WorkTimeRule> {
        let key = cache_key(&(restriction, date))?;
        if let Some(hit) = self.current_work_time.get(&key) {
            return Ok(hit.clone());
        }
        let value = worktime::current_work_time(restriction, date)?.clone();
        self.current_work_time.insert(key, value.clone());
        Ok(value)
    }

    /// Memoized [`worktime::get_possible_delivery_order_date_time`].
    pub fn get_possible_delivery_order_date_time(
        &mut self,
        order: &RestrictionsOrder,
        now: DateTime<FixedOffset>,
    ) -> Result<String> {
        let key = cache_key(&(order, now.to_rfc3339()))?;
        if let Some(hit) = self.delivery.get(&key) {
            return Ok(hit.clone());
        }
        let value = worktime::get_possible_delivery_order_date_time(order, now)?;
        self.delivery.insert(key, value.clone());
        Ok(value)
    }

    /// Memoized [`worktime::get_possible_self_service_order_date_time`].
    pub fn get_possible_self_service_order_date_time(
        &mut self,
        order: &RestrictionsOrder,
        now: DateTime<FixedOffset>,
    ) -> Result<String> {
        let key = cache_key(&(order, now.to_rfc3339()))?;
        if let Some(hit) = self.self_service.get(&key) {
            return Ok(hit.clone());
        }
        let value = worktime::get_possible_self_service_order_date_time(order, now)?;
        self.self_service.insert(key, value.clone());
        Ok(value)
    }

    /// Memoized [`worktime::get_max_order_date`].
    pub fn get_max_order_date(
        &mut self,
        order: &RestrictionsOrder,
        now: DateTime<FixedOffset>,
    ) -> Result<String> {
        let key = cache_key(&(order, now.to_rfc3339()))?;
        if let Some(hit) = self.max_order_date.get(&key) {
            return Ok(hit.clone());
        }
        let value = worktime::get_max_order_date(order, now)?;
        self.max_order_date.insert(key, value.clone());
        Ok(value)
    }
}

/// Canonical, deterministic key for a call's arguments. Struct fields
/// serialize in declaration order, so structurally identical arguments
/// always produce identical keys.
fn cache_key<T: Serialize>(args: &T) -> Result<String> {
    serde_json::to_string(args)
        .map_err(|e| WorkTimeError::InvalidArgument(format!("unserializable arguments: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{DaySpec, WorkTimeRule};
    use chrono::TimeZone;

    fn utc_caller(h: u32, min: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2026, 8, 3, h, min, 0)
            .unwrap()
    }

    fn restrictions() -> Restrictions {
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

    #[test]
    fn test_repeat_call_hits_cache() {
        let mut memo = WorkTimeMemo::new();
        let r = restrictions();
        let first = memo.is_work_now(&r, utc_caller(6, 0)).unwrap();
        let second = memo.is_work_now(&r, utc_caller(6, 0)).unwrap();
        assert_eq!(first, second);
        assert_eq!(memo.is_work_now.len(), 1);
    }

    #[test]
    fn test_distinct_arguments_get_distinct_entries() {
        let mut memo = WorkTimeMemo::new();
        let r = restrictions();
        memo.is_work_now(&r, utc_caller(6, 0)).unwrap();
        memo.is_work_now(&r, utc_caller(7, 0)).unwrap();
        assert_eq!(memo.is_work_now.len(), 2);
    }

    #[test]
    fn test_structurally_identical_arguments_share_one_entry() {
        let mut memo = WorkTimeMemo::new();
        let a = restrictions();
        let b = restrictions();
        let first = memo.is_work_now(&a, utc_caller(6, 0)).unwrap();
        let second = memo.is_work_now(&b, utc_caller(6, 0)).unwrap();
        assert_eq!(first, second);
        assert_eq!(memo.is_work_now.len(), 1);
    }

    #[test]
    fn test_errors_are_not_cached() {
        let mut memo = WorkTimeMemo::new();
        let mut r = restrictions();
        r.timezone = "Nowhere/Void".to_string();
        assert!(memo.is_work_now(&r, utc_caller(6, 0)).is_err());
        assert!(memo.is_work_now.is_empty());
    }

    #[test]
    fn test_memoized_rule_lookup() {
        let mut memo = WorkTimeMemo::new();
        let r = restrictions();
        let date = chrono::NaiveDate::from_ymd_opt(2026, 8, 3).unwrap();
        let rule = memo.current_work_time(&r, date).unwrap();
        assert_eq!(rule.start, "10:00");
        assert_eq!(memo.current_work_time.len(), 1);
        memo.current_work_time(&r, date).unwrap();
        assert_eq!(memo.current_work_time.len(), 1);
    }

    #[test]
    fn test_memoized_order_operations() {
        let mut memo = WorkTimeMemo::new();
        let order = RestrictionsOrder {
            restrictions: restrictions(),
            min_delivery_time_in_minutes: 60,
            possible_to_order_in_minutes: 10080,
        };
        let delivery = memo
            .get_possible_delivery_order_date_time(&order, utc_caller(4, 0))
            .unwrap();
        assert_eq!(delivery, "2026-08-03 11:01");
        let max = memo.get_max_order_date(&order, utc_caller(12, 0)).unwrap();
        assert_eq!(max, "2026-08-10");
        assert_eq!(memo.delivery.len(), 1);
        assert_eq!(memo.max_order_date.len(), 1);
    }
}
