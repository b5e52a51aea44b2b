//! Compile weekly work-time rules into concrete epoch-second intervals over
//! an explicit date range.
//!
//! The generator walks every calendar date in the range, keeps the dates
//! whose weekday has a compiled schedule, and emits that day's open
//! sub-intervals as `[start, stop)` boundaries in epoch seconds, shifted by
//! the resolved zone offset. The result is a reusable table for repeated
//! queries (see [`crate::validator`]).

use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::rules::WorkTimeRule;
use crate::tz::{offset_to_minutes, resolve_zone_offset_or};
use crate::week::WeekSchedule;

/// Zone applied when interval generation gets no explicit zone.
pub const DEFAULT_ZONE: &str = "Etc/GMT+0";

/// One compiled interval in absolute epoch seconds, already
/// timezone-adjusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    pub start: i64,
    pub stop: i64,
}

/// An ordered interval list. The compact `[start, stop]` pair form is a
/// lossless, order-preserving projection of the verbose form; converting
/// back and forth never reorders or drops boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Schedule(Vec<Interval>);

impl Schedule {
    pub fn intervals(&self) -> &[Interval] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Project into compact `[start, stop]` pairs.
    pub fn to_pairs(&self) -> Vec<[i64; 2]> {
        self.0.iter().map(|iv| [iv.start, iv.stop]).collect()
    }

    /// Rebuild from compact pairs, preserving order.
    pub fn from_pairs(pairs: &[[i64; 2]]) -> Schedule {
        Schedule(
            pairs
                .iter()
                .map(|&[start, stop]| Interval { start, stop })
                .collect(),
        )
    }
}

impl From<Vec<Interval>> for Schedule {
    fn from(intervals: Vec<Interval>) -> Schedule {
        Schedule(intervals)
    }
}

impl From<Vec<[i64; 2]>> for Schedule {
    fn from(pairs: Vec<[i64; 2]>) -> Schedule {
        Schedule::from_pairs(&pairs)
    }
}

/// Compiles a rule list once, then generates interval tables for arbitrary
/// date ranges.
#[derive(Debug, Clone)]
pub struct ScheduleGenerator {
    week: WeekSchedule,
}

impl ScheduleGenerator {
    /// # Errors
    ///
    /// Returns [`crate::WorkTimeError::InvalidArgument`] when a rule carries
    /// a malformed time or break string.
    pub fn new(rules: &[WorkTimeRule]) -> Result<ScheduleGenerator> {
        Ok(ScheduleGenerator {
            week: WeekSchedule::compile(rules)?,
        })
    }

    /// Generate the interval table for every date from `start_date` to
    /// `end_date` inclusive.
    ///
    /// Dates whose weekday has no compiled schedule are skipped; a range
    /// matching nothing yields an empty schedule, not an error. Interval
    /// boundaries are that date's midnight plus the rule's
    /// seconds-from-midnight, plus the resolved offset of `zone` (default
    /// [`DEFAULT_ZONE`]) in seconds.
    ///
    /// # Errors
    ///
    /// Returns [`crate::WorkTimeError::UnknownTimeZone`] for an
    /// unrecognized zone name.
    pub fn generate_time_intervals(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
        zone: Option<&str>,
    ) -> Result<Schedule> {
        let offset = resolve_zone_offset_or(zone, DEFAULT_ZONE)?;
        let offset_secs = i64::from(offset_to_minutes(offset)?) * 60;

        let mut intervals = Vec::new();
        let mut date = start_date;
        while date <= end_date {
            if let Some(day) = self.week.day(date.weekday()) {
                let midnight = date.and_time(NaiveTime::MIN).and_utc().timestamp();
                for &(sub_start, sub_stop) in &day.intervals {
                    intervals.push(Interval {
                        start: midnight + i64::from(sub_start) * 60 + offset_secs,
                        stop: midnight + i64::from(sub_stop) * 60 + offset_secs,
                    });
                }
            }
            match date.succ_opt() {
                Some(next) => date = next,
                None => break,
            }
        }
        Ok(Schedule(intervals))
    }

    /// The compact projection of [`generate_time_intervals`]: identical
    /// boundaries in identical order, as `[start, stop]` pairs.
    ///
    /// [`generate_time_intervals`]: ScheduleGenerator::generate_time_intervals
    pub fn generate_time_interval_pairs(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
        zone: Option<&str>,
    ) -> Result<Vec<[i64; 2]>> {
        Ok(self
            .generate_time_intervals(start_date, end_date, zone)?
            .to_pairs())
    }
}
