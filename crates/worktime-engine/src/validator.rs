//! Queries over a previously generated interval table.
//!
//! The epoch-interval path is boundary-inclusive on both ends: an instant
//! equal to an interval's start or stop counts as contained. (The legacy
//! minute-of-day path in [`crate::worktime`] is strict-exclusive instead;
//! both conventions are part of the public contract.)

use chrono::DateTime;

use crate::error::{Result, WorkTimeError};
use crate::generator::Schedule;
use crate::tz::{offset_to_minutes, resolve_zone_offset};

/// Which end of the compiled range [`ScheduleValidator::find_day_limit`]
/// reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayLimit {
    Earliest,
    Latest,
}

/// Marker result of [`ScheduleValidator::find_latest_end_date`]: the query
/// is part of the public contract but intentionally not implemented, and it
/// must never silently compute a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct NotImplemented;

/// Answers repeated queries against one compiled [`Schedule`] without
/// recomputation.
#[derive(Debug, Clone)]
pub struct ScheduleValidator {
    schedule: Schedule,
}

impl ScheduleValidator {
    /// Wrap a schedule in either representation; compact pair lists convert
    /// via `Schedule::from`.
    pub fn new(schedule: impl Into<Schedule>) -> ScheduleValidator {
        ScheduleValidator {
            schedule: schedule.into(),
        }
    }

    /// True iff some interval satisfies `start <= instant <= stop`,
    /// inclusive on both ends.
    pub fn contains_instant(&self, instant: i64) -> bool {
        self.schedule
            .intervals()
            .iter()
            .any(|iv| iv.start <= instant && instant <= iv.stop)
    }

    /// True iff the whole `[start, start + duration_secs]` span fits inside
    /// a *single* interval. A span bridging a break or a day boundary is
    /// rejected even when the union of two intervals would cover it.
    pub fn contains_duration(&self, start: i64, duration_secs: i64) -> bool {
        self.schedule
            .intervals()
            .iter()
            .any(|iv| iv.start <= start && iv.stop >= start + duration_secs)
    }

    /// The earliest or latest interval start, formatted `yyyy-MM-dd` in the
    /// given zone. `None` when the schedule is empty.
    ///
    /// # Errors
    ///
    /// Returns [`WorkTimeError::UnknownTimeZone`] for an unrecognized zone
    /// name.
    pub fn find_day_limit(&self, limit: DayLimit, zone: &str) -> Result<Option<String>> {
        let offset_secs = i64::from(offset_to_minutes(resolve_zone_offset(zone)?)?) * 60;
        let starts = self.schedule.intervals().iter().map(|iv| iv.start);
        let instant = match limit {
            DayLimit::Earliest => starts.min(),
            DayLimit::Latest => starts.max(),
        };
        instant
            .map(|epoch| {
                let shifted = DateTime::from_timestamp(epoch + offset_secs, 0).ok_or_else(|| {
                    WorkTimeError::InvalidArgument(format!("instant {epoch} out of calendar range"))
                })?;
                Ok(shifted.format("%Y-%m-%d").to_string())
            })
            .transpose()
    }

    /// Duration-aware "latest fitting end date". Contractually a stub.
    pub fn find_latest_end_date(&self, _duration_secs: i64) -> NotImplemented {
        NotImplemented
    }
}
