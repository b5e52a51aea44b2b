//! Canonical compiled week schedule.
//!
//! Both query styles — the epoch-interval generator and the minute-of-day
//! validator — are thin views over this module, so day resolution and break
//! splitting cannot diverge between them. Day resolution is first declared
//! match wins, in rule declaration order.

use chrono::Weekday;

use crate::error::{Result, WorkTimeError};
use crate::rules::{time_to_minutes, weekday_name, BreakSpec, WorkTimeRule};

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// The rule applying to `weekday`: scan in declaration order, first match
/// wins. This is the single source of truth for day resolution; every
/// operation that needs "which rule governs this date" calls it.
///
/// # Errors
///
/// Returns [`WorkTimeError::NoScheduleForDay`] when no rule covers the day —
/// a configuration gap, e.g. a six-day schedule with no wildcard and no
/// Sunday rule.
pub fn rule_for_weekday(rules: &[WorkTimeRule], weekday: Weekday) -> Result<&WorkTimeRule> {
    rules
        .iter()
        .find(|rule| rule.day_of_week.matches(weekday))
        .ok_or_else(|| WorkTimeError::NoScheduleForDay(weekday_name(weekday).to_string()))
}

/// One calendar day's compiled schedule: the raw open window plus the open
/// sub-intervals left after carving out the break, all in minutes from
/// midnight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledDay {
    pub start: u32,
    pub stop: u32,
    pub break_spec: BreakSpec,
    /// Ordered open intervals: two when a real break splits the day, one
    /// otherwise.
    pub intervals: Vec<(u32, u32)>,
}

impl CompiledDay {
    fn from_rule(rule: &WorkTimeRule) -> Result<CompiledDay> {
        let start = time_to_minutes(&rule.start)?;
        let stop = time_to_minutes(&rule.stop)?;
        let break_spec = BreakSpec::parse(rule.break_time.as_deref())?;
        let intervals = match break_spec {
            BreakSpec::Window {
                start: break_start,
                stop: break_stop,
            } => vec![(start, break_start), (break_stop, stop)],
            BreakSpec::None => vec![(start, stop)],
        };
        Ok(CompiledDay {
            start,
            stop,
            break_spec,
            intervals,
        })
    }
}

/// Compiled schedules for the seven weekdays; days no rule covers are
/// absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekSchedule {
    days: [Option<CompiledDay>; 7],
}

impl WeekSchedule {
    /// Compile an ordered rule list into per-day schedules.
    ///
    /// # Errors
    ///
    /// Returns [`WorkTimeError::InvalidArgument`] when a matched rule
    /// carries a malformed `HH:mm` or break string.
    pub fn compile(rules: &[WorkTimeRule]) -> Result<WeekSchedule> {
        let mut days: [Option<CompiledDay>; 7] = Default::default();
        for weekday in WEEKDAYS {
            if let Some(rule) = rules.iter().find(|r| r.day_of_week.matches(weekday)) {
                days[weekday.num_days_from_monday() as usize] = Some(CompiledDay::from_rule(rule)?);
            }
        }
        Ok(WeekSchedule { days })
    }

    /// The compiled schedule for `weekday`, if any rule covers it.
    pub fn day(&self, weekday: Weekday) -> Option<&CompiledDay> {
        self.days[weekday.num_days_from_monday() as usize].as_ref()
    }
}
