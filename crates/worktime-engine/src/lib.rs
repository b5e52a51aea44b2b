//! # worktime-engine
//!
//! Weekly opening-schedule compiler and time-window validator for ordering
//! front-ends: "given this business's weekly schedule and a point in time,
//! is it open — and if not, when is the next valid moment?"
//!
//! All operations are pure, synchronous functions of their arguments. The
//! caller provides the "now" anchor explicitly (no system clock access),
//! and timezone offsets come from a fixed, DST-free lookup table — never
//! from the host environment.
//!
//! ## Modules
//!
//! - [`tz`] — Fixed zone-name → UTC-offset resolution
//! - [`rules`] — Schedule configuration value objects and `HH:mm` helpers
//! - [`week`] — Canonical compiled week schedule both query paths derive from
//! - [`generator`] — Weekly rules → concrete epoch-second intervals over a date range
//! - [`validator`] — Containment and day-limit queries over compiled intervals
//! - [`worktime`] — Business-facing checks: open now, next delivery/pickup time, max order date
//! - [`memo`] — Opt-in memoization decorator around the pure operations
//! - [`error`] — Error types

pub mod error;
pub mod generator;
pub mod memo;
pub mod rules;
pub mod tz;
pub mod validator;
pub mod week;
pub mod worktime;

pub use error::{Result, WorkTimeError};
pub use generator::{Interval, Schedule, ScheduleGenerator, DEFAULT_ZONE};
pub use memo::WorkTimeMemo;
pub use rules::{
    minutes_to_time, time_to_minutes, BreakSpec, DaySpec, Restrictions, RestrictionsOrder,
    SelfServiceRule, WorkTimeRule,
};
pub use tz::{resolve_zone_offset, resolve_zone_offset_or, zone_offset_minutes};
pub use validator::{DayLimit, NotImplemented, ScheduleValidator};
pub use week::{rule_for_weekday, CompiledDay, WeekSchedule};
pub use worktime::{
    current_work_time, get_max_order_date, get_possible_delivery_order_date_time,
    get_possible_self_service_order_date_time, is_work_now, next_opening,
    self_service_restrictions, ValidatorResult,
};
