//! cycletime-core - Core library for cycletime
//!
//! Provides the business calendar, worktime duration engine, cycle-time state
//! machine, tracker API client and report aggregation.

pub mod calendar;
pub mod cycletime;
pub mod error;
pub mod models;
pub mod report;
pub mod tracker;
pub mod worktime;

pub use calendar::{BusinessCalendar, CalendarConfig};
pub use cycletime::cycle_time;
pub use error::{CoreError, IntervalError};
pub use models::{Label, ScoredStory, Story, StoryType, Transition};
pub use report::{default_buckets, percent, summarize, BucketRule, BucketSpec, BucketSummary};
pub use tracker::TrackerClient;
pub use worktime::{BusinessDuration, WorktimeEngine};
