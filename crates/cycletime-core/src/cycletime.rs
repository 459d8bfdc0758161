//! Cycle-time state machine
//!
//! Replays one story's chronologically ascending transition log and sums the
//! business duration of its active intervals. Ordering is a precondition
//! supplied by the tracker API; the log is never sorted here.
//!
//! Interval bookkeeping is intentionally sticky: `open_start` and `is_open`
//! are left untouched after a finishing, `unstarted` or weekend-skipped
//! computation, and `unscheduled` only flips `is_open` off without clearing
//! `open_start`. A later spurious finishing event therefore recomputes
//! against the stale start. Reported cycle times depend on this behavior;
//! regression tests pin it.

use chrono::DateTime;
use chrono_tz::Tz;

use crate::error::{CoreError, IntervalError};
use crate::models::{Story, StoryType, Transition};
use crate::worktime::{BusinessDuration, WorktimeEngine};

/// Total business duration the story was actively worked on
///
/// Walks the transition log in order. An interval opens on `started` and
/// closes on the type-dependent finishing state (`accepted` for chores,
/// `finished` for everything else) or on `unstarted` while open. Weekend
/// endpoints zero the interval's contribution; an inverted interval or a
/// malformed timestamp aborts the story with no partial result.
pub fn cycle_time(
    engine: &WorktimeEngine,
    story: &Story,
    transitions: &[Transition],
) -> Result<BusinessDuration, CoreError> {
    let tz = engine.calendar().timezone();

    let mut open_start: Option<DateTime<Tz>> = None;
    let mut is_open = false;
    let mut accumulated = BusinessDuration::zero();

    for transition in transitions {
        let occurred_at = DateTime::parse_from_rfc3339(&transition.occurred_at)
            .map_err(|source| CoreError::TimestampParse {
                value: transition.occurred_at.clone(),
                source,
            })?
            .with_timezone(&tz);

        let finishing = match story.story_type {
            StoryType::Chore => transition.state == "accepted",
            StoryType::Other => transition.state == "finished",
        };

        if transition.state == "unscheduled" && is_open {
            // Interval dropped without computing; open_start deliberately kept.
            is_open = false;
        }

        if transition.state == "started" {
            // Unconditional: a restart overwrites any still-open interval.
            open_start = Some(occurred_at);
            is_open = true;
        } else if (finishing && open_start.is_some())
            || (transition.state == "unstarted" && is_open)
        {
            if let Some(start) = open_start {
                match engine.elapsed(start, occurred_at) {
                    Ok(duration) => accumulated += duration,
                    Err(IntervalError::StartAfterEnd) => {
                        return Err(CoreError::InvertedInterval {
                            story_id: story.id,
                            start: start.to_rfc3339(),
                            end: occurred_at.to_rfc3339(),
                        });
                    }
                    Err(err @ (IntervalError::StartOnWeekend | IntervalError::EndOnWeekend)) => {
                        tracing::debug!(
                            story_id = story.id,
                            state = %transition.state,
                            error = %err,
                            "interval touches a weekend, contributes zero"
                        );
                    }
                }
            }
        }
    }

    tracing::debug!(story_id = story.id, cycle_time = %accumulated, "cycle time computed");
    Ok(accumulated)
}
