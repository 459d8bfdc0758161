//! Report formatting for terminal and JSON output
//!
//! Renders bucket summaries and single-story views as comfy-table output for
//! humans or serde_json for machines.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Row, Table};
use cycletime_core::{BucketSummary, BusinessDuration, CoreError, Story, Transition};

/// Format a per-bucket summary (human table or JSON)
pub fn format_report(
    num_weeks: u32,
    summaries: &[BucketSummary],
    failed: usize,
    json: bool,
    no_color: bool,
) -> Result<String> {
    if json {
        let value = serde_json::json!({
            "weeks": num_weeks,
            "buckets": summaries,
            "failed_stories": failed,
        });
        return Ok(serde_json::to_string_pretty(&value)?);
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    let headers = [
        "Bucket",
        "Number",
        "Percentage",
        "Total worktime",
        "Avg worktime per story",
    ];
    if no_color {
        table.set_header(headers.to_vec());
    } else {
        table.set_header(headers.iter().map(|h| Cell::new(h).fg(Color::Cyan)));
    }

    for summary in summaries {
        table.add_row(Row::from(vec![
            summary.name.clone(),
            summary.count.to_string(),
            format_percent(summary.percent),
            summary.total.to_string(),
            summary.average.to_string(),
        ]));
    }

    let mut output = format!("LAST {} WEEKS\n{}", num_weeks, table);
    if failed > 0 {
        output.push_str(&format!(
            "\n{} stories excluded (fatal cycle-time errors, see warnings)",
            failed
        ));
    }
    Ok(output)
}

/// Format one story's transition log and cycle-time result
pub fn format_story(
    story: &Story,
    transitions: &[Transition],
    result: &Result<BusinessDuration, CoreError>,
    json: bool,
) -> Result<String> {
    if json {
        let value = serde_json::json!({
            "story": story,
            "transitions": transitions,
            "cycle_time_minutes": result.as_ref().ok().map(BusinessDuration::num_minutes),
            "error": result.as_ref().err().map(ToString::to_string),
        });
        return Ok(serde_json::to_string_pretty(&value)?);
    }

    let mut lines = vec![
        format!("Story:        {} ({})", story.name, story.id),
        format!("State:        {}", story.current_state),
        format!(
            "Labels:       {}",
            if story.labels.is_empty() {
                "-".to_string()
            } else {
                story
                    .labels
                    .iter()
                    .map(|l| l.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            }
        ),
    ];

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["State", "Occurred at"]);
    for transition in transitions {
        table.add_row(Row::from(vec![
            transition.state.clone(),
            transition.occurred_at.clone(),
        ]));
    }
    lines.push(table.to_string());

    match result {
        Ok(cycle_time) => lines.push(format!("Cycle time:   {}", cycle_time)),
        Err(err) => lines.push(format!("Cycle time:   unavailable ({})", err)),
    }

    Ok(lines.join("\n"))
}

fn format_percent(percent: f64) -> String {
    format!("{:.2}%", percent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cycletime_core::{
        cycle_time, default_buckets, summarize, BusinessCalendar, CalendarConfig, Label,
        ScoredStory, StoryType, WorktimeEngine,
    };

    fn test_story() -> Story {
        Story {
            id: 42,
            story_type: StoryType::Other,
            name: "speed up the pipeline".into(),
            current_state: "accepted".into(),
            labels: vec![Label {
                name: "broken build".into(),
            }],
        }
    }

    fn test_summaries() -> Vec<BucketSummary> {
        let engine = WorktimeEngine::new(BusinessCalendar::new(&CalendarConfig::default()).unwrap());
        let log = vec![
            Transition {
                state: "started".into(),
                occurred_at: "2018-09-14T09:00:00-07:00".into(),
            },
            Transition {
                state: "finished".into(),
                occurred_at: "2018-09-14T12:00:00-07:00".into(),
            },
        ];
        let story = test_story();
        let scored = vec![ScoredStory {
            cycle_time: cycle_time(&engine, &story, &log).unwrap(),
            story,
        }];
        summarize(&scored, &default_buckets())
    }

    #[test]
    fn format_percent_two_decimals() {
        assert_eq!(format_percent(100.0), "100.00%");
        assert_eq!(format_percent(33.333333), "33.33%");
        assert_eq!(format_percent(0.0), "0.00%");
    }

    #[test]
    fn report_table_contains_buckets_and_title() {
        let output = format_report(3, &test_summaries(), 0, false, true).unwrap();
        assert!(output.contains("LAST 3 WEEKS"));
        assert!(output.contains("All stories"));
        assert!(output.contains("Broken builds"));
        assert!(output.contains("3h 0m"));
        assert!(!output.contains("excluded"));
    }

    #[test]
    fn report_mentions_excluded_stories() {
        let output = format_report(3, &test_summaries(), 2, false, true).unwrap();
        assert!(output.contains("2 stories excluded"));
    }

    #[test]
    fn report_json_is_machine_readable() {
        let output = format_report(3, &test_summaries(), 1, true, false).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["weeks"], 3);
        assert_eq!(value["failed_stories"], 1);
        assert_eq!(value["buckets"][0]["name"], "All stories");
        // BusinessDuration serializes as whole minutes.
        assert_eq!(value["buckets"][0]["total"], 180);
    }

    #[test]
    fn story_view_lists_transitions_and_cycle_time() {
        let story = test_story();
        let transitions = vec![Transition {
            state: "started".into(),
            occurred_at: "2018-09-14T09:00:00-07:00".into(),
        }];
        let result = Ok(BusinessDuration::zero());
        let output = format_story(&story, &transitions, &result, false).unwrap();
        assert!(output.contains("speed up the pipeline"));
        assert!(output.contains("started"));
        assert!(output.contains("Cycle time:"));
    }

    #[test]
    fn story_json_surfaces_error() {
        let story = test_story();
        let result = Err(CoreError::InvertedInterval {
            story_id: 42,
            start: "2018-09-14T12:00:00-07:00".into(),
            end: "2018-09-14T10:00:00-07:00".into(),
        });
        let output = format_story(&story, &[], &result, true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert!(value["cycle_time_minutes"].is_null());
        assert!(value["error"].as_str().unwrap().contains("after end"));
    }
}
