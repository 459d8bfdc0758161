//! Report bucket classification and aggregation
//!
//! Turns per-story cycle times into the summary the CLI prints: label-based
//! buckets with counts, percentages, total and average business time. Bucket
//! definitions are data so callers can report on their own labels.

use serde::Serialize;

use crate::models::{ScoredStory, Story, StoryType};
use crate::worktime::BusinessDuration;

/// How a bucket selects its stories
#[derive(Debug, Clone)]
pub enum BucketRule {
    /// Every story
    All,
    /// Stories carrying this label
    WithLabel(String),
    /// Non-chore stories carrying none of these labels
    FeaturesWithoutLabels(Vec<String>),
}

/// A named report bucket
#[derive(Debug, Clone)]
pub struct BucketSpec {
    pub name: String,
    pub rule: BucketRule,
}

impl BucketSpec {
    pub fn new(name: impl Into<String>, rule: BucketRule) -> Self {
        Self {
            name: name.into(),
            rule,
        }
    }

    fn matches(&self, story: &Story) -> bool {
        match &self.rule {
            BucketRule::All => true,
            BucketRule::WithLabel(label) => story.has_label(label),
            BucketRule::FeaturesWithoutLabels(excluded) => {
                let excluded: Vec<&str> = excluded.iter().map(String::as_str).collect();
                story.story_type != StoryType::Chore && !story.has_a_label_from(&excluded)
            }
        }
    }
}

/// The classification the team reports on
pub fn default_buckets() -> Vec<BucketSpec> {
    let excluded = [
        "broken build",
        "gcp-502s",
        "github-pull-request",
        "github-issue",
    ];
    vec![
        BucketSpec::new("All stories", BucketRule::All),
        BucketSpec::new("Broken builds", BucketRule::WithLabel("broken build".into())),
        BucketSpec::new(
            "Pull requests",
            BucketRule::WithLabel("github-pull-request".into()),
        ),
        BucketSpec::new("GitHub issues", BucketRule::WithLabel("github-issue".into())),
        BucketSpec::new(
            "Original features",
            BucketRule::FeaturesWithoutLabels(excluded.map(String::from).to_vec()),
        ),
    ]
}

/// Aggregated figures for one bucket
#[derive(Debug, Clone, Serialize)]
pub struct BucketSummary {
    pub name: String,
    pub count: usize,
    pub percent: f64,
    pub total: BusinessDuration,
    pub average: BusinessDuration,
}

/// Share of `part` in `whole`, as a percentage; zero when `whole` is empty
pub fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// Summarize scored stories into the given buckets
pub fn summarize(stories: &[ScoredStory], buckets: &[BucketSpec]) -> Vec<BucketSummary> {
    buckets
        .iter()
        .map(|spec| {
            let selected: Vec<&ScoredStory> = stories
                .iter()
                .filter(|scored| spec.matches(&scored.story))
                .collect();
            let total: BusinessDuration = selected.iter().map(|s| s.cycle_time).sum();
            BucketSummary {
                name: spec.name.clone(),
                count: selected.len(),
                percent: percent(selected.len(), stories.len()),
                total,
                average: total.checked_div(selected.len()),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Label;
    use chrono::Duration;

    fn scored(
        id: u64,
        story_type: StoryType,
        labels: &[&str],
        hours: i64,
    ) -> ScoredStory {
        ScoredStory {
            story: Story {
                id,
                story_type,
                name: format!("story {id}"),
                current_state: "accepted".into(),
                labels: labels
                    .iter()
                    .map(|name| Label {
                        name: (*name).into(),
                    })
                    .collect(),
            },
            cycle_time: BusinessDuration::clamped(Duration::hours(hours)),
        }
    }

    #[test]
    fn percent_of_empty_whole_is_zero() {
        assert_eq!(percent(3, 0), 0.0);
        assert_eq!(percent(1, 4), 25.0);
        assert_eq!(percent(4, 4), 100.0);
    }

    #[test]
    fn buckets_classify_by_label_and_type() {
        let stories = vec![
            scored(1, StoryType::Other, &[], 10),
            scored(2, StoryType::Other, &["broken build"], 4),
            scored(3, StoryType::Chore, &[], 2),
            scored(4, StoryType::Other, &["github-issue"], 6),
        ];

        let summaries = summarize(&stories, &default_buckets());

        let all = &summaries[0];
        assert_eq!(all.count, 4);
        assert_eq!(all.percent, 100.0);
        assert_eq!(all.total.num_hours(), 22);

        let broken = &summaries[1];
        assert_eq!(broken.count, 1);
        assert_eq!(broken.percent, 25.0);
        assert_eq!(broken.total.num_hours(), 4);

        // Original features: non-chore, no excluded labels (story 1 only).
        let original = &summaries[4];
        assert_eq!(original.count, 1);
        assert_eq!(original.total.num_hours(), 10);
        assert_eq!(original.average.num_hours(), 10);
    }

    #[test]
    fn empty_bucket_has_zero_average() {
        let stories = vec![scored(1, StoryType::Other, &[], 10)];
        let summaries = summarize(&stories, &default_buckets());
        let pull_requests = &summaries[2];
        assert_eq!(pull_requests.count, 0);
        assert!(pull_requests.total.is_zero());
        assert!(pull_requests.average.is_zero());
    }

    #[test]
    fn average_divides_total_by_count() {
        let stories = vec![
            scored(1, StoryType::Other, &[], 10),
            scored(2, StoryType::Other, &[], 4),
        ];
        let summaries = summarize(&stories, &default_buckets());
        assert_eq!(summaries[0].average.num_hours(), 7);
    }

    #[test]
    fn no_stories_yields_empty_but_valid_summaries() {
        let summaries = summarize(&[], &default_buckets());
        assert_eq!(summaries.len(), 5);
        assert!(summaries.iter().all(|s| s.count == 0 && s.percent == 0.0));
    }
}
